mod common;

use common::*;
use embedded_graphics::{
    pixelcolor::{Gray8, GrayColor},
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use waveshare_7in5v2::epd7in5_v2::{BUFFER_LEN, HEIGHT, WIDTH};
use waveshare_7in5v2::prelude::*;

/// Left half black, right half white
struct HalfBlack;

impl embedded_graphics::image::GetPixel for HalfBlack {
    type Color = Gray8;

    fn pixel(&self, p: Point) -> Option<Gray8> {
        Some(if p.x < 400 { Gray8::BLACK } else { Gray8::WHITE })
    }
}

fn ready() -> Harness {
    let mut harness = Harness::new(Config::default());
    harness.epd.init().unwrap();
    harness.take();
    harness
}

#[test]
fn new_does_not_touch_the_panel() {
    let harness = Harness::new(Config::default());
    assert!(harness.take().is_empty());
    assert_eq!(harness.epd.state(), PanelState::Uninitialized);
    assert_eq!(harness.epd.bounds(), Rect::new(0, 0, 800, 480));
    assert_eq!((harness.epd.width(), harness.epd.height()), (WIDTH, HEIGHT));
}

#[test]
fn init_starts_with_reset_pulse() {
    let mut harness = Harness::new(Config::default());
    harness.epd.init().unwrap();
    let events = harness.take();

    let first_cs = events
        .iter()
        .position(|e| matches!(e, Event::Cs(_)))
        .unwrap();
    assert_eq!(
        events[..first_cs],
        [
            Event::Rst(true),
            ms(20),
            Event::Rst(false),
            ms(2),
            Event::Rst(true),
            ms(20),
        ]
    );
    assert!(!events[first_cs..]
        .iter()
        .any(|e| matches!(e, Event::Rst(_))));
}

#[test]
fn init_sequence_order() {
    let mut harness = Harness::new(Config::default());
    harness.epd.init().unwrap();
    let events = harness.take();

    assert_eq!(transactions(&events), init_transactions());
    assert_eq!(harness.epd.state(), PanelState::Ready);
}

#[test]
fn init_waits_before_polling_after_power_on() {
    let mut harness = Harness::new(Config::default());
    harness.epd.init().unwrap();
    let wire = wire(&harness.take());

    let power_on = wire.iter().position(|w| *w == cmd(0x04)).unwrap();
    assert_eq!(wire[power_on + 1], Wire::DelayMs(100));
    assert_eq!(wire[power_on + 2], cmd(0x00));
    // only the one busy check of power on
    assert_eq!(harness.busy.reads(), 1);
}

#[test]
fn busy_is_polled_until_released() {
    let mut harness = Harness::new(Config::default());
    harness.busy.busy_for(3);
    harness.epd.init().unwrap();
    let wire = wire(&harness.take());

    let power_on = wire.iter().position(|w| *w == cmd(0x04)).unwrap();
    assert_eq!(
        wire[power_on + 1..power_on + 5],
        [
            Wire::DelayMs(100),
            Wire::DelayMs(10),
            Wire::DelayMs(10),
            Wire::DelayMs(10),
        ]
    );
    assert_eq!(wire[power_on + 5], cmd(0x00));
    assert_eq!(harness.busy.reads(), 4);
}

#[test]
fn every_write_is_framed() {
    let mut harness = Harness::new(Config::default());
    harness.epd.init().unwrap();
    let events = harness.take();

    let mut selected = false;
    let mut flushed = true;
    for event in &events {
        match event {
            Event::Cs(false) => selected = true,
            Event::Cs(true) => {
                assert!(flushed, "cs released before flush");
                selected = false;
            }
            Event::Write(_) => {
                assert!(selected);
                flushed = false;
            }
            Event::Flush => flushed = true,
            Event::Dc(_) => assert!(selected, "dc changed outside a frame"),
            _ => {}
        }
    }
    assert!(!selected);
}

#[test]
fn display_image_writes_old_and_new_frame() {
    let mut harness = ready();
    harness
        .epd
        .display_image(&HalfBlack, Threshold::DEFAULT)
        .unwrap();
    let wire = wire(&harness.take());

    assert_eq!(wire.len(), 6);
    assert_eq!(wire[0], cmd(0x10));
    assert_eq!(wire[2], cmd(0x13));
    let (Wire::Data(old), Wire::Data(new)) = (&wire[1], &wire[3]) else {
        panic!("expected two data transactions, got {:?}", &wire[..4]);
    };
    assert_eq!(old.len(), BUFFER_LEN);
    assert_eq!(old, new);
    // 400 black pixels = 50 bytes per row
    assert!(old.chunks(100).all(|row| row[..50].iter().all(|&b| b == 0xFF)
        && row[50..].iter().all(|&b| b == 0x00)));

    assert_eq!(wire[4..], [cmd(0x12), Wire::DelayMs(100)]);
    assert_eq!(harness.epd.state(), PanelState::Ready);
}

#[test]
fn display_frame_sends_the_buffer_as_is() {
    let mut harness = ready();
    let mut canvas = Canvas::default();
    Rectangle::new(Point::new(8, 1), Size::new(8, 1))
        .into_styled(PrimitiveStyle::with_fill(Color::Black))
        .draw(&mut canvas)
        .unwrap();

    harness.epd.display_frame(canvas.buffer()).unwrap();
    let transactions = transactions(&harness.take());

    let mut expected = vec![0u8; BUFFER_LEN];
    expected[100 + 1] = 0xFF;
    assert_eq!(
        transactions,
        [
            cmd(0x10),
            Wire::Data(expected.clone()),
            cmd(0x13),
            Wire::Data(expected),
            cmd(0x12),
        ]
    );
}

#[test]
fn canvas_can_be_displayed_as_image() {
    let mut harness = ready();
    let mut canvas = Canvas::default();
    Rectangle::new(Point::new(3, 7), Size::new(21, 5))
        .into_styled(PrimitiveStyle::with_fill(Color::Black))
        .draw(&mut canvas)
        .unwrap();

    harness
        .epd
        .display_image(&canvas, Threshold::DEFAULT)
        .unwrap();
    let transactions = transactions(&harness.take());

    assert_eq!(
        transactions,
        [
            cmd(0x10),
            data(canvas.buffer()),
            cmd(0x13),
            data(canvas.buffer()),
            cmd(0x12),
        ]
    );
    assert!(canvas.buffer().iter().any(|&b| b != 0x00));
}

#[test]
fn display_frame_rejects_wrong_size() {
    let mut harness = ready();
    let result = harness.epd.display_frame(&[0u8; 10]);
    assert!(matches!(
        result,
        Err(ErrorKind::BufferLength {
            expected: 48_000,
            actual: 10
        })
    ));
    assert!(harness.take().is_empty());
    assert_eq!(harness.epd.state(), PanelState::Ready);
}

#[test]
fn clear_writes_white_then_black_rows() {
    let mut harness = ready();
    harness.epd.clear().unwrap();
    let transactions = transactions(&harness.take());

    let height = HEIGHT as usize;
    assert_eq!(transactions.len(), 2 + 2 * height + 1);
    assert_eq!(transactions[0], cmd(0x10));
    assert!(transactions[1..=height]
        .iter()
        .all(|t| *t == Wire::Data(vec![0xFF; 100])));
    assert_eq!(transactions[height + 1], cmd(0x13));
    assert!(transactions[height + 2..=2 * height + 1]
        .iter()
        .all(|t| *t == Wire::Data(vec![0x00; 100])));
    assert_eq!(transactions[2 * height + 2], cmd(0x12));
    assert_eq!(harness.epd.state(), PanelState::Ready);
}

#[test]
fn sleep_powers_off_then_deep_sleeps() {
    let mut harness = ready();
    harness.epd.sleep().unwrap();
    let wire = wire(&harness.take());

    assert_eq!(
        wire,
        [cmd(0x02), cmd(0x07), data(&[0xA5]), Wire::DelayMs(2_000)]
    );
    // one read from init, one after power off, none after deep sleep
    assert_eq!(harness.busy.reads(), 2);
    assert_eq!(harness.epd.state(), PanelState::Asleep);
}

#[test]
fn full_lifecycle() {
    let mut harness = Harness::new(Config::default());
    harness.epd.init().unwrap();
    harness
        .epd
        .display_image(&HalfBlack, Threshold::DEFAULT)
        .unwrap();
    harness.epd.sleep().unwrap();
    let Harness { epd, log, .. } = harness;
    let parts = epd.close().unwrap();

    let events = log.borrow();
    assert_eq!(
        events[events.len() - 3..],
        [Event::Cs(false), Event::Dc(false), Event::Rst(false)]
    );

    let data_writes: Vec<usize> = transactions(&events)
        .into_iter()
        .filter_map(|t| match t {
            Wire::Data(bytes) if bytes.len() > 4 => Some(bytes.len()),
            _ => None,
        })
        .collect();
    assert_eq!(data_writes, [BUFFER_LEN, BUFFER_LEN]);
    drop(parts);
}

#[test]
fn operations_need_init() {
    let mut harness = Harness::new(Config::default());

    assert!(matches!(
        harness.epd.display_image(&HalfBlack, Threshold::DEFAULT),
        Err(ErrorKind::InvalidState(PanelState::Uninitialized))
    ));
    assert!(matches!(
        harness.epd.clear(),
        Err(ErrorKind::InvalidState(PanelState::Uninitialized))
    ));
    assert!(matches!(
        harness.epd.sleep(),
        Err(ErrorKind::InvalidState(PanelState::Uninitialized))
    ));
    assert!(harness.take().is_empty());
}

#[test]
fn asleep_needs_init_again() {
    let mut harness = ready();
    harness.epd.sleep().unwrap();
    harness.take();

    assert!(matches!(
        harness.epd.clear(),
        Err(ErrorKind::InvalidState(PanelState::Asleep))
    ));
    assert!(matches!(
        harness.epd.sleep(),
        Err(ErrorKind::InvalidState(PanelState::Asleep))
    ));
    assert!(harness.take().is_empty());

    harness.epd.init().unwrap();
    assert_eq!(transactions(&harness.take()), init_transactions());
    harness.epd.clear().unwrap();
}

#[test]
fn busy_timeout_is_reported() {
    let mut harness = Harness::new(
        Config::new()
            .with_busy_timeout_ms(50)
            .with_busy_poll_interval_us(10_000),
    );
    harness.busy.busy_for(u32::MAX);

    assert!(matches!(harness.epd.init(), Err(ErrorKind::Timeout)));
    assert_eq!(harness.epd.state(), PanelState::Uninitialized);
    // checked at 0, 10, .., 50ms
    assert_eq!(harness.busy.reads(), 6);

    // an interrupted init leaves the panel unusable until the next init
    assert!(matches!(
        harness.epd.clear(),
        Err(ErrorKind::InvalidState(PanelState::Uninitialized))
    ));

    harness.busy.busy_for(0);
    harness.epd.init().unwrap();
    assert_eq!(harness.epd.state(), PanelState::Ready);
}

#[test]
fn interrupted_refresh_requires_init() {
    let mut harness = Harness::new(Config::new().with_busy_timeout_ms(10));
    harness.epd.init().unwrap();
    harness.busy.busy_for(u32::MAX);

    assert!(matches!(harness.epd.clear(), Err(ErrorKind::Timeout)));
    assert_eq!(harness.epd.state(), PanelState::Clearing);
    assert!(matches!(
        harness.epd.display_frame(&[0u8; BUFFER_LEN]),
        Err(ErrorKind::InvalidState(PanelState::Clearing))
    ));
}

#[test]
fn long_frames_are_chunked_inside_one_transaction() {
    let mut harness = Harness::new(Config::new().with_max_transfer_len(4096));
    harness.epd.init().unwrap();
    harness.take();

    harness.epd.display_frame(&[0x5A; BUFFER_LEN]).unwrap();
    let events = harness.take();

    let writes: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            Event::Write(bytes) if bytes.len() > 1 => Some(bytes.len()),
            _ => None,
        })
        .collect();
    // 48000 = 11 * 4096 + 2944, twice
    assert_eq!(writes.len(), 24);
    assert!(writes[..11].iter().all(|&len| len == 4096));
    assert_eq!(writes[11], 2944);

    assert_eq!(
        transactions(&events),
        [
            cmd(0x10),
            Wire::Data(vec![0x5A; BUFFER_LEN]),
            cmd(0x13),
            Wire::Data(vec![0x5A; BUFFER_LEN]),
            cmd(0x12),
        ]
    );
}

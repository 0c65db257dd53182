// Draws some text through the canvas, then a gray gradient through the image packer,
// on a Raspberry Pi with the Waveshare 7.5" V2 HAT.
use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyle},
    pixelcolor::Gray8,
    prelude::*,
    text::{Baseline, Text},
};
use embedded_hal::delay::DelayNs;
use waveshare_7in5v2::{
    linux::{self, LinuxConfig},
    prelude::*,
};

/// Horizontal gradient from white to black
struct Gradient;

impl embedded_graphics::image::GetPixel for Gradient {
    type Color = Gray8;

    fn pixel(&self, p: Point) -> Option<Gray8> {
        Some(Gray8::new(255 - (p.x * 255 / 799) as u8))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut epd = linux::open(
        &LinuxConfig::default(),
        Config::new().with_busy_timeout_ms(30_000),
    )?;
    epd.init()?;
    println!("Device successfully initialized!");

    epd.clear()?;

    let mut canvas = Canvas::default();
    let style = MonoTextStyle::new(&FONT_10X20, Color::Black);
    for (rotation, text) in [
        (DisplayRotation::Rotate0, "Rotate 0!"),
        (DisplayRotation::Rotate90, "Rotate 90!"),
        (DisplayRotation::Rotate180, "Rotate 180!"),
        (DisplayRotation::Rotate270, "Rotate 270!"),
    ] {
        canvas.set_rotation(rotation);
        Text::with_baseline(text, Point::new(5, 50), style, Baseline::Top).draw(&mut canvas)?;
    }
    epd.display_frame(canvas.buffer())?;

    let mut delay = linux_embedded_hal::Delay;
    delay.delay_ms(5_000);

    println!("Gradient with the default threshold and with 128");
    epd.display_image(&Gradient, Threshold::DEFAULT)?;
    delay.delay_ms(5_000);
    epd.display_image(&Gradient, Threshold::new(128))?;

    println!("Finished tests - going to sleep");
    epd.sleep()?;
    epd.close()?;
    Ok(())
}

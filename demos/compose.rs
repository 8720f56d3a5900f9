//! Composites a sprite onto a background and writes the result to disk.
//!
//! Usage: `compose <output> [sprite]`. Without a sprite path, a generated one is used.

use raster_image::{BlendMode, Color, Image, Rect};

fn generated_sprite() -> Image {
    // Magenta marks the pixels that should become transparent.
    let mut sprite = Image::filled(16, 16, Color::MAGENTA);
    for y in 4..12 {
        for x in 2..14 {
            sprite.set_pixel(x, y, Color::from_rgba8(30, 160, 90, 255));
        }
    }
    sprite
}

fn main() -> anyhow::Result<()> {
    raster_image::init_logger!();

    let mut args = std::env::args_os().skip(1);
    let Some(output) = args.next() else {
        eprintln!("usage: compose <output> [sprite]");
        std::process::exit(1);
    };

    let mut sprite = match args.next() {
        Some(path) => Image::load(path)?,
        None => generated_sprite(),
    };
    sprite.apply_color_key_mask(Color::MAGENTA, 0);

    let mut canvas = Image::filled(64, 48, Color::from_rgb8(20, 20, 40));
    canvas.copy_from(&sprite, 4, 4).mode(BlendMode::Alpha);

    sprite.flip_horizontally();
    canvas
        .copy_from(&sprite, 40, 20)
        .source_rect(Rect::from_top_left(0, 0, sprite.width(), sprite.height() / 2))
        .mode(BlendMode::Alpha);

    canvas.flip_vertically();
    canvas.save(&output)?;
    log::info!("wrote {} image to {}", canvas.resolution(), output.to_string_lossy());

    Ok(())
}

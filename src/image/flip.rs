use image::imageops;

use super::Image;

/// Mirroring.
impl Image {
    /// Mirrors this image along its vertical axis, swapping the left and right sides.
    pub fn flip_horizontally(&mut self) {
        self.buf = imageops::flip_horizontal(&self.buf);
    }

    /// Mirrors this image along its horizontal axis, swapping the top and bottom rows.
    pub fn flip_vertically(&mut self) {
        self.buf = imageops::flip_vertical(&self.buf);
    }

    /// Returns a horizontally mirrored copy of this image.
    pub fn flipped_horizontally(&self) -> Image {
        Image {
            buf: imageops::flip_horizontal(&self.buf),
        }
    }

    /// Returns a vertically mirrored copy of this image.
    pub fn flipped_vertically(&self) -> Image {
        Image {
            buf: imageops::flip_vertical(&self.buf),
        }
    }
}

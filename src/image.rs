//! Image manipulation.
//!
//! This module provides:
//!
//! - The [`Image`] type, an owned RGBA8 image.
//! - [`Color`], an 8-bit RGBA color.
//! - [`Rect`], an integer rectangle used to select image regions.
//! - [`Blit`] and [`BlendMode`], describing a clipped copy from one image into another.

mod blend;
mod color;
mod flip;
mod rect;


use std::{fmt, io::Read, path::Path};

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::{
    codec::{DecodedImage, DefaultCodec, ImageCodec},
    resolution::Resolution,
    Error,
};

pub use blend::*;
pub use color::Color;
pub use rect::Rect;

/// An 8-bit RGBA image.
///
/// Pixels are stored row-major, top row first, with 4 bytes per pixel in `r, g, b, a` order and
/// no padding between rows. An image either has a non-zero width and height, or is empty (both
/// dimensions are 0 and no pixel data is stored).
#[derive(Clone)]
pub struct Image {
    pub(crate) buf: RgbaImage,
}

impl Image {
    /// Creates an empty image of size `0x0`.
    pub fn empty() -> Self {
        Self {
            buf: ImageBuffer::new(0, 0),
        }
    }

    /// Returns a new [`Image`] of the given size, with every pixel initialized to `color`.
    ///
    /// If `width` or `height` is 0, the result is empty.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let mut this = Self::empty();
        this.create(width, height, color);
        this
    }

    /// Creates an [`Image`] from raw, preexisting RGBA pixel data.
    ///
    /// `buf` needs to contain data in the following interleaved pixel format:
    /// `rrrrrrrr gggggggg bbbbbbbb aaaaaaaa`, one row after another.
    ///
    /// # Panics
    ///
    /// This will panic if `buf` is shorter than `width * height * 4` bytes.
    pub fn from_rgba8(width: u32, height: u32, buf: &[u8]) -> Self {
        let mut this = Self::empty();
        this.create_from_pixels(width, height, Some(buf));
        this
    }

    /// Loads an image from the filesystem, using the [`DefaultCodec`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut this = Self::empty();
        this.load_from_file(&DefaultCodec::new(), path)?;
        Ok(this)
    }

    /// Saves this image to the filesystem, using the [`DefaultCodec`].
    ///
    /// The path must have a supported file extension (`png`, `jpg`, `jpeg`, `bmp` or `tga`).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        self.save_to_file(&DefaultCodec::new(), path)
    }

    /// Resizes this image to `width x height` and sets every pixel to `color`.
    ///
    /// Any previous pixel data is discarded. If `width` or `height` is 0, the image becomes empty.
    pub fn create(&mut self, width: u32, height: u32, color: Color) {
        let (width, height) = normalize(width, height);
        self.buf = ImageBuffer::from_pixel(width, height, Rgba(color.0));
    }

    /// Replaces the contents of this image with a copy of `pixels`.
    ///
    /// If `pixels` is [`None`], or `width` or `height` is 0, the image becomes empty. Otherwise the
    /// first `width * height * 4` bytes of `pixels` are copied, in the layout described in
    /// [`Image::from_rgba8`].
    ///
    /// # Panics
    ///
    /// This will panic if `pixels` is shorter than `width * height * 4` bytes.
    pub fn create_from_pixels(&mut self, width: u32, height: u32, pixels: Option<&[u8]>) {
        let Some(pixels) = pixels else {
            self.buf = ImageBuffer::new(0, 0);
            return;
        };

        let (width, height) = normalize(width, height);
        let size = Resolution::new(width, height).num_bytes();
        assert!(
            pixels.len() >= size,
            "pixel buffer of {} bytes is too small for {}x{} image (need {} bytes)",
            pixels.len(),
            width,
            height,
            size,
        );

        let mut buf: RgbaImage = ImageBuffer::new(width, height);
        let data: &mut [u8] = &mut buf;
        data.copy_from_slice(&pixels[..size]);
        self.buf = buf;
    }

    /// Replaces the contents of this image with an image decoded from the file at `path`.
    ///
    /// If decoding fails, `self` is left unchanged.
    pub fn load_from_file<C, P>(&mut self, codec: &C, path: P) -> Result<(), Error>
    where
        C: ImageCodec + ?Sized,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let decoded = codec.decode_file(path)?;
        log::debug!(
            "loaded {}x{} image from '{}'",
            decoded.width,
            decoded.height,
            path.display(),
        );
        self.replace_with(decoded)
    }

    /// Replaces the contents of this image with an image decoded from an in-memory file.
    ///
    /// If decoding fails, `self` is left unchanged.
    pub fn load_from_memory<C>(&mut self, codec: &C, data: &[u8]) -> Result<(), Error>
    where
        C: ImageCodec + ?Sized,
    {
        let decoded = codec.decode(data)?;
        self.replace_with(decoded)
    }

    /// Replaces the contents of this image with an image decoded from `reader`.
    ///
    /// If decoding fails, `self` is left unchanged.
    pub fn load_from_stream<C, R>(&mut self, codec: &C, mut reader: R) -> Result<(), Error>
    where
        C: ImageCodec + ?Sized,
        R: Read,
    {
        let decoded = codec.decode_reader(&mut reader)?;
        self.replace_with(decoded)
    }

    /// Encodes this image and writes it to `path`.
    ///
    /// Empty images cannot be saved and result in [`Error::EmptyImage`].
    pub fn save_to_file<C, P>(&self, codec: &C, path: P) -> Result<(), Error>
    where
        C: ImageCodec + ?Sized,
        P: AsRef<Path>,
    {
        if self.is_empty() {
            return Err(Error::EmptyImage);
        }

        let path = path.as_ref();
        codec.encode(self.buf.as_raw(), self.width(), self.height(), path)?;
        log::debug!("saved {} image to '{}'", self.resolution(), path.display());
        Ok(())
    }

    fn replace_with(&mut self, decoded: DecodedImage) -> Result<(), Error> {
        let (width, height) = normalize(decoded.width, decoded.height);
        if (width, height) == (0, 0) {
            self.buf = ImageBuffer::new(0, 0);
            return Ok(());
        }

        let expected = Resolution::new(width, height).num_bytes();
        let actual = decoded.pixels.len();
        let size_error = Error::BufferSize {
            width,
            height,
            expected,
            actual,
        };
        if actual != expected {
            return Err(size_error);
        }
        self.buf = ImageBuffer::from_raw(width, height, decoded.pixels).ok_or(size_error)?;
        Ok(())
    }

    /// Returns the width of this image, in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    /// Returns the height of this image, in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    /// Returns the size of this image.
    #[inline]
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width(), self.height())
    }

    /// Returns whether this image contains no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.as_raw().is_empty()
    }

    /// Returns a [`Rect`] covering this image.
    ///
    /// The rectangle will be positioned at `(0, 0)` and have the width and height of the image.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_top_left(0, 0, self.width(), self.height())
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(
            x < self.width() && y < self.height(),
            "pixel ({x}, {y}) out of bounds for {} image",
            self.resolution(),
        );
        (x as usize + y as usize * self.width() as usize) * 4
    }

    /// Gets the image color at the given pixel coordinates.
    ///
    /// The coordinates are not validated beyond a debug assertion: an `x` outside the image width
    /// addresses a pixel on a following row.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` addresses a pixel past the end of the pixel buffer.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let offset = self.offset(x, y);
        Color::from_bytes(&self.buf.as_raw()[offset..offset + 4])
    }

    /// Sets the image color at the given pixel coordinates.
    ///
    /// The same caveats as for [`Image::pixel`] apply.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` addresses a pixel past the end of the pixel buffer.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        let data: &mut [u8] = &mut self.buf;
        data[offset..offset + 4].copy_from_slice(&color.0);
    }

    /// Returns the raw RGBA pixel data of this image.
    ///
    /// Returns [`None`] and logs a warning when the image is empty.
    pub fn pixels(&self) -> Option<&[u8]> {
        if self.is_empty() {
            log::warn!("trying to access the pixels of an empty image");
            return None;
        }
        Some(self.buf.as_raw())
    }

    /// Sets every pixel in the [`Image`] to the given [`Color`].
    pub fn clear(&mut self, color: Color) {
        self.buf.pixels_mut().for_each(|pix| pix.0 = color.0);
    }

    /// Sets the alpha channel of every pixel that exactly matches `key` to `alpha`.
    ///
    /// Matching compares all four channels, including alpha: to key out opaque red, pass
    /// [`Color::RED`] (which has an alpha of 255), not `Color::RED.with_alpha(0)`.
    pub fn apply_color_key_mask(&mut self, key: Color, alpha: u8) {
        for pix in self.buf.pixels_mut().filter(|pix| pix.0 == key.0) {
            pix.0[3] = alpha;
        }
    }

    /// Copies a region of `src` into `self`, placing its top left corner at `(dest_x, dest_y)`.
    ///
    /// By default, the entire `src` image is copied and its pixels overwrite the destination.
    /// The returned [`Blit`] can be used to select a different source region or blend mode, and
    /// will perform the operation when dropped.
    ///
    /// Parts of the region that would fall outside of either image are clipped away.
    #[doc(alias = "blit")]
    pub fn copy_from<'a>(&'a mut self, src: &'a Image, dest_x: u32, dest_y: u32) -> Blit<'a> {
        Blit::new(self, src, dest_x, dest_y)
    }
}

impl Default for Image {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.resolution() == other.resolution() && self.buf.as_raw() == other.buf.as_raw()
    }
}

impl Eq for Image {}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} Image", self.width(), self.height())
    }
}

/// Collapses sizes with a single zero dimension into the empty size.
fn normalize(width: u32, height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        (0, 0)
    } else {
        (width, height)
    }
}

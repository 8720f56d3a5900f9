use std::thread;

use super::{Color, Image, Rect};

/// Describes how to combine pixels in a [`Blit`] operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// All destination pixels will be overwritten with the corresponding source pixel, including
    /// its alpha channel.
    #[default]
    Overwrite,

    /// Performs alpha blending between source and destination pixels to make the source image
    /// appear in front of the destination image.
    Alpha,
}

/// A clipped copy of a region of one image into another.
///
/// Returned by [`Image::copy_from`]. The copy is performed when the [`Blit`] is dropped.
///
/// The source and destination are always distinct images, so the copied regions can never alias.
pub struct Blit<'a> {
    dest: &'a mut Image,
    src: &'a Image,
    dest_x: u32,
    dest_y: u32,
    source_rect: Rect,
    mode: BlendMode,
}

impl<'a> Blit<'a> {
    pub(super) fn new(dest: &'a mut Image, src: &'a Image, dest_x: u32, dest_y: u32) -> Self {
        Self {
            dest,
            src,
            dest_x,
            dest_y,
            source_rect: Rect::ZERO,
            mode: BlendMode::Overwrite,
        }
    }

    /// Selects the area of the source image to copy.
    ///
    /// A rectangle with a width or height of 0 (like [`Rect::ZERO`], the default) selects the
    /// entire source image. Otherwise, a negative top-left corner is moved to `(0, 0)` and the
    /// rectangle's width and height are limited to the source image's width and height.
    pub fn source_rect(&mut self, rect: Rect) -> &mut Self {
        self.source_rect = rect;
        self
    }

    /// Sets the blend mode to use.
    pub fn mode(&mut self, mode: BlendMode) -> &mut Self {
        self.mode = mode;
        self
    }

    fn region(&self) -> Option<Region> {
        clip(
            self.src,
            self.dest,
            self.dest_x,
            self.dest_y,
            self.source_rect,
        )
    }
}

impl Drop for Blit<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            return;
        }

        let Some(region) = self.region() else {
            log::trace!(
                "skipping copy of {:?} from {:?} to ({}, {}) in {:?}: nothing to copy",
                self.source_rect,
                self.src,
                self.dest_x,
                self.dest_y,
                self.dest,
            );
            return;
        };

        let src_stride = self.src.width() as usize * 4;
        let dest_stride = self.dest.width() as usize * 4;
        let pitch = region.width * 4;

        let src_pixels = self.src.buf.as_raw();
        let dest_pixels: &mut [u8] = &mut self.dest.buf;

        let mut src_start = region.src_x * 4 + region.src_y * src_stride;
        let mut dest_start = region.dest_x * 4 + region.dest_y * dest_stride;
        for _ in 0..region.height {
            let src_row = &src_pixels[src_start..src_start + pitch];
            let dest_row = &mut dest_pixels[dest_start..dest_start + pitch];
            match self.mode {
                BlendMode::Overwrite => dest_row.copy_from_slice(src_row),
                BlendMode::Alpha => {
                    for (dest, src) in dest_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
                        let result = blend_alpha(Color::from_bytes(dest), Color::from_bytes(src));
                        dest.copy_from_slice(&result.0);
                    }
                }
            }

            src_start += src_stride;
            dest_start += dest_stride;
        }
    }
}

/// A source/destination region pair that lies entirely inside both images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    src_x: usize,
    src_y: usize,
    dest_x: usize,
    dest_y: usize,
    width: usize,
    height: usize,
}

/// Computes the area of a copy of `source_rect` from `src` to `(dest_x, dest_y)` in `dest`.
///
/// Returns `None` if nothing would be copied.
fn clip(src: &Image, dest: &Image, dest_x: u32, dest_y: u32, source_rect: Rect) -> Option<Region> {
    if dest_x >= dest.width() || dest_y >= dest.height() {
        return None;
    }

    let source_rect = if source_rect.is_empty() {
        src.rect()
    } else {
        let (left, top) = (source_rect.x().max(0), source_rect.y().max(0));
        if left as u32 >= src.width() || top as u32 >= src.height() {
            return None;
        }
        Rect::from_top_left(
            left,
            top,
            source_rect.width().min(src.width()),
            source_rect.height().min(src.height()),
        )
    };
    // Caps the selection to what is left of the source past its top left corner.
    let source_rect = source_rect.intersection(&src.rect())?;

    let dest_rect = Rect::from_top_left(
        i32::try_from(dest_x).ok()?,
        i32::try_from(dest_y).ok()?,
        source_rect.width(),
        source_rect.height(),
    )
    .intersection(&dest.rect())?;

    Some(Region {
        src_x: source_rect.x() as usize,
        src_y: source_rect.y() as usize,
        dest_x: dest_rect.x() as usize,
        dest_y: dest_rect.y() as usize,
        width: dest_rect.width() as usize,
        height: dest_rect.height() as usize,
    })
}

/// Blends `src` over `dest`, weighted by the alpha channel of `src`.
///
/// The color channels use `(src * a + dest * (255 - a)) / 255`. The resulting alpha is
/// `a + dest.a * (255 - a) / 255`; only the second term is scaled.
pub fn blend_alpha(dest: Color, src: Color) -> Color {
    let alpha = u32::from(src.a());
    let inv_alpha = 255 - alpha;

    let blend_channel =
        |dest: u8, src: u8| ((u32::from(src) * alpha + u32::from(dest) * inv_alpha) / 255) as u8;

    Color([
        blend_channel(dest.r(), src.r()),
        blend_channel(dest.g(), src.g()),
        blend_channel(dest.b(), src.b()),
        (alpha + u32::from(dest.a()) * inv_alpha / 255) as u8,
    ])
}

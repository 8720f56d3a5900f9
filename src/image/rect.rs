use std::fmt;

use embedded_graphics::prelude::*;

/// An axis-aligned rectangle.
///
/// This rectangle type uses a (signed) integer top-left corner and an unsigned size, and is used
/// to select regions of an [`Image`][super::Image]. It may lie partially or completely outside of
/// the image it is used with; operations taking a [`Rect`] clip it as needed.
///
/// Rectangles are allowed to have zero height and/or width.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub(crate) rect: embedded_graphics::primitives::Rectangle,
}

impl Rect {
    /// A rectangle at the origin with zero width and height.
    ///
    /// When passed to [`Blit::source_rect`][super::Blit::source_rect], this selects the whole
    /// source image.
    pub const ZERO: Self = Self {
        rect: embedded_graphics::primitives::Rectangle {
            top_left: Point { x: 0, y: 0 },
            size: Size {
                width: 0,
                height: 0,
            },
        },
    };

    /// Creates a rectangle extending downwards and right from a point.
    #[inline]
    pub fn from_top_left(top_left_x: i32, top_left_y: i32, width: u32, height: u32) -> Self {
        Self {
            rect: embedded_graphics::primitives::Rectangle {
                top_left: Point {
                    x: top_left_x,
                    y: top_left_y,
                },
                size: Size { width, height },
            },
        }
    }

    /// Returns the X coordinate of the left side of the rectangle.
    #[inline]
    pub fn x(&self) -> i32 {
        self.rect.top_left.x
    }

    /// Returns the Y coordinate of the top side of the rectangle.
    #[inline]
    pub fn y(&self) -> i32 {
        self.rect.top_left.y
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.rect.size.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.rect.size.height
    }

    /// Returns whether this rectangle has a width or height of 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Computes the intersection of `self` and `other`.
    ///
    /// Returns `None` when the rectangles do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let rect = self.rect.intersection(&other.rect);
        if rect.is_zero_sized() {
            None
        } else {
            Some(Self { rect })
        }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = self.rect.top_left.x;
        let y = self.rect.top_left.y;
        let w = self.rect.size.width;
        let h = self.rect.size.height;
        let bx = i64::from(x) + i64::from(w);
        let by = i64::from(y) + i64::from(h);
        write!(f, "Rect @ ({x},{y})-({bx},{by})/{w}x{h}")
    }
}

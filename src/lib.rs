//! Owned RGBA8 raster images.
//!
//! # Overview
//!
//! The [`Image`] type owns a tightly packed, row-major buffer of 8-bit RGBA pixels. It supports:
//!
//! - solid-fill and bulk-copy construction ([`Image::filled`], [`Image::from_rgba8`]),
//! - color keying ([`Image::apply_color_key_mask`]),
//! - clipped rectangle copies between images, optionally alpha-blended ([`Image::copy_from`]),
//! - direct pixel access ([`Image::pixel`], [`Image::set_pixel`], [`Image::pixels`]),
//! - in-place horizontal and vertical flips.
//!
//! Decoding and encoding of image files is delegated to an [`ImageCodec`]. [`DefaultCodec`] is
//! backed by the `image` crate.
//!
//! # Environment Variables
//!
//! * `RASTER_JPEG_QUALITY`: JPEG quality used by [`DefaultCodec`] when saving `.jpg`/`.jpeg`
//!   files, in range 1 to 100. Defaults to 90.

use log::LevelFilter;

pub mod codec;
pub mod image;
pub mod resolution;

mod error;

pub use codec::{DecodedImage, DefaultCodec, ImageCodec};
pub use error::{Error, Result};
pub use crate::image::{BlendMode, Blit, Color, Image, Rect};
pub use resolution::Resolution;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this crate will log at *debug* level. `RUST_LOG` can be used to
/// override this.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}

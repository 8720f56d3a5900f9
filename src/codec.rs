//! Image decoding and encoding.
//!
//! [`Image`][crate::Image] never parses file formats itself. Loading and saving goes through an
//! [`ImageCodec`], which exchanges pixel data in the same layout [`Image`][crate::Image] uses:
//! tightly packed 8-bit RGBA, row-major, top row first.

use std::{
    env::{self, VarError},
    fs::{self, File},
    io::{BufWriter, Read, Write},
    path::Path,
    sync::OnceLock,
};

use image::codecs::jpeg::JpegEncoder;

use crate::{resolution::Resolution, Error};

const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Pixel data produced by [`ImageCodec::decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// RGBA8 pixels, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Converts between encoded image files and raw RGBA8 pixel data.
pub trait ImageCodec {
    /// Decodes an in-memory image file.
    fn decode(&self, data: &[u8]) -> Result<DecodedImage, Error>;

    /// Decodes the image file at `path`.
    fn decode_file(&self, path: &Path) -> Result<DecodedImage, Error> {
        let data = fs::read(path)?;
        self.decode(&data)
    }

    /// Reads `reader` to its end and decodes the contents.
    fn decode_reader(&self, reader: &mut dyn Read) -> Result<DecodedImage, Error> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.decode(&data)
    }

    /// Encodes `pixels` and writes the result to `path`.
    ///
    /// The output format is chosen by the codec, typically based on the file extension of `path`.
    fn encode(&self, pixels: &[u8], width: u32, height: u32, path: &Path) -> Result<(), Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
    Tga,
}

impl ImageFormat {
    fn from_path(path: &Path) -> Result<Self, Error> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            Some("bmp") => Ok(Self::Bmp),
            Some("tga") => Ok(Self::Tga),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// An [`ImageCodec`] backed by the `image` crate.
///
/// Decoding detects the format from the file contents and supports PNG, JPEG, GIF and BMP. When
/// decoding from a file, the file extension is used if the contents are inconclusive, which also
/// enables TGA files. Encoding picks the format from the file extension (`png`, `jpg`, `jpeg`,
/// `bmp` or `tga`).
/// JPEG files do not store an alpha channel, so it is dropped when saving them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCodec {
    jpeg_quality: Option<u8>,
}

impl DefaultCodec {
    /// Creates a codec that uses the JPEG quality configured via `RASTER_JPEG_QUALITY`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the JPEG quality used when saving, clamped to the range 1 to 100.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality.clamp(1, 100));
        self
    }

    /// Returns the JPEG quality this codec will encode with.
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality.unwrap_or_else(configured_jpeg_quality)
    }
}

impl ImageCodec for DefaultCodec {
    fn decode(&self, data: &[u8]) -> Result<DecodedImage, Error> {
        Ok(to_decoded(image::load_from_memory(data)?))
    }

    fn decode_file(&self, path: &Path) -> Result<DecodedImage, Error> {
        let image = image::io::Reader::open(path)?
            .with_guessed_format()?
            .decode()?;
        Ok(to_decoded(image))
    }

    fn encode(&self, pixels: &[u8], width: u32, height: u32, path: &Path) -> Result<(), Error> {
        let expected = Resolution::new(width, height).num_bytes();
        if pixels.len() != expected {
            return Err(Error::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        let format = ImageFormat::from_path(path)?;
        log::trace!("encoding {width}x{height} image as {format:?}");
        match format {
            ImageFormat::Png => save(path, pixels, width, height, image::ImageFormat::Png),
            ImageFormat::Bmp => save(path, pixels, width, height, image::ImageFormat::Bmp),
            ImageFormat::Tga => save(path, pixels, width, height, image::ImageFormat::Tga),
            ImageFormat::Jpeg => {
                let rgb = pixels
                    .chunks_exact(4)
                    .flat_map(|pix| &pix[..3])
                    .copied()
                    .collect::<Vec<u8>>();
                let mut writer = BufWriter::new(File::create(path)?);
                JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality()).encode(
                    &rgb,
                    width,
                    height,
                    image::ColorType::Rgb8,
                )?;
                writer.flush()?;
                Ok(())
            }
        }
    }
}

fn to_decoded(image: image::DynamicImage) -> DecodedImage {
    let buf = image.into_rgba8();
    let (width, height) = buf.dimensions();
    DecodedImage {
        pixels: buf.into_raw(),
        width,
        height,
    }
}

fn save(
    path: &Path,
    pixels: &[u8],
    width: u32,
    height: u32,
    format: image::ImageFormat,
) -> Result<(), Error> {
    image::save_buffer_with_format(path, pixels, width, height, image::ColorType::Rgba8, format)?;
    Ok(())
}

fn parse_jpeg_quality(value: &str) -> Option<u8> {
    match value.trim().parse::<u8>() {
        Ok(quality @ 1..=100) => Some(quality),
        _ => None,
    }
}

fn configured_jpeg_quality() -> u8 {
    static QUALITY: OnceLock<u8> = OnceLock::new();
    *QUALITY.get_or_init(|| match env::var("RASTER_JPEG_QUALITY") {
        Ok(v) => parse_jpeg_quality(&v).unwrap_or_else(|| {
            log::warn!(
                "invalid value set for `RASTER_JPEG_QUALITY` variable: '{v}'; using {DEFAULT_JPEG_QUALITY}"
            );
            DEFAULT_JPEG_QUALITY
        }),
        Err(VarError::NotPresent) => DEFAULT_JPEG_QUALITY,
        Err(VarError::NotUnicode(s)) => {
            log::warn!(
                "invalid value set for `RASTER_JPEG_QUALITY` variable: {}; using {DEFAULT_JPEG_QUALITY}",
                s.to_string_lossy()
            );
            DEFAULT_JPEG_QUALITY
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(ImageFormat::from_path("a.png".as_ref()).unwrap(), ImageFormat::Png);
        assert_eq!(ImageFormat::from_path("a.JPG".as_ref()).unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path("dir/a.jpeg".as_ref()).unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path("a.bmp".as_ref()).unwrap(), ImageFormat::Bmp);
        assert_eq!(ImageFormat::from_path("a.tga".as_ref()).unwrap(), ImageFormat::Tga);
        assert!(matches!(
            ImageFormat::from_path("a.webp".as_ref()),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            ImageFormat::from_path("noext".as_ref()),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn jpeg_quality_values() {
        assert_eq!(parse_jpeg_quality("75"), Some(75));
        assert_eq!(parse_jpeg_quality(" 100\n"), Some(100));
        assert_eq!(parse_jpeg_quality("0"), None);
        assert_eq!(parse_jpeg_quality("101"), None);
        assert_eq!(parse_jpeg_quality("high"), None);

        assert_eq!(DefaultCodec::new().with_jpeg_quality(0).jpeg_quality(), 1);
        assert_eq!(DefaultCodec::new().with_jpeg_quality(200).jpeg_quality(), 100);
        assert_eq!(DefaultCodec::new().with_jpeg_quality(42).jpeg_quality(), 42);
    }

    #[test]
    fn encode_rejects_wrong_buffer_size() {
        let err = DefaultCodec::new()
            .encode(&[0; 7], 1, 2, "out.png".as_ref())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::BufferSize {
                expected: 8,
                actual: 7,
                ..
            }
        ));
    }

    #[test]
    fn decode_garbage() {
        assert!(matches!(
            DefaultCodec::new().decode(b"definitely not an image"),
            Err(Error::Image(_))
        ));
    }
}

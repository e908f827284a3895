//! Image assets: `data:` URL parsing and raster decoding.
//!
//! Exporters embed only images carried inline. Network URLs are never
//! fetched; callers render a placeholder instead.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

use crate::ports::ExportError;

/// Payload of a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// A decoded raster image, flattened onto white.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// 8-bit RGB samples, row-major.
    pub rgb: Vec<u8>,
    /// Original encoded bytes.
    pub encoded: Vec<u8>,
    pub format: ImageFormat,
}

impl DecodedImage {
    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }

    /// Bytes and extension suitable for a word-processing package.
    ///
    /// PNG, JPEG and GIF pass through; anything else is re-encoded as PNG.
    pub fn portable(&self) -> Result<(Vec<u8>, &'static str), ExportError> {
        match self.format {
            ImageFormat::Png => Ok((self.encoded.clone(), "png")),
            ImageFormat::Jpeg => Ok((self.encoded.clone(), "jpeg")),
            ImageFormat::Gif => Ok((self.encoded.clone(), "gif")),
            _ => {
                let raster = RgbImage::from_raw(self.width, self.height, self.rgb.clone())
                    .ok_or_else(|| ExportError::image("raster size mismatch"))?;
                let mut out = Cursor::new(Vec::new());
                DynamicImage::ImageRgb8(raster)
                    .write_to(&mut out, ImageFormat::Png)
                    .map_err(|e| ExportError::image(e.to_string()))?;
                Ok((out.into_inner(), "png"))
            }
        }
    }
}

/// Where an image reference leads.
#[derive(Debug, Clone)]
pub enum ImageAsset {
    /// Inline data that decoded cleanly.
    Embedded(DecodedImage),
    /// A network reference; not fetched.
    Remote(String),
    /// Inline data that could not be decoded.
    Unreadable(String),
    /// No reference at all.
    Missing,
}

/// True for `data:` URLs.
pub fn is_data_url(src: &str) -> bool {
    src.trim_start()
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Parses `data:<mime>[;param]*[;base64],<payload>`.
pub fn parse_data_url(src: &str) -> Result<DataUrl, ExportError> {
    let src = src.trim();
    if !is_data_url(src) {
        return Err(ExportError::image("not a data URL"));
    }

    let (header, payload) = src[5..]
        .split_once(',')
        .ok_or_else(|| ExportError::image("data URL has no payload separator"))?;

    let mut params = header.split(';');
    let mime_type = params
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or("text/plain")
        .to_ascii_lowercase();
    let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        BASE64
            .decode(compact.as_bytes())
            .map_err(|e| ExportError::image(format!("invalid base64 payload: {}", e)))?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok(DataUrl { mime_type, bytes })
}

/// File extension for an image MIME type.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/bmp" => "bmp",
        _ => "bin",
    }
}

/// Decodes encoded image bytes, compositing any alpha onto white.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, ExportError> {
    let format = image::guess_format(bytes).map_err(|e| ExportError::image(e.to_string()))?;
    let decoded =
        image::load_from_memory_with_format(bytes, format).map_err(|e| ExportError::image(e.to_string()))?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::image("image has no pixels"));
    }

    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        for channel in [r, g, b] {
            let blended = (u16::from(channel) * alpha + 255 * (255 - alpha)) / 255;
            rgb.push(blended as u8);
        }
    }

    Ok(DecodedImage {
        width,
        height,
        rgb,
        encoded: bytes.to_vec(),
        format,
    })
}

/// Encodes image file bytes as a base64 `data:` URL.
///
/// The MIME type comes from the content, not a file name.
pub fn to_data_url(bytes: &[u8]) -> Result<String, ExportError> {
    let format = image::guess_format(bytes).map_err(|e| ExportError::image(e.to_string()))?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        BASE64.encode(bytes)
    ))
}

/// Resolves an image reference into something an exporter can act on.
///
/// Decoding failures are logged and returned as [`ImageAsset::Unreadable`].
pub fn load_image(src: &str) -> ImageAsset {
    let src = src.trim();
    if src.is_empty() {
        return ImageAsset::Missing;
    }
    if !is_data_url(src) {
        return ImageAsset::Remote(src.to_string());
    }

    match parse_data_url(src).and_then(|data| decode_image(&data.bytes)) {
        Ok(image) => ImageAsset::Embedded(image),
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to placeholder for unreadable image");
            ImageAsset::Unreadable(e.to_string())
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use image::Rgba;

    /// A `width` x `height` PNG as a `data:` URL.
    pub fn png_data_url(width: u32, height: u32) -> String {
        let image = image::RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut out, ImageFormat::Png)
            .expect("png encodes");
        format!("data:image/png;base64,{}", BASE64.encode(out.into_inner()))
    }
}

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use crate::config::TargetFormat;
use crate::ports::ContentProbe;

/// Checks that bytes carry a decodable header of one image format.
///
/// Only the header is decoded (dimensions), not the pixel data.
pub struct ImageProbe {
    format: ImageFormat,
}

impl ImageProbe {
    pub fn new(target: TargetFormat) -> Self {
        Self {
            format: target.image_format(),
        }
    }
}

impl ContentProbe for ImageProbe {
    fn matches(&self, bytes: &[u8]) -> bool {
        ImageReader::with_format(Cursor::new(bytes), self.format)
            .into_dimensions()
            .is_ok()
    }
}

/// A 2x2 PNG, for tests that need real image content.
#[cfg(test)]
pub(crate) fn tiny_png() -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image::RgbImage::new(2, 2))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_probe_accepts_png() {
        assert!(ImageProbe::new(TargetFormat::Png).matches(&tiny_png()));
    }

    #[test]
    fn png_probe_rejects_other_bytes() {
        let probe = ImageProbe::new(TargetFormat::Png);
        assert!(!probe.matches(b"%PDF-1.7 not an image"));
        assert!(!probe.matches(&[]));
        // truncated signature
        assert!(!probe.matches(&tiny_png()[..6]));
    }

    #[test]
    fn jpeg_probe_rejects_png() {
        assert!(!ImageProbe::new(TargetFormat::Jpeg).matches(&tiny_png()));
    }
}

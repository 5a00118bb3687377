use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Pixels per QR module.
    pub module_size: u32,
    /// Quiet zone width in modules.
    pub margin: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module_size: 8,
            margin: 4,
        }
    }
}

/// Turns a finished payload into something a phone can scan.
pub trait QrRenderer: Send + Sync {
    fn render(&self, payload: &str) -> Result<String, RenderError>;
}

/// Renders a PNG and returns it as a `data:image/png;base64,` URL.
#[derive(Debug, Clone, Default)]
pub struct PngDataUrlRenderer {
    options: RenderOptions,
}

impl PngDataUrlRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn render_png(&self, payload: &str) -> Result<Vec<u8>, RenderError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)?;
        let width = code.width() as u32;
        let scale = self.options.module_size.max(1);
        let border = self.options.margin;
        let img_size = (width + 2 * border) * scale;

        let colors = code.to_colors();
        let img = GrayImage::from_fn(img_size, img_size, |px, py| {
            let x = px / scale;
            let y = py / scale;
            let inside = x >= border && y >= border && x < border + width && y < border + width;
            if inside && colors[((y - border) * width + (x - border)) as usize] == Color::Dark {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        });

        let mut png_bytes = Vec::new();
        DynamicImage::ImageLuma8(img).write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)?;
        Ok(png_bytes)
    }
}

impl QrRenderer for PngDataUrlRenderer {
    fn render(&self, payload: &str) -> Result<String, RenderError> {
        let png = self.render_png(payload)?;
        Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_render_png() {
        let renderer = PngDataUrlRenderer::default();
        let png = renderer
            .render_png("00020101021129370016A000000677010111011300668123456785802TH530376463045D82")
            .unwrap();
        assert_eq!(&png[..8], &PNG_MAGIC);
    }

    #[test]
    fn test_render_data_url() {
        let renderer = PngDataUrlRenderer::new(RenderOptions { module_size: 2, margin: 1 });
        let url = renderer.render("000201").unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        let decoded = BASE64.decode(&url["data:image/png;base64,".len()..]).unwrap();
        assert_eq!(&decoded[..8], &PNG_MAGIC);
    }

    #[test]
    fn test_payload_too_large() {
        let renderer = PngDataUrlRenderer::default();
        let huge = "9".repeat(8000);
        assert!(matches!(renderer.render(&huge), Err(RenderError::Encode(_))));
    }
}

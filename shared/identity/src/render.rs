use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};

use crate::{IdentityError, ImageOptions};

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// PNG rendering of a QR code. Two renderings of the same token decode to
/// the same string but are not guaranteed to be byte-identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTokenImage {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl RenderedTokenImage {
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// Renders `data` as a square QR code with medium error correction.
///
/// Modules are drawn at the largest whole pixel scale that leaves at least
/// `options.margin` light modules on every side, then centred.
pub fn render_qr(data: &str, options: ImageOptions) -> Result<RenderedTokenImage, IdentityError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
        .map_err(IdentityError::QrEncode)?;

    let modules = code.width() as u32;
    let span = options.margin.saturating_mul(2).saturating_add(modules);
    let scale = options.size / span;
    if scale == 0 {
        return Err(IdentityError::ImageTooSmall {
            size: options.size,
            modules: span,
        });
    }
    let offset = (options.size - modules * scale) / 2;

    let mut canvas = GrayImage::from_pixel(options.size, options.size, LIGHT);
    for (idx, color) in code.to_colors().into_iter().enumerate() {
        if color != Color::Dark {
            continue;
        }
        let x0 = offset + (idx as u32 % modules) * scale;
        let y0 = offset + (idx as u32 / modules) * scale;
        for y in y0..y0 + scale {
            for x in x0..x0 + scale {
                canvas.put_pixel(x, y, DARK);
            }
        }
    }

    let mut png = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(RenderedTokenImage {
        png,
        width: options.size,
        height: options.size,
    })
}

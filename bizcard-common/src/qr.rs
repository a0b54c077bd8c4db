//! QR encoder
//!
//! Renders text as a black-on-white PNG. Error correction is fixed at level L
//! and the symbol version is the smallest that fits the payload; module size
//! and quiet-zone border are the same for every code so cards line up.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};

use crate::{Error, Result};

/// Pixels per QR module
pub const BOX_SIZE: u32 = 10;

/// Quiet-zone width in modules
pub const BORDER: u32 = 4;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Encode `text` as a PNG QR code
pub fn encode(text: &str) -> Result<Vec<u8>> {
    let image = render(text)?;

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| Error::Encoding(format!("PNG write failed: {}", e)))?;

    Ok(png)
}

/// Rasterize `text` into a grayscale image without compressing it
pub fn render(text: &str) -> Result<GrayImage> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::L)
        .map_err(|e| Error::Encoding(format!("QR encode failed: {}", e)))?;

    let modules = code.width() as u32;
    let colors = code.to_colors();
    let side = image_side(modules);

    Ok(GrayImage::from_fn(side, side, |x, y| {
        let mx = (x / BOX_SIZE).checked_sub(BORDER);
        let my = (y / BOX_SIZE).checked_sub(BORDER);
        match (mx, my) {
            (Some(mx), Some(my)) if mx < modules && my < modules => {
                match colors[(my * modules + mx) as usize] {
                    Color::Dark => DARK,
                    Color::Light => LIGHT,
                }
            }
            _ => LIGHT,
        }
    }))
}

/// Side length in pixels of the image for a symbol `modules` wide
pub fn image_side(modules: u32) -> u32 {
    (modules + 2 * BORDER) * BOX_SIZE
}

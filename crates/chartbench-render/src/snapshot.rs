use serde::{Deserialize, Serialize};

/// Parameters for a raster snapshot of the live instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnapshotOptions {
    /// Device pixels per layout pixel.
    pub pixel_ratio: f64,
    /// Solid fill behind the chart, as `#rrggbb`.
    pub background: String,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            pixel_ratio: 2.0,
            background: "#ffffff".to_string(),
        }
    }
}

/// Encoded image bytes as produced by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
    /// File extension without the dot.
    pub extension: String,
}

/// Parse `#rgb` or `#rrggbb`.
pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgb[i] = v * 16 + v;
            }
            Some(rgb)
        }
        6 => Some([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?]),
        _ => None,
    }
}

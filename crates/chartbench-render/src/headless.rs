//! Software engine with no native context.
//!
//! It keeps the applied specification and produces solid-background
//! snapshots, which is enough for the CLI and for exercising the lifecycle
//! without a real chart library.

use std::io::Cursor;

use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};

use chartbench_core::{Backend, EngineMode, Specification};

use crate::engine::{EngineInstance, RenderBackend};
use crate::error::EngineError;
use crate::snapshot::{parse_hex_color, RasterImage, SnapshotOptions};
use crate::surface::SurfaceBox;

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    instances_created: u64,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instances_created(&self) -> u64 {
        self.instances_created
    }
}

impl RenderBackend for HeadlessBackend {
    type Instance = HeadlessInstance;

    fn instantiate(
        &mut self,
        surface: &SurfaceBox,
        mode: EngineMode,
    ) -> Result<HeadlessInstance, EngineError> {
        self.instances_created += 1;
        Ok(HeadlessInstance {
            surface: *surface,
            mode,
            spec: None,
            updates: 0,
            disposed: false,
        })
    }
}

#[derive(Debug)]
pub struct HeadlessInstance {
    surface: SurfaceBox,
    mode: EngineMode,
    spec: Option<Specification>,
    updates: usize,
    disposed: bool,
}

impl HeadlessInstance {
    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn surface(&self) -> &SurfaceBox {
        &self.surface
    }

    pub fn specification(&self) -> Option<&Specification> {
        self.spec.as_ref()
    }

    pub fn update_count(&self) -> usize {
        self.updates
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn scaled_size(&self, pixel_ratio: f64) -> (u32, u32) {
        let scale = |px: u32| (px as f64 * pixel_ratio).round().max(0.0) as u32;
        (scale(self.surface.width_px), scale(self.surface.height_px))
    }
}

impl EngineInstance for HeadlessInstance {
    fn set_specification(&mut self, spec: &Specification) -> Result<(), EngineError> {
        if self.disposed {
            return Err(EngineError::Disposed);
        }
        self.spec = Some(spec.clone());
        self.updates += 1;
        Ok(())
    }

    fn resize(&mut self, surface: &SurfaceBox) {
        self.surface = *surface;
    }

    fn snapshot(&self, options: &SnapshotOptions) -> Result<RasterImage, EngineError> {
        if self.disposed {
            return Err(EngineError::Disposed);
        }
        if !(options.pixel_ratio.is_finite() && options.pixel_ratio > 0.0) {
            return Err(EngineError::Snapshot(format!(
                "invalid pixel ratio {}",
                options.pixel_ratio
            )));
        }
        let background = parse_hex_color(&options.background).ok_or_else(|| {
            EngineError::Snapshot(format!("unsupported background '{}'", options.background))
        })?;
        let (width, height) = self.scaled_size(options.pixel_ratio);

        match self.mode.backend {
            Backend::Raster => Ok(RasterImage {
                bytes: encode_png(width, height, background)?,
                width,
                height,
                mime_type: "image/png".to_string(),
                extension: "png".to_string(),
            }),
            Backend::Vector => Ok(RasterImage {
                bytes: encode_svg(width, height, &options.background).into_bytes(),
                width,
                height,
                mime_type: "image/svg+xml".to_string(),
                extension: "svg".to_string(),
            }),
        }
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.spec = None;
    }
}

/// PNG filled with one colour.
fn encode_png(width: u32, height: u32, rgb: [u8; 3]) -> Result<Vec<u8>, EngineError> {
    let buffer: RgbImage = ImageBuffer::from_pixel(width, height, Rgb(rgb));
    let mut bytes = Vec::new();
    buffer
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| EngineError::Snapshot(format!("png encoding failed: {}", e)))?;
    Ok(bytes)
}

fn encode_svg(width: u32, height: u32, background: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect width="100%" height="100%" fill="{bg}"/></svg>"#,
        w = width,
        h = height,
        bg = background
    )
}

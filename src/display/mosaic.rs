//! Tiled window composition of a population's canvases.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::compute::ColourGrid;
use crate::schema::{ConfigError, DisplayConfig};

use super::Selection;

/// Display errors.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("Expected {expected} canvases, got {actual}")]
    TileCount { expected: usize, actual: usize },
    #[error("Invalid display config: {0}")]
    Config(#[from] ConfigError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Convert a canvas to an image, column `j` of row `i` becoming pixel (j, i).
pub fn canvas_image(canvas: &ColourGrid) -> RgbImage {
    let width = canvas.width();
    RgbImage::from_fn(width as u32, canvas.height() as u32, |x, y| {
        Rgb(canvas.pixels()[y as usize * width + x as usize])
    })
}

/// Write a composed frame. The format follows the file extension.
pub fn save_frame(frame: &RgbImage, path: impl AsRef<Path>) -> Result<(), DisplayError> {
    frame.save(path)?;
    Ok(())
}

/// Lays out `grid_size x grid_size` canvases over a window.
///
/// Cell `k` sits at row `k / grid_size`, column `k % grid_size`. Each canvas
/// is scaled into its tile leaving a one pixel gutter on the right and bottom.
#[derive(Debug, Clone)]
pub struct Mosaic {
    config: DisplayConfig,
    grid_size: usize,
}

impl Mosaic {
    pub fn new(config: DisplayConfig, grid_size: usize) -> Result<Self, DisplayError> {
        config.validate(grid_size)?;
        Ok(Self { config, grid_size })
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    #[inline]
    fn tile_size(&self) -> (usize, usize) {
        (
            self.config.window_width / self.grid_size,
            self.config.window_height / self.grid_size,
        )
    }

    /// Cell index under window pixel (x, y), if any.
    pub fn cell_at(&self, x: usize, y: usize) -> Option<usize> {
        let (tile_w, tile_h) = self.tile_size();
        let col = x / tile_w;
        let row = y / tile_h;
        (col < self.grid_size && row < self.grid_size).then_some(row * self.grid_size + col)
    }

    /// Compose canvases into one window frame, halving selected cells.
    pub fn compose(
        &self,
        canvases: &[ColourGrid],
        selection: &Selection,
    ) -> Result<RgbImage, DisplayError> {
        let expected = self.grid_size * self.grid_size;
        if canvases.len() != expected {
            return Err(DisplayError::TileCount {
                expected,
                actual: canvases.len(),
            });
        }

        let mut frame = RgbImage::new(
            self.config.window_width as u32,
            self.config.window_height as u32,
        );
        let (tile_w, tile_h) = self.tile_size();
        let (draw_w, draw_h) = ((tile_w - 1) as u32, (tile_h - 1) as u32);

        for (k, canvas) in canvases.iter().enumerate() {
            if canvas.width() == 0 || canvas.height() == 0 {
                continue;
            }

            let image = if selection.contains(k) {
                canvas_image(&canvas.darkened())
            } else {
                canvas_image(canvas)
            };
            let tile = imageops::resize(&image, draw_w, draw_h, FilterType::Nearest);

            let (row, col) = (k / self.grid_size, k % self.grid_size);
            imageops::replace(
                &mut frame,
                &tile,
                (col * tile_w) as i64,
                (row * tile_h) as i64,
            );
        }

        Ok(frame)
    }
}

//! Colour types produced by pattern networks.

/// RGB triple, each channel in [0, 255].
pub type Rgb = [u8; 3];

/// Map a (0, 1) network output to an integer intensity: floor(x * 255).
///
/// The float-to-int cast saturates, so out-of-range values clamp to [0, 255]
/// and NaN maps to 0.
#[inline]
pub fn intensity(x: f32) -> u8 {
    (x * 255.0) as u8
}

/// Convert three channel outputs to a colour.
#[inline]
pub fn to_rgb(channels: &[f32]) -> Rgb {
    [
        intensity(channels[0]),
        intensity(channels[1]),
        intensity(channels[2]),
    ]
}

/// A height x width grid of colours, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColourGrid {
    height: usize,
    width: usize,
    pixels: Vec<Rgb>,
}

impl ColourGrid {
    /// Create a black grid.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            pixels: vec![[0; 3]; height * width],
        }
    }

    /// Wrap existing row-major pixels. Returns None if the length does not fit.
    pub fn from_pixels(height: usize, width: usize, pixels: Vec<Rgb>) -> Option<Self> {
        (pixels.len() == height * width).then_some(Self {
            height,
            width,
            pixels,
        })
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Colour at row `i`, column `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<Rgb> {
        if i < self.height && j < self.width {
            Some(self.pixels[i * self.width + j])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Iterate rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        self.pixels.chunks(self.width.max(1))
    }

    /// Copy with every channel halved, used to mark selected cells.
    pub fn darkened(&self) -> Self {
        Self {
            height: self.height,
            width: self.width,
            pixels: self
                .pixels
                .iter()
                .map(|&[r, g, b]| [r / 2, g / 2, b / 2])
                .collect(),
        }
    }
}

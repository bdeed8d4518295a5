//! Headless display: selection, tiling and frame output.
//!
//! Mirrors what an interactive window does around the core: it evaluates
//! each member on a small canvas, tiles the canvases into a window with
//! selected cells darkened, and maps clicks back to cell indices.

mod clock;
mod mosaic;
mod selection;

pub use clock::FrameClock;
pub use mosaic::{DisplayError, Mosaic, canvas_image, save_frame};
pub use selection::Selection;

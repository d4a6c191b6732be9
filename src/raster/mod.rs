//! Raster image output: format conversion and text rendering.

mod image;
mod text;

pub use self::image::{image_format, load, load_rgb, save_as};
pub use self::text::render_text;

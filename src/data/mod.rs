//! Image decoding and encoding for the analysis.
//!
//! The classifier works on decoded RGB8 buffers only; this module is the
//! boundary with image files. Alpha is dropped on load, so transparent
//! plans are analyzed on their color channels alone.

mod loader;

pub use loader::{ImageLoader, is_supported_file, load_image, load_image_from_bytes, save_image};

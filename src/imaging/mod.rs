//! Image I/O: decoding source files, encoding artifacts, and moving pixels
//! between file layouts and the RGB8 working buffer.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `ImageReader::with_guessed_format` |
//! | **Encode** | format from extension; JPEG with explicit quality |
//! | **Working layout** | `to_rgb8` + separate alpha plane |
//!
//! The module is split into:
//! - **Parameters**: encoding settings ([`Quality`])
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Layout**: [`to_working`] / [`SourceLayout::restore`]

pub mod backend;
pub mod layout;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use layout::{SourceLayout, to_working};
pub use params::Quality;
pub use rust_backend::RustBackend;

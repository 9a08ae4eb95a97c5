//! Physical outputs
//!
//! Two [`LightSink`](crate::LightSink) implementations, picked when the
//! worker is constructed: a single tri-color indicator on GPIO pins and an
//! addressable strip.

mod strip;
mod tri_color;

pub use strip::StripSink;
pub use tri_color::TriColorSink;

//! Data models for Murmur

mod message;
mod visual;

pub use message::*;
pub use visual::*;

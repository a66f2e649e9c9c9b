//! Murmur Core Library
//!
//! Presentation logic for chat message bubbles: message models, the style
//! table, bubble configuration and the renderer that positions a bubble
//! against a host layout engine.

pub mod bubble;
pub mod config;
pub mod error;
pub mod invariants;
pub mod layout;
pub mod models;
pub mod style;

pub use bubble::{render, Label, MessageBubble, Surface};
pub use config::{BubbleConfig, LayoutMetrics, TextConfig};
pub use error::{Error, Result};
pub use layout::{ConstraintGraph, ConstraintId, Edge, LayoutEngine, ViewId};
pub use models::*;
pub use style::{Color, DateRenderer, Palette, SenderColors, SenderStyle};

//! Derived presentation state of a bubble

use serde::{Deserialize, Serialize};

use crate::style::Color;

/// Which horizontal edge of the container a bubble hugs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Leading,
    Trailing,
}

impl Alignment {
    /// Resolve both horizontal offsets for this alignment.
    ///
    /// The hugged edge gets `small`, the opposite edge is pushed in by `large`.
    /// The far offset is negative because it is measured from the trailing edge.
    pub fn offsets(self, small: f64, large: f64) -> HorizontalOffsets {
        match self {
            Alignment::Leading => HorizontalOffsets {
                near: small,
                far: -large,
            },
            Alignment::Trailing => HorizontalOffsets {
                near: large,
                far: -small,
            },
        }
    }
}

/// Constants of the leading (near) and trailing (far) offset relationships
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalOffsets {
    pub near: f64,
    pub far: f64,
}

impl HorizontalOffsets {
    /// Offsets used before any alignment has been chosen
    pub fn symmetric(small: f64) -> Self {
        Self {
            near: small,
            far: -small,
        }
    }
}

/// Presentation intent of a bubble, separate from [`crate::MessageState`].
///
/// None of the variants changes the rendering yet. They are kept as the hook
/// where delivery progress and failure styling will be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryState {
    Sending,
    #[default]
    Displaying,
    Failed,
}

/// Everything a bubble shows for one message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleVisualState {
    pub body_text: String,
    pub caption_text: String,
    pub receipt_text: String,
    pub background_color: Color,
    pub body_text_color: Color,
    pub alignment: Alignment,
}

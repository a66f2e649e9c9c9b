//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible presentation states during
//! development. These checks are compiled out in release builds.

use crate::config::BubbleConfig;
use crate::models::{Alignment, BubbleVisualState, Message, MessageState, Sender};

/// Validate that a derived visual state matches the message it was built from
pub fn assert_visual_state_invariants(
    message: &Message,
    visual: &BubbleVisualState,
    config: &BubbleConfig,
) {
    debug_assert_eq!(
        visual.body_text, message.message,
        "Body text must be the verbatim message content"
    );

    let expects_receipt = message.state == MessageState::Read && message.sender == Sender::User;
    debug_assert_eq!(
        !visual.receipt_text.is_empty(),
        expects_receipt,
        "Receipt shown for {} message from {}",
        message.state,
        message.sender
    );

    if message.state == MessageState::Sending {
        debug_assert_eq!(
            visual.caption_text, config.text.sending,
            "Sending message must show the sending caption"
        );
    } else {
        debug_assert_eq!(
            visual.caption_text,
            config.text.date_format.render(&message.send_date),
            "Delivered message must show its send date"
        );
    }

    assert_alignment_matches_sender(message.sender, visual.alignment);
}

/// Validate that a sender is drawn on its own side of the container
pub fn assert_alignment_matches_sender(sender: Sender, alignment: Alignment) {
    let expected = match sender {
        Sender::User => Alignment::Trailing,
        Sender::Other => Alignment::Leading,
    };
    debug_assert_eq!(
        alignment, expected,
        "Message from {} aligned {:?}",
        sender, alignment
    );
}

//! Chat view model
//!
//! Keeps one bubble per visible message and recycles them when the
//! conversation changes, then draws the configured bubbles as text rows.

use murmur_core::{
    Alignment, BubbleConfig, ConstraintGraph, HorizontalOffsets, Message, MessageBubble, Result,
    ViewId,
};

/// Width of one text column in layout units
const UNITS_PER_COLUMN: f64 = 4.0;

/// Bubbles for a conversation laid out in a single container
pub struct ChatViewModel {
    config: BubbleConfig,
    layout: ConstraintGraph,
    container: ViewId,
    bubbles: Vec<MessageBubble>,
    /// Total row width in columns
    width: usize,
}

impl ChatViewModel {
    pub fn new(config: BubbleConfig, width: usize) -> Self {
        Self {
            config,
            layout: ConstraintGraph::new(),
            container: ViewId::new(),
            bubbles: Vec::new(),
            width,
        }
    }

    pub fn bubbles(&self) -> &[MessageBubble] {
        &self.bubbles
    }

    /// Show `messages`, reusing existing bubbles before creating new ones
    pub fn set_messages(&mut self, messages: &[Message]) -> Result<()> {
        let reused = self.bubbles.len().min(messages.len());
        for bubble in self.bubbles.drain(reused..) {
            bubble.remove(&mut self.layout);
        }

        for message in &messages[reused..] {
            let mut bubble = MessageBubble::new(&self.config, &mut self.layout)?;
            bubble.attach(self.container, &mut self.layout)?;
            bubble.configure(message, &mut self.layout);
            self.bubbles.push(bubble);
        }

        for (bubble, message) in self.bubbles.iter_mut().zip(messages).take(reused) {
            bubble.configure(message, &mut self.layout);
        }

        tracing::debug!(
            messages = messages.len(),
            reused,
            constraints = self.layout.len(),
            "Updated chat view"
        );
        Ok(())
    }

    /// Re-render a single message in place
    pub fn update_message(&mut self, index: usize, message: &Message) {
        match self.bubbles.get_mut(index) {
            Some(bubble) => bubble.configure(message, &mut self.layout),
            None => tracing::warn!(index, "No bubble for message"),
        }
    }

    /// Draw every bubble as text rows
    pub fn render_rows(&self) -> Vec<String> {
        self.bubbles
            .iter()
            .flat_map(|bubble| self.render_bubble(bubble))
            .collect()
    }

    fn render_bubble(&self, bubble: &MessageBubble) -> Vec<String> {
        let Some(visual) = bubble.visual_state() else {
            return Vec::new();
        };
        let Some(offsets) = bubble.offsets() else {
            return Vec::new();
        };

        let (left, inner) = span(offsets, self.width);

        let footer = if visual.receipt_text.is_empty() {
            visual.caption_text.clone()
        } else {
            format!("{} {}", visual.caption_text, visual.receipt_text)
        };

        let mut lines: Vec<String> = visual.body_text.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(footer);

        let content_width = lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0)
            .min(inner);

        lines
            .iter()
            .map(|line| {
                let text: String = line.chars().take(content_width).collect();
                let cell = format!("[{:<width$}]", text, width = content_width);
                let pad = match visual.alignment {
                    Alignment::Leading => left,
                    Alignment::Trailing => left
                        .saturating_add(inner)
                        .saturating_sub(content_width + 2)
                        .max(left),
                }
                .min(self.width);
                format!("{}{}", " ".repeat(pad), cell)
            })
            .collect()
    }
}

/// Columns kept free before the bubble, and the columns available to it
fn span(offsets: HorizontalOffsets, width: usize) -> (usize, usize) {
    let left = columns(offsets.near).min(width);
    let right = columns(-offsets.far).min(width);
    let inner = width.saturating_sub(left.saturating_add(right)).max(1);
    (left, inner)
}

fn columns(units: f64) -> usize {
    (units / UNITS_PER_COLUMN).round().max(0.0) as usize
}

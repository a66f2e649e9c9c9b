//! Message bubble renderer
//!
//! A [`MessageBubble`] turns one [`Message`] into text, colors and a side of
//! the container to hug. The bubble owns its labels and surface; geometry is
//! expressed through a [`LayoutEngine`] supplied by the host.

use crate::config::BubbleConfig;
use crate::error::{Error, Result};
use crate::invariants;
use crate::layout::{
    attach_sides, Axis, ConstraintId, Edge, LayoutEngine, Relation, ViewId, PRIORITY_REQUIRED,
};
use crate::models::{
    Alignment, BubbleVisualState, DeliveryState, HorizontalOffsets, Message, MessageState, Sender,
};
use crate::style::{Color, TextAlignment, TextStyle};

/// A text element inside the bubble
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub id: ViewId,
    pub text: String,
    pub text_color: Color,
    pub style: TextStyle,
    pub alignment: TextAlignment,
    /// `None` wraps over as many lines as needed
    pub max_lines: Option<usize>,
}

impl Label {
    fn new(style: TextStyle, text_color: Color) -> Self {
        Self {
            id: ViewId::new(),
            text: String::new(),
            text_color,
            style,
            alignment: TextAlignment::Natural,
            max_lines: Some(1),
        }
    }
}

/// The bubble's own backing layer
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Unset until the first `configure`
    pub background: Option<Color>,
    pub corner_radius: f64,
    pub clips_to_bounds: bool,
}

/// Relationships between the bubble and its container
#[derive(Debug, Clone, Copy)]
struct Attachment {
    container: ViewId,
    top: ConstraintId,
    bottom: ConstraintId,
    near: ConstraintId,
    far: ConstraintId,
}

/// Renders a single chat message
#[derive(Debug, Clone)]
pub struct MessageBubble {
    id: ViewId,
    config: BubbleConfig,
    surface: Surface,
    body: Label,
    caption: Label,
    receipt: Label,
    alignment: Option<Alignment>,
    attachment: Option<Attachment>,
    label_constraints: Vec<ConstraintId>,
    delivery_state: DeliveryState,
}

impl MessageBubble {
    /// Create a bubble and lay out its labels inside it.
    ///
    /// Fails if `config` does not pass [`BubbleConfig::validate`].
    pub fn new<L: LayoutEngine + ?Sized>(config: &BubbleConfig, layout: &mut L) -> Result<Self> {
        config.validate()?;

        let mut body = Label::new(TextStyle::Body, Color::DARK_GRAY);
        body.max_lines = None;

        let mut bubble = Self {
            id: ViewId::new(),
            surface: Surface {
                background: None,
                corner_radius: config.layout.corner_radius,
                clips_to_bounds: true,
            },
            body,
            caption: Label::new(TextStyle::Footnote, Color::LIGHT_GRAY),
            receipt: Label::new(TextStyle::Footnote, Color::WHITE),
            config: config.clone(),
            alignment: None,
            attachment: None,
            label_constraints: Vec::new(),
            delivery_state: DeliveryState::default(),
        };
        bubble.label_constraints = bubble.add_constraints(layout);
        Ok(bubble)
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn body(&self) -> &Label {
        &self.body
    }

    pub fn caption(&self) -> &Label {
        &self.caption
    }

    pub fn receipt(&self) -> &Label {
        &self.receipt
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn alignment(&self) -> Option<Alignment> {
        self.alignment
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    /// Show `message`, replacing everything derived from a previous message
    pub fn configure<L: LayoutEngine + ?Sized>(&mut self, message: &Message, layout: &mut L) {
        let visual = render(message, &self.config);
        invariants::assert_visual_state_invariants(message, &visual, &self.config);

        tracing::debug!(
            bubble = %self.id,
            sender = %message.sender,
            state = %message.state,
            "Configuring bubble"
        );

        self.body.text = visual.body_text;
        self.caption.text = visual.caption_text;
        self.receipt.text = visual.receipt_text;
        self.surface.background = Some(visual.background_color);
        self.body.text_color = visual.body_text_color;
        self.align_bubble(visual.alignment, layout);
    }

    /// Snapshot of what the bubble currently shows, if it has been configured
    pub fn visual_state(&self) -> Option<BubbleVisualState> {
        Some(BubbleVisualState {
            body_text: self.body.text.clone(),
            caption_text: self.caption.text.clone(),
            receipt_text: self.receipt.text.clone(),
            background_color: self.surface.background?,
            body_text_color: self.body.text_color,
            alignment: self.alignment?,
        })
    }

    /// Current constants of the horizontal offsets, once attached
    pub fn offsets(&self) -> Option<HorizontalOffsets> {
        self.attachment?;
        let metrics = &self.config.layout;
        Some(match self.alignment {
            Some(alignment) => alignment.offsets(metrics.small_offset, metrics.large_offset),
            None => HorizontalOffsets::symmetric(metrics.small_offset),
        })
    }

    /// Place the bubble inside `container`. Only valid once per bubble.
    pub fn attach<L: LayoutEngine + ?Sized>(
        &mut self,
        container: ViewId,
        layout: &mut L,
    ) -> Result<&mut Self> {
        if self.attachment.is_some() {
            return Err(Error::AlreadyAttached);
        }

        let metrics = self.config.layout;
        layout.add_child(container, self.id);
        let pins = attach_sides(
            layout,
            self.id,
            container,
            &[Edge::Top, Edge::Bottom],
            metrics.container_margin,
        );

        let initial = HorizontalOffsets::symmetric(metrics.small_offset);
        let near = layout.attach(self.id, container, Edge::Leading, initial.near);
        let far = layout.attach(self.id, container, Edge::Trailing, initial.far);
        layout.activate(&[near, far]);
        self.attachment = Some(Attachment {
            container,
            top: pins[0],
            bottom: pins[1],
            near,
            far,
        });

        tracing::debug!(bubble = %self.id, container = %container, "Attached bubble");

        if let Some(alignment) = self.alignment {
            self.align_bubble(alignment, layout);
        }
        Ok(self)
    }

    /// Take the bubble out of its container. The bubble keeps its content and
    /// can be attached again.
    pub fn detach<L: LayoutEngine + ?Sized>(&mut self, layout: &mut L) {
        let Some(attachment) = self.attachment.take() else {
            return;
        };
        layout.remove_constraints(&[
            attachment.top,
            attachment.bottom,
            attachment.near,
            attachment.far,
        ]);
        layout.remove_child(self.id);

        tracing::debug!(bubble = %self.id, container = %attachment.container, "Detached bubble");
    }

    /// Detach and tear down the label layout, leaving nothing behind in `layout`
    pub fn remove<L: LayoutEngine + ?Sized>(mut self, layout: &mut L) {
        self.detach(layout);
        layout.remove_constraints(&self.label_constraints);
        for label in [&self.body, &self.caption, &self.receipt] {
            layout.remove_child(label.id);
        }
    }

    pub fn delivery_state(&self) -> DeliveryState {
        self.delivery_state
    }

    pub fn set_delivery_state(&mut self, state: DeliveryState) {
        self.delivery_state = state;
        self.apply_delivery_state();
    }

    fn apply_delivery_state(&mut self) {
        tracing::trace!(bubble = %self.id, state = ?self.delivery_state, "Delivery state changed");
        // Extension point: no delivery state has its own styling yet.
        match self.delivery_state {
            DeliveryState::Sending => {}
            DeliveryState::Displaying => {}
            DeliveryState::Failed => {}
        }
    }

    fn align_bubble<L: LayoutEngine + ?Sized>(&mut self, alignment: Alignment, layout: &mut L) {
        self.alignment = Some(alignment);

        let Some(handles) = self.attachment else {
            return;
        };
        let metrics = &self.config.layout;
        let offsets = alignment.offsets(metrics.small_offset, metrics.large_offset);
        layout.set_constant(handles.near, offsets.near);
        layout.set_constant(handles.far, offsets.far);

        tracing::trace!(
            bubble = %self.id,
            ?alignment,
            near = offsets.near,
            far = offsets.far,
            "Aligned bubble"
        );
    }

    fn add_constraints<L: LayoutEngine + ?Sized>(&self, layout: &mut L) -> Vec<ConstraintId> {
        let metrics = &self.config.layout;
        let padding = metrics.content_padding;

        for label in [&self.body, &self.caption, &self.receipt] {
            layout.add_child(self.id, label.id);
        }

        let mut ids = attach_sides(
            layout,
            self.body.id,
            self.id,
            &[Edge::Top, Edge::Leading, Edge::Trailing],
            padding,
        );

        ids.extend(attach_sides(
            layout,
            self.caption.id,
            self.id,
            &[Edge::Leading, Edge::Bottom],
            padding,
        ));
        let caption_below =
            layout.space(self.caption.id, metrics.caption_spacing, Relation::Below, self.body.id);

        ids.extend(attach_sides(
            layout,
            self.receipt.id,
            self.id,
            &[Edge::Bottom, Edge::Trailing],
            padding,
        ));
        let receipt_after = layout.space(
            self.receipt.id,
            metrics.receipt_spacing,
            Relation::Trailing,
            self.caption.id,
        );
        let receipt_below =
            layout.space(self.receipt.id, metrics.caption_spacing, Relation::Below, self.body.id);
        layout.set_hugging_priority(self.receipt.id, Axis::Horizontal, PRIORITY_REQUIRED);

        let spacing = [caption_below, receipt_after, receipt_below];
        layout.activate(&spacing);
        ids.extend(spacing);
        ids
    }
}

/// Derive everything a bubble shows for `message`
pub fn render(message: &Message, config: &BubbleConfig) -> BubbleVisualState {
    let style = config.palette.style_for(message.sender);
    BubbleVisualState {
        body_text: message.message.clone(),
        caption_text: caption_text(message, config),
        receipt_text: receipt_text(message.state, message.sender, config),
        background_color: style.background,
        body_text_color: style.body_text,
        alignment: style.alignment,
    }
}

fn caption_text(message: &Message, config: &BubbleConfig) -> String {
    match message.state {
        MessageState::Sending => config.text.sending.clone(),
        MessageState::Sent | MessageState::Read => {
            config.text.date_format.render(&message.send_date)
        }
    }
}

fn receipt_text(state: MessageState, sender: Sender, config: &BubbleConfig) -> String {
    match (state, sender) {
        (MessageState::Read, Sender::User) => config.text.read_receipt.clone(),
        _ => String::new(),
    }
}

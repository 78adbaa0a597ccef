//! Chat message model.
//!
//! A [`Message`] is opaque content plus display options. Messages are
//! immutable once submitted to the update engine; identity is positional
//! (the store index), not a stable key.

/// Horizontal alignment of a message row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Incoming messages, avatar on the leading edge.
    Left,
    /// Outgoing messages, avatar on the trailing edge.
    Right,
    /// Full-width rows such as notices and date lines.
    Center,
}

impl Alignment {
    /// Stable short tag used when deriving reuse keys.
    pub fn tag(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Center => "center",
        }
    }
}

/// Visual style variant of a message row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageStyle {
    /// Speech-bubble row with optional avatar and card.
    Bubble,
    /// Dimmed full-width informational row.
    Notice,
    /// Undecorated row.
    Plain,
}

/// Message payload, tagged by an explicit content kind.
///
/// The kind tag drives cell reuse: rows with the same (kind, alignment)
/// pair recycle the same cell template.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    /// Plain text body.
    Text(String),
    /// Image reference with its natural pixel dimensions.
    Image {
        /// Host-resolvable image locator.
        source: String,
        /// Natural width in pixels.
        width: f64,
        /// Natural height in pixels.
        height: f64,
    },
    /// Voice clip with its playback length in seconds.
    Audio {
        /// Host-resolvable clip locator.
        source: String,
        /// Playback length in seconds.
        duration: f64,
    },
    /// System notice text.
    Notice(String),
}

impl MessageContent {
    /// The content-kind tag for this payload.
    pub fn kind(&self) -> ContentKind {
        match self {
            MessageContent::Text(_) => ContentKind::Text,
            MessageContent::Image { .. } => ContentKind::Image,
            MessageContent::Audio { .. } => ContentKind::Audio,
            MessageContent::Notice(_) => ContentKind::Notice,
        }
    }
}

/// Enumerated content kind, used directly as the reuse-key discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Text body.
    Text,
    /// Image attachment.
    Image,
    /// Voice clip.
    Audio,
    /// System notice.
    Notice,
}

impl ContentKind {
    /// Stable short tag used when deriving reuse keys.
    pub fn tag(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
            ContentKind::Audio => "audio",
            ContentKind::Notice => "notice",
        }
    }
}

/// Display options attached to a message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageOptions {
    /// Row alignment.
    pub alignment: Alignment,
    /// Whether the row shows an avatar.
    pub shows_avatar: bool,
    /// Whether the row shows a timestamp card above the bubble.
    pub shows_card: bool,
    /// Style variant.
    pub style: MessageStyle,
}

impl MessageOptions {
    /// Bubble-style options for an ordinary chat row.
    pub fn bubble(alignment: Alignment) -> Self {
        Self {
            alignment,
            shows_avatar: true,
            shows_card: false,
            style: MessageStyle::Bubble,
        }
    }

    /// Notice-style options for a centered informational row.
    pub fn notice() -> Self {
        Self {
            alignment: Alignment::Center,
            shows_avatar: false,
            shows_card: false,
            style: MessageStyle::Notice,
        }
    }
}

/// A chat message: opaque content plus display options.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    content: MessageContent,
    options: MessageOptions,
}

impl Message {
    /// Create a message from content and options.
    pub fn new(content: MessageContent, options: MessageOptions) -> Self {
        Self { content, options }
    }

    /// Bubble-style text message, the common case.
    pub fn text(body: impl Into<String>, alignment: Alignment) -> Self {
        Self::new(
            MessageContent::Text(body.into()),
            MessageOptions::bubble(alignment),
        )
    }

    /// Centered notice message.
    pub fn notice(body: impl Into<String>) -> Self {
        Self::new(
            MessageContent::Notice(body.into()),
            MessageOptions::notice(),
        )
    }

    /// Message payload.
    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    /// Display options.
    pub fn options(&self) -> &MessageOptions {
        &self.options
    }
}

//! Fixed per-style geometry for chat rows.
//!
//! These are design constants consumed by the host's flow layout through
//! the size queries on the data source; nothing here is computed.

use crate::model::geometry::{EdgeInsets, Size};
use crate::model::message::MessageStyle;

/// Avatar box for a row of the given style.
pub fn avatar_size(_style: MessageStyle) -> Size {
    Size::new(39.0, 39.0)
}

/// Timestamp-card box for a row of the given style. Width 0 means
/// full-width.
pub fn card_size(_style: MessageStyle) -> Size {
    Size::new(0.0, 18.0)
}

/// Outer row inset for the given style.
///
/// Bubble rows reserve trailing room for the avatar column; notice and
/// plain rows use symmetric padding.
pub fn row_inset(style: MessageStyle) -> EdgeInsets {
    match style {
        MessageStyle::Bubble => EdgeInsets::new(6.0, 8.0, 6.0, 2.0 + 20.0 + 8.0),
        MessageStyle::Notice => EdgeInsets::new(10.0, 20.0, 10.0, 20.0),
        MessageStyle::Plain => EdgeInsets::new(10.0, 10.0, 10.0, 10.0),
    }
}

/// Inset around the timestamp card.
pub fn card_inset(_style: MessageStyle) -> EdgeInsets {
    EdgeInsets::new(0.0, 8.0, 0.0, 8.0)
}

/// Inset around the avatar.
pub fn avatar_inset(_style: MessageStyle) -> EdgeInsets {
    EdgeInsets::new(2.0, 2.0, 2.0, 2.0)
}

/// Inset around the bubble decoration. Negative: the bubble overdraws its
/// row slightly.
pub fn bubble_inset(_style: MessageStyle) -> EdgeInsets {
    EdgeInsets::new(-2.0, 0.0, -2.0, 0.0)
}

/// Inner inset between the bubble edge and the content.
pub fn content_inset(style: MessageStyle) -> EdgeInsets {
    match style {
        MessageStyle::Bubble => EdgeInsets::new(8.0 + 2.0, 10.0 + 2.0, 8.0 + 2.0, 10.0 + 2.0),
        MessageStyle::Notice | MessageStyle::Plain => EdgeInsets::new(4.0, 10.0, 4.0, 10.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bubble_rows_reserve_trailing_avatar_room() {
        let inset = row_inset(MessageStyle::Bubble);
        assert_eq!(inset.right, 30.0);
        assert_eq!(inset.left, 8.0);
    }

    #[test]
    fn notice_rows_pad_symmetrically() {
        let inset = row_inset(MessageStyle::Notice);
        assert_eq!(inset.left, inset.right);
    }

    #[test]
    fn bubble_decoration_overdraws_vertically() {
        let inset = bubble_inset(MessageStyle::Bubble);
        assert!(inset.top < 0.0 && inset.bottom < 0.0);
    }
}

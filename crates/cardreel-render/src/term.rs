//! Terminal projection of card layouts.
//!
//! The terminal cannot show avatars or CSS backgrounds, so this projection
//! keeps the structure of a [`CardLayout`] (frame, avatar slot, text blocks,
//! badge) and maps the style's colors to the 256-color palette. Text comes
//! from the layout unchanged, already sanitized and ellipsized, so the
//! terminal card always says exactly what the exported card says.

use console::Style;

use crate::layout::{CardLayout, ImageKind};
use crate::style::{Archetype, AvatarShape, BadgeKind, StyleDefinition};
use crate::util::{center_to_width, display_width};

/// Inner width of a terminal card, in columns.
pub const CARD_INNER_WIDTH: usize = 32;

struct Frame {
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    horizontal: char,
    vertical: char,
}

fn frame_for(archetype: Archetype) -> Frame {
    let (top_left, top_right, bottom_left, bottom_right, horizontal, vertical) = match archetype {
        Archetype::Frame => ('╔', '╗', '╚', '╝', '═', '║'),
        Archetype::Bubble | Archetype::Polaroid => ('╭', '╮', '╰', '╯', '─', '│'),
        Archetype::Hud => ('┏', '┓', '┗', '┛', '━', '┃'),
        Archetype::Centered | Archetype::Split | Archetype::Scroll => {
            ('┌', '┐', '└', '┘', '─', '│')
        }
    };
    Frame {
        top_left,
        top_right,
        bottom_left,
        bottom_right,
        horizontal,
        vertical,
    }
}

fn avatar_glyph(card: &CardLayout) -> String {
    let inner = match card.avatar.kind {
        ImageKind::Placeholder => "·".to_string(),
        ImageKind::Remote | ImageKind::Embedded if card.avatar.initial.is_empty() => {
            "·".to_string()
        }
        ImageKind::Remote | ImageKind::Embedded => card.avatar.initial.clone(),
    };
    match card.avatar.shape {
        AvatarShape::Circle => format!("( {} )", inner),
        AvatarShape::Rounded => format!("╭ {} ╮", inner),
        AvatarShape::Square => format!("[ {} ]", inner),
        AvatarShape::Arch => format!("∩ {} ∩", inner),
        AvatarShape::Hexagon => format!("⬡ {} ⬡", inner),
    }
}

fn badge_line(card: &CardLayout) -> Option<String> {
    card.link.as_ref()?;
    match card.badge {
        BadgeKind::Pill => Some("( 追蹤 )".to_string()),
        BadgeKind::Stamp => Some("[ 追蹤 ]".to_string()),
        BadgeKind::Underline => Some("追蹤".to_string()),
        BadgeKind::Hidden => None,
    }
}

/// Renders one card as a block of terminal lines centered in `width` columns.
///
/// With `styled` false the output is plain text (no escape codes), which is
/// what tests and non-TTY output use.
pub fn render_card_term(
    card: &CardLayout,
    style: &StyleDefinition,
    width: usize,
    styled: bool,
) -> String {
    let paint = |s: Style| s.force_styling(styled);
    let text_style = paint(Style::new().fg(style.text.to_console()).bold());
    let muted_style = paint(Style::new().fg(style.muted.to_console()));
    let accent_style = paint(Style::new().fg(style.accent.to_console()));
    let frame_style = paint(Style::new().fg(style.accent.to_console()).dim());

    let mut rows: Vec<(String, &Style)> = Vec::new();
    rows.push((String::new(), &muted_style));
    rows.push((avatar_glyph(card), &accent_style));
    rows.push((String::new(), &muted_style));
    let role = if card.archetype == Archetype::Hud && !card.role.is_empty() {
        format!("[ {} ]", card.role.text)
    } else {
        card.role.text.clone()
    };
    rows.push((role, &muted_style));
    rows.push((card.name.text.clone(), &text_style));
    if let Some(handle) = &card.handle {
        rows.push((handle.text.clone(), &accent_style));
    }
    if let Some(badge) = badge_line(card) {
        rows.push((String::new(), &muted_style));
        rows.push((badge, &accent_style));
    }
    if card.archetype == Archetype::Polaroid {
        rows.push((String::new(), &muted_style));
    }
    rows.push((String::new(), &muted_style));

    let frame = frame_for(card.archetype);
    let outer = CARD_INNER_WIDTH + 2;
    let margin = " ".repeat(width.saturating_sub(outer) / 2);
    let rule: String = std::iter::repeat(frame.horizontal)
        .take(CARD_INNER_WIDTH)
        .collect();

    let mut out = String::new();
    out.push_str(&margin);
    out.push_str(&frame_style.apply_to(format!("{}{}{}", frame.top_left, rule, frame.top_right)).to_string());
    out.push('\n');
    for (text, row_style) in rows {
        let padded = center_to_width(&text, CARD_INNER_WIDTH);
        // Content wider than the card only happens with a custom budget; keep the frame intact.
        let fill = CARD_INNER_WIDTH.saturating_sub(display_width(&padded));
        out.push_str(&margin);
        out.push_str(&frame_style.apply_to(frame.vertical).to_string());
        out.push_str(&row_style.apply_to(padded).to_string());
        out.push_str(&" ".repeat(fill));
        out.push_str(&frame_style.apply_to(frame.vertical).to_string());
        out.push('\n');
    }
    out.push_str(&margin);
    out.push_str(&frame_style.apply_to(format!("{}{}{}", frame.bottom_left, rule, frame.bottom_right)).to_string());
    out.push('\n');
    out
}

//! Style definitions: the visual themes a reel can be rendered under.
//!
//! A style is pure data. Every visual difference between themes is carried
//! by a [`StyleDefinition`] value: a closed [`Archetype`] that picks the card
//! structure, a few closed shape enums, and declarative colors and CSS
//! fragments. The renderer never branches on a style key, so adding a theme
//! means adding an entry to the catalog and nothing else.
//!
//! ## Catalog
//!
//! The built-in catalog is an embedded YAML document parsed once on first
//! use. Look styles up through [`registry()`]:
//!
//! ```rust
//! use cardreel_render::style::registry;
//!
//! let style = registry().get("cyber_neon");
//! assert_eq!(style.key, "cyber_neon");
//!
//! // Unknown keys never fail; they resolve to the fallback style.
//! let stale = registry().get("retired_theme");
//! assert_eq!(stale.key, registry().fallback().key);
//! ```
//!
//! ## See Also
//!
//! - [`crate::layout`]: turns a vendor plus a style into a card layout

mod color;
mod registry;

pub use color::HexColor;
pub use registry::{registry, StyleRegistry, FALLBACK_STYLE};

use serde::{Deserialize, Serialize};

/// Structural layout family of a card.
///
/// Each archetype maps to one block of CSS in the card stylesheet and one
/// arrangement in the terminal projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// Avatar above centered text.
    Centered,
    /// Photo print with a thick bottom margin carrying the text.
    Polaroid,
    /// Avatar on the left, text column on the right.
    Split,
    /// Ornamental double frame around centered content.
    Frame,
    /// Speech-bubble panel with bold outlines.
    Bubble,
    /// Monospace heads-up display with bracketed labels.
    Hud,
    /// Vertical text column next to a tall avatar.
    Scroll,
}

impl Archetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Centered => "centered",
            Archetype::Polaroid => "polaroid",
            Archetype::Split => "split",
            Archetype::Frame => "frame",
            Archetype::Bubble => "bubble",
            Archetype::Hud => "hud",
            Archetype::Scroll => "scroll",
        }
    }
}

/// Mask applied to the avatar image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvatarShape {
    Circle,
    Rounded,
    Square,
    Arch,
    Hexagon,
}

/// How the profile link affordance is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    /// Rounded "follow" button.
    Pill,
    /// Rotated rubber-stamp label.
    Stamp,
    /// Plain underlined handle.
    Underline,
    /// No visible badge; the handle text still links.
    Hidden,
}

/// One immutable visual theme.
///
/// Fields are public for reading; definitions are only ever constructed by
/// [`StyleRegistry`] from catalog data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDefinition {
    /// Stable identifier shared by the app and exported artifacts.
    pub key: String,
    /// Display name.
    pub label: String,
    /// Secondary display name.
    pub sub_label: String,
    pub archetype: Archetype,
    pub avatar: AvatarShape,
    pub badge: BadgeKind,
    /// CSS `background` value for the stage behind the card.
    pub backdrop: String,
    /// CSS `background` value for the card itself.
    pub surface: String,
    pub text: HexColor,
    pub muted: HexColor,
    pub accent: HexColor,
    /// CSS `font-family` stack.
    pub font: String,
    /// CSS `border` value for the card.
    #[serde(default = "default_border")]
    pub border: String,
    /// Render name and role in capitals.
    #[serde(default)]
    pub uppercase: bool,
}

fn default_border() -> String {
    "none".to_string()
}

impl StyleDefinition {
    /// Whether the theme's text color is light, i.e. the theme is dark.
    pub fn is_dark(&self) -> bool {
        self.text.luminance() > 0.6
    }
}

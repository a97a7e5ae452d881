//! Card layout: the structural description of one vendor under one style.
//!
//! [`layout_card`] is the single mapping from vendor fields plus a
//! [`StyleDefinition`] to a [`CardLayout`]. Both render targets consume its
//! output: the terminal surface projects it to styled text, the exported
//! document projects it to HTML. Because the mapping is a pure function of
//! its inputs and the layout serializes field-for-field, two calls with equal
//! input always produce byte-identical markup in either projection.
//!
//! Everything that could make a card look broken is resolved here, once:
//!
//! - avatar sources that are empty, malformed, or not `http(s)`/`data:image`
//!   become the placeholder silhouette,
//! - text is stripped of control characters, whitespace-collapsed, and
//!   ellipsized to a fixed column budget,
//! - an empty name falls back to the handle.

use serde::Serialize;
use url::Url;

use crate::style::{Archetype, AvatarShape, BadgeKind, StyleDefinition};
use crate::util::{sanitize_text, truncate_to_width};

/// Column budget for the vendor name.
pub const NAME_BUDGET: usize = 24;
/// Column budget for the role line.
pub const ROLE_BUDGET: usize = 20;
/// Column budget for the `@handle` line, including the `@`.
pub const HANDLE_BUDGET: usize = 28;

/// Link target used when a vendor has no usable profile URL.
pub const PROFILE_ROOT: &str = "https://instagram.com";

/// Neutral silhouette shown in place of missing or broken avatars.
pub const PLACEHOLDER_AVATAR: &str = "data:image/svg+xml;utf8,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 64 64'%3E%3Crect width='64' height='64' fill='%23d9d9d9'/%3E%3Ccircle cx='32' cy='25' r='12' fill='%23f5f5f5'/%3E%3Cpath d='M10 60c2-13 11-20 22-20s20 7 22 20z' fill='%23f5f5f5'/%3E%3C/svg%3E";

const UNNAMED_LABEL: &str = "未命名廠商";
const EMPTY_TITLE: &str = "尚無廠商";
const EMPTY_SUBTITLE: &str = "新增廠商即可開始輪播";

/// Borrowed view of the vendor fields a card needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardSource<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub role: &'a str,
    pub handle: &'a str,
    pub url: &'a str,
    pub image_url: &'a str,
}

/// Where the avatar image comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    /// Network URL; may still fail at display time.
    Remote,
    /// Inline `data:` URI.
    Embedded,
    /// The built-in silhouette.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarSlot {
    pub kind: ImageKind,
    pub src: String,
    pub shape: AvatarShape,
    pub alt: String,
    /// First letter of the display name, for surfaces without images.
    pub initial: String,
}

/// A line of card text after fitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    pub text: String,
    /// Whether the text was ellipsized to fit its budget.
    pub truncated: bool,
}

impl TextBlock {
    fn fit(raw: &str, budget: usize) -> Self {
        let text = truncate_to_width(raw, budget);
        let truncated = text != raw;
        Self { text, truncated }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Decorative parameters copied from the style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decor {
    pub backdrop: String,
    pub surface: String,
    pub border: String,
    pub dark: bool,
}

/// Structural description of a rendered card. Carries no behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardLayout {
    pub card_id: String,
    pub style_key: String,
    pub archetype: Archetype,
    pub avatar: AvatarSlot,
    pub name: TextBlock,
    pub role: TextBlock,
    pub handle: Option<TextBlock>,
    pub link: Option<String>,
    pub badge: BadgeKind,
    pub decor: Decor,
    /// Set only on the neutral card shown for an empty vendor list.
    pub empty: bool,
}

impl CardLayout {
    /// The neutral card shown when there are no vendors to rotate through.
    pub fn empty(style: &StyleDefinition) -> Self {
        Self {
            card_id: "empty".to_string(),
            style_key: style.key.clone(),
            archetype: style.archetype,
            avatar: AvatarSlot {
                kind: ImageKind::Placeholder,
                src: PLACEHOLDER_AVATAR.to_string(),
                shape: style.avatar,
                alt: EMPTY_TITLE.to_string(),
                initial: String::new(),
            },
            name: TextBlock::fit(EMPTY_TITLE, NAME_BUDGET),
            role: TextBlock::fit(EMPTY_SUBTITLE, ROLE_BUDGET),
            handle: None,
            link: None,
            badge: BadgeKind::Hidden,
            decor: decor(style),
            empty: true,
        }
    }
}

/// Maps one vendor under one style to its card layout.
///
/// ```rust
/// use cardreel_render::layout::{layout_card, CardSource, ImageKind};
/// use cardreel_render::style::registry;
///
/// let source = CardSource {
///     id: "1",
///     name: "Studio A",
///     role: "婚禮攝影",
///     handle: "studio_a",
///     url: "https://www.instagram.com/studio_a",
///     image_url: "not a url",
/// };
/// let card = layout_card(&source, registry().get("cyber_neon"));
///
/// assert_eq!(card.name.text, "STUDIO A");
/// assert_eq!(card.handle.unwrap().text, "@studio_a");
/// assert_eq!(card.avatar.kind, ImageKind::Placeholder);
/// ```
pub fn layout_card(source: &CardSource<'_>, style: &StyleDefinition) -> CardLayout {
    let handle = sanitize_text(source.handle)
        .trim_start_matches('@')
        .trim()
        .to_string();

    let mut name = sanitize_text(source.name);
    if name.is_empty() {
        name = if handle.is_empty() {
            UNNAMED_LABEL.to_string()
        } else {
            handle.clone()
        };
    }
    let mut role = sanitize_text(source.role);
    if style.uppercase {
        name = name.to_uppercase();
        role = role.to_uppercase();
    }

    let (kind, src) = classify_image(source.image_url);
    let initial = name.chars().next().map(String::from).unwrap_or_default();

    CardLayout {
        card_id: source.id.to_string(),
        style_key: style.key.clone(),
        archetype: style.archetype,
        avatar: AvatarSlot {
            kind,
            src,
            shape: style.avatar,
            alt: name.clone(),
            initial,
        },
        name: TextBlock::fit(&name, NAME_BUDGET),
        role: TextBlock::fit(&role, ROLE_BUDGET),
        handle: (!handle.is_empty()).then(|| TextBlock::fit(&format!("@{}", handle), HANDLE_BUDGET)),
        link: Some(resolve_link(source.url)),
        badge: style.badge,
        decor: decor(style),
        empty: false,
    }
}

/// Classifies an avatar source, substituting the placeholder when unusable.
pub fn classify_image(raw: &str) -> (ImageKind, String) {
    let raw = raw.trim();
    if raw.is_empty() {
        return (ImageKind::Placeholder, PLACEHOLDER_AVATAR.to_string());
    }

    let lower = raw.get(..11).map(str::to_ascii_lowercase);
    if lower.as_deref() == Some("data:image/") {
        if raw.contains(',') {
            return (ImageKind::Embedded, raw.to_string());
        }
        log::warn!("avatar data URI has no payload, using placeholder");
        return (ImageKind::Placeholder, PLACEHOLDER_AVATAR.to_string());
    }

    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            (ImageKind::Remote, raw.to_string())
        }
        _ => {
            log::warn!("avatar source {:?} is not usable, using placeholder", raw);
            (ImageKind::Placeholder, PLACEHOLDER_AVATAR.to_string())
        }
    }
}

fn resolve_link(raw: &str) -> String {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => raw.to_string(),
        _ => PROFILE_ROOT.to_string(),
    }
}

fn decor(style: &StyleDefinition) -> Decor {
    Decor {
        backdrop: style.backdrop.clone(),
        surface: style.surface.clone(),
        border: style.border.clone(),
        dark: style.is_dark(),
    }
}

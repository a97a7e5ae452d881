//! # cardreel-render - Styled Vendor Cards
//!
//! `cardreel-render` turns one vendor record plus one visual style into a
//! card. It is the rendering foundation for the `cardreel` slideshow tool and
//! has no notion of time or rotation; those live in `cardreel`.
//!
//! ## Core Concepts
//!
//! - [`StyleDefinition`]: an immutable theme, pure data
//! - [`StyleRegistry`]: the catalog; unknown keys resolve to a fallback style
//! - [`CardLayout`]: structural description of one card, produced by
//!   [`layout_card`]
//! - [`CardRenderer`]: HTML and CSS projection of layouts (MiniJinja)
//! - [`render_card_term`]: terminal projection of layouts
//!
//! ## Quick Start
//!
//! ```rust
//! use cardreel_render::{layout_card, registry, CardRenderer, CardSource};
//!
//! let style = registry().get("luxury_marble");
//! let card = layout_card(
//!     &CardSource {
//!         id: "1",
//!         name: "Studio A",
//!         role: "婚禮攝影",
//!         handle: "studio_a",
//!         url: "https://www.instagram.com/studio_a",
//!         image_url: "https://picsum.photos/400/400",
//!     },
//!     style,
//! );
//!
//! let html = CardRenderer::new().unwrap().render_card_html(&card).unwrap();
//! assert!(html.contains("STUDIO A"));
//! ```
//!
//! ## One Layout, Two Projections
//!
//! Everything a card shows is decided by [`layout_card`]. The HTML and
//! terminal projections only arrange what the layout already contains, so a
//! live terminal preview and an exported document can never disagree about
//! text, truncation, avatar fallback, or which style was applied.

mod error;
pub mod layout;
pub mod style;
pub mod template;
pub mod term;
mod util;

pub use error::RenderError;

pub use layout::{
    classify_image, layout_card, AvatarSlot, CardLayout, CardSource, Decor, ImageKind, TextBlock,
    PLACEHOLDER_AVATAR, PROFILE_ROOT,
};

pub use style::{
    registry, Archetype, AvatarShape, BadgeKind, HexColor, StyleDefinition, StyleRegistry,
    FALLBACK_STYLE,
};

pub use template::{CardRenderer, MiniJinjaEngine, TemplateEngine};

pub use term::render_card_term;

pub use util::{
    center_to_width, display_width, rgb_to_ansi256, sanitize_text, truncate_to_width,
};

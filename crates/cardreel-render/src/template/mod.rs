//! HTML projection of card layouts.
//!
//! [`CardRenderer`] owns a template engine preloaded with the built-in card
//! templates:
//!
//! | Template | Purpose |
//! |----------|---------|
//! | `card.html` | markup for one [`CardLayout`] |
//! | `cards.css` | archetype, avatar-shape and badge rules shared by all styles |
//! | `stage.css` | custom properties for one [`StyleDefinition`] |
//!
//! Callers may register additional templates (the exported document does)
//! with [`CardRenderer::add_template`]. Names ending in `.html` are
//! HTML-escaped.
//!
//! ```rust
//! use cardreel_render::layout::CardLayout;
//! use cardreel_render::style::registry;
//! use cardreel_render::template::CardRenderer;
//!
//! let renderer = CardRenderer::new().unwrap();
//! let html = renderer
//!     .render_card_html(&CardLayout::empty(registry().fallback()))
//!     .unwrap();
//! assert!(html.contains("card--empty"));
//! ```

mod engine;
pub mod filters;

pub use engine::{MiniJinjaEngine, TemplateEngine};

use serde::Serialize;
use serde_json::json;

use crate::error::RenderError;
use crate::layout::CardLayout;
use crate::style::StyleDefinition;

/// Names of the built-in templates.
pub const CARD_TEMPLATE: &str = "card.html";
pub const BASE_STYLESHEET: &str = "cards.css";
pub const STAGE_STYLESHEET: &str = "stage.css";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (CARD_TEMPLATE, include_str!("../templates/card.html")),
    (BASE_STYLESHEET, include_str!("../templates/cards.css")),
    (STAGE_STYLESHEET, include_str!("../templates/stage.css")),
];

/// Renders card layouts and style sheets to HTML and CSS.
pub struct CardRenderer {
    engine: Box<dyn TemplateEngine>,
}

impl CardRenderer {
    /// Creates a renderer with the built-in templates registered.
    ///
    /// # Errors
    ///
    /// Fails only if a built-in template does not compile.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_engine(Box::new(MiniJinjaEngine::new()))
    }

    /// Creates a renderer on top of a custom engine.
    pub fn with_engine(mut engine: Box<dyn TemplateEngine>) -> Result<Self, RenderError> {
        for (name, source) in BUILTIN_TEMPLATES {
            engine.add_template(name, source)?;
        }
        Ok(Self { engine })
    }

    /// Registers (or replaces) a named template.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), RenderError> {
        self.engine.add_template(name, source)
    }

    /// Renders a registered template with serializable data.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, RenderError> {
        let value = serde_json::to_value(data)?;
        self.engine.render_named(name, &value)
    }

    /// Renders the markup of one card.
    pub fn render_card_html(&self, card: &CardLayout) -> Result<String, RenderError> {
        self.render(CARD_TEMPLATE, &json!({ "card": card }))
    }

    /// Renders the complete style sheet for one style: shared rules followed
    /// by the style's custom properties.
    pub fn render_stylesheet(&self, style: &StyleDefinition) -> Result<String, RenderError> {
        let stage = self.render(STAGE_STYLESHEET, &json!({ "style": style }))?;
        let base = self.render(BASE_STYLESHEET, &json!({}))?;
        Ok(format!("{}\n{}", stage.trim_end(), base.trim_end()))
    }
}

impl std::fmt::Debug for CardRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardRenderer").finish_non_exhaustive()
    }
}

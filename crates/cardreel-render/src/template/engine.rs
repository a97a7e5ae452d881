//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait which keeps the card
//! templates independent from the template backend. The implementation used
//! throughout the crate is [`MiniJinjaEngine`].

use minijinja::{Environment, Value};

use crate::error::RenderError;
use crate::layout::PLACEHOLDER_AVATAR;

/// A template engine that can render templates with data.
///
/// Template engines handle:
/// - Template compilation and caching
/// - Variable substitution, loops and conditionals
/// - Template includes (the exported document includes the card template)
pub trait TemplateEngine: Send + Sync {
    /// Renders a template string with the given data.
    ///
    /// This compiles and renders the template in one step. For repeated
    /// rendering of the same template, use [`add_template`](Self::add_template)
    /// and [`render_named`](Self::render_named).
    fn render_template(&self, template: &str, data: &serde_json::Value) -> Result<String, RenderError>;

    /// Adds a named template to the engine.
    ///
    /// The name decides auto-escaping: names ending in `.html` escape HTML.
    fn add_template(&mut self, name: &str, source: &str) -> Result<(), RenderError>;

    /// Renders a previously registered template.
    fn render_named(&self, name: &str, data: &serde_json::Value) -> Result<String, RenderError>;

    /// Checks if a template with the given name exists.
    fn has_template(&self, name: &str) -> bool;
}

/// MiniJinja-based template engine.
///
/// # Example
///
/// ```rust
/// use cardreel_render::template::{MiniJinjaEngine, TemplateEngine};
/// use serde_json::json;
///
/// let engine = MiniJinjaEngine::new();
/// let output = engine
///     .render_template("Hello, {{ name }}!", &json!({ "name": "Studio A" }))
///     .unwrap();
/// assert_eq!(output, "Hello, Studio A!");
/// ```
#[derive(Debug)]
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates a new engine with the card filters and globals registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_global("placeholder", Value::from(PLACEHOLDER_AVATAR));
        super::filters::register_filters(&mut env);
        Self { env }
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render_template(&self, template: &str, data: &serde_json::Value) -> Result<String, RenderError> {
        let value = Value::from_serialize(data);
        Ok(self.env.render_str(template, value)?)
    }

    fn add_template(&mut self, name: &str, source: &str) -> Result<(), RenderError> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())?;
        Ok(())
    }

    fn render_named(&self, name: &str, data: &serde_json::Value) -> Result<String, RenderError> {
        let tmpl = self.env.get_template(name)?;
        let value = Value::from_serialize(data);
        Ok(tmpl.render(value)?)
    }

    fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minijinja_engine_simple() {
        let engine = MiniJinjaEngine::new();
        let output = engine
            .render_template("Hello, {{ name }}!", &json!({ "name": "World" }))
            .unwrap();
        assert_eq!(output, "Hello, World!");
    }

    #[test]
    fn test_minijinja_engine_with_loop() {
        let engine = MiniJinjaEngine::new();
        let output = engine
            .render_template(
                "{% for item in items %}{{ item }},{% endfor %}",
                &json!({ "items": ["a", "b", "c"] }),
            )
            .unwrap();
        assert_eq!(output, "a,b,c,");
    }

    #[test]
    fn test_named_html_template_escapes() {
        let mut engine = MiniJinjaEngine::new();
        engine.add_template("t.html", "<p>{{ v }}</p>").unwrap();
        let output = engine
            .render_named("t.html", &json!({ "v": "<script>&" }))
            .unwrap();
        assert_eq!(output, "<p>&lt;script&gt;&amp;</p>");
    }

    #[test]
    fn test_has_template() {
        let mut engine = MiniJinjaEngine::new();
        assert!(!engine.has_template("card.html"));
        engine.add_template("card.html", "x").unwrap();
        assert!(engine.has_template("card.html"));
    }

    #[test]
    fn test_placeholder_global() {
        let engine = MiniJinjaEngine::new();
        let output = engine
            .render_template("{{ placeholder }}", &json!({}))
            .unwrap();
        assert_eq!(output, PLACEHOLDER_AVATAR);
    }

    #[test]
    fn test_template_error() {
        let engine = MiniJinjaEngine::new();
        let result = engine.render_template("{{ unclosed", &serde_json::Value::Null);
        assert!(matches!(result, Err(RenderError::TemplateError(_))));
    }

    #[test]
    fn test_missing_named_template() {
        let engine = MiniJinjaEngine::new();
        let result = engine.render_named("nope.html", &json!({}));
        assert!(matches!(result, Err(RenderError::TemplateNotFound(_))));
    }
}

//! The style catalog.
//!
//! [`StyleRegistry`] owns every [`StyleDefinition`] and resolves keys to
//! definitions. Resolution never fails: an unknown key (a typo, or a key
//! embedded in an artifact exported by an older catalog) resolves to the
//! fallback style so that both render targets still produce a card.
//!
//! Use [`StyleRegistry::lookup`] where a strict answer is wanted, such as
//! validating user input at the CLI boundary.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::StyleDefinition;
use crate::error::RenderError;

/// Key of the style used for unregistered keys.
pub const FALLBACK_STYLE: &str = "elegant_minimal";

static CATALOG_SOURCE: &str = include_str!("catalog.yaml");

static REGISTRY: Lazy<StyleRegistry> = Lazy::new(|| {
    StyleRegistry::from_yaml(CATALOG_SOURCE)
        .unwrap_or_else(|e| panic!("embedded style catalog is invalid: {}", e))
});

/// Returns the process-wide built-in catalog.
pub fn registry() -> &'static StyleRegistry {
    &REGISTRY
}

/// An ordered, immutable set of styles with a designated fallback.
#[derive(Debug)]
pub struct StyleRegistry {
    styles: Vec<StyleDefinition>,
    index: HashMap<String, usize>,
    fallback: usize,
}

impl StyleRegistry {
    /// Builds a registry from a YAML list of style definitions.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::CatalogError`] if the document does not parse,
    /// is empty, repeats a key, or lacks [`FALLBACK_STYLE`].
    pub fn from_yaml(source: &str) -> Result<Self, RenderError> {
        let styles: Vec<StyleDefinition> = serde_yaml::from_str(source)?;
        Self::from_definitions(styles)
    }

    /// Builds a registry from already-parsed definitions, keeping their order.
    pub fn from_definitions(styles: Vec<StyleDefinition>) -> Result<Self, RenderError> {
        if styles.is_empty() {
            return Err(RenderError::CatalogError("catalog has no styles".into()));
        }

        let mut index = HashMap::with_capacity(styles.len());
        for (position, style) in styles.iter().enumerate() {
            if style.key.trim().is_empty() {
                return Err(RenderError::CatalogError(format!(
                    "style #{} has an empty key",
                    position + 1
                )));
            }
            if index.insert(style.key.clone(), position).is_some() {
                return Err(RenderError::CatalogError(format!(
                    "duplicate style key: {}",
                    style.key
                )));
            }
        }

        let fallback = *index.get(FALLBACK_STYLE).ok_or_else(|| {
            RenderError::CatalogError(format!("fallback style '{}' is missing", FALLBACK_STYLE))
        })?;

        Ok(Self {
            styles,
            index,
            fallback,
        })
    }

    /// Resolves a key, substituting the fallback style for unknown keys.
    pub fn get(&self, key: &str) -> &StyleDefinition {
        match self.lookup(key) {
            Some(style) => style,
            None => {
                log::warn!(
                    "unknown style key '{}', using '{}'",
                    key,
                    self.fallback().key
                );
                self.fallback()
            }
        }
    }

    /// Resolves a key strictly.
    pub fn lookup(&self, key: &str) -> Option<&StyleDefinition> {
        self.index.get(key.trim()).map(|&i| &self.styles[i])
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// The style used in place of unknown keys.
    pub fn fallback(&self) -> &StyleDefinition {
        &self.styles[self.fallback]
    }

    /// All styles in catalog order.
    pub fn all(&self) -> &[StyleDefinition] {
        &self.styles
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(|s| s.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Archetype, AvatarShape, BadgeKind, HexColor};

    fn definition(key: &str) -> StyleDefinition {
        StyleDefinition {
            key: key.to_string(),
            label: key.to_uppercase(),
            sub_label: String::new(),
            archetype: Archetype::Centered,
            avatar: AvatarShape::Circle,
            badge: BadgeKind::Pill,
            backdrop: "#fff".into(),
            surface: "#fff".into(),
            text: HexColor::new(0, 0, 0),
            muted: HexColor::new(90, 90, 90),
            accent: HexColor::new(200, 0, 0),
            font: "serif".into(),
            border: "none".into(),
            uppercase: false,
        }
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let registry = registry();
        assert!(registry.len() >= 20);
        assert_eq!(registry.fallback().key, FALLBACK_STYLE);
    }

    #[test]
    fn test_builtin_catalog_has_all_theme_keys() {
        for key in [
            "elegant_minimal",
            "playful_pop",
            "modern_grid",
            "rustic_garden",
            "luxury_marble",
            "vintage_polaroid",
            "japanese_zen",
            "boho_chic",
            "cyber_neon",
            "art_deco",
            "comic_pop",
            "watercolor_dream",
            "industrial_chic",
            "anime_manga",
            "ios_modern",
            "muji_simple",
            "coffee_house",
            "nordic_hygge",
            "wabi_sabi",
            "japanese_traditional",
            "sci_fi_hud",
            "street_graffiti",
            "cute_kawaii",
        ] {
            assert!(registry().is_registered(key), "missing style {}", key);
        }
    }

    #[test]
    fn test_unknown_key_falls_back() {
        let style = registry().get("nonexistent_key");
        assert_eq!(style.key, FALLBACK_STYLE);
        assert!(registry().lookup("nonexistent_key").is_none());
    }

    #[test]
    fn test_get_trims_key() {
        assert_eq!(registry().get("  cyber_neon ").key, "cyber_neon");
    }

    #[test]
    fn test_keys_are_in_catalog_order() {
        let keys: Vec<&str> = registry().keys().collect();
        assert_eq!(keys[0], FALLBACK_STYLE);
        assert_eq!(keys.len(), registry().all().len());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = StyleRegistry::from_definitions(vec![
            definition(FALLBACK_STYLE),
            definition(FALLBACK_STYLE),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate style key"));
    }

    #[test]
    fn test_missing_fallback_rejected() {
        let err = StyleRegistry::from_definitions(vec![definition("only_one")]).unwrap_err();
        assert!(err.to_string().contains("fallback"));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(StyleRegistry::from_definitions(Vec::new()).is_err());
        assert!(StyleRegistry::from_yaml("[]").is_err());
    }

    #[test]
    fn test_bad_color_in_yaml_rejected() {
        let yaml = r##"
- key: elegant_minimal
  label: A
  sub_label: B
  archetype: centered
  avatar: circle
  badge: pill
  backdrop: "#fff"
  surface: "#fff"
  text: "#zzzzzz"
  muted: "#777"
  accent: "#000"
  font: serif
"##;
        assert!(StyleRegistry::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_border_defaults_to_none() {
        let yaml = r##"
- key: elegant_minimal
  label: A
  sub_label: B
  archetype: split
  avatar: square
  badge: hidden
  backdrop: "#fff"
  surface: "#fff"
  text: "#111"
  muted: "#777"
  accent: "#000"
  font: serif
"##;
        let registry = StyleRegistry::from_yaml(yaml).unwrap();
        assert_eq!(registry.fallback().border, "none");
        assert!(!registry.fallback().uppercase);
    }
}

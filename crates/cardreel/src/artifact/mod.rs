//! Self-contained HTML export of a reel.
//!
//! [`ArtifactGenerator::generate`] freezes a vendor list and a style into one
//! document:
//!
//! - every card, in list order, rendered by the same [`CardRenderer`] the
//!   live preview's layouts go through, so card markup is byte-identical,
//! - the style sheet of the resolved style, inlined,
//! - a JSON manifest (`#reel-manifest`) with the style key, dwell time and
//!   card ids,
//! - a small script that reads the manifest and re-runs the rotation:
//!   fixed-interval modular advance, no timer for fewer than two cards,
//!   space to pause, arrow keys to jump.
//!
//! Generation never touches the filesystem; [`Artifact::write_to`] does
//! that separately. [`replay`] reads a generated document back and computes
//! which card it shows after a given time, using [`CarouselEngine`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cardreel_render::{layout_card, registry, CardLayout, CardRenderer, RenderError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::carousel::{clamp_duration, CarouselEngine};
use crate::vendor::Vendor;

const DOCUMENT_TEMPLATE: &str = "reel.html";
const DOCUMENT_SOURCE: &str = include_str!("document.html");
const REEL_SCRIPT: &str = include_str!("reel.js");
const MANIFEST_OPEN: &str = r#"<script type="application/json" id="reel-manifest">"#;
const MANIFEST_CLOSE: &str = "</script>";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to render artifact: {0}")]
    Render(#[from] RenderError),

    #[error("document has no reel manifest")]
    MissingManifest,

    #[error("invalid reel manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Configuration the exported script runs from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub style: String,
    pub duration_ms: u64,
    /// Card ids in rotation order. Empty for an empty reel.
    pub cards: Vec<String>,
}

/// A generated document and the name it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub content: String,
}

impl Artifact {
    /// Writes the document into `dir` and returns the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ArtifactError> {
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.content).map_err(|source| ArtifactError::Write {
            path: path.clone(),
            source,
        })?;
        log::info!("wrote {} ({} bytes)", path.display(), self.content.len());
        Ok(path)
    }
}

#[derive(Serialize)]
struct CardEntry {
    id: String,
    html: String,
}

/// Builds export documents.
#[derive(Debug)]
pub struct ArtifactGenerator {
    renderer: CardRenderer,
}

impl ArtifactGenerator {
    pub fn new() -> Result<Self, ArtifactError> {
        let mut renderer = CardRenderer::new()?;
        renderer.add_template(DOCUMENT_TEMPLATE, DOCUMENT_SOURCE)?;
        Ok(Self { renderer })
    }

    /// The renderer cards are drawn with.
    pub fn renderer(&self) -> &CardRenderer {
        &self.renderer
    }

    /// Generates the document for `vendors` under `style_key`.
    ///
    /// Unknown style keys resolve to the fallback style, and the file name
    /// uses the resolved key. An empty list yields the empty-state card.
    pub fn generate(
        &self,
        vendors: &[Vendor],
        style_key: &str,
        duration: Duration,
    ) -> Result<Artifact, ArtifactError> {
        let style = registry().get(style_key);
        let duration = clamp_duration(duration);

        // Layouts own their data; nothing below borrows from the caller.
        let layouts: Vec<CardLayout> = vendors
            .iter()
            .map(|vendor| layout_card(&vendor.card_source(), style))
            .collect();

        let manifest = Manifest {
            style: style.key.clone(),
            duration_ms: duration.as_millis() as u64,
            cards: layouts.iter().map(|card| card.card_id.clone()).collect(),
        };

        let shown = if layouts.is_empty() {
            vec![CardLayout::empty(style)]
        } else {
            layouts
        };
        let cards = shown
            .iter()
            .map(|card| {
                Ok(CardEntry {
                    id: card.card_id.clone(),
                    html: self.renderer.render_card_html(card)?,
                })
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        let stylesheet = self.renderer.render_stylesheet(style)?;
        let content = self.renderer.render(
            DOCUMENT_TEMPLATE,
            &json!({
                "title": format!("廠商名片輪播 · {}", style.label),
                "style_key": style.key,
                "stylesheet": stylesheet,
                "cards": cards,
                "count": manifest.cards.len(),
                "manifest": manifest,
                "script": REEL_SCRIPT,
            }),
        )?;

        log::debug!(
            "generated artifact for {} card(s) in style {}",
            manifest.cards.len(),
            style.key
        );

        Ok(Artifact {
            file_name: file_name_for(&style.key),
            content,
        })
    }
}

/// `vendor-card-list-<key>.html`
pub fn file_name_for(style_key: &str) -> String {
    format!("vendor-card-list-{}.html", style_key)
}

/// Generates a document with a one-off generator.
pub fn generate(
    vendors: &[Vendor],
    style_key: &str,
    duration: Duration,
) -> Result<Artifact, ArtifactError> {
    ArtifactGenerator::new()?.generate(vendors, style_key, duration)
}

/// Extracts the manifest from a generated document.
pub fn read_manifest(document: &str) -> Result<Manifest, ArtifactError> {
    let start = document
        .find(MANIFEST_OPEN)
        .ok_or(ArtifactError::MissingManifest)?
        + MANIFEST_OPEN.len();
    let len = document[start..]
        .find(MANIFEST_CLOSE)
        .ok_or(ArtifactError::MissingManifest)?;
    Ok(serde_json::from_str(&document[start..start + len])?)
}

/// Index of the card a generated document shows `elapsed` after load.
///
/// Returns `None` if the document has no readable manifest or no cards.
pub fn replay(document: &str, elapsed: Duration) -> Option<usize> {
    let manifest = read_manifest(document).ok()?;
    let mut engine = CarouselEngine::new(
        manifest.cards,
        manifest.style,
        Duration::from_millis(manifest.duration_ms),
    );
    if engine.len() > 1 {
        engine.play(Duration::ZERO);
    }
    engine.poll(elapsed);
    engine.current_index()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendors() -> Vec<Vendor> {
        vec![
            Vendor::with_id("a").handle_of("studio_a").in_role("婚禮攝影"),
            Vendor::with_id("b").handle_of("makeup_b").in_role("新娘秘書"),
            Vendor::with_id("c").handle_of("flower_c").in_role("婚禮花藝"),
        ]
    }

    #[test]
    fn test_file_name_uses_resolved_key() {
        let artifact = generate(&vendors(), "nonexistent_key", Duration::from_secs(5)).unwrap();
        assert_eq!(artifact.file_name, "vendor-card-list-elegant_minimal.html");

        let artifact = generate(&vendors(), "cyber_neon", Duration::from_secs(5)).unwrap();
        assert_eq!(artifact.file_name, "vendor-card-list-cyber_neon.html");
    }

    #[test]
    fn test_manifest_round_trip() {
        let artifact = generate(&vendors(), "luxury_marble", Duration::from_millis(3000)).unwrap();
        let manifest = read_manifest(&artifact.content).unwrap();
        assert_eq!(manifest.style, "luxury_marble");
        assert_eq!(manifest.duration_ms, 3000);
        assert_eq!(manifest.cards, vec!["a", "b", "c"]);
        assert!(artifact.content.contains(r#"data-dwell="3s""#));
    }

    #[test]
    fn test_cards_in_list_order() {
        let artifact = generate(&vendors(), "elegant_minimal", Duration::from_secs(5)).unwrap();
        let a = artifact.content.find(r#"data-card-id="a""#).unwrap();
        let b = artifact.content.find(r#"data-card-id="b""#).unwrap();
        let c = artifact.content.find(r#"data-card-id="c""#).unwrap();
        assert!(a < b && b < c);
        assert!(artifact.content.contains(r#"data-index="2""#));
        assert!(artifact.content.contains("共 3 位廠商"));
    }

    #[test]
    fn test_duration_is_clamped() {
        let artifact = generate(&vendors(), "elegant_minimal", Duration::from_millis(1)).unwrap();
        assert_eq!(read_manifest(&artifact.content).unwrap().duration_ms, 500);
    }

    #[test]
    fn test_manifest_survives_hostile_ids() {
        let list = vec![Vendor::with_id("</script><b>x"), Vendor::with_id("ok")];
        let artifact = generate(&list, "elegant_minimal", Duration::from_secs(5)).unwrap();
        let manifest = read_manifest(&artifact.content).unwrap();
        assert_eq!(manifest.cards[0], "</script><b>x");
    }

    #[test]
    fn test_missing_manifest() {
        assert!(matches!(
            read_manifest("<html></html>"),
            Err(ArtifactError::MissingManifest)
        ));
        assert_eq!(replay("<html></html>", Duration::ZERO), None);
    }

    #[test]
    fn test_replay_follows_rotation() {
        let artifact = generate(&vendors(), "elegant_minimal", Duration::from_secs(5)).unwrap();
        assert_eq!(replay(&artifact.content, Duration::from_millis(4999)), Some(0));
        assert_eq!(replay(&artifact.content, Duration::from_secs(5)), Some(1));
        assert_eq!(replay(&artifact.content, Duration::from_secs(15)), Some(0));
    }

    #[test]
    fn test_single_card_never_moves() {
        let list = vec![Vendor::with_id("only")];
        let artifact = generate(&list, "elegant_minimal", Duration::from_secs(5)).unwrap();
        assert_eq!(replay(&artifact.content, Duration::from_secs(60)), Some(0));
        // The inlined stylesheet always names .reel__dot; check the markup.
        assert!(!artifact.content.contains(r#"class="reel__dot"#));
        assert!(!artifact.content.contains(r#"<nav class="reel__status""#));
    }

    #[test]
    fn test_multi_card_status_dots() {
        let artifact = generate(&vendors(), "elegant_minimal", Duration::from_secs(5)).unwrap();
        assert_eq!(artifact.content.matches(r#"class="reel__dot"#).count(), 3);
        assert!(artifact.content.contains(r#"<nav class="reel__status""#));
    }

    /// `(data-index, data-card-id)` of every slide, in document order.
    fn slides(document: &str) -> Vec<(usize, String)> {
        const OPEN: &str = r#"<section class="reel__slide"#;
        document
            .match_indices(OPEN)
            .map(|(at, _)| {
                let tag = &document[at..];
                let tag = &tag[..tag.find('>').unwrap()];
                let attr = |name: &str| {
                    let key = format!(r#"{}=""#, name);
                    let start = tag.find(&key).unwrap() + key.len();
                    tag[start..start + tag[start..].find('"').unwrap()].to_string()
                };
                (attr("data-index").parse().unwrap(), attr("data-card-id"))
            })
            .collect()
    }

    #[test]
    fn test_slides_line_up_with_manifest() {
        for count in [0, 1, 3] {
            let list: Vec<Vendor> = vendors().into_iter().take(count).collect();
            let artifact = generate(&list, "elegant_minimal", Duration::from_secs(5)).unwrap();
            let manifest = read_manifest(&artifact.content).unwrap();
            let slides = slides(&artifact.content);
            assert_eq!(manifest.cards.len(), count);

            if count == 0 {
                // One empty-state slide the script never rotates.
                assert_eq!(slides.len(), 1);
                assert_eq!(slides[0].0, 0);
                continue;
            }
            assert_eq!(slides.len(), count);
            for (position, (index, id)) in slides.iter().enumerate() {
                assert_eq!(*index, position);
                assert_eq!(id, &manifest.cards[position]);
            }
        }
    }

    #[test]
    fn test_script_is_inlined() {
        let artifact = generate(&vendors(), "elegant_minimal", Duration::from_secs(5)).unwrap();
        assert!(artifact.content.contains("reel-manifest"));
        assert!(artifact.content.contains("window.setTimeout"));
        assert!(artifact.content.contains("ArrowRight"));
        assert!(!artifact.content.contains("<script src"));
        assert!(!artifact.content.contains("<link"));
    }
}

//! Output mode control for listing commands.
//!
//! [`OutputMode`] is the user-facing `--output` flag. Text modes go through a
//! caller-supplied formatter; structured modes serialize the data directly.

use clap::ValueEnum;
use console::Term;
use serde::Serialize;

/// Controls how command output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// Auto-detect: TTY gets Term, pipe gets Text
    #[default]
    Auto,
    /// Always use terminal styling
    Term,
    /// Never use styling (plain text)
    Text,
    /// Serialize data as JSON
    Json,
    /// Serialize data as YAML
    Yaml,
}

impl OutputMode {
    /// Resolves Auto mode to concrete Term or Text based on TTY detection.
    ///
    /// For non-Auto modes, returns self unchanged.
    pub fn resolve_auto(&self) -> OutputMode {
        match self {
            OutputMode::Auto => {
                if Term::stdout().is_term() {
                    OutputMode::Term
                } else {
                    OutputMode::Text
                }
            }
            other => *other,
        }
    }

    /// Formats `data` for this mode. `text` receives whether to style.
    pub fn format<T, F>(&self, data: &T, text: F) -> Result<String, OutputError>
    where
        T: Serialize,
        F: FnOnce(bool) -> String,
    {
        match self.resolve_auto() {
            OutputMode::Json => Ok(serde_json::to_string_pretty(data)?),
            OutputMode::Yaml => Ok(serde_yaml::to_string(data)?.trim_end().to_string()),
            mode => Ok(text(mode == OutputMode::Term)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_mode_default_is_auto() {
        assert_eq!(OutputMode::default(), OutputMode::Auto);
    }

    #[test]
    fn test_resolve_auto_non_auto_unchanged() {
        assert_eq!(OutputMode::Term.resolve_auto(), OutputMode::Term);
        assert_eq!(OutputMode::Json.resolve_auto(), OutputMode::Json);
    }

    #[test]
    fn test_format_structured_skips_text() {
        let data = json!({ "key": "cyber_neon" });
        let out = OutputMode::Json
            .format(&data, |_| panic!("text formatter called"))
            .unwrap();
        assert!(out.contains("\"key\": \"cyber_neon\""));

        let out = OutputMode::Yaml.format(&data, |_| String::new()).unwrap();
        assert_eq!(out, "key: cyber_neon");
    }

    #[test]
    fn test_format_text_modes() {
        let data = json!([]);
        assert_eq!(
            OutputMode::Text.format(&data, |styled| styled.to_string()).unwrap(),
            "false"
        );
        assert_eq!(
            OutputMode::Term.format(&data, |styled| styled.to_string()).unwrap(),
            "true"
        );
    }
}

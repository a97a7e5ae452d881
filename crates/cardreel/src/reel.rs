//! The reel file: the on-disk working copy of a vendor list.
//!
//! A reel is plain YAML. Every field is optional; missing values take the
//! defaults below, and vendor records are repaired on load (see
//! [`Vendor`](crate::vendor::Vendor) deserialization).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cardreel_render::FALLBACK_STYLE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::carousel::{clamp_duration, DEFAULT_DURATION};
use crate::vendor::{Vendor, VendorList};

/// File name used when no `--reel` path is given.
pub const DEFAULT_REEL_FILE: &str = "reel.yaml";

#[derive(Debug, Error)]
pub enum ReelError {
    #[error("reel file {} not found (run `cardreel init` to create one)", .0.display())]
    NotFound(PathBuf),

    #[error("reel file {} already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize reel: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

fn default_style() -> String {
    FALLBACK_STYLE.to_string()
}

fn default_duration_ms() -> u64 {
    DEFAULT_DURATION.as_millis() as u64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelFile {
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default)]
    pub vendors: VendorList,
}

impl Default for ReelFile {
    fn default() -> Self {
        Self {
            style: default_style(),
            duration_ms: default_duration_ms(),
            vendors: VendorList::default(),
        }
    }
}

impl ReelFile {
    /// A reel with two sample vendors, written by `cardreel init`.
    pub fn starter() -> Self {
        let vendors = VendorList::new(vec![
            Vendor::new().handle_of("studio_a").in_role("婚禮攝影"),
            Vendor::new().handle_of("makeup_b").in_role("新娘秘書"),
        ]);
        Self {
            vendors,
            ..Self::default()
        }
    }

    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document is a valid, empty reel
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source)
    }

    pub fn to_yaml(&self) -> Result<String, ReelError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, ReelError> {
        let source = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ReelError::NotFound(path.to_path_buf())
            } else {
                ReelError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let reel = Self::from_yaml(&source).map_err(|source| ReelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "loaded {} with {} vendor(s), style {}",
            path.display(),
            reel.vendors.len(),
            reel.style
        );
        Ok(reel)
    }

    pub fn save(&self, path: &Path) -> Result<(), ReelError> {
        let yaml = self.to_yaml()?;
        fs::write(path, yaml).map_err(|source| ReelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("saved {}", path.display());
        Ok(())
    }

    /// Writes a starter reel, refusing to clobber an existing file unless `force`.
    pub fn init(path: &Path, force: bool) -> Result<Self, ReelError> {
        if path.exists() && !force {
            return Err(ReelError::AlreadyExists(path.to_path_buf()));
        }
        let reel = Self::starter();
        reel.save(path)?;
        Ok(reel)
    }

    pub fn duration(&self) -> Duration {
        clamp_duration(Duration::from_millis(self.duration_ms))
    }

    /// Effective style and dwell, with per-run overrides taking precedence.
    pub fn settings(&self, style: Option<&str>, duration_ms: Option<u64>) -> (String, Duration) {
        let style = style.unwrap_or(&self.style).to_string();
        let duration = duration_ms
            .map(|ms| clamp_duration(Duration::from_millis(ms)))
            .unwrap_or_else(|| self.duration());
        (style, duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_for_missing_fields() {
        let reel = ReelFile::from_yaml("vendors: []\n").unwrap();
        assert_eq!(reel.style, "elegant_minimal");
        assert_eq!(reel.duration_ms, 5000);
        assert!(reel.vendors.is_empty());

        assert_eq!(ReelFile::from_yaml("").unwrap(), ReelFile::default());
    }

    #[test]
    fn test_vendor_records_are_repaired() {
        let yaml = r#"
style: cyber_neon
duration_ms: 3000
vendors:
  - name: Studio A
    handle: "@studio_a"
    url: https://example.com/wrong
"#;
        let reel = ReelFile::from_yaml(yaml).unwrap();
        let vendor = &reel.vendors.as_slice()[0];
        assert_eq!(vendor.handle(), "studio_a");
        assert_eq!(vendor.url(), "https://www.instagram.com/studio_a");
        assert_eq!(vendor.role(), "婚禮廠商");
        assert!(!vendor.id().is_empty());
        assert_eq!(reel.duration(), Duration::from_millis(3000));
    }

    #[test]
    fn test_remove_by_position_with_shared_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reel.yaml");
        let yaml = "vendors:\n  - id: same\n    name: first\n  - id: same\n    name: second\n";
        fs::write(&path, yaml).unwrap();

        let mut reel = ReelFile::load(&path).unwrap();
        let index = reel.vendors.resolve_index("#2").unwrap();
        assert_eq!(reel.vendors.remove_at(index).unwrap().name(), "second");
        reel.save(&path).unwrap();

        let reel = ReelFile::load(&path).unwrap();
        assert_eq!(reel.vendors.len(), 1);
        assert_eq!(reel.vendors.as_slice()[0].name(), "first");
        assert_eq!(reel.vendors.as_slice()[0].id(), "same");
    }

    #[test]
    fn test_settings_precedence() {
        let reel = ReelFile {
            style: "cyber_neon".into(),
            duration_ms: 3000,
            ..ReelFile::default()
        };
        assert_eq!(
            reel.settings(None, None),
            ("cyber_neon".to_string(), Duration::from_millis(3000))
        );
        assert_eq!(
            reel.settings(Some("art_deco"), Some(100)),
            ("art_deco".to_string(), Duration::from_millis(500))
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reel.yaml");
        let reel = ReelFile::starter();
        reel.save(&path).unwrap();
        assert_eq!(ReelFile::load(&path).unwrap(), reel);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ReelFile::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ReelError::NotFound(_)));
        assert!(err.to_string().contains("cardreel init"));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reel.yaml");
        fs::write(&path, "vendors: [unclosed").unwrap();
        assert!(matches!(ReelFile::load(&path), Err(ReelError::Parse { .. })));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reel.yaml");
        ReelFile::init(&path, false).unwrap();
        assert!(matches!(
            ReelFile::init(&path, false),
            Err(ReelError::AlreadyExists(_))
        ));
        assert_eq!(ReelFile::init(&path, true).unwrap().vendors.len(), 2);
    }
}

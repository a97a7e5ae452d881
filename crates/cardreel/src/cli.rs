//! Command-line interface.
//!
//! Every command works on a reel file (`--reel`, default `reel.yaml`).
//! Editing commands load it, apply one change through the vendor model and
//! save it back; `preview` and `export` read it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use cardreel_render::{display_width, registry, StyleDefinition};
use clap::{Args, Parser, Subcommand};
use console::{Key, Style, Term};
use serde::Serialize;

use crate::artifact::ArtifactGenerator;
use crate::output::OutputMode;
use crate::preview::{self, LivePreviewHost, TerminalSurface};
use crate::reel::{ReelFile, DEFAULT_REEL_FILE};
use crate::vendor::{Vendor, VendorField};

#[derive(Debug, Parser)]
#[command(name = "cardreel", version)]
#[command(about = "Rotating vendor card slideshows: live terminal preview and self-contained HTML export")]
pub struct Cli {
    /// Reel file to work on
    #[arg(long, global = true, default_value = DEFAULT_REEL_FILE)]
    pub reel: PathBuf,

    /// Output format for listing commands
    #[arg(long, global = true, value_enum, default_value_t = OutputMode::Auto)]
    pub output: OutputMode,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write a starter reel with two sample vendors
    Init {
        /// Overwrite an existing reel file
        #[arg(long)]
        force: bool,
    },
    /// List available styles
    Styles,
    /// List vendors in rotation order
    Vendors,
    /// Append a vendor
    Add {
        #[arg(long)]
        handle: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
        /// Avatar URL or data URI
        #[arg(long)]
        image: Option<String>,
    },
    /// Remove a vendor by id or position (#n)
    Remove {
        #[arg(value_name = "REF")]
        reference: String,
    },
    /// Change one field of a vendor
    Set {
        #[arg(value_name = "REF")]
        reference: String,
        /// name, role, handle or image
        field: VendorField,
        value: String,
    },
    /// Set the reel's style
    UseStyle { key: String },
    /// Play the reel in the terminal
    Preview {
        #[command(flatten)]
        show: ShowArgs,
        /// Start paused
        #[arg(long)]
        paused: bool,
    },
    /// Write the reel as a self-contained HTML file
    Export {
        #[command(flatten)]
        show: ShowArgs,
        /// Directory to write into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

/// Per-run overrides of the reel's style and dwell time.
#[derive(Debug, Clone, Default, Args)]
pub struct ShowArgs {
    /// Style key (unknown keys fall back to the default style)
    #[arg(long, env = "CARDREEL_STYLE")]
    pub style: Option<String>,

    /// Dwell time per card, in milliseconds
    #[arg(long = "duration-ms", env = "CARDREEL_DURATION_MS")]
    pub duration_ms: Option<u64>,
}

impl ShowArgs {
    fn settings(&self, reel: &ReelFile) -> (String, Duration) {
        reel.settings(self.style.as_deref(), self.duration_ms)
    }
}

/// Runs a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let path = cli.reel.as_path();
    match cli.command {
        Command::Init { force } => {
            let reel = ReelFile::init(path, force)?;
            println!(
                "Created {} with {} vendors (style {})",
                path.display(),
                reel.vendors.len(),
                reel.style
            );
        }
        Command::Styles => println!("{}", styles_listing(cli.output)?),
        Command::Vendors => {
            let reel = ReelFile::load(path)?;
            println!("{}", vendors_listing(&reel, cli.output)?);
        }
        Command::Add {
            handle,
            name,
            role,
            image,
        } => {
            let mut reel = ReelFile::load(path)?;
            let mut vendor = Vendor::new();
            if let Some(handle) = handle {
                vendor.set_handle(&handle);
            }
            if let Some(name) = name {
                vendor.set_name(name);
            }
            if let Some(role) = role {
                vendor.set_role(role);
            }
            if let Some(image) = image {
                vendor.set_image_url(image.trim());
            }
            let added = reel.vendors.add(vendor).id().to_string();
            reel.save(path)?;
            println!("Added #{} ({})", reel.vendors.len(), added);
        }
        Command::Remove { reference } => {
            let mut reel = ReelFile::load(path)?;
            let index = reel.vendors.resolve_index(&reference)?;
            let removed = reel.vendors.remove_at(index)?;
            reel.save(path)?;
            println!("Removed {}", describe(&removed));
        }
        Command::Set {
            reference,
            field,
            value,
        } => {
            let mut reel = ReelFile::load(path)?;
            let id = reel.vendors.resolve(&reference)?.id().to_string();
            let vendor = reel.vendors.update(&id, field, &value)?;
            let summary = format!("Updated {} of {}", field, describe(vendor));
            reel.save(path)?;
            println!("{}", summary);
        }
        Command::UseStyle { key } => {
            let style = strict_style(&key)?;
            let mut reel = ReelFile::load(path)?;
            reel.style = style.key.clone();
            reel.save(path)?;
            println!("Style set to {} ({} {})", style.key, style.label, style.sub_label);
        }
        Command::Preview { show, paused } => run_preview(path, &show, paused)?,
        Command::Export { show, out_dir } => {
            let written = export(path, &show, &out_dir)?;
            println!("{}", written.display());
        }
    }
    Ok(())
}

fn describe(vendor: &Vendor) -> String {
    if vendor.name().is_empty() {
        vendor.id().to_string()
    } else {
        format!("{} ({})", vendor.name(), vendor.id())
    }
}

fn strict_style(key: &str) -> Result<&'static StyleDefinition> {
    match registry().lookup(key) {
        Some(style) => Ok(style),
        None => bail!(
            "unknown style '{}'; run `cardreel styles` to see the {} available styles",
            key.trim(),
            registry().len()
        ),
    }
}

#[derive(Serialize)]
struct StyleRow<'a> {
    key: &'a str,
    label: &'a str,
    sub_label: &'a str,
    archetype: &'static str,
}

/// The `styles` listing.
pub fn styles_listing(mode: OutputMode) -> Result<String> {
    let rows: Vec<StyleRow<'_>> = registry()
        .all()
        .iter()
        .map(|style| StyleRow {
            key: &style.key,
            label: &style.label,
            sub_label: &style.sub_label,
            archetype: style.archetype.as_str(),
        })
        .collect();

    let text = |styled: bool| {
        let key_width = rows.iter().map(|r| display_width(r.key)).max().unwrap_or(0);
        let muted = Style::new().dim().force_styling(styled);
        rows.iter()
            .map(|row| {
                let accent = Style::new()
                    .fg(registry().get(row.key).accent.to_console())
                    .bold()
                    .force_styling(styled);
                let pad = " ".repeat(key_width - display_width(row.key));
                format!(
                    "{}{}  {} {}  {}",
                    accent.apply_to(row.key),
                    pad,
                    row.label,
                    muted.apply_to(row.sub_label),
                    muted.apply_to(format!("[{}]", row.archetype))
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    Ok(mode.format(&rows, text)?)
}

/// The `vendors` listing.
pub fn vendors_listing(reel: &ReelFile, mode: OutputMode) -> Result<String> {
    let text = |styled: bool| {
        let bold = Style::new().bold().force_styling(styled);
        let muted = Style::new().dim().force_styling(styled);
        let mut lines: Vec<String> = reel
            .vendors
            .iter()
            .enumerate()
            .map(|(i, vendor)| {
                let handle = if vendor.handle().is_empty() {
                    String::new()
                } else {
                    format!("@{}", vendor.handle())
                };
                format!(
                    "#{:<3} {}  {}  {}  {}",
                    i + 1,
                    bold.apply_to(vendor.name()),
                    handle,
                    vendor.role(),
                    muted.apply_to(vendor.id())
                )
            })
            .collect();
        lines.push(format!("共 {} 位廠商", reel.vendors.len()));
        lines.join("\n")
    };
    Ok(mode.format(&reel.vendors, text)?)
}

/// Generates the export document and writes it into `out_dir`.
pub fn export(reel_path: &Path, show: &ShowArgs, out_dir: &Path) -> Result<PathBuf> {
    let reel = ReelFile::load(reel_path)?;
    let (style, duration) = show.settings(&reel);
    let artifact = ArtifactGenerator::new()?.generate(reel.vendors.as_slice(), &style, duration)?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    Ok(artifact.write_to(out_dir)?)
}

fn run_preview(reel_path: &Path, show: &ShowArgs, paused: bool) -> Result<()> {
    let term = Term::stdout();
    if !term.is_term() {
        bail!("preview needs an interactive terminal; use `cardreel export` instead");
    }

    let reel = ReelFile::load(reel_path)?;
    let (style, duration) = show.settings(&reel);
    let host = LivePreviewHost::new(reel.vendors.snapshot(), &style, duration, TerminalSurface::stdout());
    let handle = preview::spawn(host, paused);

    term.hide_cursor()?;
    let result = (|| -> Result<()> {
        loop {
            let command = match term.read_key()? {
                Key::Char('q') | Key::Escape => break,
                Key::Char(' ') => preview::Command::Toggle,
                Key::ArrowRight => preview::Command::Next,
                Key::ArrowLeft => preview::Command::Prev,
                Key::Char(c @ '1'..='9') => {
                    preview::Command::JumpTo(c as usize - '1' as usize)
                }
                // Reload the reel file, replacing the whole list
                Key::Char('r') => {
                    preview::Command::SetVendors(ReelFile::load(reel_path)?.vendors.snapshot())
                }
                _ => continue,
            };
            if !handle.send(command) {
                break;
            }
        }
        Ok(())
    })();

    drop(handle);
    term.show_cursor()?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_set_command() {
        let cli = Cli::try_parse_from(["cardreel", "set", "#2", "handle", "@studio_b"]).unwrap();
        match cli.command {
            Command::Set {
                reference,
                field,
                value,
            } => {
                assert_eq!(reference, "#2");
                assert_eq!(field, VendorField::Handle);
                assert_eq!(value, "@studio_b");
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.reel, PathBuf::from("reel.yaml"));
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        assert!(Cli::try_parse_from(["cardreel", "set", "#1", "email", "x"]).is_err());
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "cardreel", "styles", "--output", "json", "-vv", "--reel", "x.yaml",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputMode::Json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.reel, PathBuf::from("x.yaml"));
    }

    #[test]
    fn test_parse_export_flags() {
        let cli = Cli::try_parse_from([
            "cardreel",
            "export",
            "--style",
            "cyber_neon",
            "--duration-ms",
            "3000",
            "--out-dir",
            "dist",
        ])
        .unwrap();
        match cli.command {
            Command::Export { show, out_dir } => {
                assert_eq!(show.style.as_deref(), Some("cyber_neon"));
                assert_eq!(show.duration_ms, Some(3000));
                assert_eq!(out_dir, PathBuf::from("dist"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_styles_listing_text_and_json() {
        let text = styles_listing(OutputMode::Text).unwrap();
        assert_eq!(text.lines().count(), registry().len());
        assert!(text.starts_with("elegant_minimal"));
        assert!(!text.contains('\x1b'));

        let json = styles_listing(OutputMode::Json).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), registry().len());
        assert_eq!(rows[0]["key"], "elegant_minimal");
    }

    #[test]
    fn test_vendors_listing_counts() {
        let reel = ReelFile::starter();
        let text = vendors_listing(&reel, OutputMode::Text).unwrap();
        assert!(text.contains("#1"));
        assert!(text.contains("@studio_a"));
        assert!(text.ends_with("共 2 位廠商"));
    }

    #[test]
    fn test_strict_style() {
        assert!(strict_style("cyber_neon").is_ok());
        let err = strict_style("nonexistent_key").unwrap_err();
        assert!(err.to_string().contains("unknown style"));
    }

    #[test]
    fn test_export_writes_named_file() {
        let dir = TempDir::new().unwrap();
        let reel_path = dir.path().join("reel.yaml");
        ReelFile::init(&reel_path, false).unwrap();

        let show = ShowArgs {
            style: Some("nonexistent_key".into()),
            duration_ms: None,
        };
        let out = dir.path().join("dist");
        let written = export(&reel_path, &show, &out).unwrap();
        assert_eq!(written, out.join("vendor-card-list-elegant_minimal.html"));
        assert!(fs::read_to_string(written).unwrap().contains("reel-manifest"));
    }
}

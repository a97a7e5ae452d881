//! # cardreel - Rotating Vendor Card Slideshows
//!
//! `cardreel` rotates a list of vendor cards under one visual style. The same
//! reel can be watched live in the terminal or exported as a single HTML file
//! that keeps rotating on its own.
//!
//! ## Core Concepts
//!
//! - [`Vendor`] / [`VendorList`]: the edited data, with handle-derived URLs
//!   and a list that never becomes empty through deletion
//! - [`CarouselEngine`]: the rotation state machine, driven by explicit time
//! - [`LivePreviewHost`]: a carousel bound to a [`Surface`], optionally on
//!   its own thread via [`preview::spawn`]
//! - [`ArtifactGenerator`]: the self-contained export
//! - [`ReelFile`]: the YAML working copy the CLI edits
//!
//! Cards themselves are laid out and rendered by [`cardreel_render`].
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use cardreel::{artifact, Vendor};
//!
//! let vendors = vec![
//!     Vendor::with_id("a").handle_of("studio_a"),
//!     Vendor::with_id("b").handle_of("makeup_b"),
//! ];
//! let doc = artifact::generate(&vendors, "cyber_neon", Duration::from_secs(5)).unwrap();
//! assert_eq!(doc.file_name, "vendor-card-list-cyber_neon.html");
//! assert_eq!(artifact::replay(&doc.content, Duration::from_secs(5)), Some(1));
//! ```

pub mod artifact;
pub mod carousel;
pub mod cli;
pub mod output;
pub mod preview;
pub mod reel;
pub mod timer;
pub mod vendor;

pub use artifact::{Artifact, ArtifactError, ArtifactGenerator, Manifest};
pub use carousel::{CarouselEngine, PlayState, PresentationState, DEFAULT_DURATION, MIN_DURATION};
pub use output::OutputMode;
pub use preview::{Frame, LivePreviewHost, PreviewHandle, RecordingSurface, Surface, TerminalSurface};
pub use reel::{ReelError, ReelFile};
pub use timer::Timer;
pub use vendor::{Vendor, VendorError, VendorField, VendorList, DEFAULT_ROLE};

//! Vendor records and the editing rules the authoring form relies on.
//!
//! A [`Vendor`] keeps two invariants that the rest of the system depends on:
//!
//! - `url` is always derived from `handle`. Both are private and only change
//!   together through [`Vendor::set_handle`], and deserialization re-derives
//!   `url` instead of trusting the stored value.
//! - `name` follows the handle while the user has not typed a name of their
//!   own: it is replaced only when it is empty or still equal to the previous
//!   handle.
//!
//! [`VendorList`] is the ordered collection edited by the form. It refuses to
//! delete its last entry; the rotation order is the list order.

use std::fmt;
use std::str::FromStr;

use cardreel_render::{CardSource, PROFILE_ROOT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Role assigned to new vendors.
pub const DEFAULT_ROLE: &str = "婚禮廠商";

const PROFILE_BASE: &str = "https://www.instagram.com/";

/// Errors from editing a vendor list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VendorError {
    #[error("cannot remove the last vendor; a reel needs at least one")]
    LastVendor,

    #[error("no vendor matches '{0}'")]
    NotFound(String),

    #[error("unknown vendor field '{0}' (expected name, role, handle or image)")]
    UnknownField(String),
}

/// Strips a leading `@` and surrounding whitespace from a social handle.
///
/// ```rust
/// use cardreel::vendor::normalize_handle;
///
/// assert_eq!(normalize_handle("  @studio_a "), "studio_a");
/// ```
pub fn normalize_handle(raw: &str) -> String {
    raw.trim().trim_start_matches('@').trim().to_string()
}

/// Canonical profile URL for a normalized handle.
///
/// ```rust
/// use cardreel::vendor::profile_url;
///
/// assert_eq!(profile_url("studio_a"), "https://www.instagram.com/studio_a");
/// assert_eq!(profile_url(""), "https://instagram.com");
/// ```
pub fn profile_url(handle: &str) -> String {
    if handle.is_empty() {
        return PROFILE_ROOT.to_string();
    }
    match Url::parse(PROFILE_BASE) {
        Ok(mut url) => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(handle);
            }
            url.to_string()
        }
        Err(_) => format!("{}{}", PROFILE_BASE, handle),
    }
}

fn placeholder_image(seed: &str) -> String {
    let seed: String = seed.chars().filter(|c| c.is_ascii_alphanumeric()).take(12).collect();
    format!("https://picsum.photos/400/400?random={}", seed)
}

/// Editable vendor fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorField {
    Name,
    Role,
    Handle,
    ImageUrl,
}

impl FromStr for VendorField {
    type Err = VendorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(VendorField::Name),
            "role" => Ok(VendorField::Role),
            "handle" | "ig" => Ok(VendorField::Handle),
            "image" | "image_url" | "avatar" => Ok(VendorField::ImageUrl),
            other => Err(VendorError::UnknownField(other.to_string())),
        }
    }
}

impl fmt::Display for VendorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VendorField::Name => "name",
            VendorField::Role => "role",
            VendorField::Handle => "handle",
            VendorField::ImageUrl => "image",
        };
        f.write_str(name)
    }
}

/// Serialized form of a vendor. Every field is optional so hand-written reel
/// files only need what they care about.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VendorRecord {
    id: Option<String>,
    name: String,
    role: Option<String>,
    handle: String,
    url: Option<String>,
    image_url: Option<String>,
}

/// One presented entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VendorRecord")]
pub struct Vendor {
    id: String,
    name: String,
    role: String,
    handle: String,
    url: String,
    image_url: String,
}

impl From<VendorRecord> for Vendor {
    fn from(record: VendorRecord) -> Self {
        let mut vendor = match record.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => Vendor::with_id(id),
            None => Vendor::new(),
        };
        vendor.name = record.name;
        if let Some(role) = record.role {
            vendor.role = role;
        }
        if let Some(image_url) = record.image_url {
            vendor.image_url = image_url;
        }
        vendor.handle = normalize_handle(&record.handle);
        vendor.url = profile_url(&vendor.handle);
        if let Some(stored) = record.url {
            if stored != vendor.url {
                log::warn!(
                    "vendor {}: stored url {:?} does not match handle, using {:?}",
                    vendor.id,
                    stored,
                    vendor.url
                );
            }
        }
        vendor
    }
}

impl Default for Vendor {
    fn default() -> Self {
        Self::new()
    }
}

impl Vendor {
    /// Creates a vendor with a fresh id, the default role and a placeholder avatar.
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    /// Creates a vendor with a caller-chosen id.
    pub fn with_id(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            image_url: placeholder_image(&id),
            id,
            name: String::new(),
            role: DEFAULT_ROLE.to_string(),
            handle: String::new(),
            url: PROFILE_ROOT.to_string(),
        }
    }

    pub fn handle_of(mut self, handle: &str) -> Self {
        self.set_handle(handle);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn in_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Sets the handle, re-deriving the url and auto-filling the name.
    ///
    /// The name is replaced only when it is empty or equal to the previous
    /// handle, so a name typed by the user is never overwritten.
    pub fn set_handle(&mut self, raw: &str) {
        let handle = normalize_handle(raw);
        if self.name.is_empty() || self.name == self.handle {
            self.name = handle.clone();
        }
        self.url = profile_url(&handle);
        self.handle = handle;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_role(&mut self, role: impl Into<String>) {
        self.role = role.into();
    }

    pub fn set_image_url(&mut self, image_url: impl Into<String>) {
        self.image_url = image_url.into();
    }

    /// Applies a form edit to one field.
    pub fn update(&mut self, field: VendorField, value: &str) {
        match field {
            VendorField::Name => self.set_name(value),
            VendorField::Role => self.set_role(value),
            VendorField::Handle => self.set_handle(value),
            VendorField::ImageUrl => self.set_image_url(value.trim()),
        }
    }

    /// Borrowed view for the card renderer.
    pub fn card_source(&self) -> CardSource<'_> {
        CardSource {
            id: &self.id,
            name: &self.name,
            role: &self.role,
            handle: &self.handle,
            url: &self.url,
            image_url: &self.image_url,
        }
    }
}

/// The ordered vendor list edited by the form.
///
/// Ids are unique within a list: a vendor whose id is already taken gets a
/// fresh one when it is added, including on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Vendor>", into = "Vec<Vendor>")]
pub struct VendorList {
    vendors: Vec<Vendor>,
}

impl From<Vec<Vendor>> for VendorList {
    fn from(vendors: Vec<Vendor>) -> Self {
        Self::new(vendors)
    }
}

impl From<VendorList> for Vec<Vendor> {
    fn from(list: VendorList) -> Self {
        list.vendors
    }
}

impl VendorList {
    pub fn new(vendors: Vec<Vendor>) -> Self {
        let mut list = Self {
            vendors: Vec::with_capacity(vendors.len()),
        };
        for vendor in vendors {
            list.add(vendor);
        }
        list
    }

    /// Appends a new vendor with a placeholder avatar and default role.
    pub fn add_new(&mut self) -> &mut Vendor {
        self.add(Vendor::new())
    }

    pub fn add(&mut self, mut vendor: Vendor) -> &mut Vendor {
        if self.position(&vendor.id).is_some() {
            let fresh = uuid::Uuid::new_v4().to_string();
            log::warn!(
                "vendor id {:?} is already in use, reassigned to {:?}",
                vendor.id,
                fresh
            );
            vendor.id = fresh;
        }
        self.vendors.push(vendor);
        let last = self.vendors.len() - 1;
        &mut self.vendors[last]
    }

    /// Removes a vendor by id.
    ///
    /// # Errors
    ///
    /// [`VendorError::LastVendor`] if it is the only vendor left,
    /// [`VendorError::NotFound`] if no vendor has that id.
    pub fn remove(&mut self, id: &str) -> Result<Vendor, VendorError> {
        let position = self
            .position(id)
            .ok_or_else(|| VendorError::NotFound(id.to_string()))?;
        self.remove_at(position)
    }

    /// Removes the vendor at a 0-based position, with the same rules as
    /// [`remove`](Self::remove).
    pub fn remove_at(&mut self, index: usize) -> Result<Vendor, VendorError> {
        if index >= self.vendors.len() {
            return Err(VendorError::NotFound(format!("#{}", index + 1)));
        }
        if self.vendors.len() <= 1 {
            return Err(VendorError::LastVendor);
        }
        Ok(self.vendors.remove(index))
    }

    /// Applies a form edit to the vendor with the given id.
    pub fn update(&mut self, id: &str, field: VendorField, value: &str) -> Result<&Vendor, VendorError> {
        let vendor = self
            .get_mut(id)
            .ok_or_else(|| VendorError::NotFound(id.to_string()))?;
        vendor.update(field, value);
        Ok(vendor)
    }

    /// Resolves a user-facing reference: `#n` / `n` (1-based) or an id.
    pub fn resolve(&self, reference: &str) -> Result<&Vendor, VendorError> {
        let index = self.resolve_index(reference)?;
        Ok(&self.vendors[index])
    }

    /// Like [`resolve`](Self::resolve), but returns the 0-based position.
    pub fn resolve_index(&self, reference: &str) -> Result<usize, VendorError> {
        let reference = reference.trim();
        let by_index = reference
            .strip_prefix('#')
            .unwrap_or(reference)
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|&i| i < self.vendors.len());

        by_index
            .or_else(|| self.position(reference))
            .ok_or_else(|| VendorError::NotFound(reference.to_string()))
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.vendors.iter().position(|v| v.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Vendor> {
        self.vendors.iter_mut().find(|v| v.id == id)
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vendor> {
        self.vendors.iter()
    }

    pub fn as_slice(&self) -> &[Vendor] {
        &self.vendors
    }

    /// A complete, independent copy of the current list.
    pub fn snapshot(&self) -> Vec<Vendor> {
        self.vendors.clone()
    }
}

impl<'a> IntoIterator for &'a VendorList {
    type Item = &'a Vendor;
    type IntoIter = std::slice::Iter<'a, Vendor>;

    fn into_iter(self) -> Self::IntoIter {
        self.vendors.iter()
    }
}

//! Immutable libraries index.
//!
//! An index is never mutated after construction. Instances swap whole indexes
//! instead, so readers need no lock.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::{BoardkitError, Result};

/// One published release of a library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryRelease {
    pub name: String,
    pub version: semver::Version,
    pub url: Option<String>,
}

impl LibraryRelease {
    pub fn new(name: impl Into<String>, version: &str) -> Result<Self> {
        let version =
            semver::Version::parse(version).map_err(|e| BoardkitError::invalid_version(version, e))?;
        Ok(Self {
            name: name.into(),
            version,
            url: None,
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Releases grouped by library name, each group sorted by ascending version.
#[derive(Debug, Default)]
pub struct LibrariesIndex {
    libraries: BTreeMap<String, Vec<LibraryRelease>>,
}

static EMPTY_INDEX: OnceLock<Arc<LibrariesIndex>> = OnceLock::new();

impl LibrariesIndex {
    /// The shared empty index new instances start with.
    ///
    /// Every call returns the same allocation, so `Arc::ptr_eq` against it
    /// tells whether an instance has loaded an index yet.
    pub fn empty() -> Arc<LibrariesIndex> {
        EMPTY_INDEX
            .get_or_init(|| Arc::new(LibrariesIndex::default()))
            .clone()
    }

    /// Build an index from releases. Duplicate name/version pairs keep the last one.
    pub fn from_releases(releases: impl IntoIterator<Item = LibraryRelease>) -> Self {
        let mut libraries: BTreeMap<String, Vec<LibraryRelease>> = BTreeMap::new();
        for release in releases {
            let group = libraries.entry(release.name.clone()).or_default();
            group.retain(|r| r.version != release.version);
            group.push(release);
        }
        for group in libraries.values_mut() {
            group.sort_by(|a, b| a.version.cmp(&b.version));
        }
        Self { libraries }
    }

    /// Number of distinct libraries.
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    pub fn library_names(&self) -> impl Iterator<Item = &str> {
        self.libraries.keys().map(String::as_str)
    }

    /// All releases of a library, oldest first.
    pub fn releases(&self, name: &str) -> &[LibraryRelease] {
        self.libraries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find_latest(&self, name: &str) -> Option<&LibraryRelease> {
        self.releases(name).last()
    }

    pub fn find_release(&self, name: &str, version: &semver::Version) -> Option<&LibraryRelease> {
        self.releases(name).iter().find(|r| &r.version == version)
    }
}

//! Libraries manager, its builder and its scoped accessors.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};
use tracing::{debug, warn};

use super::index::LibraryRelease;
use crate::error::{BoardkitError, Result};

/// A library recorded as installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledLibrary {
    pub name: String,
    pub version: semver::Version,
    /// `None` when the manager has no libraries directory configured.
    pub install_dir: Option<PathBuf>,
}

struct LibrariesState {
    libraries_dirs: Vec<PathBuf>,
    installed: BTreeMap<String, InstalledLibrary>,
}

/// Libraries manager for one instance.
pub struct LibrariesManager {
    state: Arc<RwLock<LibrariesState>>,
}

impl LibrariesManager {
    /// Start a read session. Waits while an installer is active.
    pub async fn new_explorer(&self) -> LibrariesExplorer {
        LibrariesExplorer {
            guard: self.state.clone().read_owned().await,
        }
    }

    /// Start an exclusive write session.
    pub async fn new_installer(&self) -> LibrariesInstaller {
        LibrariesInstaller {
            guard: self.state.clone().write_owned().await,
        }
    }
}

/// Builder for [`LibrariesManager`].
#[derive(Default)]
pub struct LibrariesManagerBuilder {
    libraries_dirs: Vec<PathBuf>,
}

impl LibrariesManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory libraries are installed into. The first one wins for installs.
    pub fn add_libraries_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.libraries_dirs.push(dir.into());
        self
    }

    pub fn build(self) -> LibrariesManager {
        LibrariesManager {
            state: Arc::new(RwLock::new(LibrariesState {
                libraries_dirs: self.libraries_dirs,
                installed: BTreeMap::new(),
            })),
        }
    }
}

/// Read session over a [`LibrariesManager`]. Released on drop.
pub struct LibrariesExplorer {
    guard: OwnedRwLockReadGuard<LibrariesState>,
}

impl LibrariesExplorer {
    pub fn libraries_dirs(&self) -> &[PathBuf] {
        &self.guard.libraries_dirs
    }

    /// Installed libraries, ordered by name.
    pub fn installed(&self) -> impl Iterator<Item = &InstalledLibrary> {
        self.guard.installed.values()
    }

    pub fn find(&self, name: &str) -> Option<&InstalledLibrary> {
        self.guard.installed.get(name)
    }

    /// End the session.
    pub fn release(self) {}
}

/// Exclusive write session over a [`LibrariesManager`]. Released on drop.
pub struct LibrariesInstaller {
    guard: OwnedRwLockWriteGuard<LibrariesState>,
}

impl LibrariesInstaller {
    /// Record `release` as installed, replacing any installed version.
    pub fn install(&mut self, release: &LibraryRelease) -> InstalledLibrary {
        let install_dir = self
            .guard
            .libraries_dirs
            .first()
            .map(|dir| library_dir(dir, &release.name));
        let library = InstalledLibrary {
            name: release.name.clone(),
            version: release.version.clone(),
            install_dir,
        };

        match self.guard.installed.insert(release.name.clone(), library.clone()) {
            Some(previous) => warn!(
                "Installed {} {} over {}",
                library.name, library.version, previous.version
            ),
            None => debug!("Installed {} {}", library.name, library.version),
        }
        library
    }

    pub fn uninstall(&mut self, name: &str) -> Result<InstalledLibrary> {
        self.guard
            .installed
            .remove(name)
            .ok_or_else(|| BoardkitError::LibraryNotFound {
                name: name.to_string(),
            })
    }

    pub fn find(&self, name: &str) -> Option<&InstalledLibrary> {
        self.guard.installed.get(name)
    }

    /// End the session.
    pub fn release(self) {}
}

/// Install folders replace spaces in the library name with underscores.
fn library_dir(libraries_dir: &Path, name: &str) -> PathBuf {
    libraries_dir.join(name.replace(' ', "_"))
}

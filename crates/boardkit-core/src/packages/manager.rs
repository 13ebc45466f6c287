//! Package manager, its builder and its scoped accessors.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};
use tracing::{debug, warn};

use crate::error::{BoardkitError, Result};

/// Directories a package manager operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDirectories {
    pub data_dir: PathBuf,
    pub packages_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub temp_dir: PathBuf,
}

/// Identifies a platform as `packager:architecture`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlatformId {
    pub packager: String,
    pub architecture: String,
}

impl PlatformId {
    pub fn new(packager: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            packager: packager.into(),
            architecture: architecture.into(),
        }
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.packager, self.architecture)
    }
}

/// A platform release installed under the packages directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPlatform {
    pub id: PlatformId,
    pub version: semver::Version,
    pub install_dir: PathBuf,
}

/// State guarded by the manager lock.
struct PackageManagerState {
    directories: PackageDirectories,
    user_agent: String,
    platforms: BTreeMap<PlatformId, InstalledPlatform>,
}

/// Package manager for one instance.
///
/// Cheap to share behind an `Arc`; every access to its state goes through
/// [`new_explorer`](Self::new_explorer) or [`new_installer`](Self::new_installer).
pub struct PackageManager {
    state: Arc<RwLock<PackageManagerState>>,
}

impl PackageManager {
    /// Start a read session. Waits while an installer is active.
    pub async fn new_explorer(&self) -> PackageManagerExplorer {
        PackageManagerExplorer {
            guard: self.state.clone().read_owned().await,
        }
    }

    /// Start an exclusive write session.
    pub async fn new_installer(&self) -> PackageManagerInstaller {
        PackageManagerInstaller {
            guard: self.state.clone().write_owned().await,
        }
    }
}

/// Builder for [`PackageManager`].
pub struct PackageManagerBuilder {
    directories: PackageDirectories,
    user_agent: String,
}

impl PackageManagerBuilder {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        packages_dir: impl Into<PathBuf>,
        downloads_dir: impl Into<PathBuf>,
        temp_dir: impl Into<PathBuf>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            directories: PackageDirectories {
                data_dir: data_dir.into(),
                packages_dir: packages_dir.into(),
                downloads_dir: downloads_dir.into(),
                temp_dir: temp_dir.into(),
            },
            user_agent: user_agent.into(),
        }
    }

    /// Build the manager, creating the temp directory if it is missing.
    pub fn build(self) -> Result<PackageManager> {
        let temp_dir = &self.directories.temp_dir;
        if !temp_dir.is_dir() {
            std::fs::create_dir_all(temp_dir)
                .map_err(|e| BoardkitError::io_with_path(e, temp_dir))?;
            debug!("Created package manager temp dir: {}", temp_dir.display());
        }

        Ok(PackageManager {
            state: Arc::new(RwLock::new(PackageManagerState {
                directories: self.directories,
                user_agent: self.user_agent,
                platforms: BTreeMap::new(),
            })),
        })
    }
}

/// Read session over a [`PackageManager`]. Released on drop.
pub struct PackageManagerExplorer {
    guard: OwnedRwLockReadGuard<PackageManagerState>,
}

impl PackageManagerExplorer {
    pub fn directories(&self) -> &PackageDirectories {
        &self.guard.directories
    }

    pub fn user_agent(&self) -> &str {
        &self.guard.user_agent
    }

    /// Installed platforms, ordered by ID.
    pub fn platforms(&self) -> impl Iterator<Item = &InstalledPlatform> {
        self.guard.platforms.values()
    }

    pub fn find_platform(&self, id: &PlatformId) -> Option<&InstalledPlatform> {
        self.guard.platforms.get(id)
    }

    /// End the session.
    pub fn release(self) {}
}

/// Exclusive write session over a [`PackageManager`]. Released on drop.
pub struct PackageManagerInstaller {
    guard: OwnedRwLockWriteGuard<PackageManagerState>,
}

impl PackageManagerInstaller {
    pub fn directories(&self) -> &PackageDirectories {
        &self.guard.directories
    }

    /// Record a platform release as installed, replacing any other version.
    pub fn add_platform(&mut self, id: PlatformId, version: &str) -> Result<InstalledPlatform> {
        let version =
            semver::Version::parse(version).map_err(|e| BoardkitError::invalid_version(version, e))?;
        let install_dir = platform_dir(&self.guard.directories.packages_dir, &id, &version);
        let platform = InstalledPlatform {
            id: id.clone(),
            version,
            install_dir,
        };

        if let Some(previous) = self.guard.platforms.insert(id, platform.clone()) {
            warn!(
                "Replaced platform {} {} with {}",
                previous.id, previous.version, platform.version
            );
        }
        Ok(platform)
    }

    pub fn remove_platform(&mut self, id: &PlatformId) -> Option<InstalledPlatform> {
        self.guard.platforms.remove(id)
    }

    /// End the session.
    pub fn release(self) {}
}

fn platform_dir(packages_dir: &Path, id: &PlatformId, version: &semver::Version) -> PathBuf {
    packages_dir
        .join(&id.packager)
        .join("hardware")
        .join(&id.architecture)
        .join(version.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn build_manager(root: &Path) -> PackageManager {
        PackageManagerBuilder::new(
            root.join("data"),
            root.join("packages"),
            root.join("downloads"),
            root.join("data").join("tmp"),
            "boardkit/test",
        )
        .build()
        .unwrap()
    }

    #[test]
    fn test_build_creates_temp_dir() {
        let temp_dir = TempDir::new().unwrap();
        let _pm = build_manager(temp_dir.path());
        assert!(temp_dir.path().join("data").join("tmp").is_dir());
    }

    #[test]
    fn test_build_fails_when_temp_dir_is_blocked() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("data");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = PackageManagerBuilder::new(
            &blocker,
            temp_dir.path().join("packages"),
            temp_dir.path().join("downloads"),
            blocker.join("tmp"),
            "boardkit/test",
        )
        .build();

        assert!(matches!(result, Err(BoardkitError::Io { .. })));
    }

    #[tokio::test]
    async fn test_explorer_sees_installed_platforms() {
        let temp_dir = TempDir::new().unwrap();
        let pm = build_manager(temp_dir.path());
        let id = PlatformId::new("arduino", "avr");

        let mut installer = pm.new_installer().await;
        let installed = installer.add_platform(id.clone(), "1.8.6").unwrap();
        installer.release();

        assert!(installed.install_dir.ends_with("arduino/hardware/avr/1.8.6"));

        let explorer = pm.new_explorer().await;
        assert_eq!(explorer.user_agent(), "boardkit/test");
        assert_eq!(explorer.platforms().count(), 1);
        assert_eq!(explorer.find_platform(&id).unwrap().version.to_string(), "1.8.6");
    }

    #[tokio::test]
    async fn test_add_platform_rejects_bad_version() {
        let temp_dir = TempDir::new().unwrap();
        let pm = build_manager(temp_dir.path());

        let mut installer = pm.new_installer().await;
        let result = installer.add_platform(PlatformId::new("arduino", "avr"), "latest");
        assert!(matches!(result, Err(BoardkitError::InvalidVersion { .. })));
    }

    #[tokio::test]
    async fn test_installer_replaces_and_removes() {
        let temp_dir = TempDir::new().unwrap();
        let pm = build_manager(temp_dir.path());
        let id = PlatformId::new("esp32", "esp32");

        let mut installer = pm.new_installer().await;
        installer.add_platform(id.clone(), "2.0.0").unwrap();
        installer.add_platform(id.clone(), "3.0.1").unwrap();
        let removed = installer.remove_platform(&id).unwrap();
        assert_eq!(removed.version.to_string(), "3.0.1");
        assert!(installer.remove_platform(&id).is_none());
    }

    #[tokio::test]
    async fn test_explorers_share_installer_excludes() {
        let temp_dir = TempDir::new().unwrap();
        let pm = build_manager(temp_dir.path());

        let first = pm.new_explorer().await;
        let second = tokio::time::timeout(Duration::from_millis(100), pm.new_explorer()).await;
        assert!(second.is_ok(), "explorers should not block each other");

        let installer = tokio::time::timeout(Duration::from_millis(100), pm.new_installer()).await;
        assert!(installer.is_err(), "installer must wait for explorers");

        drop(second);
        first.release();
        let installer = tokio::time::timeout(Duration::from_millis(100), pm.new_installer()).await;
        assert!(installer.is_ok());
    }

    #[test]
    fn test_installed_platform_serde_roundtrip() {
        let platform = InstalledPlatform {
            id: PlatformId::new("arduino", "avr"),
            version: semver::Version::parse("1.8.6").unwrap(),
            install_dir: PathBuf::from("/packages/arduino/hardware/avr/1.8.6"),
        };

        let json = serde_json::to_value(&platform).unwrap();
        assert_eq!(json["version"], "1.8.6");
        assert_eq!(json["id"]["architecture"], "avr");

        let parsed: InstalledPlatform = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, platform);
    }

    #[test]
    fn test_platform_id_display() {
        assert_eq!(PlatformId::new("arduino", "samd").to_string(), "arduino:samd");
    }
}

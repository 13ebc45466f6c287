//! Package manager bound to one instance's directories.
//!
//! The manager tracks installed platforms. Reads go through a
//! [`PackageManagerExplorer`], mutations through a [`PackageManagerInstaller`];
//! both hold the manager's own lock, never the instance registry's.

mod manager;

pub use manager::{
    InstalledPlatform, PackageDirectories, PackageManager, PackageManagerBuilder,
    PackageManagerExplorer, PackageManagerInstaller, PlatformId,
};

//! Boardkit Core - instance registry for package and library managers.
//!
//! An [`InstanceRegistry`] hands out [`Instance`] handles. Each instance owns a
//! package manager, a libraries manager and a libraries index, reachable
//! through the registry by handle.
//!
//! # Example
//!
//! ```rust,ignore
//! use boardkit_core::InstanceRegistry;
//!
//! let registry = InstanceRegistry::new();
//! let inst = registry.create("/data", "/data/packages", "/data/staging", &["my-tool/1.0"])?;
//!
//! let explorer = registry.package_manager_explorer(&inst).await?;
//! for platform in explorer.platforms() {
//!     println!("{} {}", platform.id, platform.version);
//! }
//! explorer.release();
//!
//! registry.delete(&inst);
//! ```

pub mod config;
pub mod error;
pub mod instances;
pub mod libraries;
pub mod packages;

pub use config::{InstanceConfig, UserAgentConfig};
pub use error::{BoardkitError, Result};
pub use instances::{Instance, InstanceRegistry};
pub use libraries::{
    InstalledLibrary, LibrariesExplorer, LibrariesIndex, LibrariesInstaller, LibrariesManager,
    LibrariesManagerBuilder, LibraryRelease,
};
pub use packages::{
    InstalledPlatform, PackageDirectories, PackageManager, PackageManagerBuilder,
    PackageManagerExplorer, PackageManagerInstaller, PlatformId,
};

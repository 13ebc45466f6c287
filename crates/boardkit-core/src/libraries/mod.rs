//! Libraries manager and libraries index.

mod index;
mod manager;

pub use index::{LibrariesIndex, LibraryRelease};
pub use manager::{
    InstalledLibrary, LibrariesExplorer, LibrariesInstaller, LibrariesManager,
    LibrariesManagerBuilder,
};

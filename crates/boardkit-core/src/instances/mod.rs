//! In-memory registry of boardkit instances.
//!
//! Each instance bundles three sub-resources:
//! - **Package manager**: installed platforms, bound to the instance directories
//! - **Libraries manager**: installed libraries, swappable as a whole
//! - **Libraries index**: immutable release index, swappable as a whole
//!
//! # Locking
//!
//! The registry lock only covers the ID table. Sub-resources carry their own
//! reader/writer locks, taken through explorer and installer sessions after the
//! registry lock has been released. Swapping a sub-resource does not disturb
//! sessions still using the previous value.

mod handle;
mod registry;

pub use handle::Instance;
pub use registry::InstanceRegistry;

//! Opaque instance handle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle addressing one instance in an [`InstanceRegistry`](super::InstanceRegistry).
///
/// The default handle has ID `0` and never resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instance {
    id: i32,
}

impl Instance {
    /// Wrap a raw ID, e.g. one received from a remote caller.
    pub fn from_id(id: i32) -> Self {
        Self { id }
    }

    /// Raw instance ID; `0` for the unset handle.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Whether this is the unset handle.
    pub fn is_unset(&self) -> bool {
        self.id == 0
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance #{}", self.id)
    }
}

//! Registry mapping instance IDs to their sub-resources.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use super::handle::Instance;
use crate::config::{InstanceConfig, UserAgentConfig};
use crate::error::{BoardkitError, Result};
use crate::libraries::{
    LibrariesExplorer, LibrariesIndex, LibrariesInstaller, LibrariesManager,
    LibrariesManagerBuilder,
};
use crate::packages::{PackageManager, PackageManagerBuilder, PackageManagerExplorer};

/// Sub-resources owned by one instance.
///
/// Fields are `Arc`s so a swap only detaches the record from the old value;
/// callers that already hold it keep it alive.
struct InstanceRecord {
    package_manager: Arc<PackageManager>,
    library_manager: Arc<LibrariesManager>,
    libraries_index: Arc<LibrariesIndex>,
}

struct InstanceTable {
    records: HashMap<i32, InstanceRecord>,
    /// `None` once `i32::MAX` has been handed out.
    next_id: Option<i32>,
}

/// Registry of live instances.
///
/// Share it behind an `Arc`. Every method holds the registry lock only for the
/// table access itself; sub-resources are used after it is released.
pub struct InstanceRegistry {
    table: Mutex<InstanceTable>,
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::starting_at(InstanceConfig::FIRST_INSTANCE_ID)
    }

    fn starting_at(next_id: i32) -> Self {
        Self {
            table: Mutex::new(InstanceTable {
                records: HashMap::new(),
                next_id: Some(next_id),
            }),
        }
    }

    // Each critical section is a single map operation, so a poisoned table is
    // still consistent.
    fn table(&self) -> MutexGuard<'_, InstanceTable> {
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create an instance and return its handle.
    ///
    /// The package manager uses `data_dir/tmp` as scratch space and identifies
    /// itself with the crate user agent followed by `extra_user_agent`.
    /// Sub-resources are built before the registry lock is taken; if building
    /// fails nothing is inserted and no ID is consumed.
    pub fn create<S: AsRef<str>>(
        &self,
        data_dir: impl Into<PathBuf>,
        packages_dir: impl Into<PathBuf>,
        downloads_dir: impl Into<PathBuf>,
        extra_user_agent: &[S],
    ) -> Result<Instance> {
        let data_dir = data_dir.into();
        let temp_dir = data_dir.join(InstanceConfig::TEMP_DIR_NAME);
        let user_agent = UserAgentConfig::user_agent(extra_user_agent);

        let record = InstanceRecord {
            package_manager: Arc::new(
                PackageManagerBuilder::new(
                    data_dir,
                    packages_dir,
                    downloads_dir,
                    temp_dir,
                    user_agent,
                )
                .build()?,
            ),
            library_manager: Arc::new(LibrariesManagerBuilder::new().build()),
            libraries_index: LibrariesIndex::empty(),
        };

        let id = {
            let mut table = self.table();
            let id = table.next_id.ok_or(BoardkitError::InstanceIdsExhausted)?;
            table.next_id = id.checked_add(1);
            table.records.insert(id, record);
            id
        };

        info!("Created instance {}", id);
        Ok(Instance::from_id(id))
    }

    /// Whether `inst` resolves to a live instance.
    pub fn is_valid(&self, inst: &Instance) -> bool {
        self.table().records.contains_key(&inst.id())
    }

    /// Remove an instance. Returns `false` if it was not present.
    ///
    /// Sub-resources already handed out stay usable by their holders.
    pub fn delete(&self, inst: &Instance) -> bool {
        let removed = self.table().records.remove(&inst.id()).is_some();
        if removed {
            info!("Deleted instance {}", inst.id());
        }
        removed
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.table().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up `inst` and copy one field out of its record.
    fn resolve<T>(&self, inst: &Instance, field: impl FnOnce(&InstanceRecord) -> T) -> Result<T> {
        let table = self.table();
        match table.records.get(&inst.id()) {
            Some(record) => Ok(field(record)),
            None => {
                debug!("Lookup of unknown instance {}", inst.id());
                Err(BoardkitError::InvalidInstance)
            }
        }
    }

    /// Look up `inst` and replace one field of its record.
    fn replace(&self, inst: &Instance, field: impl FnOnce(&mut InstanceRecord)) -> Result<()> {
        let mut table = self.table();
        match table.records.get_mut(&inst.id()) {
            Some(record) => {
                field(record);
                Ok(())
            }
            None => Err(BoardkitError::InvalidInstance),
        }
    }

    /// Package manager of `inst`.
    ///
    /// Prefer [`package_manager_explorer`](Self::package_manager_explorer),
    /// which also takes the manager's read lock.
    pub fn package_manager(&self, inst: &Instance) -> Result<Arc<PackageManager>> {
        self.resolve(inst, |record| record.package_manager.clone())
    }

    /// Read session over the package manager of `inst`.
    ///
    /// Fails without taking any lock if `inst` does not resolve.
    pub async fn package_manager_explorer(&self, inst: &Instance) -> Result<PackageManagerExplorer> {
        let pm = self.package_manager(inst)?;
        Ok(pm.new_explorer().await)
    }

    /// Libraries manager of `inst`, as currently set on the record.
    pub fn library_manager(&self, inst: &Instance) -> Result<Arc<LibrariesManager>> {
        self.resolve(inst, |record| record.library_manager.clone())
    }

    /// Read session over the libraries manager of `inst`.
    pub async fn library_manager_explorer(&self, inst: &Instance) -> Result<LibrariesExplorer> {
        let lm = self.library_manager(inst)?;
        Ok(lm.new_explorer().await)
    }

    /// Exclusive write session over the libraries manager of `inst`.
    pub async fn library_manager_installer(&self, inst: &Instance) -> Result<LibrariesInstaller> {
        let lm = self.library_manager(inst)?;
        Ok(lm.new_installer().await)
    }

    /// Replace the libraries manager of `inst`. Returns `false` if `inst` does not resolve.
    pub fn set_library_manager(&self, inst: &Instance, lm: Arc<LibrariesManager>) -> bool {
        let swapped = self
            .replace(inst, |record| record.library_manager = lm)
            .is_ok();
        if swapped {
            debug!("Swapped libraries manager of instance {}", inst.id());
        }
        swapped
    }

    /// Libraries index of `inst`; the shared empty index until one is set.
    pub fn libraries_index(&self, inst: &Instance) -> Result<Arc<LibrariesIndex>> {
        self.resolve(inst, |record| record.libraries_index.clone())
    }

    /// Replace the libraries index of `inst`.
    pub fn set_libraries_index(&self, inst: &Instance, index: Arc<LibrariesIndex>) -> Result<()> {
        self.replace(inst, |record| record.libraries_index = index)?;
        debug!("Swapped libraries index of instance {}", inst.id());
        Ok(())
    }
}

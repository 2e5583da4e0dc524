// ── Cache manager ──
//
// Exclusive owner of the on-disk store representation. Loads, replaces,
// and saves the store, and keeps the derived indexes in sync with every
// wholesale swap. Not internally synchronized: a single owning handle
// must serialize access (the facade, in practice).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CacheError;
use crate::model::{DeviceKind, DeviceProfile, InventoryDevice, MacAddress, RfTemplate, Site};
use crate::store::indexes::CacheIndexes;
use crate::store::Store;

/// Primary cache document, under the cache root.
pub const CACHE_FILE: &str = "cache.json";

/// Directory of per-vendor RF-template snapshot files, under the cache
/// root. Part of the external contract: other processes produce these.
pub const VENDOR_DIR: &str = "vendors";

/// Owns the store, its backing file, and the derived indexes.
pub struct CacheManager {
    root: PathBuf,
    store: Store,
    indexes: CacheIndexes,
    dirty: bool,
}

impl CacheManager {
    /// Create a manager over `root` with an empty store. Nothing is read
    /// from disk until [`initialize`](Self::initialize).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            store: Store::new(),
            indexes: CacheIndexes::default(),
            dirty: false,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_path(&self) -> PathBuf {
        self.root.join(CACHE_FILE)
    }

    pub fn vendor_dir(&self) -> PathBuf {
        self.root.join(VENDOR_DIR)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Load the store from disk and rebuild indexes.
    ///
    /// Fails with a load error if the file is unreadable or not valid
    /// structured data. Callers are expected to fall back to an empty
    /// store on failure, never to panic.
    pub fn initialize(&mut self) -> Result<(), CacheError> {
        let path = self.cache_path();
        let contents = fs::read_to_string(&path).map_err(|source| CacheError::CacheRead {
            path: path.clone(),
            source,
        })?;
        let store: Store =
            serde_json::from_str(&contents).map_err(|source| CacheError::CacheParse {
                path: path.clone(),
                source,
            })?;
        debug!(
            path = %path.display(),
            version = store.version,
            orgs = store.orgs.len(),
            "loaded cache"
        );
        self.replace_cache(store);
        Ok(())
    }

    /// Swap the in-memory store wholesale (cold bootstrap or full
    /// refresh) and re-derive the indexes.
    pub fn replace_cache(&mut self, store: Store) {
        self.store = store;
        self.rebuild_indexes();
    }

    /// Rebuild indexes from the current store, then apply the
    /// best-effort vendor-snapshot enrichment.
    pub fn rebuild_indexes(&mut self) {
        self.indexes = CacheIndexes::build(&self.store);
        self.indexes.extend_from_vendor_snapshots(&self.vendor_dir());
    }

    /// Serialize the store and write it out, all-or-nothing: the full
    /// document is built before the file is touched. Clears the dirty
    /// flag only on success.
    pub fn save(&mut self) -> Result<(), CacheError> {
        let serialized = serde_json::to_string_pretty(&self.store)?;
        let path = self.cache_path();
        fs::create_dir_all(&self.root).map_err(|source| CacheError::CacheWrite {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, serialized).map_err(|source| CacheError::CacheWrite {
            path: path.clone(),
            source,
        })?;
        self.dirty = false;
        debug!(path = %path.display(), orgs = self.store.orgs.len(), "saved cache");
        Ok(())
    }

    // ── Dirty flag ───────────────────────────────────────────────────
    // Callers signal dirtiness after any write and decide when to save;
    // there is no background flush.

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Mutable store access. The caller owns index repair (or a wholesale
    /// rebuild) and dirty signaling for whatever it writes.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn indexes(&self) -> &CacheIndexes {
        &self.indexes
    }

    pub fn indexes_mut(&mut self) -> &mut CacheIndexes {
        &mut self.indexes
    }

    // ── Typed lookups ────────────────────────────────────────────────
    // Thin wrappers over the indexes that turn a miss into `NotFound`.

    pub fn site_by_name(&self, org_id: &str, name: &str) -> Result<&Site, CacheError> {
        self.indexes
            .org(org_id)
            .and_then(|org| org.sites.get_by_name(name))
            .ok_or_else(|| CacheError::not_found("site", name))
    }

    pub fn site_by_id(&self, org_id: &str, id: &str) -> Result<&Site, CacheError> {
        self.indexes
            .org(org_id)
            .and_then(|org| org.sites.get_by_id(id))
            .ok_or_else(|| CacheError::not_found("site", id))
    }

    pub fn rf_template_by_id(&self, org_id: &str, id: &str) -> Result<&RfTemplate, CacheError> {
        self.indexes
            .org(org_id)
            .and_then(|org| org.rf_templates.get_by_id(id))
            .ok_or_else(|| CacheError::not_found("rf template", id))
    }

    pub fn rf_template_by_name(
        &self,
        org_id: &str,
        name: &str,
    ) -> Result<&RfTemplate, CacheError> {
        self.indexes
            .org(org_id)
            .and_then(|org| org.rf_templates.get_by_name(name))
            .ok_or_else(|| CacheError::not_found("rf template", name))
    }

    pub fn device_profile_by_name(
        &self,
        org_id: &str,
        name: &str,
    ) -> Result<&DeviceProfile, CacheError> {
        self.indexes
            .org(org_id)
            .and_then(|org| org.device_profiles.get_by_name(name))
            .ok_or_else(|| CacheError::not_found("device profile", name))
    }

    /// Inventory lookup by MAC within one device-kind table. The MAC is
    /// canonicalized before the probe, so any spelling matches.
    pub fn inventory_by_mac(
        &self,
        org_id: &str,
        kind: DeviceKind,
        mac: &str,
    ) -> Result<&InventoryDevice, CacheError> {
        let key = MacAddress::parse(mac)?;
        self.indexes
            .org(org_id)
            .and_then(|org| org.inventory.for_kind(kind).get_by_id(key.as_str()))
            .ok_or_else(|| CacheError::not_found("inventory device", key.into_string()))
    }
}

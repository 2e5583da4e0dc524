// ── Multi-index unified-device cache ──
//
// Independent in-memory structure (never persisted) holding the unified
// view of every known device: MAC -> device plus site/kind/name secondary
// indices, maintained incrementally so a mutation costs proportional to
// the affected buckets, not the total device count.
//
// Locking: one reader/writer lock guards the data maps; hit/miss counters
// sit behind their own lock so instrumentation never blocks, or is
// blocked by, the data path.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::CacheError;
use crate::model::{DeviceKind, MacAddress, UnifiedDevice};
use crate::store::OrgData;

/// Hit/miss counters for `device_by_mac`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Default)]
struct Inner {
    /// Primary entries, keyed by canonical MAC.
    by_mac: HashMap<String, UnifiedDevice>,
    /// Site id -> MACs of devices at that site.
    by_site: HashMap<String, HashSet<String>>,
    /// Device kind -> MACs of that kind.
    by_kind: HashMap<DeviceKind, HashSet<String>>,
    /// Device name -> MAC.
    by_name: HashMap<String, String>,
    last_updated: Option<DateTime<Utc>>,
}

/// Multi-index cache of [`UnifiedDevice`] records.
///
/// Created empty, populated via explicit add/merge calls, cleared
/// explicitly; never auto-persisted.
#[derive(Default)]
pub struct DeviceCache {
    inner: RwLock<Inner>,
    stats: Mutex<CacheStats>,
}

impl DeviceCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mutations (exclusive lock) ───────────────────────────────────

    /// Write or overwrite the entry for a device, repairing secondary
    /// indices incrementally.
    ///
    /// A device with an empty MAC is a no-op; a malformed MAC is an
    /// [`CacheError::InvalidMac`] error.
    pub fn add_device(&self, device: UnifiedDevice) -> Result<(), CacheError> {
        let Some(device) = canonicalized(device)? else {
            return Ok(());
        };
        let mut inner = self.write_inner();
        let previous = inner.by_mac.get(&device.mac).cloned();
        apply(&mut inner, previous.as_ref(), device);
        Ok(())
    }

    /// Like [`add_device`](Self::add_device), but if an entry already
    /// exists for the MAC, the incoming record is first merged into it
    /// (see [`UnifiedDevice::merge`]) and indices are repaired against
    /// the pre-merge record.
    pub fn merge_device_info(&self, device: UnifiedDevice) -> Result<(), CacheError> {
        let Some(device) = canonicalized(device)? else {
            return Ok(());
        };
        let mut inner = self.write_inner();
        let previous = inner.by_mac.get(&device.mac).cloned();
        let merged = match &previous {
            Some(existing) => UnifiedDevice::merge(existing, &device),
            None => device,
        };
        apply(&mut inner, previous.as_ref(), merged);
        Ok(())
    }

    /// Delete the primary entry and every secondary index reference.
    /// No-op if the MAC is absent.
    pub fn remove_device(&self, mac: &str) {
        let key = MacAddress::normalize_lossy(mac);
        let mut inner = self.write_inner();
        let Some(removed) = inner.by_mac.remove(&key) else {
            return;
        };
        if let Some(site_id) = &removed.site_id {
            remove_from_bucket(&mut inner.by_site, site_id, &key);
        }
        if let Some(kind) = removed.kind {
            remove_from_bucket(&mut inner.by_kind, &kind, &key);
        }
        if let Some(name) = &removed.name {
            // Another device may have claimed the name since; only drop
            // the mapping if it still points at the removed MAC.
            if inner.by_name.get(name) == Some(&key) {
                inner.by_name.remove(name);
            }
        }
        inner.last_updated = Some(Utc::now());
    }

    /// Reset every map to empty and stamp a new last-updated time.
    pub fn clear(&self) {
        let mut inner = self.write_inner();
        *inner = Inner {
            last_updated: Some(Utc::now()),
            ..Inner::default()
        };
    }

    /// Merge every inventory and config record of an org through
    /// [`merge_device_info`](Self::merge_device_info), unifying the two
    /// API surfaces by MAC. Returns the number of records applied.
    pub fn populate_from_org(&self, org: &OrgData) -> Result<usize, CacheError> {
        let mut applied = 0;
        for (_, _, inv) in org.inventory.iter_all() {
            self.merge_device_info(UnifiedDevice::from_inventory(inv))?;
            applied += 1;
        }
        for (kind, _, cfg) in org.configs.iter_all() {
            self.merge_device_info(UnifiedDevice::from_config(kind, cfg))?;
            applied += 1;
        }
        debug!(applied, "populated device cache from org data");
        Ok(applied)
    }

    // ── Reads (shared lock) ──────────────────────────────────────────

    /// Primary lookup. The only accessor that feeds the hit/miss
    /// counters.
    pub fn device_by_mac(&self, mac: &str) -> Option<UnifiedDevice> {
        let key = MacAddress::normalize_lossy(mac);
        let found = self.read_inner().by_mac.get(&key).cloned();
        let mut stats = self.lock_stats();
        if found.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        found
    }

    pub fn device_by_name(&self, name: &str) -> Option<UnifiedDevice> {
        let inner = self.read_inner();
        let mac = inner.by_name.get(name)?;
        inner.by_mac.get(mac).cloned()
    }

    pub fn devices_by_site(&self, site_id: &str) -> Vec<UnifiedDevice> {
        let inner = self.read_inner();
        collect_bucket(&inner, inner.by_site.get(site_id))
    }

    /// Type-dispatched read: an unrecognized device-type string is a hard
    /// error, not an empty result.
    pub fn devices_by_type(&self, device_type: &str) -> Result<Vec<UnifiedDevice>, CacheError> {
        let kind = DeviceKind::parse(device_type)?;
        let inner = self.read_inner();
        Ok(collect_bucket(&inner, inner.by_kind.get(&kind)))
    }

    pub fn devices_by_site_and_type(
        &self,
        site_id: &str,
        device_type: &str,
    ) -> Result<Vec<UnifiedDevice>, CacheError> {
        let kind = DeviceKind::parse(device_type)?;
        let inner = self.read_inner();
        let Some(site_bucket) = inner.by_site.get(site_id) else {
            return Ok(Vec::new());
        };
        let Some(kind_bucket) = inner.by_kind.get(&kind) else {
            return Ok(Vec::new());
        };
        Ok(site_bucket
            .intersection(kind_bucket)
            .filter_map(|mac| inner.by_mac.get(mac).cloned())
            .collect())
    }

    pub fn len(&self) -> usize {
        self.read_inner().by_mac.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_inner().by_mac.is_empty()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.read_inner().last_updated
    }

    /// Snapshot of the hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        *self.lock_stats()
    }

    // ── Lock helpers ─────────────────────────────────────────────────
    // A poisoned lock only means a writer panicked mid-update; the maps
    // are still structurally sound, so we take the guard rather than
    // propagate the panic.

    fn read_inner(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_stats(&self) -> std::sync::MutexGuard<'_, CacheStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Normalize the MAC on an incoming device. `Ok(None)` means empty MAC:
/// the documented no-op case.
fn canonicalized(mut device: UnifiedDevice) -> Result<Option<UnifiedDevice>, CacheError> {
    if device.mac.is_empty() {
        return Ok(None);
    }
    device.mac = MacAddress::parse(&device.mac)?.into_string();
    Ok(Some(device))
}

/// Write `next` as the primary entry for its MAC and repair the site,
/// kind, and name indices against `previous`. Cost is proportional to the
/// affected bucket sizes.
fn apply(inner: &mut Inner, previous: Option<&UnifiedDevice>, next: UnifiedDevice) {
    let mac = next.mac.clone();

    let old_site = previous.and_then(|d| d.site_id.as_deref());
    if old_site != next.site_id.as_deref() {
        if let Some(site_id) = old_site {
            remove_from_bucket(&mut inner.by_site, site_id, &mac);
        }
    }
    if let Some(site_id) = &next.site_id {
        inner
            .by_site
            .entry(site_id.clone())
            .or_default()
            .insert(mac.clone());
    }

    let old_kind = previous.and_then(|d| d.kind);
    if old_kind != next.kind {
        if let Some(kind) = old_kind {
            remove_from_bucket(&mut inner.by_kind, &kind, &mac);
        }
    }
    if let Some(kind) = next.kind {
        inner.by_kind.entry(kind).or_default().insert(mac.clone());
    }

    let old_name = previous.and_then(|d| d.name.as_deref());
    let new_name = next.name.as_deref().filter(|n| !n.is_empty());
    if old_name != new_name {
        if let Some(name) = old_name {
            // Skip the removal when the name has been claimed by another
            // device in the meantime.
            if inner.by_name.get(name) == Some(&mac) {
                inner.by_name.remove(name);
            }
        }
    }
    if let Some(name) = new_name {
        inner.by_name.insert(name.to_owned(), mac.clone());
    }

    inner.by_mac.insert(mac, next);
    inner.last_updated = Some(Utc::now());
}

fn remove_from_bucket<K, Q>(buckets: &mut HashMap<K, HashSet<String>>, key: &Q, mac: &str)
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
{
    if let Some(bucket) = buckets.get_mut(key) {
        bucket.remove(mac);
        if bucket.is_empty() {
            buckets.remove(key);
        }
    }
}

fn collect_bucket(inner: &Inner, bucket: Option<&HashSet<String>>) -> Vec<UnifiedDevice> {
    bucket
        .into_iter()
        .flatten()
        .filter_map(|mac| inner.by_mac.get(mac).cloned())
        .collect()
}

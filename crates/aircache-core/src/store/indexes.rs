// ── Derived lookup indexes ──
//
// Read-optimized by-name / by-id maps derived from the store. Disposable
// by contract: a pure function of the store at build time, either rebuilt
// wholesale or incrementally repaired in lock-step with writes to the
// owning collection, never mutated independently.
//
// Duplicate names within a collection resolve last-write-wins in
// traversal order, without error. Known limitation: this can mask two
// sites or templates genuinely sharing a name.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use super::{OrgData, Store};
use crate::error::CacheError;
use crate::model::{
    DeviceConfig, DeviceKind, DeviceProfile, GatewayTemplate, InventoryDevice, Network,
    RfTemplate, Site, SiteSetting, VendorSnapshot, Wlan, WlanTemplate,
};

// ── Generic entity index ────────────────────────────────────────────

/// By-name and by-id maps for one entity collection.
///
/// One generic routine serves every collection, parameterized by key
/// extractors. Entities with an absent or empty key are simply omitted
/// from that map.
#[derive(Debug, Clone)]
pub struct EntityIndex<T> {
    by_name: HashMap<String, T>,
    by_id: HashMap<String, T>,
}

impl<T: Clone> EntityIndex<T> {
    pub fn build<'a>(
        items: impl IntoIterator<Item = &'a T>,
        name_of: impl Fn(&'a T) -> Option<&'a str>,
        id_of: impl Fn(&'a T) -> Option<&'a str>,
    ) -> Self
    where
        T: 'a,
    {
        let mut index = Self::default();
        for item in items {
            index.insert(name_of(item), id_of(item), item.clone());
        }
        index
    }

    /// Index one MAC-keyed device table. Each record resolves by-id under
    /// both its table key (the MAC) and its remote id, so either spelling
    /// of "identity" reaches the same element.
    fn build_table<'a>(
        table: &'a HashMap<String, T>,
        name_of: impl Fn(&'a T) -> Option<&'a str>,
        id_of: impl Fn(&'a T) -> Option<&'a str>,
    ) -> Self {
        let mut index = Self::default();
        for (mac, item) in table {
            index.insert(name_of(item), Some(mac.as_str()), item.clone());
            if let Some(id) = id_of(item) {
                index.insert(None, Some(id), item.clone());
            }
        }
        index
    }

    /// Insert under the given keys, skipping absent/empty ones.
    /// Last write wins on collision.
    pub fn insert(&mut self, name: Option<&str>, id: Option<&str>, value: T) {
        match (name, id) {
            (Some(name), Some(id)) if !name.is_empty() && !id.is_empty() => {
                self.by_name.insert(name.to_owned(), value.clone());
                self.by_id.insert(id.to_owned(), value);
            }
            (Some(name), _) if !name.is_empty() => {
                self.by_name.insert(name.to_owned(), value);
            }
            (_, Some(id)) if !id.is_empty() => {
                self.by_id.insert(id.to_owned(), value);
            }
            _ => {}
        }
    }

    /// Drop the entries for the given keys, for lock-step repair when a
    /// record is replaced or removed from the owning collection.
    pub fn remove(&mut self, name: Option<&str>, id: Option<&str>) {
        if let Some(name) = name {
            self.by_name.remove(name);
        }
        if let Some(id) = id {
            self.by_id.remove(id);
        }
    }

    pub fn get_by_name(&self, name: &str) -> Option<&T> {
        self.by_name.get(name)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&T> {
        self.by_id.get(id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len().max(self.by_name.len())
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty() && self.by_name.is_empty()
    }
}

// Manual impl: `derive(Default)` would demand `T: Default`.
impl<T> Default for EntityIndex<T> {
    fn default() -> Self {
        Self {
            by_name: HashMap::new(),
            by_id: HashMap::new(),
        }
    }
}

/// One `EntityIndex` per device kind, for the MAC-keyed tables.
#[derive(Debug, Clone)]
pub struct KindIndexes<T> {
    ap: EntityIndex<T>,
    switch: EntityIndex<T>,
    gateway: EntityIndex<T>,
}

impl<T: Clone> KindIndexes<T> {
    pub fn for_kind(&self, kind: DeviceKind) -> &EntityIndex<T> {
        match kind {
            DeviceKind::Ap => &self.ap,
            DeviceKind::Switch => &self.switch,
            DeviceKind::Gateway => &self.gateway,
        }
    }
}

impl<T> Default for KindIndexes<T> {
    fn default() -> Self {
        Self {
            ap: EntityIndex::default(),
            switch: EntityIndex::default(),
            gateway: EntityIndex::default(),
        }
    }
}

// ── Per-org indexes ─────────────────────────────────────────────────

/// Every derived lookup map for one organization.
#[derive(Debug, Clone, Default)]
pub struct OrgIndexes {
    pub sites: EntityIndex<Site>,
    pub site_settings: EntityIndex<SiteSetting>,
    pub rf_templates: EntityIndex<RfTemplate>,
    pub gateway_templates: EntityIndex<GatewayTemplate>,
    pub wlan_templates: EntityIndex<WlanTemplate>,
    pub networks: EntityIndex<Network>,
    /// Org-level WLANs, by-name keyed on SSID.
    pub wlans: EntityIndex<Wlan>,
    /// Site-level WLANs flattened across all sites.
    pub site_wlans: EntityIndex<Wlan>,
    pub inventory: KindIndexes<InventoryDevice>,
    pub device_profiles: EntityIndex<DeviceProfile>,
    /// Opaque profile detail records, by profile id only.
    pub profile_details: HashMap<String, Value>,
    pub configs: KindIndexes<DeviceConfig>,
}

impl OrgIndexes {
    fn build(org: &OrgData) -> Self {
        OrgIndexes {
            sites: EntityIndex::build(
                &org.sites,
                |s| s.name.as_deref(),
                |s| s.id.as_deref(),
            ),
            site_settings: EntityIndex::build(
                &org.site_settings,
                |_| None,
                |s| s.site_id.as_deref(),
            ),
            rf_templates: EntityIndex::build(
                &org.rf_templates,
                |t| t.name.as_deref(),
                |t| t.id.as_deref(),
            ),
            gateway_templates: EntityIndex::build(
                &org.gateway_templates,
                |t| t.name.as_deref(),
                |t| t.id.as_deref(),
            ),
            wlan_templates: EntityIndex::build(
                &org.wlan_templates,
                |t| t.name.as_deref(),
                |t| t.id.as_deref(),
            ),
            networks: EntityIndex::build(
                &org.networks,
                |n| n.name.as_deref(),
                |n| n.id.as_deref(),
            ),
            wlans: EntityIndex::build(
                &org.wlans,
                |w| w.ssid.as_deref(),
                |w| w.id.as_deref(),
            ),
            site_wlans: EntityIndex::build(
                org.site_wlans.values().flatten(),
                |w| w.ssid.as_deref(),
                |w| w.id.as_deref(),
            ),
            inventory: KindIndexes {
                ap: EntityIndex::build_table(
                    &org.inventory.ap,
                    |d| d.name.as_deref(),
                    |d| d.id.as_deref(),
                ),
                switch: EntityIndex::build_table(
                    &org.inventory.switch,
                    |d| d.name.as_deref(),
                    |d| d.id.as_deref(),
                ),
                gateway: EntityIndex::build_table(
                    &org.inventory.gateway,
                    |d| d.name.as_deref(),
                    |d| d.id.as_deref(),
                ),
            },
            device_profiles: EntityIndex::build(
                &org.device_profiles,
                |p| p.name.as_deref(),
                |p| p.id.as_deref(),
            ),
            profile_details: org.profile_details.clone(),
            configs: KindIndexes {
                ap: EntityIndex::build_table(
                    &org.configs.ap,
                    |c| c.name.as_deref(),
                    |c| c.id.as_deref(),
                ),
                switch: EntityIndex::build_table(
                    &org.configs.switch,
                    |c| c.name.as_deref(),
                    |c| c.id.as_deref(),
                ),
                gateway: EntityIndex::build_table(
                    &org.configs.gateway,
                    |c| c.name.as_deref(),
                    |c| c.id.as_deref(),
                ),
            },
        }
    }
}

// ── Cache-wide indexes ──────────────────────────────────────────────

/// Derived lookup structures for the whole store, one `OrgIndexes` per
/// organization.
#[derive(Debug, Clone, Default)]
pub struct CacheIndexes {
    orgs: HashMap<String, OrgIndexes>,
}

impl CacheIndexes {
    /// Total, deterministic, side-effect-free derivation from the store.
    pub fn build(store: &Store) -> Self {
        let orgs = store
            .orgs
            .iter()
            .map(|(org_id, org)| (org_id.clone(), OrgIndexes::build(org)))
            .collect();
        Self { orgs }
    }

    pub fn org(&self, org_id: &str) -> Option<&OrgIndexes> {
        self.orgs.get(org_id)
    }

    /// Fetch-or-create, for incremental repair alongside store writes.
    pub fn org_mut(&mut self, org_id: &str) -> &mut OrgIndexes {
        self.orgs.entry(org_id.to_owned()).or_default()
    }

    /// Best-effort RF-template enrichment from per-vendor snapshot files.
    ///
    /// Scans `dir` for `*.json` snapshots and extends every org's
    /// RF-template index with the `{id, name}` stubs found, so
    /// foreign-system template identifiers resolve through the same
    /// lookup surface. A stub never overwrites an already-indexed
    /// primary-store template sharing its id. Missing or malformed files
    /// are logged and skipped -- enrichment must never block primary
    /// cache availability.
    pub fn extend_from_vendor_snapshots(&mut self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(error) => {
                debug!(dir = %dir.display(), %error, "no vendor snapshot directory");
                return;
            }
        };

        // Sorted for a deterministic stub application order.
        let mut paths: Vec<_> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            match read_snapshot(&path) {
                Ok(snapshot) => {
                    debug!(
                        vendor = %snapshot.vendor,
                        stubs = snapshot.rftemplates.len(),
                        "applying vendor snapshot"
                    );
                    self.apply_snapshot(&snapshot);
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping unreadable vendor snapshot");
                }
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: &VendorSnapshot) {
        for org in self.orgs.values_mut() {
            for stub in &snapshot.rftemplates {
                if stub.id.is_empty() || org.rf_templates.contains_id(&stub.id) {
                    continue;
                }
                let name = (!stub.name.is_empty()).then_some(stub.name.as_str());
                org.rf_templates
                    .insert(name, Some(stub.id.as_str()), RfTemplate::from(stub));
            }
        }
    }
}

fn read_snapshot(path: &Path) -> Result<VendorSnapshot, CacheError> {
    let contents = fs::read_to_string(path).map_err(|source| CacheError::CacheRead {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CacheError::CacheParse {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn site(id: &str, name: &str) -> Site {
        Site {
            id: Some(id.to_owned()),
            name: Some(name.to_owned()),
            ..Site::default()
        }
    }

    fn store_with_org(org: OrgData) -> Store {
        let mut store = Store::new();
        store.orgs.insert("org-1".into(), org);
        store
    }

    #[test]
    fn build_indexes_every_keyed_record() {
        let mut org = OrgData::default();
        org.sites.push(site("site-1", "HQ"));
        org.rf_templates.push(RfTemplate {
            id: Some("rf-1".into()),
            name: Some("dense-office".into()),
            ..RfTemplate::default()
        });
        org.wlans.push(Wlan {
            id: Some("wlan-1".into()),
            ssid: Some("corp".into()),
            ..Wlan::default()
        });
        org.site_wlans.insert(
            "site-1".into(),
            vec![Wlan {
                id: Some("wlan-2".into()),
                ssid: Some("guest".into()),
                ..Wlan::default()
            }],
        );
        org.inventory.ap.insert(
            "001122334455".into(),
            InventoryDevice {
                id: Some("dev-1".into()),
                mac: "001122334455".into(),
                name: Some("lobby-ap".into()),
                ..InventoryDevice::default()
            },
        );

        let indexes = CacheIndexes::build(&store_with_org(org));
        let org = indexes.org("org-1").unwrap();

        assert_eq!(org.sites.get_by_name("HQ").unwrap().id.as_deref(), Some("site-1"));
        assert_eq!(org.sites.get_by_id("site-1").unwrap().name.as_deref(), Some("HQ"));
        assert!(org.rf_templates.get_by_name("dense-office").is_some());
        assert!(org.wlans.get_by_name("corp").is_some());
        assert!(org.site_wlans.get_by_name("guest").is_some());

        // Device tables resolve by-id under both MAC and remote id.
        let ap = org.inventory.for_kind(DeviceKind::Ap);
        assert!(ap.get_by_id("001122334455").is_some());
        assert!(ap.get_by_id("dev-1").is_some());
        assert!(ap.get_by_name("lobby-ap").is_some());
    }

    #[test]
    fn absent_keys_are_omitted_not_errors() {
        let mut org = OrgData::default();
        org.sites.push(Site::default());
        org.sites.push(site("site-1", ""));

        let indexes = CacheIndexes::build(&store_with_org(org));
        let org = indexes.org("org-1").unwrap();
        assert!(org.sites.get_by_id("site-1").is_some());
        assert!(org.sites.get_by_name("").is_none());
    }

    #[test]
    fn remove_drops_both_key_entries() {
        let mut index = EntityIndex::default();
        index.insert(Some("HQ"), Some("site-1"), site("site-1", "HQ"));

        index.remove(Some("HQ"), Some("site-1"));
        assert!(index.get_by_name("HQ").is_none());
        assert!(index.get_by_id("site-1").is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn duplicate_names_resolve_last_write_wins() {
        let mut org = OrgData::default();
        org.sites.push(site("site-1", "branch"));
        org.sites.push(site("site-2", "branch"));

        let indexes = CacheIndexes::build(&store_with_org(org));
        let resolved = indexes.org("org-1").unwrap().sites.get_by_name("branch").unwrap();
        assert_eq!(resolved.id.as_deref(), Some("site-2"));
    }

    #[test]
    fn vendor_snapshots_extend_rf_templates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("acme.json"),
            json!({
                "vendor": "acme",
                "rftemplates": [
                    {"id": "rf-1", "name": "stub-should-not-win"},
                    {"id": "rf-foreign", "name": "warehouse"},
                ],
            })
            .to_string(),
        )
        .unwrap();

        let mut org = OrgData::default();
        org.rf_templates.push(RfTemplate {
            id: Some("rf-1".into()),
            name: Some("dense-office".into()),
            org_id: Some("org-1".into()),
            ..RfTemplate::default()
        });

        let mut indexes = CacheIndexes::build(&store_with_org(org));
        indexes.extend_from_vendor_snapshots(dir.path());

        let org = indexes.org("org-1").unwrap();
        // Foreign id now resolves through the same surface...
        assert_eq!(
            org.rf_templates.get_by_id("rf-foreign").unwrap().name.as_deref(),
            Some("warehouse")
        );
        // ...but a stub never overwrites a primary-store template.
        assert_eq!(
            org.rf_templates.get_by_id("rf-1").unwrap().name.as_deref(),
            Some("dense-office")
        );
    }

    #[test]
    fn malformed_vendor_snapshots_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        std::fs::write(
            dir.path().join("ok.json"),
            json!({"vendor": "ok", "rftemplates": [{"id": "rf-x", "name": "x"}]}).to_string(),
        )
        .unwrap();

        let mut indexes = CacheIndexes::build(&store_with_org(OrgData::default()));
        indexes.extend_from_vendor_snapshots(dir.path());
        assert!(indexes.org("org-1").unwrap().rf_templates.get_by_id("rf-x").is_some());
    }

    #[test]
    fn missing_vendor_directory_is_not_fatal() {
        let mut indexes = CacheIndexes::build(&store_with_org(OrgData::default()));
        indexes.extend_from_vendor_snapshots(Path::new("/nonexistent/vendors"));
        assert!(indexes.org("org-1").is_some());
    }
}

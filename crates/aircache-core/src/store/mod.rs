// ── Persisted store ──
//
// The versioned root aggregate that lands on disk: one `OrgData` subtree
// per known organization. The store itself is plain data -- ownership and
// dirty/persist semantics live in `cache::CacheManager`, and all derived
// lookup structures live in `store::indexes`.

pub mod indexes;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{
    DeviceConfig, DeviceKind, DeviceProfile, GatewayTemplate, InventoryDevice, Network,
    RfTemplate, Site, SiteSetting, Wlan, WlanTemplate,
};

/// Current on-disk format version. Bumped only on breaking changes.
pub const FORMAT_VERSION: u32 = 1;

/// Persisted root: `{version, orgs}`. Exactly one `OrgData` per known
/// organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub version: u32,
    pub orgs: HashMap<String, OrgData>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION,
            orgs: HashMap::new(),
        }
    }

    pub fn org(&self, org_id: &str) -> Option<&OrgData> {
        self.orgs.get(org_id)
    }

    /// Fetch-or-create the subtree for an organization. The created
    /// subtree has every nested collection initialized empty, never
    /// absent, so org-scoped callers need no new-organization special
    /// case.
    pub fn org_entry(&mut self, org_id: &str) -> &mut OrgData {
        self.orgs.entry(org_id.to_owned()).or_default()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-organization aggregate of all cached collections.
///
/// MAC-keyed maps are keyed by the canonical form from
/// [`MacAddress`](crate::model::MacAddress) -- two spellings of one
/// address can never produce duplicate keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgData {
    pub sites: Vec<Site>,
    pub site_settings: Vec<SiteSetting>,
    #[serde(rename = "rftemplates")]
    pub rf_templates: Vec<RfTemplate>,
    #[serde(rename = "gatewaytemplates")]
    pub gateway_templates: Vec<GatewayTemplate>,
    #[serde(rename = "templates")]
    pub wlan_templates: Vec<WlanTemplate>,
    pub networks: Vec<Network>,
    /// Org-level WLANs.
    pub wlans: Vec<Wlan>,
    /// Per-site WLANs, keyed by site id.
    pub site_wlans: HashMap<String, Vec<Wlan>>,
    /// Hardware inventory, one table per device kind, keyed by MAC.
    pub inventory: DeviceTables<InventoryDevice>,
    #[serde(rename = "deviceprofiles")]
    pub device_profiles: Vec<DeviceProfile>,
    /// Opaque per-profile detail records, keyed by profile id.
    #[serde(rename = "deviceprofile_details")]
    pub profile_details: HashMap<String, Value>,
    /// Per-site device configs, one table per device kind, keyed by MAC.
    pub configs: DeviceTables<DeviceConfig>,
}

/// One map per device kind. Keys are canonical MACs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceTables<T> {
    pub ap: HashMap<String, T>,
    pub switch: HashMap<String, T>,
    pub gateway: HashMap<String, T>,
}

impl<T> DeviceTables<T> {
    pub fn table(&self, kind: DeviceKind) -> &HashMap<String, T> {
        match kind {
            DeviceKind::Ap => &self.ap,
            DeviceKind::Switch => &self.switch,
            DeviceKind::Gateway => &self.gateway,
        }
    }

    pub fn table_mut(&mut self, kind: DeviceKind) -> &mut HashMap<String, T> {
        match kind {
            DeviceKind::Ap => &mut self.ap,
            DeviceKind::Switch => &mut self.switch,
            DeviceKind::Gateway => &mut self.gateway,
        }
    }

    /// Iterate `(kind, mac, record)` across all three tables.
    pub fn iter_all(&self) -> impl Iterator<Item = (DeviceKind, &String, &T)> {
        DeviceKind::ALL
            .into_iter()
            .flat_map(|kind| self.table(kind).iter().map(move |(mac, v)| (kind, mac, v)))
    }
}

// Manual impl: `derive(Default)` would demand `T: Default`.
impl<T> Default for DeviceTables<T> {
    fn default() -> Self {
        Self {
            ap: HashMap::new(),
            switch: HashMap::new(),
            gateway: HashMap::new(),
        }
    }
}

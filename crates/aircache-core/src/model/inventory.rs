// ── Inventory and per-device config records ──
//
// The two raw device views this engine reconciles:
// `InventoryDevice` comes from the org-wide inventory listing (hardware
// identity, claim state), `DeviceConfig` from the per-site device listing
// (assignment and configuration). Neither alone is complete -- see
// `UnifiedDevice::merge`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::device::DeviceKind;

/// One row of the org inventory listing, keyed by normalized MAC in the
/// store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryDevice {
    pub id: Option<String>,
    pub mac: String,
    pub serial: Option<String>,
    pub model: Option<String>,
    pub sku: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<DeviceKind>,
    pub org_id: Option<String>,
    pub site_id: Option<String>,
    pub deviceprofile_id: Option<String>,
    /// Claim code; sticky once known (see `UnifiedDevice::merge`).
    pub magic: Option<String>,
    pub connected: Option<bool>,
    pub created_time: Option<i64>,
    pub modified_time: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One row of the per-site device listing, keyed by normalized MAC in the
/// store. One shape serves all three device kinds; the owning table
/// determines the kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub id: Option<String>,
    pub mac: String,
    pub name: Option<String>,
    pub org_id: Option<String>,
    pub site_id: Option<String>,
    pub deviceprofile_id: Option<String>,
    pub notes: Option<String>,
    pub managed: Option<bool>,
    pub ip_config: Option<Value>,
    pub created_time: Option<i64>,
    pub modified_time: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

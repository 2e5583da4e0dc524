// ── Device profile domain type ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::device::DeviceKind;

/// Reusable per-device configuration profile. Opaque per-profile detail
/// records live alongside these in the store, keyed by profile id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub id: Option<String>,
    pub name: Option<String>,
    pub org_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<DeviceKind>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

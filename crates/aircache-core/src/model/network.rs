// ── Network and WLAN domain types ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A wired network definition (subnet / VLAN).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    pub id: Option<String>,
    pub name: Option<String>,
    pub org_id: Option<String>,
    pub subnet: Option<String>,
    pub vlan_id: Option<u16>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A wireless network. Exists both at org level (via WLAN templates) and
/// per site; the SSID doubles as the by-name lookup key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wlan {
    pub id: Option<String>,
    pub ssid: Option<String>,
    pub org_id: Option<String>,
    pub site_id: Option<String>,
    pub template_id: Option<String>,
    pub enabled: Option<bool>,
    pub auth: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

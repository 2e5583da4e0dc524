// ── Site domain types ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A physical location within an organization.
///
/// Field names mirror the remote system's vocabulary so raw payloads
/// deserialize with minimal renaming; anything else lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    pub id: Option<String>,
    pub name: Option<String>,
    pub org_id: Option<String>,
    pub timezone: Option<String>,
    pub country_code: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rftemplate_id: Option<String>,
    pub gatewaytemplate_id: Option<String>,
    pub networktemplate_id: Option<String>,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-site settings blob (variables and overrides scoped to one site).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSetting {
    pub site_id: Option<String>,
    pub vars: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

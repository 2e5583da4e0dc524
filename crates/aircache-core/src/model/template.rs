// ── Template domain types ──
//
// Three template families live at the org level: RF templates (radio
// settings), gateway templates, and WLAN templates. RF-template indexes
// are additionally enriched from per-vendor snapshot files carrying
// minimal `{id, name}` stubs for foreign-system templates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Radio-frequency template: per-band radio settings applied to sites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RfTemplate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub org_id: Option<String>,
    pub country_code: Option<String>,
    pub band_24: Option<Value>,
    pub band_5: Option<Value>,
    pub band_6: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Gateway configuration template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayTemplate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub org_id: Option<String>,
    #[serde(rename = "type")]
    pub template_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// WLAN template: a bundle of WLANs applied to a set of sites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WlanTemplate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub org_id: Option<String>,
    pub applies: Option<Value>,
    pub exceptions: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Vendor snapshots ────────────────────────────────────────────────

/// Minimal RF-template stub carried by a vendor snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RfTemplateStub {
    pub id: String,
    pub name: String,
}

/// One per-external-system snapshot file: a vendor identifier plus the
/// RF-template stubs that vendor's identifiers should resolve through.
/// Produced by out-of-scope processes; consumed read-only by the index
/// builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorSnapshot {
    pub vendor: String,
    pub rftemplates: Vec<RfTemplateStub>,
}

impl From<&RfTemplateStub> for RfTemplate {
    fn from(stub: &RfTemplateStub) -> Self {
        RfTemplate {
            id: Some(stub.id.clone()),
            name: Some(stub.name.clone()),
            ..RfTemplate::default()
        }
    }
}

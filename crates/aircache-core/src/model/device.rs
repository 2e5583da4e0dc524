// ── Unified device view ──
//
// Device data arrives from two API surfaces with non-overlapping field
// coverage: the org inventory listing and the per-site device listing.
// `UnifiedDevice` is the canonical cross-type view; `merge` accumulates
// the union of both without regressing previously known fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use crate::error::CacheError;

/// Canonical device classification. The wire form is the lowercase name
/// (`"ap"`, `"switch"`, `"gateway"`), mirroring the remote vocabulary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceKind {
    Ap,
    Switch,
    Gateway,
}

impl DeviceKind {
    /// All kinds, in the order device tables are traversed.
    pub const ALL: [Self; 3] = [Self::Ap, Self::Switch, Self::Gateway];

    /// Parse a device-type string from a type-dispatched call site.
    ///
    /// An unrecognized string is a hard error -- it usually signals a
    /// caller bug or schema drift, not absence of data.
    pub fn parse(raw: &str) -> Result<Self, CacheError> {
        raw.parse()
            .map_err(|_| CacheError::UnknownDeviceType(raw.to_owned()))
    }
}

/// Canonical device view merging the inventory-listing and per-site-listing
/// API surfaces.
///
/// A fixed base field set plus two open maps: `device_config` for
/// device-specific configuration and `additional` absorbing any field
/// outside the known schema. The `additional` map round-trips verbatim --
/// it is the schema-evolution mechanism, not clutter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnifiedDevice {
    pub id: Option<String>,
    /// Join key across all device-typed collections. Canonical (lowercase,
    /// undelimited) once the device has passed through the device cache.
    pub mac: String,
    pub serial: Option<String>,
    pub name: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<DeviceKind>,
    pub site_id: Option<String>,
    pub org_id: Option<String>,
    pub deviceprofile_id: Option<String>,
    pub created_time: Option<i64>,
    pub modified_time: Option<i64>,
    pub connected: Option<bool>,
    pub managed: Option<bool>,
    /// Claim code used to take ownership of unassigned hardware.
    /// Sticky: once known from either source it is never blanked out.
    pub magic: Option<String>,
    /// Device-specific configuration, merged key-by-key.
    pub device_config: Map<String, Value>,
    /// Catch-all for fields outside the known schema; preserved verbatim.
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl UnifiedDevice {
    /// Combine two partial views of the same device.
    ///
    /// Field-level "non-nil update wins": every `Some` field on `update`
    /// overrides `base`; `None` never erases known data. Exceptions:
    /// `magic` never regresses to blank, and the two open maps merge
    /// key-by-key (update's value winning per key) rather than being
    /// replaced wholesale.
    pub fn merge(base: &UnifiedDevice, update: &UnifiedDevice) -> UnifiedDevice {
        let mut device_config = base.device_config.clone();
        for (key, value) in &update.device_config {
            device_config.insert(key.clone(), value.clone());
        }

        let mut additional = base.additional.clone();
        for (key, value) in &update.additional {
            additional.insert(key.clone(), value.clone());
        }

        UnifiedDevice {
            id: pick(&base.id, &update.id),
            mac: if update.mac.is_empty() {
                base.mac.clone()
            } else {
                update.mac.clone()
            },
            serial: pick(&base.serial, &update.serial),
            name: pick(&base.name, &update.name),
            model: pick(&base.model, &update.model),
            kind: pick(&base.kind, &update.kind),
            site_id: pick(&base.site_id, &update.site_id),
            org_id: pick(&base.org_id, &update.org_id),
            deviceprofile_id: pick(&base.deviceprofile_id, &update.deviceprofile_id),
            created_time: pick(&base.created_time, &update.created_time),
            modified_time: pick(&base.modified_time, &update.modified_time),
            connected: pick(&base.connected, &update.connected),
            managed: pick(&base.managed, &update.managed),
            magic: pick_sticky(&base.magic, &update.magic),
            device_config,
            additional,
        }
    }
}

/// Non-nil update wins; nil never erases.
fn pick<T: Clone>(base: &Option<T>, update: &Option<T>) -> Option<T> {
    update.clone().or_else(|| base.clone())
}

/// Sticky variant for the claim code: a blank update never replaces a
/// known value, but a different non-blank value may.
fn pick_sticky(base: &Option<String>, update: &Option<String>) -> Option<String> {
    match update {
        Some(value) if !value.is_empty() => Some(value.clone()),
        _ => base.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn device(mac: &str) -> UnifiedDevice {
        UnifiedDevice {
            mac: mac.to_owned(),
            ..UnifiedDevice::default()
        }
    }

    #[test]
    fn device_kind_parses_known_strings() {
        assert_eq!(DeviceKind::parse("ap").unwrap(), DeviceKind::Ap);
        assert_eq!(DeviceKind::parse("switch").unwrap(), DeviceKind::Switch);
        assert_eq!(DeviceKind::parse("gateway").unwrap(), DeviceKind::Gateway);
    }

    #[test]
    fn device_kind_rejects_unknown_strings() {
        let err = DeviceKind::parse("router").unwrap_err();
        assert!(matches!(err, CacheError::UnknownDeviceType(s) if s == "router"));
    }

    #[test]
    fn merge_takes_union_of_disjoint_fields() {
        let mut base = device("001122334455");
        base.serial = Some("SER-1".into());
        base.site_id = Some("site-a".into());

        let mut update = device("001122334455");
        update.name = Some("lobby-ap".into());
        update.model = Some("AP43".into());

        let merged = UnifiedDevice::merge(&base, &update);
        assert_eq!(merged.serial.as_deref(), Some("SER-1"));
        assert_eq!(merged.site_id.as_deref(), Some("site-a"));
        assert_eq!(merged.name.as_deref(), Some("lobby-ap"));
        assert_eq!(merged.model.as_deref(), Some("AP43"));
    }

    #[test]
    fn merge_update_wins_on_conflict() {
        let mut base = device("001122334455");
        base.name = Some("old-name".into());
        base.connected = Some(false);

        let mut update = device("001122334455");
        update.name = Some("new-name".into());
        update.connected = Some(true);

        let merged = UnifiedDevice::merge(&base, &update);
        assert_eq!(merged.name.as_deref(), Some("new-name"));
        assert_eq!(merged.connected, Some(true));
    }

    #[test]
    fn merge_nil_never_erases() {
        let mut base = device("001122334455");
        base.serial = Some("SER-1".into());
        base.deviceprofile_id = Some("prof-1".into());

        let update = device("001122334455");
        let merged = UnifiedDevice::merge(&base, &update);
        assert_eq!(merged.serial.as_deref(), Some("SER-1"));
        assert_eq!(merged.deviceprofile_id.as_deref(), Some("prof-1"));
    }

    #[test]
    fn merge_magic_is_sticky() {
        let mut base = device("001122334455");
        base.magic = Some("CLAIM123".into());

        // Absent update: keeps the known claim code.
        let merged = UnifiedDevice::merge(&base, &device("001122334455"));
        assert_eq!(merged.magic.as_deref(), Some("CLAIM123"));

        // Blank update: still keeps it.
        let mut blanked = device("001122334455");
        blanked.magic = Some(String::new());
        let merged = UnifiedDevice::merge(&base, &blanked);
        assert_eq!(merged.magic.as_deref(), Some("CLAIM123"));

        // A different non-blank value may replace it.
        let mut reclaimed = device("001122334455");
        reclaimed.magic = Some("CLAIM456".into());
        let merged = UnifiedDevice::merge(&base, &reclaimed);
        assert_eq!(merged.magic.as_deref(), Some("CLAIM456"));
    }

    #[test]
    fn merge_empty_string_update_overrides_plain_fields() {
        let mut base = device("001122334455");
        base.name = Some("lobby-ap".into());
        base.magic = Some("CLAIM123".into());

        let mut update = device("001122334455");
        update.name = Some(String::new());
        update.magic = Some(String::new());

        let merged = UnifiedDevice::merge(&base, &update);
        // Plain fields take any non-nil value, empty included.
        assert_eq!(merged.name.as_deref(), Some(""));
        // The claim code is the guarded exception.
        assert_eq!(merged.magic.as_deref(), Some("CLAIM123"));
    }

    #[test]
    fn merge_maps_merge_per_key() {
        let mut base = device("001122334455");
        base.device_config.insert("radio".into(), json!({"band": 5}));
        base.device_config.insert("led".into(), json!(true));
        base.additional.insert("x_vendor".into(), json!("acme"));

        let mut update = device("001122334455");
        update.device_config.insert("led".into(), json!(false));
        update.additional.insert("x_rack".into(), json!(12));

        let merged = UnifiedDevice::merge(&base, &update);
        assert_eq!(merged.device_config["radio"], json!({"band": 5}));
        assert_eq!(merged.device_config["led"], json!(false));
        assert_eq!(merged.additional["x_vendor"], json!("acme"));
        assert_eq!(merged.additional["x_rack"], json!(12));
    }

    #[test]
    fn unknown_fields_round_trip_through_additional() {
        let raw = json!({
            "mac": "001122334455",
            "name": "lobby-ap",
            "x_future_field": {"nested": [1, 2, 3]},
        });
        let device: UnifiedDevice = serde_json::from_value(raw).unwrap();
        assert_eq!(device.additional["x_future_field"], json!({"nested": [1, 2, 3]}));

        let back = serde_json::to_value(&device).unwrap();
        assert_eq!(back["x_future_field"], json!({"nested": [1, 2, 3]}));
    }
}

// ── Raw-record-to-unified-device conversions ──
//
// Bridges the two partial API views into `UnifiedDevice` so the device
// cache can reconcile them by MAC. Conversions are lossless: fields the
// unified schema does not model are folded into the `additional` map.

use serde_json::{Map, Value};

use crate::model::{DeviceConfig, DeviceKind, InventoryDevice, UnifiedDevice};

impl UnifiedDevice {
    /// Build the inventory-side partial view of a device.
    pub fn from_inventory(inv: &InventoryDevice) -> UnifiedDevice {
        let mut additional = inv.extra.clone();
        if let Some(sku) = &inv.sku {
            additional.insert("sku".into(), Value::String(sku.clone()));
        }

        UnifiedDevice {
            id: inv.id.clone(),
            mac: inv.mac.clone(),
            serial: inv.serial.clone(),
            name: inv.name.clone(),
            model: inv.model.clone(),
            kind: inv.kind,
            site_id: inv.site_id.clone(),
            org_id: inv.org_id.clone(),
            deviceprofile_id: inv.deviceprofile_id.clone(),
            created_time: inv.created_time,
            modified_time: inv.modified_time,
            connected: inv.connected,
            managed: None,
            magic: inv.magic.clone(),
            device_config: Map::new(),
            additional,
        }
    }

    /// Build the per-site-listing partial view of a device. The owning
    /// config table determines `kind`; the record itself does not carry it.
    pub fn from_config(kind: DeviceKind, cfg: &DeviceConfig) -> UnifiedDevice {
        let mut device_config = Map::new();
        if let Some(notes) = &cfg.notes {
            device_config.insert("notes".into(), Value::String(notes.clone()));
        }
        if let Some(ip_config) = &cfg.ip_config {
            device_config.insert("ip_config".into(), ip_config.clone());
        }

        UnifiedDevice {
            id: cfg.id.clone(),
            mac: cfg.mac.clone(),
            serial: None,
            name: cfg.name.clone(),
            model: None,
            kind: Some(kind),
            site_id: cfg.site_id.clone(),
            org_id: cfg.org_id.clone(),
            deviceprofile_id: cfg.deviceprofile_id.clone(),
            created_time: cfg.created_time,
            modified_time: cfg.modified_time,
            connected: None,
            managed: cfg.managed,
            magic: None,
            device_config,
            additional: cfg.extra.clone(),
        }
    }
}

impl From<&InventoryDevice> for UnifiedDevice {
    fn from(inv: &InventoryDevice) -> Self {
        UnifiedDevice::from_inventory(inv)
    }
}

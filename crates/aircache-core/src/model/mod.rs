// ── Domain model ──
//
// Typed records mirroring the remote inventory system's vocabulary.
// Every wire-facing struct carries a `#[serde(flatten)]` extra map so
// unrecognized fields survive a cache round-trip untouched.

pub mod device;
pub mod inventory;
pub mod mac;
pub mod network;
pub mod profile;
pub mod site;
pub mod template;

pub use device::{DeviceKind, UnifiedDevice};
pub use inventory::{DeviceConfig, InventoryDevice};
pub use mac::MacAddress;
pub use network::{Network, Wlan};
pub use profile::DeviceProfile;
pub use site::{Site, SiteSetting};
pub use template::{GatewayTemplate, RfTemplate, RfTemplateStub, VendorSnapshot, WlanTemplate};

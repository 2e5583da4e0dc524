//! Local cache, indexing, and reconciliation engine mirroring a remote
//! network-inventory system into process memory, so repeated lookups skip
//! network round trips and offline operation stays possible.
//!
//! The engine never issues outbound calls: the transport layer hands it
//! already-decoded records, and mutations stay local until an explicit
//! save.
//!
//! - **[`Store`]** — Versioned, per-organization aggregate of every
//!   cached collection (sites, templates, networks, WLANs, inventory,
//!   profiles, configs). Plain serde data; the persisted root.
//!
//! - **[`CacheIndexes`]** — Derived by-name / by-id lookup maps, a pure
//!   function of the store, enriched best-effort from per-vendor
//!   RF-template snapshot files.
//!
//! - **[`DeviceCache`]** — Independent multi-index cache of
//!   [`UnifiedDevice`] records (MAC / site / type / name indices) with
//!   hit/miss instrumentation, reconciling the inventory-listing and
//!   per-site-listing API surfaces via field-level merge.
//!
//! - **[`CacheManager`]** — Exclusive owner of the on-disk store:
//!   load, replace, save, re-index.
//!
//! - **[`OrgCache`]** — Per-organization facade with auto-created
//!   subtrees and an explicit dirty flag; callers decide when to save.
//!
//! Everything is purely synchronous. The device cache is internally
//! locked (readers shared, writers exclusive, counters independent); the
//! store side is single-owner by contract.

pub mod cache;
pub mod convert;
pub mod error;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{CacheManager, CacheStats, DeviceCache, OrgCache};
pub use error::CacheError;
pub use store::indexes::{CacheIndexes, EntityIndex, OrgIndexes};
pub use store::{DeviceTables, OrgData, Store, FORMAT_VERSION};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    DeviceConfig,
    DeviceKind,
    DeviceProfile,
    GatewayTemplate,
    InventoryDevice,
    MacAddress,
    Network,
    RfTemplate,
    RfTemplateStub,
    Site,
    SiteSetting,
    UnifiedDevice,
    VendorSnapshot,
    Wlan,
    WlanTemplate,
};

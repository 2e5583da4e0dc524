// ── Cache ownership layer ──
//
// `CacheManager` owns the persisted store, `OrgCache` scopes it to one
// organization, and `DeviceCache` is the independent multi-index unified
// device structure.

pub mod device_cache;
pub mod manager;
pub mod org;

pub use device_cache::{CacheStats, DeviceCache};
pub use manager::{CacheManager, CACHE_FILE, VENDOR_DIR};
pub use org::OrgCache;

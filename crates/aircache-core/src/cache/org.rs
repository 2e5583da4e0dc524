// ── Per-organization facade ──
//
// Convenience surface over the cache manager bound to one organization.
// An explicit handle, constructed once at process start and passed by
// reference to consumers -- "initialize exactly once" without hidden
// global state.

use tracing::debug;

use super::manager::CacheManager;
use crate::error::CacheError;
use crate::model::Site;
use crate::store::{OrgData, Store};

/// Org-scoped view of the cache.
pub struct OrgCache {
    org_id: String,
    manager: CacheManager,
}

impl OrgCache {
    pub fn new(org_id: impl Into<String>, manager: CacheManager) -> Self {
        Self {
            org_id: org_id.into(),
            manager,
        }
    }

    pub fn org_id(&self) -> &str {
        &self.org_id
    }

    pub fn manager(&self) -> &CacheManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut CacheManager {
        &mut self.manager
    }

    /// The bound organization's subtree, auto-created if absent.
    pub fn org_data(&mut self) -> &mut OrgData {
        let org_id = self.org_id.clone();
        self.get_org_data(&org_id)
    }

    /// Fetch-or-create any organization's subtree with every nested
    /// collection initialized empty. Creating a subtree changes the
    /// persisted form, so it marks the cache dirty; reads of an existing
    /// subtree do not.
    pub fn get_org_data(&mut self, org_id: &str) -> &mut OrgData {
        if !self.manager.store().orgs.contains_key(org_id) {
            debug!(org = org_id, "auto-creating org subtree");
            self.manager.mark_dirty();
        }
        self.manager.store_mut().org_entry(org_id)
    }

    /// Replace-or-append a site: linear scan matching first by id, then
    /// by name; repairs the site index in lock-step and marks dirty.
    pub fn update_site(&mut self, site: Site) {
        let org_id = self.org_id.clone();
        let org = self.manager.store_mut().org_entry(&org_id);

        let position = site
            .id
            .as_ref()
            .and_then(|id| org.sites.iter().position(|s| s.id.as_ref() == Some(id)))
            .or_else(|| {
                site.name
                    .as_ref()
                    .and_then(|name| org.sites.iter().position(|s| s.name.as_ref() == Some(name)))
            });
        let replaced = match position {
            Some(index) => Some(std::mem::replace(&mut org.sites[index], site.clone())),
            None => {
                org.sites.push(site.clone());
                None
            }
        };

        // Lock-step repair: the replaced record's keys go first, so a
        // rename or re-id leaves no stale entry behind.
        let sites = &mut self.manager.indexes_mut().org_mut(&org_id).sites;
        if let Some(old) = &replaced {
            sites.remove(old.name.as_deref(), old.id.as_deref());
        }
        let name = site.name.clone();
        let id = site.id.clone();
        sites.insert(name.as_deref(), id.as_deref(), site);
        self.manager.mark_dirty();
    }

    /// Replace the entire store with a single empty subtree for the bound
    /// organization.
    pub fn clear(&mut self) {
        let mut store = Store::new();
        store.org_entry(&self.org_id);
        self.manager.replace_cache(store);
        self.manager.mark_dirty();
    }

    // ── Dirty/persist delegation ─────────────────────────────────────

    pub fn is_dirty(&self) -> bool {
        self.manager.is_dirty()
    }

    pub fn mark_dirty(&mut self) {
        self.manager.mark_dirty();
    }

    pub fn save(&mut self) -> Result<(), CacheError> {
        self.manager.save()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn org_cache() -> (tempfile::TempDir, OrgCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = OrgCache::new("org-1", CacheManager::new(dir.path()));
        (dir, cache)
    }

    fn site(id: &str, name: &str) -> Site {
        Site {
            id: Some(id.to_owned()),
            name: Some(name.to_owned()),
            ..Site::default()
        }
    }

    #[test]
    fn fresh_cache_is_not_dirty() {
        let (_dir, cache) = org_cache();
        assert!(!cache.is_dirty());
    }

    #[test]
    fn get_org_data_auto_vivifies_once() {
        let (_dir, mut cache) = org_cache();
        cache.get_org_data("org-2").sites.push(site("s", "S"));
        assert!(cache.is_dirty());

        // Second access reads the same subtree, no re-creation.
        assert_eq!(cache.get_org_data("org-2").sites.len(), 1);
    }

    #[test]
    fn org_subtrees_do_not_alias() {
        let (_dir, mut cache) = org_cache();
        cache.get_org_data("org-a").sites.push(site("s1", "A"));
        cache.get_org_data("org-b");

        assert_eq!(cache.get_org_data("org-a").sites.len(), 1);
        assert!(cache.get_org_data("org-b").sites.is_empty());
    }

    #[test]
    fn update_site_replaces_by_id() {
        let (_dir, mut cache) = org_cache();
        cache.update_site(site("site-1", "HQ"));
        cache.update_site(site("site-1", "HQ-renamed"));

        let sites = &cache.org_data().sites;
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].name.as_deref(), Some("HQ-renamed"));
    }

    #[test]
    fn update_site_matches_by_name_when_id_misses() {
        let (_dir, mut cache) = org_cache();
        cache.update_site(site("site-1", "HQ"));

        let mut replacement = site("site-2", "HQ");
        replacement.timezone = Some("UTC".into());
        cache.update_site(replacement);

        let sites = &cache.org_data().sites;
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].id.as_deref(), Some("site-2"));
    }

    #[test]
    fn update_site_appends_when_nothing_matches() {
        let (_dir, mut cache) = org_cache();
        cache.update_site(site("site-1", "HQ"));
        cache.update_site(site("site-2", "Branch"));
        assert_eq!(cache.org_data().sites.len(), 2);
    }

    #[test]
    fn update_site_repairs_index_in_lock_step() {
        let (_dir, mut cache) = org_cache();
        cache.update_site(site("site-1", "HQ"));
        assert_eq!(
            cache
                .manager()
                .site_by_name("org-1", "HQ")
                .unwrap()
                .id
                .as_deref(),
            Some("site-1")
        );
    }

    #[test]
    fn update_site_rename_drops_stale_name_key() {
        let (_dir, mut cache) = org_cache();
        cache.update_site(site("site-1", "HQ"));
        cache.update_site(site("site-1", "HQ-renamed"));

        assert!(cache.manager().site_by_name("org-1", "HQ").is_err());
        assert_eq!(
            cache
                .manager()
                .site_by_name("org-1", "HQ-renamed")
                .unwrap()
                .id
                .as_deref(),
            Some("site-1")
        );
    }

    #[test]
    fn update_site_reid_drops_stale_id_key() {
        let (_dir, mut cache) = org_cache();
        cache.update_site(site("site-1", "HQ"));
        cache.update_site(site("site-2", "HQ"));

        assert!(cache.manager().site_by_id("org-1", "site-1").is_err());
        assert_eq!(
            cache
                .manager()
                .site_by_id("org-1", "site-2")
                .unwrap()
                .name
                .as_deref(),
            Some("HQ")
        );
    }

    #[test]
    fn update_site_marks_dirty_and_save_clears_it() {
        let (_dir, mut cache) = org_cache();
        cache.update_site(site("site-1", "HQ"));
        assert!(cache.is_dirty());

        cache.save().unwrap();
        assert!(!cache.is_dirty());
    }

    #[test]
    fn clear_leaves_single_empty_bound_org() {
        let (_dir, mut cache) = org_cache();
        cache.update_site(site("site-1", "HQ"));
        cache.get_org_data("org-other");

        cache.clear();
        let store = cache.manager().store();
        assert_eq!(store.orgs.len(), 1);
        assert!(store.org("org-1").unwrap().sites.is_empty());
        assert!(cache.is_dirty());
    }
}

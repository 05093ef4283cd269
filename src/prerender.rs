//! Static generation: resolve every addressable detail page of static routes once, at startup.

use crate::config::PageRoute;
use crate::loader::RowLoader;
use crate::store::Record;
use std::collections::HashMap;

/// Prerendered detail pages, keyed by route path then slug. Read-only once built.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pages: HashMap<String, Vec<(String, Record)>>,
}

impl Snapshot {
    /// Enumerate and load the detail pages of every static route. Never fails: slugs that do not
    /// resolve are logged by the loader and left out.
    pub async fn build(loader: &RowLoader, routes: &[PageRoute]) -> Self {
        let mut pages = HashMap::new();
        for route in routes.iter().filter(|r| r.is_static()) {
            let Some(detail) = &route.detail else { continue };
            let slugs = match &detail.entries {
                Some(entries) => entries.clone(),
                None => loader.enumerate_keys(&route.resource, &detail.key_field).await,
            };
            let mut records = Vec::with_capacity(slugs.len());
            for slug in slugs {
                if let Some(record) = loader
                    .load_one(&route.resource, &detail.key_field, &slug)
                    .await
                    .into_record()
                {
                    records.push((slug, record));
                }
            }
            tracing::info!(path = %route.path, resource = %route.resource, pages = records.len(), "prerendered");
            pages.insert(route.path.clone(), records);
        }
        Snapshot { pages }
    }

    pub fn get(&self, path: &str, slug: &str) -> Option<&Record> {
        self.pages
            .get(path)?
            .iter()
            .find(|(s, _)| s == slug)
            .map(|(_, record)| record)
    }

    /// Slugs prerendered for `path`, in enumeration order.
    pub fn slugs(&self, path: &str) -> Vec<String> {
        self.pages
            .get(path)
            .map(|records| records.iter().map(|(s, _)| s.clone()).collect())
            .unwrap_or_default()
    }

    pub fn page_count(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }
}

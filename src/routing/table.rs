//! Route table module
//!
//! The immutable URL-to-handler mapping built once at bootstrap and
//! owned by the dispatcher. Concurrent reads need no locking.

use std::collections::HashMap;
use std::sync::Arc;

use crate::container::handler::HandlerSpec;
use crate::container::registry::BeanRef;

/// One mapped route: handler spec plus its owning bean instance
pub struct RouteEntry {
    /// Qualified name of the owning controller, for diagnostics.
    pub controller: &'static str,
    pub handler: Arc<HandlerSpec>,
    pub bean: BeanRef,
}

impl RouteEntry {
    /// `Controller#method` label used in logs and the bootstrap report.
    pub fn label(&self) -> String {
        format!("{}#{}", self.controller, self.handler.name())
    }
}

/// Mapping from normalized URL path to route entry
#[derive(Default)]
pub struct RouteTable {
    routes: HashMap<String, RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under the first-registered-wins policy. Returns the entry
    /// back to the caller when the URL was already mapped.
    pub fn insert(&mut self, url: String, entry: RouteEntry) -> Option<RouteEntry> {
        if self.routes.contains_key(&url) {
            return Some(entry);
        }
        self.routes.insert(url, entry);
        None
    }

    pub fn lookup(&self, url: &str) -> Option<&RouteEntry> {
        self.routes.get(url)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Mapped URLs, sorted for stable diagnostics output.
    pub fn urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        urls.sort_unstable();
        urls
    }
}

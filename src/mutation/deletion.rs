//! Tracking of records that are mid-delete.

use std::sync::Arc;

use dashmap::DashSet;

/// Pathnames with a delete request in flight.
///
/// Membership is per pathname: entries are inserted and removed
/// independently, so concurrent deletes never disturb each other.
#[derive(Debug, Clone, Default)]
pub struct DeletionSet {
    pending: Arc<DashSet<String>>,
}

impl DeletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `pathname` as being deleted.
    ///
    /// Returns `None` if it is already pending. The mark is cleared when the
    /// returned guard is dropped.
    pub fn begin(&self, pathname: &str) -> Option<DeletionGuard> {
        if !self.pending.insert(pathname.to_string()) {
            return None;
        }
        Some(DeletionGuard {
            pending: self.pending.clone(),
            pathname: pathname.to_string(),
        })
    }

    pub fn contains(&self, pathname: &str) -> bool {
        self.pending.contains(pathname)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending pathnames in sorted order
    pub fn snapshot(&self) -> Vec<String> {
        let mut pathnames: Vec<String> = self.pending.iter().map(|p| p.key().clone()).collect();
        pathnames.sort();
        pathnames
    }
}

/// Clears one pathname from its [`DeletionSet`] on drop.
#[derive(Debug)]
pub struct DeletionGuard {
    pending: Arc<DashSet<String>>,
    pathname: String,
}

impl DeletionGuard {
    pub fn pathname(&self) -> &str {
        &self.pathname
    }
}

impl Drop for DeletionGuard {
    fn drop(&mut self) {
        self.pending.remove(&self.pathname);
    }
}

//! Read-only lookups supplied by the host.
//!
//! Implementations must be safe for concurrent reads; the dispatcher never
//! writes through them.

use std::collections::HashMap;

use crate::models::destination::{Destination, RecipientId};

/// Resolves project identifiers to display names.
pub trait ProjectRegistry: Send + Sync {
    fn project_name(&self, project_id: &str) -> Option<String>;
}

/// Resolves a recipient to their stored webhook settings.
pub trait UserConfigResolver: Send + Sync {
    /// `None` when the recipient has no notifier settings at all.
    fn resolve(&self, recipient: &RecipientId) -> Option<Destination>;
}

impl ProjectRegistry for HashMap<String, String> {
    fn project_name(&self, project_id: &str) -> Option<String> {
        self.get(project_id).cloned()
    }
}

impl UserConfigResolver for HashMap<RecipientId, Destination> {
    fn resolve(&self, recipient: &RecipientId) -> Option<Destination> {
        self.get(recipient).cloned()
    }
}

//! GL code learning
//!
//! When a committed transaction carries a GL code with a description, the
//! pair is remembered so later entry can suggest the description. This is
//! an enrichment hook off the commit path: a learner that fails must never
//! fail the commit it observed.

use std::sync::Arc;

use tracing::warn;

use crate::storage::Storage;

/// Observes GL code/description pairs from committed transactions
pub trait GlCodeLearner: Send + Sync {
    fn observe(&self, code: &str, description: &str);
}

/// Learner backed by the gl_codes store
pub struct StoredGlLearner {
    storage: Arc<Storage>,
}

impl StoredGlLearner {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

impl GlCodeLearner for StoredGlLearner {
    fn observe(&self, code: &str, description: &str) {
        let code = code.trim();
        let description = description.trim();
        if code.is_empty() || description.is_empty() {
            return;
        }

        if let Err(e) = self
            .storage
            .gl_codes
            .insert(code, description)
            .and_then(|_| self.storage.gl_codes.save())
        {
            // Learning is best-effort; the commit already happened.
            warn!(code = %code, error = %e, "failed to record GL code");
        }
    }
}

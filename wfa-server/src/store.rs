//! In-memory analysis store
//!
//! Holds every completed analysis for the lifetime of the process. Entries
//! are only ever added; there is no update or delete.
//!
//! Uses RwLock for concurrent read access with rare writes. The write lock
//! is held only for the map insertion, never while frequencies are computed.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use wfa_common::api::{Analysis, WordFrequency};
use wfa_common::{IdGenerator, UuidGenerator};

use crate::error::IngestError;

/// Identifier draws per `create` before giving up
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Thread-safe keyed store of analyses
///
/// Created once in the composition root and shared by handle (`Arc`) with the
/// ingestion and retrieval paths.
pub struct AnalysisStore {
    analyses: RwLock<HashMap<String, Arc<Analysis>>>,
    ids: Arc<dyn IdGenerator>,
}

impl AnalysisStore {
    /// Create an empty store with UUIDv4 identifiers
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(UuidGenerator))
    }

    /// Create an empty store with a custom identifier source
    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            analyses: RwLock::new(HashMap::new()),
            ids,
        }
    }

    /// Store `frequencies` under a fresh identifier and return it
    ///
    /// Existing entries are never replaced. If the generator keeps repeating
    /// taken ids, gives up after [`MAX_ID_ATTEMPTS`] draws with
    /// [`IngestError::IdCollision`].
    pub async fn create(&self, frequencies: Vec<WordFrequency>) -> Result<String, IngestError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            let mut analyses = self.analyses.write().await;

            if let Entry::Vacant(slot) = analyses.entry(id.clone()) {
                debug!("Storing analysis {} ({} words)", id, frequencies.len());
                slot.insert(Arc::new(Analysis {
                    id: id.clone(),
                    frequencies,
                }));
                return Ok(id);
            }

            warn!("Identifier generator repeated {}; drawing another", id);
        }

        Err(IngestError::IdCollision(format!(
            "no unused identifier after {} attempts",
            MAX_ID_ATTEMPTS
        )))
    }

    /// Look up an analysis by identifier
    pub async fn get(&self, id: &str) -> Result<Arc<Analysis>, IngestError> {
        self.analyses
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| IngestError::NotFound(id.to_string()))
    }

    /// Number of stored analyses
    pub async fn len(&self) -> usize {
        self.analyses.read().await.len()
    }

    /// `true` until the first analysis is stored
    pub async fn is_empty(&self) -> bool {
        self.analyses.read().await.is_empty()
    }
}

impl Default for AnalysisStore {
    fn default() -> Self {
        Self::new()
    }
}

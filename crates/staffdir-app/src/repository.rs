//! Snapshot repository over an [`EmployeeSource`].
//!
//! Views read one shared, normalised snapshot instead of fetching on every
//! activation. The cache is only dropped through [`Repository::invalidate`]
//! or replaced by [`Repository::refresh`].
//!
//! Overlapping fetches are ordered by a monotonic request token: a response
//! is installed only if no newer request was issued while it was in flight.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use staffdir_core::{Employee, normalize};
use staffdir_fetch::{EmployeeSource, FetchError};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// A newer request was issued while this one was in flight, and nothing
    /// has been installed yet.
    #[error("request {token} was superseded by a newer request")]
    Superseded { token: u64 },
}

/// One normalised fetch result. Ids in `employees` are scoped to `epoch`.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub epoch: u64,
    pub employees: Arc<[Employee]>,
}

#[derive(Default)]
struct CacheState {
    snapshot: Option<Snapshot>,
    last_epoch: u64,
}

pub struct Repository<S> {
    source: S,
    issued: AtomicU64,
    cache: Mutex<CacheState>,
}

impl<S: EmployeeSource> Repository<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            issued: AtomicU64::new(0),
            cache: Mutex::new(CacheState::default()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The installed snapshot, if any, without fetching.
    pub fn cached(&self) -> Option<Snapshot> {
        self.lock().snapshot.clone()
    }

    /// The installed snapshot, fetching one first if the cache is empty.
    pub async fn snapshot(&self) -> Result<Snapshot, RepositoryError> {
        if let Some(snapshot) = self.cached() {
            return Ok(snapshot);
        }
        self.refresh().await
    }

    /// Fetch and install a new snapshot.
    ///
    /// If a newer request was issued before this one resolved, the response
    /// is discarded and the currently installed snapshot is returned instead.
    pub async fn refresh(&self) -> Result<Snapshot, RepositoryError> {
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let rows = self.source.fetch_table().await?;

        let mut cache = self.lock();
        let latest = self.issued.load(Ordering::SeqCst);
        if token != latest {
            warn!(token, latest, "discarding stale employee table response");
            return cache
                .snapshot
                .clone()
                .ok_or(RepositoryError::Superseded { token });
        }

        cache.last_epoch += 1;
        let snapshot = Snapshot {
            epoch: cache.last_epoch,
            employees: normalize(&rows).into(),
        };
        info!(
            token,
            epoch = snapshot.epoch,
            rows = snapshot.employees.len(),
            "installed employee snapshot"
        );
        cache.snapshot = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Drop the installed snapshot; the next [`snapshot`](Self::snapshot) refetches.
    pub fn invalidate(&self) {
        if self.lock().snapshot.take().is_some() {
            info!("employee snapshot invalidated");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//! Lazily opened, shared handle to the local recording store

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use tokio::sync::OnceCell;

use crate::application::ports::StoreError;

use super::schema::run_migrations;

/// Where the local store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    InMemory,
}

/// Cheaply cloneable handle to the open store
#[derive(Clone)]
pub struct StoreHandle {
    conn: Arc<Mutex<Connection>>,
}

impl StoreHandle {
    /// Lock the connection for one statement
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, String> {
        self.conn
            .lock()
            .map_err(|_| "store connection lock poisoned".to_string())
    }

    /// Whether both handles point at the same connection
    pub fn same_as(&self, other: &StoreHandle) -> bool {
        Arc::ptr_eq(&self.conn, &other.conn)
    }
}

/// Owns the store handle for its lifetime.
///
/// The connection is opened on first use and reused afterwards; it is
/// closed only when the context itself is dropped. Pass one context to
/// every backend that should share the store.
pub struct StoreContext {
    location: StoreLocation,
    handle: OnceCell<StoreHandle>,
    opens: AtomicUsize,
}

impl StoreContext {
    /// File-backed store at `path` (parent directories are created on open)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_location(StoreLocation::File(path.into()))
    }

    /// Private in-memory store
    pub fn in_memory() -> Self {
        Self::with_location(StoreLocation::InMemory)
    }

    pub fn with_location(location: StoreLocation) -> Self {
        Self {
            location,
            handle: OnceCell::new(),
            opens: AtomicUsize::new(0),
        }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Open the store, or return the handle opened earlier.
    ///
    /// Concurrent first calls share one initialisation. A failed open
    /// leaves the context closed so a later call can retry.
    pub async fn open(&self) -> Result<StoreHandle, StoreError> {
        let handle = self
            .handle
            .get_or_try_init(|| async {
                let location = self.location.clone();
                let conn = tokio::task::spawn_blocking(move || open_connection(&location))
                    .await
                    .map_err(|e| StoreError::StoreUnavailable(format!("Task join error: {}", e)))??;

                self.opens.fetch_add(1, Ordering::SeqCst);
                log::debug!("Opened local recording store ({:?})", self.location);
                Ok::<_, StoreError>(StoreHandle {
                    conn: Arc::new(Mutex::new(conn)),
                })
            })
            .await?;

        Ok(handle.clone())
    }

    pub fn is_open(&self) -> bool {
        self.handle.initialized()
    }

    /// Number of times the store has been initialised (0 or 1)
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

fn open_connection(location: &StoreLocation) -> Result<Connection, StoreError> {
    let conn = match location {
        StoreLocation::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::StoreUnavailable(format!("{}: {}", parent.display(), e))
                })?;
            }
            Connection::open(path)
        }
        StoreLocation::InMemory => Connection::open_in_memory(),
    }
    .map_err(|e| StoreError::StoreUnavailable(e.to_string()))?;

    run_migrations(&conn).map_err(|e| StoreError::StoreUnavailable(e.to_string()))?;
    Ok(conn)
}

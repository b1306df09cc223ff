//! A fixed-size pool of [`tokio_rusqlite`] connections.
//!
//! Each connection owns a dedicated thread. A semaphore bounds how many
//! queries hold a connection at once; a permit always corresponds to one idle
//! connection, which is handed back when the [`PooledConnection`] drops.

use std::{
  sync::{Arc, Mutex, PoisonError},
  time::Duration,
};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_rusqlite::Connection;

use crate::{Error, Result, StoreConfig};

#[derive(Clone)]
pub(crate) struct ConnectionPool {
  idle:            Arc<Mutex<Vec<Connection>>>,
  permits:         Arc<Semaphore>,
  acquire_timeout: Duration,
}

impl ConnectionPool {
  /// Open every connection up front so configuration errors surface at
  /// start-up rather than on the first query.
  pub(crate) async fn open(config: &StoreConfig) -> Result<Self> {
    let size = config.pool_size.max(1);
    let busy_timeout = config.busy_timeout();

    let mut idle = Vec::with_capacity(size);
    for _ in 0..size {
      let conn = Connection::open(&config.database_path).await?;
      conn
        .call(move |conn| {
          conn.busy_timeout(busy_timeout)?;
          Ok(())
        })
        .await?;
      idle.push(conn);
    }

    tracing::info!(
      path = %config.database_path.display(),
      size,
      acquire_timeout_ms = config.acquire_timeout_ms,
      "opened connection pool"
    );

    Ok(Self {
      idle:            Arc::new(Mutex::new(idle)),
      permits:         Arc::new(Semaphore::new(size)),
      acquire_timeout: config.acquire_timeout(),
    })
  }

  /// Wait for a free connection, up to the configured timeout.
  pub(crate) async fn acquire(&self) -> Result<PooledConnection> {
    let permit = tokio::time::timeout(self.acquire_timeout, self.permits.clone().acquire_owned())
      .await
      .map_err(|_| Error::AcquireTimeout(self.acquire_timeout))?
      .map_err(|_| Error::PoolClosed)?;

    let conn = self
      .idle
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .pop()
      .ok_or(Error::PoolClosed)?;
    tracing::debug!(available = self.permits.available_permits(), "checked out connection");

    Ok(PooledConnection { conn, idle: Arc::clone(&self.idle), _permit: permit })
  }

  /// Refuse further acquisitions. Connections already handed out stay usable.
  pub(crate) fn close(&self) { self.permits.close(); }
}

/// A connection on loan from the pool.
pub(crate) struct PooledConnection {
  conn:    Connection,
  idle:    Arc<Mutex<Vec<Connection>>>,
  // Declared last: released only after the connection is back in `idle`.
  _permit: OwnedSemaphorePermit,
}

impl PooledConnection {
  pub(crate) async fn call<F, R>(&self, function: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    Ok(self.conn.call(function).await?)
  }
}

impl Drop for PooledConnection {
  fn drop(&mut self) {
    self
      .idle
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push(self.conn.clone());
    tracing::debug!("returned connection");
  }
}

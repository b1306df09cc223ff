//! Deferred dispatch.
//!
//! A [`Request`] is one logical request: the caller defers as many metrics
//! as it needs, each of which starts running immediately on its own pooled
//! connection, and inspects the [`Deferred`] handles only when it needs a
//! value. Handles memoise their result, so a second `get` costs nothing.
//!
//! Failure is request-wide. The first metric to fail records its error on
//! the request; from then on every handle of that request, and
//! [`Request::finish`], reports it.

use std::{
  fmt,
  sync::{Arc, OnceLock},
};

use futures::{
  FutureExt as _,
  future::{BoxFuture, Shared, join_all},
};
use tracing::Instrument as _;
use uuid::Uuid;

use crate::{Error, Metric, Result, pool::ConnectionPool};

type Outcome<T> = std::result::Result<Arc<T>, Arc<Error>>;

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct RequestState {
  id:      Uuid,
  failure: OnceLock<Arc<Error>>,
}

impl RequestState {
  fn fail(&self, metric: &'static str, error: &Arc<Error>) {
    if self.failure.set(Arc::clone(error)).is_ok() {
      tracing::warn!(request = %self.id, metric, %error, "metric failed, request poisoned");
    }
  }

  fn failure(&self) -> Option<Arc<Error>> { self.failure.get().cloned() }
}

/// A group of metric queries that succeed or fail together.
pub struct Request {
  pool:    ConnectionPool,
  state:   Arc<RequestState>,
  pending: Vec<BoxFuture<'static, ()>>,
}

impl Request {
  pub(crate) fn new(pool: ConnectionPool) -> Self {
    Self {
      pool,
      state: Arc::new(RequestState { id: Uuid::new_v4(), failure: OnceLock::new() }),
      pending: Vec::new(),
    }
  }

  pub fn id(&self) -> Uuid { self.state.id }

  /// Start `metric` on a pooled connection and return a handle to its
  /// result. Never blocks on earlier deferred metrics.
  ///
  /// Must be called from within a Tokio runtime.
  pub fn defer<T>(&mut self, metric: Metric<T>) -> Deferred<T>
  where
    T: Send + Sync + 'static,
  {
    let name = metric.name();
    let span = tracing::debug_span!("metric", request = %self.state.id, metric = name);
    tracing::debug!(request = %self.state.id, metric = name, "deferred metric");

    let pool = self.pool.clone();
    let task_state = Arc::clone(&self.state);
    let task = tokio::spawn(
      async move {
        let result = async {
          let conn = pool.acquire().await?;
          conn.call(move |conn| Ok(metric.execute(conn)?)).await
        }
        .await
        .map_err(Arc::new);
        if let Err(error) = &result {
          task_state.fail(name, error);
        }
        result
      }
      .instrument(span),
    );

    let state = Arc::clone(&self.state);
    let inner = async move {
      let outcome: Outcome<T> = match task.await {
        Ok(result) => result.map(Arc::new),
        Err(join) => {
          let error = Arc::new(Error::Join(join.to_string()));
          state.fail(name, &error);
          Err(error)
        }
      };
      tracing::debug!(request = %state.id, metric = name, ok = outcome.is_ok(), "metric resolved");
      outcome
    }
    .boxed()
    .shared();

    self.pending.push(inner.clone().map(|_| ()).boxed());

    Deferred { inner, state: Arc::clone(&self.state), metric: name }
  }

  /// Wait for every deferred metric. Fails if any of them failed.
  pub async fn finish(self) -> Result<()> {
    let outstanding = self.pending.len();
    join_all(self.pending).await;
    match self.state.failure() {
      Some(failure) => Err(Error::Request(failure)),
      None => {
        tracing::debug!(request = %self.state.id, outstanding, "request finished");
        Ok(())
      }
    }
  }
}

impl fmt::Debug for Request {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Request")
      .field("id", &self.state.id)
      .field("pending", &self.pending.len())
      .field("failed", &self.state.failure.get().is_some())
      .finish()
  }
}

// ─── Deferred ────────────────────────────────────────────────────────────────

/// A handle to one deferred metric result.
pub struct Deferred<T> {
  inner:  Shared<BoxFuture<'static, Outcome<T>>>,
  state:  Arc<RequestState>,
  metric: &'static str,
}

impl<T> Clone for Deferred<T> {
  fn clone(&self) -> Self {
    Self {
      inner:  self.inner.clone(),
      state:  Arc::clone(&self.state),
      metric: self.metric,
    }
  }
}

impl<T> Deferred<T> {
  pub fn metric(&self) -> &'static str { self.metric }

  /// Wait for this metric. Reports the request's failure instead of the
  /// value once any metric of the request has failed.
  pub async fn get(&self) -> Result<Arc<T>> {
    let outcome = self.inner.clone().await;
    if let Some(failure) = self.state.failure() {
      return Err(Error::Request(failure));
    }
    outcome.map_err(Error::Request)
  }

  /// Like [`get`](Self::get), cloning the value out of the shared result.
  pub async fn get_cloned(&self) -> Result<T>
  where
    T: Clone,
  {
    Ok(T::clone(&*self.get().await?))
  }
}

impl<T> fmt::Debug for Deferred<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Deferred")
      .field("metric", &self.metric)
      .field("request", &self.state.id)
      .finish()
  }
}

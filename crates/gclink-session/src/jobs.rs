//! Job correlation: matching asynchronous responses to their requests.
//!
//! A request that expects an answer is tagged with a fresh [`JobId`]. The
//! coordinator echoes that id on the response, and [`JobCorrelator::complete`]
//! routes the response to whoever is waiting.
//!
//! Every pending entry is removed on exactly one of: completion,
//! cancellation, expiry, a mass failure (disconnect), or the waiter being
//! dropped. Whichever comes first wins and the others become no-ops.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use gclink_protocol::{GcPacket, JobId};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::SessionError;

type JobResult = Result<GcPacket, SessionError>;

struct PendingJob {
    created_at: Instant,
    tx: oneshot::Sender<JobResult>,
}

struct JobTable {
    next_id: AtomicU64,
    pending: Mutex<HashMap<JobId, PendingJob>>,
}

/// Allocates job ids and routes responses to waiters.
///
/// Cheap to clone; clones share the same table.
#[derive(Clone)]
pub struct JobCorrelator {
    table: Arc<JobTable>,
}

/// A registered request: its id and the handle to await the response with.
pub struct JobTicket {
    pub id: JobId,
    pub waiter: JobWaiter,
}

/// Awaits the response to one request.
///
/// Dropping the waiter withdraws the request.
pub struct JobWaiter {
    id: JobId,
    rx: oneshot::Receiver<JobResult>,
    table: Arc<JobTable>,
}

impl Default for JobCorrelator {
    fn default() -> Self {
        Self::new()
    }
}

impl JobCorrelator {
    pub fn new() -> Self {
        Self {
            table: Arc::new(JobTable {
                next_id: AtomicU64::new(1),
                pending: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Allocates an id and records a pending waiter for it.
    pub fn register(&self) -> JobTicket {
        let id = JobId::new(self.table.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();
        self.table.pending.lock().insert(
            id,
            PendingJob {
                created_at: Instant::now(),
                tx,
            },
        );
        tracing::debug!(%id, "job registered");
        JobTicket {
            id,
            waiter: JobWaiter {
                id,
                rx,
                table: Arc::clone(&self.table),
            },
        }
    }

    /// Delivers a response. Returns `false` if nobody is waiting for `id`.
    pub fn complete(&self, id: JobId, packet: GcPacket) -> bool {
        self.resolve(id, Ok(packet))
    }

    /// Resolves a pending request with `RequestCancelled`.
    pub fn cancel(&self, id: JobId) -> bool {
        self.resolve(id, Err(SessionError::RequestCancelled(id)))
    }

    /// Resolves every pending request with `error`. Returns how many there
    /// were.
    pub fn fail_all(&self, error: SessionError) -> usize {
        let drained: Vec<(JobId, PendingJob)> = self.table.pending.lock().drain().collect();
        let count = drained.len();
        for (_, job) in drained {
            let _ = job.tx.send(Err(error.clone()));
        }
        if count > 0 {
            tracing::debug!(count, %error, "failed pending jobs");
        }
        count
    }

    /// Resolves requests registered more than `age` ago with
    /// `RequestExpired`, and returns their ids.
    pub fn expire_older_than(&self, age: Duration) -> Vec<JobId> {
        let now = Instant::now();
        let expired: Vec<(JobId, PendingJob)> = {
            let mut pending = self.table.pending.lock();
            let stale: Vec<JobId> = pending
                .iter()
                .filter(|(_, job)| now.saturating_duration_since(job.created_at) > age)
                .map(|(id, _)| *id)
                .collect();
            stale
                .into_iter()
                .filter_map(|id| pending.remove(&id).map(|job| (id, job)))
                .collect()
        };

        let mut ids = Vec::with_capacity(expired.len());
        for (id, job) in expired {
            tracing::debug!(%id, "job expired");
            let _ = job.tx.send(Err(SessionError::RequestExpired(id)));
            ids.push(id);
        }
        ids
    }

    pub fn is_pending(&self, id: JobId) -> bool {
        self.table.pending.lock().contains_key(&id)
    }

    /// Number of pending requests.
    pub fn len(&self) -> usize {
        self.table.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn resolve(&self, id: JobId, result: JobResult) -> bool {
        // Remove under the lock, send outside it.
        let Some(job) = self.table.pending.lock().remove(&id) else {
            tracing::debug!(%id, "no pending job, ignoring");
            return false;
        };
        // The waiter may have been dropped in between; that is fine.
        let _ = job.tx.send(result);
        true
    }
}

impl JobWaiter {
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Waits up to `timeout` for the response.
    ///
    /// # Errors
    /// - `RequestTimeout` if nothing arrived in time.
    /// - Whatever the request was resolved with otherwise (cancelled,
    ///   expired, disconnected).
    pub async fn wait(mut self, timeout: Duration) -> Result<GcPacket, SessionError> {
        match tokio::time::timeout(timeout, &mut self.rx).await {
            Ok(Ok(result)) => result,
            // Sender dropped without a value: the table went away.
            Ok(Err(_)) => Err(SessionError::RequestCancelled(self.id)),
            Err(_) => {
                tracing::debug!(id = %self.id, "job timed out");
                Err(SessionError::RequestTimeout(self.id))
            }
        }
    }
}

impl Drop for JobWaiter {
    fn drop(&mut self) {
        self.table.pending.lock().remove(&self.id);
    }
}

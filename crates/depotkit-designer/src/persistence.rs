//! Fire-and-forget persistence.
//!
//! The editor updates its own state immediately and submits a [`PersistOp`]
//! to the queue. A [`PersistWorker`] task drains the queue in order against a
//! [`Store`]. Failures are logged and never rolled back. Every submission
//! returns a [`PendingWrite`] that a caller may await or drop.

use crate::aisle::AisleRecord;
use crate::objects::ObjectId;
use crate::store::{CargoPose, Store};
use depotkit_core::StoreError;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// A write to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOp {
    /// Create the record for local cargo `local`.
    CreateCargo {
        local: ObjectId,
        sku_id: String,
        pose: CargoPose,
    },
    UpdateCargoPosition { db_id: String, pose: CargoPose },
    DeleteCargo { db_id: String },
    ClearCargos,
    SaveAisleConfig { aisles: Vec<AisleRecord> },
}

impl fmt::Display for PersistOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateCargo { local, sku_id, .. } => write!(f, "create cargo {} ({})", local, sku_id),
            Self::UpdateCargoPosition { db_id, .. } => write!(f, "update cargo {}", db_id),
            Self::DeleteCargo { db_id } => write!(f, "delete cargo {}", db_id),
            Self::ClearCargos => write!(f, "clear cargos"),
            Self::SaveAisleConfig { aisles } => write!(f, "save {} aisle(s)", aisles.len()),
        }
    }
}

/// Successful result of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// A cargo record was created with this id.
    Created(String),
    Done,
}

/// Completion reported back to the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistEvent {
    /// `pose` is the transform the record was created with.
    CargoCreated {
        local: ObjectId,
        db_id: String,
        pose: CargoPose,
    },
    Failed { op: String, error: StoreError },
}

/// Handle to a submitted write.
#[derive(Debug)]
pub struct PendingWrite {
    reply: oneshot::Receiver<Result<PersistOutcome, StoreError>>,
}

impl PendingWrite {
    /// Waits for the backend to answer.
    pub async fn wait(self) -> Result<PersistOutcome, StoreError> {
        self.reply.await.unwrap_or(Err(StoreError::Closed))
    }
}

struct Job {
    op: PersistOp,
    reply: oneshot::Sender<Result<PersistOutcome, StoreError>>,
}

/// Submission side, owned by the editor.
#[derive(Debug)]
pub struct PersistQueue {
    jobs: mpsc::UnboundedSender<Job>,
    events: mpsc::UnboundedReceiver<PersistEvent>,
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job").field("op", &self.op).finish()
    }
}

impl PersistQueue {
    /// Creates a queue and the worker that drains it.
    pub fn new() -> (Self, PersistWorker) {
        let (jobs_tx, jobs_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        (
            Self {
                jobs: jobs_tx,
                events: events_rx,
            },
            PersistWorker {
                jobs: jobs_rx,
                events: events_tx,
            },
        )
    }

    /// Queues `op`. If the worker is gone the write resolves to
    /// [`StoreError::Closed`].
    pub fn submit(&self, op: PersistOp) -> PendingWrite {
        let (reply_tx, reply_rx) = oneshot::channel();
        tracing::debug!("Queued {}", op);
        if let Err(mpsc::error::SendError(job)) = self.jobs.send(Job { op, reply: reply_tx }) {
            tracing::warn!("Persistence worker stopped, dropping {}", job.op);
            let _ = job.reply.send(Err(StoreError::Closed));
        }
        PendingWrite { reply: reply_rx }
    }

    /// Completions received since the last call.
    pub fn drain_events(&mut self) -> Vec<PersistEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Executes queued writes in submission order.
#[derive(Debug)]
pub struct PersistWorker {
    jobs: mpsc::UnboundedReceiver<Job>,
    events: mpsc::UnboundedSender<PersistEvent>,
}

impl PersistWorker {
    /// Runs until the queue is dropped.
    pub async fn run<S: Store + ?Sized>(mut self, store: Arc<S>) {
        while let Some(job) = self.jobs.recv().await {
            let label = job.op.to_string();
            let result = execute(store.as_ref(), &job.op).await;
            match &result {
                Ok(PersistOutcome::Created(db_id)) => {
                    if let PersistOp::CreateCargo { local, pose, .. } = &job.op {
                        tracing::info!("Cargo {} saved as {}", local, db_id);
                        let _ = self.events.send(PersistEvent::CargoCreated {
                            local: *local,
                            db_id: db_id.clone(),
                            pose: *pose,
                        });
                    }
                }
                Ok(PersistOutcome::Done) => tracing::debug!("Completed {}", label),
                Err(e) => {
                    tracing::warn!("Failed to {}: {}", label, e);
                    let _ = self.events.send(PersistEvent::Failed {
                        op: label,
                        error: e.clone(),
                    });
                }
            }
            let _ = job.reply.send(result);
        }
        tracing::debug!("Persistence worker stopped");
    }

    /// Spawns the worker on the current tokio runtime.
    pub fn spawn<S: Store + ?Sized + 'static>(self, store: Arc<S>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(store))
    }
}

async fn execute<S: Store + ?Sized>(store: &S, op: &PersistOp) -> Result<PersistOutcome, StoreError> {
    match op {
        PersistOp::CreateCargo { sku_id, pose, .. } => store
            .create_cargo(sku_id, *pose)
            .await
            .map(PersistOutcome::Created),
        PersistOp::UpdateCargoPosition { db_id, pose } => store
            .update_cargo_position(db_id, *pose)
            .await
            .map(|_| PersistOutcome::Done),
        PersistOp::DeleteCargo { db_id } => store.delete_cargo(db_id).await.map(|_| PersistOutcome::Done),
        PersistOp::ClearCargos => store.clear_cargos().await.map(|_| PersistOutcome::Done),
        PersistOp::SaveAisleConfig { aisles } => store
            .save_aisle_config(aisles)
            .await
            .map(|_| PersistOutcome::Done),
    }
}

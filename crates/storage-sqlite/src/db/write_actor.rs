use super::DbPool;
use crate::errors::StorageError;
use diesel::{Connection, SqliteConnection};
use payvault_core::errors::Result;
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// Type alias for the job to be executed by the writer actor. It takes a
// mutable reference to a SqliteConnection and returns a core Result, since
// that's what callers expect.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

/// Handle for sending jobs to the writer actor.
///
/// Every job runs inside an immediate SQLite transaction on the actor's
/// dedicated connection, so a job that errors leaves nothing behind. Jobs
/// are serialized, which is exactly the atomicity guarantee the multi-row
/// ledger operations rely on.
#[derive(Clone)]
pub struct WriteHandle {
    // Sender part of the MPSC channel to send jobs. Each job is a boxed
    // closure, and a oneshot sender is used for the reply. The
    // Box<dyn Any + Send> is used for type erasure of the job's return type.
    #[allow(clippy::type_complexity)]
    tx: mpsc::Sender<(
        Job<Box<dyn Any + Send + 'static>>,
        oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>,
    )>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// # Arguments
    /// * `job`: A closure that takes a mutable reference to
    ///   `SqliteConnection` and performs database operations.
    ///
    /// # Returns
    /// A `Result<T>` containing the outcome of the job.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        // The job is wrapped to return a Box<dyn Any + Send> for type
        // erasure.
        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .expect("Writer actor's receiving channel was closed, indicating the actor stopped.");

        ret_rx
            .await
            .expect("Writer actor dropped the reply sender without sending a result.")
            .map(|boxed: Box<dyn Any + Send + 'static>| {
                *boxed
                    .downcast::<T>()
                    .unwrap_or_else(|_| panic!("Failed to downcast writer actor result."))
            })
    }
}

/// Spawns a background Tokio task that acts as a single writer to the
/// database. This actor owns one database connection from the pool and
/// processes write jobs serially.
///
/// # Arguments
/// * `pool`: The database connection pool.
///
/// # Returns
/// A `WriteHandle` to send jobs to the spawned actor.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    // Bounded channel; 1024 is an arbitrary size.
    let (tx, mut rx) = mpsc::channel::<(
        Job<Box<dyn Any + Send + 'static>>,
        oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>,
    )>(1024);

    tokio::spawn(async move {
        // This connection is held for the lifetime of the actor.
        let mut conn = pool.get().expect(
            "Failed to get a connection from the DB pool for the writer actor. \
             The pool might be exhausted or misconfigured.",
        );

        while let Some((job, reply_tx)) = rx.recv().await {
            // Execute the job within an immediate database transaction. We
            // wrap the job's error into StorageError (which implements
            // From<diesel::result::Error>) so Diesel can drive the
            // rollback, then convert back to a core error at the boundary.
            // StorageError::Core keeps domain errors (insufficient funds,
            // version conflicts) intact through the round trip.
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| {
                    job(c).map_err(StorageError::from)
                })
                .map_err(|e: StorageError| e.into());

            // Ignore error if the receiver has dropped (e.g., request timed
            // out or was cancelled).
            let _ = reply_tx.send(result);
        }
        // rx.recv() returning None means every WriteHandle was dropped, so
        // the actor can terminate.
    });

    WriteHandle { tx }
}

//! Read-only access to a Chrome `History` SQLite file.
//!
//! SQLite work happens on one dedicated thread; async callers hand it a closure
//! and await the reply, so visit lookups fanned out by ingest queue up here
//! instead of contending for the connection.

mod helpers;
mod queries;
mod schema;

use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use rusqlite::{Connection, OpenFlags};
use tokio::sync::oneshot;

use schema::verify_schema;

pub use helpers::{epoch_ms_to_webkit, webkit_to_epoch_ms};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

type ReadTask = Box<dyn FnOnce(&Connection) + Send + 'static>;

enum ReaderCommand {
    Execute(ReadTask),
    Shutdown,
}

struct ReaderInner {
    sender: mpsc::Sender<ReaderCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for ReaderInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(ReaderCommand::Shutdown) {
                log_error!("Failed to send shutdown to history reader thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                log_error!("Failed to join history reader thread: {join_err:?}");
            }
        }
    }
}

#[derive(Clone)]
pub struct ChromeHistoryDb {
    inner: Arc<ReaderInner>,
    db_path: Arc<PathBuf>,
}

impl ChromeHistoryDb {
    /// Open `db_path` read-only and check it looks like a Chrome history file.
    ///
    /// Chrome keeps its live profile database locked; point this at a copy.
    pub fn open(db_path: PathBuf) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<ReaderCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let path_for_thread = db_path.clone();

        let worker = thread::Builder::new()
            .name("histlens-history-reader".into())
            .spawn(move || {
                let conn = match Connection::open_with_flags(
                    &path_for_thread,
                    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                ) {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(Err(anyhow::Error::new(err)
                            .context("failed to open history database")));
                        return;
                    }
                };

                let init_result = verify_schema(&conn).context("unsupported history database");
                let init_failed = init_result.is_err();
                if ready_tx.send(init_result).is_err() || init_failed {
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        ReaderCommand::Execute(task) => task(&conn),
                        ReaderCommand::Shutdown => break,
                    }
                }

                log_info!("History reader thread shutting down");
            })
            .with_context(|| "failed to spawn history reader thread")?;

        ready_rx
            .recv()
            .context("history reader exited before signaling readiness")??;

        log_info!("History database opened at {}", db_path.display());

        Ok(Self {
            inner: Arc::new(ReaderInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            db_path: Arc::new(db_path),
        })
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = ReaderCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                log::debug!("history reader caller dropped before receiving result");
            }
        }));

        self.inner
            .sender
            .send(command)
            .map_err(|err| anyhow!("failed to send query to history reader: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("history reader thread terminated unexpectedly"))?
    }
}

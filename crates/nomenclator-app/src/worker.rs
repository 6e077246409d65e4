//! Background aggregation worker using a thread and channel.

use std::{
    sync::mpsc,
    thread::{self, JoinHandle},
};

use nomenclator_core::GridIndexer;
use nomenclator_engine::{
    AggregationEngine, CancelToken, ColumnSpec, EngineError, OutputRecord, Progress, RecordTable,
};
use nomenclator_street::StreetFormatter;

use crate::AppError;

/// Everything a run needs, moved into the worker thread.
#[derive(Debug)]
pub struct RunRequest {
    /// Indexer with its origin set. It is not touched again until the run ends.
    pub indexer: GridIndexer,
    /// Street formatter.
    pub formatter: StreetFormatter,
    /// Near/far sheet border.
    pub border: f64,
    /// Input table.
    pub table: RecordTable,
    /// Columns to read.
    pub columns: ColumnSpec,
}

#[derive(Debug)]
enum WorkerMessage {
    Progress(Progress),
    Finished(Result<Vec<OutputRecord>, EngineError>),
}

/// A handle for following and cancelling a run on its worker thread.
#[derive(Debug)]
pub struct RunHandle {
    receiver: mpsc::Receiver<WorkerMessage>,
    cancel: CancelToken,
    thread: JoinHandle<()>,
}

impl RunHandle {
    /// Returns a token that cancels the run.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Blocks until the run ends, calling `on_progress` whenever the
    /// percentage changes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Engine`] if the run fails and
    /// [`AppError::WorkerDisconnected`] if the worker stops without a result.
    pub fn wait(self, mut on_progress: impl FnMut(Progress)) -> Result<Vec<OutputRecord>, AppError> {
        let result = loop {
            match self.receiver.recv() {
                Ok(WorkerMessage::Progress(progress)) => on_progress(progress),
                Ok(WorkerMessage::Finished(result)) => break result.map_err(AppError::from),
                Err(mpsc::RecvError) => break Err(AppError::WorkerDisconnected),
            }
        };
        if self.thread.join().is_err() {
            log::error!("aggregation worker panicked");
        }
        result
    }
}

/// Starts a run on a new worker thread.
#[must_use]
pub fn spawn(request: RunRequest) -> RunHandle {
    let (tx, rx) = mpsc::channel();
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();

    let thread = thread::spawn(move || {
        let RunRequest {
            indexer,
            formatter,
            border,
            table,
            columns,
        } = request;
        let mut engine = AggregationEngine::new(&indexer, &formatter)
            .with_border(border)
            .with_cancel_token(worker_cancel);

        let mut last_percent = None;
        let result = engine.run_table(&table, &columns, |progress| {
            let percent = progress.percent();
            if last_percent != Some(percent) {
                last_percent = Some(percent);
                let _ = tx.send(WorkerMessage::Progress(progress));
            }
        });
        let _ = tx.send(WorkerMessage::Finished(result));
    });

    RunHandle {
        receiver: rx,
        cancel,
        thread,
    }
}

use nomenclator_core::IndexError;
use nomenclator_engine::EngineError;

/// Errors reported by the command-line host.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AppError {
    /// Reading or writing a CSV table failed.
    #[display("CSV error: {_0}")]
    #[from]
    Csv(csv::Error),
    /// A file could not be opened or written.
    #[display("I/O error: {_0}")]
    #[from]
    Io(std::io::Error),
    /// The aggregation run failed.
    #[display("{_0}")]
    #[from]
    Engine(EngineError),
    /// A single point could not be indexed.
    #[display("{_0}")]
    #[from]
    Index(IndexError),
    /// The field delimiter is not a single ASCII character.
    #[display("delimiter {delimiter:?} must be a single ASCII character")]
    InvalidDelimiter {
        /// The rejected delimiter.
        delimiter: char,
    },
    /// The worker thread stopped without reporting a result.
    #[display("background worker disconnected")]
    WorkerDisconnected,
}

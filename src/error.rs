/// Error type for the few fallible surfaces of the program.
///
/// The rendering core never fails: out-of-range draws are clipped and
/// degenerate geometry is skipped. Only terminal I/O and log setup can error.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuelError {
    #[error("terminal I/O error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("could not open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DuelError>;

use std::path::PathBuf;
use thiserror::Error;

/// Convenience result type for the loader and the playback driver.
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors that stop a run before anything is sent.
///
/// Send failures are not represented here; they are reported per attempt
/// through [`crate::playback::SubmitOutcome`] and never abort a run.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The telemetry file is missing or cannot be opened.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The telemetry file is not valid UTF-8 CSV, or a record does not
    /// match the header width.
    #[error("malformed csv in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A channel was configured with a negative start index.
    #[error("channel {channel}: start index {start} is negative")]
    StartOutOfRange { channel: u32, start: i64 },

    /// The rows a channel needs run past the end of the file.
    #[error(
        "channel {channel}: start index {start} with end bound {end} exceeds the {total} rows in the file"
    )]
    SpanOutOfRange {
        channel: u32,
        start: i64,
        end: i64,
        total: usize,
    },
}

impl FeedError {
    /// True for the range errors raised while validating channel spans.
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            FeedError::StartOutOfRange { .. } | FeedError::SpanOutOfRange { .. }
        )
    }
}

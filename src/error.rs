use thiserror::Error;

/// Failures from the HTML reducer (C1).
#[derive(Debug, Error)]
pub enum ReducerError {
    #[error("all parser passes failed for this document: {0}")]
    ParseFailed(String),

    #[error("input HTML was empty")]
    EmptyInput,
}

/// Failures surfaced by the pipeline driver (C8).
///
/// Per-document-pair failures (a bad parse, a grid-size violation) are not
/// represented here — those are logged via `tracing::warn!` and the pair is
/// skipped. `PipelineError` is reserved for conditions the driver treats as
/// fatal: malformed configuration and output I/O failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read input file {path}: {source}")]
    InputIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output file {path}: {source}")]
    OutputIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no input file given")]
    MissingInput,

    #[error("no output prefix given")]
    MissingOutputPrefix,

    #[error("malformed TSV entry: {0}")]
    MalformedEntry(String),
}

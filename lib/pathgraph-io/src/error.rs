use pathgraph_model::UnescapeError;

/// Errors raised while reading or writing the line-oriented quad format
/// ("subject predicate object [label] ."). Carries a line number so a
/// caller streaming a large file can report a useful location.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QuadIoError {
    #[error("line {line}: {message}")]
    Syntax { line: u64, message: String },
    #[error("line {line}: {source}")]
    BadEscape {
        line: u64,
        #[source]
        source: UnescapeError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

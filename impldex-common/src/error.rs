use thiserror::Error;

/// Reasons an implementor script could not be decoded
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("no trailing `//` metadata comment")]
    MissingMetadata,

    #[error("metadata comment is not valid JSON: {0}")]
    InvalidMetadata(#[source] serde_json::Error),

    #[error("script does not begin with the {expected} prologue")]
    UnexpectedPrologue { expected: &'static str },

    #[error("`start` is {declared} but the prologue ends at byte {actual}")]
    StartMismatch { declared: usize, actual: usize },

    #[error("fragment {index} ({length} bytes at offset {offset}) extends past the table")]
    FragmentOutOfBounds {
        index: usize,
        offset: usize,
        length: usize,
    },

    #[error("fragment {index} does not end on a character boundary (offset {offset})")]
    NotCharBoundary { index: usize, offset: usize },

    #[error("expected `{expected}` at byte {offset}, found {found:?}")]
    UnexpectedByte {
        offset: usize,
        expected: char,
        found: Option<char>,
    },

    #[error("fragment {index} is not a valid crate entry: {source}")]
    InvalidFragment {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("crate `{0}` appears in more than one fragment")]
    DuplicateCrate(String),

    #[error("script does not end with the {expected} epilogue")]
    UnexpectedEpilogue { expected: &'static str },
}

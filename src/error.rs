use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the sample generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A record directly nests its immediately enclosing record type.
    #[error("cannot interpret recursive schema '{0}'")]
    RecursiveSchema(String),

    #[error("cannot interpret map schema: maps have no sample value")]
    UnsupportedMap,

    #[error("enum '{0}' has no symbols")]
    EmptyEnum(String),

    #[error("union has no branches")]
    EmptyUnion,

    #[error("schema nesting exceeds the maximum depth of {0}")]
    DepthExceeded(usize),
}

/// Failures while turning JSON text into schema nodes.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("{kind} schema is missing required attribute '{attribute}'")]
    MissingAttribute {
        kind: &'static str,
        attribute: &'static str,
    },

    #[error("invalid '{attribute}' in {kind} schema: {value}")]
    InvalidAttribute {
        kind: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("invalid Avro name '{0}'")]
    InvalidName(String),

    #[error("invalid schema definition: {0}")]
    InvalidSchema(String),
}

/// A generated sample rejected by Avro schema resolution.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("schema rejected by Avro: {0}")]
    Schema(#[source] apache_avro::Error),

    #[error("sample does not conform to the schema: {0}")]
    Datum(#[source] apache_avro::Error),
}

/// Failures of the file-level driver.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("failed to encode sample: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to scan directory: {0}")]
    Glob(#[from] glob::GlobError),
}

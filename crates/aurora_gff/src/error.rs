//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

use crate::types::{FieldType, Table};

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// unsupported GFF version {0:?}
    #[error("unsupported GFF version {0:?}")]
    UnsupportedVersion(String),

    /// expected a {expected:?} file, found {found:?}
    #[error("expected a {expected:?} file, found {found:?}")]
    InvalidFileType { expected: String, found: String },

    /// unable to seek to offset {offset}
    #[error("unable to seek to offset {offset}")]
    Seek {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    /// {table} at offset {offset} needs {need} bytes, only {have} available
    #[error("{table} at offset {offset} needs {need} bytes, only {have} available")]
    UnexpectedEof {
        table: Table,
        offset: u64,
        need: u64,
        have: u64,
    },

    /// index or offset outside of its table
    #[error(transparent)]
    OutOfRange(#[from] RangeError),

    /// file contains no top level struct
    #[error("file contains no top level struct")]
    MissingTopLevel,

    /// field {label:?} is of type {found}, expected {expected}
    #[error("field {label:?} is of type {found}, expected {expected}")]
    TypeMismatch {
        label: String,
        expected: &'static str,
        found: FieldType,
    },

    /// {context}
    #[error("{context}")]
    Context {
        context: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with a description of what was being done when it happened
    pub fn context(self, context: &'static str) -> Self {
        Error::Context {
            context,
            source: Box::new(self),
        }
    }

    /// The innermost error, with all [`Error::Context`] layers stripped
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this error came from an accessor asked for the wrong type of field
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.root(), Error::TypeMismatch { .. })
    }
}

/// Error type to provide further information when a lookup falls outside of its table
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum RangeError {
    /// field index {index} out of range ({count} fields)
    #[error("field index {index} out of range ({count} fields)")]
    FieldIndex { index: u32, count: u32 },

    /// label index {index} out of range ({count} labels)
    #[error("label index {index} out of range ({count} labels)")]
    LabelIndex { index: u32, count: u32 },

    /// field indices at offset {offset} for {count} fields overrun the table ({size} bytes)
    #[error("field indices at offset {offset} for {count} fields overrun the table ({size} bytes)")]
    FieldIndices { offset: u32, count: u32, size: u32 },

    /// list indices broken: run of {count} at word {position} overruns the table ({len} words)
    #[error("list indices broken: run of {count} at word {position} overruns the table ({len} words)")]
    ListIndices { position: u32, count: u32, len: u32 },

    /// struct index {index} out of range ({count} structs)
    #[error("struct index {index} out of range ({count} structs)")]
    StructIndex { index: u32, count: u32 },

    /// struct {index} is reachable from itself
    #[error("struct {index} is reachable from itself")]
    CyclicStruct { index: u32 },

    /// byte offset {offset} does not start a list
    #[error("byte offset {offset} does not start a list")]
    ListOffset { offset: u32 },

    /// field data offset {offset} out of range ({size} bytes)
    #[error("field data offset {offset} out of range ({size} bytes)")]
    FieldData { offset: u32, size: u32 },

    /// field data at offset {offset} needs {need} bytes, only {have} available
    #[error("field data at offset {offset} needs {need} bytes, only {have} available")]
    FieldDataExtent { offset: u32, need: u64, have: u64 },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;

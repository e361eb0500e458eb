use thiserror::Error;

/// Errors returned by the external classroom API adapter.
#[derive(Debug, Clone, Error)]
pub enum ClassroomError {
    /// The credential was rejected (expired or revoked refresh token, bad code)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The credential is valid but lacks access to the resource
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// The requested course or profile does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API answered with an unexpected non-success status
    #[error("Classroom API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network or connection error
    #[error("Connection error: {0}")]
    Network(String),

    /// The API answered with a body we could not decode
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors returned by the document store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Could not reach the database
    #[error("Connection error: {0}")]
    Connection(String),

    /// A read or write was rejected by the database
    #[error("Database error: {0}")]
    Database(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::DnsResolve { .. } => {
                StoreError::Connection(err.to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// Errors raised while parsing an uploaded roster file.
#[derive(Debug, Clone, Error)]
pub enum RosterError {
    /// The header row lacks a required column
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// A data row has a blank required field
    #[error("Line {line}: missing value for {field}")]
    MissingField { line: u64, field: &'static str },

    /// The same student appears twice in one upload
    #[error("Line {line}: duplicate student id {id}")]
    DuplicateStudent { line: u64, id: String },

    /// The file contains a header but no student rows
    #[error("Roster contains no students")]
    Empty,

    /// The file is not valid CSV
    #[error("Malformed CSV: {0}")]
    Csv(String),
}

impl From<csv::Error> for RosterError {
    fn from(err: csv::Error) -> Self {
        RosterError::Csv(err.to_string())
    }
}

/// Errors raised while building a spreadsheet.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    #[error("Workbook error: {0}")]
    Workbook(String),
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Workbook(err.to_string())
    }
}

/// Errors raised when verifying an OAuth `state` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The state is not `nonce.expiry.signature`
    #[error("Malformed state")]
    Malformed,

    /// The state expired before the callback arrived
    #[error("State expired at {expired_at} (current time: {current_time})")]
    Expired { expired_at: u64, current_time: u64 },

    /// The signature does not match
    #[error("Invalid state signature")]
    InvalidSignature,
}

/// Errors surfaced by HTTP handlers.
///
/// Wraps every adapter error plus request validation failures. The HTTP
/// mapping lives next to the handlers.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request lacks a required parameter or has an unusable body
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Classroom(#[from] ClassroomError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl ApiError {
    /// Machine-readable kind reported in the `error` field of the response.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::Classroom(err) => match err {
                ClassroomError::Authentication(_) => "authentication_failed",
                ClassroomError::Forbidden(_) => "forbidden",
                ClassroomError::NotFound(_) => "not_found",
                ClassroomError::Api { .. } => "classroom_api_error",
                ClassroomError::Network(_) => "classroom_unavailable",
                ClassroomError::InvalidResponse(_) => "invalid_response",
            },
            ApiError::Store(err) => match err {
                StoreError::Connection(_) => "store_unavailable",
                StoreError::Database(_) => "store_error",
            },
            ApiError::Roster(_) => "invalid_roster",
            ApiError::Export(_) => "export_failed",
            ApiError::State(_) => "invalid_state",
        }
    }
}

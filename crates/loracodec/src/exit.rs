use std::fmt;
use std::io;

use loracodec_layout::LayoutError;
use loracodec_payload::PayloadError;
use loracodec_schema::SchemaError;

// sysexits-style exit codes.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn payload_error(context: &str, err: PayloadError) -> CliError {
    let code = match &err {
        PayloadError::Layout(LayoutError::InvalidTable { .. }) => INTERNAL,
        PayloadError::Layout(_) | PayloadError::InvalidRecord { .. } => DATA_INVALID,
        PayloadError::RecordMismatch { .. } => USAGE,
        PayloadError::Json(_) => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    let code = match &err {
        SchemaError::ValidationFailed { .. }
        | SchemaError::InvalidJson(_)
        | SchemaError::NoSchema(_) => DATA_INVALID,
        SchemaError::LoadFailed(_) | SchemaError::CompileFailed(_) => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

/// Errors that can occur during schema validation.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema file could not be loaded.
    #[error("failed to load schema: {0}")]
    LoadFailed(String),

    /// The schema could not be compiled.
    #[error("failed to compile schema: {0}")]
    CompileFailed(String),

    /// The record failed schema validation.
    #[error("validation failed on port {port}: {message}")]
    ValidationFailed { port: u8, message: String },

    /// The record is not valid JSON.
    #[error("record is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// No schema registered for the given port.
    #[error("no schema registered for port {0}")]
    NoSchema(u8),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

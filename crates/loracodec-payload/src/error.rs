use loracodec_layout::LayoutError;

/// Errors that can occur while encoding or decoding a port payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The frame does not fit the port's layout.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// A JSON record could not be read as the port's record type.
    #[error("invalid record for port {port}: {source}")]
    InvalidRecord {
        port: u8,
        #[source]
        source: serde_json::Error,
    },

    /// A record was supplied for a port that carries a different record.
    #[error("port {port} does not carry a {record} record")]
    RecordMismatch { port: u8, record: &'static str },

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PayloadError>;

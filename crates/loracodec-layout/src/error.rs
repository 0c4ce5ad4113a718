/// Errors that can occur while packing or unpacking a port layout.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// The input is shorter than the fixed layout of the port.
    #[error("truncated frame on port {port} ({actual} bytes, expected {expected})")]
    Truncated {
        port: u8,
        expected: usize,
        actual: usize,
    },

    /// The input is longer than the fixed layout and strict length checking is on.
    #[error("oversized frame on port {port} ({actual} bytes, expected {expected})")]
    Oversized {
        port: u8,
        expected: usize,
        actual: usize,
    },

    /// A field table is malformed (field out of bounds or overlapping).
    #[error("invalid field table for port {port}: {message}")]
    InvalidTable { port: u8, message: String },
}

pub type Result<T> = std::result::Result<T, LayoutError>;

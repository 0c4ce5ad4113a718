use crate::time::TimeZoneMode;

/// Controls decoding behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeConfig {
    /// When true, frames longer than the port layout are rejected instead of
    /// having their trailing bytes ignored.
    pub strict_length: bool,
    /// Zone used to render fix timestamps. Default: UTC.
    pub time_zone: TimeZoneMode,
}

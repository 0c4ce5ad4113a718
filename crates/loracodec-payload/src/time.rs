use chrono::{DateTime, Local, TimeZone, Utc};

/// en-US `toLocaleString` shape, e.g. `1/15/2024, 3:04:05 PM`.
const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Zone used when rendering fix timestamps for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeZoneMode {
    #[default]
    Utc,
    Local,
}

/// Render UNIX seconds for display.
pub fn render_timestamp(secs: u32, zone: TimeZoneMode) -> String {
    let secs = i64::from(secs);
    let rendered = match zone {
        TimeZoneMode::Utc => DateTime::<Utc>::from_timestamp(secs, 0)
            .map(|dt| dt.format(DISPLAY_FORMAT).to_string()),
        TimeZoneMode::Local => Local
            .timestamp_opt(secs, 0)
            .single()
            .map(|dt| dt.format(DISPLAY_FORMAT).to_string()),
    };
    rendered.unwrap_or_else(|| "Invalid Date".to_string())
}

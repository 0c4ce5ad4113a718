use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use loracodec_layout::port::{is_downlink, is_uplink};
use loracodec_layout::{port_name, FieldKind, Layout};
use loracodec_payload::{LocationHistory, Uplink};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    port: u8,
    port_name: &'a str,
    size: usize,
    hex: String,
}

#[derive(Serialize)]
struct FieldOutput {
    name: &'static str,
    offset: usize,
    width: usize,
    kind: String,
}

#[derive(Serialize)]
pub struct PortOutput {
    port: u8,
    name: &'static str,
    direction: &'static str,
    size: usize,
    entries: usize,
    fields: Vec<FieldOutput>,
}

impl PortOutput {
    pub fn from_layout(layout: &Layout) -> Self {
        Self {
            port: layout.port,
            name: layout.name,
            direction: direction(layout.port),
            size: layout.wire_size(),
            entries: layout.repeat,
            fields: layout
                .fields
                .iter()
                .map(|field| FieldOutput {
                    name: field.name,
                    offset: field.offset,
                    width: field.width(),
                    kind: kind_label(field.kind),
                })
                .collect(),
        }
    }
}

/// Print an encoded downlink.
pub fn print_payload(port: u8, payload: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                port,
                port_name: port_name(port),
                size: payload.len(),
                hex: hex::encode(payload),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "SIZE", "PAYLOAD"])
                .add_row(vec![
                    format!("{port} ({})", port_name(port)),
                    payload.len().to_string(),
                    hex::encode(payload),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", hex::encode(payload)),
        OutputFormat::Raw => print_raw(payload),
    }
}

/// Print a decoded uplink record.
pub fn print_uplink(port: u8, uplink: &Uplink, format: OutputFormat) {
    let value = serde_json::to_value(uplink).unwrap_or(Value::Null);
    match format {
        OutputFormat::Json => println!("{value}"),
        OutputFormat::Pretty => println!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Raw => print_raw(value.to_string().as_bytes()),
        OutputFormat::Table => match uplink {
            Uplink::LocationHistory(history) => println!("{}", history_table(history)),
            Uplink::Empty {} => println!("port {port} ({}) carries no uplink record", port_name(port)),
            _ => {
                let mut rows = Vec::new();
                flatten("", &value, &mut rows);

                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["FIELD", "VALUE"]);
                for (field, value) in rows {
                    table.add_row(vec![field, value]);
                }
                println!("{table}");
            }
        },
    }
}

/// Print the port catalogue, or the field table of one port.
pub fn print_ports(ports: &[PortOutput], detailed: bool, format: OutputFormat) {
    match format {
        OutputFormat::Json | OutputFormat::Raw => println!(
            "{}",
            serde_json::to_string(ports).unwrap_or_else(|_| "[]".to_string())
        ),
        OutputFormat::Pretty => println!(
            "{}",
            serde_json::to_string_pretty(ports).unwrap_or_else(|_| "[]".to_string())
        ),
        OutputFormat::Table if detailed => {
            for port in ports {
                println!("{} ({}, {} bytes)", port.name, port.direction, port.size);
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["FIELD", "OFFSET", "WIDTH", "KIND"]);
                for field in &port.fields {
                    table.add_row(vec![
                        field.name.to_string(),
                        field.offset.to_string(),
                        field.width.to_string(),
                        field.kind.clone(),
                    ]);
                }
                println!("{table}");
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "NAME", "DIRECTION", "SIZE", "FIELDS"]);
            for port in ports {
                table.add_row(vec![
                    port.port.to_string(),
                    port.name.to_string(),
                    port.direction.to_string(),
                    port.size.to_string(),
                    port.fields.len().to_string(),
                ]);
            }
            println!("{table}");
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn direction(port: u8) -> &'static str {
    match (is_uplink(port), is_downlink(port)) {
        (true, true) => "both",
        (true, false) => "uplink",
        (false, true) => "downlink",
        (false, false) => "none",
    }
}

fn kind_label(kind: FieldKind) -> String {
    match kind {
        FieldKind::U8 => "u8".to_string(),
        FieldKind::U16Le => "u16 le".to_string(),
        FieldKind::U24Be => "u24 be".to_string(),
        FieldKind::U32Le => "u32 le".to_string(),
        FieldKind::Millivolts => "millivolts".to_string(),
        FieldKind::Bits { shift, mask } if mask == 1 => format!("bit {shift}"),
        FieldKind::Bits { shift, mask } => {
            let top = u32::from(shift) + mask.count_ones() - 1;
            format!("bits {shift}..={top}")
        }
    }
}

fn history_table(history: &LocationHistory) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "LAT", "LON", "TIME", "DECODED"]);
    for (index, location) in history.locations.iter().enumerate() {
        table.add_row(vec![
            index.to_string(),
            location.lat.to_string(),
            location.lon.to_string(),
            location.time.to_string(),
            location.time_decoded.clone(),
        ]);
    }
    table
}

/// Flatten nested objects into `parent.child` rows.
fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&name, child, rows);
            }
        }
        Value::String(text) => rows.push((prefix.to_string(), text.clone())),
        other => rows.push((prefix.to_string(), other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flatten_nests_with_dots() {
        let mut rows = Vec::new();
        flatten(
            "",
            &json!({"battery": 3700, "errors": {"gps": true}, "when": "1/1/1970"}),
            &mut rows,
        );
        assert!(rows.contains(&("battery".to_string(), "3700".to_string())));
        assert!(rows.contains(&("errors.gps".to_string(), "true".to_string())));
        assert!(rows.contains(&("when".to_string(), "1/1/1970".to_string())));
    }

    #[test]
    fn kind_labels() {
        assert_eq!(kind_label(FieldKind::Bits { shift: 7, mask: 1 }), "bit 7");
        assert_eq!(kind_label(FieldKind::Bits { shift: 3, mask: 0x1F }), "bits 3..=7");
        assert_eq!(kind_label(FieldKind::U24Be), "u24 be");
    }

    #[test]
    fn port_directions() {
        assert_eq!(direction(3), "both");
        assert_eq!(direction(12), "uplink");
        assert_eq!(direction(99), "downlink");
        assert_eq!(direction(42), "none");
    }
}

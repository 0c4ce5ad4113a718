use clap::{Args, Subcommand};
use std::path::PathBuf;

use loracodec_layout::port::port_from_name;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod ports;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a JSON record into a downlink payload.
    Encode(EncodeArgs),
    /// Decode an uplink payload into its JSON record.
    Decode(DecodeArgs),
    /// List known ports and their field tables.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Port number or name (settings, spectrum_scan, command).
    #[arg(long, short = 'p', value_parser = parse_port)]
    pub port: u8,
    /// JSON record.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub json: Option<String>,
    /// Read the JSON record from file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
    /// Schema directory replacing the built-in downlink schemas.
    #[arg(long, value_name = "DIR", env = "LORACODEC_SCHEMA_DIR")]
    pub schemas: Option<PathBuf>,
    /// Reject properties the schema does not list.
    #[arg(long, conflicts_with = "no_validate")]
    pub strict_schema: bool,
    /// Refuse ports that have no schema instead of passing them through.
    #[arg(long, conflicts_with = "no_validate")]
    pub require_schema: bool,
    /// Skip schema validation.
    #[arg(long)]
    pub no_validate: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Port number or name (position, settings, location_history, status).
    #[arg(long, short = 'p', value_parser = parse_port)]
    pub port: u8,
    /// Payload as hex (whitespace and a leading 0x are ignored).
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub hex: Option<String>,
    /// Read the raw payload bytes from file.
    #[arg(long, conflicts_with = "hex")]
    pub file: Option<PathBuf>,
    /// Reject payloads longer than the port's layout.
    #[arg(long)]
    pub strict: bool,
    /// Render timestamps in the local time zone instead of UTC.
    #[arg(long)]
    pub local_time: bool,
}

#[derive(Args, Debug)]
pub struct PortsArgs {
    /// Show the field table of a single port.
    #[arg(long, short = 'p', value_parser = parse_port)]
    pub port: Option<u8>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Accept a port number or a port name.
fn parse_port(input: &str) -> Result<u8, String> {
    if let Ok(port) = input.parse::<u8>() {
        return Ok(port);
    }
    port_from_name(input).ok_or_else(|| format!("unknown port: {input}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_by_number_or_name() {
        assert_eq!(parse_port("3"), Ok(3));
        assert_eq!(parse_port("42"), Ok(42));
        assert_eq!(parse_port("status"), Ok(12));
        assert_eq!(parse_port("SPECTRUM_SCAN"), Ok(30));
        assert!(parse_port("256").is_err());
        assert!(parse_port("nope").is_err());
    }
}

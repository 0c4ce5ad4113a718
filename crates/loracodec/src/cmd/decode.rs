use std::fs;

use loracodec_layout::port_name;
use loracodec_payload::{decode_with_config, DecodeConfig, TimeZoneMode};
use tracing::info;

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, payload_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_uplink, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    let config = DecodeConfig {
        strict_length: args.strict,
        time_zone: if args.local_time {
            TimeZoneMode::Local
        } else {
            TimeZoneMode::Utc
        },
    };

    let uplink = decode_with_config(args.port, &payload, &config)
        .map_err(|err| payload_error("decode failed", err))?;
    info!(
        port = args.port,
        port_name = port_name(args.port),
        size = payload.len(),
        "decoded uplink"
    );

    print_uplink(args.port, &uplink, format);
    Ok(SUCCESS)
}

fn resolve_payload(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(text) = &args.hex {
        return parse_hex(text);
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Err(CliError::new(USAGE, "one of --hex or --file is required"))
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let compact: String = digits.chars().filter(|c| !c.is_whitespace()).collect();

    hex::decode(&compact).map_err(|err| CliError::new(USAGE, format!("--hex is not valid hex: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_accepts_prefix_and_spaces() {
        assert_eq!(parse_hex("0xAB de").unwrap(), vec![0xAB, 0xDE]);
        assert_eq!(parse_hex(" 0102 ").unwrap(), vec![1, 2]);
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn parse_hex_rejects_bad_input() {
        assert_eq!(parse_hex("abc").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("zz").unwrap_err().code, USAGE);
    }
}

use std::fs;

use loracodec_layout::port_name;
use loracodec_payload::encode_value;
use loracodec_schema::{RegistryConfig, SchemaRegistry};
use serde_json::Value;
use tracing::{debug, info};

use crate::cmd::EncodeArgs;
use crate::exit::{io_error, payload_error, schema_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_payload, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let record = resolve_record(&args)?;

    if args.no_validate {
        debug!(port = args.port, "schema validation skipped");
    } else {
        let registry = load_registry(&args)?;
        registry
            .validate(args.port, &record)
            .map_err(|err| schema_error("schema check failed", err))?;
    }

    let payload = encode_value(args.port, &record)
        .map_err(|err| payload_error("encode failed", err))?;
    info!(
        port = args.port,
        port_name = port_name(args.port),
        size = payload.len(),
        "encoded downlink"
    );

    print_payload(args.port, &payload, format);
    Ok(SUCCESS)
}

fn resolve_record(args: &EncodeArgs) -> CliResult<Value> {
    let (text, source) = match (&args.json, &args.file) {
        (Some(json), _) => (json.clone(), "--json".to_string()),
        (None, Some(path)) => {
            let text = fs::read_to_string(path)
                .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
            (text, path.display().to_string())
        }
        (None, None) => return Err(CliError::new(USAGE, "one of --json or --file is required")),
    };

    serde_json::from_str(&text)
        .map_err(|err| CliError::new(USAGE, format!("{source} is not valid JSON: {err}")))
}

fn load_registry(args: &EncodeArgs) -> CliResult<SchemaRegistry> {
    let config = RegistryConfig {
        strict_mode: args.strict_schema,
        fail_on_missing_schema: args.require_schema,
        ..RegistryConfig::default()
    };

    match &args.schemas {
        Some(dir) => {
            debug!(dir = %dir.display(), "loading schemas");
            SchemaRegistry::from_directory_with_config(dir, config)
                .map_err(|err| schema_error("failed loading schemas", err))
        }
        None => SchemaRegistry::builtin_with_config(config)
            .map_err(|err| schema_error("failed loading built-in schemas", err)),
    }
}

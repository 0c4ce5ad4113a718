use loracodec_payload::{layout_for, layouts};

use crate::cmd::PortsArgs;
use crate::exit::{CliError, CliResult, INTERNAL, SUCCESS, USAGE};
use crate::output::{print_ports, OutputFormat, PortOutput};

pub fn run(args: PortsArgs, format: OutputFormat) -> CliResult<i32> {
    let selected = match args.port {
        Some(port) => vec![layout_for(port)
            .ok_or_else(|| CliError::new(USAGE, format!("port {port} has no layout")))?],
        None => layouts().to_vec(),
    };

    let mut ports = Vec::with_capacity(selected.len());
    for layout in selected {
        layout
            .validate()
            .map_err(|err| CliError::new(INTERNAL, format!("broken field table: {err}")))?;
        ports.push(PortOutput::from_layout(layout));
    }

    print_ports(&ports, args.port.is_some(), format);
    Ok(SUCCESS)
}

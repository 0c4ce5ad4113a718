//! Device command, port 99 (downlink only).

use bytes::Bytes;
use loracodec_layout::{Field, FieldKind, Layout, LayoutWriter, COMMAND};
use serde::{Deserialize, Serialize};

use crate::flag;

const CODE: Field = Field::new("command", 0, FieldKind::U8);

/// Wire layout of a command. Empty on the wire when no command is selected.
pub const LAYOUT: Layout = Layout::new(COMMAND, "COMMAND", 1, &[CODE]);

/// The commands a tracker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Reset,
    LoraRejoin,
    SendSettings,
}

impl CommandKind {
    /// The byte sent for this command.
    pub const fn sentinel(self) -> u8 {
        match self {
            CommandKind::Reset => 0xAB,
            CommandKind::LoraRejoin => 0xDE,
            CommandKind::SendSettings => 0xAA,
        }
    }
}

/// Command selector flags. At most one is meant to be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandFlags {
    #[serde(default, with = "flag")]
    pub reset: bool,
    #[serde(default, with = "flag")]
    pub lora_rejoin: bool,
    #[serde(default, with = "flag")]
    pub send_settings: bool,
}

/// `{ "command": { "reset": true } }`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCommand {
    pub command: CommandFlags,
}

impl DeviceCommand {
    pub fn new(kind: CommandKind) -> Self {
        let mut command = CommandFlags::default();
        match kind {
            CommandKind::Reset => command.reset = true,
            CommandKind::LoraRejoin => command.lora_rejoin = true,
            CommandKind::SendSettings => command.send_settings = true,
        }
        Self { command }
    }

    /// The selected command. When several flags are set the first of
    /// reset, rejoin, send-settings wins.
    pub fn selected(&self) -> Option<CommandKind> {
        if self.command.reset {
            Some(CommandKind::Reset)
        } else if self.command.lora_rejoin {
            Some(CommandKind::LoraRejoin)
        } else if self.command.send_settings {
            Some(CommandKind::SendSettings)
        } else {
            None
        }
    }

    /// One sentinel byte, or an empty payload when nothing is selected.
    pub fn encode(&self) -> Bytes {
        match self.selected() {
            Some(kind) => {
                let mut writer = LayoutWriter::new(&LAYOUT);
                writer.put(&CODE, kind.sentinel().into());
                writer.finish()
            }
            None => Bytes::new(),
        }
    }
}

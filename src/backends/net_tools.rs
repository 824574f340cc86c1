// net-tools backend for hosts without iproute2 (ifconfig + route only)

use crate::backends::command::{ToolCommand, tool_available};
use crate::backends::{BackendPriority, NetToolsBackend};
use anyhow::Result;

#[derive(Debug, Default)]
pub struct NetToolsOnlyBackend;

impl NetToolsOnlyBackend {
    pub fn new() -> Self {
        Self
    }
}

impl NetToolsBackend for NetToolsOnlyBackend {
    fn name(&self) -> &'static str {
        "net-tools"
    }

    fn priority(&self) -> BackendPriority {
        BackendPriority::Fallback
    }

    fn is_available() -> bool {
        tool_available("ifconfig", "-a")
    }

    // net-tools has no modern route form; detection goes straight to `route -n`
    fn default_route(&self) -> Result<String> {
        Ok(String::new())
    }

    fn link_down_command(&self, interface: &str) -> ToolCommand {
        ToolCommand::new("ifconfig", &[interface, "down"])
    }
}

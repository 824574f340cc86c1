// iproute2 backend: `ip route` for the default route, `ip link` to bring links down

use crate::backends::command::{ToolCommand, run_capture, tool_available};
use crate::backends::{BackendPriority, NetToolsBackend};
use anyhow::Result;

#[derive(Debug, Default)]
pub struct Iproute2Backend;

impl Iproute2Backend {
    pub fn new() -> Self {
        Self
    }
}

impl NetToolsBackend for Iproute2Backend {
    fn name(&self) -> &'static str {
        "iproute2"
    }

    fn priority(&self) -> BackendPriority {
        BackendPriority::Best
    }

    fn is_available() -> bool {
        tool_available("ip", "-V")
    }

    fn default_route(&self) -> Result<String> {
        run_capture("ip", &["-4", "route", "show", "default"])
    }

    fn link_down_command(&self, interface: &str) -> ToolCommand {
        ToolCommand::new("ip", &["link", "set", "dev", interface, "down"])
    }
}

// In-memory backend for tests: canned tool output, recorded link-down calls

use crate::backends::command::ToolCommand;
use crate::backends::{BackendPriority, NetToolsBackend};
use anyhow::{Result, anyhow};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct FakeBackend {
    /// `None` simulates a tool that cannot be spawned
    pub dump: Option<String>,
    pub route: Option<String>,
    pub legacy_routes: Option<String>,
    /// Interfaces whose link-down attempt should fail
    pub failing: HashSet<String>,
    /// Every interface a link-down was attempted on, in order
    pub attempted: Vec<String>,
    /// Shared event log, so tests can interleave backend calls with their own events
    pub journal: Option<Rc<RefCell<Vec<String>>>>,
}

impl FakeBackend {
    pub fn new(dump: &str, route: &str, legacy_routes: &str) -> Self {
        Self {
            dump: Some(dump.to_string()),
            route: Some(route.to_string()),
            legacy_routes: Some(legacy_routes.to_string()),
            ..Default::default()
        }
    }

    pub fn with_journal(mut self, journal: Rc<RefCell<Vec<String>>>) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn failing_on(mut self, interface: &str) -> Self {
        self.failing.insert(interface.to_string());
        self
    }
}

fn canned(output: &Option<String>, tool: &str) -> Result<String> {
    output
        .clone()
        .ok_or_else(|| anyhow!("Failed to execute `{}`: not found", tool))
}

impl NetToolsBackend for FakeBackend {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn priority(&self) -> BackendPriority {
        BackendPriority::Fallback
    }

    fn is_available() -> bool {
        true
    }

    fn interface_dump(&self) -> Result<String> {
        canned(&self.dump, "ifconfig -a")
    }

    fn default_route(&self) -> Result<String> {
        canned(&self.route, "ip -4 route show default")
    }

    fn legacy_route_table(&self) -> Result<String> {
        canned(&self.legacy_routes, "route -n")
    }

    fn link_down_command(&self, interface: &str) -> ToolCommand {
        ToolCommand::new("ip", &["link", "set", "dev", interface, "down"])
    }

    fn set_link_down(&mut self, interface: &str) -> Result<()> {
        self.attempted.push(interface.to_string());
        if let Some(journal) = &self.journal {
            journal.borrow_mut().push(format!("down {}", interface));
        }
        if self.failing.contains(interface) {
            return Err(anyhow!(
                "`{}` exited with exit status: 2: RTNETLINK answers: Operation not permitted",
                self.link_down_command(interface)
            ));
        }
        Ok(())
    }
}

// Bring selected interfaces down, or only report what would be run

use serde::Serialize;

use crate::backends::NetToolsBackend;

/// Result of acting on one interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActuationOutcome {
    /// Simulation mode: nothing was run
    Simulated { interface: String, command: String },
    Disabled { interface: String, command: String },
    Failed {
        interface: String,
        command: String,
        reason: String,
    },
}

impl ActuationOutcome {
    pub fn interface(&self) -> &str {
        match self {
            ActuationOutcome::Simulated { interface, .. }
            | ActuationOutcome::Disabled { interface, .. }
            | ActuationOutcome::Failed { interface, .. } => interface,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ActuationOutcome::Failed { .. })
    }
}

pub struct Actuator<'a> {
    backend: &'a mut dyn NetToolsBackend,
    simulate: bool,
    privileged: bool,
}

impl<'a> Actuator<'a> {
    /// `privileged` is the effective-root flag read once at startup
    pub fn new(backend: &'a mut dyn NetToolsBackend, simulate: bool, privileged: bool) -> Self {
        Self {
            backend,
            simulate,
            privileged,
        }
    }

    /// Bring one interface down (single attempt) or simulate doing so
    pub fn disable(&mut self, interface: &str) -> ActuationOutcome {
        let command = self.backend.link_down_command(interface).to_string();

        if self.simulate {
            log::info!("[simulate] would run: {}", command);
            return ActuationOutcome::Simulated {
                interface: interface.to_string(),
                command,
            };
        }

        match self.backend.set_link_down(interface) {
            Ok(()) => {
                log::info!("Disabled {}", interface);
                ActuationOutcome::Disabled {
                    interface: interface.to_string(),
                    command,
                }
            }
            Err(e) => {
                let mut reason = format!("{e:#}");
                if !self.privileged {
                    reason.push_str(" (not running as root)");
                }
                log::error!("Failed to disable {}: {}", interface, reason);
                ActuationOutcome::Failed {
                    interface: interface.to_string(),
                    command,
                    reason,
                }
            }
        }
    }

    /// Act on every interface in order; a failure never stops the rest.
    ///
    /// `on_outcome` sees each outcome right after its interface is handled,
    /// before the next one is touched.
    pub fn disable_all<'n>(
        &mut self,
        interfaces: impl IntoIterator<Item = &'n str>,
        on_outcome: &mut dyn FnMut(&ActuationOutcome),
    ) -> Vec<ActuationOutcome> {
        interfaces
            .into_iter()
            .map(|interface| {
                let outcome = self.disable(interface);
                on_outcome(&outcome);
                outcome
            })
            .collect()
    }
}

// One run: read interfaces, detect default route, classify, act

use anyhow::Result;
use serde::Serialize;

use crate::actuator::{ActuationOutcome, Actuator};
use crate::backends::NetToolsBackend;
use crate::classifier::{Candidate, classify};
use crate::exclusion::ExclusionSet;
use crate::interfaces::{InterfaceTable, read_interfaces};
use crate::route::{DefaultRoute, detect_default_route};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub simulate: bool,
    /// Effective root, read once at startup
    pub privileged: bool,
    /// Comma-separated user exclusions (CLI and config merged)
    pub exclude: String,
    pub loopback: String,
}

/// What a run found and decided, before anything is acted on
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub default_route: Option<DefaultRoute>,
    pub exclusions: ExclusionSet,
    pub interfaces: InterfaceTable,
    pub selected: Vec<Candidate>,
}

/// Everything one run found and did
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub timestamp: String,
    pub backend: &'static str,
    pub simulate: bool,
    pub privileged: bool,
    #[serde(flatten)]
    pub plan: Plan,
    pub outcomes: Vec<ActuationOutcome>,
}

impl RunReport {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }
}

/// Read interfaces and the default route, then classify. Only a missing
/// interface dump is an error.
pub fn plan(backend: &dyn NetToolsBackend, options: &RunOptions) -> Result<Plan> {
    let interfaces = read_interfaces(backend)?;
    let default_route = detect_default_route(backend);

    if let Some(route) = &default_route {
        if interfaces.get(&route.interface).is_none() {
            log::warn!(
                "Default route interface {} is missing from the interface dump",
                route.interface
            );
        }
    }

    let exclusions = ExclusionSet::build(
        &options.loopback,
        &options.exclude,
        default_route.as_ref().map(|r| r.interface.as_str()),
    );
    log::info!(
        "Excluding: {}",
        exclusions.iter().collect::<Vec<_>>().join(", ")
    );

    let selected = classify(&interfaces, &exclusions);
    if selected.is_empty() {
        log::info!("No unused interfaces");
    }

    Ok(Plan {
        default_route,
        exclusions,
        interfaces,
        selected,
    })
}

/// Act on every selected interface, handing each outcome to `on_outcome`
/// as soon as it is known.
pub fn act(
    backend: &mut dyn NetToolsBackend,
    plan: Plan,
    options: &RunOptions,
    on_outcome: &mut dyn FnMut(&ActuationOutcome),
) -> RunReport {
    let backend_name = backend.name();
    let outcomes = Actuator::new(backend, options.simulate, options.privileged)
        .disable_all(plan.selected.iter().map(|c| c.name.as_str()), on_outcome);

    RunReport {
        timestamp: chrono::Local::now().to_rfc3339(),
        backend: backend_name,
        simulate: options.simulate,
        privileged: options.privileged,
        plan,
        outcomes,
    }
}

/// Plan and act in one go, without observing outcomes as they happen
#[cfg(test)]
pub fn run(backend: &mut dyn NetToolsBackend, options: &RunOptions) -> Result<RunReport> {
    let plan = plan(backend, options)?;
    Ok(act(backend, plan, options, &mut |_| {}))
}

// Tool backend trait definitions and selection

pub mod command;

#[cfg(feature = "backend-iproute2")]
pub mod iproute2;

#[cfg(feature = "backend-net-tools")]
pub mod net_tools;

#[cfg(test)]
pub mod fake;

use anyhow::Result;
use serde::Serialize;

pub use command::ToolCommand;

/// Backend priority ranking (higher = better)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum BackendPriority {
    Fallback = 1, // net-tools only, no modern route form
    Best = 2,     // iproute2 for routes and link state
}

/// External command-line tools the pipeline reads from and acts through
///
/// Query methods return the raw stdout of the underlying command. An empty
/// string means the command ran but printed nothing; `Err` means it could not
/// be run at all. Callers treat both as "no output".
pub trait NetToolsBackend {
    /// Backend name (e.g., "iproute2", "net-tools")
    fn name(&self) -> &'static str;

    /// Backend priority for auto-selection
    fn priority(&self) -> BackendPriority;

    /// Check if this backend's tools are installed on the current system
    fn is_available() -> bool
    where
        Self: Sized;

    /// Full textual dump of every interface (`ifconfig -a` format)
    fn interface_dump(&self) -> Result<String> {
        command::run_capture("ifconfig", &["-a"])
    }

    /// Default IPv4 route in modern form (`default via <gw> dev <iface> ...`)
    fn default_route(&self) -> Result<String>;

    /// Legacy tabular routing table (`route -n`)
    fn legacy_route_table(&self) -> Result<String> {
        command::run_capture("route", &["-n"])
    }

    /// The command that brings `interface` administratively down
    fn link_down_command(&self, interface: &str) -> ToolCommand;

    /// Bring `interface` down. Single attempt, no retries.
    fn set_link_down(&mut self, interface: &str) -> Result<()> {
        self.link_down_command(interface).run()
    }
}

/// Backend metadata for selection
#[derive(Debug, Clone)]
pub struct BackendInfo {
    pub name: &'static str,
    pub priority: BackendPriority,
    pub available: bool,
}

/// Detect all compiled-in backends and whether their tools are installed
pub fn detect_backends() -> Vec<BackendInfo> {
    let mut backends = Vec::new();

    #[cfg(feature = "backend-iproute2")]
    {
        backends.push(BackendInfo {
            name: "iproute2",
            priority: BackendPriority::Best,
            available: iproute2::Iproute2Backend::is_available(),
        });
    }

    #[cfg(feature = "backend-net-tools")]
    {
        backends.push(BackendInfo {
            name: "net-tools",
            priority: BackendPriority::Fallback,
            available: net_tools::NetToolsOnlyBackend::is_available(),
        });
    }

    backends
}

/// Pick a backend: the preferred one if named, otherwise the best available.
///
/// When nothing is available the highest-priority backend is still returned,
/// so the run reaches the interface query and reports the missing data there.
pub fn select_backend(preference: Option<&str>) -> Result<Box<dyn NetToolsBackend>> {
    if let Some(name) = preference {
        log::info!("Using preferred backend: {}", name);
        return create_backend(name);
    }

    let available = detect_backends();

    log::debug!("Available backends:");
    for backend in &available {
        log::debug!(
            "  {} - priority: {:?}, available: {}",
            backend.name,
            backend.priority,
            backend.available
        );
    }

    if let Some(info) = available
        .iter()
        .filter(|b| b.available)
        .max_by_key(|b| b.priority)
    {
        log::info!("Auto-selected backend: {}", info.name);
        return create_backend(info.name);
    }

    let fallback = available
        .iter()
        .max_by_key(|b| b.priority)
        .ok_or_else(|| anyhow::anyhow!("No tool backend compiled in"))?;
    log::warn!(
        "No backend reports its tools as installed, trying {} anyway",
        fallback.name
    );
    create_backend(fallback.name)
}

/// Create a backend by name
pub fn create_backend(name: &str) -> Result<Box<dyn NetToolsBackend>> {
    log::debug!("Creating backend {name}");
    match name {
        #[cfg(feature = "backend-iproute2")]
        "iproute2" | "ip" => Ok(Box::new(iproute2::Iproute2Backend::new())),

        #[cfg(feature = "backend-net-tools")]
        "net-tools" | "ifconfig" => Ok(Box::new(net_tools::NetToolsOnlyBackend::new())),

        _ => Err(anyhow::anyhow!("Unknown backend: {}", name)),
    }
}

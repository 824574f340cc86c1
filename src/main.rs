mod actuator;
mod backends;
mod classifier;
mod config;
mod exclusion;
mod interfaces;
mod pipeline;
mod report;
mod route;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::backends::{detect_backends, select_backend};
use crate::config::Config;
use crate::interfaces::DataUnavailable;
use crate::pipeline::RunOptions;

/// IfReaper - bring down network interfaces that are not in use
#[derive(Parser, Debug)]
#[command(name = "ifreaper")]
#[command(version)]
#[command(about = "Find unused network interfaces and bring them down", long_about = None)]
struct Args {
    /// Only report what would be done; change nothing
    #[arg(short = 'n', long, visible_alias = "dry-run")]
    simulate: bool,

    /// Comma-separated interfaces never to disable (e.g. "wg0,docker0")
    #[arg(short, long, value_name = "LIST")]
    exclude: Option<String>,

    /// Tool backend to use (iproute2, net-tools)
    #[arg(long, value_name = "BACKEND")]
    backend: Option<String>,

    /// List all available backends and exit
    #[arg(long)]
    list_backends: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Config file (default: ~/.config/ifreaper/config.json)
    #[arg(long, value_name = "PATH", conflicts_with = "no_config")]
    config: Option<PathBuf>,

    /// Ignore any config file
    #[arg(long)]
    no_config: bool,
}

fn print_available_backends() {
    println!("IfReaper v{} - Available Backends\n", env!("CARGO_PKG_VERSION"));

    let backends = detect_backends();
    if backends.is_empty() {
        println!("  (none compiled in)");
    }
    for backend in backends {
        let status = if backend.available {
            "✅ available"
        } else {
            "❌ unavailable"
        };
        println!(
            "  {:12} [priority: {:?}] {}",
            backend.name, backend.priority, status
        );
    }
}

/// Effective UID is root
#[cfg(unix)]
fn is_privileged() -> bool {
    nix::unistd::Uid::effective().is_root()
}

#[cfg(not(unix))]
fn is_privileged() -> bool {
    false
}

fn main() -> Result<()> {
    let args = Args::parse();

    if std::env::var("RUST_LOG").is_ok() {
        pretty_env_logger::formatted_builder()
            .parse_default_env()
            .init();
    }

    if args.list_backends {
        print_available_backends();
        return Ok(());
    }

    let config = if args.no_config {
        Config::default()
    } else {
        Config::load(args.config.as_deref())?
    };

    // Read once; the actuator gets it passed in
    let privileged = is_privileged();
    if !args.simulate && !privileged {
        log::warn!("Not running as root, disabling interfaces will likely fail");
        eprintln!("⚠️  Warning: not running as root - interface deactivation will likely fail.");
        eprintln!("    Re-run with sudo, or use --simulate to only preview.");
    }

    let preference = args.backend.as_deref().or(config.backend.as_deref());
    let mut backend = select_backend(preference)?;
    log::info!(
        "Using {} backend (priority: {:?})",
        backend.name(),
        backend.priority()
    );

    let options = RunOptions {
        simulate: args.simulate,
        privileged,
        exclude: config.merged_exclusions(args.exclude.as_deref()),
        loopback: config.loopback.clone(),
    };

    let plan = match pipeline::plan(backend.as_ref(), &options) {
        Ok(plan) => plan,
        Err(err) => {
            if let Some(unavailable) = err.downcast_ref::<DataUnavailable>() {
                log::error!("{}", unavailable);
                eprintln!("❌ Error: {}", unavailable);
                eprintln!("    Is `ifconfig` (net-tools) installed?");
                return Ok(());
            }
            return Err(err);
        }
    };

    if args.json {
        let report = pipeline::act(backend.as_mut(), plan, &options, &mut |_| {});
        println!("{}", report::to_json(&report)?);
        return Ok(());
    }

    // Outcome lines go out as each interface is handled, not after the run
    print!("{}", report::render_plan(&plan, options.simulate, backend.name()));
    let report = pipeline::act(backend.as_mut(), plan, &options, &mut |outcome| {
        println!("{}", report::outcome_line(outcome));
    });
    print!("{}", report::render_summary(&report));

    Ok(())
}

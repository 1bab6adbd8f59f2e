//! Camera Protection CLI
//!
//! Replays a script of camera availability events against a protection
//! config and prints every show/hide decision.

use camera_protection::{
    camera::{CameraEvent, MockCameraService},
    config::{FileConfig, ProtectionRegion},
    metrics::MetricsRegistry,
    protection::{ProtectionController, ProtectionListener},
};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "camera-protection", version, about = "Replay camera events against a cutout protection config")]
struct Args {
    /// Protection config file (TOML).
    #[arg(short, long)]
    config: PathBuf,

    /// Event script with `[[event]]` entries (TOML).
    #[arg(short, long)]
    events: PathBuf,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long)]
    verbose: bool,

    /// Print Prometheus metrics after the replay.
    #[arg(long)]
    print_metrics: bool,
}

#[derive(Debug, Deserialize)]
struct EventScript {
    #[serde(default, rename = "event")]
    events: Vec<CameraEvent>,
}

impl EventScript {
    fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        toml::from_str(&content).map_err(|e| e.to_string())
    }
}

/// Prints each decision to stdout.
struct PrintListener;

impl ProtectionListener<ProtectionRegion> for PrintListener {
    fn on_apply_protection(&self, region: &ProtectionRegion) {
        println!("apply {} path=\"{}\"", region, region.path);
    }

    fn on_hide_protection(&self) {
        println!("hide");
    }
}

fn main() {
    let args = Args::parse();

    let config = match FileConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config {}: {}", args.config.display(), e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let default_filter = if args.verbose {
        "debug"
    } else {
        config.logging.filter.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Camera Protection v{}", camera_protection::VERSION);

    let script = match EventScript::from_file(&args.events) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Failed to load event script {}: {}", args.events.display(), e);
            std::process::exit(1);
        }
    };

    let table = match config.protection_table() {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Invalid protection config: {}", e);
            std::process::exit(1);
        }
    };

    let metrics = match MetricsRegistry::new() {
        Ok(metrics) => Arc::new(metrics),
        Err(e) => {
            eprintln!("Failed to create metrics registry: {}", e);
            std::process::exit(1);
        }
    };

    let mut controller = match ProtectionController::with_metrics(table, Arc::clone(&metrics)) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("Failed to start controller: {}", e);
            std::process::exit(1);
        }
    };
    controller.add_listener(Arc::new(PrintListener));

    let mut service = MockCameraService::new();
    if let Err(e) = controller.start_listening(&mut service) {
        eprintln!("Failed to subscribe to camera service: {}", e);
        std::process::exit(1);
    }

    info!("Replaying {} events...", script.events.len());
    for (i, event) in script.events.into_iter().enumerate() {
        let kind = event.kind();
        if !service.emit(event) {
            warn!("Event {} ({}) was not delivered", i, kind);
        }
    }

    let snapshot = match controller.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Replay failed: {}", e);
            std::process::exit(1);
        }
    };
    controller.stop(&mut service);

    println!(
        "active: {}",
        snapshot
            .active_region
            .as_ref()
            .map_or_else(|| "none".to_string(), ToString::to_string)
    );
    println!(
        "open camera: {}",
        snapshot.open_camera.as_ref().map_or_else(
            || "none".to_string(),
            |open| format!("{} ({})", open.logical_id, open.package_id)
        )
    );
    println!(
        "unavailable physical cameras: [{}]",
        snapshot.unavailable_physical.join(", ")
    );

    info!(
        "Done. {} events, {} activations, {} deactivations",
        snapshot.stats.events_processed, snapshot.stats.activations, snapshot.stats.deactivations
    );

    if args.print_metrics {
        match metrics.encode() {
            Ok(output) => print!("{}", output),
            Err(e) => warn!("Failed to encode metrics: {}", e),
        }
    }
}

//! # robovacd — robovac daemon
//!
//! Composition root that wires the gateway, engine, and event bus together.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize tracing
//! - Pick the gateway backend and run discovery
//! - Construct the engine, injecting the gateway and event bus via ports
//! - Run the engine loop and handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no robot logic belongs here.

mod config;

use config::Config;
use robovac_adapter_virtual::VirtualGateway;
use robovac_app::discovery;
use robovac_app::engine::Engine;
use robovac_app::event_bus::InProcessEventBus;
use robovac_app::representation::HiddenServices;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    let mode = config.refresh_mode();
    tracing::info!(?mode, "refresh configured");

    if !config.gateway.virtual_enabled {
        anyhow::bail!(
            "no real cloud backend is bundled; set [gateway] virtual_enabled = true to run the simulator"
        );
    }

    let hidden = HiddenServices::from_names(&config.hidden);
    let bus = InProcessEventBus::new(256);

    // Log every representation update. An accessory-protocol adapter
    // would subscribe here instead.
    let mut updates = bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = updates.recv().await {
            tracing::info!(
                serial = %event.serial.masked(),
                kind = ?event.event_type,
                data = %event.data,
                "representation update"
            );
        }
    });

    let gateway = VirtualGateway::default();
    let registry = discovery::discover(
        &gateway,
        &config.account.email,
        &config.account.password,
        &hidden,
    )
    .await;
    tracing::info!(robots = registry.len(), "discovery complete");

    let mut engine = Engine::new(gateway, registry, mode, bus);

    tokio::select! {
        () = engine.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
    }

    Ok(())
}

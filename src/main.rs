//! Entry point for the scripture atlas.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse the optional initial location token from the command line.
//! - Load user configuration from `conf/config.toml`.
//! - Bootstrap the catalog (two concurrent metadata fetches).
//! - Run the interactive navigation loop.

mod api;
mod app;
mod bootstrap;
mod cache;
mod config;
mod map;
mod model;
mod navigation;
mod places;
mod render;
mod retry;

use crate::api::ScriptureApi;
use crate::app::{ConsoleMap, SharedSurface, TerminalSurface, run_app};
use crate::bootstrap::load_catalog;
use crate::config::load_config;
use crate::map::SharedMap;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let initial_token = env::args().nth(1).unwrap_or_default();
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        level = %config.log_level,
        volumes_url = %config.volumes_url,
        "Starting scripture atlas"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    runtime.block_on(async {
        let api = ScriptureApi::new(&config)?;
        // Bootstrap failure is fatal; the app is unusable without the
        // catalog and there is no retry on this path.
        let catalog = load_catalog(&api).await?;
        let surface: SharedSurface = Arc::new(Mutex::new(TerminalSurface));
        let map: SharedMap = Arc::new(Mutex::new(ConsoleMap::new(config.max_zoom)));
        run_app(catalog, config, api, surface, map, initial_token).await
    })
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    }
}

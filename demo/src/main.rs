//! Waypoint Demo
//!
//! Drives a three-tab navigation tree through scripted scenarios and logs
//! what a UI would render. Set `WAYPOINT_CONFIG` to a JSON file to override
//! the navigation configuration and `RUST_LOG` to adjust logging.

mod destinations;
mod links;
mod renderer;
mod scenarios;
mod state;

use anyhow::Context;
use waypoint_core::NavigationConfig;

use renderer::LogRenderer;
use state::AppState;

/// Configuration from `WAYPOINT_CONFIG` if set; otherwise the defaults,
/// overridden by whatever a previous run saved
fn load_state() -> anyhow::Result<AppState> {
    match std::env::var("WAYPOINT_CONFIG") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            let config = NavigationConfig::from_json(&json)
                .with_context(|| format!("parsing config {path}"))?;
            AppState::new(config)
        }
        Err(_) => AppState::with_stored_config(
            NavigationConfig::default()
                .with_restoration_key("demo")
                .with_settling(true),
        ),
    }
}

fn main() -> anyhow::Result<()> {
    waypoint_core::init_logging();

    let mut state = load_state()?;
    let mut renderer = LogRenderer::new(state.navigator());

    let restored = state.initialize()?;
    renderer.pump();
    tracing::info!(restored, "Demo initialized");

    scenarios::run_all(&mut state, &mut renderer)?;

    if state.save()? {
        tracing::info!("Navigation state saved");
    }
    tracing::info!(frames = renderer.frames(), "Demo finished");
    Ok(())
}

use mall_engine::{DefinitionError, FloorId, FloorRegistry, ViewerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const START_FLOOR_ENV_VAR: &str = "MALLMAP_START_FLOOR";

pub(crate) struct AppWiring {
    pub(crate) config: ViewerConfig,
    pub(crate) registry: FloorRegistry,
}

pub(crate) fn build_app() -> Result<AppWiring, DefinitionError> {
    init_tracing();
    info!("=== Mall Map Startup ===");

    let registry = FloorRegistry::builtin()?;
    let defaults = ViewerConfig::default();
    let start_floor = resolve_start_floor(
        std::env::var(START_FLOOR_ENV_VAR).ok().as_deref(),
        defaults.start_floor,
    );
    let config = ViewerConfig {
        start_floor,
        ..defaults
    };

    Ok(AppWiring { config, registry })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn resolve_start_floor(raw: Option<&str>, fallback: FloorId) -> FloorId {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return fallback;
    };
    match raw.parse::<FloorId>() {
        Ok(floor) => floor,
        Err(err) => {
            warn!(
                env_var = START_FLOOR_ENV_VAR,
                error = %err,
                fallback = %fallback,
                "invalid start floor; falling back to default"
            );
            fallback
        }
    }
}

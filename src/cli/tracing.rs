use tracing::Level;
use tracing_subscriber::prelude::*;

pub(crate) fn init(verbose: bool) {
    let tracing_layer = tracing_subscriber::fmt::layer();
    let own_level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = tracing_subscriber::filter::Targets::new()
        .with_target(env!("CARGO_CRATE_NAME"), own_level)
        .with_target("octocrab", Level::WARN)
        .with_target("reqwest", Level::WARN)
        .with_default(Level::INFO);

    tracing_subscriber::registry()
        .with(tracing_layer)
        .with(filter)
        .init();
}

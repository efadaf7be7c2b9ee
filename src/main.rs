use rps_gesture_bridge::{
    AppError, Configuration, CoordinatorBuilder, intake::landmark::open_source,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();
    let config_path = std::env::args().nth(1);
    let configuration = Configuration::load(config_path.as_deref())?;

    let source = open_source(&configuration.source).await?;
    let mut coordinator = CoordinatorBuilder::new(configuration)
        .source(source)
        .build()?;
    coordinator.start().await?;

    let outcome = tokio::select! {
        result = coordinator.wait() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
            Ok(())
        }
    };
    if let Err(e) = &outcome {
        error!("Gesture pipeline failed: {}", e);
    }

    coordinator.stop().await?;
    outcome
}

use anyhow::Result;
use pemfc_feeder::echo;
use std::env;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();

    let port: u16 = match env::var("PORT") {
        Ok(raw) => raw.parse()?,
        Err(_) => echo::DEFAULT_PORT,
    };

    info!("Echo server listening on 0.0.0.0:{}", port);
    info!("Sensor endpoint: POST http://localhost:{}/api/sensor", port);

    warp::serve(echo::routes()).run(([0, 0, 0, 0], port)).await;

    Ok(())
}

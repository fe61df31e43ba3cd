use tally::config::Config;
use tally::server::{build_app, serve};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("Starting Tally {} on {}", tally::VERSION, config.address());

    let (_state, app) = build_app(config.clone()).expect("Failed to initialise application");

    let (port, handle) = serve(app, &config.host, config.port)
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}:{}", config.host, port);

    handle.await.expect("Server task panicked");
}

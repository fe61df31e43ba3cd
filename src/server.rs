use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::{create_pool, migrations, DbPool};
use crate::handlers;
use crate::state::AppState;

/// Build the application state and Axum router from a [`Config`].
///
/// Creates the database pool and runs migrations. The pool is the single
/// storage handle for the life of the process.
pub fn build_app(config: Config) -> Result<(AppState, Router), Box<dyn std::error::Error>> {
    let db = create_pool(&config.database_path)?;
    let state = prepare_state(db, config)?;
    let app = router(state.clone());
    Ok((state, app))
}

/// Run migrations against `db` and wrap it into shared state.
pub fn prepare_state(db: DbPool, config: Config) -> Result<AppState, Box<dyn std::error::Error>> {
    {
        let conn = db.get()?;
        migrations::run_migrations(&conn, &config.migrations_path)?;
    }
    Ok(AppState::new(db, config))
}

/// The API routes with the HTTP middleware stack applied.
pub fn router(state: AppState) -> Router {
    handlers::routes()
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the router to `host:port` and spawn the server as a tokio task.
///
/// Returns the actual port the server bound to (useful when `port` is 0 for
/// OS-assigned ports) and a [`JoinHandle`] for the server task.
pub async fn serve(
    app: Router,
    host: &str,
    port: u16,
) -> Result<(u16, JoinHandle<()>), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_port, handle))
}

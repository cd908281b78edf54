use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let snapshot = if std::env::var("SCHOOLSCHED_SEED_DEMO").is_ok() {
        tracing::info!("starting with the demo dataset");
        store::seed::demo_snapshot()
    } else {
        types::Snapshot::default()
    };
    let app = api::build_router(api::AppState::new(snapshot));

    let port = std::env::var("SCHOOLSCHED__SERVER__PORT").unwrap_or_else(|_| "8080".into());
    let addr: std::net::SocketAddr = format!("0.0.0.0:{}", port).parse()?;
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

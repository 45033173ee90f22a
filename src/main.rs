use clap::Parser;

use slotdb::config::Config;
use slotdb::engine::Engine;
use slotdb::http;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::parse();
    tracing::info!(
        db_path = %config.db_path.display(),
        page_size = config.page_size,
        bind_addr = %config.bind_addr,
        "starting slotdb-server"
    );

    let engine = Engine::open(&config.db_path, config.page_size)?;
    let state = http::AppState::new(engine);
    let app = http::router(state);

    let addr = config.bind_addr.parse()?;
    tracing::info!(%addr, "listening");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

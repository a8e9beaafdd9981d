use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    toolcrib_observability::init();

    let config = toolcrib_api::config::Config::from_env().inspect_err(|e| {
        tracing::error!("startup configuration error: {e:#}");
    })?;

    let app = toolcrib_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

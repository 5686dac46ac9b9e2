use anyhow::Context;

use cropsight_observability::Format;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let format = match std::env::var("LOG_FORMAT").as_deref() {
        Ok("pretty") => Format::Pretty,
        _ => Format::Json,
    };
    cropsight_observability::init_with(format);

    let settings = cropsight_infra::Settings::from_env();
    let bind_addr = settings.bind_addr.clone();

    let app = cropsight_api::app::build_app(settings);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

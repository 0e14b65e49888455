#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let tracing_config = mock_github::tracing::Config::from_env()?;
    let tracer = tracing_config.install()?;

    let config = match std::env::var("CONFIG_PATH") {
        Ok(path) => mock_github::Config::from_path(path)?,
        Err(_) => mock_github::Config::from_env()?,
    };
    let app = config.build()?;
    let res = app.run().await;

    tracer.shutdown().await;

    res
}

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

mod adapter_blob_store;
mod adapter_counter;
mod adapter_http_server;
mod adapter_storage;
mod domain;
pub mod tracing;

pub use crate::domain::entity::{Asset, AssetState, PullRequest, Release};

fn with_env_or(name: &str, default_value: &'static str) -> Cow<'static, str> {
    std::env::var(name)
        .ok()
        .map(Cow::Owned)
        .unwrap_or(Cow::Borrowed(default_value))
}

fn maybe_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn with_env_as_or<T>(name: &str, default_value: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    <T as std::str::FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let Ok(value) = std::env::var(name) else {
        return Ok(default_value);
    };
    value
        .parse::<T>()
        .with_context(|| format!("unable to parse value from {name:?}"))
}

/// Settings shared by every component of the mock.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct CoreConfig {
    /// Prefix prepended to every URL the mock hands out, `""` keeps them relative.
    public_url: String,
}

impl CoreConfig {
    fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            public_url: with_env_or("PUBLIC_URL", "").into_owned(),
        })
    }

    fn public_url(&self) -> Arc<str> {
        Arc::from(self.public_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    core: CoreConfig,
    http_server: adapter_http_server::Config,
    blob_store: adapter_blob_store::Config,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            core: CoreConfig::from_env()?,
            http_server: adapter_http_server::Config::from_env()?,
            blob_store: adapter_blob_store::Config::from_env()?,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read configuration file {path:?}"))?;
        toml::from_str(&content)
            .with_context(|| format!("unable to parse configuration file {path:?}"))
    }

    pub fn build(self) -> anyhow::Result<Application> {
        let public_url = self.core.public_url();
        let blob_store = self.blob_store.build(public_url.clone())?;
        let counter = adapter_counter::Counter::default();
        let storage = adapter_storage::MemoryStorage::default();

        let releases = domain::release::ReleaseService::new(
            public_url,
            storage.clone(),
            counter.clone(),
        );
        let assets = domain::asset::AssetService::new(storage, blob_store, counter);

        Ok(Application {
            server: self.http_server.build()?,
            state: adapter_http_server::ServerState { releases, assets },
        })
    }
}

type ApplicationState = adapter_http_server::ServerState<
    domain::release::ReleaseService<adapter_storage::MemoryStorage, adapter_counter::Counter>,
    domain::asset::AssetService<
        adapter_storage::MemoryStorage,
        adapter_blob_store::TempDirBlobStore,
        adapter_counter::Counter,
    >,
>;

pub struct Application {
    server: adapter_http_server::Server,
    state: ApplicationState,
}

impl Application {
    /// Router serving the mocked API, for callers that bind their own listener.
    pub fn router(&self) -> axum::Router {
        adapter_http_server::router(self.state.clone())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let Self { server, state } = self;
        let res = server.run(state, shutdown_signal()).await;
        ::tracing::info!("server stopped, uploaded assets removed");
        res
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            ::tracing::error!(error = ?err, "unable to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                ::tracing::error!(error = ?err, "unable to listen for sigterm");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    ::tracing::info!("shutdown requested");
}

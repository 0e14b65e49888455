use anyhow::Context;

mod handler;
mod middleware;

const DEFAULT_ADDRESS: std::net::IpAddr = std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    address: std::net::IpAddr,
    port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Config> {
        Ok(Self {
            address: crate::with_env_as_or("ADDRESS", DEFAULT_ADDRESS)?,
            port: crate::with_env_as_or("PORT", DEFAULT_PORT)?,
        })
    }

    #[cfg(test)]
    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    pub fn build(self) -> anyhow::Result<Server> {
        Ok(Server {
            address: std::net::SocketAddr::from((self.address, self.port)),
        })
    }
}

#[derive(Clone, Debug)]
pub struct ServerState<RM, AM> {
    pub releases: RM,
    pub assets: AM,
}

pub fn router<RM, AM>(state: ServerState<RM, AM>) -> axum::Router
where
    RM: crate::domain::prelude::ReleaseManager + Clone,
    AM: crate::domain::prelude::AssetManager + Clone,
{
    handler::build()
        .layer(middleware::tracing::layer())
        .with_state(state)
}

#[derive(Debug)]
pub struct Server {
    address: std::net::SocketAddr,
}

impl Server {
    pub async fn run<RM, AM, S>(self, state: ServerState<RM, AM>, shutdown: S) -> anyhow::Result<()>
    where
        RM: crate::domain::prelude::ReleaseManager + Clone,
        AM: crate::domain::prelude::AssetManager + Clone,
        S: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(self.address)
            .await
            .with_context(|| format!("unable to bind {}", self.address))?;
        let app = router(state);
        tracing::info!(address = ?self.address, "starting server");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("server crashed")
    }
}

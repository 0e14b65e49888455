use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub enum Config {
    Console(ConsoleConfig),
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::Console(ConsoleConfig::from_env()?))
    }

    pub fn install(self) -> anyhow::Result<TracingProvider> {
        match self {
            Self::Console(inner) => inner.install(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConsoleFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown tracing format {0:?}, expected \"text\" or \"json\"")]
pub struct UnknownFormat(String);

impl std::str::FromStr for ConsoleFormat {
    type Err = UnknownFormat;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormat(value.to_string())),
        }
    }
}

pub struct ConsoleConfig {
    color: bool,
    format: ConsoleFormat,
}

impl ConsoleConfig {
    fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            color: crate::with_env_as_or("TRACING_CONSOLE_COLOR", true)?,
            format: crate::with_env_as_or("TRACING_FORMAT", ConsoleFormat::Text)?,
        })
    }

    fn install(self) -> anyhow::Result<TracingProvider> {
        let (text, json) = match self.format {
            ConsoleFormat::Text => (
                Some(tracing_subscriber::fmt::layer().with_ansi(self.color)),
                None,
            ),
            ConsoleFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
        };
        tracing_subscriber::registry()
            .with(text)
            .with(json)
            .with(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::INFO.into())
                    .with_env_var("TRACING_LEVEL")
                    .from_env_lossy(),
            )
            .try_init()?;
        Ok(TracingProvider::Console)
    }
}

pub enum TracingProvider {
    Console,
}

impl TracingProvider {
    pub async fn shutdown(self) {}
}

use std::borrow::Cow;

/// Failures surfaced by the release and asset services.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },
    #[error("{0}")]
    Validation(Cow<'static, str>),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    #[inline]
    pub fn release_not_found(id: u64) -> Self {
        Self::NotFound {
            kind: "release",
            id,
        }
    }

    #[inline]
    pub fn asset_not_found(id: u64) -> Self {
        Self::NotFound { kind: "asset", id }
    }

    #[inline]
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation(message.into())
    }

    #[inline]
    pub fn missing_field(name: &'static str) -> Self {
        Self::validation(format!("missing field {name:?}"))
    }
}

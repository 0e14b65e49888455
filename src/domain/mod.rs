pub(crate) mod asset;
pub(crate) mod entity;
pub(crate) mod error;
pub(crate) mod prelude;
pub(crate) mod release;

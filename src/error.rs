//! Error types for the connection subsystem
//!
//! Variants carry string payloads and the enum is `Clone` so that a coalesced
//! reconnect can hand the same outcome to every waiting caller.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("no wallet extension available")]
    NotFound,

    #[error("wallet authorization declined by user")]
    NotAuthorized,

    #[error("wallet extension error: {0}")]
    Provider(String),

    #[error("operation timed out: {0}")]
    Timeout(String),

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("network error: {0}")]
    Network(String),
}

pub type Result<T> = std::result::Result<T, Error>;

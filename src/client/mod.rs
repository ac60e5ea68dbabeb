//! Client shell pieces: an explicit [`Session`] cache and the [`HttpGateway`]
//! used by the `lunaflow` command-line client.

use thiserror::Error;

mod gateway;
mod session;

pub use gateway::{HttpGateway, DEFAULT_SERVER, SERVER_ENV};
pub use session::{Session, SESSION_ENV};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("session cache: {0}")]
    Session(std::io::Error),

    #[error("session encoding: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("not logged in, run `lunaflow login` first")]
    NotLoggedIn,
}

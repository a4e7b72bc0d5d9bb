use taskboard_client::ClientError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", .0)]
    Custom(String),

    /// The API answered with a failure; `message` is the banner text.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    #[error("Client::{:?}: {}", .0, .0)]
    Client(#[from] ClientError),

    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("Json::{:?}: {}", .0, .0)]
    Json(#[from] serde_json::Error),
}

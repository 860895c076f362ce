use thiserror::Error;

#[derive(Error, Debug)]
pub enum KVError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("storage error: {0}")]
    Storage(String),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The host cannot provide a 3D rendering surface; fatal at startup.
    #[error("3D rendering unavailable: {0}")]
    RenderingUnavailable(String),
    /// The audio backend refused to create or wire a node.
    #[error("audio graph: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, Error>;

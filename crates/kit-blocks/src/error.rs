//! Error types for kit-blocks

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No [upstream] section found in configuration content")]
    SectionNotFound,
}

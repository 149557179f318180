use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no playable rendition available")]
    NoRenditionAvailable,

    #[error("no stream tier found in multi-tier manifest {url}")]
    NoStreamTier { url: String },
}

impl CoreError {
    /// both variants mean the descriptor had nothing usable to download.
    pub fn is_no_rendition(&self) -> bool {
        matches!(
            self,
            Self::NoRenditionAvailable | Self::NoStreamTier { .. }
        )
    }
}

pub mod errors;
pub mod rendition;
pub mod sanitize;

pub use errors::{CoreError, Result};
pub use rendition::{Renditions, StreamTier, resolve_best_rendition, stream_tiers};
pub use sanitize::{INVALID_CHARS, sanitize, strip_invalid};

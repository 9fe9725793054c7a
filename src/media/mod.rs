pub mod filename;
pub mod manifest;
mod types;

pub use filename::derive_filename;
pub use types::{DeriveContext, DownloadRequest, ResolvedMedia};

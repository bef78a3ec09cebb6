mod asset;
mod error;
mod hash;
mod traits;

pub mod filesystem;

pub use asset::{ASSETS_PREFIX, AssetRef};
pub use error::StorageError;
pub use hash::{ContentHash, upload_extension};
pub use traits::AssetStore;

pub mod config;
pub mod operator;
pub mod path;
pub mod store;

#[cfg(test)]
mod tests;

pub use config::StorageConfig;
pub use operator::{create_operator, init_operators};
pub use path::{join_key, recording_prefix, validate_key};
pub use store::{ObjectStore, OpendalStore, StoreError, StoredObject};

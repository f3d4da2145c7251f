mod config_storage;

pub use config_storage::{CliSection, ConfigStorage, ConfigStorageError, FileConfig, WebSection};

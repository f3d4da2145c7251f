//! Filesystem and environment access for gptc.

pub mod paths;
pub mod secrets;
pub mod storage;

pub use paths::{GptcPaths, PathError};
pub use secrets::{api_key_from_env, base_url_from_env};
pub use storage::{CliSection, ConfigStorage, ConfigStorageError, FileConfig, WebSection};

//! Command implementations.

pub mod init_config;
pub mod list;
pub mod process;
pub mod show;

pub use self::init_config::execute_init_config;
pub use self::list::execute_list;
pub use self::process::execute_process;
pub use self::show::execute_show;

use crate::config::Config;
use crate::error::Result;
use std::path::Path;
use triage_store::SqliteStore;

/// Open the configured record store.
pub(crate) fn open_store(config: &Config, config_path: &Path) -> Result<SqliteStore> {
    let path = config.store_path(config_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    tracing::debug!("Opening store at {}", path.display());
    Ok(SqliteStore::new(&path)?)
}

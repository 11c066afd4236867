//! Handler for `migrate`.

use std::path::Path;

use crate::adapter::inbound::cli::{load_config, output};
use crate::error::Result;
use crate::infrastructure::bootstrap::open_store;

/// Execute `migrate`: open the database and apply pending migrations.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    open_store(&config.database)?;

    output::success("Database schema is up to date");
    output::field("Database", &config.database);
    Ok(())
}

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::store::SqliteStore;
use crate::errors::AppResult;
use crate::store::EventStore;
use crate::ui::messages::{info, success};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped with `--test`)
///  - the SQLite database and its schema
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = cfg.database_path().to_string_lossy().to_string();

    info("Initializing shiftledger…");
    if !cli.test {
        info(format!("Config file : {}", Config::config_file().display()));
    }
    info(format!("Database    : {db_path}"));

    let store = SqliteStore::open(&db_path)?;
    store.audit(
        "init",
        "",
        &format!("Database initialized at {db_path}"),
    );

    success(format!("Database initialized at {db_path}"));
    Ok(())
}

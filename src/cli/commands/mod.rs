//! One handler per subcommand. Handlers that touch shifts go through the
//! façade so the CLI answers exactly like the console does.

pub mod backup;
pub mod config;
pub mod console;
pub mod export;
pub mod init;
pub mod log;
pub mod query;
pub mod service;

use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::clock::{Clock, FixedClock, SystemClock};
use crate::core::desk::{Reply, ServiceDesk};
use crate::db::store::SqliteStore;
use crate::errors::{AppError, AppResult};
use crate::ui::messages;
use crate::utils::time::parse_instant_arg;
use std::sync::Arc;

pub(crate) fn open_store(cfg: &Config) -> AppResult<SqliteStore> {
    SqliteStore::open(&cfg.database_path().to_string_lossy())
}

pub(crate) fn clock_for(cli: &Cli) -> AppResult<Arc<dyn Clock>> {
    Ok(match &cli.at {
        Some(at) => Arc::new(FixedClock::new(parse_instant_arg(at)?)),
        None => Arc::new(SystemClock),
    })
}

pub(crate) fn open_desk(cli: &Cli, cfg: &Config) -> AppResult<ServiceDesk<SqliteStore>> {
    Ok(ServiceDesk::new(
        open_store(cfg)?,
        clock_for(cli)?,
        cfg.desk_settings()?,
    ))
}

/// Show a reply; refusals and failures make the command fail.
pub(crate) fn answer(reply: Reply) -> AppResult<()> {
    messages::reply(&reply);
    if reply.is_error() {
        Err(AppError::Reported)
    } else {
        Ok(())
    }
}

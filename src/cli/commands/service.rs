use crate::cli::commands::{answer, open_desk};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::desk::Request;
use crate::errors::AppResult;

/// Handle `service` and `status`.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let request = match &cli.command {
        Commands::Service {
            name,
            clock_in: true,
            ..
        } => Request::ClockIn {
            subject: name.clone(),
        },
        Commands::Service {
            name,
            clock_out: true,
            ..
        } => Request::ClockOut {
            subject: name.clone(),
        },
        Commands::Service { name, .. } => Request::ClockToggle {
            subject: name.clone(),
        },
        Commands::Status { name } => Request::Status {
            subject: name.clone(),
        },
        _ => return Ok(()),
    };

    let desk = open_desk(cli, cfg)?;
    answer(desk.dispatch(request))
}

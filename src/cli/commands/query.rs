use crate::cli::commands::{answer, open_desk};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::accumulator::Window;
use crate::core::desk::Request;
use crate::errors::AppResult;
use crate::store::EventStore;
use crate::ui::messages::{info, warning};
use crate::utils::colors::{colorize_duration, paint_status};
use crate::utils::date::parse_period;
use crate::utils::formatting::format_duration;
use crate::utils::table::Table;

/// Handle `today`, `total`, `range`, `history` and `subjects`.
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let desk = open_desk(cli, cfg)?;

    let request = match &cli.command {
        Commands::Today { name } => Request::DurationToday {
            subject: name.clone(),
        },
        Commands::Total { name, days } => Request::DurationRange {
            subject: name.clone(),
            days: days.clone(),
        },
        Commands::Range { name, period } => {
            let (from, to) = parse_period(period)?;
            Request::DurationBetween {
                subject: name.clone(),
                from,
                to,
            }
        }
        Commands::History { name } => Request::History {
            subject: name.clone(),
        },
        Commands::Subjects => {
            let subjects = desk.ledger().store().subjects()?;
            if subjects.is_empty() {
                warning("No members recorded yet.");
                return Ok(());
            }

            let now = desk.now();
            let mut table = Table::new(["Member", "Status", "Today"]);
            for subject in &subjects {
                let status = desk.query_status(subject)?;
                let today = desk.ledger().duration(
                    subject,
                    &Window::day(now.date()),
                    now,
                    cfg.open_shift,
                )?;
                table.add_row(vec![
                    subject.to_string(),
                    paint_status(status),
                    colorize_duration(&format_duration(today.total)),
                ]);
            }
            info(format!("{} member(s):\n", subjects.len()));
            print!("{}", table.render());
            return Ok(());
        }
        _ => return Ok(()),
    };

    answer(desk.dispatch(request))
}

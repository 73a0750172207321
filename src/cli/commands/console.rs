//! Chat-style front end on stdin/stdout.
//!
//! Each input line is one message:
//!
//! ```text
//! !service <name>          open a start/end prompt for <name>
//! start <prompt> <name>    <name> presses "start" on a prompt
//! end <prompt> <name>      <name> presses "end" on a prompt
//! !status <name>
//! !temps <name>            time on duty today
//! !total <days> <name>     time on duty over the last <days> days
//! !history <name>
//! ```
//!
//! Lines that are not commands are ignored, as a bot ignores chatter.

use crate::cli::commands::open_desk;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::desk::{PromptAction, Reply, Request};
use crate::core::prompts::{Origin, PromptId};
use crate::errors::AppResult;
use crate::ui::messages;
use std::io::{self, BufRead};
use tracing::debug;

const CHANNEL: &str = "console";

/// What a line asks for: a request for the façade, or a refusal that never
/// reaches it.
#[derive(Debug, Clone)]
pub enum Parsed {
    Request(Request),
    Invalid(String),
}

pub fn parse_line(line: &str) -> Option<Parsed> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let named = |build: fn(String) -> Request, usage: &str| {
        if rest.is_empty() {
            Parsed::Invalid(format!("Please mention a member: {usage}"))
        } else {
            Parsed::Request(build(rest.to_string()))
        }
    };

    Some(match word {
        "!service" => {
            if rest.is_empty() {
                Parsed::Invalid("Please mention a member: !service <name>".into())
            } else {
                Parsed::Request(Request::Prompt {
                    subject: rest.to_string(),
                    origin: Origin::new(CHANNEL, rest),
                })
            }
        }
        "!status" => named(|subject| Request::Status { subject }, "!status <name>"),
        "!temps" => named(|subject| Request::DurationToday { subject }, "!temps <name>"),
        "!history" => named(|subject| Request::History { subject }, "!history <name>"),
        "!total" => match rest.split_once(char::is_whitespace) {
            Some((days, name)) if !name.trim().is_empty() => {
                Parsed::Request(Request::DurationRange {
                    subject: name.trim().to_string(),
                    days: days.to_string(),
                })
            }
            _ => Parsed::Invalid(
                "Please mention a member and a number of days: !total <days> <name>".into(),
            ),
        },
        "start" | "end" => {
            let action = if word == "start" {
                PromptAction::Start
            } else {
                PromptAction::End
            };
            match rest.split_once(char::is_whitespace) {
                Some((id, name)) if !name.trim().is_empty() => match id.parse::<u64>() {
                    Ok(id) => Parsed::Request(Request::PromptAction {
                        prompt: PromptId(id),
                        actor: name.trim().to_string(),
                        action,
                    }),
                    Err(_) => Parsed::Invalid(format!("'{id}' is not a prompt number.")),
                },
                _ => Parsed::Invalid(format!("Usage: {word} <prompt> <name>")),
            }
        }
        _ => return None,
    })
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let desk = open_desk(cli, cfg)?;
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line?;
        match parse_line(&line) {
            None => debug!(line = %line, "ignored"),
            Some(Parsed::Invalid(msg)) => messages::reply(&Reply::Rejected(msg)),
            Some(Parsed::Request(request)) => {
                let reply = desk.dispatch(request);
                messages::reply(&reply);
                if let Reply::Prompted(p) = &reply {
                    println!(
                        "   start {id} {name}  |  end {id} {name}",
                        id = p.prompt,
                        name = p.subject
                    );
                }
            }
        }
    }

    Ok(())
}

//! shiftledger main entrypoint.

use shiftledger::errors::AppError;
use shiftledger::run;
use shiftledger::ui::messages;

fn main() {
    match run() {
        Ok(()) => {}
        // already explained to the user
        Err(AppError::Reported) => std::process::exit(1),
        Err(e) => {
            messages::error(format!("Error: {e}"));
            std::process::exit(1);
        }
    }
}

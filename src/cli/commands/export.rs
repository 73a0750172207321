use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::models::Subject;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        subject,
        range,
        force,
    } = cmd
    {
        let store = open_store(cfg)?;
        let subject = subject.as_deref().map(Subject::sanitize).transpose()?;
        ExportLogic::export(
            &store,
            *format,
            file,
            subject.as_ref(),
            range.as_deref(),
            *force,
        )?;
    }
    Ok(())
}

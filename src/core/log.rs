use crate::db::log::LogEntry;
use crate::utils::table::{pad_visible, strip_ansi};
use ansi_term::Colour;

const OP_MAX_WIDTH: usize = 60;

fn color_for_operation(op: &str) -> Colour {
    match op {
        "service" => Colour::Green,
        "export" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "backup" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    /// One aligned line per audit entry, operation colored.
    pub fn render(entries: &[LogEntry]) -> Vec<String> {
        let rows: Vec<(String, String, String, &LogEntry)> = entries
            .iter()
            .map(|e| {
                let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or_else(|_| e.date.clone());
                let op_target = if e.target.is_empty() {
                    e.operation.clone()
                } else {
                    format!("{} ({})", e.operation, e.target)
                };
                (e.id.to_string(), date, op_target, e)
            })
            .collect();

        let id_w = rows.iter().map(|r| r.0.len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|r| r.1.len()).max().unwrap_or(10);
        let op_w = rows
            .iter()
            .map(|r| r.2.chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_MAX_WIDTH);

        rows.into_iter()
            .map(|(id, date, op_target, entry)| {
                let visible = if op_target.chars().count() > OP_MAX_WIDTH {
                    let mut s: String = op_target.chars().take(OP_MAX_WIDTH - 3).collect();
                    s.push_str("...");
                    s
                } else {
                    op_target
                };

                // only the operation word is colored
                let color = color_for_operation(&entry.operation);
                let colored = match visible.split_once(' ') {
                    Some((op, rest)) => format!("{} {rest}", color.paint(op)),
                    None => color.paint(visible.as_str()).to_string(),
                };

                format!(
                    "{id:>id_w$}: {date:<date_w$} | {} => {}",
                    pad_visible(&colored, op_w),
                    entry.message
                )
            })
            .collect()
    }

    pub fn print(entries: &[LogEntry]) {
        println!("📜 Internal log:\n");
        for line in Self::render(entries) {
            println!("{line}");
        }
    }

    /// The rendered log without colors, for piping.
    pub fn plain(entries: &[LogEntry]) -> Vec<String> {
        Self::render(entries).iter().map(|l| strip_ansi(l)).collect()
    }
}

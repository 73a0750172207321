use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for shiftledger
/// CLI application to clock members in and out of service and account their time
#[derive(Parser)]
#[command(
    name = "shiftledger",
    version = env!("CARGO_PKG_VERSION"),
    about = "A service-shift ledger: clock members in and out and report time on duty",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Evaluate everything as if it were this instant
    #[arg(global = true, long = "at", hide = true, value_name = "TIMESTAMP")]
    pub at: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Start or end a member's service (toggles by default)
    Service {
        /// Member display name
        name: String,

        #[arg(long = "in", conflicts_with = "clock_out", help = "Only start the service")]
        clock_in: bool,

        #[arg(long = "out", help = "Only end the service")]
        clock_out: bool,
    },

    /// Show whether a member is on duty
    Status { name: String },

    /// Time on duty today
    Today { name: String },

    /// Time on duty over the last N days, today included
    Total {
        name: String,

        /// Number of days to look back
        #[arg(allow_hyphen_values = true)]
        days: String,
    },

    /// Time on duty over a period
    Range {
        name: String,

        /// YYYY, YYYY-MM, YYYY-MM-DD, or two of the same joined by ':'
        period: String,
    },

    /// A member's service history
    History { name: String },

    /// List known members with their status and time on duty today
    Subjects,

    /// Export the ledger
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, value_name = "NAME", help = "Only export this member")]
        subject: Option<String>,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Read chat-style commands from stdin and answer them
    Console,
}

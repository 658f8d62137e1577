use clap::{Parser, Subcommand};

/// Command-line interface definition for dascan
/// Station scanner: record driver ID scans, back them up and mirror them to a sheet
#[derive(Parser)]
#[command(
    name = "dascan",
    version = env!("CARGO_PKG_VERSION"),
    about = "A station scanner CLI: count driver ID scans per day, back up to CSV and mirror to a remote sheet",
    long_about = None
)]
pub struct Cli {
    /// Override configuration file path
    #[arg(global = true, long = "config")]
    pub config: Option<String>,

    /// Override the directory holding the station backup CSV files
    #[arg(global = true, long = "backup-dir")]
    pub backup_dir: Option<String>,

    /// Override the remote workbook path
    #[arg(global = true, long = "workbook")]
    pub workbook: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize configuration, audit log and remote workbook
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

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

    /// List configured stations, their sheet tabs and backup files
    Stations,

    /// Start a scan session
    Scan {
        /// Station code (default: `default_station` from the config)
        #[arg(long = "station", short = 's')]
        station: Option<String>,

        /// Record locally only, without contacting the remote store
        #[arg(long = "offline")]
        offline: bool,

        /// Driver IDs to scan in order; reads stdin when none are given
        ids: Vec<String>,
    },

    /// Print the remote sheet tab of a station
    Sheet {
        #[arg(long = "station", short = 's')]
        station: String,

        #[arg(long = "json", help = "Print rows as JSON objects")]
        json: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "operation", help = "Only rows with this operation")]
        operation: Option<String>,
    },

    /// Archive all station backup files into one zip
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f', help = "Overwrite an existing archive")]
        force: bool,
    },
}

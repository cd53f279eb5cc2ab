use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "harbor",
    version,
    about = "Command-line client for the Harbor container registry"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Registry URL, e.g. https://harbor.example.com
    #[arg(long, global = true, env = "HARBOR_URL")]
    pub server: Option<String>,

    #[arg(short, long, global = true, env = "HARBOR_USERNAME")]
    pub username: Option<String>,

    #[arg(long, global = true, env = "HARBOR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// JSON file providing server, username, password and timeout_secs.
    #[arg(short, long, global = true, env = "HARBOR_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also append logs to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage Garbage Collection (GC) schedules and executions.
    #[command(subcommand)]
    Gc(GcCommand),
}

#[derive(Debug, Subcommand)]
pub enum GcCommand {
    /// Create the GC schedule.
    Create(ScheduleArgs),
    /// Replace the GC schedule.
    Update(ScheduleArgs),
    /// Show the current GC schedule.
    Schedule,
    /// List GC executions.
    History(HistoryArgs),
    /// Show one GC execution.
    Status(ExecutionArgs),
    /// Print the log of one GC execution.
    Log(ExecutionArgs),
    /// Stop a running GC execution.
    Stop(ExecutionArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ScheduleArgs {
    /// Hourly, Daily, Weekly, Custom, Schedule, Manual or None.
    #[arg(short = 't', long)]
    pub schedule_type: String,

    /// Cron expression (required for cron-bearing types, ignored otherwise).
    #[arg(long, default_value = "")]
    pub cron: String,

    /// RFC 3339 timestamp of the next run; defaults to 24 hours from now.
    #[arg(short = 'n', long)]
    pub next_scheduled_time: Option<String>,

    #[arg(long, default_value_t = false)]
    pub delete_untagged: bool,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Parallel GC workers (1-5).
    #[arg(long)]
    pub workers: Option<u8>,
}

#[derive(Debug, Clone, Args)]
pub struct HistoryArgs {
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub page: i64,

    #[arg(short = 's', long, default_value_t = 10, allow_negative_numbers = true)]
    pub page_size: i64,

    /// Filter query, e.g. "job_status=Success".
    #[arg(short, long)]
    pub query: Option<String>,

    /// Sort order, e.g. "-creation_time".
    #[arg(short = 'r', long, allow_hyphen_values = true)]
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ExecutionArgs {
    #[arg(short, long, allow_negative_numbers = true)]
    pub gc_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_with_globals_after_subcommand() {
        let cli = Cli::try_parse_from([
            "harbor",
            "gc",
            "create",
            "-t",
            "Daily",
            "--cron",
            "0 0 0 * * *",
            "--workers",
            "2",
            "--server",
            "https://harbor.example.com",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.global.server.as_deref(), Some("https://harbor.example.com"));
        assert_eq!(cli.global.verbose, 2);
        match cli.command {
            Commands::Gc(GcCommand::Create(args)) => {
                assert_eq!(args.schedule_type, "Daily");
                assert_eq!(args.cron, "0 0 0 * * *");
                assert_eq!(args.workers, Some(2));
                assert!(args.next_scheduled_time.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn accepts_negative_ids_for_local_validation() {
        let cli = Cli::try_parse_from(["harbor", "gc", "log", "--gc-id", "-5"]).unwrap();
        match cli.command {
            Commands::Gc(GcCommand::Log(args)) => assert_eq!(args.gc_id, -5),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn history_defaults() {
        let cli = Cli::try_parse_from(["harbor", "gc", "history", "-r", "-creation_time"]).unwrap();
        match cli.command {
            Commands::Gc(GcCommand::History(args)) => {
                assert_eq!(args.page, 1);
                assert_eq!(args.page_size, 10);
                assert_eq!(args.sort.as_deref(), Some("-creation_time"));
                assert!(args.query.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.global.output, OutputFormat::Table);
    }

    #[test]
    fn schedule_type_is_required() {
        assert!(Cli::try_parse_from(["harbor", "gc", "update", "--cron", "* * * * *"]).is_err());
    }
}

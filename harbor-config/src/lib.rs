mod cli;
mod settings;

pub use cli::{
    Cli, Commands, ExecutionArgs, GcCommand, GlobalArgs, HistoryArgs, OutputFormat, ScheduleArgs,
};
pub use settings::{load_file_config, resolve_settings, ConfigError, FileConfig, Settings};

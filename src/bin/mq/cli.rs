//! CLI argument parsing for mq.

use clap::{Parser, ValueEnum};

/// Query JSON data with a MistQL expression.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// The query to evaluate.
    pub query: String,

    /// Path to a JSON input file. When omitted, stdin is read instead.
    pub file: Option<std::path::PathBuf>,

    /// Specify the log level.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    /// Only critical errors will be logged.
    #[default]
    #[value(alias("0"))]
    Error,

    /// Also log warnings.
    #[value(alias("1"))]
    Warn,

    /// Log general progress, including output of the `log` builtin.
    #[value(alias("2"))]
    Info,

    /// Log everything which happens internally in the interpreter.
    #[value(alias("3"))]
    Debug,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}

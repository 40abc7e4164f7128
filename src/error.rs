use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("BisectError: {0}")]
    Bisect(#[from] BisectError),
    #[error("TaskError: {0}")]
    Task(#[from] TaskError),
    #[error("CommandError: {0}")]
    Command(#[from] CommandError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("UtilsError: {0}")]
    Utils(#[from] UtilsError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("No command given to run for each probe")]
    MissingCommand,
}

/// Failures of the bisection search itself.
///
/// Extremity results are kept in their `Debug` rendering so the error stays
/// independent of the predicate's result type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BisectError {
    #[error("Bisection needs at least 2 arguments, got {len}")]
    TooFewArguments { len: usize },
    #[error(
        "Both sides of the argument list produced expected results (left = {left}, right = {right})"
    )]
    AmbiguousBoundary { left: String, right: String },
    #[error(
        "Both sides of the argument list produced unexpected results (left = {left}, right = {right})"
    )]
    NoBoundary { left: String, right: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Failed to start task '{task}': {message}")]
    Spawn { task: String, message: String },
    #[error("{pending} task(s) still running after {timeout_ms}ms")]
    Timeout { timeout_ms: u128, pending: usize },
    #[error("Task '{task}' panicked: {message}")]
    Panicked { task: String, message: String },
    #[error("Task '{task}' stopped without reporting a result")]
    Disconnected { task: String },
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Probe command is empty")]
    EmptyCommand,
    #[error("Placeholder {placeholder} refers to a missing component (argument has {available})")]
    MissingComponent {
        placeholder: String,
        available: usize,
    },
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("Failed to wait for '{program}': {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },
    #[error("'{program}' was stopped before it finished")]
    Cancelled { program: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown configuration key '{key}'")]
    UnknownKey { key: String },
    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum UtilsError {
    #[error("Validation error: {message}")]
    Validation { message: String },
    #[error("Cannot parse '{input}': {reason}")]
    Parse { input: String, reason: String },
    #[error("Serialization failed: {message}")]
    Serialization { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Bisect(_) => ErrorSeverity::Medium,
            AppError::Task(task_error) => match task_error {
                TaskError::Panicked { .. } => ErrorSeverity::Critical,
                TaskError::Spawn { .. } | TaskError::Disconnected { .. } => ErrorSeverity::High,
                TaskError::Timeout { .. } => ErrorSeverity::Medium,
            },
            AppError::Command(command_error) => match command_error {
                CommandError::Spawn { .. } | CommandError::Wait { .. } => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Utils(_) => ErrorSeverity::Low,
        }
    }

    pub fn display_friendly(&self) -> String {
        match self {
            AppError::Bisect(BisectError::NoBoundary { left, right }) => format!(
                "No transition found between the first and last argument (left = {}, right = {})",
                left, right
            ),
            AppError::Bisect(BisectError::AmbiguousBoundary { left, right }) => format!(
                "Every argument produced the expected result (left = {}, right = {})",
                left, right
            ),
            AppError::Task(TaskError::Timeout { timeout_ms, .. }) => {
                format!("Gave up after {}ms", timeout_ms)
            }
            _ => format!("{}", self),
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Bisect(BisectError::NoBoundary { .. }) => {
                Some("Widen the range or try '--expect failure'".to_string())
            }
            AppError::Bisect(BisectError::AmbiguousBoundary { .. }) => {
                Some("Pass '--allow-all-expected' to accept the last argument".to_string())
            }
            AppError::Bisect(BisectError::TooFewArguments { .. }) => {
                Some("Give at least two values with '--range' or '--values'".to_string())
            }
            AppError::Task(TaskError::Timeout { .. }) => {
                Some("Raise '--timeout' or lower '--probe-timeout'".to_string())
            }
            AppError::Command(CommandError::Spawn { .. }) => {
                Some("Check that the probe command exists and is executable".to_string())
            }
            AppError::Config(ConfigError::UnknownKey { .. }) => {
                Some("'toolbelt config show' lists the available keys".to_string())
            }
            _ => None,
        }
    }
}

use crate::core::probe::ProbeOutcome;
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "toolbelt")]
#[command(about = "Find where a command starts (or stops) succeeding across an ordered list of inputs")]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(long, global = true, env = "TOOLBELT_CONFIG_DIR")]
    pub config_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bisect an argument list with a command as the predicate
    Bisect(BisectArgs),
    /// Convert a byte size between units
    Bytes {
        /// Size such as 1024, "64 KB", 50GB or "1.5 TiB"
        value: String,
        /// Print only the largest fitting unit
        #[arg(long)]
        human: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["range", "values"])))]
pub struct BisectArgs {
    /// Integer range START..END[:STEP], END excluded
    #[arg(long, allow_hyphen_values = true)]
    pub range: Option<String>,

    /// Explicit arguments in order; use the separator for tuples (host,1472)
    #[arg(long, num_args = 1.., allow_negative_numbers = true)]
    pub values: Vec<String>,

    /// Probe outcome to bound
    #[arg(long, value_enum)]
    pub expect: Option<ProbeOutcome>,

    /// Return the last argument when every argument gives the expected outcome
    #[arg(long)]
    pub allow_all_expected: bool,

    /// Kill a probe after SECS and count it as a failure
    #[arg(long, value_name = "SECS")]
    pub probe_timeout: Option<u64>,

    /// Abandon the whole search after SECS
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Tuple component separator for --values
    #[arg(long)]
    pub separator: Option<char>,

    /// Let probe commands write to the terminal
    #[arg(long)]
    pub show_output: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Probe command; {} and {N} are replaced by the argument
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key, e.g. bisect.expect
        key: String,
        /// Configuration value
        value: String,
    },
    /// Print the configuration file location
    Path,
}

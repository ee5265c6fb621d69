use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "integral-advisor")]
#[command(about = "Suggests an integration technique for an indefinite integral")]
#[command(version)]
pub struct Cli {
    /// Verbose output (shows matched rule and debug logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.integral-advisor)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Suggest a technique for an integral (reads stdin line by line when no expression is given)
    Analyze {
        /// Integral expression, e.g. "∫ x*cos(x) dx"
        expression: Vec<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Skip the simulated analysis delay
        #[arg(long)]
        no_delay: bool,
    },

    /// List sample integrals
    Examples {
        /// Analyze every sample
        #[arg(long)]
        run: bool,
    },

    /// List active rules in evaluation order
    Rules,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., analysis.delay_ms)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., output.format)
        key: String,

        /// Value to set (e.g., "json" or "by-parts,trig-powers")
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Create config file with commented defaults
    Init,
}

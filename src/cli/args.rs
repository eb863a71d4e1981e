use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::common::config;

/// bucketsweep — hide and purge placeholder files in storage buckets
#[derive(Parser, Debug)]
#[command(
    name = "bucketsweep",
    version,
    about = "Hide and purge placeholder files in storage buckets",
    long_about = "bucketsweep lists storage buckets without the .emptyFolderPlaceholder\n\
                   objects and dotfiles hosted storage leaves behind, and deletes them on request.",
    after_help = "EXAMPLES:\n  \
        bucketsweep ls avatars                      List a bucket root, system files hidden\n  \
        bucketsweep ls avatars users/42 --all       Show everything, system files marked\n  \
        bucketsweep check avatars users/42          Show which files a purge would delete\n  \
        bucketsweep purge avatars users/42 --yes    Delete them\n  \
        bucketsweep --backend local --root ./data ls docs\n  \
        bucketsweep config set supabase_url https://xyz.supabase.co"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Storage backend (overrides config)
    #[arg(long, global = true, value_name = "KIND")]
    pub backend: Option<BackendArg>,

    /// Root directory for the local backend
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Output format (defaults to config's output_format)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode — minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List a directory with system files hidden
    Ls {
        /// Bucket name (defaults to config's default_bucket)
        bucket: Option<String>,

        /// Directory inside the bucket
        #[arg(default_value = "")]
        path: String,

        /// Maximum number of entries to request
        #[arg(long)]
        limit: Option<u64>,

        /// Number of entries to skip
        #[arg(long)]
        offset: Option<u64>,

        /// Only entries whose name starts with this text
        #[arg(long)]
        search: Option<String>,

        /// Show the raw listing, system files marked
        #[arg(long)]
        all: bool,
    },

    /// Report system files without deleting anything
    Check {
        /// Bucket name (defaults to config's default_bucket)
        bucket: Option<String>,

        /// Directory inside the bucket
        #[arg(default_value = "")]
        path: String,
    },

    /// Delete system files from a directory
    Purge {
        /// Bucket name (defaults to config's default_bucket)
        bucket: Option<String>,

        /// Directory inside the bucket
        #[arg(default_value = "")]
        path: String,

        /// Show what would be deleted
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset to default configuration
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Initialize bucketsweep directories and default config
    Init,

    /// Print the config file location
    Path,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

impl From<&config::OutputFormat> for OutputFormat {
    fn from(format: &config::OutputFormat) -> Self {
        match format {
            config::OutputFormat::Human => OutputFormat::Human,
            config::OutputFormat::Json => OutputFormat::Json,
            config::OutputFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

impl Cli {
    /// `--format` if given, else the configured default
    pub fn output_format(&self, config: &config::Config) -> OutputFormat {
        self.format
            .clone()
            .unwrap_or_else(|| OutputFormat::from(&config.output_format))
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BackendArg {
    Supabase,
    Local,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_purge() {
        let cli = Cli::parse_from(["bucketsweep", "purge", "docs", "2024", "-y", "--format", "json"]);
        match cli.command {
            Commands::Purge { bucket, path, yes, dry_run } => {
                assert_eq!(bucket.as_deref(), Some("docs"));
                assert_eq!(path, "2024");
                assert!(yes);
                assert!(!dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }

    #[test]
    fn test_format_falls_back_to_config() {
        let config = config::Config {
            output_format: config::OutputFormat::Quiet,
            ..config::Config::default()
        };
        let cli = Cli::parse_from(["bucketsweep", "ls", "docs"]);
        assert!(cli.format.is_none());
        assert!(matches!(cli.output_format(&config), OutputFormat::Quiet));

        let cli = Cli::parse_from(["bucketsweep", "--format", "json", "ls", "docs"]);
        assert!(matches!(cli.output_format(&config), OutputFormat::Json));
    }

    #[test]
    fn test_path_defaults_to_root() {
        let cli = Cli::parse_from(["bucketsweep", "--backend", "local", "ls", "docs"]);
        match cli.command {
            Commands::Ls { path, all, .. } => {
                assert_eq!(path, "");
                assert!(!all);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(matches!(cli.backend, Some(BackendArg::Local)));
    }
}

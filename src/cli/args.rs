use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Command line arguments for wfdocs
#[derive(Parser, Debug)]
#[command(
    name = "wfdocs",
    version = env!("CARGO_PKG_VERSION"),
    about = "Webflow documentation agent",
    long_about = "List, fetch, extract and update documentation items stored in a Webflow CMS collection through the Data API v2."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List documentation items (one page)
    List(ListArgs),
    /// Show a documentation item
    Get(GetArgs),
    /// Extract content from a documentation item
    Extract(ExtractArgs),
    /// Update a documentation item
    Update(UpdateArgs),
    /// List the collections of the configured site
    Collections,
    /// Configuration management commands
    Config(ConfigArgs),
    /// Display version information
    Version,
}

impl Command {
    /// Whether the command talks to the API and therefore needs credentials
    pub fn needs_api(&self) -> bool {
        !matches!(self, Command::Config(_) | Command::Version)
    }
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
    /// CSV output
    Csv,
}

/// `list` arguments
#[derive(ClapArgs, Debug)]
pub struct ListArgs {
    /// Maximum number of items to fetch (1-100)
    #[arg(short, long, default_value = "100", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub limit: u32,

    /// Number of items to skip
    #[arg(long, default_value = "0")]
    pub offset: u32,

    /// Save a searchable summary of the items to a file
    #[arg(short, long)]
    pub save: bool,

    /// Directory to save output files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Filename for the saved list
    #[arg(long)]
    pub filename: Option<String>,
}

/// `get` arguments
#[derive(ClapArgs, Debug)]
pub struct GetArgs {
    /// ID of the item to get
    pub item_id: String,

    /// Save the full item to a file
    #[arg(short, long)]
    pub save: bool,

    /// Directory to save output files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// `extract` arguments
#[derive(ClapArgs, Debug)]
pub struct ExtractArgs {
    /// ID of the item to extract content from
    pub item_id: String,

    /// Dotted path into fieldData, e.g. content.sections.0.text
    #[arg(short, long)]
    pub path: Option<String>,

    /// Save the extracted content to a file
    #[arg(short, long)]
    pub save: bool,

    /// Directory to save output files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// `update` arguments
#[derive(ClapArgs, Debug)]
pub struct UpdateArgs {
    /// ID of the item to update
    pub item_id: String,

    /// Dotted path into fieldData to replace
    #[arg(short, long)]
    pub path: Option<String>,

    /// New value for the path, as JSON
    #[arg(long, requires = "path", conflicts_with = "file")]
    pub content: Option<String>,

    /// Read the new content from a JSON file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Treat the content as a plain string instead of JSON
    #[arg(long)]
    pub string: bool,

    /// Set the archived flag
    #[arg(long)]
    pub is_archived: Option<bool>,

    /// Set the draft flag
    #[arg(long)]
    pub is_draft: Option<bool>,

    /// CMS locale ID for the item
    #[arg(long)]
    pub cms_locale_id: Option<String>,

    /// Print the request body instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

/// Configuration management arguments
#[derive(ClapArgs, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Validate configuration
    Validate {
        /// Configuration file path
        file: Option<PathBuf>,
    },
    /// Create default configuration
    Init {
        /// Directory to create the project configuration in
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Write the global configuration instead
        #[arg(short, long)]
        global: bool,
    },
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Text
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("wfdocs").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_list_defaults() {
        let args = parse(&["list"]).unwrap();
        match args.command {
            Command::List(list) => {
                assert_eq!(list.limit, 100);
                assert_eq!(list.offset, 0);
                assert!(!list.save);
                assert!(list.output_dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(args.output, OutputFormat::Text);
    }

    #[test]
    fn test_list_limit_range() {
        assert!(parse(&["list", "--limit", "0"]).is_err());
        assert!(parse(&["list", "--limit", "101"]).is_err());
        assert!(parse(&["list", "--limit", "5"]).is_ok());
    }

    #[test]
    fn test_extract_arguments() {
        let args = parse(&[
            "extract",
            "item1",
            "--path",
            "content.sections.0.text",
            "--save",
            "--output-dir",
            "out",
        ])
        .unwrap();
        match args.command {
            Command::Extract(extract) => {
                assert_eq!(extract.item_id, "item1");
                assert_eq!(extract.path.as_deref(), Some("content.sections.0.text"));
                assert!(extract.save);
                assert_eq!(extract.output_dir, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_update_content_requires_path() {
        assert!(parse(&["update", "item1", "--content", "\"x\""]).is_err());
        assert!(parse(&["update", "item1", "--path", "a", "--content", "\"x\""]).is_ok());
    }

    #[test]
    fn test_update_content_conflicts_with_file() {
        assert!(parse(&[
            "update", "item1", "--path", "a", "--content", "1", "--file", "f.json"
        ])
        .is_err());
        assert!(parse(&["update", "item1", "--file", "f.json"]).is_ok());
    }

    #[test]
    fn test_update_flags() {
        let args = parse(&["update", "item1", "--is-draft", "false", "--dry-run"]).unwrap();
        match args.command {
            Command::Update(update) => {
                assert_eq!(update.is_draft, Some(false));
                assert!(update.is_archived.is_none());
                assert!(update.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_output_flag_after_subcommand() {
        let args = parse(&["get", "item1", "-o", "json"]).unwrap();
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn test_needs_api() {
        assert!(parse(&["list"]).unwrap().command.needs_api());
        assert!(parse(&["collections"]).unwrap().command.needs_api());
        assert!(!parse(&["version"]).unwrap().command.needs_api());
        assert!(!parse(&["config", "show"]).unwrap().command.needs_api());
    }
}

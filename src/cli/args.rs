//! CLI argument definitions
//!
//! Global flags feed `CliArgs` for configuration; subcommands map one-to-one
//! onto `Workflow` operations.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::DocumentType;

/// docforge - outline, draft and export AI-authored documents
#[derive(Parser, Debug)]
#[command(name = "docforge")]
#[command(about = "Outline, draft and export AI-authored Word documents and slide decks")]
#[command(long_about = r#"
docforge turns a topic into an outline, drafts each section with a text
generation provider, and packages the result as a .docx or .pptx file.

EXAMPLES:
  # Suggest section titles for a report
  docforge outline "Renewable energy adoption" --type document

  # Draft one section
  docforge section --topic "Renewable energy adoption" --title "Market Analysis"

  # Rework existing text
  docforge refine --file intro.txt --instruction "make it more concise"

  # Package a project file
  docforge export project.json --output exports/

  # Outline, draft and export in one go, offline
  docforge --provider mock draft "Quarterly review" --type presentation

CONFIGURATION:
  Precedence: CLI flags > DOCFORGE_* environment > config file > defaults
  The config file is discovered by searching upward from the current directory
  for .docforge/config.toml, or read from $DOCFORGE_HOME/config.toml.
  Use --config to name a file explicitly and `docforge config` to inspect.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Generation provider: auto, mock or gemini
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Attempts per generation call (1-10)
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Identity charged against the rate limit
    #[arg(long, global = true, default_value = "local")]
    pub identity: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Container selector accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TypeArg {
    #[value(alias = "docx")]
    Document,
    #[value(alias = "pptx")]
    Presentation,
}

impl From<TypeArg> for DocumentType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::Document => Self::Document,
            TypeArg::Presentation => Self::Presentation,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a free-form prompt and print the response
    Generate {
        /// Prompt text
        prompt: String,
    },

    /// Suggest section (document) or slide (presentation) titles
    Outline {
        /// What the document is about
        topic: String,

        /// Container the outline is for
        #[arg(long = "type", value_enum, default_value = "document")]
        document_type: TypeArg,

        /// Print the titles as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Draft the body of one section
    Section {
        /// What the document is about
        #[arg(long)]
        topic: String,

        /// Section title
        #[arg(long)]
        title: String,
    },

    /// Rework existing content according to an instruction
    Refine {
        /// Content to rework
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        content: Option<String>,

        /// Read the content from a file instead
        #[arg(long)]
        file: Option<PathBuf>,

        /// What to change
        #[arg(long)]
        instruction: String,
    },

    /// Package a project file as .docx or .pptx
    Export {
        /// JSON file: {"topic", "document_type", "sections": [{"title", "content"}]}
        project: PathBuf,

        /// Directory to write into (defaults to [export] output_dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Outline, draft every section, then export
    Draft {
        /// What the document is about
        topic: String,

        /// Container to produce
        #[arg(long = "type", value_enum, default_value = "document")]
        document_type: TypeArg,

        /// Directory to write into (defaults to [export] output_dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show the remaining rate-limit quota for the identity
    ///
    /// Rate-limit windows are kept in process memory and are not persisted
    /// between runs, so a fresh `docforge` process always reports the full
    /// quota and a zero reset time.
    Limits {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration and where each value came from
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Operation name used in logs and error reports
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Generate { .. } => "generate",
            Self::Outline { .. } => "outline",
            Self::Section { .. } => "section",
            Self::Refine { .. } => "refine",
            Self::Export { .. } => "export",
            Self::Draft { .. } => "draft",
            Self::Limits { .. } => "limits",
            Self::Config { .. } => "config",
        }
    }

    /// `--output`, for the commands that write files
    #[must_use]
    pub fn output_dir(&self) -> Option<PathBuf> {
        match self {
            Self::Export { output, .. } | Self::Draft { output, .. } => output.clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "docforge",
            "outline",
            "Solar",
            "--type",
            "pptx",
            "--provider",
            "mock",
            "--identity",
            "alice",
        ])
        .unwrap();
        assert_eq!(cli.provider.as_deref(), Some("mock"));
        assert_eq!(cli.identity, "alice");
        match cli.command {
            Commands::Outline { document_type, .. } => {
                assert_eq!(DocumentType::from(document_type), DocumentType::Presentation);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_identity_defaults_to_local() {
        let cli = Cli::try_parse_from(["docforge", "limits"]).unwrap();
        assert_eq!(cli.identity, "local");
        assert_eq!(cli.command.operation(), "limits");
    }

    #[test]
    fn test_refine_needs_content_or_file() {
        assert!(Cli::try_parse_from(["docforge", "refine", "--instruction", "x"]).is_err());
        assert!(
            Cli::try_parse_from([
                "docforge",
                "refine",
                "--content",
                "a",
                "--file",
                "b.txt",
                "--instruction",
                "x"
            ])
            .is_err()
        );
        assert!(
            Cli::try_parse_from(["docforge", "refine", "--content", "a", "--instruction", "x"])
                .is_ok()
        );
    }

    #[test]
    fn test_unknown_type_rejected_by_parser() {
        assert!(Cli::try_parse_from(["docforge", "outline", "T", "--type", "pdf"]).is_err());
    }

    #[test]
    fn test_output_dir_only_for_writing_commands() {
        let cli =
            Cli::try_parse_from(["docforge", "export", "p.json", "--output", "out"]).unwrap();
        assert_eq!(cli.command.output_dir(), Some(PathBuf::from("out")));
        let cli = Cli::try_parse_from(["docforge", "config"]).unwrap();
        assert_eq!(cli.command.output_dir(), None);
    }
}

//! CLI entry point and dispatch logic
//!
//! `run()` parses arguments, installs logging, resolves configuration,
//! creates the tokio runtime, dispatches to a command handler and owns all
//! error output. `main` only maps the returned code to the process exit.

use anyhow::Result;
use clap::Parser;

use super::args::{Cli, Commands};
use super::commands;

use crate::{CliArgs, Config, DocforgeError, ExitCode};
use docforge_utils::logging::{init_tracing, log_operation_error};
use docforge_utils::redaction::redact_error_message;

/// Main CLI execution function.
///
/// Returns `Err(ExitCode)` after the error has already been printed.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose, cli.log_json) {
        eprintln!("✗ Failed to initialize logging: {e}");
        return Err(ExitCode::INTERNAL);
    }

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        llm_provider: cli.provider.clone(),
        max_retries: cli.max_retries,
        output_dir: cli.command.output_dir(),
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            // Unreadable or invalid configuration is a usage error whatever its cause
            report_error(&err, "config");
            return Err(ExitCode::CLI_ARGS);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let operation = cli.command.operation();
    let identity = cli.identity;

    let result = rt.block_on(async {
        match cli.command {
            Commands::Generate { prompt } => {
                commands::execute_generate_command(&prompt, &identity, &config).await
            }
            Commands::Outline {
                topic,
                document_type,
                json,
            } => {
                commands::execute_outline_command(
                    &topic,
                    document_type.into(),
                    json,
                    &identity,
                    &config,
                )
                .await
            }
            Commands::Section { topic, title } => {
                commands::execute_section_command(&topic, &title, &identity, &config).await
            }
            Commands::Refine {
                content,
                file,
                instruction,
            } => {
                commands::execute_refine_command(
                    content.as_deref(),
                    file.as_deref(),
                    &instruction,
                    &identity,
                    &config,
                )
                .await
            }
            Commands::Export { project, .. } => commands::execute_export_command(&project, &config),
            Commands::Draft {
                topic,
                document_type,
                ..
            } => {
                commands::execute_draft_command(&topic, document_type.into(), &identity, &config)
                    .await
            }
            Commands::Limits { json } => commands::execute_limits_command(json, &identity, &config),
            Commands::Config { json } => commands::execute_config_command(json, &config),
        }
    });

    match result {
        Ok(()) => Ok(()),
        Err(error) => Err(report_error(&error, operation)),
    }
}

/// Print `error` for the user and pick the exit code
fn report_error(error: &anyhow::Error, operation: &str) -> ExitCode {
    log_operation_error(operation, &format!("{error:#}"));

    if let Some(docforge_error) = error.downcast_ref::<DocforgeError>() {
        eprint!("{}", redact_error_message(&docforge_error.display_for_user()));
        return docforge_error.to_exit_code();
    }

    eprintln!("✗ {operation} failed: {}", redact_error_message(&format!("{error:#}")));
    if let Some(suggestions) = enhance_error_context(error) {
        eprintln!("\n  Suggestions:");
        for (i, suggestion) in suggestions.iter().enumerate() {
            eprintln!("    {}. {}", i + 1, suggestion);
        }
    }
    eprintln!("\n  Run with --verbose for more detailed output");

    ExitCode::INTERNAL
}

/// Suggestions for common anyhow-level failures
fn enhance_error_context(error: &anyhow::Error) -> Option<Vec<String>> {
    let error_str = format!("{error:#}");

    if error_str.contains("Permission denied") {
        Some(vec![
            "Check file and directory permissions".to_string(),
            "Choose a writable directory with --output".to_string(),
        ])
    } else if error_str.contains("No such file or directory") {
        Some(vec![
            "Verify the specified paths exist".to_string(),
            "Check that you're running from the correct directory".to_string(),
        ])
    } else if error_str.contains("config") {
        Some(vec![
            "Run `docforge config` to see the effective configuration".to_string(),
            "Check .docforge/config.toml for typos or unknown keys".to_string(),
        ])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docforge_utils::error::{ExportError, LlmError};

    #[test]
    fn test_report_error_uses_typed_exit_codes() {
        let err = anyhow::Error::new(DocforgeError::from(LlmError::RateLimitExceeded {
            identity: "u".to_string(),
            reset_in_ms: 1_000,
        }));
        assert_eq!(report_error(&err, "outline"), ExitCode::RATE_LIMITED);

        let err = anyhow::Error::new(DocforgeError::from(ExportError::AssemblyFailure {
            format: "Word document".to_string(),
        }))
        .context("Failed to export project");
        assert_eq!(report_error(&err, "export"), ExitCode::EXPORT_FAILURE);
    }

    #[test]
    fn test_report_error_falls_back_to_internal() {
        let err = anyhow::anyhow!("something odd");
        assert_eq!(report_error(&err, "generate"), ExitCode::INTERNAL);
    }

    #[test]
    fn test_enhance_error_context() {
        let err = anyhow::anyhow!("open out.docx: Permission denied (os error 13)");
        assert!(enhance_error_context(&err).is_some());
        assert!(enhance_error_context(&anyhow::anyhow!("boom")).is_none());
    }
}

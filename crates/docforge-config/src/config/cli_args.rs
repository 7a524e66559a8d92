use std::path::PathBuf;

/// CLI-supplied overrides, already parsed by the binary.
///
/// `None` means "not given on the command line".
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file path (skips discovery)
    pub config_path: Option<PathBuf>,
    /// `--provider`
    pub llm_provider: Option<String>,
    /// `--max-retries`
    pub max_retries: Option<u32>,
    /// `--output`
    pub output_dir: Option<PathBuf>,
}

//! Exit code constants for the docforge CLI.
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments, configuration or input |
//! | 70 | `GENERATION_FAILURE` | Text generation or outline extraction failed |
//! | 73 | `EXPORT_FAILURE` | The document package could not be written |
//! | 75 | `RATE_LIMITED` | The identity exhausted its request window |

/// Typed process exit code.
///
/// ```rust
/// use docforge_utils::ExitCode;
///
/// assert_eq!(ExitCode::RATE_LIMITED.as_i32(), 75);
/// assert_eq!(ExitCode::from_i32(0), ExitCode::SUCCESS);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid arguments, configuration or input
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Generation failure - provider failed, retries exhausted, or no outline found
    pub const GENERATION_FAILURE: ExitCode = ExitCode(70);

    /// Export failure - package writer failed
    pub const EXPORT_FAILURE: ExitCode = ExitCode(73);

    /// Rate limited - identity must wait for its window to reset
    pub const RATE_LIMITED: ExitCode = ExitCode(75);

    /// Get the numeric exit code value.
    ///
    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

//! docforge CLI binary
//!
//! All logic is in the library; main.rs only invokes cli::run().

fn main() {
    // cli::run() prints its own errors and returns the code to exit with
    if let Err(code) = docforge::cli::run() {
        std::process::exit(code.as_i32());
    }
}

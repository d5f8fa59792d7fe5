//! Product catalog entry point
//!
//! Parses arguments and dispatches to the CLI module; prints fatal errors to
//! stderr and exits non-zero.

use product_catalog::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

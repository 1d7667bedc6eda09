//! shiftpay main entrypoint.

use shiftpay::run;
use shiftpay::ui::messages::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_env("SHIFTPAY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        error(e);
        std::process::exit(1);
    }
}

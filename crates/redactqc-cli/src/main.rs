//! redactqc - PDF PII-detection QA tool.
//!
//! Bootstraps the embedded store and either serves the local dashboard API
//! or drives a one-off scan from the command line.

mod cli;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // A worker child is re-exec'd with this hidden flag as argv[1]; check
    // for it before anything else (arg parsing, .env, tracing, tokio) so a
    // worker process pays no cost for machinery it never uses.
    if std::env::args().nth(1).as_deref() == Some(redactqc_worker::WORKER_FLAG) {
        redactqc_worker::main_loop::run();
        return Ok(());
    }

    let _ = dotenvy::dotenv();

    let default_filter = if cli::is_verbose() {
        "redactqc=debug,redactqc_core=debug,redactqc_batch=debug,redactqc_worker=debug,redactqc_extract=debug,redactqc_detect=debug,redactqc_server=debug"
    } else {
        "redactqc=info,redactqc_core=info,redactqc_batch=info,redactqc_worker=info,redactqc_extract=info,redactqc_detect=info,redactqc_server=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(cli::run())
}

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "slidedeck=info";

/// Installs the global `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` overrides the default filter, e.g. `RUST_LOG=slidedeck=debug`.
/// Returns false if a subscriber was already installed.
pub fn init(verbose: bool) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "slidedeck=debug" } else { DEFAULT_FILTER })
    });

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true),
    );

    if subscriber.try_init().is_err() {
        return false;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    true
}

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for the function. ANSI colors are disabled so the
/// output stays readable in CloudWatch.
pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "cloudvideo=debug".into()))
        .with(tracing_subscriber::fmt::layer().with_ansi(false))
        .init();
}

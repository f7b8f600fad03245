use std::sync::atomic::Ordering;
use std::sync::Arc;

use ctxlog::init::{init_tracing_with_config, LayerConfig};
use ctxlog::{Flags, Level, Logger};
use tracing::{error, info, info_span, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = Arc::new(Logger::new(Arc::new(std::io::stdout()), "", Flags::STD | Flags::UTC));
    logger.set_level(Level::INFO);
    let stats = init_tracing_with_config(logger, LayerConfig::default())?;

    info!("starting service");

    let service = info_span!("service", service = "auth");
    let _service = service.enter();
    let request = info_span!("request", request_id = 7);
    let _request = request.enter();

    warn!(attempt = 3, "retrying");
    error!(user_id = 42, reason = "invalid password", "authentication failed");
    tracing::debug!("below threshold, not written");

    println!(
        "seen={} written={} failed={}",
        stats.total_events.load(Ordering::Relaxed),
        stats.written_events.load(Ordering::Relaxed),
        stats.failed_events.load(Ordering::Relaxed),
    );
    Ok(())
}

use std::sync::Arc;
use std::time::Instant;

use ctxlog::{fields, Ctx, Discard, Flags, Logger};

fn run(label: &str, logger: &Logger, n: u64) -> ctxlog::Result<()> {
    let ctx = Ctx::background().with(fields! { "service" => "load" });
    let start = Instant::now();

    for i in 0..n {
        logger.error(&ctx, "load test error", &fields! { "iteration" => i })?;
    }

    let elapsed = start.elapsed();
    println!(
        "{}: {} records in {:?} (~{:.0} rec/s)",
        label,
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let n: u64 = 100_000;

    run("discard", &Logger::new(Arc::new(Discard), "", Flags::STD), n)?;

    let sink = Arc::new(std::sync::Mutex::new(std::io::sink()));
    run("io::sink", &Logger::new(sink, "", Flags::STD), n)?;
    Ok(())
}

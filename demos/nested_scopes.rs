use std::sync::Arc;

use ctxlog::{fields, Ctx, Flags, Logger};

fn handle(logger: &Logger, ctx: &Ctx, request_id: u64) -> ctxlog::Result<()> {
    let ctx = ctx.with(fields! { "request_id" => request_id, "shard" => request_id % 4 });
    logger.info(&ctx, "request received", &fields! {})?;

    // The call-site value shadows the scope's shard; "level" is written as
    // "field.level" so it cannot overwrite the record's own level.
    logger.warn(
        &ctx,
        "slow request",
        &fields! { "shard" => "overflow", "level" => "p99" },
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logger = Logger::new(Arc::new(std::io::stdout()), "", Flags::STD | Flags::UTC | Flags::SHORT_FILE);

    let service = Ctx::background().with(fields! { "service" => "auth", "region" => "eu-west-1" });
    for request_id in 1..=3 {
        handle(&logger, &service, request_id)?;
    }
    Ok(())
}

use ctxlog::{fields, Ctx, Fields};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Honors CTXLOG_LEVEL, CTXLOG_PREFIX, CTXLOG_FLAGS and CTXLOG_DESTINATION.
    ctxlog::init::init_from_env()?;

    let ctx = Ctx::background();
    ctxlog::init::info(&ctx, "starting service", &Fields::new())?;
    ctxlog::init::error(
        &ctx,
        "authentication failed",
        &fields! { "user_id" => 42, "reason" => "invalid password" },
    )?;
    ctxlog::init::debug(&ctx, "ratio", &fields! { "value" => 0.000001, "big" => 1e21 })?;
    Ok(())
}

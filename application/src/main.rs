use std::{io, sync::OnceLock};

use application::{runner, Args, Config, Draft};
use service::{infra::Http, Service};
use tokio::task::LocalSet;
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    if start().await.is_err() {
        std::process::exit(1);
    }
}

async fn start() -> Result<(), ()> {
    let Args { config, draft } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config { backend, log } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let draft = Draft::load(&draft).map_err(|e| {
        log::error!("failed to load `Draft` from `{draft}`: {e}");
    })?;

    let http = Http::new((&backend).into()).map_err(|e| {
        log::error!("failed to initialize `Http` backend: {e}");
    })?;
    let service = Service::new((&backend).into(), http);

    let today = time::OffsetDateTime::now_utc().date();
    let reservation = LocalSet::new()
        .run_until(runner::run(&service, draft, today))
        .await
        .map_err(|e| log::error!("reservation failed: {e}"))?;

    log::info!(
        "reserved unit `{}` as reservation `{}`{}{}",
        reservation
            .unit_id
            .map_or_else(|| "?".to_owned(), |id| id.to_string()),
        reservation.id,
        reservation
            .client
            .as_ref()
            .map(|c| format!(" for `{}`", c.name))
            .unwrap_or_default(),
        reservation
            .status
            .as_deref()
            .map(|s| format!(", status `{s}`"))
            .unwrap_or_default(),
    );
    if let (Some(price), Some(down)) =
        (reservation.final_price, reservation.down_payment)
    {
        log::info!("final price {price}, down payment {down}");
    }

    Ok(())
}

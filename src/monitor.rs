use std::time::Duration;

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::MonitorResult;
use crate::render::Renderer;
use crate::services::octoprint::StatusSource;

/// What a single tick ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered,
    /// A fetch failed, nothing was rendered
    Skipped,
    RenderFailed,
}

/// Show the banner, then poll until the task is aborted or Ctrl-C arrives
pub async fn run<S>(
    source: S,
    mut renderer: Box<dyn Renderer>,
    refresh: Duration,
) -> MonitorResult<()>
where
    S: StatusSource + 'static,
{
    show_welcome(&source, renderer.as_mut()).await?;

    info!(refresh_secs = refresh.as_secs_f64(), "Status monitor started");
    let handle = tokio::spawn(poll_loop(source, renderer, refresh));

    tokio::select! {
        joined = handle => joined?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown signal received");
        }
    }

    Ok(())
}

/// Fetch the server version and show the welcome banner with it, if available
pub async fn show_welcome<S>(source: &S, renderer: &mut dyn Renderer) -> MonitorResult<()>
where
    S: StatusSource + ?Sized,
{
    let version = match source.version().await {
        Ok(version) => {
            info!(
                server = %version.server,
                api = %version.api,
                text = version.text.as_deref().unwrap_or_default(),
                "Connected to OctoPrint"
            );
            Some(version)
        }
        Err(e) => {
            warn!(error = %e, "Could not fetch OctoPrint version");
            None
        }
    };
    blocking(|| renderer.welcome(version.as_ref()))
}

/// Run renderer work that may sleep on device I/O. On a multi-threaded
/// runtime the worker is handed off so other tasks keep running.
pub fn blocking<T>(work: impl FnOnce() -> T) -> T {
    match Handle::try_current().map(|handle| handle.runtime_flavor()) {
        Ok(RuntimeFlavor::MultiThread) => task::block_in_place(work),
        _ => work(),
    }
}

/// Tick every `refresh`, starting one interval from now. Never returns.
pub async fn poll_loop<S>(source: S, mut renderer: Box<dyn Renderer>, refresh: Duration)
where
    S: StatusSource,
{
    let mut ticker = time::interval_at(Instant::now() + refresh, refresh);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let outcome = tick(&source, renderer.as_mut()).await;
        debug!(?outcome, "Tick finished");
    }
}

/// Fetch status and progress together and render them if both succeeded
pub async fn tick<S>(source: &S, renderer: &mut dyn Renderer) -> TickOutcome
where
    S: StatusSource + ?Sized,
{
    let (status, progress) = tokio::join!(source.printer_status(), source.progress());

    match (status, progress) {
        (Ok(status), Ok(progress)) => {
            match blocking(|| renderer.render(status, progress.as_ref())) {
                Ok(()) => TickOutcome::Rendered,
                Err(e) => {
                    warn!(error = %e, "Failed to render printer status");
                    TickOutcome::RenderFailed
                }
            }
        }
        (status, progress) => {
            warn!(
                status_error = ?status.err().map(|e| e.to_string()),
                progress_error = ?progress.err().map(|e| e.to_string()),
                "Could not fetch printer state, skipping this tick"
            );
            TickOutcome::Skipped
        }
    }
}

/// One-shot check: banner, one fetch, one render. Fetch errors are returned.
pub async fn run_once<S>(source: &S, renderer: &mut dyn Renderer) -> MonitorResult<()>
where
    S: StatusSource + ?Sized,
{
    show_welcome(source, renderer).await?;

    let (status, progress) = tokio::join!(source.printer_status(), source.progress());
    let status = status?;
    let progress = progress?;
    blocking(|| renderer.render(status, progress.as_ref()))
}

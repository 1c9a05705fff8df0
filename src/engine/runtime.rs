// src/engine/runtime.rs

use std::future::Future;
use std::time::Duration;

use tracing::{error, info};

use crate::errors::Result;

use super::{process_pass, PassContext, PassSummary};

/// Run passes over the input root.
///
/// - `interval = None`: one pass; its error (if any) is returned.
/// - `interval = Some(d)`: a pass every `d` until `shutdown` resolves. A
///   failed pass is logged and retried on the next tick.
///
/// Returns the summary of the last completed pass.
pub async fn run_passes<S>(
    ctx: &PassContext<'_>,
    interval: Option<Duration>,
    shutdown: S,
) -> Result<PassSummary>
where
    S: Future<Output = ()>,
{
    let Some(interval) = interval else {
        return process_pass(ctx).await;
    };

    info!(?interval, "polling input path");
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut last = PassSummary::default();

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown requested, stopping");
                return Ok(last);
            }
            _ = ticker.tick() => {
                match process_pass(ctx).await {
                    Ok(summary) => last = summary,
                    Err(e) => error!(error = %e, "pass failed"),
                }
            }
        }
    }
}

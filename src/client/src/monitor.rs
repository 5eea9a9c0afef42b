use crate::watchdog_client::WatchdogClient;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Continuous-mode scan loop. Runs one tick per interval until the
/// cancellation token fires; the token is only checked between ticks, so a
/// tick always completes cleanly or is skipped whole. A failed tick is
/// logged and the loop carries on.
pub async fn monitor(mut client: WatchdogClient, cancellation_token: CancellationToken) {
    let mut scan_interval = tokio::time::interval(Duration::from_secs(
        client.get_config().scan_interval_secs.max(1),
    ));
    scan_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancellation_token.cancelled() => {
                info!("Scan loop cancelled, shutting down");
                break;
            }

            _ = scan_interval.tick() => {
                match client.run_scan_tick().await {
                    Ok(0) => debug!("Cycle complete, no new events"),
                    Ok(events) => debug!("Cycle complete, events logged this cycle: {}", events),
                    Err(e) => warn!("Scan tick skipped: {e:#}"),
                }
            }
        }
    }
}

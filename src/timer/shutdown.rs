use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Cancels `cancelation` once the user presses Ctrl-C. Returns early if something else cancels it
/// first, so it can be joined with the countdown.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(_) => {
                info!("Received interrupt");
                cancelation.cancel();
            }
            Err(e) => {
                error!("Failed to listen for interrupts {e:?}");
                cancelation.cancelled().await;
            }
        },
        _ = cancelation.cancelled() => (),
    };
}

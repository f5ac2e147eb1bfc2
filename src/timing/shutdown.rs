use tokio::select;
use tokio_util::sync::CancellationToken;

/// Turns Ctrl-C into cancellation of the tick loop, which in turn closes
/// the open session before the process exits. Without this a killed run
/// would leave an open session in the slot for the next load to recover.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
    };
}

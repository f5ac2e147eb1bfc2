use anyhow::Result;

/// The whole application runs on a single thread: every store mutation is
/// dispatched serially by this runtime's event loop.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

use std::future::Future;

/// Spawns an async task that runs to completion in the background without
/// being awaited.
///
/// Inside an ambient tokio runtime the task joins it; otherwise it lands on a
/// lazily-created single-worker runtime owned by this module. Either way the
/// caller returns immediately and never observes completion.
pub fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    use std::sync::LazyLock;
    use tokio::runtime::{Builder, Handle, Runtime};

    static BACKGROUND_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
        Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("analytics-dispatch")
            .enable_all()
            .build()
            .expect("failed to build background dispatch runtime")
    });

    if let Ok(handle) = Handle::try_current() {
        handle.spawn(future);
        return;
    }

    let _ = BACKGROUND_RUNTIME.spawn(future);
}

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

type ShutdownHook = Box<dyn Fn()>;

/// Identifies one open note window for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowTicket {
    pub id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    StillRunning { open_windows: usize },
    ShutdownRequested,
}

/// Counts open note windows and fires the shutdown hook when the last closes.
///
/// Owned by the application and handed to every window it creates.
pub struct WindowLifecycle {
    open_windows: AtomicUsize,
    next_window_id: AtomicU64,
    shutdown_signaled: AtomicBool,
    on_shutdown: ShutdownHook,
}

impl WindowLifecycle {
    pub fn new(on_shutdown: impl Fn() + 'static) -> Self {
        Self {
            open_windows: AtomicUsize::new(0),
            next_window_id: AtomicU64::new(1),
            shutdown_signaled: AtomicBool::new(false),
            on_shutdown: Box::new(on_shutdown),
        }
    }

    pub fn open_windows(&self) -> usize {
        self.open_windows.load(Ordering::SeqCst)
    }

    pub fn shutdown_signaled(&self) -> bool {
        self.shutdown_signaled.load(Ordering::SeqCst)
    }

    pub fn on_window_created(&self) -> WindowTicket {
        let open_windows = self.open_windows.fetch_add(1, Ordering::SeqCst) + 1;
        let id = self.next_window_id.fetch_add(1, Ordering::SeqCst);
        tracing::info!(window = id, open_windows, "note window created");
        WindowTicket { id }
    }

    pub fn on_window_closed(&self, ticket: WindowTicket) -> CloseOutcome {
        // decrement and read back the result in one step
        let previous = self
            .open_windows
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |open| {
                Some(open.saturating_sub(1))
            })
            .unwrap_or_default();
        let open_windows = previous.saturating_sub(1);
        tracing::info!(window = ticket.id, open_windows, "note window closed");

        if open_windows > 0 {
            return CloseOutcome::StillRunning { open_windows };
        }

        if !self.shutdown_signaled.swap(true, Ordering::SeqCst) {
            tracing::info!("last note window closed; shutting down");
            (self.on_shutdown)();
        }
        CloseOutcome::ShutdownRequested
    }
}

impl std::fmt::Debug for WindowLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowLifecycle")
            .field("open_windows", &self.open_windows())
            .field("shutdown_signaled", &self.shutdown_signaled())
            .finish_non_exhaustive()
    }
}

use std::ffi::OsStr;
use std::process::Command;

const WMCTRL_COMMAND: &str = "wmctrl";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinBackend {
    /// Compositor-native pin through Hyprland IPC.
    Hyprland,
    /// Host-level keep-above window flag.
    WindowFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOutcome {
    /// The window manager confirmed the change.
    Applied,
    /// The keep-above flag stands, but no window manager acknowledged it.
    Recorded,
    /// Nothing changed; the note keeps its previous pin state.
    Failed,
}

impl PinOutcome {
    pub fn keeps_request(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// Keeps a note window above all others.
///
/// `set_pinned` may wait on IPC and runs on a worker thread.
pub trait PlatformPinner: Send + Sync {
    fn backend(&self) -> PinBackend;
    fn set_pinned(&self, pinned: bool) -> PinOutcome;
}

/// Chosen once at startup from the environment.
pub fn select_pin_backend(hyprland_signature: Option<&OsStr>) -> PinBackend {
    match hyprland_signature {
        Some(signature) if !signature.is_empty() => PinBackend::Hyprland,
        _ => PinBackend::WindowFlag,
    }
}

pub fn detect_pin_backend() -> PinBackend {
    let signature = std::env::var_os("HYPRLAND_INSTANCE_SIGNATURE");
    let backend = select_pin_backend(signature.as_deref());
    tracing::info!(?backend, "selected pin backend");
    backend
}

/// Generic keep-above flag. Forwarded to `_NET_WM_STATE_ABOVE` through
/// `wmctrl` when that tool is installed; otherwise the flag is only kept in
/// the note's pin state.
#[derive(Debug)]
pub struct WindowFlagPinner {
    title: String,
}

impl WindowFlagPinner {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

pub(crate) fn wmctrl_above_args(title: &str, pinned: bool) -> [String; 4] {
    let action = if pinned { "add,above" } else { "remove,above" };
    [
        "-r".to_string(),
        title.to_string(),
        "-b".to_string(),
        action.to_string(),
    ]
}

impl PlatformPinner for WindowFlagPinner {
    fn backend(&self) -> PinBackend {
        PinBackend::WindowFlag
    }

    fn set_pinned(&self, pinned: bool) -> PinOutcome {
        if self.title.is_empty() {
            return PinOutcome::Recorded;
        }

        match Command::new(WMCTRL_COMMAND)
            .args(wmctrl_above_args(&self.title, pinned))
            .output()
        {
            Ok(result) if result.status.success() => {
                tracing::debug!(title = self.title, pinned, "applied keep-above flag");
                PinOutcome::Applied
            }
            Ok(result) => {
                let stderr = String::from_utf8_lossy(&result.stderr);
                tracing::debug!(
                    title = self.title,
                    pinned,
                    status = result.status.code(),
                    stderr = stderr.trim(),
                    "wmctrl returned non-zero status; keeping recorded flag"
                );
                PinOutcome::Recorded
            }
            Err(err) => {
                tracing::debug!(
                    title = self.title,
                    pinned,
                    ?err,
                    "wmctrl unavailable; keeping recorded flag"
                );
                PinOutcome::Recorded
            }
        }
    }
}

/// Pinned flag of a single note.
///
/// A toggle is split in two so the platform request can run off the UI
/// thread: `begin_toggle` hands out the target state, `finish_toggle`
/// commits it once the pinner reports back. Only one request is in flight.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PinState {
    pinned: bool,
    pending: Option<bool>,
}

impl PinState {
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Target state for a new request, or `None` while one is in flight.
    pub fn begin_toggle(&mut self) -> Option<bool> {
        if self.pending.is_some() {
            return None;
        }
        let target = !self.pinned;
        self.pending = Some(target);
        Some(target)
    }

    pub fn finish_toggle(&mut self, outcome: PinOutcome) -> bool {
        let Some(target) = self.pending.take() else {
            return self.pinned;
        };
        if outcome.keeps_request() {
            self.pinned = target;
        } else {
            tracing::warn!(requested = target, "pin request failed; keeping previous state");
        }
        tracing::info!(pinned = self.pinned, ?outcome, "pin request finished");
        self.pinned
    }
}

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use gtk4::gdk;
use gtk4::prelude::*;

use crate::drag::WindowMover;
use crate::geometry::{PointerDelta, PointerPosition};
use crate::pin::{PinBackend, PinOutcome, PlatformPinner, WindowFlagPinner};

use super::hypr::{
    cursor_position, lookup_window_address, request_window_move, request_window_pin,
};
use super::worker::spawn_worker_action;

/// Window identity the compositor adapters match on.
#[derive(Debug, Clone)]
pub(super) struct NoteWindowId {
    pub(super) name: String,
    pub(super) title: String,
}

#[derive(Debug)]
pub(super) struct HyprlandPinner {
    id: NoteWindowId,
}

impl PlatformPinner for HyprlandPinner {
    fn backend(&self) -> PinBackend {
        PinBackend::Hyprland
    }

    fn set_pinned(&self, pinned: bool) -> PinOutcome {
        if request_window_pin(&self.id.name, &self.id.title, pinned) {
            PinOutcome::Applied
        } else {
            PinOutcome::Failed
        }
    }
}

pub(super) fn pinner_for(backend: PinBackend, id: &NoteWindowId) -> Arc<dyn PlatformPinner> {
    match backend {
        PinBackend::Hyprland => Arc::new(HyprlandPinner { id: id.clone() }),
        PinBackend::WindowFlag => Arc::new(WindowFlagPinner::new(id.title.clone())),
    }
}

/// Moves a note by pixel deltas through `movewindowpixel`.
///
/// Sub-pixel remainders are carried over so slow drags still add up.
#[derive(Debug)]
pub(super) struct HyprlandMover {
    name: String,
    address: Rc<RefCell<Option<String>>>,
    remainder: Cell<(f64, f64)>,
}

impl HyprlandMover {
    fn new(id: &NoteWindowId) -> Self {
        let address = Rc::new(RefCell::new(None::<String>));
        let title = id.title.clone();
        let name = id.name.clone();
        let address_slot = address.clone();
        spawn_worker_action(
            move || lookup_window_address(&title),
            move |resolved| {
                if resolved.is_none() {
                    tracing::warn!(window = name, "note window address unresolved; drag disabled");
                }
                *address_slot.borrow_mut() = resolved;
            },
        );
        Self {
            name: id.name.clone(),
            address,
            remainder: Cell::new((0.0, 0.0)),
        }
    }
}

pub(super) fn whole_pixels(remainder: (f64, f64), delta: PointerDelta) -> ((i32, i32), (f64, f64)) {
    let total_x = remainder.0 + delta.dx;
    let total_y = remainder.1 + delta.dy;
    let step_x = total_x.trunc();
    let step_y = total_y.trunc();
    ((step_x as i32, step_y as i32), (total_x - step_x, total_y - step_y))
}

impl WindowMover for HyprlandMover {
    fn move_by(&self, delta: PointerDelta) {
        let Some(address) = self.address.borrow().clone() else {
            tracing::debug!(window = self.name, "move requested before address lookup finished");
            return;
        };
        let ((dx, dy), remainder) = whole_pixels(self.remainder.get(), delta);
        self.remainder.set(remainder);
        if dx == 0 && dy == 0 {
            return;
        }
        request_window_move(&self.name, &address, dx, dy);
    }
}

/// How a drag that starts in the handle region reaches the window manager.
#[derive(Debug)]
pub(super) enum NoteMover {
    /// Per-motion deltas sent to Hyprland with screen positions from its socket.
    Hyprland(HyprlandMover),
    /// A compositor-driven interactive move started from the press.
    Toplevel,
}

impl NoteMover {
    pub(super) fn for_backend(backend: PinBackend, id: &NoteWindowId) -> Self {
        match backend {
            PinBackend::Hyprland => Self::Hyprland(HyprlandMover::new(id)),
            PinBackend::WindowFlag => Self::Toplevel,
        }
    }

    pub(super) fn screen_position(&self) -> Option<PointerPosition> {
        match self {
            Self::Hyprland(_) => cursor_position(),
            Self::Toplevel => None,
        }
    }

    pub(super) fn delta_mover(&self) -> Option<&dyn WindowMover> {
        match self {
            Self::Hyprland(mover) => Some(mover as &dyn WindowMover),
            Self::Toplevel => None,
        }
    }

    pub(super) fn is_interactive(&self) -> bool {
        matches!(self, Self::Toplevel)
    }
}

/// Hands the rest of the gesture to the compositor.
pub(super) fn begin_interactive_move(
    window: &gtk4::ApplicationWindow,
    device: &gdk::Device,
    button: u32,
    position: PointerPosition,
    timestamp: u32,
) -> bool {
    let Some(surface) = window.surface() else {
        return false;
    };
    let Some(toplevel) = surface.downcast_ref::<gdk::Toplevel>() else {
        return false;
    };
    let button = i32::try_from(button).unwrap_or(1);
    toplevel.begin_move(device, button, position.x, position.y, timestamp);
    true
}

pub(super) fn begin_interactive_resize(
    window: &gtk4::ApplicationWindow,
    gesture: &gtk4::GestureDrag,
    x: f64,
    y: f64,
) {
    let Some(surface) = window.surface() else {
        return;
    };
    let Some(toplevel) = surface.downcast_ref::<gdk::Toplevel>() else {
        return;
    };
    let device = gesture.device();
    toplevel.begin_resize(
        gdk::SurfaceEdge::SouthEast,
        device.as_ref(),
        1,
        x,
        y,
        gesture.current_event_time(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_pixels_carries_fractional_motion() {
        let (step, remainder) = whole_pixels((0.0, 0.0), PointerDelta::new(0.6, -0.4));
        assert_eq!(step, (0, 0));
        let (step, remainder) = whole_pixels(remainder, PointerDelta::new(0.6, -0.7));
        assert_eq!(step, (1, -1));
        assert!((remainder.0 - 0.2).abs() < 1e-9);
        assert!((remainder.1 + 0.1).abs() < 1e-9);
    }

    #[test]
    fn whole_pixels_passes_integer_deltas_through() {
        let (step, remainder) = whole_pixels((0.0, 0.0), PointerDelta::new(10.0, 30.0));
        assert_eq!(step, (10, 30));
        assert_eq!(remainder, (0.0, 0.0));
    }

    #[test]
    fn window_flag_platform_uses_interactive_moves() {
        let id = NoteWindowId {
            name: "note-1".to_string(),
            title: String::new(),
        };
        let mover = NoteMover::for_backend(PinBackend::WindowFlag, &id);
        assert!(mover.is_interactive());
        assert!(mover.delta_mover().is_none());
        assert_eq!(mover.screen_position(), None);

        let pinner = pinner_for(PinBackend::WindowFlag, &id);
        assert_eq!(pinner.backend(), PinBackend::WindowFlag);
        assert_eq!(pinner.set_pinned(true), PinOutcome::Recorded);
    }
}

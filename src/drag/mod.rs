use serde::Deserialize;

use crate::geometry::{PointerDelta, PointerPosition, SurfaceSize};

const GDK_BUTTON_PRIMARY: u32 = 1;
const GDK_BUTTON_MIDDLE: u32 = 2;
const GDK_BUTTON_SECONDARY: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other(u32),
}

impl PointerButton {
    pub const fn from_button_number(button: u32) -> Self {
        match button {
            GDK_BUTTON_PRIMARY => Self::Primary,
            GDK_BUTTON_MIDDLE => Self::Middle,
            GDK_BUTTON_SECONDARY => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

/// Buttons reported as currently held by a motion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldButtons {
    pub primary: bool,
}

#[cfg(test)]
impl HeldButtons {
    pub const NONE: Self = Self { primary: false };
    pub const PRIMARY: Self = Self { primary: true };
}

/// Subarea of the note whose presses may start a window drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandleRegion {
    /// The whole bottom toolbar, only while it is shown.
    #[default]
    BottomBar,
    /// A strip of fixed height along the top edge, regardless of toolbar state.
    TopStrip { height: i32 },
}

impl HandleRegion {
    /// Hit-test a window-local point.
    pub fn contains(
        self,
        local: PointerPosition,
        surface: SurfaceSize,
        toolbar_height: i32,
        toolbar_visible: bool,
    ) -> bool {
        let inside_x = local.x >= 0.0 && local.x < f64::from(surface.width);
        if !inside_x || local.y < 0.0 || local.y >= f64::from(surface.height) {
            return false;
        }

        match self {
            Self::BottomBar => {
                toolbar_visible && local.y >= f64::from(surface.height - toolbar_height.max(0))
            }
            Self::TopStrip { height } => local.y < f64::from(height.max(0)),
        }
    }
}

/// Host-side sink for window move requests.
///
/// Requests are best-effort; the compositor may clamp or drop them.
pub trait WindowMover {
    fn move_by(&self, delta: PointerDelta);
}

#[derive(Debug, Default)]
pub struct DragController {
    anchor: Option<PointerPosition>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor(&self) -> Option<PointerPosition> {
        self.anchor
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// Returns whether the press armed a drag.
    pub fn on_press(
        &mut self,
        button: PointerButton,
        global: PointerPosition,
        in_handle: bool,
    ) -> bool {
        self.anchor = (button == PointerButton::Primary && in_handle).then_some(global);
        tracing::trace!(?button, in_handle, armed = self.anchor.is_some(), "drag press");
        self.anchor.is_some()
    }

    /// Moves are gated on the primary button being held right now, so a
    /// stale anchor left by a lost release never moves the window.
    pub fn on_move(
        &mut self,
        held: HeldButtons,
        global: PointerPosition,
        mover: &dyn WindowMover,
    ) -> Option<PointerDelta> {
        let anchor = self.anchor?;
        if !held.primary {
            return None;
        }

        let delta = global - anchor;
        self.anchor = Some(global);
        if delta.is_zero() {
            return None;
        }
        mover.move_by(delta);
        Some(delta)
    }

    pub fn on_release(&mut self) {
        if self.anchor.take().is_some() {
            tracing::trace!("drag released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingMover {
        moves: RefCell<Vec<PointerDelta>>,
    }

    impl WindowMover for RecordingMover {
        fn move_by(&self, delta: PointerDelta) {
            self.moves.borrow_mut().push(delta);
        }
    }

    fn at(x: f64, y: f64) -> PointerPosition {
        PointerPosition::new(x, y)
    }

    #[test]
    fn press_in_handle_then_move_requests_delta_and_reanchors() {
        let mover = RecordingMover::default();
        let mut drag = DragController::new();

        assert!(drag.on_press(PointerButton::Primary, at(100.0, 100.0), true));
        let delta = drag.on_move(HeldButtons::PRIMARY, at(110.0, 130.0), &mover);

        assert_eq!(delta, Some(PointerDelta::new(10.0, 30.0)));
        assert_eq!(drag.anchor(), Some(at(110.0, 130.0)));

        drag.on_release();
        assert_eq!(drag.anchor(), None);
        assert_eq!(drag.on_move(HeldButtons::NONE, at(140.0, 150.0), &mover), None);
        assert_eq!(drag.on_move(HeldButtons::PRIMARY, at(150.0, 160.0), &mover), None);
        assert_eq!(*mover.moves.borrow(), vec![PointerDelta::new(10.0, 30.0)]);
    }

    #[test]
    fn consecutive_moves_compose_without_drift() {
        let mover = RecordingMover::default();
        let mut drag = DragController::new();
        drag.on_press(PointerButton::Primary, at(0.0, 0.0), true);

        for step in 1..=5 {
            let position = at(f64::from(step) * 3.0, f64::from(step) * -2.0);
            drag.on_move(HeldButtons::PRIMARY, position, &mover);
        }

        let moves = mover.moves.borrow();
        assert_eq!(moves.len(), 5);
        assert!(moves.iter().all(|delta| *delta == PointerDelta::new(3.0, -2.0)));
        let total = moves
            .iter()
            .fold((0.0, 0.0), |(x, y), delta| (x + delta.dx, y + delta.dy));
        assert_eq!(total, (15.0, -10.0));
    }

    #[test]
    fn press_outside_handle_never_moves_window() {
        let mover = RecordingMover::default();
        let mut drag = DragController::new();

        assert!(!drag.on_press(PointerButton::Primary, at(50.0, 50.0), false));
        for offset in [5.0, 10.0, 40.0] {
            drag.on_move(HeldButtons::PRIMARY, at(50.0 + offset, 50.0), &mover);
        }

        assert!(mover.moves.borrow().is_empty());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn non_primary_press_clears_existing_anchor() {
        let mut drag = DragController::new();
        drag.on_press(PointerButton::Primary, at(1.0, 1.0), true);
        assert!(drag.is_dragging());

        assert!(!drag.on_press(PointerButton::Secondary, at(2.0, 2.0), true));
        assert_eq!(drag.anchor(), None);
    }

    #[test]
    fn stale_anchor_without_primary_held_does_not_move() {
        let mover = RecordingMover::default();
        let mut drag = DragController::new();
        drag.on_press(PointerButton::Primary, at(10.0, 10.0), true);

        // release event lost: anchor remains, but no button is held
        let delta = drag.on_move(HeldButtons::NONE, at(30.0, 30.0), &mover);

        assert_eq!(delta, None);
        assert_eq!(drag.anchor(), Some(at(10.0, 10.0)));
        assert!(mover.moves.borrow().is_empty());
    }

    #[test]
    fn rapid_press_release_pairs_leave_no_anchor() {
        let mut drag = DragController::new();
        for index in 0..10 {
            drag.on_press(PointerButton::Primary, at(f64::from(index), 0.0), index % 2 == 0);
            drag.on_release();
            assert_eq!(drag.anchor(), None);
        }
    }

    #[test]
    fn release_without_drag_is_harmless() {
        let mut drag = DragController::new();
        drag.on_release();
        drag.on_release();
        assert_eq!(drag.anchor(), None);
    }

    #[test]
    fn button_numbers_map_to_pointer_buttons() {
        assert_eq!(PointerButton::from_button_number(1), PointerButton::Primary);
        assert_eq!(PointerButton::from_button_number(2), PointerButton::Middle);
        assert_eq!(PointerButton::from_button_number(3), PointerButton::Secondary);
        assert_eq!(PointerButton::from_button_number(8), PointerButton::Other(8));
    }

    #[test]
    fn bottom_bar_region_requires_visible_toolbar() {
        let surface = SurfaceSize::new(500, 400);
        let region = HandleRegion::BottomBar;

        assert!(region.contains(at(20.0, 370.0), surface, 45, true));
        assert!(!region.contains(at(20.0, 354.0), surface, 45, true));
        assert!(!region.contains(at(20.0, 370.0), surface, 45, false));
        assert!(!region.contains(at(-1.0, 370.0), surface, 45, true));
        assert!(!region.contains(at(20.0, 400.0), surface, 45, true));
    }

    #[test]
    fn top_strip_region_uses_coordinate_threshold() {
        let surface = SurfaceSize::new(500, 400);
        let region = HandleRegion::TopStrip { height: 24 };

        assert!(region.contains(at(10.0, 0.0), surface, 45, false));
        assert!(region.contains(at(499.0, 23.5), surface, 45, true));
        assert!(!region.contains(at(10.0, 24.0), surface, 45, true));
        assert!(!region.contains(at(10.0, 380.0), surface, 45, true));
    }
}

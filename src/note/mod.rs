use crate::drag::{DragController, HandleRegion, HeldButtons, PointerButton, WindowMover};
use crate::font::FontSizeStepper;
use crate::geometry::{Color, PointerDelta, PointerPosition, SurfaceSize};
use crate::pin::{PinOutcome, PinState};
use crate::theme::{NoteStyle, SystemThemeSource, ThemeController};

/// Per-window note model: drag, theme, font and pin state behind one owner.
///
/// Pointer input arrives in window-local coordinates, optionally paired with
/// a screen position from the compositor. Without one, the shell keeps the
/// window origin implied by its own move requests so the drag controller
/// always works in a stable global frame.
#[derive(Debug)]
pub struct NoteShell {
    drag: DragController,
    theme: ThemeController,
    font: FontSizeStepper,
    pin: PinState,
    handle: HandleRegion,
    toolbar_height: i32,
    surface: SurfaceSize,
    origin: PointerPosition,
}

#[derive(Debug, Clone)]
pub struct NoteShellConfig {
    pub handle: HandleRegion,
    pub hide_toolbar_on_blur: bool,
    pub toolbar_height: i32,
    pub surface: SurfaceSize,
    pub font_family: String,
}

impl NoteShell {
    pub fn new(config: NoteShellConfig, system: Box<dyn SystemThemeSource>) -> Self {
        Self {
            drag: DragController::new(),
            theme: ThemeController::new(system, config.hide_toolbar_on_blur),
            font: FontSizeStepper::new(config.font_family),
            pin: PinState::default(),
            handle: config.handle,
            toolbar_height: config.toolbar_height,
            surface: config.surface,
            origin: PointerPosition::new(0.0, 0.0),
        }
    }

    pub fn theme(&self) -> &ThemeController {
        &self.theme
    }

    pub fn font(&self) -> &FontSizeStepper {
        &self.font
    }

    pub fn font_mut(&mut self) -> &mut FontSizeStepper {
        &mut self.font
    }

    pub fn style(&self) -> NoteStyle {
        self.theme.style()
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_pinned()
    }

    pub fn is_pin_pending(&self) -> bool {
        self.pin.is_pending()
    }

    /// Target pin state to request, or `None` while a request is in flight.
    pub fn begin_pin_toggle(&mut self) -> Option<bool> {
        self.pin.begin_toggle()
    }

    pub fn finish_pin_toggle(&mut self, outcome: PinOutcome) -> bool {
        self.pin.finish_toggle(outcome)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn set_surface_size(&mut self, surface: SurfaceSize) {
        self.surface = surface;
    }

    pub fn in_handle(&self, local: PointerPosition) -> bool {
        self.handle.contains(
            local,
            self.surface,
            self.toolbar_height,
            self.theme.toolbar_visible(),
        )
    }

    /// Whether a press could arm a drag, checked before asking the compositor
    /// for a screen position.
    pub fn can_arm(&self, button: PointerButton, local: PointerPosition) -> bool {
        button == PointerButton::Primary && self.in_handle(local)
    }

    fn to_global(
        &mut self,
        local: PointerPosition,
        screen: Option<PointerPosition>,
    ) -> PointerPosition {
        match screen {
            Some(screen) => {
                self.origin = screen.offset_by(-local.x, -local.y);
                screen
            }
            None => self.origin.offset_by(local.x, local.y),
        }
    }

    /// Returns whether the press armed a drag.
    pub fn pointer_pressed(
        &mut self,
        button: PointerButton,
        local: PointerPosition,
        screen: Option<PointerPosition>,
    ) -> bool {
        let in_handle = self.in_handle(local);
        let global = self.to_global(local, screen);
        self.drag.on_press(button, global, in_handle)
    }

    pub fn pointer_moved(
        &mut self,
        held: HeldButtons,
        local: PointerPosition,
        screen: Option<PointerPosition>,
        mover: &dyn WindowMover,
    ) -> Option<PointerDelta> {
        let global = self.to_global(local, screen);
        let delta = self.drag.on_move(held, global, mover)?;
        self.origin = self.origin.offset_by(delta.dx, delta.dy);
        Some(delta)
    }

    pub fn pointer_released(&mut self) {
        self.drag.on_release();
    }

    pub fn focus_changed(&mut self, focused: bool) -> NoteStyle {
        self.theme.on_focus_changed(focused);
        if !focused {
            // focus loss can swallow the release event
            self.drag.on_release();
        }
        self.style()
    }

    pub fn set_light(&mut self) -> NoteStyle {
        self.theme.set_light();
        self.style()
    }

    pub fn set_dark(&mut self) -> NoteStyle {
        self.theme.set_dark();
        self.style()
    }

    pub fn follow_system(&mut self) -> NoteStyle {
        self.theme.follow_system();
        self.style()
    }

    pub fn pick_background(&mut self, color: Option<Color>) -> bool {
        self.theme.set_custom_background(color)
    }

    pub fn pick_text_color(&mut self, color: Option<Color>) -> bool {
        self.theme.set_custom_text_color(color)
    }

    pub fn system_theme_changed(&mut self) -> bool {
        self.theme.on_system_theme_changed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{ColorScheme, ThemePreference, ThemeResult, DARK_PALETTE, LIGHT_PALETTE};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Clone)]
    struct SharedScheme(Rc<Cell<ColorScheme>>);

    impl SystemThemeSource for SharedScheme {
        fn color_scheme(&self) -> ThemeResult<ColorScheme> {
            Ok(self.0.get())
        }
    }

    #[derive(Default)]
    struct RecordingMover {
        moves: RefCell<Vec<PointerDelta>>,
    }

    impl WindowMover for RecordingMover {
        fn move_by(&self, delta: PointerDelta) {
            self.moves.borrow_mut().push(delta);
        }
    }

    fn shell(handle: HandleRegion, scheme: ColorScheme) -> (NoteShell, SharedScheme) {
        let system = SharedScheme(Rc::new(Cell::new(scheme)));
        let config = NoteShellConfig {
            handle,
            hide_toolbar_on_blur: true,
            toolbar_height: 45,
            surface: SurfaceSize::new(500, 400),
            font_family: "Sans".to_string(),
        };
        (NoteShell::new(config, Box::new(system.clone())), system)
    }

    fn at(x: f64, y: f64) -> PointerPosition {
        PointerPosition::new(x, y)
    }

    #[test]
    fn dragging_by_bottom_bar_tracks_window_origin() {
        let (mut note, _) = shell(HandleRegion::BottomBar, ColorScheme::Light);
        let mover = RecordingMover::default();

        assert!(note.pointer_pressed(PointerButton::Primary, at(100.0, 380.0), None));
        // window has not moved yet: local delta equals global delta
        note.pointer_moved(HeldButtons::PRIMARY, at(110.0, 410.0), None, &mover);
        // window moved by (10, 30); same pointer offset inside the window
        note.pointer_moved(HeldButtons::PRIMARY, at(100.0, 380.0), None, &mover);
        // pointer advanced another (5, 5) in screen space
        note.pointer_moved(HeldButtons::PRIMARY, at(105.0, 385.0), None, &mover);
        note.pointer_released();

        assert_eq!(
            *mover.moves.borrow(),
            vec![PointerDelta::new(10.0, 30.0), PointerDelta::new(5.0, 5.0)]
        );
        assert!(!note.is_dragging());
    }

    #[test]
    fn screen_position_rebases_window_origin() {
        let (mut note, _) = shell(HandleRegion::BottomBar, ColorScheme::Light);
        let mover = RecordingMover::default();

        let held = HeldButtons::PRIMARY;
        note.pointer_pressed(PointerButton::Primary, at(20.0, 390.0), Some(at(820.0, 690.0)));
        // compositor has not applied the move yet; screen position stays authoritative
        note.pointer_moved(held, at(30.0, 395.0), Some(at(830.0, 695.0)), &mover);
        note.pointer_moved(held, at(30.0, 395.0), Some(at(834.0, 699.0)), &mover);
        // no screen position: origin inferred from the last sample
        note.pointer_moved(held, at(30.0, 396.0), None, &mover);

        assert_eq!(
            *mover.moves.borrow(),
            vec![
                PointerDelta::new(10.0, 5.0),
                PointerDelta::new(4.0, 4.0),
                PointerDelta::new(4.0, 5.0),
            ]
        );
    }

    #[test]
    fn press_in_text_area_does_not_drag() {
        let (mut note, _) = shell(HandleRegion::BottomBar, ColorScheme::Light);
        let mover = RecordingMover::default();

        assert!(!note.pointer_pressed(PointerButton::Primary, at(100.0, 100.0), None));
        note.pointer_moved(HeldButtons::PRIMARY, at(160.0, 140.0), None, &mover);

        assert!(mover.moves.borrow().is_empty());
    }

    #[test]
    fn only_primary_presses_in_handle_can_arm() {
        let (note, _) = shell(HandleRegion::BottomBar, ColorScheme::Light);
        assert!(note.can_arm(PointerButton::Primary, at(100.0, 380.0)));
        assert!(!note.can_arm(PointerButton::Primary, at(100.0, 100.0)));
        assert!(!note.can_arm(PointerButton::Secondary, at(100.0, 380.0)));
    }

    #[test]
    fn hidden_toolbar_is_not_a_handle() {
        let (mut note, _) = shell(HandleRegion::BottomBar, ColorScheme::Light);
        note.focus_changed(false);
        assert!(!note.in_handle(at(100.0, 380.0)));

        let (mut strip, _) = shell(HandleRegion::TopStrip { height: 30 }, ColorScheme::Light);
        strip.focus_changed(false);
        assert!(strip.in_handle(at(100.0, 10.0)));
    }

    #[test]
    fn focus_loss_drops_active_drag() {
        let (mut note, _) = shell(HandleRegion::BottomBar, ColorScheme::Light);
        note.pointer_pressed(PointerButton::Primary, at(10.0, 390.0), None);
        assert!(note.is_dragging());

        let style = note.focus_changed(false);
        assert!(!note.is_dragging());
        assert!(style.scrollbar_hidden);
        assert!(!style.toolbar_visible);
    }

    #[test]
    fn resized_surface_moves_bottom_bar_handle() {
        let (mut note, _) = shell(HandleRegion::BottomBar, ColorScheme::Light);
        note.set_surface_size(SurfaceSize::new(300, 200));
        assert!(note.in_handle(at(10.0, 170.0)));
        assert!(!note.in_handle(at(10.0, 380.0)));
    }

    #[test]
    fn light_choice_survives_system_flip() {
        let (mut note, system) = shell(HandleRegion::BottomBar, ColorScheme::Dark);
        assert_eq!(note.style().background, DARK_PALETTE.background);

        let style = note.set_light();
        assert_eq!(style.background, LIGHT_PALETTE.background);

        system.0.set(ColorScheme::Dark);
        assert!(!note.system_theme_changed());
        assert_eq!(note.theme().preference(), ThemePreference::Light);
        assert_eq!(note.style().text, LIGHT_PALETTE.text);
    }

    #[test]
    fn canceled_color_pick_keeps_follow_system() {
        let (mut note, _) = shell(HandleRegion::BottomBar, ColorScheme::Dark);
        assert!(!note.pick_background(None));
        assert_eq!(note.theme().preference(), ThemePreference::FollowSystem);

        assert!(note.pick_text_color(Some(Color::new(10, 20, 30))));
        assert_eq!(note.theme().preference(), ThemePreference::Custom);
        assert_eq!(note.style().background, DARK_PALETTE.background);
    }

    #[test]
    fn pin_commits_only_after_request_succeeds() {
        let (mut note, _) = shell(HandleRegion::BottomBar, ColorScheme::Light);

        assert_eq!(note.begin_pin_toggle(), Some(true));
        assert!(!note.is_pinned());
        assert!(note.is_pin_pending());
        assert_eq!(note.begin_pin_toggle(), None);
        assert!(!note.finish_pin_toggle(PinOutcome::Failed));

        assert_eq!(note.begin_pin_toggle(), Some(true));
        assert!(note.finish_pin_toggle(PinOutcome::Recorded));
        assert!(note.is_pinned());
        assert!(!note.is_pin_pending());
    }
}

use thiserror::Error;

use crate::geometry::Color;

pub type ThemeResult<T> = std::result::Result<T, ThemeError>;

/// The user's explicit theme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    #[default]
    FollowSystem,
    Light,
    Dark,
    Custom,
}

/// Light/dark scheme as reported by the desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("no desktop settings available to query the color scheme")]
    SettingsUnavailable,
    #[error("desktop did not report a usable color scheme")]
    SchemeUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
}

pub const LIGHT_PALETTE: Palette = Palette {
    background: Color::new(255, 255, 255),
    text: Color::new(0, 0, 0),
};

pub const DARK_PALETTE: Palette = Palette {
    background: Color::new(45, 45, 45),
    text: Color::new(240, 240, 240),
};

impl ColorScheme {
    pub const fn palette(self) -> Palette {
        match self {
            Self::Light => LIGHT_PALETTE,
            Self::Dark => DARK_PALETTE,
        }
    }
}

/// Reports the desktop color scheme on demand.
pub trait SystemThemeSource {
    fn color_scheme(&self) -> ThemeResult<ColorScheme>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeState {
    pub preference: ThemePreference,
    pub background_color: Color,
    pub text_color: Color,
    pub scrollbar_hidden: bool,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self {
            preference: ThemePreference::FollowSystem,
            background_color: LIGHT_PALETTE.background,
            text_color: LIGHT_PALETTE.text,
            scrollbar_hidden: false,
        }
    }
}

impl ThemeState {
    pub fn palette(&self) -> Palette {
        Palette {
            background: self.background_color,
            text: self.text_color,
        }
    }

    fn apply_palette(&mut self, palette: Palette) {
        self.background_color = palette.background;
        self.text_color = palette.text;
    }
}

/// Toolkit-neutral description of how a note should be painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteStyle {
    pub background: Color,
    pub text: Color,
    pub scrollbar_hidden: bool,
    pub toolbar_visible: bool,
}

pub fn note_style(state: &ThemeState, toolbar_visible: bool) -> NoteStyle {
    NoteStyle {
        background: state.background_color,
        text: state.text_color,
        scrollbar_hidden: state.scrollbar_hidden,
        toolbar_visible,
    }
}

pub struct ThemeController {
    state: ThemeState,
    toolbar_visible: bool,
    hide_toolbar_on_blur: bool,
    system: Box<dyn SystemThemeSource>,
}

impl ThemeController {
    /// Starts in follow-system mode, resolved against the desktop immediately.
    pub fn new(system: Box<dyn SystemThemeSource>, hide_toolbar_on_blur: bool) -> Self {
        let mut controller = Self {
            state: ThemeState::default(),
            toolbar_visible: true,
            hide_toolbar_on_blur,
            system,
        };
        controller.follow_system();
        controller
    }

    pub fn state(&self) -> &ThemeState {
        &self.state
    }

    pub fn preference(&self) -> ThemePreference {
        self.state.preference
    }

    pub fn toolbar_visible(&self) -> bool {
        self.toolbar_visible
    }

    pub fn style(&self) -> NoteStyle {
        note_style(&self.state, self.toolbar_visible)
    }

    pub fn set_light(&mut self) {
        self.state.apply_palette(LIGHT_PALETTE);
        self.state.preference = ThemePreference::Light;
        tracing::debug!("theme set to light");
    }

    pub fn set_dark(&mut self) {
        self.state.apply_palette(DARK_PALETTE);
        self.state.preference = ThemePreference::Dark;
        tracing::debug!("theme set to dark");
    }

    /// `None` is a canceled picker and changes nothing.
    pub fn set_custom_background(&mut self, color: Option<Color>) -> bool {
        let Some(color) = color else {
            tracing::debug!("background color picker canceled");
            return false;
        };
        self.state.preference = ThemePreference::Custom;
        self.state.background_color = color;
        tracing::debug!(background = %color, "custom background applied");
        true
    }

    /// `None` is a canceled picker and changes nothing.
    pub fn set_custom_text_color(&mut self, color: Option<Color>) -> bool {
        let Some(color) = color else {
            tracing::debug!("text color picker canceled");
            return false;
        };
        self.state.preference = ThemePreference::Custom;
        self.state.text_color = color;
        tracing::debug!(text = %color, "custom text color applied");
        true
    }

    pub fn follow_system(&mut self) {
        self.state.preference = ThemePreference::FollowSystem;
        let scheme = self.resolve_system_scheme();
        self.state.apply_palette(scheme.palette());
        tracing::debug!(?scheme, "theme follows system");
    }

    /// Returns whether the notification changed the applied colors.
    pub fn on_system_theme_changed(&mut self) -> bool {
        if self.state.preference != ThemePreference::FollowSystem {
            tracing::debug!(
                preference = ?self.state.preference,
                "ignoring system theme change for explicit preference"
            );
            return false;
        }
        let before = self.state.palette();
        let scheme = self.resolve_system_scheme();
        self.state.apply_palette(scheme.palette());
        before != self.state.palette()
    }

    pub fn on_focus_changed(&mut self, focused: bool) {
        self.state.scrollbar_hidden = !focused;
        if self.hide_toolbar_on_blur {
            self.toolbar_visible = focused;
        }
    }

    fn resolve_system_scheme(&self) -> ColorScheme {
        self.system.color_scheme().unwrap_or_else(|err| {
            tracing::warn!(%err, "failed to read system color scheme; using light palette");
            ColorScheme::Light
        })
    }
}

impl std::fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeController")
            .field("state", &self.state)
            .field("toolbar_visible", &self.toolbar_visible)
            .field("hide_toolbar_on_blur", &self.hide_toolbar_on_blur)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Scripted desktop: `None` simulates a failing settings query.
    #[derive(Clone)]
    struct FakeSystem {
        scheme: Rc<Cell<Option<ColorScheme>>>,
    }

    impl FakeSystem {
        fn new(scheme: Option<ColorScheme>) -> Self {
            Self {
                scheme: Rc::new(Cell::new(scheme)),
            }
        }

        fn set(&self, scheme: Option<ColorScheme>) {
            self.scheme.set(scheme);
        }
    }

    impl SystemThemeSource for FakeSystem {
        fn color_scheme(&self) -> ThemeResult<ColorScheme> {
            self.scheme.get().ok_or(ThemeError::SchemeUnavailable)
        }
    }

    fn controller_with(system: &FakeSystem) -> ThemeController {
        ThemeController::new(Box::new(system.clone()), true)
    }

    #[test]
    fn construction_resolves_follow_system_against_desktop() {
        let system = FakeSystem::new(Some(ColorScheme::Dark));
        let controller = controller_with(&system);

        assert_eq!(controller.preference(), ThemePreference::FollowSystem);
        assert_eq!(controller.state().palette(), DARK_PALETTE);
    }

    #[test]
    fn failing_system_query_falls_back_to_light() {
        let system = FakeSystem::new(None);
        let mut controller = controller_with(&system);
        assert_eq!(controller.state().palette(), LIGHT_PALETTE);

        controller.set_dark();
        controller.follow_system();
        assert_eq!(controller.preference(), ThemePreference::FollowSystem);
        assert_eq!(controller.state().palette(), LIGHT_PALETTE);
    }

    #[test]
    fn explicit_light_survives_system_flip_to_dark() {
        let system = FakeSystem::new(Some(ColorScheme::Dark));
        let mut controller = controller_with(&system);
        assert_eq!(controller.state().palette(), DARK_PALETTE);

        controller.set_light();
        assert_eq!(controller.preference(), ThemePreference::Light);
        assert_eq!(controller.state().palette(), LIGHT_PALETTE);

        system.set(Some(ColorScheme::Dark));
        assert!(!controller.on_system_theme_changed());
        assert_eq!(controller.state().palette(), LIGHT_PALETTE);
    }

    #[test]
    fn explicit_preferences_ignore_any_number_of_notifications() {
        let system = FakeSystem::new(Some(ColorScheme::Light));
        let mut controller = controller_with(&system);

        let choose: [fn(&mut ThemeController); 3] = [
            ThemeController::set_light,
            ThemeController::set_dark,
            |controller| {
                controller.set_custom_background(Some(Color::new(236, 228, 215)));
            },
        ];
        for apply in choose {
            apply(&mut controller);
            let pinned = controller.state().palette();
            for flip in 0..6 {
                let scheme = if flip % 2 == 0 {
                    ColorScheme::Dark
                } else {
                    ColorScheme::Light
                };
                system.set(Some(scheme));
                controller.on_system_theme_changed();
                assert_eq!(controller.state().palette(), pinned);
            }
        }
    }

    #[test]
    fn follow_system_tracks_notifications() {
        let system = FakeSystem::new(Some(ColorScheme::Light));
        let mut controller = controller_with(&system);

        system.set(Some(ColorScheme::Dark));
        assert!(controller.on_system_theme_changed());
        assert_eq!(controller.state().palette(), DARK_PALETTE);

        system.set(Some(ColorScheme::Dark));
        assert!(!controller.on_system_theme_changed());

        system.set(None);
        assert!(controller.on_system_theme_changed());
        assert_eq!(controller.state().palette(), LIGHT_PALETTE);
    }

    #[test]
    fn custom_channels_are_independent() {
        let system = FakeSystem::new(Some(ColorScheme::Dark));
        let mut controller = controller_with(&system);
        let picked = Color::new(0xec, 0xe4, 0xd7);

        assert!(controller.set_custom_background(Some(picked)));
        assert_eq!(controller.preference(), ThemePreference::Custom);
        assert_eq!(controller.state().background_color, picked);
        assert_eq!(controller.state().text_color, DARK_PALETTE.text);

        let ink = Color::new(0x33, 0x22, 0x11);
        assert!(controller.set_custom_text_color(Some(ink)));
        assert_eq!(controller.state().background_color, picked);
        assert_eq!(controller.state().text_color, ink);
    }

    #[test]
    fn canceled_picker_leaves_state_untouched() {
        let system = FakeSystem::new(Some(ColorScheme::Dark));
        let mut controller = controller_with(&system);
        let before = *controller.state();

        assert!(!controller.set_custom_background(None));
        assert!(!controller.set_custom_text_color(None));

        assert_eq!(*controller.state(), before);
        assert_eq!(controller.preference(), ThemePreference::FollowSystem);
    }

    #[test]
    fn follow_system_after_custom_reapplies_desktop_palette() {
        let system = FakeSystem::new(Some(ColorScheme::Light));
        let mut controller = controller_with(&system);
        controller.set_custom_text_color(Some(Color::new(1, 2, 3)));

        system.set(Some(ColorScheme::Dark));
        controller.follow_system();

        assert_eq!(controller.preference(), ThemePreference::FollowSystem);
        assert_eq!(controller.state().palette(), DARK_PALETTE);
    }

    #[test]
    fn focus_drives_scrollbar_and_toolbar_without_touching_preference() {
        let system = FakeSystem::new(Some(ColorScheme::Light));
        let mut controller = controller_with(&system);
        controller.set_dark();

        controller.on_focus_changed(false);
        assert!(controller.state().scrollbar_hidden);
        assert!(!controller.toolbar_visible());
        assert_eq!(controller.preference(), ThemePreference::Dark);

        controller.on_focus_changed(true);
        let style = controller.style();
        assert!(!style.scrollbar_hidden);
        assert!(style.toolbar_visible);
        assert_eq!(style.background, DARK_PALETTE.background);
    }

    #[test]
    fn toolbar_stays_visible_when_blur_policy_disabled() {
        let system = FakeSystem::new(Some(ColorScheme::Light));
        let mut controller = ThemeController::new(Box::new(system), false);

        controller.on_focus_changed(false);
        assert!(controller.state().scrollbar_hidden);
        assert!(controller.toolbar_visible());
    }
}

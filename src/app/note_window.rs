use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use gtk4::prelude::*;
use gtk4::{
    gdk, gio, glib, Align, Application, ApplicationWindow, Box as GtkBox, Orientation,
    PolicyType, PopoverMenu, ScrolledWindow, TextView, ToggleButton, WrapMode,
};

use crate::clipboard::{copy_plain_text, read_plain_text};
use crate::config::AppConfig;
use crate::geometry::{PointerPosition, SurfaceSize};
use crate::input::{resolve_scroll, resolve_shortcut, ShortcutAction};
use crate::lifecycle::{CloseOutcome, WindowLifecycle, WindowTicket};
use crate::note::{NoteShell, NoteShellConfig};
use crate::pin::{PinBackend, PlatformPinner};
use crate::ui::{icon_toggle_button, pin_icon_name, text_button, CHROME_COLORS, LAYOUT_TOKENS};

use super::bootstrap::{GtkSettingsThemeSource, THEME_SETTING_PROPERTIES};
use super::dialogs::{choose_color, choose_font};
use super::hypr::request_window_floating;
use super::input_bridge::{
    held_buttons, normalize_shortcut_key, pointer_button, shortcut_modifiers,
};
use super::note_menu::{self, build_text_menu_extras, build_window_menu};
use super::platform::{
    begin_interactive_move, begin_interactive_resize, pinner_for, NoteMover, NoteWindowId,
};
use super::runtime_css::{NoteCssInput, NoteCssProvider};
use super::worker::spawn_worker_action;

/// Shared by every note window of the process.
pub(super) struct NoteWindowContext {
    pub(super) app: Application,
    pub(super) lifecycle: Rc<WindowLifecycle>,
    pub(super) config: Rc<AppConfig>,
    pub(super) backend: PinBackend,
}

struct NoteWidgets {
    window: ApplicationWindow,
    text_view: TextView,
    scrolled: ScrolledWindow,
    root: GtkBox,
    toolbar: GtkBox,
    pin_button: ToggleButton,
    window_menu: PopoverMenu,
}

struct NoteWindowRuntime {
    context: Rc<NoteWindowContext>,
    id: NoteWindowId,
    window_class: String,
    ticket: Cell<Option<WindowTicket>>,
    widgets: NoteWidgets,
    shell: RefCell<NoteShell>,
    pinner: Arc<dyn PlatformPinner>,
    mover: NoteMover,
    css: NoteCssProvider,
    settings: Option<gtk4::Settings>,
    settings_handlers: RefCell<Vec<glib::SignalHandlerId>>,
}

impl NoteWindowRuntime {
    fn buffer(&self) -> gtk4::TextBuffer {
        self.widgets.text_view.buffer()
    }

    fn apply_style(&self) {
        let (style, font_family, font_size_pt) = {
            let shell = self.shell.borrow();
            (
                shell.style(),
                shell.font().family().to_string(),
                shell.font().applied_size(),
            )
        };
        self.css.apply(NoteCssInput {
            window_class: &self.window_class,
            style,
            font_family: &font_family,
            font_size_pt,
            tokens: LAYOUT_TOKENS,
            chrome: CHROME_COLORS,
        });
        self.widgets.toolbar.set_visible(style.toolbar_visible);
        let vertical_policy = if style.scrollbar_hidden {
            PolicyType::External
        } else {
            PolicyType::Automatic
        };
        self.widgets
            .scrolled
            .set_policy(PolicyType::Never, vertical_policy);
    }

    fn sync_surface_size(&self) {
        let surface = SurfaceSize::new(self.widgets.window.width(), self.widgets.window.height());
        self.shell.borrow_mut().set_surface_size(surface);
    }

    fn handle_pointer_event(&self, event: &gdk::Event) -> glib::Propagation {
        let Some((x, y)) = event.position() else {
            return glib::Propagation::Proceed;
        };
        let local = PointerPosition::new(x, y);
        match event.event_type() {
            gdk::EventType::ButtonPress => {
                let Some(button) = event.downcast_ref::<gdk::ButtonEvent>().map(|e| e.button())
                else {
                    return glib::Propagation::Proceed;
                };
                self.sync_surface_size();
                let button_kind = pointer_button(button);
                let screen = if self.shell.borrow().can_arm(button_kind, local) {
                    self.mover.screen_position()
                } else {
                    None
                };
                let armed = self
                    .shell
                    .borrow_mut()
                    .pointer_pressed(button_kind, local, screen);
                if armed && self.mover.is_interactive() {
                    // the compositor owns the pointer until the move ends
                    self.shell.borrow_mut().pointer_released();
                    let started = event.device().is_some_and(|device| {
                        begin_interactive_move(
                            &self.widgets.window,
                            &device,
                            button,
                            local,
                            event.time(),
                        )
                    });
                    if started {
                        return glib::Propagation::Stop;
                    }
                }
            }
            gdk::EventType::MotionNotify => {
                let Some(mover) = self.mover.delta_mover() else {
                    return glib::Propagation::Proceed;
                };
                if !self.shell.borrow().is_dragging() {
                    return glib::Propagation::Proceed;
                }
                let held = held_buttons(event.modifier_state());
                let screen = self.mover.screen_position();
                self.shell
                    .borrow_mut()
                    .pointer_moved(held, local, screen, mover);
            }
            gdk::EventType::ButtonRelease => {
                self.shell.borrow_mut().pointer_released();
            }
            _ => {}
        }
        glib::Propagation::Proceed
    }

    fn focus_changed(&self, focused: bool) {
        self.shell.borrow_mut().focus_changed(focused);
        self.apply_style();
    }

    fn system_theme_changed(&self) {
        let changed = self.shell.borrow_mut().system_theme_changed();
        if changed {
            self.apply_style();
        }
    }

    fn sync_pin_button(&self) {
        let (pinned, pending) = {
            let shell = self.shell.borrow();
            (shell.is_pinned(), shell.is_pin_pending())
        };
        let button = &self.widgets.pin_button;
        button.set_active(pinned);
        button.set_icon_name(pin_icon_name(pinned));
        button.set_sensitive(!pending);
    }

    fn toggle_pin(self: &Rc<Self>) {
        let target = self.shell.borrow_mut().begin_pin_toggle();
        self.sync_pin_button();
        let Some(target) = target else {
            tracing::debug!(window = self.id.name, "pin request already in flight");
            return;
        };

        let pinner = Arc::clone(&self.pinner);
        let runtime = self.clone();
        spawn_worker_action(
            move || pinner.set_pinned(target),
            move |outcome| {
                let pinned = runtime.shell.borrow_mut().finish_pin_toggle(outcome);
                runtime.sync_pin_button();
                tracing::info!(
                    window = runtime.id.name,
                    backend = ?runtime.pinner.backend(),
                    pinned,
                    ?outcome,
                    "pin toggled"
                );
            },
        );
    }

    fn step_font(&self, larger: bool) {
        let size = {
            let mut shell = self.shell.borrow_mut();
            if larger {
                shell.font_mut().increase()
            } else {
                shell.font_mut().decrease()
            }
        };
        tracing::debug!(window = self.id.name, size, "font size stepped");
        self.apply_style();
    }

    fn set_light(&self) {
        self.shell.borrow_mut().set_light();
        self.apply_style();
    }

    fn set_dark(&self) {
        self.shell.borrow_mut().set_dark();
        self.apply_style();
    }

    fn follow_system(&self) {
        self.shell.borrow_mut().follow_system();
        self.apply_style();
    }

    fn copy_plain(&self) {
        let buffer = self.buffer();
        let Some((start, end)) = buffer.selection_bounds() else {
            tracing::debug!(window = self.id.name, "nothing selected to copy");
            return;
        };
        let text = buffer.text(&start, &end, false);
        if let Err(err) = copy_plain_text(text.as_str()) {
            tracing::warn!(window = self.id.name, %err, "failed to copy plain text");
        }
    }

    fn paste_plain(&self) {
        let text_view = self.widgets.text_view.clone();
        let window_name = self.id.name.clone();
        let requested = read_plain_text(move |result| match result {
            Ok(Some(text)) => {
                let buffer = text_view.buffer();
                buffer.delete_selection(true, text_view.is_editable());
                buffer.insert_at_cursor(&text);
                text_view.scroll_mark_onscreen(&buffer.get_insert());
            }
            Ok(None) => tracing::debug!(window = window_name, "clipboard has no text"),
            Err(err) => {
                tracing::warn!(window = window_name, %err, "failed to paste plain text")
            }
        });
        if let Err(err) = requested {
            tracing::warn!(window = self.id.name, %err, "clipboard unavailable");
        }
    }

    fn convert_plain(&self) {
        let buffer = self.buffer();
        let (start, end) = buffer.bounds();
        buffer.remove_all_tags(&start, &end);
    }

    fn clear_content(&self) {
        self.buffer().set_text("");
    }

    fn run_shortcut(self: &Rc<Self>, action: ShortcutAction) {
        tracing::debug!(window = self.id.name, ?action, "shortcut");
        match action {
            ShortcutAction::IncreaseFontSize => self.step_font(true),
            ShortcutAction::DecreaseFontSize => self.step_font(false),
            ShortcutAction::TogglePin => self.toggle_pin(),
            ShortcutAction::PastePlainText => self.paste_plain(),
            ShortcutAction::CopyPlainText => self.copy_plain(),
        }
    }

    fn teardown(&self) {
        let Some(ticket) = self.ticket.take() else {
            return;
        };
        if let Some(settings) = self.settings.as_ref() {
            for handler in self.settings_handlers.borrow_mut().drain(..) {
                settings.disconnect(handler);
            }
        }
        self.css.uninstall();
        self.widgets.window_menu.unparent();
        self.widgets
            .window
            .insert_action_group(note_menu::ACTION_GROUP, None::<&gio::ActionGroup>);

        match self.context.lifecycle.on_window_closed(ticket) {
            CloseOutcome::StillRunning { open_windows } => {
                tracing::debug!(window = self.id.name, open_windows, "other notes remain");
            }
            CloseOutcome::ShutdownRequested => {
                tracing::debug!(window = self.id.name, "closed last note");
            }
        }
    }
}

fn choose_background(runtime: &Rc<NoteWindowRuntime>) {
    let initial = runtime.shell.borrow().theme().state().background_color;
    let target = runtime.clone();
    choose_color(
        &runtime.widgets.window,
        "Choose background color",
        initial,
        move |picked| {
            if target.shell.borrow_mut().pick_background(picked) {
                target.apply_style();
            }
        },
    );
}

fn choose_text_color(runtime: &Rc<NoteWindowRuntime>) {
    let initial = runtime.shell.borrow().theme().state().text_color;
    let target = runtime.clone();
    choose_color(
        &runtime.widgets.window,
        "Choose font color",
        initial,
        move |picked| {
            if target.shell.borrow_mut().pick_text_color(picked) {
                target.apply_style();
            }
        },
    );
}

fn choose_note_font(runtime: &Rc<NoteWindowRuntime>) {
    let (family, size) = {
        let shell = runtime.shell.borrow();
        (shell.font().family().to_string(), shell.font().applied_size())
    };
    let target = runtime.clone();
    choose_font(&runtime.widgets.window, &family, size, move |picked| {
        let applied = target.shell.borrow_mut().font_mut().apply_picked_font(picked);
        if applied {
            target.apply_style();
        }
    });
}

fn add_action<F>(group: &gio::SimpleActionGroup, name: &str, activate: F) -> gio::SimpleAction
where
    F: Fn() + 'static,
{
    let action = gio::SimpleAction::new(name, None);
    action.connect_activate(move |_, _| activate());
    group.add_action(&action);
    action
}

fn install_note_actions(runtime: &Rc<NoteWindowRuntime>) {
    let group = gio::SimpleActionGroup::new();

    let target = runtime.clone();
    add_action(&group, note_menu::CHOOSE_BACKGROUND, move || {
        choose_background(&target)
    });
    let target = runtime.clone();
    add_action(&group, note_menu::DARK_MODE, move || target.set_dark());
    let target = runtime.clone();
    add_action(&group, note_menu::LIGHT_MODE, move || target.set_light());
    let target = runtime.clone();
    add_action(&group, note_menu::FOLLOW_SYSTEM, move || target.follow_system());
    let target = runtime.clone();
    add_action(&group, note_menu::CHOOSE_TEXT_COLOR, move || {
        choose_text_color(&target)
    });
    let target = runtime.clone();
    add_action(&group, note_menu::CHOOSE_FONT, move || choose_note_font(&target));
    let context = runtime.context.clone();
    add_action(&group, note_menu::NEW_NOTE, move || open_note_window(&context));
    let window = runtime.widgets.window.clone();
    add_action(&group, note_menu::CLOSE_WINDOW, move || window.close());
    let target = runtime.clone();
    add_action(&group, note_menu::PASTE_PLAIN, move || target.paste_plain());
    let target = runtime.clone();
    let copy_action = add_action(&group, note_menu::COPY_PLAIN, move || target.copy_plain());
    let target = runtime.clone();
    add_action(&group, note_menu::CONVERT_PLAIN, move || target.convert_plain());
    let target = runtime.clone();
    add_action(&group, note_menu::CLEAR_CONTENT, move || target.clear_content());

    let buffer = runtime.buffer();
    copy_action.set_enabled(buffer.has_selection());
    buffer.connect_has_selection_notify(move |buffer| {
        copy_action.set_enabled(buffer.has_selection());
    });

    runtime
        .widgets
        .window
        .insert_action_group(note_menu::ACTION_GROUP, Some(&group));
}

fn build_note_widgets(app: &Application, id: &NoteWindowId, config: &AppConfig) -> NoteWidgets {
    let tokens = LAYOUT_TOKENS;

    let window = ApplicationWindow::new(app);
    window.set_title(Some(&id.title));
    window.set_decorated(false);
    window.set_default_size(config.window_width, config.window_height);
    window.add_css_class("note-window");
    window.add_css_class(&id.name);

    let text_view = TextView::new();
    text_view.add_css_class("note-text");
    text_view.set_wrap_mode(WrapMode::WordChar);
    text_view.set_left_margin(tokens.text_padding);
    text_view.set_right_margin(tokens.text_padding);
    text_view.set_top_margin(tokens.text_padding);
    text_view.set_bottom_margin(tokens.text_padding);
    text_view.set_extra_menu(Some(&build_text_menu_extras()));

    let scrolled = ScrolledWindow::new();
    scrolled.set_vexpand(true);
    scrolled.set_hexpand(true);
    scrolled.set_policy(PolicyType::Never, PolicyType::Automatic);
    scrolled.set_child(Some(&text_view));

    let toolbar = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
    toolbar.add_css_class("note-toolbar");
    toolbar.set_size_request(-1, tokens.toolbar_height);

    let pin_button = icon_toggle_button(
        pin_icon_name(false),
        "Pin on top (Ctrl+T)",
        tokens.pin_button_size,
        &[],
    );
    pin_button.set_valign(Align::Center);
    toolbar.append(&pin_button);

    let spacer = GtkBox::new(Orientation::Horizontal, 0);
    spacer.set_hexpand(true);
    toolbar.append(&spacer);

    let window_menu = PopoverMenu::from_model(Some(&build_window_menu()));
    window_menu.set_has_arrow(false);
    let root = GtkBox::new(Orientation::Vertical, 0);
    root.append(&scrolled);
    root.append(&toolbar);
    window.set_child(Some(&root));
    window_menu.set_parent(&root);

    NoteWidgets {
        window,
        text_view,
        scrolled,
        root,
        toolbar,
        pin_button,
        window_menu,
    }
}

fn attach_font_buttons(runtime: &Rc<NoteWindowRuntime>) {
    let tokens = LAYOUT_TOKENS;
    for (label, tooltip, larger) in [
        ("\u{2212}", "Smaller text (Ctrl+-)", false),
        ("+", "Larger text (Ctrl++)", true),
    ] {
        let button = text_button(label, tooltip, tokens.font_button_size, &[]);
        button.set_valign(Align::Center);
        let target = runtime.clone();
        button.connect_clicked(move |_| target.step_font(larger));
        runtime.widgets.toolbar.append(&button);
    }
}

fn attach_resize_grip(runtime: &Rc<NoteWindowRuntime>) {
    let tokens = LAYOUT_TOKENS;
    let grip = GtkBox::new(Orientation::Horizontal, 0);
    grip.add_css_class("note-resize-grip");
    grip.set_size_request(tokens.grip_size, tokens.grip_size);
    grip.set_valign(Align::End);
    grip.set_cursor_from_name(Some("se-resize"));
    grip.set_tooltip_text(Some("Resize"));

    let grip_drag = gtk4::GestureDrag::builder().button(gdk::BUTTON_PRIMARY).build();
    let window = runtime.widgets.window.clone();
    let grip_for_drag = grip.clone();
    grip_drag.connect_drag_begin(move |gesture, x, y| {
        gesture.set_state(gtk4::EventSequenceState::Claimed);
        let (window_x, window_y) = grip_for_drag
            .translate_coordinates(&window, x, y)
            .unwrap_or((x, y));
        begin_interactive_resize(&window, gesture, window_x, window_y);
    });
    grip.add_controller(grip_drag);
    runtime.widgets.toolbar.append(&grip);
}

fn connect_note_input(runtime: &Rc<NoteWindowRuntime>) {
    let window = &runtime.widgets.window;

    let pointer = gtk4::EventControllerLegacy::new();
    let target = runtime.clone();
    pointer.connect_event(move |_, event| target.handle_pointer_event(event));
    window.add_controller(pointer);

    let key_controller = gtk4::EventControllerKey::new();
    key_controller.set_propagation_phase(gtk4::PropagationPhase::Capture);
    let target = runtime.clone();
    key_controller.connect_key_pressed(move |_, key, keycode, modifier| {
        let Some(shortcut_key) = normalize_shortcut_key(key, keycode) else {
            return glib::Propagation::Proceed;
        };
        match resolve_shortcut(shortcut_key, shortcut_modifiers(modifier)) {
            Some(action) => {
                target.run_shortcut(action);
                glib::Propagation::Stop
            }
            None => glib::Propagation::Proceed,
        }
    });
    window.add_controller(key_controller);

    let scroll = gtk4::EventControllerScroll::new(gtk4::EventControllerScrollFlags::VERTICAL);
    scroll.set_propagation_phase(gtk4::PropagationPhase::Capture);
    let target = runtime.clone();
    scroll.connect_scroll(move |controller, _dx, dy| {
        let modifiers = shortcut_modifiers(controller.current_event_state());
        match resolve_scroll(dy, modifiers) {
            Some(action) => {
                target.run_shortcut(action);
                glib::Propagation::Stop
            }
            None => glib::Propagation::Proceed,
        }
    });
    window.add_controller(scroll);

    let menu_click = gtk4::GestureClick::builder()
        .button(gdk::BUTTON_SECONDARY)
        .build();
    let popover = runtime.widgets.window_menu.clone();
    menu_click.connect_pressed(move |gesture, _, x, y| {
        gesture.set_state(gtk4::EventSequenceState::Claimed);
        popover.set_pointing_to(Some(&gdk::Rectangle::new(x as i32, y as i32, 1, 1)));
        popover.popup();
    });
    // the text view claims its own right-clicks for the edit menu
    runtime.widgets.root.add_controller(menu_click);

    let target = runtime.clone();
    runtime
        .widgets
        .pin_button
        .connect_clicked(move |_| target.toggle_pin());

    let target = runtime.clone();
    window.connect_is_active_notify(move |window| target.focus_changed(window.is_active()));

    if let Some(settings) = runtime.settings.as_ref() {
        let mut handlers = runtime.settings_handlers.borrow_mut();
        for property in THEME_SETTING_PROPERTIES {
            let target = runtime.clone();
            handlers.push(settings.connect_notify_local(Some(property), move |_, _| {
                target.system_theme_changed();
            }));
        }
    }

    let target = runtime.clone();
    window.connect_close_request(move |_| {
        target.teardown();
        glib::Propagation::Proceed
    });
}

/// Builds, wires and presents one note window.
pub(super) fn open_note_window(context: &Rc<NoteWindowContext>) {
    let ticket = context.lifecycle.on_window_created();
    let id = NoteWindowId {
        name: format!("note-window-{}", ticket.id),
        title: format!("Sticky note {}", ticket.id),
    };
    let config = context.config.as_ref();
    let widgets = build_note_widgets(&context.app, &id, config);

    let settings = gtk4::Settings::default();
    let shell = NoteShell::new(
        NoteShellConfig {
            handle: config.drag_handle,
            hide_toolbar_on_blur: config.hide_toolbar_on_blur,
            toolbar_height: LAYOUT_TOKENS.toolbar_height,
            surface: SurfaceSize::new(config.window_width, config.window_height),
            font_family: config.font_family.clone(),
        },
        Box::new(GtkSettingsThemeSource::new(settings.clone())),
    );

    let runtime = Rc::new(NoteWindowRuntime {
        context: context.clone(),
        window_class: id.name.clone(),
        ticket: Cell::new(Some(ticket)),
        pinner: pinner_for(context.backend, &id),
        mover: NoteMover::for_backend(context.backend, &id),
        css: NoteCssProvider::install(),
        shell: RefCell::new(shell),
        settings,
        settings_handlers: RefCell::new(Vec::new()),
        widgets,
        id,
    });

    attach_font_buttons(&runtime);
    attach_resize_grip(&runtime);
    install_note_actions(&runtime);
    connect_note_input(&runtime);
    runtime.apply_style();

    runtime.widgets.window.present();
    if context.backend == PinBackend::Hyprland {
        request_window_floating(
            &runtime.id.name,
            &runtime.id.title,
            (config.window_width, config.window_height),
        );
    }
    tracing::info!(
        window = runtime.id.name,
        backend = ?context.backend,
        "note window opened"
    );
}

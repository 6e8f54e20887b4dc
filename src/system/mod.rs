//! The menu system: mode controller and public operations.
//!
//! `MenuSystem` owns the display surface, the menu tree and all navigation
//! and editing state. The application builds its menus through it, then
//! calls [`MenuSystem::update`] once per main-loop iteration. Each update:
//!
//! 1. decodes pending rotation and at most one button event,
//! 2. runs the screen saver,
//! 3. expires a flash message,
//! 4. applies the menu inactivity timeout,
//! 5. dispatches rotation, then the button event, to the current mode,
//! 6. renders the current mode.
//!
//! Nothing here blocks; all waiting is done by comparing stored timestamps
//! against the clock.

pub mod editing;
pub mod navigation;


use core::cell::Cell;

use crate::clock::{elapsed, Clock};
use crate::config::{MenuConfig, PinConfig, DEFAULT_FLASH_MS, FLASH_MESSAGE_LEN, MAX_VISIBLE_ROWS};
use crate::error::Error;
use crate::input::debounce::PressClassifier;
use crate::input::quadrature::StepDecoder;
use crate::input::{ButtonEvent, ButtonLevels, InputCapture};
use crate::menu::tree::MenuTree;
use crate::menu::{truncated, ActionHook, ChoiceItem, NodeId, NodeKind, NumericItem, TextItem};
use crate::power_logic;
use crate::render::{self, MenuRow, Surface};
use crate::status::StatusSnapshot;

use editing::{Append, Session};
use navigation::Navigation;

/// Fully replaces the status screen drawing. Receives the surface and
/// the display width and height.
pub type StatusRenderHook<'a, D> = &'a mut dyn FnMut(&mut D, u32, u32);

/// Offered every button event on the status screen; returning `true`
/// marks it consumed.
pub type StatusInputHook<'a> = &'a mut dyn FnMut(ButtonEvent) -> bool;

/// Offered rotation deltas on the status screen.
pub type StatusEncoderHook<'a> = &'a mut dyn FnMut(i32);

/// What the display is currently showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    StatusScreen,
    MenuNavigation,
    NumericEntry,
    StringEntry,
    EitherOrEntry,
    FlashMessage,
}

impl Mode {
    pub fn is_editing(self) -> bool {
        matches!(
            self,
            Mode::NumericEntry | Mode::StringEntry | Mode::EitherOrEntry
        )
    }
}

struct Flash {
    message: heapless::String<FLASH_MESSAGE_LEN>,
    started: u32,
    duration: u32,
    /// Mode restored when the message expires.
    previous: Mode,
}

pub struct MenuSystem<'a, D: Surface, B, C> {
    surface: D,
    buttons: B,
    clock: C,
    capture: &'a InputCapture,
    config: MenuConfig,
    ready: bool,

    tree: MenuTree<'a>,
    nav: Navigation,
    mode: Mode,
    session: Option<Session<'a>>,

    decoder: StepDecoder,
    classifier: PressClassifier,

    last_activity: u32,
    last_menu_activity: u32,
    saver_active: bool,
    flash: Option<Flash>,

    status: Option<&'a StatusSnapshot>,
    status_render: Option<StatusRenderHook<'a, D>>,
    status_input: Option<StatusInputHook<'a>>,
    status_encoder: Option<StatusEncoderHook<'a>>,
}

impl<'a, D, B, C> MenuSystem<'a, D, B, C>
where
    D: Surface,
    B: ButtonLevels,
    C: Clock,
{
    pub fn new(
        surface: D,
        buttons: B,
        clock: C,
        capture: &'a InputCapture,
        config: MenuConfig,
    ) -> Self {
        let now = clock.now_ms();
        Self {
            surface,
            buttons,
            clock,
            capture,
            config,
            ready: false,
            tree: MenuTree::new(),
            nav: Navigation::new(config.geometry.visible_rows()),
            mode: Mode::StatusScreen,
            session: None,
            decoder: StepDecoder::new(config.pulses_per_step),
            classifier: PressClassifier::new(config.debounce_ms, config.long_press_ms),
            last_activity: now,
            last_menu_activity: now,
            saver_active: false,
            flash: None,
            status: None,
            status_render: None,
            status_input: None,
            status_encoder: None,
        }
    }

    /// Validate the pin assignment and bring up the display.
    ///
    /// On failure the system stays inert: `update()` keeps consuming input
    /// but draws nothing.
    pub fn begin(&mut self, pins: &PinConfig) -> Result<(), Error> {
        self.ready = false;
        if let Err(e) = pins.validate() {
            warn!("pin assignment rejected: {}", e);
            return Err(e);
        }
        self.classifier
            .set_encoder_button(pins.encoder_button.is_some());

        if self.surface.init().is_err() {
            warn!("display init failed");
            return Err(Error::Display);
        }

        self.decoder.sync(self.capture);
        self.capture.clear_presses();
        let now = self.clock.now_ms();
        self.last_activity = now;
        self.last_menu_activity = now;
        self.ready = true;
        info!(
            "menu system ready ({}x{}, {} rows)",
            self.config.geometry.width,
            self.config.geometry.height,
            self.nav.visible
        );
        self.render();
        Ok(())
    }

    // ── Menu building ───────────────────────────────────────────────────

    pub fn tree(&self) -> &MenuTree<'a> {
        &self.tree
    }

    pub fn create_menu(&mut self, title: &str) -> Result<NodeId, Error> {
        self.tree.create_menu(title)
    }

    pub fn set_root_menu(&mut self, menu: NodeId) -> Result<(), Error> {
        self.tree.set_root(menu)?;
        if self.nav.menu.is_none() {
            self.nav.open(menu);
        }
        Ok(())
    }

    pub fn add_submenu(&mut self, parent: NodeId, label: &str) -> Result<NodeId, Error> {
        self.tree.add_submenu(parent, label)
    }

    pub fn attach_submenu(
        &mut self,
        parent: NodeId,
        label: &str,
        menu: NodeId,
    ) -> Result<NodeId, Error> {
        self.tree.attach_submenu(parent, label, menu)
    }

    pub fn add_action(
        &mut self,
        parent: NodeId,
        label: &str,
        hook: Option<ActionHook<'a>>,
    ) -> Result<NodeId, Error> {
        self.tree.add_action(parent, label, hook)
    }

    pub fn add_numeric(
        &mut self,
        parent: NodeId,
        label: &str,
        item: NumericItem<'a>,
    ) -> Result<NodeId, Error> {
        self.tree.add_numeric(parent, label, item)
    }

    pub fn add_string(
        &mut self,
        parent: NodeId,
        label: &str,
        item: TextItem<'a>,
    ) -> Result<NodeId, Error> {
        self.tree.add_string(parent, label, item)
    }

    pub fn add_either_or(
        &mut self,
        parent: NodeId,
        label: &str,
        item: ChoiceItem<'a>,
    ) -> Result<NodeId, Error> {
        self.tree.add_either_or(parent, label, item)
    }

    pub fn add_info(&mut self, parent: NodeId, label: &str) -> Result<NodeId, Error> {
        self.tree.add_info(parent, label)
    }

    /// Release everything below `node` so it can be repopulated.
    pub fn clear_children(&mut self, node: NodeId) -> Result<usize, Error> {
        let released = self.tree.clear_children(node)?;
        self.revalidate();
        Ok(released)
    }

    /// Bring navigation back in line with the tree after a mutation.
    fn revalidate(&mut self) {
        if let Some(menu) = self.nav.menu {
            if !self.tree.contains(menu) {
                debug!("listed menu released, falling back to root");
                self.nav.menu = None;
                if let Some(root) = self.tree.root() {
                    self.nav.open(root);
                }
            }
        }
        match self.nav.menu {
            Some(menu) => {
                let count = self.tree.child_count(menu);
                self.nav.select(self.nav.selected, count);
            }
            None => {
                if self.mode == Mode::MenuNavigation {
                    self.set_mode(Mode::StatusScreen);
                }
            }
        }
    }

    // ── Mode control ────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_menu(&self) -> Option<NodeId> {
        self.nav.menu
    }

    pub fn selected_index(&self) -> usize {
        self.nav.selected
    }

    pub fn scroll_offset(&self) -> usize {
        self.nav.scroll
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_screen_saver_active(&self) -> bool {
        self.saver_active
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!("mode {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    pub fn show_status_screen(&mut self) {
        if self.session.take().is_some() {
            debug!("edit discarded");
        }
        self.flash = None;
        self.set_mode(Mode::StatusScreen);
    }

    /// Open the root menu at its first item. Does nothing without a root.
    pub fn show_menu(&mut self) {
        let Some(root) = self.tree.root() else {
            debug!("no root menu to show");
            return;
        };
        self.session = None;
        self.flash = None;
        self.nav.open(root);
        self.reset_menu_activity();
        self.set_mode(Mode::MenuNavigation);
    }

    /// List `menu` from its first item. An edit in progress carries on and
    /// returns to `menu` when it ends.
    pub fn navigate_to(&mut self, menu: NodeId) -> Result<(), Error> {
        match self.tree.get(menu) {
            Some(node) if node.kind().is_submenu() => {}
            Some(_) => return Err(Error::NotASubmenu),
            None => return Err(Error::StaleNode),
        }
        self.nav.open(menu);
        self.reset_activity();
        self.reset_menu_activity();
        if self.mode == Mode::StatusScreen {
            self.set_mode(Mode::MenuNavigation);
        } else if let Some(flash) = self.flash.as_mut() {
            if flash.previous == Mode::StatusScreen {
                flash.previous = Mode::MenuNavigation;
            }
        }
        Ok(())
    }

    /// Show `message` in a box over the current screen for `duration_ms`
    /// (0 picks the default), then return to whatever was showing.
    pub fn show_flash_message(&mut self, message: &str, duration_ms: u32) {
        let previous = match &self.flash {
            Some(flash) => flash.previous,
            None => self.mode,
        };
        let duration = if duration_ms == 0 { DEFAULT_FLASH_MS } else { duration_ms };
        debug!("flash for {} ms", duration);
        self.flash = Some(Flash {
            message: truncated(message),
            started: self.clock.now_ms(),
            duration,
            previous,
        });
        self.reset_activity();
        self.set_mode(Mode::FlashMessage);
    }

    /// Edit a boolean that isn't in the tree, as an overlay over the
    /// current screen. Confirm commits, back abandons; either way the
    /// previous screen comes back.
    pub fn enter_either_or_edit(
        &mut self,
        slot: &'a Cell<bool>,
        first: &'a str,
        second: &'a str,
        on_save: Option<ActionHook<'a>>,
        label: &str,
    ) {
        let mut item = ChoiceItem::new(slot).options(first, second);
        item.on_save = on_save;

        let underneath = match self.flash.take() {
            Some(flash) => flash.previous,
            None => self.mode,
        };
        let return_to = if underneath.is_editing() {
            Mode::MenuNavigation
        } else {
            underneath
        };

        self.session = Session::start(None, label, &NodeKind::EitherOr(item), return_to);
        self.reset_activity();
        self.reset_menu_activity();
        self.set_mode(Mode::EitherOrEntry);
    }

    pub fn set_contrast(&mut self, level: u8) {
        self.surface.set_contrast(level);
    }

    pub fn enable_screen_saver(&mut self, timeout_ms: u32) {
        self.config.screen_saver_ms = timeout_ms;
        self.saver_active = false;
        self.last_activity = self.clock.now_ms();
        info!("screen saver after {} ms", timeout_ms);
    }

    pub fn disable_screen_saver(&mut self) {
        self.config.screen_saver_ms = 0;
        self.saver_active = false;
        info!("screen saver disabled");
    }

    /// 0 disables the timeout.
    pub fn set_menu_timeout(&mut self, timeout_ms: u32) {
        self.config.menu_timeout_ms = timeout_ms;
    }

    /// Restart the screen-saver timer, waking the display if it is dark.
    pub fn reset_activity(&mut self) {
        self.last_activity = self.clock.now_ms();
        if self.saver_active {
            self.saver_active = false;
            info!("screen saver off");
        }
    }

    /// Restart the menu inactivity timer.
    pub fn reset_menu_activity(&mut self) {
        self.last_menu_activity = self.clock.now_ms();
    }

    pub fn set_status_data(&mut self, status: &'a StatusSnapshot) {
        self.status = Some(status);
    }

    pub fn set_status_render_hook(&mut self, hook: StatusRenderHook<'a, D>) {
        self.status_render = Some(hook);
    }

    pub fn set_status_input_hook(&mut self, hook: StatusInputHook<'a>) {
        self.status_input = Some(hook);
    }

    pub fn set_status_encoder_hook(&mut self, hook: StatusEncoderHook<'a>) {
        self.status_encoder = Some(hook);
    }

    // ── Main loop ───────────────────────────────────────────────────────

    /// One main-loop step. Never blocks.
    pub fn update(&mut self) {
        let now = self.clock.now_ms();
        let mut delta = self.decoder.poll(self.capture);
        let mut event = self
            .classifier
            .poll(self.capture, &mut self.buttons, now);
        let had_input = delta != 0 || event.is_some();

        if self.saver_active {
            if !had_input {
                self.step_timers(now);
                return;
            }
            // The input that wakes the display does nothing else.
            self.touch(now);
            info!("screen saver off");
            self.saver_active = false;
            delta = 0;
            event = None;
        } else if !power_logic::screen_should_be_on(
            self.config.screen_saver_ms,
            elapsed(now, self.last_activity),
            had_input,
        ) {
            info!("screen saver on");
            self.saver_active = true;
            if self.ready {
                self.surface.clear();
                let _ = self.surface.present();
            }
            return;
        }

        self.step_timers(now);

        if self.mode != Mode::FlashMessage {
            if delta != 0 {
                self.touch(now);
                self.on_rotate(delta);
            }
            if let Some(event) = event {
                self.touch(now);
                self.on_button(event);
            }
        }

        self.render();
    }

    /// Flash expiry, then the menu inactivity timeout.
    fn step_timers(&mut self, now: u32) {
        if self.mode == Mode::FlashMessage {
            let expired = match &self.flash {
                Some(flash) => elapsed(now, flash.started) >= flash.duration,
                None => true,
            };
            if expired {
                let previous = self
                    .flash
                    .take()
                    .map_or(Mode::StatusScreen, |flash| flash.previous);
                debug!("flash expired");
                self.last_menu_activity = now;
                self.set_mode(previous);
            }
        }

        if self.mode != Mode::StatusScreen
            && self.mode != Mode::FlashMessage
            && power_logic::menu_timed_out(
                self.config.menu_timeout_ms,
                elapsed(now, self.last_menu_activity),
            )
        {
            info!("menu timeout");
            self.show_status_screen();
        }
    }

    fn touch(&mut self, now: u32) {
        self.last_activity = now;
        self.last_menu_activity = now;
    }

    fn on_rotate(&mut self, delta: i32) {
        match self.mode {
            Mode::StatusScreen => {
                if let Some(hook) = self.status_encoder.as_mut() {
                    hook(delta);
                }
            }
            Mode::MenuNavigation => {
                let Some(menu) = self.nav.menu else {
                    return;
                };
                let count = self.tree.child_count(menu);
                self.nav.step(delta, count, self.config.wraparound);
            }
            Mode::NumericEntry | Mode::StringEntry | Mode::EitherOrEntry => {
                if let Some(session) = self.session.as_mut() {
                    session.rotate(delta);
                }
            }
            Mode::FlashMessage => {}
        }
    }

    fn on_button(&mut self, event: ButtonEvent) {
        trace!("button {} in {}", event, self.mode);
        match self.mode {
            Mode::StatusScreen => {
                if let Some(hook) = self.status_input.as_mut() {
                    if hook(event) {
                        return;
                    }
                }
                if event == ButtonEvent::EncoderClick {
                    self.show_menu();
                }
            }
            Mode::MenuNavigation => match event {
                ButtonEvent::ConfirmClick | ButtonEvent::EncoderClick => self.activate_selected(),
                ButtonEvent::BackClick => self.go_back(),
                _ => {}
            },
            Mode::NumericEntry | Mode::EitherOrEntry => match event {
                ButtonEvent::ConfirmClick | ButtonEvent::EncoderClick => self.commit_session(),
                ButtonEvent::BackClick => self.abandon_session(),
                _ => {}
            },
            Mode::StringEntry => match event {
                ButtonEvent::EncoderClick => {
                    let appended = self.session.as_mut().map(Session::append);
                    if appended != Some(Append::Added) {
                        self.commit_session();
                    }
                }
                ButtonEvent::ConfirmClick => self.commit_session(),
                ButtonEvent::BackClick => {
                    let removed = self.session.as_mut().map_or(false, Session::backspace);
                    if !removed {
                        self.abandon_session();
                    }
                }
                _ => {}
            },
            Mode::FlashMessage => {}
        }
    }

    fn activate_selected(&mut self) {
        let Some(menu) = self.nav.menu else {
            return;
        };
        let Some(id) = self.tree.child_at(menu, self.nav.selected) else {
            debug!("nothing selected");
            return;
        };
        let Some(node) = self.tree.get(id) else {
            return;
        };
        let kind = *node.kind();
        let has_children = node.has_children();

        match kind {
            NodeKind::Submenu => {
                if has_children {
                    self.nav.open(id);
                } else {
                    debug!("submenu is empty");
                }
            }
            NodeKind::Action { hook } => {
                if let Some(hook) = hook {
                    debug!("action");
                    hook();
                }
            }
            NodeKind::Numeric(_) | NodeKind::Text(_) | NodeKind::EitherOr(_) => {
                let session = Session::start(Some(id), node.label(), &kind, Mode::MenuNavigation);
                if let Some(session) = session {
                    debug!("editing {}", kind.name());
                    let mode = session.mode();
                    self.session = Some(session);
                    self.set_mode(mode);
                }
            }
            NodeKind::Info => {}
        }
    }

    fn go_back(&mut self) {
        let Some(menu) = self.nav.menu else {
            self.show_status_screen();
            return;
        };
        let root = self.tree.root();
        if root == Some(menu) {
            self.show_status_screen();
            return;
        }
        match self.tree.parent(menu) {
            Some(parent) => {
                let count = self.tree.child_count(parent);
                let index = self.tree.index_of(menu).unwrap_or(0);
                self.nav.open(parent);
                self.nav.select(index, count);
            }
            // A detached menu reached through navigate_to.
            None => match root {
                Some(root) => self.nav.open(root),
                None => self.show_status_screen(),
            },
        }
    }

    fn commit_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let return_to = session.return_to;
        match session.origin {
            Some(origin) if !self.tree.contains(origin) => {
                warn!("edited item was removed, not saving");
            }
            _ => {
                debug!("edit committed");
                session.commit();
            }
        }
        self.exit_to(return_to);
    }

    fn abandon_session(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("edit abandoned");
            self.exit_to(session.return_to);
        }
    }

    fn exit_to(&mut self, mode: Mode) {
        if mode == Mode::MenuNavigation && self.nav.menu.is_none() {
            self.set_mode(Mode::StatusScreen);
        } else {
            self.set_mode(mode);
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&mut self) {
        if !self.ready {
            return;
        }
        let geometry = self.config.geometry;
        self.surface.clear();

        match self.mode {
            Mode::StatusScreen => self.render_status(),
            Mode::MenuNavigation => {
                let Some(menu) = self.nav.menu else {
                    self.render_status();
                    let _ = self.surface.present();
                    return;
                };
                let title = self.tree.get(menu).map_or("", |node| node.label());
                let mut rows: heapless::Vec<MenuRow<'_>, MAX_VISIBLE_ROWS> = heapless::Vec::new();
                for (offset, id) in self
                    .tree
                    .children(menu)
                    .enumerate()
                    .skip(self.nav.scroll)
                    .take(self.nav.visible)
                {
                    let Some(node) = self.tree.get(id) else {
                        continue;
                    };
                    let _ = rows.push(MenuRow {
                        label: node.label(),
                        submenu: node.kind().is_submenu(),
                        selected: offset == self.nav.selected,
                    });
                }
                render::draw_menu(&mut self.surface, &geometry, title, &rows);
            }
            Mode::NumericEntry => {
                if let Some(view) = self.session.as_ref().and_then(|s| s.numeric_view()) {
                    render::draw_numeric(&mut self.surface, &geometry, &view);
                }
            }
            Mode::StringEntry => {
                if let Some(view) = self.session.as_ref().and_then(|s| s.text_view()) {
                    render::draw_text_entry(&mut self.surface, &geometry, &view);
                }
            }
            Mode::EitherOrEntry => {
                if let Some(view) = self.session.as_ref().and_then(|s| s.choice_view()) {
                    render::draw_either_or(&mut self.surface, &geometry, &view);
                }
            }
            Mode::FlashMessage => {
                if let Some(flash) = &self.flash {
                    render::draw_flash(&mut self.surface, &geometry, &flash.message);
                }
            }
        }

        let _ = self.surface.present();
    }

    fn render_status(&mut self) {
        let geometry = self.config.geometry;
        match self.status_render.as_mut() {
            Some(hook) => hook(&mut self.surface, geometry.width, geometry.height),
            None => render::draw_status(&mut self.surface, &geometry, self.status),
        }
    }
}

use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::icon::IconCache;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::view::{self, Viewport};
use crate::gui::window;
use crate::menu::{EventKind, Intent, LevelId, Menu, PointerTarget, input};
use crate::sys::exec;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Shared view parameters; the draw closure reads them, config reload
/// replaces them.
#[derive(Debug, Clone, Copy)]
pub struct ViewParams {
    pub size: f64,
    pub radius: f64,
}

pub struct AppModel {
    pub menu: Rc<RefCell<Menu>>,
    pub params: Rc<Cell<ViewParams>>,
    pub icons: Rc<RefCell<IconCache>>,
    pub transition_ms: u64,
    pub visible: bool,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Open(Option<Vec<usize>>),
    Close,
    Intent(Intent),
    Press(f64, f64),
    Motion(f64, f64),
    Release(f64, f64),
    TransitionDone(LevelId),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Open(path) => AppMsg::Open(path),
            AppEvent::Close => AppMsg::Close,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Rondel"),
            #[watch]
            set_visible: model.visible,
            #[watch]
            set_opacity: if model.visible { 1.0 } else { 0.0 },
            add_css_class: "rondel-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match input::from_key(key) {
                        Some(intent) => {
                            sender.input(AppMsg::Intent(intent));
                            glib::Propagation::Stop
                        }
                        None => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "rondel-drawing-area",

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::Motion(x, y));
                    }
                },

                add_controller = gtk::GestureClick {
                    connect_pressed[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::Press(x, y));
                    },
                    connect_released[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::Release(x, y));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let menu = Rc::new(RefCell::new(Menu::new(
            config.build_items(),
            config.radius,
            config.close_on_click,
        )));
        let params = Rc::new(Cell::new(ViewParams {
            size: config.size,
            radius: config.radius,
        }));
        let icons = Rc::new(RefCell::new(IconCache::new()));

        let model = AppModel {
            menu: menu.clone(),
            params: params.clone(),
            icons: icons.clone(),
            transition_ms: config.transition_ms,
            visible: false,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        // wheel input; scroll down advances the selection
        let scroll = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::VERTICAL);
        let scroll_sender = sender.clone();
        scroll.connect_scroll(move |_, _, dy| match input::from_scroll(dy) {
            Some(intent) => {
                scroll_sender.input(AppMsg::Intent(intent));
                glib::Propagation::Stop
            }
            None => glib::Propagation::Proceed,
        });
        widgets.drawing_area.add_controller(scroll);

        let menu_draw = menu.clone();
        let params_draw = params.clone();
        let icons_draw = icons.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let colors = ThemeColors::from_context(&drawing_area.style_context());
                let p = params_draw.get();
                let viewport = Viewport::new(width as f64, height as f64, p.size, p.radius);
                if let Err(e) = view::draw(
                    cr,
                    &menu_draw.borrow(),
                    &mut icons_draw.borrow_mut(),
                    &colors,
                    &viewport,
                ) {
                    log::error!("Drawing error: {}", e);
                }
            });

        // host-side consumer of menu events: log everything, run leaf actions
        let events = menu.borrow_mut().subscribe();
        relm4::spawn_local(async move {
            while let Ok(event) = events.recv().await {
                log::info!("menu event: {}", event.kind);
                if event.kind == EventKind::ItemActivated
                    && let Some(item) = &event.item
                    && let Some(cmd) = &item.exec
                    && let Err(e) = exec::spawn_detached(cmd)
                {
                    log::error!("Failed to run '{}': {}", item.label(), e);
                }
            }
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Open(path) => {
                let pending = self.menu.borrow_mut().open(path.as_deref());
                self.schedule(pending, &sender);
                self.sync_view();
            }
            AppMsg::Close => {
                let pending = self.menu.borrow_mut().close();
                self.schedule(pending, &sender);
                self.sync_view();
            }
            AppMsg::Intent(intent) => {
                if self.menu.borrow().is_closed() {
                    return;
                }
                match intent {
                    Intent::Move(delta) => {
                        self.menu.borrow_mut().move_selection(delta);
                    }
                    Intent::Activate => {
                        let pending = self.menu.borrow_mut().activate_selection();
                        self.schedule(pending, &sender);
                    }
                    Intent::Back => {
                        let pending = self.menu.borrow_mut().back_or_close();
                        self.schedule(pending, &sender);
                    }
                }
                self.sync_view();
            }
            AppMsg::Motion(x, y) | AppMsg::Press(x, y) => {
                if let PointerTarget::Wedge {
                    item: Some(index), ..
                } = self.target_at(x, y)
                    && self.menu.borrow_mut().set_selection(index)
                {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Release(x, y) => {
                if self.menu.borrow().is_closed() {
                    return;
                }
                // release activates the current selection, tolerating drift
                // off the pressed wedge
                let pending = match self.target_at(x, y) {
                    PointerTarget::Center => self.menu.borrow_mut().back_or_close(),
                    PointerTarget::Wedge { .. } => self.menu.borrow_mut().activate_selection(),
                    PointerTarget::Outside => Vec::new(),
                };
                self.schedule(pending, &sender);
                self.sync_view();
            }
            AppMsg::TransitionDone(id) => {
                self.menu.borrow_mut().complete_transition(id);
                self.sync_view();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.menu.borrow_mut().reconfigure(
                        new_config.build_items(),
                        new_config.radius,
                        new_config.close_on_click,
                    );
                    self.params.set(ViewParams {
                        size: new_config.size,
                        radius: new_config.radius,
                    });
                    self.transition_ms = new_config.transition_ms;
                    self.sync_view();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}

impl AppModel {
    fn sync_view(&mut self) {
        self.visible = !self.menu.borrow().is_closed();
        self.drawing_area.queue_draw();
    }

    fn target_at(&self, x: f64, y: f64) -> PointerTarget {
        let menu = self.menu.borrow();
        let Some(level) = menu.interactive() else {
            return PointerTarget::Outside;
        };
        let p = self.params.get();
        let viewport = Viewport::new(
            self.drawing_area.width() as f64,
            self.drawing_area.height() as f64,
            p.size,
            p.radius,
        );
        input::pointer_target(level.layout(), viewport.to_logical(x, y))
    }

    /// Completion of a visual transition is delivered as a one-shot timer,
    /// or a deferred tick when animation is disabled, so the state machine
    /// always advances.
    fn schedule(&self, pending: Vec<LevelId>, sender: &ComponentSender<Self>) {
        for id in pending {
            let sender = sender.clone();
            if self.transition_ms == 0 {
                glib::idle_add_local_once(move || sender.input(AppMsg::TransitionDone(id)));
            } else {
                glib::timeout_add_local_once(Duration::from_millis(self.transition_ms), move || {
                    sender.input(AppMsg::TransitionDone(id));
                });
            }
        }
    }
}

use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::wheel::{self, GtkHost, WheelView, host::pointer_input};
use crate::sys::runtime::Services;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use sunburst::{Dataset, FrameToken, PointerInput, RotationController};

pub struct AppModel {
    pub config: Config,
    pub services: Services,
    pub view: Rc<RefCell<WheelView>>,
    pub controller: RotationController<GtkHost>,
    pub host: GtkHost,
}

#[derive(Debug)]
pub enum AppMsg {
    DataLoaded(Dataset),
    DataChanged,
    ConfigReload,
    PointerDown(PointerInput),
    PointerMove(PointerInput),
    PointerUp,
    PointerLeave,
    Frame(FrameToken),
    EditConfig,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::DataLoaded(d) => AppMsg::DataLoaded(d),
            AppEvent::DataChanged => AppMsg::DataChanged,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, Services, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Sunwheel"),
            set_default_size: (900, 900),
            add_css_class: "sunwheel-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, modifiers| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Quit);
                        return glib::Propagation::Stop;
                    }
                    if key == gtk::gdk::Key::comma
                        && modifiers.contains(gtk::gdk::ModifierType::CONTROL_MASK)
                    {
                        sender.input(AppMsg::EditConfig);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "sunwheel-drawing-area",

                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |gesture, x, y| {
                        sender.input(AppMsg::PointerDown(pointer_input(gesture, x, y)));
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::PointerMove(pointer_input(gesture, x + dx, y + dy)));
                        }
                    },
                    connect_drag_end[sender] => move |_, _, _| {
                        sender.input(AppMsg::PointerUp);
                    },
                },

                add_controller = gtk::EventControllerMotion {
                    connect_leave[sender] => move |_| {
                        sender.input(AppMsg::PointerLeave);
                    }
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, services, rx) = init;

        theme::load_css();

        let wheel_view = Rc::new(RefCell::new(WheelView::default()));
        let controller = RotationController::new(config.wheel.inertia);

        let model = AppModel {
            config,
            services,
            view: wheel_view.clone(),
            controller,
            host: GtkHost {
                drawing_area: gtk::DrawingArea::default(),
                view: wheel_view,
                sender: sender.clone(),
            },
        };

        let widgets = view_output!();

        let mut model = model;
        model.host.drawing_area = widgets.drawing_area.clone();

        let view_draw = model.view.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = wheel::draw(
                    cr,
                    &view_draw.borrow(),
                    width as f64,
                    height as f64,
                    &colors,
                ) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::DataLoaded(dataset) => {
                let result = self
                    .view
                    .borrow_mut()
                    .set_dataset(dataset, &self.config.wheel);
                self.after_rebuild(result);
            }
            AppMsg::DataChanged => {
                self.services.load(self.config.data_path());
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    let data_moved = new_config.data_path() != self.config.data_path();
                    self.config = new_config;
                    self.controller.set_inertia(self.config.wheel.inertia);
                    log::info!("Configuration reloaded");

                    if data_moved {
                        self.services.watch_data(self.config.data_path());
                        self.services.load(self.config.data_path());
                    } else {
                        let result = self.view.borrow_mut().rebuild(&self.config.wheel);
                        self.after_rebuild(result);
                    }
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::PointerDown(input) => self.controller.pointer_down(&mut self.host, &input),
            AppMsg::PointerMove(input) => self.controller.pointer_move(&mut self.host, &input),
            AppMsg::PointerUp => self.controller.pointer_up(&mut self.host),
            AppMsg::PointerLeave => self.controller.pointer_leave(&mut self.host),
            AppMsg::Frame(token) => self.controller.frame(&mut self.host, token),
            AppMsg::EditConfig => match config::write_default_config() {
                Ok(path) => {
                    if let Err(e) = std::process::Command::new("xdg-open").arg(&path).spawn() {
                        log::error!("Failed to open {}: {}", path.display(), e);
                    }
                }
                Err(e) => log::error!("Failed to write default config: {}", e),
            },
            AppMsg::Quit => {
                self.controller.halt(&mut self.host);
                relm4::main_application().quit();
            }
        }
    }
}

impl AppModel {
    fn after_rebuild(&self, result: Result<Option<sunburst::Wheel>, glib::Error>) {
        match result {
            Ok(Some(wheel)) => log::info!(
                "Wheel rebuilt: {} sectors over {} leaves",
                wheel.sectors.len(),
                wheel.total_leaves
            ),
            Ok(None) => {}
            Err(e) => log::error!("Failed to rasterise wheel: {}", e),
        }
        self.host.drawing_area.queue_draw();
    }
}

use crate::config;
use crate::events::AppEvent;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::view;
use crate::wheel::{DropOutcome, Point, RadialLayout, Wheel};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

const CANVAS_MARGIN: f64 = 140.0; // room for month names outside the rim

pub struct AppModel {
    pub wheel: Rc<RefCell<Wheel>>,
    pub draft: String,
    pub full: bool,
    pub config_path: PathBuf,
    pub entry: gtk::Entry,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    DraftChanged(String),
    AddGoal,
    DragBegin(Point),
    DragUpdate(f64, f64),
    DragEnd(f64, f64),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn canvas_size(layout: &RadialLayout) -> (i32, i32) {
    let center = layout.center();
    let reach = layout.outer_radius() + CANVAS_MARGIN;
    (
        (center.x + reach).ceil() as i32,
        (center.y + reach).ceil() as i32,
    )
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        Wheel,
        PathBuf,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Goal Wheel"),

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 6,
                    set_halign: gtk::Align::Center,
                    add_css_class: "goal-wheel-input",

                    #[name = "entry"]
                    gtk::Entry {
                        set_placeholder_text: Some("New goal"),
                        connect_changed[sender] => move |entry| {
                            sender.input(AppMsg::DraftChanged(entry.text().to_string()));
                        },
                        connect_activate[sender] => move |_| {
                            sender.input(AppMsg::AddGoal);
                        },
                    },

                    gtk::Button {
                        set_label: "Add goal",
                        #[watch]
                        set_sensitive: !model.full,
                        connect_clicked => AppMsg::AddGoal,
                    },
                },

                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,

                    add_controller = gtk::GestureDrag {
                        connect_drag_begin[sender] => move |_, x, y| {
                            sender.input(AppMsg::DragBegin(Point::new(x, y)));
                        },
                        connect_drag_update[sender] => move |_, dx, dy| {
                            sender.input(AppMsg::DragUpdate(dx, dy));
                        },
                        connect_drag_end[sender] => move |_, dx, dy| {
                            sender.input(AppMsg::DragEnd(dx, dy));
                        },
                    },
                },
            },
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (wheel, config_path, rx) = init;

        theme::load_css();

        let full = wheel.is_full();
        let wheel = Rc::new(RefCell::new(wheel));

        let model = AppModel {
            wheel: wheel.clone(),
            draft: String::new(),
            full,
            config_path,
            entry: gtk::Entry::default(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.entry = widgets.entry.clone();
        model.drawing_area = widgets.drawing_area.clone();

        let (width, height) = canvas_size(wheel.borrow().layout());
        model.drawing_area.set_content_width(width);
        model.drawing_area.set_content_height(height);

        let wheel_draw = model.wheel.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = view::draw(cr, &wheel_draw.borrow().scene(), &colors) {
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
            AppMsg::DraftChanged(text) => {
                self.draft = text;
            }
            AppMsg::AddGoal => {
                let added = self.wheel.borrow_mut().submit_goal(self.draft.as_str());
                match added {
                    Some(month) => {
                        log::info!("Added goal '{}' to {}", self.draft, month);
                        self.entry.set_text("");
                        self.drawing_area.queue_draw();
                    }
                    None if self.wheel.borrow().is_full() => {
                        log::info!("Every month already has a goal");
                    }
                    None => {}
                }
                self.full = self.wheel.borrow().is_full();
            }
            AppMsg::DragBegin(point) => {
                let picked = self
                    .wheel
                    .borrow_mut()
                    .begin_drag(point, |goal| view::marker_half_width(goal));
                if picked.is_some() {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::DragUpdate(dx, dy) => {
                let mut wheel = self.wheel.borrow_mut();
                if wheel.drag().is_dragging() {
                    wheel.drag_by(dx, dy);
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::DragEnd(dx, dy) => {
                let outcome = self.wheel.borrow_mut().end_drag(dx, dy);
                if let Some(outcome) = outcome {
                    match outcome {
                        DropOutcome::Removed(month) => log::info!("Removed goal from {}", month),
                        DropOutcome::Swapped { source, target } => {
                            log::info!("Moved goal from {} to {}", source, target)
                        }
                        DropOutcome::Reset { .. } => {}
                    }
                    self.full = self.wheel.borrow().is_full();
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::ConfigReload => match config::load_config(&self.config_path)
                .and_then(|c| Ok((RadialLayout::new(c.layout_constants()?), c.roster()?)))
            {
                Ok((layout, roster)) => {
                    let (width, height) = canvas_size(&layout);
                    self.wheel.borrow_mut().reconfigure(layout, &roster);
                    self.drawing_area.set_content_width(width);
                    self.drawing_area.set_content_height(height);
                    self.drawing_area.queue_draw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}

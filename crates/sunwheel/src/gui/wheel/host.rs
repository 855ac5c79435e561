use super::model::WheelView;
use crate::gui::app::{AppModel, AppMsg};
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::ComponentSender;
use std::cell::RefCell;
use std::rc::Rc;
use sunburst::geometry::Point;
use sunburst::{FrameToken, PointerInput, RotationHost};

/// Drives rotation on a GTK drawing area using its frame clock.
pub struct GtkHost {
    pub drawing_area: gtk::DrawingArea,
    pub view: Rc<RefCell<WheelView>>,
    pub sender: ComponentSender<AppModel>,
}

impl RotationHost for GtkHost {
    type Frame = gtk::TickCallbackId;

    fn center(&self) -> Point {
        Point::new(
            self.drawing_area.width() as f64 / 2.0,
            self.drawing_area.height() as f64 / 2.0,
        )
    }

    fn apply_rotation(&mut self, degrees: f64) {
        self.view.borrow_mut().rotation = degrees;
        self.drawing_area.queue_draw();
    }

    fn request_frame(&mut self, token: FrameToken) -> gtk::TickCallbackId {
        let sender = self.sender.clone();
        self.drawing_area.add_tick_callback(move |_, _| {
            sender.input(AppMsg::Frame(token));
            glib::ControlFlow::Break
        })
    }

    fn cancel_frame(&mut self, frame: gtk::TickCallbackId) {
        frame.remove();
    }
}

/// Reads a pointer position from a gesture, tagging touchscreen input.
pub fn pointer_input(controller: &impl IsA<gtk::EventController>, x: f64, y: f64) -> PointerInput {
    let point = Point::new(x, y);
    let touch = controller
        .current_event_device()
        .is_some_and(|d| d.source() == gdk::InputSource::Touchscreen);
    if touch {
        PointerInput::Touch(vec![point])
    } else {
        PointerInput::Mouse(point)
    }
}

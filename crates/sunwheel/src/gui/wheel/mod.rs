pub mod host;
pub mod model;
pub mod view;

pub use host::GtkHost;
pub use model::WheelView;
pub use view::draw;

/// Fraction of the shorter widget side the wheel fills.
pub const FILL_FACTOR: f64 = 0.96;
pub const PLACEHOLDER_FONT_SIZE: f64 = 18.0;

pub mod config;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod hierarchy;
pub mod layout;
pub mod macros;
pub mod ring;
pub mod rotation;
pub mod surface;

pub use config::{InertiaConfig, WheelConfig};
pub use dataset::{Color, ColorMap, DataProvider, Dataset, JsonFileProvider, load_dataset};
pub use error::{DataLoadError, WheelConfigError};
pub use hierarchy::{HierarchyNode, Label, count_leaves};
pub use layout::{Sector, Wheel, build_wheel};
pub use rotation::{
    FrameToken, Mode, PointerInput, RotationController, RotationHost, RotationState,
};
pub use surface::{DrawingSurface, ElementKind, SvgScene};

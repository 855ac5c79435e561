use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed wheel data: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug, PartialEq)]
pub enum WheelConfigError {
    #[error("Radii must satisfy 0 < inner < middle < outer (got {inner}, {middle}, {outer})")]
    RadiiOutOfOrder { inner: f64, middle: f64, outer: f64 },
}

use sunburst::Dataset;

#[derive(Debug, Clone)]
pub enum AppEvent {
    DataLoaded(Dataset),
    DataChanged,
    ConfigReload,
}

use crate::error::DataLoadError;
use crate::hierarchy::{HierarchyNode, Label};
use derive_more::{AsRef, Deref, Display, From, Into};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Color(String);

crate::impl_string_newtype!(Color);

/// Category label -> fill color. Later duplicates overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ColorMap(IndexMap<Label, Color>);

impl ColorMap {
    pub fn new(entries: impl IntoIterator<Item = (impl Into<Label>, impl Into<Color>)>) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(label, color)| (label.into(), color.into()))
                .collect(),
        )
    }

    pub fn get(&self, label: &Label) -> Option<&Color> {
        self.0.get(label)
    }

    pub fn resolve<'a>(&'a self, label: &Label, fallback: &'a Color) -> &'a Color {
        self.get(label).unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything one layout pass needs. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub colors: ColorMap,
    pub labels: HierarchyNode,
}

impl Dataset {
    pub fn new(colors: ColorMap, labels: HierarchyNode) -> Self {
        Self { colors, labels }
    }

    pub fn from_json_str(s: &str) -> Result<Self, DataLoadError> {
        Ok(serde_json::from_str(s)?)
    }
}

pub trait DataProvider {
    fn load(&self) -> impl Future<Output = Result<Dataset, DataLoadError>> + Send;
}

/// Reads `{"colors": {...}, "labels": {...}}` from disk.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    pub path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataProvider for JsonFileProvider {
    async fn load(&self) -> Result<Dataset, DataLoadError> {
        let raw = fs_err::tokio::read_to_string(&self.path).await?;
        Dataset::from_json_str(&raw)
    }
}

/// Loads through `provider`, logging failures instead of returning them.
pub async fn load_dataset<P: DataProvider>(provider: &P) -> Option<Dataset> {
    match provider.load().await {
        Ok(dataset) => Some(dataset),
        Err(e) => {
            log::error!("Error reading wheel data: {}", e);
            None
        }
    }
}

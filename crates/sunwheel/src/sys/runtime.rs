use crate::config;
use crate::events::AppEvent;
use async_channel::Sender;
use std::path::PathBuf;
use std::thread;
use sunburst::{JsonFileProvider, load_dataset};
use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;

/// Background tokio runtime for loading data and watching files.
pub struct Services {
    handle: Handle,
    tx: Sender<AppEvent>,
    data_watch: Option<(PathBuf, JoinHandle<()>)>,
}

impl Services {
    pub fn start(tx: Sender<AppEvent>) -> std::io::Result<Self> {
        let rt = Runtime::new()?;
        let handle = rt.handle().clone();

        thread::spawn(move || {
            rt.block_on(std::future::pending::<()>());
        });

        match config::get_config_path() {
            Ok(path) => {
                handle.spawn(config::watch_file(path, tx.clone(), AppEvent::ConfigReload));
            }
            Err(e) => log::error!("Config watcher error: {}", e),
        }

        Ok(Self {
            handle,
            tx,
            data_watch: None,
        })
    }

    /// Loads the dataset at `path` and posts it as [`AppEvent::DataLoaded`].
    ///
    /// Failures are logged and leave the current wheel in place.
    pub fn load(&self, path: PathBuf) {
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            log::info!("Loading wheel data from {}", path.display());
            if let Some(dataset) = load_dataset(&JsonFileProvider::new(path)).await {
                let _ = tx.send(AppEvent::DataLoaded(dataset)).await;
            }
        });
    }

    /// Watches `path` for changes, replacing any previous data watcher.
    pub fn watch_data(&mut self, path: PathBuf) {
        if self
            .data_watch
            .as_ref()
            .is_some_and(|(watched, _)| *watched == path)
        {
            return;
        }
        if let Some((_, task)) = self.data_watch.take() {
            task.abort();
        }
        let task = self.handle.spawn(config::watch_file(
            path.clone(),
            self.tx.clone(),
            AppEvent::DataChanged,
        ));
        self.data_watch = Some((path, task));
    }
}

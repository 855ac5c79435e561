use relm4::prelude::*;
use sunwheel::config;
use sunwheel::gui::app::AppModel;
use sunwheel::sys::runtime::Services;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = config::load_or_default();
    let data_path = config.data_path();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    let mut services = Services::start(tx)?;
    services.watch_data(data_path.clone());
    services.load(data_path);

    let app = RelmApp::new("org.sunwheel.viewer");

    app.run::<AppModel>((config, services, rx));
    Ok(())
}

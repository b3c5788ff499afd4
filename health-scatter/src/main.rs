#![warn(clippy::all, rust_2018_idioms)]

use app_core::backend::BackendEventLoop;
use health_scatter::{BackendAppState, Config, EguiApp};

const WINDOW_NAME: &str = "Health Scatter";
const WINDOW_WIDTH: f32 = 840.0;
const WINDOW_HEIGHT: f32 = 580.0;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match Config::from_config_file() {
        Ok(config) => config,
        Err(err) => {
            log::warn!("{err}, using default configuration");
            Config::default()
        }
    };
    log::debug!("{:?}", config);

    // start backend loop
    let (command_tx, command_rx) = std::sync::mpsc::channel();
    let backend_state = BackendAppState::new(config.data_path.clone());
    let eventloop_handle = BackendEventLoop::new(command_rx, backend_state).run();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_NAME,
        native_options,
        Box::new(|cc| {
            Ok(Box::new(EguiApp::new(
                cc,
                config,
                command_tx,
                eventloop_handle,
            )))
        }),
    )
}

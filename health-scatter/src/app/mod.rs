mod components;
pub mod config;
mod events;

use self::components::Scatter;
use crate::app::events::EventQueue;
use crate::BackendAppState;
use app_core::backend::BackendRequest;
use config::Config;
use events::SavePlotRequested;

use std::{sync::mpsc::Sender, thread::JoinHandle};

pub type DynRequestSender = Sender<Box<dyn BackendRequest<BackendAppState>>>;

pub struct EguiApp {
    config: Config,
    backend_thread_handle: Option<JoinHandle<()>>,
    request_tx: DynRequestSender,
    scatter: Scatter,
    shortcuts_modal_open: bool,
    event_queue: EventQueue<Self>,
    request_redraw: Option<()>,
    /// Frame clock in seconds, drives all chart transitions.
    frame_time: f64,
}

impl EguiApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: Config,
        request_tx: DynRequestSender,
        backend_thread_handle: JoinHandle<()>,
    ) -> Self {
        let mut app = Self {
            config,
            backend_thread_handle: Some(backend_thread_handle),
            request_tx,
            scatter: Scatter::new(),
            shortcuts_modal_open: false,
            event_queue: EventQueue::<Self>::new(),
            request_redraw: None,
            frame_time: 0.0,
        };
        app.scatter.load(&mut app.request_tx);
        app
    }

    fn update_state(&mut self) {
        self.run_events();
        if self.scatter.try_update() {
            self.request_redraw();
        }
    }

    pub fn request_redraw(&mut self) {
        self.request_redraw = Some(());
    }

    fn request_svg_export(&mut self) {
        log::debug!("open dialog to select svg plot path");
        let file_name = self.config.svg_file_name.clone();
        let handle = std::thread::spawn(move || {
            rfd::FileDialog::new()
                .add_filter("SVG", &["svg"])
                .set_file_name(file_name)
                .save_file()
        });
        let event = SavePlotRequested::new(Some(handle));
        self.event_queue.queue_event(Box::new(event));
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.request_redraw.take().is_some() {
            ctx.request_repaint();
        }
        self.frame_time = ctx.input(|i| i.time);

        self.update_state();

        let mut should_quit = false;
        let mut should_export = false;

        // Handle keyboard input.
        ctx.input(|i| {
            // Help window.
            if i.key_pressed(egui::Key::F1) {
                self.shortcuts_modal_open = !self.shortcuts_modal_open;
            }
            // Close app.
            if i.key_pressed(egui::Key::F10) {
                // Quitting cannot be requested from within here, the UI stops,
                // but not the backend thread.
                should_quit = true;
            }
            if i.key_pressed(egui::Key::P) && i.modifiers.ctrl {
                should_export = true;
            }
        });
        if should_export {
            self.request_svg_export();
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.render_shortcut_modal(ctx);
            self.menu(ui, ctx);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.scatter
                .render(&mut self.event_queue, self.frame_time, ui, ctx);
        });

        if should_quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(handle) = self.backend_thread_handle.take() {
            app_core::backend::request_stop(&self.request_tx, handle);
        }
    }
}

impl EguiApp {
    fn menu(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Export SVG…").clicked() {
                    self.request_svg_export();
                    ui.close_menu();
                }
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.toggle_value(&mut self.shortcuts_modal_open, "Help (F1)");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                egui::widgets::global_theme_preference_buttons(ui);
            });
        });
    }

    fn render_shortcut_modal(&mut self, ctx: &egui::Context) {
        if self.shortcuts_modal_open
            && egui::Modal::new("shortcut_modal".into())
                .show(ctx, |ui| {
                    ui.heading("Keyboard Shortcuts");
                    ui.separator();
                    ui.label("Click an x-axis label = Switch x-axis");
                    ui.separator();
                    ui.label("CTRL + P = Export Chart as SVG");
                    ui.separator();
                    ui.label("F1 = Show Keyboard Shortcuts");
                    ui.separator();
                    ui.label("F10 = Quit App");
                    ui.separator();
                })
                .should_close()
        {
            self.shortcuts_modal_open = false;
        };
    }
}

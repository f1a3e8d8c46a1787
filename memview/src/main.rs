#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
// Tell OS to hide the console window when running.
// This attribute is only applied if the target OS is Windows.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod canvas;
mod events;
mod loader;
mod ui_filedrop;
mod ui_hexpanel;
mod ui_jumpto;
mod ui_menubar;
mod ui_popup;
mod ui_scrollbar;
mod ui_search;
mod ui_sidepanel;
mod ui_statusbar;

use crate::events::collect_ui_events;
use crate::ui_popup::PopupType;
use app::MemViewApp;
use eframe::egui;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Optional file to open on start
    let app = MemViewApp::new(std::env::args().nth(1).map(PathBuf::from));

    let options = eframe::NativeOptions {
        vsync: true,
        viewport: egui::ViewportBuilder::default()
            .with_resizable(true)
            .with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "MemView",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}

impl eframe::App for MemViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        #[cfg(debug_assertions)]
        {
            let dt = ctx.input(|i| i.stable_dt);
            let fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
            tracing::trace!(fps, "frame");
        }

        // Notifications queued by the display during the last frame
        let notifications = self.display.take_events();
        if !notifications.is_empty() {
            self.status.consume(&notifications, &self.display);
            ctx.request_repaint();
        }

        // Collect input events once per frame and store in the app state
        self.events = collect_ui_events(ctx);

        self.show_menu_bar(ctx);

        if self.error.is_some() {
            self.popup.open(PopupType::Error);
        }

        self.show_status_bar(ctx);
        self.show_side_panel(ctx);

        self.handle_drag_and_drop(ctx);

        // If pop active - show it and return (don't display the hex bytes)
        if self.popup.active {
            self.show_popup(ctx);
            return;
        }

        self.show_hex_panel(ctx);
    }
}

mod audio;
mod engine;
mod model;
mod ui;

use eframe::egui;

/// Directory name under the per-user config and data dirs.
pub const APP_DIR: &str = "ember_tales";

fn main() -> eframe::Result<()> {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = ui::settings_io::load_settings();
    if settings.llm.api_key.is_none() {
        tracing::warn!(
            "{} is not set; requests to {} go out unauthenticated",
            ui::settings_io::API_KEY_VAR,
            settings.llm.base_url
        );
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Ember Tales")
            .with_inner_size([1280.0, 820.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Ember Tales",
        options,
        Box::new(|_cc| Ok(Box::new(ui::app::GameApp::new(settings)))),
    )
}

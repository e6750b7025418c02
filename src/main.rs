#![cfg_attr(windows, windows_subsystem = "windows")]

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    use micmute_rs::audio::{AppCommandFallback, ComGuard, CoreAudioBinding, MuteController};
    use micmute_rs::platform::RegistryPreferences;
    use micmute_rs::MicMuteApp;
    use tracing::warn;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("micmute_rs=info")),
        )
        .init();

    // COM init failure is non-fatal: the binding's calls will fail and the
    // controller latches onto the fallback path for the process lifetime.
    let _com_guard = match ComGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("COM initialization failed, fallback mode only: {e}");
            None
        }
    };

    let store = RegistryPreferences::new();
    let preferences = store.load();

    let controller = MuteController::new(
        Box::new(CoreAudioBinding::new()),
        Box::new(AppCommandFallback::new()),
    );

    let window_visible = !preferences.setup_complete || !preferences.start_minimized;
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([450.0, 600.0])
            .with_resizable(false)
            .with_visible(window_visible),
        ..Default::default()
    };

    eframe::run_native(
        "MicMute",
        options,
        Box::new(move |_cc| Ok(Box::new(MicMuteApp::new(controller, store, preferences)))),
    )
    .map_err(|e| anyhow::anyhow!("event loop failed: {e}"))
}

#[cfg(not(windows))]
fn main() {
    eprintln!("MicMute targets Windows; this platform only builds the library.");
}

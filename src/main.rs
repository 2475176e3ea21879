#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use sandbox_algebra::AlgebraApp;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sandbox_algebra=info")),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_title("Sandbox Algebra"),
        ..Default::default()
    };
    eframe::run_native(
        "Sandbox Algebra",
        options,
        Box::new(|cc| Ok(Box::new(AlgebraApp::new(cc)))),
    )
}

// En wasm el punto de entrada es `start` (lib.rs).
#[cfg(target_arch = "wasm32")]
fn main() {}

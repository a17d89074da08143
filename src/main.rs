use eframe;
use sketch_codegen::ui::app::CodegenApp;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Sketch Codegen",
        options,
        Box::new(|_cc| {
            Ok(Box::new(CodegenApp::new()))
        }),
    )
}

#[cfg(not(target_arch = "wasm32"))]
use beci::BeciApp;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    log::info!("Starting North Pacific map.");
    eframe::run_native(
        "North Pacific Salmon & Ocean Conditions",
        Default::default(),
        Box::new(|cc| Ok(Box::new(BeciApp::new(cc.egui_ctx.clone())))),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {
    log::error!("beci_native is not meant to be compiled for WASM, use beci_web.");
}

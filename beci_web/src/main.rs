#[cfg(target_arch = "wasm32")]
use beci::{BeciApp, RenderSurfaceError};
#[cfg(target_arch = "wasm32")]
use eframe::wasm_bindgen::JsCast;

/// Element of the host page holding the map.
#[cfg(target_arch = "wasm32")]
const CANVAS_ID: &str = "map";

/// Element of the host page shown until the application starts.
#[cfg(target_arch = "wasm32")]
const LOADING_ID: &str = "loading";

#[cfg(target_arch = "wasm32")]
fn canvas(document: &web_sys::Document) -> Result<web_sys::HtmlCanvasElement, RenderSurfaceError> {
    document
        .get_element_by_id(CANVAS_ID)
        .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        .ok_or_else(|| RenderSurfaceError::MissingContainer(CANVAS_ID.to_owned()))
}

#[cfg(target_arch = "wasm32")]
async fn start(document: &web_sys::Document) -> Result<(), RenderSurfaceError> {
    let canvas = canvas(document)?;

    eframe::WebRunner::new()
        .start(
            canvas,
            eframe::WebOptions::default(),
            Box::new(|cc| Ok(Box::new(BeciApp::new(cc.egui_ctx.clone())))),
        )
        .await
        .map_err(|err| RenderSurfaceError::Runner(format!("{err:?}")))
}

/// Replace the loading indicator with the error and a way to try again.
#[cfg(target_arch = "wasm32")]
fn show_error(document: &web_sys::Document, err: &RenderSurfaceError) {
    log::error!("Failed to start: {err}");

    let Some(loading) = document.get_element_by_id(LOADING_ID) else {
        return;
    };

    loading.set_inner_html(&format!(
        r#"<div class="error">
            <h3>Error Loading Map</h3>
            <p>{err}</p>
            <button onclick="location.reload()">Reload</button>
        </div>"#
    ));
}

#[cfg(target_arch = "wasm32")]
fn hide_loading(document: &web_sys::Document) {
    if let Some(loading) = document.get_element_by_id(LOADING_ID) {
        if let Err(err) = loading.set_attribute("style", "display: none") {
            log::warn!("Could not hide the loading indicator: {err:?}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Redirect `log` message to `console.log` and friends:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            log::error!("No document to draw the map in.");
            return;
        };

        match start(&document).await {
            Ok(()) => hide_loading(&document),
            Err(err) => show_error(&document, &err),
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    log::error!("beci_web is only meant to be compiled for WASM, use beci_native.");
}

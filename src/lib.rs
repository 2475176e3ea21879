pub mod app;
pub mod backend;
pub mod chat;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod latex_utils;
pub mod model;
pub mod recent;
pub mod steps;
pub mod timing;
pub mod ui;
pub mod view_models;

pub use app::AlgebraApp;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Arranque en el navegador sobre el canvas indicado.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn start(canvas_id: String) -> Result<(), JsValue> {
    use wasm_bindgen::JsCast;

    console_error_panic_hook::set_once();
    // Si ya hay logger (recarga en caliente) se ignora
    let _ = console_log::init_with_level(log::Level::Info);

    let canvas = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(&canvas_id))
        .ok_or_else(|| JsValue::from_str("canvas not found"))?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;

    eframe::WebRunner::new()
        .start(
            canvas,
            eframe::WebOptions::default(),
            Box::new(|cc| Ok(Box::new(AlgebraApp::new(cc)))),
        )
        .await
}

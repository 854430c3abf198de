#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod error;
#[cfg(target_arch = "wasm32")]
mod host;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
use host::{HostInbox, HostMessage};

/// Page-side handle to a running viewer. Every call is queued and applied
/// at the start of the next frame.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct ViewerHandle {
    inbox: HostInbox,
    runner: eframe::WebRunner,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl ViewerHandle {
    pub fn set_shape(&self, tag: &str) {
        self.inbox.push(HostMessage::SetShape(tag.to_string()));
    }

    pub fn set_texture(&self, bytes: Vec<u8>, mime: &str) {
        self.inbox.push(HostMessage::SetTexture(solido_core::TexturePayload::new(
            bytes, mime,
        )));
    }

    pub fn clear_texture(&self) {
        self.inbox.push(HostMessage::ClearTexture);
    }

    pub fn stop(&self) {
        self.inbox.push(HostMessage::Stop);
    }

    /// Stops the viewer and tears down the canvas runner.
    pub fn destroy(&self) {
        self.inbox.push(HostMessage::Stop);
        self.runner.destroy();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn start(
    canvas_id: &str,
    settings_json: Option<String>,
) -> Result<ViewerHandle, wasm_bindgen::JsValue> {
    let _ = console_error_panic_hook::set_once();
    let settings = match settings_json.as_deref() {
        Some(text) => solido_core::ViewerSettings::from_json(text)
            .map_err(|err| JsValue::from_str(&err.to_string()))?,
        None => solido_core::ViewerSettings::default(),
    };

    let runner = eframe::WebRunner::new();
    let web_options = eframe::WebOptions::default();
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str("canvas not found"))?;
    let canvas: web_sys::HtmlCanvasElement = canvas
        .dyn_into()
        .map_err(|_| JsValue::from_str("canvas is not HtmlCanvasElement"))?;

    let inbox = HostInbox::new();
    let app_inbox = inbox.clone();
    runner
        .start(
            canvas,
            web_options,
            Box::new(move |cc| {
                let (console, log_level_state) = app::setup_tracing();
                app::SolidoApp::new(
                    cc,
                    console,
                    log_level_state,
                    settings,
                    solido_core::SceneConfig::default(),
                    app_inbox,
                )
                .map(|app| Box::new(app) as Box<dyn eframe::App>)
                .map_err(|err| Box::new(err) as Box<dyn std::error::Error + Send + Sync>)
            }),
        )
        .await?;

    Ok(ViewerHandle { inbox, runner })
}

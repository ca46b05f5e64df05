//! `fetch`-based transport

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::error::RemoteError;
use crate::leaderboard::Transport;

fn js_error(e: JsValue) -> RemoteError {
    RemoteError::Network(format!("{:?}", e))
}

/// JSON POST through `window.fetch`
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: String,
    ) -> Result<String, RemoteError> {
        let window = web_sys::window().ok_or_else(|| RemoteError::Network("no window".into()))?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_mode(RequestMode::Cors);
        init.set_body(&JsValue::from_str(&body));

        let request = Request::new_with_str_and_init(url, &init).map_err(js_error)?;
        for (name, value) in headers {
            request.headers().set(name, value).map_err(js_error)?;
        }

        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;
        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?
            .as_string()
            .unwrap_or_default();

        if !response.ok() {
            return Err(RemoteError::Status {
                status: response.status(),
                body: text,
            });
        }
        Ok(text)
    }
}

// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON `fetch` helper.

use alloc::string::String;

use js_sys::JSON;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, console};

/// Method used when the caller does not name one.
pub const DEFAULT_METHOD: &str = "GET";

/// Sends a JSON request and parses the JSON response.
///
/// `data`, when present, is serialized with `JSON.stringify` and sent as the
/// body. Failures are logged to the console and returned.
pub async fn api_call(url: &str, method: &str, data: Option<&JsValue>) -> Result<JsValue, JsValue> {
    let result = fetch_json(url, method, data).await;
    if let Err(err) = &result {
        console::error_2(&JsValue::from_str("API Error:"), err);
    }
    result
}

async fn fetch_json(url: &str, method: &str, data: Option<&JsValue>) -> Result<JsValue, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;
    let init = RequestInit::new();
    init.set_method(method);
    init.set_headers(&headers);
    if let Some(data) = data {
        init.set_body(&JSON::stringify(data)?.into());
    }

    let request = Request::new_with_str_and_init(url, &init)?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    JsFuture::from(response.json()?).await
}

/// `apiCall(url, method = 'GET', data = null)` for page scripts.
#[wasm_bindgen(js_name = apiCall)]
pub async fn api_call_js(
    url: String,
    method: Option<String>,
    data: JsValue,
) -> Result<JsValue, JsValue> {
    let data = (!data.is_null() && !data.is_undefined()).then_some(&data);
    api_call(&url, method.as_deref().unwrap_or(DEFAULT_METHOD), data).await
}

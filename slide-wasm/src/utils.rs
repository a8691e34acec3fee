use std::fmt::Display;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Window};

/// Log a message to the browser console.
pub fn log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

pub fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Screen rectangle of the element receiving pointer events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn of(el: &Element) -> Self {
        let r = el.get_bounding_client_rect();
        Rect {
            left: r.left(),
            top: r.top(),
            width: r.width(),
            height: r.height(),
        }
    }
}

/// Convert client coordinates into board space, one unit per cell.
pub fn to_board_space(client: (f64, f64), rect: Rect, cols: usize, rows: usize) -> (f64, f64) {
    let x = (client.0 - rect.left) / rect.width.max(1.0) * cols as f64;
    let y = (client.1 - rect.top) / rect.height.max(1.0) * rows as f64;
    (x, y)
}

/// Width and height fractions (0..=1) that fit content of `content_ratio`
/// (width / height) inside bounds of `bounds_ratio`, letterboxed.
pub fn fit_ratio(bounds_ratio: f64, content_ratio: f64) -> (f64, f64) {
    if bounds_ratio > content_ratio {
        (content_ratio / bounds_ratio, 1.0)
    } else {
        (1.0, bounds_ratio / content_ratio)
    }
}

pub fn percent(fraction: f64) -> String {
    format!("{}%", fraction * 100.0)
}

/// Build an absolute URL for an asset, taking into account the optional
/// `window.__BASE_URL` which is set by the host page.
pub fn asset_url(path: &str) -> String {
    let base = web_sys::window()
        .and_then(|w| {
            let v = js_sys::Reflect::get(&w, &JsValue::from_str("__BASE_URL")).ok()?;
            v.as_string()
        })
        .unwrap_or_else(|| "/".to_string());
    join_base(&base, path)
}

fn join_base(base: &str, path: &str) -> String {
    let p = path.trim();
    if p.starts_with("http://") || p.starts_with("https://") || p.starts_with("data:") {
        return p.to_string();
    }
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };
    format!("{}{}", base, p.trim_start_matches('/'))
}

/// Fetch a text resource trying a list of fallback URLs in order.
pub async fn fetch_text_with_fallbacks(window: &Window, urls: &[&str]) -> Option<String> {
    for url in urls {
        let resp_value =
            match wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(url)).await {
                Ok(v) => v,
                Err(_) => continue,
            };
        let resp: web_sys::Response = match resp_value.dyn_into() {
            Ok(r) => r,
            Err(_) => continue,
        };
        if !resp.ok() {
            continue;
        }
        if let Ok(text_promise) = resp.text()
            && let Ok(text_js) = wasm_bindgen_futures::JsFuture::from(text_promise).await
            && let Some(s) = text_js.as_string()
        {
            return Some(s);
        }
    }
    None
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: Rect = Rect {
        left: 100.0,
        top: 50.0,
        width: 400.0,
        height: 200.0,
    };

    #[test]
    fn board_space_scales_by_grid() {
        assert_eq!(to_board_space((100.0, 50.0), RECT, 4, 2), (0.0, 0.0));
        assert_eq!(to_board_space((350.0, 100.0), RECT, 4, 2), (2.5, 0.5));
        assert_eq!(to_board_space((500.0, 250.0), RECT, 4, 2), (4.0, 2.0));
    }

    #[test]
    fn fit_ratio_letterboxes() {
        assert_eq!(fit_ratio(2.0, 1.0), (0.5, 1.0));
        assert_eq!(fit_ratio(0.5, 1.0), (1.0, 0.5));
        assert_eq!(fit_ratio(1.0, 1.0), (1.0, 1.0));
    }

    #[test]
    fn query_params() {
        assert_eq!(get_query_param("?p=rush&x=1", "p").as_deref(), Some("rush"));
        assert_eq!(
            get_query_param("?p=my%20puzzle", "p").as_deref(),
            Some("my puzzle")
        );
        assert_eq!(get_query_param("?x=1", "p"), None);
    }

    #[test]
    fn base_joining() {
        assert_eq!(join_base("/app", "puzzle/a.json"), "/app/puzzle/a.json");
        assert_eq!(join_base("/", "/puzzle/a.json"), "/puzzle/a.json");
        assert_eq!(join_base("/app/", "https://x.y/a.json"), "https://x.y/a.json");
        assert_eq!(percent(0.25), "25%");
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use slide_core::Layout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, Window};

mod canvas;
mod constants;
mod html;
mod input;
mod state;
mod upload;
mod utils;

use crate::state::{STATE, State, View};
use crate::utils::{asset_url, fetch_text_with_fallbacks, get_query_param, log, to_js};

fn default_layout() -> Result<Layout, JsValue> {
    Layout::from_json(include_str!("../../puzzle/fifteen.json")).map_err(to_js)
}

// Skips the call when the state is busy, e.g. when a page callback fired
// from inside a board event calls back into these exports.
fn with_state(f: impl FnOnce(&mut State)) {
    STATE.with(|st| {
        if let Some(st_rc) = st.borrow().as_ref() {
            match st_rc.try_borrow_mut() {
                Ok(mut s) => f(&mut s),
                Err(_) => log("puzzle is busy, call ignored"),
            }
        }
    });
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    upload::attach_file_input(state.clone())?;

    // Reset button (restore the loaded starting positions)
    if let Some(btn) = doc.get_element_by_id("resetPuzzle") {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            st.borrow_mut().reset();
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    let target = state.borrow().view.target();
    input::attach_pointer(state, &target)
}

/// Frame loop: advances the in-flight slide and repaints when needed.
fn start_animation(state: Rc<RefCell<State>>) {
    type RafClosure = Closure<dyn FnMut(f64)>;
    let f: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        {
            let mut s = state.borrow_mut();
            s.board.tick(ts);
            if s.dirty.replace(false) {
                s.view.render(&s.board);
            }
        }
        if let Some(w) = web_sys::window()
            && let Some(cb) = f.borrow().as_ref()
        {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = web_sys::window()
        && let Some(cb) = g.borrow().as_ref()
    {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let view = View::mount(&document)?;

    let state = Rc::new(RefCell::new(State::new(
        window.clone(),
        document,
        view,
    )));
    state.borrow_mut().load(default_layout()?)?;
    STATE.with(|st| st.replace(Some(state.clone())));

    // If URL param p is set, we try to fetch puzzle/<p>.json; the default
    // layout stays in place until it arrives
    if let Ok(search) = window.location().search()
        && let Some(p) = get_query_param(&search, "p")
    {
        let win = window.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = fetch_and_load_layout(&win, &p).await {
                log(&format!("Failed to load puzzle '{}': {:?}", p, err));
            }
        });
    }

    attach_ui(state.clone())?;
    start_animation(state);
    Ok(())
}

async fn fetch_and_load_layout(window: &Window, name: &str) -> Result<(), JsValue> {
    let text = fetch_text_with_fallbacks(
        window,
        &[
            &asset_url(&format!("puzzle/{}.json", name)),
            &format!("puzzle/{}.json", name),
        ],
    )
    .await
    .ok_or_else(|| JsValue::from_str("puzzle file not found"))?;
    let layout = Layout::from_json(&text).map_err(to_js)?;
    let mut result = Ok(());
    with_state(|s| result = s.load(layout));
    result
}

/// Replace the running puzzle with a JSON layout.
#[wasm_bindgen]
pub fn load_layout(json: &str) -> Result<(), JsValue> {
    let layout = Layout::from_json(json).map_err(to_js)?;
    let mut result = Err(JsValue::from_str("puzzle not started"));
    with_state(|s| result = s.load(layout));
    result
}

#[wasm_bindgen]
pub fn reset_puzzle() {
    with_state(State::reset);
}

/// Subscribe a page callback to `moveStart`, `moveEnd`, `fullMoveEnd` or
/// `animation`. It receives the block id.
#[wasm_bindgen]
pub fn on_board_event(event: &str, callback: js_sys::Function) -> Result<(), JsValue> {
    let mut result = Err(JsValue::from_str("puzzle not started"));
    with_state(|s| result = s.subscribe(event, callback));
    result
}

#[wasm_bindgen]
pub fn set_animate(animate: bool) {
    with_state(|s| s.board.set_animate(animate));
}

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlElement, MouseEvent, TouchEvent};

use crate::state::State;
use crate::utils::{Rect, to_board_space};

/// Client coordinates of a mouse event or of the first touch point.
fn client_point(e: &Event) -> Option<(f64, f64)> {
    if let Some(m) = e.dyn_ref::<MouseEvent>() {
        return Some((m.client_x() as f64, m.client_y() as f64));
    }
    let t = e.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some((t.client_x() as f64, t.client_y() as f64))
}

fn board_point(e: &Event, target: &Element, s: &State) -> Option<(f64, f64)> {
    let client = client_point(e)?;
    Some(to_board_space(
        client,
        Rect::of(target),
        s.board.cols(),
        s.board.rows(),
    ))
}

/// Forward mouse and touch gestures on `target` to the board. Releases are
/// caught on the whole document so dropping outside the board still ends
/// the gesture.
pub fn attach_pointer(state: Rc<RefCell<State>>, target: &HtmlElement) -> Result<(), JsValue> {
    {
        let st = state.clone();
        let el: Element = target.clone().into();
        let press = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
            e.prevent_default();
            let mut s = st.borrow_mut();
            s.pointer_down = true;
            if let Some((x, y)) = board_point(&e, &el, &s) {
                s.board.mouse_pressed(x, y);
            }
        }));
        for name in ["mousedown", "touchstart"] {
            target.add_event_listener_with_callback(name, press.as_ref().unchecked_ref())?;
        }
        press.forget();
    }
    {
        let st = state.clone();
        let el: Element = target.clone().into();
        let drag = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
            e.prevent_default();
            let mut s = st.borrow_mut();
            if !s.pointer_down {
                return;
            }
            if let Some((x, y)) = board_point(&e, &el, &s) {
                s.board.mouse_dragged(x, y);
            }
        }));
        for name in ["mousemove", "touchmove"] {
            target.add_event_listener_with_callback(name, drag.as_ref().unchecked_ref())?;
        }
        drag.forget();
    }
    {
        let st = state.clone();
        let release = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
            let mut s = st.borrow_mut();
            if s.pointer_down {
                s.board.mouse_released();
                s.pointer_down = false;
            }
        }));
        let body = state
            .borrow()
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        for name in ["mouseup", "touchend"] {
            body.add_event_listener_with_callback(name, release.as_ref().unchecked_ref())?;
        }
        release.forget();
    }
    Ok(())
}

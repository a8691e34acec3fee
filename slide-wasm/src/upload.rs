use std::cell::RefCell;
use std::rc::Rc;

use slide_core::Layout;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, FileReader, HtmlInputElement};

use crate::state::State;
use crate::utils::log;

// Wires up the file input handler for loading JSON layout files.
pub fn attach_file_input(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc: Document = state.borrow().document.clone();
    let Some(input) = doc.get_element_by_id("file") else {
        return Ok(());
    };
    let input: HtmlInputElement = input.dyn_into()?;
    let st = state.clone();
    let input_for_closure = input.clone();
    let onchange = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
        let Some(file) = input_for_closure.files().and_then(|files| files.item(0)) else {
            log("No file selected");
            return;
        };
        let reader = match FileReader::new() {
            Ok(r) => r,
            Err(e) => {
                log(&format!("Failed to create FileReader: {:?}", e));
                return;
            }
        };
        let st2 = st.clone();
        // Clone the FileReader for use inside the onload closure
        let reader_for_closure = reader.clone();
        let onload = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_ev: Event| {
            let text = reader_for_closure
                .result()
                .ok()
                .and_then(|r| r.as_string())
                .unwrap_or_default();
            if text.is_empty() {
                log("Selected file is empty or unreadable");
                return;
            }
            let loaded = Layout::from_json(&text)
                .map_err(|e| JsValue::from_str(&e.to_string()))
                .and_then(|layout| st2.borrow_mut().load(layout));
            if let Err(e) = loaded {
                log(&format!("Failed to load layout: {:?}", e));
                let _ = st2
                    .borrow()
                    .window
                    .alert_with_message("Unrecognized puzzle layout file.");
            }
        }));
        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        if let Err(e) = reader.read_as_text(&file) {
            log(&format!("Failed to read file: {:?}", e));
        }
        onload.forget();
    }));
    input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
    onchange.forget();
    Ok(())
}

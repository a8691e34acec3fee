use std::cell::{Cell, RefCell};
use std::rc::Rc;

use slide_core::{Block, Board, BoardEvent, Dimension, Layout};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, Window};

use crate::canvas::CanvasRenderer;
use crate::constants::{CANVAS_ID, CONTAINER_ID};
use crate::html::{HtmlRenderer, Proportions};
use crate::utils::{log, to_js};

/// Which renderer the page asked for.
pub enum View {
    Canvas(CanvasRenderer),
    Html(HtmlRenderer),
}

impl View {
    /// `#cv` selects the canvas renderer, `#container` the DOM renderer.
    pub fn mount(document: &Document) -> Result<Self, JsValue> {
        if let Some(el) = document.get_element_by_id(CANVAS_ID) {
            let canvas = el.dyn_into::<HtmlCanvasElement>()?;
            let bounds = Dimension {
                width: canvas.width() as f64,
                height: canvas.height() as f64,
            };
            return Ok(View::Canvas(CanvasRenderer::new(
                document,
                Some(canvas),
                Some(bounds),
            )?));
        }
        if let Some(el) = document.get_element_by_id(CONTAINER_ID) {
            let parent = el.dyn_into::<HtmlElement>()?;
            return Ok(View::Html(HtmlRenderer::new(
                document,
                parent,
                Proportions::default(),
            )?));
        }
        Err(JsValue::from_str(&format!(
            "neither canvas #{} nor element #{} found",
            CANVAS_ID, CONTAINER_ID
        )))
    }

    /// Element that receives pointer events.
    pub fn target(&self) -> HtmlElement {
        match self {
            View::Canvas(r) => r.canvas().clone().into(),
            View::Html(r) => r.board_element().clone(),
        }
    }

    fn rebuild(&mut self, board: &mut Board, dirty: &Rc<Cell<bool>>) -> Result<(), JsValue> {
        match self {
            View::Canvas(r) => {
                r.rebuild(board, dirty)?;
                r.attach(board, dirty);
            }
            View::Html(r) => {
                r.rebuild(board)?;
                r.attach(board);
            }
        }
        Ok(())
    }

    pub fn render(&self, board: &Board) {
        match self {
            View::Canvas(r) => r.render(board),
            View::Html(r) => r.render(board),
        }
    }
}

/// Global application state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
///
/// Board listeners run while this state is mutably borrowed, so they only
/// touch the shared cells below and never the state itself.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub board: Board,
    pub view: View,
    pub pointer_down: bool,
    /// Set when the view needs a repaint on the next frame.
    pub dirty: Rc<Cell<bool>>,
    /// Completed gestures since the puzzle was loaded or reset.
    pub moves: Rc<Cell<u32>>,
    /// Page callbacks, registered again on every board that gets loaded.
    subscriptions: Vec<(BoardEvent, js_sys::Function)>,
}

impl State {
    pub fn new(window: Window, document: Document, view: View) -> Self {
        State {
            window,
            document,
            board: Board::default(),
            view,
            pointer_down: false,
            dirty: Rc::new(Cell::new(true)),
            moves: Rc::new(Cell::new(0)),
            subscriptions: Vec::new(),
        }
    }

    /// Replace the puzzle. The starting positions become the reset snapshot.
    pub fn load(&mut self, layout: Layout) -> Result<(), JsValue> {
        let mut board = layout.build().map_err(to_js)?;
        board.save_positions();
        self.view.rebuild(&mut board, &self.dirty)?;

        let moves = self.moves.clone();
        let document = self.document.clone();
        board.on(BoardEvent::FullMoveEnd, move |_| {
            moves.set(moves.get() + 1);
            update_status_dom(&document, moves.get());
        });
        for (event, callback) in &self.subscriptions {
            let callback = callback.clone();
            board.on(*event, move |block| notify(&callback, block));
        }

        self.board = board;
        self.pointer_down = false;
        self.moves.set(0);
        self.dirty.set(true);
        update_status_dom(&self.document, 0);
        Ok(())
    }

    /// Calls `callback(blockId)` for every `event` on this and later boards.
    /// Unknown event names are logged to the console and returned as errors.
    pub fn subscribe(&mut self, event: &str, callback: js_sys::Function) -> Result<(), JsValue> {
        let cb = callback.clone();
        let event = self
            .board
            .on_named(event, move |block| notify(&cb, block))
            .map_err(|e| {
                log(&e.to_string());
                to_js(e)
            })?;
        self.subscriptions.push((event, callback));
        Ok(())
    }

    pub fn reset(&mut self) {
        if let Err(e) = self.board.restore_positions() {
            log(&format!("Reset failed: {}", e));
            return;
        }
        self.moves.set(0);
        self.dirty.set(true);
        update_status_dom(&self.document, 0);
    }
}

fn notify(callback: &js_sys::Function, block: &Block) {
    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from(block.id().0 as u32)) {
        log(&format!("event callback failed: {:?}", e));
    }
}

pub fn update_status_dom(document: &Document, moves: u32) {
    if let Some(el) = document.get_element_by_id("status")
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        el.set_inner_text(&format!("Moves: {}", moves));
    }
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}

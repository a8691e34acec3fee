use std::cell::Cell;
use std::rc::Rc;

use slide_core::{Block, Board, BoardEvent};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, DocumentFragment, HtmlElement, ResizeObserver};

use crate::utils::{Rect, fit_ratio, log, percent};

/// Placement of the board inside the background layer, as fractions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Proportions {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Proportions {
    fn default() -> Self {
        Proportions {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

/// Renders the board as `div.background > div.board > div.block` layers
/// sized in percentages, so the browser does the scaling.
pub struct HtmlRenderer {
    document: Document,
    parent: HtmlElement,
    background: HtmlElement,
    board_div: HtmlElement,
    block_divs: Rc<Vec<HtmlElement>>,
    ratio: Rc<Cell<f64>>,
    _observer: Option<ResizeObserver>,
}

impl HtmlRenderer {
    pub fn new(
        document: &Document,
        parent: HtmlElement,
        proportions: Proportions,
    ) -> Result<Self, JsValue> {
        let background = child_div(document, &parent, "background")?;
        parent.style().set_property("display", "grid")?;
        background.style().set_property("position", "relative")?;
        background.style().set_property("margin", "auto")?;

        let board_div = child_div(document, &background, "board")?;
        board_div.style().set_property("position", "absolute")?;
        apply_proportions(&board_div, proportions)?;

        let mut renderer = HtmlRenderer {
            document: document.clone(),
            parent,
            background,
            board_div,
            block_divs: Rc::new(Vec::new()),
            ratio: Rc::new(Cell::new(1.0)),
            _observer: None,
        };
        renderer.watch_resize()?;
        Ok(renderer)
    }

    pub fn board_element(&self) -> &HtmlElement {
        &self.board_div
    }

    /// Re-letterbox whenever the parent element changes size, whether the
    /// window or only the container was resized.
    fn watch_resize(&mut self) -> Result<(), JsValue> {
        let parent = self.parent.clone();
        let background = self.background.clone();
        let ratio = self.ratio.clone();
        let onresize = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            if let Err(e) = resize(&parent, &background, ratio.get()) {
                log(&format!("resize failed: {:?}", e));
            }
        }));
        let observer = ResizeObserver::new(onresize.as_ref().unchecked_ref())?;
        observer.observe(&self.parent);
        onresize.forget();
        self._observer = Some(observer);
        Ok(())
    }

    /// Recreates the block layer for `board`. The new divs are built off the
    /// page first, so a failure leaves the previous board on screen.
    pub fn rebuild(&mut self, board: &Board) -> Result<(), JsValue> {
        let fragment = self.document.create_document_fragment();
        let divs = board
            .blocks()
            .iter()
            .map(|block| self.block_div(&fragment, block, board.cols(), board.rows()))
            .collect::<Result<Vec<_>, JsValue>>()?;

        self.board_div.set_inner_html("");
        self.board_div.append_child(&fragment)?;
        self.block_divs = Rc::new(divs);

        if board.rows() > 0 {
            self.ratio.set(board.cols() as f64 / board.rows() as f64);
        }
        let bg = self.background.style();
        match board.color() {
            Some(color) => bg.set_property("background-color", color)?,
            None => bg.remove_property("background-color").map(|_| ())?,
        }
        apply_background(&self.background, board.image())?;
        resize(&self.parent, &self.background, self.ratio.get())
    }

    fn block_div(
        &self,
        fragment: &DocumentFragment,
        block: &Block,
        cols: usize,
        rows: usize,
    ) -> Result<HtmlElement, JsValue> {
        let div: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        div.class_list().add_1("block")?;
        if block.is_selectable() {
            div.class_list().add_1("selectable")?;
        }
        div.style().set_property("position", "absolute")?;
        apply_proportions(&div, block_proportions(block, cols, rows))?;
        if let Some(color) = block.color() {
            div.style().set_property("background-color", color)?;
        }
        apply_background(&div, block.image())?;
        if let Some(content) = block.content() {
            div.set_inner_html(content);
        }
        fragment.append_child(&div)?;
        Ok(div)
    }

    /// Follow the animated block on every frame and after still moves.
    pub fn attach(&self, board: &mut Board) {
        let (cols, rows) = (board.cols(), board.rows());
        for event in [BoardEvent::Animation, BoardEvent::MoveEnd] {
            let divs = self.block_divs.clone();
            board.on(event, move |block| place_block(&divs, block, cols, rows));
        }
    }

    pub fn render(&self, board: &Board) {
        for block in board.blocks() {
            place_block(&self.block_divs, block, board.cols(), board.rows());
        }
    }
}

fn child_div(document: &Document, parent: &HtmlElement, class: &str) -> Result<HtmlElement, JsValue> {
    let div: HtmlElement = match parent.query_selector(&format!("div.{}", class))? {
        Some(el) => el.dyn_into()?,
        None => document.create_element("div")?.dyn_into()?,
    };
    div.class_list().add_1(class)?;
    parent.append_child(&div)?;
    Ok(div)
}

fn place_block(divs: &[HtmlElement], block: &Block, cols: usize, rows: usize) {
    let Some(div) = divs.get(block.id().0) else {
        return;
    };
    let style = div.style();
    let _ = style.set_property("left", &percent(block.x() / cols as f64));
    let _ = style.set_property("top", &percent(block.y() / rows as f64));
}

fn resize(parent: &HtmlElement, background: &HtmlElement, content_ratio: f64) -> Result<(), JsValue> {
    let bounds = Rect::of(parent);
    if bounds.height <= 0.0 || bounds.width <= 0.0 {
        return Ok(());
    }
    let (w, h) = fit_ratio(bounds.width / bounds.height, content_ratio);
    background.style().set_property("width", &percent(w))?;
    background.style().set_property("height", &percent(h))?;
    Ok(())
}

fn apply_proportions(el: &HtmlElement, p: Proportions) -> Result<(), JsValue> {
    let style = el.style();
    style.set_property("width", &percent(p.width))?;
    style.set_property("height", &percent(p.height))?;
    style.set_property("left", &percent(p.x))?;
    style.set_property("top", &percent(p.y))?;
    Ok(())
}

/// CSS background properties for an optional image. `None` values are
/// removed so a previous image does not linger.
fn background_props(url: Option<&str>) -> [(&'static str, Option<String>); 3] {
    let on = |value: &str| url.map(|_| value.to_string());
    [
        ("background-image", url.map(|u| format!("url(\"{}\")", u))),
        ("background-size", on("contain")),
        ("background-repeat", on("no-repeat")),
    ]
}

fn apply_background(el: &HtmlElement, url: Option<&str>) -> Result<(), JsValue> {
    let style = el.style();
    for (name, value) in background_props(url) {
        match value {
            Some(value) => style.set_property(name, &value)?,
            None => style.remove_property(name).map(|_| ())?,
        }
    }
    Ok(())
}

fn block_proportions(block: &Block, cols: usize, rows: usize) -> Proportions {
    Proportions {
        x: block.x() / cols as f64,
        y: block.y() / rows as f64,
        width: block.cols() as f64 / cols as f64,
        height: block.rows() as f64 / rows as f64,
    }
}

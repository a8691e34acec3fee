use std::cell::Cell;
use std::rc::Rc;

use slide_core::{Block, Board, BoardEvent, Dimension, fit_in_bounds};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use crate::constants::{CELL_INSET, CELL_SHADE, LABEL_SIZE, OUTLINE_COLOR, OUTLINE_WIDTH};
use crate::utils::log;

// Non-deprecated helpers to set canvas styles via property assignment.
pub fn set_fill_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(color),
    );
}

pub fn set_stroke_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(color),
    );
}

/// Paints the whole board onto a 2D canvas.
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    bounds: Dimension,
    unit: f64,
    board_image: Option<HtmlImageElement>,
    block_images: Vec<Option<HtmlImageElement>>,
}

impl CanvasRenderer {
    /// Uses `canvas` when given, else creates one. The board is fitted into
    /// `dimension`, or into the canvas' current size.
    pub fn new(
        document: &Document,
        canvas: Option<HtmlCanvasElement>,
        dimension: Option<Dimension>,
    ) -> Result<Self, JsValue> {
        let canvas = match (canvas, dimension) {
            (None, None) => {
                return Err(JsValue::from_str(
                    "You may pass a 'canvas' or a 'dimension' or both as parameters.",
                ));
            }
            (Some(cv), _) => cv,
            (None, Some(_)) => document
                .create_element("canvas")?
                .dyn_into::<HtmlCanvasElement>()?,
        };
        let bounds = dimension.unwrap_or(Dimension {
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        });
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2D context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(CanvasRenderer {
            canvas,
            ctx,
            bounds,
            unit: 0.0,
            board_image: None,
            block_images: Vec::new(),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    pub fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    /// Resize for `board` and start loading its images.
    pub fn rebuild(&mut self, board: &Board, dirty: &Rc<Cell<bool>>) -> Result<(), JsValue> {
        let fitted = fit_in_bounds(board, self.bounds);
        self.canvas.set_width(fitted.width as u32);
        self.canvas.set_height(fitted.height as u32);
        self.unit = if board.cols() == 0 {
            0.0
        } else {
            fitted.width / board.cols() as f64
        };
        self.board_image = board.image().map(|url| load_image(url, dirty)).transpose()?;
        self.block_images = board
            .blocks()
            .iter()
            .map(|b| b.image().map(|url| load_image(url, dirty)).transpose())
            .collect::<Result<Vec<_>, JsValue>>()?;
        Ok(())
    }

    /// Repaint on every slide frame and move end.
    pub fn attach(&self, board: &mut Board, dirty: &Rc<Cell<bool>>) {
        for event in [BoardEvent::Animation, BoardEvent::MoveEnd] {
            let dirty = dirty.clone();
            board.on(event, move |_| dirty.set(true));
        }
    }

    pub fn render(&self, board: &Board) {
        let (w, h) = (self.width(), self.height());
        match &self.board_image {
            Some(img) => {
                let _ = self
                    .ctx
                    .draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, w, h);
            }
            None => self.ctx.clear_rect(0.0, 0.0, w, h),
        }
        if let Some(color) = board.color() {
            set_fill_style(&self.ctx, color);
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }
        for (i, block) in board.blocks().iter().enumerate() {
            self.render_block(i, block);
        }
    }

    fn render_block(&self, i: usize, block: &Block) {
        let unit = self.unit;
        let image = self.block_images.get(i).and_then(Option::as_ref);
        // Blocks with neither colour nor image fall back to the palette.
        let color = block
            .color()
            .or_else(|| image.is_none().then(|| slide_core::block_color(i)));

        if let Some(color) = color {
            for (x, y) in block.shape_coords() {
                set_fill_style(&self.ctx, color);
                self.ctx.fill_rect(x * unit, y * unit, unit, unit);
                set_fill_style(&self.ctx, CELL_SHADE);
                self.ctx.fill_rect(
                    (x + CELL_INSET) * unit,
                    (y + CELL_INSET) * unit,
                    (1.0 - 2.0 * CELL_INSET) * unit,
                    (1.0 - 2.0 * CELL_INSET) * unit,
                );
            }
            if block.is_selectable() {
                set_stroke_style(&self.ctx, OUTLINE_COLOR);
                self.ctx.set_line_width(unit * OUTLINE_WIDTH);
                self.ctx.stroke_rect(
                    block.x() * unit,
                    block.y() * unit,
                    block.cols() as f64 * unit,
                    block.rows() as f64 * unit,
                );
            }
        }

        if let Some(img) = image {
            let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                block.x() * unit,
                block.y() * unit,
                block.cols() as f64 * unit,
                block.rows() as f64 * unit,
            );
        }

        if let Some(label) = block.tag() {
            let cx = (block.x() + block.cols() as f64 / 2.0) * unit;
            let cy = (block.y() + block.rows() as f64 / 2.0) * unit;
            let size = (LABEL_SIZE * unit).clamp(10.0, 48.0);
            self.ctx.set_font(&format!("bold {}px sans-serif", size));
            self.ctx.set_text_align("center");
            self.ctx.set_text_baseline("middle");
            // Outline for contrast
            self.ctx.set_line_width((size / 5.0).clamp(2.0, 5.0));
            set_stroke_style(&self.ctx, "#fff");
            let _ = self.ctx.stroke_text(label, cx, cy);
            set_fill_style(&self.ctx, "#111");
            let _ = self.ctx.fill_text(label, cx, cy);
        }
    }
}

fn load_image(url: &str, dirty: &Rc<Cell<bool>>) -> Result<HtmlImageElement, JsValue> {
    let img = HtmlImageElement::new()?;
    let onload = {
        let dirty = dirty.clone();
        Closure::<dyn FnMut()>::wrap(Box::new(move || dirty.set(true)))
    };
    let onerror = {
        let url = url.to_string();
        Closure::<dyn FnMut()>::wrap(Box::new(move || log(&format!("Error on image \"{}\".", url))))
    };
    img.set_onload(Some(onload.as_ref().unchecked_ref()));
    img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onload.forget();
    onerror.forget();
    img.set_src(url);
    Ok(img)
}

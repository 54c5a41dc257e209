//! DOM render targets
//!
//! Applies draw lists, status views and overlay changes to the page.

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::renderer::{Atlas, DrawList, Layer, Sprite, StatusView, board::kitten_cell};
use crate::sim::{AnimationClock, Outcome};

/// Element ids the page must provide
pub mod ids {
    pub const BOARD: &str = "game-board";
    pub const TIMER: &str = "timer";
    pub const KITTEN_COUNTER: &str = "kitten-counter";
    pub const OVERLAY: &str = "game-overlay";
    pub const RESULT: &str = "game-result";
    pub const PLAY_AGAIN: &str = "play-again";
}

/// Class toggled on the timer when time is low
const LOW_TIME_CLASS: &str = "warning";

pub struct DomTargets {
    document: Document,
    board: HtmlElement,
    timer: Option<Element>,
    kitten_counter: Option<Element>,
    overlay: Option<HtmlElement>,
    result: Option<Element>,
    /// Kitten sprites on the board, refreshed in place as frames advance
    kittens: Vec<(HtmlElement, u32)>,
}

impl DomTargets {
    /// Find the render targets; only the board is mandatory
    pub fn locate(document: &Document) -> Option<Self> {
        let board = document
            .get_element_by_id(ids::BOARD)?
            .dyn_into::<HtmlElement>()
            .ok()?;
        let html = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        };

        let targets = Self {
            document: document.clone(),
            timer: document.get_element_by_id(ids::TIMER),
            kitten_counter: document.get_element_by_id(ids::KITTEN_COUNTER),
            overlay: html(ids::OVERLAY),
            result: document.get_element_by_id(ids::RESULT),
            board,
            kittens: Vec::new(),
        };
        if targets.timer.is_none() || targets.kitten_counter.is_none() {
            log::warn!("Status panel elements missing");
        }
        Some(targets)
    }

    pub fn board(&self) -> &HtmlElement {
        &self.board
    }

    /// Game id from `data-game-id` on the board, else the `id` query parameter
    pub fn game_id(&self) -> Option<String> {
        if let Some(id) = self.board.get_attribute("data-game-id").filter(|s| !s.is_empty()) {
            return Some(id);
        }
        let href = web_sys::window()?.location().href().ok()?;
        let url = web_sys::Url::new(&href).ok()?;
        url.search_params().get("id")
    }

    /// Page-space top-left of the board
    pub fn board_origin(&self) -> Vec2 {
        let rect = self.board.get_bounding_client_rect();
        Vec2::new(rect.left() as f32, rect.top() as f32)
    }

    /// Replace the board contents with a fresh tile tree
    pub fn draw_board(&mut self, list: &DrawList, tile_size: f32) -> Result<(), JsValue> {
        self.board.set_inner_html("");
        self.kittens.clear();

        let style = self.board.style();
        style.set_property("width", &px(list.width_px))?;
        style.set_property("height", &px(list.height_px))?;

        for tile in &list.tiles {
            let mut sprites = tile.sprites.iter();
            let Some(base) = sprites.next() else {
                continue;
            };

            let el = self.div("tile")?;
            let style = el.style();
            style.set_property("left", &px(tile.origin.x))?;
            style.set_property("top", &px(tile.origin.y))?;
            style.set_property("width", &px(tile_size))?;
            style.set_property("height", &px(tile_size))?;
            paint(&el, base)?;

            for sprite in sprites {
                let child = self.div(layer_class(sprite.layer))?;
                paint(&child, sprite)?;
                if let Layer::Kitten { value } = sprite.layer {
                    self.kittens.push((child.clone(), value));
                }
                el.append_child(&child)?;
            }
            self.board.append_child(&el)?;
        }
        Ok(())
    }

    /// Move every kitten sprite to the clock's current frame
    pub fn refresh_kittens(&self, clock: &AnimationClock) {
        for (el, value) in &self.kittens {
            let (x, y) = kitten_cell(*value, clock).pixel_offset();
            let _ = el
                .style()
                .set_property("background-position", &format!("-{}px -{}px", x, y));
        }
    }

    /// Translate the whole board (camera shake)
    pub fn set_offset(&self, offset: Vec2) {
        let transform = if offset == Vec2::ZERO {
            String::new()
        } else {
            format!("translate({}px, {}px)", offset.x, offset.y)
        };
        let _ = self.board.style().set_property("transform", &transform);
    }

    pub fn show_status(&self, view: &StatusView) {
        if let Some(timer) = &self.timer {
            timer.set_text_content(Some(&view.time_text));
            let classes = timer.class_list();
            let _ = if view.low_time {
                classes.add_1(LOW_TIME_CLASS)
            } else {
                classes.remove_1(LOW_TIME_CLASS)
            };
        }
        if let Some(counter) = &self.kitten_counter {
            counter.set_text_content(Some(&view.kitten_label));
        }
    }

    pub fn show_overlay(&self, outcome: Outcome) {
        if let Some(result) = &self.result {
            result.set_text_content(Some(outcome.message()));
        }
        if let Some(overlay) = &self.overlay {
            let _ = overlay.style().set_property("display", "flex");
        }
    }

    pub fn hide_overlay(&self) {
        if let Some(overlay) = &self.overlay {
            let _ = overlay.style().set_property("display", "none");
        }
    }

    fn div(&self, class: &str) -> Result<HtmlElement, JsValue> {
        let el: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        el.set_class_name(class);
        Ok(el)
    }
}

fn layer_class(layer: Layer) -> &'static str {
    match layer {
        Layer::Base => "tile",
        Layer::Number => "overlay",
        Layer::Kitten { .. } => "kitten",
        Layer::Flag => "flag",
    }
}

fn paint(el: &HtmlElement, sprite: &Sprite) -> Result<(), JsValue> {
    let style = el.style();
    let (x, y) = sprite.cell.pixel_offset();
    style.set_property("background-image", &format!("url(\"{}\")", sprite.atlas.url()))?;
    style.set_property("background-position", &format!("-{}px -{}px", x, y))?;
    if sprite.layer != Layer::Base || sprite.atlas == Atlas::Kittens {
        style.set_property("background-size", sprite.atlas.background_size())?;
    }
    Ok(())
}

fn px(value: f32) -> String {
    format!("{}px", value)
}

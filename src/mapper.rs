//! Conversions between the three coordinate spaces used by the editor:
//! native image pixels, logical canvas pixels (image scaled to fit the
//! viewport) and display pixels (where the canvas is actually drawn on screen,
//! which may be stretched relative to its logical size).

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::annotation::Point;

/// Width reserved for the editor sidebar in [`LayoutMode::Sidebar`].
pub const SIDEBAR_WIDTH: f32 = 300.0;
pub const HORIZONTAL_MARGIN: f32 = 40.0;
pub const TOOLBAR_HEIGHT: f32 = 44.0;
/// Padding above and below the canvas inside the central panel.
pub const CANVAS_PADDING_Y: f32 = 8.0;
/// Vertical space taken by the toolbar and panel chrome.
pub const VERTICAL_CHROME: f32 = TOOLBAR_HEIGHT + 2.0 * CANVAS_PADDING_Y;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Sidebar,
    Overlay,
}

impl LayoutMode {
    /// Room left for the canvas inside a window of `window` size.
    pub fn available_size(self, window: Vec2) -> Vec2 {
        let width = match self {
            Self::Sidebar => window.x - SIDEBAR_WIDTH - HORIZONTAL_MARGIN,
            Self::Overlay => window.x - HORIZONTAL_MARGIN,
        };
        Vec2::new(width.max(1.0), (window.y - VERTICAL_CHROME).max(1.0))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sidebar => "Sidebar",
            Self::Overlay => "Overlay",
        }
    }
}

/// Largest canvas with the image's aspect ratio that fits in `available`.
/// The result is truncated to whole pixels.
pub fn fit_to_viewport(image: Vec2, available: Vec2) -> Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 {
        return Vec2::ZERO;
    }
    let mut width = available.x;
    let mut height = width * image.y / image.x;
    if height > available.y {
        height = available.y;
        width = height * image.x / image.y;
    }
    Vec2::new(width.floor().max(1.0), height.floor().max(1.0))
}

/// Forward and inverse transforms between native image space and logical
/// canvas space for one image/canvas size pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    image: Vec2,
    canvas: Vec2,
}

impl CoordinateMapper {
    pub fn new(image: Vec2, canvas: Vec2) -> Self {
        Self {
            image: image.max(Vec2::splat(1.0)),
            canvas: canvas.max(Vec2::splat(1.0)),
        }
    }

    pub fn to_native(&self, p: Point) -> Point {
        Point::new(
            (p.x * self.image.x / self.canvas.x).round(),
            (p.y * self.image.y / self.canvas.y).round(),
        )
    }

    pub fn to_canvas(&self, p: Point) -> Point {
        Point::new(
            (p.x * self.canvas.x / self.image.x).round(),
            (p.y * self.canvas.y / self.image.y).round(),
        )
    }
}

/// Maps a pointer position in display space to logical canvas space,
/// correcting for any stretch between the drawn rect and the canvas size.
pub fn pointer_to_canvas(pointer: Pos2, display_rect: Rect, canvas: Vec2) -> Point {
    let width = display_rect.width().max(1.0);
    let height = display_rect.height().max(1.0);
    Point::new(
        (pointer.x - display_rect.left()) * canvas.x / width,
        (pointer.y - display_rect.top()) * canvas.y / height,
    )
}

pub fn canvas_to_display(p: Point, display_rect: Rect, canvas: Vec2) -> Pos2 {
    let canvas = canvas.max(Vec2::splat(1.0));
    Pos2::new(
        display_rect.left() + p.x * display_rect.width() / canvas.x,
        display_rect.top() + p.y * display_rect.height() / canvas.y,
    )
}

/// Rescales a native point declared against `from` into an image of size `to`.
pub fn rescale(p: Point, from: Vec2, to: Vec2) -> Point {
    if from == to || from.x <= 0.0 || from.y <= 0.0 {
        return p;
    }
    Point::new(
        (p.x * to.x / from.x).round(),
        (p.y * to.y / from.y).round(),
    )
}

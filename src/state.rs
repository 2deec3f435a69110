use chrono::Utc;
use egui::{ColorImage, Context as EguiContext, TextureHandle, TextureOptions, Vec2};
use image::DynamicImage;

use crate::annotation::{Point, PointId};
use crate::codec::{self, ExportKind, ImageInfo};
use crate::error::{PickError, PickResult};
use crate::label_input::LabelInputs;
use crate::mapper::{self, CoordinateMapper, LayoutMode};
use crate::settings::UserSettings;
use crate::store::{AnnotationStore, LabelCommit};

/// Canvas pixels around a point that still count as hitting it.
pub const HIT_RADIUS: f32 = 6.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Point,
    Route,
}

impl EditMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Point => "Points",
            Self::Route => "Route",
        }
    }
}

pub struct EditorImage {
    pub dynamic: DynamicImage,
    pub texture: Option<TextureHandle>,
    /// File name without extension, when the image came from a file.
    pub name: Option<String>,
}

impl EditorImage {
    pub fn size_vec2(&self) -> Vec2 {
        Vec2::new(self.dynamic.width() as f32, self.dynamic.height() as f32)
    }

    pub fn ensure_texture(&mut self, ctx: &EguiContext) {
        if self.texture.is_some() {
            return;
        }
        let rgba = self.dynamic.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let color = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        let texture = ctx.load_texture("map", color, TextureOptions::LINEAR);
        self.texture = Some(texture);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    PointAdded(PointId),
    WaypointAdded,
}

/// Serialized export ready for the output sink.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportPayload {
    pub file_name: String,
    pub json: String,
}

/// The whole session: one image, its annotations, and the editing modes.
pub struct EditorState {
    pub image: Option<EditorImage>,
    pub store: AnnotationStore,
    pub labels: LabelInputs,
    pub mode: EditMode,
    pub layout: LayoutMode,
    pub settings: UserSettings,
    /// Logical canvas size for the current image and viewport.
    pub canvas_size: Vec2,
    window_size: Vec2,
    redraw_requested: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(UserSettings::default())
    }
}

impl EditorState {
    pub fn new(settings: UserSettings) -> Self {
        Self {
            image: None,
            store: AnnotationStore::default(),
            labels: LabelInputs::default(),
            mode: EditMode::Point,
            layout: settings.layout,
            settings,
            canvas_size: Vec2::ZERO,
            window_size: Vec2::ZERO,
            redraw_requested: false,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn image_size(&self) -> Option<Vec2> {
        self.image.as_ref().map(EditorImage::size_vec2)
    }

    pub fn mapper(&self) -> Option<CoordinateMapper> {
        self.image_size()
            .map(|size| CoordinateMapper::new(size, self.canvas_size))
    }

    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    /// Consumes a pending redraw, re-creating label inputs from the current
    /// points when in point mode. Returns whether anything was pending.
    pub fn take_redraw(&mut self) -> bool {
        if !std::mem::take(&mut self.redraw_requested) {
            return false;
        }
        if self.mode == EditMode::Point {
            self.labels.resync(self.store.points());
        }
        true
    }

    /// Replaces the session image; annotations start empty in point mode.
    pub fn load_image(&mut self, image: DynamicImage, name: Option<String>) {
        log::debug!(
            "image loaded: {}x{} {:?}",
            image.width(),
            image.height(),
            name
        );
        self.image = Some(EditorImage {
            dynamic: image,
            texture: None,
            name,
        });
        self.store.reset();
        self.labels.clear();
        self.mode = EditMode::Point;
        self.refit_canvas();
        self.request_redraw();
    }

    /// Records the window size and refits the canvas to it.
    pub fn set_window_size(&mut self, window: Vec2) -> bool {
        if self.window_size == window {
            return false;
        }
        self.window_size = window;
        self.refit_canvas()
    }

    pub fn set_layout(&mut self, layout: LayoutMode) {
        if self.layout == layout {
            return;
        }
        self.layout = layout;
        self.settings.layout = layout;
        self.refit_canvas();
    }

    fn refit_canvas(&mut self) -> bool {
        let Some(image) = self.image_size() else {
            return false;
        };
        let available = self.layout.available_size(self.window_size);
        let fitted = mapper::fit_to_viewport(image, available);
        if fitted == self.canvas_size {
            return false;
        }
        log::debug!("canvas refit to {}x{}", fitted.x, fitted.y);
        self.canvas_size = fitted;
        self.request_redraw();
        true
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        if self.mode == mode {
            return;
        }
        log::debug!("edit mode {:?} -> {:?}", self.mode, mode);
        if mode == EditMode::Route {
            // Leaving point mode blurs the open input first.
            if let Some(id) = self.labels.focused() {
                self.commit_label(id);
            }
            self.labels.clear();
        }
        self.mode = mode;
        self.request_redraw();
    }

    /// Dispatches a click at logical canvas coordinates according to the mode.
    pub fn handle_canvas_click(&mut self, canvas_pos: Point) -> ClickOutcome {
        let Some(mapper) = self.mapper() else {
            return ClickOutcome::Ignored;
        };
        let native = mapper.to_native(canvas_pos);
        let outcome = match self.mode {
            EditMode::Point => {
                self.store.remove_trailing_empty_user_points();
                let id = self.store.add_point(native);
                self.labels.request_focus(id);
                ClickOutcome::PointAdded(id)
            }
            EditMode::Route => {
                self.store.add_route_waypoint(native);
                ClickOutcome::WaypointAdded
            }
        };
        self.request_redraw();
        outcome
    }

    pub fn edit_label(&mut self, id: PointId, text: &str) {
        if let Some(normalized) = self.store.set_label(id, text) {
            self.labels.set_buffer(id, &normalized);
        }
    }

    /// Focus-loss handling for a label input.
    pub fn commit_label(&mut self, id: PointId) -> LabelCommit {
        let commit = self.store.commit_or_discard(id);
        self.labels.blur(id);
        match commit {
            LabelCommit::Removed => self.request_redraw(),
            LabelCommit::Kept => {
                if let Some(label) = self.store.find(id).map(|p| p.label.clone()) {
                    self.labels.set_buffer(id, &label);
                }
            }
            LabelCommit::Missing => {}
        }
        commit
    }

    /// Topmost point drawn under a canvas position, within `HIT_RADIUS`.
    pub fn point_at(&self, canvas_pos: Point) -> Option<PointId> {
        let mapper = self.mapper()?;
        self.store
            .points()
            .iter()
            .rev()
            .find(|point| mapper.to_canvas(point.pos).delta(canvas_pos).length() <= HIT_RADIUS)
            .map(|point| point.id)
    }

    pub fn remove_point(&mut self, id: PointId) {
        if self.store.remove_point(id) {
            self.request_redraw();
        }
    }

    pub fn clear_points(&mut self) {
        self.store.clear();
        self.labels.clear();
        self.request_redraw();
    }

    pub fn clear_route(&mut self) {
        self.store.clear_route();
        self.request_redraw();
    }

    pub fn set_route_start(&mut self, text: &str) -> String {
        let value = self.store.set_route_start(text).to_string();
        self.request_redraw();
        value
    }

    pub fn set_route_end(&mut self, text: &str) -> String {
        let value = self.store.set_route_end(text).to_string();
        self.request_redraw();
        value
    }

    fn require_image(&self) -> PickResult<Vec2> {
        self.image_size()
            .ok_or_else(|| PickError::Precondition("load an image first".to_string()))
    }

    /// Appends the points of a points file. Returns how many were added.
    pub fn import_points(&mut self, text: &str) -> PickResult<usize> {
        let image = self.require_image()?;
        let imported = codec::decode_points(text, image)?;
        let count = imported.len();
        for point in imported {
            self.store.push_point(point.pos, point.label, point.is_marker);
        }
        log::debug!("imported {count} points");
        self.request_redraw();
        Ok(count)
    }

    /// Replaces the route with the one in a route file.
    pub fn import_route(&mut self, text: &str) -> PickResult<usize> {
        let image = self.require_image()?;
        let imported = codec::decode_route(text, image)?;
        let count = imported.waypoints.len();
        self.store.replace_route(imported.route, imported.waypoints);
        log::debug!("imported route with {count} waypoints");
        self.request_redraw();
        Ok(count)
    }

    pub fn export_points(&self) -> PickResult<ExportPayload> {
        let image = self.require_image()?;
        if self.store.points().is_empty() {
            return Err(PickError::Precondition("no points to export".to_string()));
        }
        let file = codec::encode_points(&self.store, ImageInfo::from_size(image), Utc::now());
        self.payload(ExportKind::Points, codec::to_pretty_json(&file)?)
    }

    pub fn export_route(&self) -> PickResult<ExportPayload> {
        let image = self.require_image()?;
        if self.store.waypoints().is_empty() {
            return Err(PickError::Precondition(
                "no route waypoints to export".to_string(),
            ));
        }
        let file = codec::encode_route(&self.store, ImageInfo::from_size(image), Utc::now());
        self.payload(ExportKind::Route, codec::to_pretty_json(&file)?)
    }

    fn payload(&self, kind: ExportKind, json: String) -> PickResult<ExportPayload> {
        let name = self.image.as_ref().and_then(|image| image.name.as_deref());
        Ok(ExportPayload {
            file_name: codec::suggested_file_name(name, kind, Utc::now().date_naive()),
            json,
        })
    }
}

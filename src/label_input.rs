use egui::{Pos2, Rect};

use crate::annotation::{MapPoint, Point, PointId};

pub const INPUT_WIDTH: f32 = 50.0;
/// Horizontal gap between a point and its input.
pub const INPUT_GAP: f32 = 10.0;
/// Inputs placed to the right must end this far before the viewport edge.
pub const VIEWPORT_EDGE_MARGIN: f32 = 20.0;
pub const CANVAS_LEFT_INSET: f32 = 5.0;
/// Inputs sit this far above their point.
pub const INPUT_LIFT: f32 = 15.0;

/// Text-entry surface bound to one user point.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelInput {
    pub point_id: PointId,
    /// Native image position of the bound point.
    pub anchor: Point,
    pub buffer: String,
    pub focus_requested: bool,
}

#[derive(Clone, Debug, Default)]
pub struct LabelInputs {
    inputs: Vec<LabelInput>,
    pending_focus: Option<PointId>,
    focused: Option<PointId>,
}

impl LabelInputs {
    /// Throws every input away and rebuilds one per non-marker point.
    pub fn resync(&mut self, points: &[MapPoint]) {
        let focus = self.pending_focus.take();
        if focus.is_some() {
            self.focused = focus;
        }
        self.inputs = points
            .iter()
            .filter(|point| !point.is_marker)
            .map(|point| LabelInput {
                point_id: point.id,
                anchor: point.pos,
                buffer: point.label.clone(),
                focus_requested: focus == Some(point.id),
            })
            .collect();
        if !self.inputs.iter().any(|input| Some(input.point_id) == self.focused) {
            self.focused = None;
        }
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
        self.pending_focus = None;
        self.focused = None;
    }

    /// The input currently holding keyboard focus, if any.
    pub fn focused(&self) -> Option<PointId> {
        self.focused
    }

    pub fn set_focused(&mut self, id: PointId) {
        self.focused = Some(id);
    }

    pub fn blur(&mut self, id: PointId) {
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    /// Focus goes to the input of `id` once the next resync creates it.
    pub fn request_focus(&mut self, id: PointId) {
        self.pending_focus = Some(id);
    }

    pub fn set_buffer(&mut self, id: PointId, text: &str) {
        if let Some(input) = self.inputs.iter_mut().find(|input| input.point_id == id) {
            input.buffer = text.to_string();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelInput> {
        self.inputs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LabelInput> {
        self.inputs.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Top-left corner of the input for a point drawn at `point` (display space).
/// Prefers the right side; flips left when it would overflow the viewport,
/// but never further left than just inside the canvas.
pub fn place_input(point: Pos2, canvas_rect: Rect, viewport_right: f32) -> Pos2 {
    let right = point.x + INPUT_GAP;
    let left = point.x - INPUT_WIDTH - INPUT_GAP;
    let x = if right + INPUT_WIDTH < viewport_right - VIEWPORT_EDGE_MARGIN {
        right
    } else {
        left.max(canvas_rect.left() + CANVAS_LEFT_INSET)
    };
    Pos2::new(x, point.y - INPUT_LIFT)
}

#[cfg(test)]
mod tests {
    use egui::{vec2, Pos2, Rect};

    use super::{place_input, LabelInputs};
    use crate::annotation::{MapPoint, Point};

    fn point(id: u64, label: &str, is_marker: bool) -> MapPoint {
        MapPoint {
            id,
            pos: Point::new(id as f32, id as f32),
            label: label.to_string(),
            is_marker,
        }
    }

    #[test]
    fn resync_skips_markers_and_is_idempotent() {
        let points = vec![point(1, "A", false), point(2, "", true), point(3, "", false)];
        let mut inputs = LabelInputs::default();
        inputs.resync(&points);
        let first: Vec<_> = inputs.iter().cloned().collect();
        inputs.resync(&points);
        let second: Vec<_> = inputs.iter().cloned().collect();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(first[0].buffer, "A");
        assert_eq!(first[1].point_id, 3);
    }

    #[test]
    fn focus_request_lands_on_next_resync_only() {
        let points = vec![point(1, "", false), point(2, "", false)];
        let mut inputs = LabelInputs::default();
        inputs.request_focus(2);
        inputs.resync(&points);
        let focused: Vec<_> = inputs.iter().map(|i| i.focus_requested).collect();
        assert_eq!(focused, vec![false, true]);
        assert_eq!(inputs.focused(), Some(2));

        inputs.resync(&points);
        assert!(inputs.iter().all(|i| !i.focus_requested));
        assert_eq!(inputs.focused(), Some(2));

        inputs.resync(&points[..1]);
        assert_eq!(inputs.focused(), None);
    }

    #[test]
    fn blur_only_clears_the_matching_input() {
        let mut inputs = LabelInputs::default();
        inputs.set_focused(4);
        inputs.blur(3);
        assert_eq!(inputs.focused(), Some(4));
        inputs.blur(4);
        assert_eq!(inputs.focused(), None);
    }

    #[test]
    fn input_goes_right_of_point_when_room() {
        let canvas = Rect::from_min_size(Pos2::new(100.0, 50.0), vec2(400.0, 300.0));
        let pos = place_input(Pos2::new(200.0, 120.0), canvas, 1000.0);
        assert_eq!(pos, Pos2::new(210.0, 105.0));
    }

    #[test]
    fn input_flips_left_near_viewport_edge() {
        let canvas = Rect::from_min_size(Pos2::new(100.0, 50.0), vec2(400.0, 300.0));
        let pos = place_input(Pos2::new(480.0, 120.0), canvas, 540.0);
        assert_eq!(pos, Pos2::new(420.0, 105.0));
    }

    #[test]
    fn flipped_input_is_clamped_inside_canvas() {
        let canvas = Rect::from_min_size(Pos2::new(100.0, 50.0), vec2(30.0, 300.0));
        let pos = place_input(Pos2::new(120.0, 60.0), canvas, 150.0);
        assert_eq!(pos, Pos2::new(105.0, 45.0));
    }
}

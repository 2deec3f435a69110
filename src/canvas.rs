use egui::{Align2, Context, FontId, Id, Order, Rect, Sense, Stroke, TextEdit, Ui, Vec2};

use crate::annotation::{PointId, MAX_LABEL_LEN};
use crate::label_input::{self, INPUT_WIDTH};
use crate::mapper::{self, fit_to_viewport};
use crate::render;
use crate::state::{EditMode, EditorState};
use crate::theme::AppTheme;

/// Where the logical canvas is drawn inside the space the panel gave us.
/// Centered at its logical size, shrunk proportionally when it does not fit.
pub fn display_rect(allocated: Rect, canvas_size: Vec2) -> Rect {
    let size = if canvas_size.x > allocated.width() || canvas_size.y > allocated.height() {
        fit_to_viewport(canvas_size, allocated.size())
    } else {
        canvas_size
    };
    Rect::from_center_size(allocated.center(), size)
}

pub fn show_canvas(ui: &mut Ui, ctx: &Context, state: &mut EditorState, theme: &AppTheme) {
    let Some(image) = state.image.as_mut() else {
        empty_canvas(ui, theme);
        return;
    };
    image.ensure_texture(ctx);
    let Some(texture_id) = image.texture.as_ref().map(|texture| texture.id()) else {
        empty_canvas(ui, theme);
        return;
    };

    let (allocated, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
    let canvas_size = state.canvas_size;
    let display = display_rect(allocated, canvas_size);

    if response.clicked() {
        if let Some(pointer) = response.interact_pointer_pos() {
            if display.contains(pointer) {
                let canvas_pos = mapper::pointer_to_canvas(pointer, display, canvas_size);
                let outcome = state.handle_canvas_click(canvas_pos);
                log::debug!("canvas click at {canvas_pos:?}: {outcome:?}");
            }
        }
    }

    if response.secondary_clicked() {
        if let Some(pointer) = response.interact_pointer_pos() {
            let canvas_pos = mapper::pointer_to_canvas(pointer, display, canvas_size);
            if let Some(id) = state.point_at(canvas_pos) {
                state.remove_point(id);
            }
        }
    }

    if state.take_redraw() {
        ctx.request_repaint();
    }

    let painter = ui.painter_at(allocated);
    painter.rect_filled(allocated, theme.controls.card_rounding, theme.surfaces.canvas_bg);
    if let Some(mapper) = state.mapper() {
        let plan = render::draw_plan(&state.store, &mapper);
        render::paint(&painter, texture_id, display, canvas_size, &plan);
    }
    painter.rect_stroke(display, 0.0, Stroke::new(1.0, theme.surfaces.stroke_soft));

    if state.mode == EditMode::Point {
        draw_label_inputs(ctx, state, display);
    }
}

enum LabelEvent {
    Edited(PointId, String),
    Focused(PointId),
    Blurred(PointId),
}

fn draw_label_inputs(ctx: &Context, state: &mut EditorState, display: Rect) {
    let Some(mapper) = state.mapper() else {
        return;
    };
    let canvas_size = state.canvas_size;
    let viewport_right = ctx.screen_rect().right();
    let mut events = Vec::new();

    for input in state.labels.iter_mut() {
        let on_canvas = mapper.to_canvas(input.anchor);
        let anchor = mapper::canvas_to_display(on_canvas, display, canvas_size);
        let pos = label_input::place_input(anchor, display, viewport_right);

        let mut buffer = input.buffer.clone();
        let response = egui::Area::new(Id::new(("label_input", input.point_id)))
            .order(Order::Foreground)
            .fixed_pos(pos)
            .show(ctx, |ui| {
                ui.add(
                    TextEdit::singleline(&mut buffer)
                        .char_limit(MAX_LABEL_LEN)
                        .desired_width(INPUT_WIDTH)
                        .hint_text("ID"),
                )
            })
            .inner;

        if std::mem::take(&mut input.focus_requested) {
            response.request_focus();
            events.push(LabelEvent::Focused(input.point_id));
        }
        if response.gained_focus() {
            events.push(LabelEvent::Focused(input.point_id));
        }
        if response.changed() {
            events.push(LabelEvent::Edited(input.point_id, buffer));
        }
        if response.lost_focus() {
            events.push(LabelEvent::Blurred(input.point_id));
        }
    }

    for event in events {
        match event {
            LabelEvent::Edited(id, text) => state.edit_label(id, &text),
            LabelEvent::Focused(id) => state.labels.set_focused(id),
            LabelEvent::Blurred(id) => {
                state.commit_label(id);
            }
        }
    }
}

fn empty_canvas(ui: &mut Ui, theme: &AppTheme) {
    let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, theme.controls.card_rounding, theme.surfaces.canvas_bg);
    painter.rect_stroke(
        rect,
        theme.controls.card_rounding,
        Stroke::new(1.0, theme.surfaces.stroke_soft),
    );
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        "Open a map image (Ctrl/Cmd+O)",
        FontId::proportional(18.0),
        theme.text.secondary,
    );
}

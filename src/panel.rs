use egui::{vec2, RichText, TextEdit, Ui};

use crate::state::{EditMode, EditorState};
use crate::theme::AppTheme;
use crate::ui_controls;

/// File actions requested from the editor panel; the app owns the dialogs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelOutput {
    pub import_points: bool,
    pub export_points: bool,
    pub import_route: bool,
    pub export_route: bool,
}

pub fn show_panel(ui: &mut Ui, state: &mut EditorState, theme: &AppTheme) -> PanelOutput {
    let mut out = PanelOutput::default();
    ui.spacing_mut().item_spacing = vec2(theme.layout.space_2, theme.layout.space_2);

    let point_frame = ui_controls::card_frame(theme);
    let point_frame = if state.mode == EditMode::Point {
        point_frame.stroke(egui::Stroke::new(1.0, theme.surfaces.accent))
    } else {
        point_frame
    };
    point_frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        point_editor(ui, state, theme, &mut out);
    });

    ui.add_space(theme.layout.space_2);

    let route_frame = ui_controls::card_frame(theme);
    let route_frame = if state.mode == EditMode::Route {
        route_frame.stroke(egui::Stroke::new(1.0, theme.surfaces.accent))
    } else {
        route_frame
    };
    route_frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        route_editor(ui, state, theme, &mut out);
    });

    out
}

fn point_editor(ui: &mut Ui, state: &mut EditorState, theme: &AppTheme, out: &mut PanelOutput) {
    let size = vec2(80.0, theme.controls.action_height);
    let has_image = state.has_image();

    ui_controls::section_title(ui, theme, "Points");
    ui_controls::counter(ui, theme, "Labelled points", state.store.count_user_points());

    ui.horizontal(|ui| {
        ui.add_enabled_ui(has_image, |ui| {
            if ui_controls::ghost_button(ui, theme, "Import", size).clicked() {
                out.import_points = true;
            }
            if ui_controls::primary_button(ui, theme, "Export", size).clicked() {
                out.export_points = true;
            }
            if ui_controls::danger_button(ui, theme, "Clear", size).clicked() {
                state.clear_points();
            }
        });
    });
}

fn route_editor(ui: &mut Ui, state: &mut EditorState, theme: &AppTheme, out: &mut PanelOutput) {
    let size = vec2(80.0, theme.controls.action_height);
    let has_image = state.has_image();

    ui_controls::section_title(ui, theme, "Route");
    ui_controls::counter(ui, theme, "Waypoints", state.store.waypoint_count());

    let mut start = state.store.route().start.clone();
    let mut end = state.store.route().end.clone();
    egui::Grid::new("route_endpoints")
        .num_columns(2)
        .spacing(vec2(theme.layout.space_2, theme.layout.space_1))
        .show(ui, |ui| {
            ui.label(RichText::new("Start ID").color(theme.text.muted).size(12.0));
            if ui
                .add(TextEdit::singleline(&mut start).desired_width(90.0))
                .changed()
            {
                state.set_route_start(&start);
            }
            ui.end_row();

            ui.label(RichText::new("End ID").color(theme.text.muted).size(12.0));
            if ui
                .add(TextEdit::singleline(&mut end).desired_width(90.0))
                .changed()
            {
                state.set_route_end(&end);
            }
            ui.end_row();
        });

    ui.horizontal(|ui| {
        ui.add_enabled_ui(has_image, |ui| {
            if ui_controls::ghost_button(ui, theme, "Import", size).clicked() {
                out.import_route = true;
            }
            if ui_controls::primary_button(ui, theme, "Export", size).clicked() {
                out.export_route = true;
            }
            if ui_controls::danger_button(ui, theme, "Clear", size).clicked() {
                state.clear_route();
            }
        });
    });
}

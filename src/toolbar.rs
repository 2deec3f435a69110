use egui::{vec2, Align, Layout, RichText, Ui};

use crate::mapper::LayoutMode;
use crate::state::{EditMode, EditorState};
use crate::theme::AppTheme;
use crate::ui_controls;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToolbarOutput {
    pub open_image: bool,
}

pub fn mode_hint(mode: EditMode, has_image: bool) -> &'static str {
    if !has_image {
        return "Open a map image to start";
    }
    match mode {
        EditMode::Point => "Click to place a point and type its ID, right-click to delete",
        EditMode::Route => "Click the map to append route waypoints",
    }
}

pub fn show_toolbar(ui: &mut Ui, state: &mut EditorState, theme: &AppTheme) -> ToolbarOutput {
    let mut out = ToolbarOutput::default();

    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
        ui.spacing_mut().item_spacing = vec2(theme.layout.space_2, 0.0);

        if ui_controls::primary_button(
            ui,
            theme,
            "Open image",
            vec2(110.0, theme.controls.action_height),
        )
        .on_hover_text("Ctrl/Cmd+O")
        .clicked()
        {
            out.open_image = true;
        }

        ui.separator();
        for (mode, key) in [(EditMode::Point, "P"), (EditMode::Route, "R")] {
            if ui_controls::segmented(ui, theme, mode.label(), state.mode == mode)
                .on_hover_text(key)
                .clicked()
            {
                state.set_mode(mode);
            }
        }

        ui.separator();
        for layout in [LayoutMode::Sidebar, LayoutMode::Overlay] {
            if ui_controls::segmented(ui, theme, layout.label(), state.layout == layout).clicked() {
                state.set_layout(layout);
            }
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.label(
                RichText::new(mode_hint(state.mode, state.has_image()))
                    .color(theme.text.muted)
                    .size(12.0),
            );
        });
    });

    out
}

#[cfg(test)]
mod tests {
    use super::mode_hint;
    use crate::state::EditMode;

    #[test]
    fn hint_follows_mode_once_an_image_is_loaded() {
        assert_eq!(mode_hint(EditMode::Route, false), mode_hint(EditMode::Point, false));
        assert!(mode_hint(EditMode::Point, true).contains("point"));
        assert!(mode_hint(EditMode::Route, true).contains("waypoint"));
    }
}

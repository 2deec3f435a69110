use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use eframe::egui::{self, Context as EguiContext, Key, SidePanel, TopBottomPanel};
use eframe::{App, Frame};

use crate::canvas;
use crate::codec::ExportKind;
use crate::error::PickError;
use crate::loader::{self, FileLoader, LoadEvent, LoadKind, Loaded};
use crate::mapper::LayoutMode;
use crate::panel::{self, PanelOutput};
use crate::settings::UserSettings;
use crate::state::{EditMode, EditorState};
use crate::theme;
use crate::toolbar;
use crate::ui_controls;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct PickPointsApp {
    pub state: EditorState,
    loader: FileLoader,
    theme: theme::AppTheme,
}

impl PickPointsApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let theme = theme::map_dark_theme();
        theme::apply_theme(&cc.egui_ctx, &theme);

        let settings = UserSettings::load().unwrap_or_else(|err| {
            log::warn!("using default settings: {err:#}");
            UserSettings::default()
        });

        Self {
            state: EditorState::new(settings),
            loader: FileLoader::new(),
            theme,
        }
    }

    fn persist_settings(&self) {
        if let Err(err) = self.state.settings.save() {
            log::warn!("cannot save settings: {err:#}");
        }
    }

    fn pick_file(&self, title: &str, kind: LoadKind) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title(title);
        dialog = match kind {
            LoadKind::Image => dialog.add_filter("Images", &["png", "jpg", "jpeg"]),
            LoadKind::Points | LoadKind::Route => dialog.add_filter("JSON", &["json"]),
        };
        if let Some(dir) = self.state.settings.last_dir.as_deref() {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_file()
    }

    fn request_load(&mut self, kind: LoadKind) {
        let title = match kind {
            LoadKind::Image => "Open map image",
            LoadKind::Points => "Import points",
            LoadKind::Route => "Import route",
        };
        let Some(path) = self.pick_file(title, kind) else {
            return;
        };
        self.state.settings.remember_dir(&path);
        self.persist_settings();

        if let Err(err) = self.loader.request(kind, &path) {
            report(&err);
        }
    }

    fn process_load_events(&mut self) {
        while let Some(event) = self.loader.try_recv() {
            self.apply_load_event(event);
        }
    }

    fn apply_load_event(&mut self, event: LoadEvent) {
        let LoadEvent { kind, path, result } = event;
        let loaded = match result {
            Ok(loaded) => loaded,
            Err(err) => {
                report(&err);
                return;
            }
        };

        match (kind, loaded) {
            (LoadKind::Image, Loaded::Image(image)) => {
                self.state.load_image(image, loader::image_base_name(&path));
                if self.state.settings.prompt_points_after_image_load {
                    self.request_load(LoadKind::Points);
                }
            }
            (LoadKind::Points, Loaded::Text(text)) => {
                if let Err(err) = self.state.import_points(&text) {
                    report(&err);
                }
            }
            (LoadKind::Route, Loaded::Text(text)) => {
                if let Err(err) = self.state.import_route(&text) {
                    report(&err);
                }
            }
            (kind, _) => log::warn!("unexpected payload for {kind:?} load of {}", path.display()),
        }
    }

    fn export(&mut self, kind: ExportKind) -> Result<()> {
        let payload = match kind {
            ExportKind::Points => self.state.export_points()?,
            ExportKind::Route => self.state.export_route()?,
        };

        let mut dialog = rfd::FileDialog::new()
            .set_title("Save annotations")
            .set_file_name(&payload.file_name)
            .add_filter("JSON", &["json"]);
        if let Some(dir) = self.state.settings.last_dir.as_deref() {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            return Ok(());
        };

        write_export(&path, &payload.json)?;
        log::debug!("exported {kind:?} to {}", path.display());
        self.state.settings.remember_dir(&path);
        self.persist_settings();
        Ok(())
    }

    fn export_and_report(&mut self, kind: ExportKind) {
        if let Err(err) = self.export(kind) {
            let title = err
                .downcast_ref::<PickError>()
                .map_or("Export failed", PickError::title);
            show_alert(title, &format!("{err:#}"));
        }
    }

    fn handle_shortcuts(&mut self, ctx: &EguiContext) {
        let cmd = ctx.input(|input| input.modifiers.command || input.modifiers.ctrl);

        if cmd {
            if ctx.input(|input| input.key_pressed(Key::O)) {
                self.request_load(LoadKind::Image);
            }
            if ctx.input(|input| input.key_pressed(Key::S)) {
                let kind = match self.state.mode {
                    EditMode::Point => ExportKind::Points,
                    EditMode::Route => ExportKind::Route,
                };
                self.export_and_report(kind);
            }
            return;
        }

        // Letters belong to the label inputs while one of them has focus.
        if ctx.memory(|memory| memory.focused().is_some()) {
            return;
        }
        if ctx.input(|input| input.key_pressed(Key::P)) {
            self.state.set_mode(EditMode::Point);
        }
        if ctx.input(|input| input.key_pressed(Key::R)) {
            self.state.set_mode(EditMode::Route);
        }
    }

    fn handle_panel_output(&mut self, out: PanelOutput) {
        if out.import_points {
            self.request_load(LoadKind::Points);
        }
        if out.import_route {
            self.request_load(LoadKind::Route);
        }
        if out.export_points {
            self.export_and_report(ExportKind::Points);
        }
        if out.export_route {
            self.export_and_report(ExportKind::Route);
        }
    }
}

impl Drop for PickPointsApp {
    fn drop(&mut self) {
        self.loader.cancel_all();
    }
}

impl App for PickPointsApp {
    fn update(&mut self, ctx: &EguiContext, _frame: &mut Frame) {
        self.state.set_window_size(ctx.screen_rect().size());
        self.process_load_events();
        self.handle_shortcuts(ctx);

        let layout_before = self.state.layout;
        let toolbar_output = TopBottomPanel::top("toolbar")
            .exact_height(self.theme.layout.toolbar_height)
            .frame(ui_controls::toolbar_frame(&self.theme))
            .show(ctx, |ui| toolbar::show_toolbar(ui, &mut self.state, &self.theme))
            .inner;
        if self.state.layout != layout_before {
            self.persist_settings();
        }

        let panel_output = match self.state.layout {
            LayoutMode::Sidebar => SidePanel::left("editor_panel")
                .exact_width(self.theme.layout.sidebar_width)
                .resizable(false)
                .frame(ui_controls::sidebar_frame(&self.theme))
                .show(ctx, |ui| panel::show_panel(ui, &mut self.state, &self.theme))
                .inner,
            LayoutMode::Overlay => egui::Window::new("Editor")
                .collapsible(true)
                .resizable(false)
                .default_width(self.theme.layout.overlay_width)
                .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 56.0))
                .show(ctx, |ui| panel::show_panel(ui, &mut self.state, &self.theme))
                .and_then(|response| response.inner)
                .unwrap_or_default(),
        };

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.surfaces.app_bg)
                    .inner_margin(egui::Margin::symmetric(
                        self.theme.layout.panel_padding_x,
                        self.theme.layout.panel_padding_y,
                    )),
            )
            .show(ctx, |ui| {
                canvas::show_canvas(ui, ctx, &mut self.state, &self.theme);
            });

        if toolbar_output.open_image {
            self.request_load(LoadKind::Image);
        }
        self.handle_panel_output(panel_output);

        ctx.request_repaint_after(POLL_INTERVAL);
    }
}

fn write_export(path: &Path, json: &str) -> Result<()> {
    std::fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))
}

fn report(err: &PickError) {
    log::warn!("{err}");
    show_alert(err.title(), &err.to_string());
}

fn show_alert(title: &str, message: &str) {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

#[cfg(test)]
mod tests {
    use super::write_export;

    #[test]
    fn export_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alps_points.json");
        write_export(&path, "{\n  \"points\": []\n}").unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\n  \"points\": []\n}"
        );
    }

    #[test]
    fn export_into_missing_directory_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("route.json");
        let err = write_export(&path, "{}").unwrap_err();
        assert!(format!("{err:#}").contains("route.json"));
    }
}

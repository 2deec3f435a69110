use egui::{vec2, Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

use crate::mapper::{CANVAS_PADDING_Y, SIDEBAR_WIDTH, TOOLBAR_HEIGHT};

#[derive(Clone, Debug)]
pub struct AppTheme {
    pub surfaces: SurfaceTokens,
    pub text: TextTokens,
    pub controls: ControlTokens,
    pub layout: LayoutTokens,
}

#[derive(Clone, Debug)]
pub struct SurfaceTokens {
    pub app_bg: Color32,
    pub panel_bg: Color32,
    pub card_bg: Color32,
    pub canvas_bg: Color32,
    pub stroke_soft: Color32,
    pub stroke_strong: Color32,
    pub accent: Color32,
    pub accent_soft: Color32,
    pub danger_soft: Color32,
}

#[derive(Clone, Debug)]
pub struct TextTokens {
    pub primary: Color32,
    pub secondary: Color32,
    pub muted: Color32,
}

#[derive(Clone, Debug)]
pub struct ControlTokens {
    pub card_rounding: f32,
    pub button_rounding: f32,
    pub action_height: f32,
}

#[derive(Clone, Debug)]
pub struct LayoutTokens {
    pub space_1: f32,
    pub space_2: f32,
    pub space_3: f32,
    pub panel_padding_x: f32,
    pub panel_padding_y: f32,
    pub toolbar_height: f32,
    pub sidebar_width: f32,
    pub overlay_width: f32,
    pub segment_w: f32,
}

pub fn map_dark_theme() -> AppTheme {
    AppTheme {
        surfaces: SurfaceTokens {
            app_bg: Color32::from_rgb(0x16, 0x18, 0x1D),
            panel_bg: Color32::from_rgb(0x1C, 0x1E, 0x24),
            card_bg: Color32::from_rgb(0x23, 0x26, 0x2E),
            canvas_bg: Color32::from_rgb(0x11, 0x13, 0x18),
            stroke_soft: Color32::from_rgba_unmultiplied(255, 255, 255, 26),
            stroke_strong: Color32::from_rgba_unmultiplied(255, 255, 255, 52),
            accent: Color32::from_rgb(0x00, 0x66, 0xFF),
            accent_soft: Color32::from_rgba_unmultiplied(0, 102, 255, 80),
            danger_soft: Color32::from_rgba_unmultiplied(255, 64, 64, 60),
        },
        text: TextTokens {
            primary: Color32::from_rgb(0xF2, 0xF5, 0xFA),
            secondary: Color32::from_rgb(0xB3, 0xBD, 0xCF),
            muted: Color32::from_rgb(0x84, 0x8F, 0xA5),
        },
        controls: ControlTokens {
            card_rounding: 10.0,
            button_rounding: 6.0,
            action_height: 28.0,
        },
        layout: LayoutTokens {
            space_1: 4.0,
            space_2: 8.0,
            space_3: 12.0,
            panel_padding_x: 12.0,
            panel_padding_y: CANVAS_PADDING_Y,
            toolbar_height: TOOLBAR_HEIGHT,
            sidebar_width: SIDEBAR_WIDTH,
            overlay_width: 260.0,
            segment_w: 72.0,
        },
    }
}

pub fn apply_theme(ctx: &Context, theme: &AppTheme) {
    let mut style: Style = (*ctx.style()).clone();

    style.spacing.item_spacing = vec2(theme.layout.space_2, theme.layout.space_2);
    style.spacing.button_padding = vec2(theme.layout.space_3, theme.layout.space_1);
    style.spacing.window_margin =
        egui::Margin::symmetric(theme.layout.space_3, theme.layout.space_3);

    style.visuals = Visuals::dark();
    style.visuals.override_text_color = Some(theme.text.primary);
    style.visuals.panel_fill = theme.surfaces.panel_bg;
    style.visuals.window_fill = theme.surfaces.panel_bg;
    style.visuals.extreme_bg_color = theme.surfaces.app_bg;
    style.visuals.window_rounding = Rounding::same(theme.controls.card_rounding);

    let rounding = Rounding::same(theme.controls.button_rounding);
    let widgets = &mut style.visuals.widgets;
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, theme.surfaces.stroke_soft);
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, theme.text.secondary);
    widgets.inactive.bg_fill = theme.surfaces.card_bg;
    widgets.inactive.weak_bg_fill = theme.surfaces.card_bg;
    widgets.inactive.bg_stroke = Stroke::new(1.0, theme.surfaces.stroke_soft);
    widgets.hovered.weak_bg_fill = theme.surfaces.card_bg;
    widgets.hovered.bg_stroke = Stroke::new(1.0, theme.surfaces.stroke_strong);
    widgets.active.bg_fill = theme.surfaces.accent_soft;
    widgets.active.bg_stroke = Stroke::new(1.0, theme.surfaces.accent);
    for visuals in [
        &mut widgets.noninteractive,
        &mut widgets.inactive,
        &mut widgets.hovered,
        &mut widgets.active,
        &mut widgets.open,
    ] {
        visuals.rounding = rounding;
    }

    style.visuals.selection.bg_fill = theme.surfaces.accent_soft;
    style.visuals.selection.stroke = Stroke::new(1.0, theme.surfaces.accent);

    style.text_styles.insert(
        TextStyle::Heading,
        FontId::new(20.0, FontFamily::Proportional),
    );
    style
        .text_styles
        .insert(TextStyle::Body, FontId::new(14.0, FontFamily::Proportional));
    style.text_styles.insert(
        TextStyle::Button,
        FontId::new(14.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        TextStyle::Small,
        FontId::new(12.0, FontFamily::Proportional),
    );

    ctx.set_style(style);
}

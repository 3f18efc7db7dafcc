//! Neubrutalist look for the remote: flat fills, hard strokes, an offset
//! window shadow, plus the colours the status line and connection banner use.

use crate::domain::models::{ConnectionStatus, MessageSeverity};
use eframe::egui::{self, style::WidgetVisuals, Color32, Stroke};

pub struct BrutalistPalette {
    pub surface: Color32,
    pub ink: Color32,
    pub key_fill: Color32,
    pub key_hover: Color32,
    pub key_pressed: Color32,
    pub info: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
    pub idle: Color32,
}

impl BrutalistPalette {
    pub fn new(is_dark: bool) -> Self {
        if is_dark {
            Self {
                surface: Color32::from_rgb(25, 25, 25),
                ink: Color32::WHITE,
                key_fill: Color32::from_gray(30),
                key_hover: Color32::from_rgb(255, 200, 0),
                key_pressed: Color32::from_rgb(0, 255, 127),
                info: Color32::from_rgb(110, 160, 255),
                success: Color32::from_rgb(0, 220, 110),
                warning: Color32::from_rgb(255, 200, 0),
                error: Color32::from_rgb(255, 80, 80),
                idle: Color32::from_gray(90),
            }
        } else {
            Self {
                surface: Color32::from_rgb(245, 245, 245),
                ink: Color32::BLACK,
                key_fill: Color32::WHITE,
                key_hover: Color32::from_rgb(255, 220, 0),
                key_pressed: Color32::from_rgb(0, 255, 100),
                info: Color32::from_rgb(40, 60, 220),
                success: Color32::from_rgb(0, 150, 0),
                warning: Color32::from_rgb(200, 150, 0),
                error: Color32::from_rgb(220, 30, 30),
                idle: Color32::from_gray(100),
            }
        }
    }

    /// Text colour for a status line
    pub fn severity(&self, severity: MessageSeverity) -> Color32 {
        match severity {
            MessageSeverity::Info => self.info,
            MessageSeverity::Success => self.success,
            MessageSeverity::Warning => self.warning,
            MessageSeverity::Error => self.error,
        }
    }

    /// Label, background and text colour of the connection banner
    pub fn banner(&self, status: ConnectionStatus) -> (&'static str, Color32, Color32) {
        match status {
            ConnectionStatus::Connected => ("CONNECTED", self.success, Color32::BLACK),
            ConnectionStatus::Connecting => ("CONNECTING...", self.key_hover, Color32::BLACK),
            ConnectionStatus::Disconnected => ("DISCONNECTED", self.idle, Color32::WHITE),
            ConnectionStatus::Unavailable => ("BLUETOOTH OFF", self.error, Color32::WHITE),
        }
    }
}

fn flat(widget: &mut WidgetVisuals, stroke_width: f32, fill: Color32, outline: Color32, text: Color32) {
    widget.rounding = egui::Rounding::ZERO;
    widget.bg_fill = fill;
    widget.weak_bg_fill = fill;
    widget.bg_stroke = Stroke::new(stroke_width, outline);
    widget.fg_stroke = Stroke::new(1.0, text);
}

pub fn configure_neubrutalism(ctx: &egui::Context, is_dark: bool) {
    let palette = BrutalistPalette::new(is_dark);
    let mut style = (*ctx.style()).clone();

    for (text_style, size) in [
        (egui::TextStyle::Heading, 26.0),
        (egui::TextStyle::Body, 15.0),
        (egui::TextStyle::Button, 15.0),
    ] {
        if let Some(font) = style.text_styles.get_mut(&text_style) {
            font.size = size;
        }
    }

    style.spacing.item_spacing = egui::vec2(12.0, 12.0);
    style.spacing.button_padding = egui::vec2(16.0, 10.0);

    let visuals = &mut style.visuals;
    let ink = palette.ink;
    flat(&mut visuals.widgets.noninteractive, 2.0, palette.surface, ink, ink);
    flat(&mut visuals.widgets.inactive, 2.0, palette.key_fill, ink, ink);
    flat(&mut visuals.widgets.hovered, 2.5, palette.key_hover, ink, Color32::BLACK);
    flat(&mut visuals.widgets.active, 3.0, palette.key_pressed, ink, Color32::BLACK);
    visuals.widgets.hovered.expansion = 2.0;

    visuals.selection.stroke = Stroke::new(1.0, ink);
    visuals.selection.bg_fill = palette.info;

    visuals.window_rounding = egui::Rounding::ZERO;
    visuals.window_stroke = Stroke::new(2.0, ink);
    visuals.window_shadow = egui::Shadow {
        offset: egui::vec2(8.0, 8.0),
        blur: 0.0,
        spread: 0.0,
        color: ink,
    };
    visuals.window_fill = palette.surface;
    visuals.panel_fill = palette.surface;
    visuals.override_text_color = Some(ink);

    ctx.set_style(style);
}

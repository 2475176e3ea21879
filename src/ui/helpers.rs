// src/ui/helpers.rs
use crate::model::Badge;
use crate::view_models::{badge_is_danger, badge_text};
use egui::{Button, Color32, RichText, Ui, Vec2};

pub fn big_button(ui: &mut Ui, label: &str, width: f32, height: f32, enabled: bool) -> bool {
    ui.add_enabled(enabled, Button::new(label).min_size(Vec2::new(width, height)))
        .clicked()
}

/// Texto con el contador de errores pegado (vacío si no hay).
pub fn with_badge(label: &str, badge: &Badge) -> RichText {
    let count = badge_text(badge);
    if count.is_empty() {
        return RichText::new(label);
    }
    let color = if badge_is_danger(badge) {
        Color32::from_rgb(220, 53, 69)
    } else {
        Color32::from_rgb(13, 202, 240)
    };
    RichText::new(format!("{label}  {count}")).color(color)
}

/// Botón de ayuda "?" con el contador de errores de ese lado.
pub fn help_button(ui: &mut Ui, badge: &Badge, enabled: bool) -> bool {
    ui.add_enabled(enabled, Button::new(with_badge("❓", badge)).small())
        .on_hover_text("Show a hint for this side")
        .clicked()
}

use crate::AlgebraApp;
use egui::{Context, Window};

/// Ventana con la ayuda del lado pulsado.
pub fn ui_help_popup(app: &mut AlgebraApp, ctx: &Context) {
    let Some(popup) = &app.help_popup else {
        return;
    };
    let number = app.steps.number_of(popup.step).unwrap_or(1);
    let title = format!("Step {number} ({}): {}", popup.side.as_str(), popup.entry.title);

    let mut open = true;
    Window::new(title)
        .id(egui::Id::new("expression_help"))
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.set_max_width(360.0);
            ui.label(&popup.entry.content);
        });
    if !open {
        app.help_popup = None;
    }
}

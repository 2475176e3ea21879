use crate::app::{AlgebraApp, Tab};
use egui::{Context, ScrollArea, Ui, Visuals};
use egui_code_editor::{CodeEditor, ColorTheme, Syntax};

pub fn top_panel(app: &mut AlgebraApp, ctx: &Context) {
    egui::TopBottomPanel::top("menu_panel").show(ctx, |ui| {
        ui.horizontal_centered(|ui| {
            ui.selectable_value(&mut app.tab, Tab::Problem, "🧮 Problem");
            if ui
                .selectable_value(&mut app.tab, Tab::Recent, "🕘 Recent problems")
                .clicked()
            {
                app.change_filter();
            }

            ui.separator();
            if ui.button("➕ New problem").clicked() {
                app.new_blank_problem();
                app.tab = Tab::Problem;
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak(&app.route);
                if app.dispatcher.any_in_flight() {
                    ui.spinner();
                }
                if app.is_saving() {
                    ui.weak("Saving…");
                }
            });
        });
    });
}

pub fn bottom_panel(app: &mut AlgebraApp, ctx: &Context) {
    egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if !app.message.is_empty() {
                ui.colored_label(ui.visuals().warn_fg_color, &app.message);
                if ui.small_button("✖").clicked() {
                    app.message.clear();
                }
            }
            // ----------- BOTONES DE TEMA -----------
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🌙 Dark mode").clicked() {
                    ctx.set_visuals(Visuals::dark());
                    app.dark_mode = true;
                }
                if ui.button("☀ Light mode").clicked() {
                    ctx.set_visuals(Visuals::light());
                    app.dark_mode = false;
                }
            });
        });
    });
}

/// Editor de entrada con ancho fijo (compositor de la calculadora).
pub fn code_editor_input(
    ui: &mut Ui,
    id: &str,
    width: f32,
    rows: usize,
    fontsize: f32,
    syntax: Syntax,
    text: &mut String,
    max_height: f32,
) {
    ScrollArea::vertical()
        .id_salt(id)
        .max_height(max_height)
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            ui.set_width(width);
            CodeEditor::default()
                .id_source(id)
                .with_rows(rows)
                .with_fontsize(fontsize)
                .with_theme(ColorTheme::GITHUB_DARK)
                .with_syntax(syntax)
                .with_numlines(false)
                .vscroll(false)
                .show(ui, text);
        });
}

use crate::AlgebraApp;
use crate::app::StepView;
use crate::model::{Side, StepKey, StepType};
use crate::ui::helpers::{big_button, help_button};
use egui::{CentralPanel, ComboBox, Context, ScrollArea, Stroke, TextEdit, Ui};

/// Lo que el usuario pidió durante el frame; se aplica al terminar de pintar.
enum StepAction {
    Type(StepKey, StepType),
    Delete(StepKey),
    Help(StepKey, Side),
    CheckRewrite(StepKey, Side),
}

pub fn ui_problem(app: &mut AlgebraApp, ctx: &Context) {
    CentralPanel::default().show(ctx, |ui| {
        let panel_width = (ui.available_width() * 0.97).min(720.0);

        ui.vertical_centered(|ui| {
            egui::Frame::default()
                .fill(ui.visuals().window_fill())
                .inner_margin(egui::Margin::symmetric(24, 16))
                .show(ui, |ui| {
                    ui.set_width(panel_width);
                    ui.heading("Algebra sandbox");
                    ui.add_space(6.0);
                    variable_row(app, ui);
                    ui.add_space(8.0);

                    let mut actions = Vec::new();
                    ScrollArea::vertical()
                        .id_salt("steps_scroll")
                        .max_height((ui.available_height() - 60.0).max(120.0))
                        .auto_shrink([false, true])
                        .show(ui, |ui| {
                            for view in app.step_views() {
                                step_row(app, ui, &view, &mut actions);
                                ui.add_space(6.0);
                            }
                        });

                    for action in actions {
                        match action {
                            StepAction::Type(key, step_type) => app.change_step_type(key, step_type),
                            StepAction::Delete(key) => app.delete_step(key),
                            StepAction::Help(key, side) => app.toggle_expression_help(key, side),
                            StepAction::CheckRewrite(key, side) => app.check_rewrite(key, side),
                        }
                    }

                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if big_button(ui, "➕ Add step", 140.0, 32.0, app.add_step_enabled()) {
                            app.create_step();
                        }
                        if app.check_solution_visible
                            && big_button(
                                ui,
                                "✔ Check solution",
                                160.0,
                                32.0,
                                app.check_solution_enabled(),
                            )
                        {
                            app.check_solution();
                        }
                    });
                });
        });
    });
}

fn variable_row(app: &mut AlgebraApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label("Solve for:");
        let selected = app.variable.selected.clone().unwrap_or_else(|| "---".into());
        let mut chosen = None;
        ui.add_enabled_ui(!app.locked && !app.variable.options.is_empty(), |ui| {
            ComboBox::from_id_salt("variable_select")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for option in &app.variable.options {
                        let is_selected = app.variable.selected.as_deref() == Some(option.as_str());
                        if ui.selectable_label(is_selected, option).clicked() {
                            chosen = Some(option.clone());
                        }
                    }
                });
        });
        if let Some(variable) = chosen {
            app.variable_changed(variable);
        }
    });
}

fn step_row(app: &mut AlgebraApp, ui: &mut Ui, view: &StepView, actions: &mut Vec<StepAction>) {
    let stroke = if view.active {
        Stroke::new(1.5, ui.visuals().selection.bg_fill)
    } else {
        ui.visuals().widgets.noninteractive.bg_stroke
    };
    let enabled = app.step_controls_enabled();
    let now = app.now;

    egui::Frame::group(ui.style()).stroke(stroke).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.strong(view.label());

            ui.add_enabled_ui(enabled, |ui| {
                let mut step_type = view.step_type;
                ComboBox::from_id_salt(("step_type", view.key))
                    .selected_text(view.type_label())
                    .show_ui(ui, |ui| {
                        for option in StepType::SELECTABLE {
                            ui.selectable_value(&mut step_type, option, option.label());
                        }
                    });
                if step_type != view.step_type {
                    actions.push(StepAction::Type(view.key, step_type));
                }
            });

            if view.loading {
                ui.spinner();
            }
            if view.step_type.shows_delete() {
                let delete = ui
                    .add_enabled(app.delete_enabled(view.key), egui::Button::new("🗑 Delete"))
                    .clicked();
                if delete {
                    actions.push(StepAction::Delete(view.key));
                }
            }
        });

        if !view.prompt.is_empty() {
            ui.label(&view.prompt);
        }

        ui.horizontal(|ui| {
            for side in Side::BOTH {
                if side == Side::Right {
                    ui.label("=");
                }
                let Some(step) = app.steps.get_mut(view.key) else {
                    return;
                };
                let input = step.expr_mut(side);
                let mut buffer = input.text.clone();
                let response = ui.add_enabled(
                    enabled,
                    TextEdit::singleline(&mut buffer)
                        .id_salt(("expr", view.key, side.index()))
                        .desired_width(180.0)
                        .font(egui::TextStyle::Monospace)
                        .hint_text(side.as_str()),
                );
                input.focused = response.has_focus();
                if response.changed() {
                    input.edit(buffer, now);
                }

                let help_enabled = app.help_enabled(view.key, side);
                if help_button(ui, &view.badges[side.index()], help_enabled) {
                    actions.push(StepAction::Help(view.key, side));
                }
                if view.step_type.shows_rewrite_checks()
                    && ui
                        .add_enabled(enabled && view.key.is_saved(), egui::Button::new("🔍").small())
                        .on_hover_text("Check this rewrite")
                        .clicked()
                {
                    actions.push(StepAction::CheckRewrite(view.key, side));
                }
            }
        });
    });
}

use crate::AlgebraApp;
use crate::app::{PageButton, RecentRowView, Tab};
use crate::model::{SortColumn, SortDirection, SortKey, StatusFilter};
use egui::{Button, CentralPanel, ComboBox, Context, Grid, ScrollArea, TextEdit, Ui};

pub fn ui_recent(app: &mut AlgebraApp, ctx: &Context) {
    CentralPanel::default().show(ctx, |ui| {
        let max_width = 900.0;
        let panel_width = (ui.available_width() * 0.97).min(max_width);

        ui.vertical_centered(|ui| {
            egui::Frame::default()
                .fill(ui.visuals().window_fill())
                .inner_margin(egui::Margin::symmetric(16, 20))
                .show(ui, |ui| {
                    ui.set_width(panel_width);
                    ui.heading("Recent problems");
                    ui.add_space(8.0);
                    filters(app, ui);
                    ui.add_space(8.0);

                    let rows = app.recent_rows();
                    let mut open = None;
                    ScrollArea::vertical()
                        .id_salt("recent_scroll")
                        .max_height((ui.available_height() - 50.0).max(120.0))
                        .show(ui, |ui| {
                            open = rows_grid(app, ui, &rows);
                            if rows.is_empty() && !app.recent.loading {
                                ui.add_space(6.0);
                                ui.label("No problems match these filters.");
                            }
                        });
                    if let Some(id) = open {
                        app.open_problem(id);
                        app.tab = Tab::Problem;
                    }

                    ui.add_space(8.0);
                    pagination(app, ui);
                });
        });
    });
}

fn filters(app: &mut AlgebraApp, ui: &mut Ui) {
    ui.horizontal(|ui| {
        let mut unsolved = app.recent.filter.unsolved;
        if ui.checkbox(&mut unsolved, "Unsolved").changed() {
            app.set_status_checkbox(StatusFilter::Unsolved, unsolved);
        }
        let mut solved = app.recent.filter.solved;
        if ui.checkbox(&mut solved, "Solved").changed() {
            app.set_status_checkbox(StatusFilter::Solved, solved);
        }

        ui.separator();
        let mut equation = app.recent.equation_input.clone();
        let edited = ui
            .add(
                TextEdit::singleline(&mut equation)
                    .id_salt("equation_filter")
                    .hint_text("Filter by equation")
                    .desired_width(200.0),
            )
            .changed();
        if edited {
            app.edit_equation_filter(equation);
        }

        ui.separator();
        ui.label("Per page:");
        let current = app.recent.filter.page_size;
        let mut chosen = current;
        ComboBox::from_id_salt("page_size")
            .selected_text(current.to_string())
            .show_ui(ui, |ui| {
                for option in &app.recent.page_size_options {
                    ui.selectable_value(&mut chosen, *option, option.to_string());
                }
            });
        if chosen != current {
            app.set_page_size(chosen);
        }

        if app.recent.loading {
            ui.spinner();
        }
    });
}

/// Cabecera ordenable: una flecha por sentido.
fn sort_header(app: &mut AlgebraApp, ui: &mut Ui, title: &str, column: SortColumn) {
    ui.horizontal(|ui| {
        ui.strong(title);
        for (direction, arrow) in [(SortDirection::Up, "⏶"), (SortDirection::Down, "⏷")] {
            let key = SortKey::new(column, direction);
            let selected = app.recent.filter.sort == key;
            if ui.selectable_label(selected, arrow).clicked() {
                app.select_sort(key);
            }
        }
    });
}

/// La cabecera se pinta siempre para poder cambiar el orden sin filas.
fn rows_grid(app: &mut AlgebraApp, ui: &mut Ui, rows: &[RecentRowView]) -> Option<u64> {
    let mut open = None;
    Grid::new("recent_problems_grid")
        .striped(true)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            ui.strong("Equation");
            sort_header(app, ui, "Steps", SortColumn::StepCount);
            sort_header(app, ui, "Last viewed", SortColumn::LastViewed);
            sort_header(app, ui, "Started", SortColumn::StartDate);
            ui.strong("Status");
            ui.end_row();

            for row in rows {
                if ui
                    .link(&row.equation)
                    .on_hover_text("Open this problem")
                    .clicked()
                {
                    open = Some(row.problem_id);
                }
                ui.label(row.step_count.to_string());
                ui.label(&row.last_viewed);
                ui.label(&row.started);
                ui.label(row.status_label());
                ui.end_row();
            }
        });
    open
}

fn pagination(app: &mut AlgebraApp, ui: &mut Ui) {
    let buttons = app.page_buttons();
    if buttons.is_empty() {
        return;
    }
    let mut target = None;
    ui.horizontal(|ui| {
        for button in &buttons {
            let clicked = match button {
                PageButton::Previous { enabled } | PageButton::Next { enabled } => ui
                    .add_enabled(*enabled, Button::new(button.label()))
                    .clicked(),
                PageButton::Page { active, .. } => {
                    ui.selectable_label(*active, button.label()).clicked()
                }
                PageButton::Gap => {
                    ui.label(button.label());
                    false
                }
            };
            if !clicked {
                continue;
            }
            target = match button {
                PageButton::Previous { .. } => Some(app.recent.page.saturating_sub(1)),
                PageButton::Next { .. } => Some(app.recent.page + 1),
                PageButton::Page { number, .. } => Some(*number),
                PageButton::Gap => None,
            };
        }
    });
    if let Some(page) = target {
        app.go_to_page(page);
    }
}

use crate::AlgebraApp;
use crate::backend::wire::{MessagePart, ReplyBubble};
use crate::chat::{ChatEntry, ResponseCycle, ResponseState};
use crate::latex_utils::{latex_syntax, latex_to_display};
use crate::ui::helpers::big_button;
use crate::ui::layout::code_editor_input;
use egui::{Align, Context, Key, Layout, RichText, ScrollArea, SidePanel, Ui};

pub fn ui_calculator(app: &mut AlgebraApp, ctx: &Context) {
    SidePanel::right("calculator_panel")
        .resizable(true)
        .default_width(360.0)
        .min_width(280.0)
        .show(ctx, |ui| {
            ui.heading("🤖 Calculator");
            ui.separator();

            let history_height = (ui.available_height() - 150.0).max(120.0);
            ScrollArea::vertical()
                .id_salt("chat_scroll")
                .max_height(history_height)
                .stick_to_bottom(true)
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    for entry in &app.chat.entries {
                        match entry {
                            ChatEntry::User(message) => user_bubble(ui, message),
                            ChatEntry::Response(cycle) => response_cycle(ui, cycle, app.now),
                        }
                        ui.add_space(4.0);
                    }
                });

            ui.separator();
            composer(app, ui);
        });
}

fn composer(app: &mut AlgebraApp, ui: &mut Ui) {
    let width = ui.available_width();
    let before = app.chat.composer.clone();
    code_editor_input(
        ui,
        "chat_composer",
        width,
        3,
        14.0,
        latex_syntax(),
        &mut app.chat.composer,
        90.0,
    );

    // Enter envía; Shift+Enter deja el salto de línea.
    let enter = ui.input(|i| i.key_pressed(Key::Enter) && !i.modifiers.shift);
    if enter && app.chat.composer != before {
        app.chat.composer = before;
        app.submit_user_message(true);
    }

    ui.horizontal(|ui| {
        if big_button(ui, "Submit", 100.0, 28.0, app.chat.submit_enabled()) {
            app.submit_user_message(false);
        }
        if app.chat.queued() > 0 {
            ui.weak(format!("{} queued", app.chat.queued()));
        }
    });
}

fn user_bubble(ui: &mut Ui, message: &str) {
    ui.with_layout(Layout::top_down(Align::Max), |ui| {
        egui::Frame::default()
            .fill(ui.visuals().selection.bg_fill)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 6))
            .show(ui, |ui| {
                ui.label(RichText::new(latex_to_display(message)).monospace());
            });
    });
}

fn response_cycle(ui: &mut Ui, cycle: &ResponseCycle, now: f64) {
    let revealed = cycle.revealed(now);
    for bubble in cycle.bubbles.iter().take(revealed) {
        reply_bubble(ui, bubble);
    }
    if cycle.typing_index(now).is_some() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.weak("…");
        });
    }
    if let ResponseState::Failed(reason) = &cycle.state {
        ui.colored_label(ui.visuals().error_fg_color, reason);
    }
}

fn reply_bubble(ui: &mut Ui, bubble: &ReplyBubble) {
    egui::Frame::default()
        .fill(ui.visuals().faint_bg_color)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for part in &bubble.parts {
                    match part {
                        MessagePart::Text(text) => {
                            ui.label(text);
                        }
                        MessagePart::Latex(latex) => {
                            ui.label(RichText::new(latex_to_display(latex)).monospace().strong());
                        }
                    }
                }
            });
            if !bubble.timestamp.is_empty() {
                ui.with_layout(Layout::right_to_left(Align::Min), |ui| {
                    ui.weak(RichText::new(&bubble.timestamp).small());
                });
            }
        });
}

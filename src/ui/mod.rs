mod helpers;
pub mod layout;
pub mod views;

use crate::app::{AlgebraApp, Tab};
use eframe::{APP_KEY, App, Frame, set_value};
use egui::Context;
use layout::{bottom_panel, top_panel};
use std::time::Duration;

impl App for AlgebraApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        let now = ctx.input(|i| i.time);
        self.tick(now);

        top_panel(self, ctx);
        // PANEL INFERIOR: tema y línea de estado
        bottom_panel(self, ctx);

        match self.tab {
            Tab::Problem => {
                views::calculator::ui_calculator(self, ctx);
                views::problem::ui_problem(self, ctx);
            }
            Tab::Recent => views::recent::ui_recent(self, ctx),
        }

        views::help::ui_help_popup(self, ctx);
        if let Some(progress) = self.celebration_progress() {
            views::celebration::paint_celebration(ctx, progress);
            ctx.request_repaint();
        }

        if let Some(at) = self.next_wakeup() {
            let wait = (at - now).max(0.0);
            ctx.request_repaint_after(Duration::from_secs_f64(wait));
        }
        if self.dispatcher.any_in_flight() {
            // El hilo que responde pide repintado; esto cubre el spinner.
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        set_value(storage, APP_KEY, &self.preferences());
    }
}

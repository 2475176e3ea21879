use super::*;
use crate::latex_utils::latex_to_display;
use crate::view_models::page_buttons;

impl AlgebraApp {
    pub fn step_views(&self) -> Vec<StepView> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| StepView {
                key: step.key,
                number: i + 1,
                step_type: step.step_type,
                prompt: step.prompt.clone(),
                badges: [step.exprs[0].badge, step.exprs[1].badge],
                active: step.is_active(),
                loading: step.loading,
            })
            .collect()
    }

    pub fn page_buttons(&self) -> Vec<PageButton> {
        page_buttons(self.recent.page, self.recent.page_count)
    }

    pub fn recent_rows(&self) -> Vec<RecentRowView> {
        self.recent
            .rows
            .iter()
            .map(|row| {
                let left = row.left.as_deref().map(latex_to_display).unwrap_or_default();
                let right = row.right.as_deref().map(latex_to_display).unwrap_or_default();
                let equation = match (left.is_empty(), right.is_empty()) {
                    (true, true) => "(blank)".to_string(),
                    _ => format!("{left} = {right}"),
                };
                RecentRowView {
                    problem_id: row.problem_id,
                    equation,
                    step_count: row.step_count,
                    last_viewed: row.last_viewed.clone(),
                    started: row.started.clone(),
                    solved: row.solved,
                }
            })
            .collect()
    }
}

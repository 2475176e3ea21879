// src/view_models.rs

use crate::model::{Badge, BadgeColor, StepKey, StepType};

#[derive(Clone, Debug, PartialEq)]
pub struct StepView {
    pub key: StepKey,
    pub number: usize, // posición visible 1..n
    pub step_type: StepType,
    pub prompt: String,
    pub badges: [Badge; 2],
    pub active: bool,
    pub loading: bool,
}

impl StepView {
    pub fn label(&self) -> String {
        format!("Step {}", self.number)
    }

    pub fn type_label(&self) -> &'static str {
        self.step_type.label()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageButton {
    Previous { enabled: bool },
    Page { number: usize, active: bool },
    Gap,
    Next { enabled: bool },
}

impl PageButton {
    pub fn label(&self) -> String {
        match self {
            PageButton::Previous { .. } => "«".into(),
            PageButton::Page { number, .. } => number.to_string(),
            PageButton::Gap => "…".into(),
            PageButton::Next { .. } => "»".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecentRowView {
    pub problem_id: u64,
    pub equation: String,
    pub step_count: u32,
    pub last_viewed: String,
    pub started: String,
    pub solved: bool,
}

impl RecentRowView {
    pub fn status_label(&self) -> &'static str {
        if self.solved { "✅ Solved" } else { "Unsolved" }
    }
}

/// Texto del badge: vacío si no hay errores.
pub fn badge_text(badge: &Badge) -> String {
    if badge.count == 0 {
        String::new()
    } else {
        badge.count.to_string()
    }
}

pub fn badge_is_danger(badge: &Badge) -> bool {
    badge.color == BadgeColor::Danger
}

/// Botones de paginación: primera, última y las vecinas de la actual.
pub fn page_buttons(current: usize, count: usize) -> Vec<PageButton> {
    if count == 0 {
        return Vec::new();
    }
    let mut buttons = vec![PageButton::Previous { enabled: current > 1 }];
    let mut last_shown = 0;
    for number in 1..=count {
        let near = number + 1 >= current && number <= current + 1;
        if number == 1 || number == count || near {
            if last_shown != 0 && number > last_shown + 1 {
                buttons.push(PageButton::Gap);
            }
            buttons.push(PageButton::Page {
                number,
                active: number == current,
            });
            last_shown = number;
        }
    }
    buttons.push(PageButton::Next { enabled: current < count });
    buttons
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(buttons: &[PageButton]) -> Vec<String> {
        buttons.iter().map(PageButton::label).collect()
    }

    #[test]
    fn few_pages_are_all_listed() {
        let buttons = page_buttons(1, 3);
        assert_eq!(numbers(&buttons), vec!["«", "1", "2", "3", "»"]);
        assert_eq!(buttons[0], PageButton::Previous { enabled: false });
        assert_eq!(buttons[1], PageButton::Page { number: 1, active: true });
    }

    #[test]
    fn many_pages_collapse_with_gaps() {
        let buttons = page_buttons(5, 10);
        assert_eq!(numbers(&buttons), vec!["«", "1", "…", "4", "5", "6", "…", "10", "»"]);
        assert_eq!(buttons.last(), Some(&PageButton::Next { enabled: true }));
    }

    #[test]
    fn no_pages_no_buttons() {
        assert!(page_buttons(1, 0).is_empty());
    }

    #[test]
    fn empty_badge_shows_nothing() {
        assert_eq!(badge_text(&Badge::default()), "");
        let badge = Badge { count: 2, color: BadgeColor::Danger };
        assert_eq!(badge_text(&badge), "2");
        assert!(badge_is_danger(&badge));
    }
}

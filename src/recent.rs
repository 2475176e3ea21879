// src/recent.rs
//
// Estado de la tabla de problemas recientes. Cada cambio de control produce
// una petición de paginación; al llegar, se pide el cuerpo de la página 1.

use crate::backend::wire::{PaginationFragment, RecentRow};
use crate::config::snap_page_size;
use crate::latex_utils::contains_sentinel;
use crate::model::{SortKey, StatusFilter};
use crate::timing::Debouncer;
use serde::{Deserialize, Serialize};

pub type Params = Vec<(String, String)>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentFilter {
    pub unsolved: bool,
    pub solved: bool,
    pub sort: SortKey,
    pub equation: String,
    pub page_size: usize,
}

impl Default for RecentFilter {
    fn default() -> Self {
        Self {
            unsolved: true,
            solved: true,
            sort: SortKey::default(),
            equation: String::new(),
            page_size: 10,
        }
    }
}

impl RecentFilter {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    pub fn status(&self) -> StatusFilter {
        match (self.unsolved, self.solved) {
            (true, false) => StatusFilter::Unsolved,
            (false, true) => StatusFilter::Solved,
            _ => StatusFilter::All,
        }
    }

    /// Marca o desmarca una casilla. Si las dos quedarían apagadas, la otra
    /// vuelve a encenderse.
    pub fn set_status_checkbox(&mut self, status: StatusFilter, checked: bool) {
        match status {
            StatusFilter::Unsolved => {
                self.unsolved = checked;
                if !checked && !self.solved {
                    self.solved = true;
                }
            }
            StatusFilter::Solved => {
                self.solved = checked;
                if !checked && !self.unsolved {
                    self.unsolved = true;
                }
            }
            StatusFilter::All => {
                self.unsolved = true;
                self.solved = true;
            }
        }
    }

    /// Cambia el orden activo. `false` si ya era ese (no hay que refrescar).
    pub fn select_sort(&mut self, sort: SortKey) -> bool {
        if self.sort == sort {
            return false;
        }
        self.sort = sort;
        true
    }

    pub fn params(&self) -> Params {
        let mut params = vec![
            ("status".to_string(), self.status().as_str().to_string()),
            ("order_by".to_string(), self.sort.order_by().to_string()),
        ];
        let equation = self.equation.trim();
        if !equation.is_empty() {
            params.push(("equation".to_string(), equation.to_string()));
        }
        params
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecentTable {
    pub filter: RecentFilter,
    pub page: usize,
    pub page_count: usize,
    pub page_size_options: Vec<usize>,
    pub rows: Vec<RecentRow>,
    /// Texto del buscador; pasa al filtro cuando vence la espera.
    pub equation_input: String,
    pub loading: bool,
    equation_debounce: Debouncer,
}

impl RecentTable {
    pub fn new(filter: RecentFilter, page_size_options: Vec<usize>, quiet_secs: f64) -> Self {
        let mut filter = filter;
        filter.page_size = snap_page_size(filter.page_size, &page_size_options);
        Self {
            equation_input: filter.equation.clone(),
            filter,
            page: 1,
            page_count: 0,
            page_size_options,
            rows: Vec::new(),
            loading: false,
            equation_debounce: Debouncer::new(quiet_secs),
        }
    }

    pub fn pagination_params(&self) -> Params {
        let mut params = vec![
            ("update_pagination".to_string(), "true".to_string()),
            ("paginate_by".to_string(), self.filter.page_size.to_string()),
        ];
        params.extend(self.filter.params());
        params
    }

    pub fn body_params(&self) -> Params {
        let mut params = vec![
            ("update_body".to_string(), "true".to_string()),
            ("paginate_by".to_string(), self.filter.page_size.to_string()),
            ("page".to_string(), self.page.to_string()),
        ];
        params.extend(self.filter.params());
        params
    }

    pub fn edit_equation(&mut self, text: String, now: f64) {
        if text == self.equation_input {
            return;
        }
        self.equation_input = text;
        self.equation_debounce.restart(now);
    }

    /// `true` cuando el texto del buscador pasa al filtro. Con el centinela
    /// dentro no se toca el filtro.
    pub fn poll_equation(&mut self, now: f64, sentinel: &str) -> bool {
        if !self.equation_debounce.fire(now) {
            return false;
        }
        if contains_sentinel(&self.equation_input, sentinel) {
            return false;
        }
        self.filter.equation = self.equation_input.trim().to_string();
        true
    }

    pub fn equation_remaining(&self, now: f64) -> Option<f64> {
        self.equation_debounce.remaining(now)
    }

    /// Llega la paginación: vuelve a la página 1.
    pub fn apply_pagination(&mut self, fragment: PaginationFragment) {
        if !fragment.page_size_options.is_empty() {
            self.page_size_options = fragment.page_size_options;
        }
        self.filter.page_size = snap_page_size(self.filter.page_size, &self.page_size_options);
        self.page_count = fragment.page_count;
        self.page = 1;
    }

    /// `false` si la página no existe o ya es la actual.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page == 0 || page == self.page || (self.page_count > 0 && page > self.page_count) {
            return false;
        }
        self.page = page;
        true
    }

    pub fn set_page_size(&mut self, requested: usize) -> bool {
        let size = snap_page_size(requested, &self.page_size_options);
        if size == self.filter.page_size {
            return false;
        }
        self.filter.page_size = size;
        true
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SortColumn, SortDirection};

    const SENTINEL: &str = "randomstringnoonewillevertypeinhopefully";

    fn table() -> RecentTable {
        RecentTable::new(RecentFilter::default(), vec![10, 20, 50], 0.5)
    }

    fn value<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn both_checkboxes_mean_all() {
        let filter = RecentFilter::default();
        assert_eq!(filter.status(), StatusFilter::All);
    }

    #[test]
    fn unchecking_the_last_box_turns_the_other_back_on() {
        let mut filter = RecentFilter::default();
        filter.set_status_checkbox(StatusFilter::Solved, false);
        assert_eq!(filter.status(), StatusFilter::Unsolved);
        filter.set_status_checkbox(StatusFilter::Unsolved, false);
        assert!(filter.solved);
        assert!(!filter.unsolved);
        assert_eq!(filter.status(), StatusFilter::Solved);
    }

    #[test]
    fn active_sort_click_is_a_noop() {
        let mut filter = RecentFilter::default();
        assert!(!filter.select_sort(SortKey::default()));
        let by_steps = SortKey::new(SortColumn::StepCount, SortDirection::Up);
        assert!(filter.select_sort(by_steps));
        assert_eq!(value(&filter.params(), "order_by"), Some("step-count-up"));
    }

    #[test]
    fn pagination_and_body_params() {
        let mut table = table();
        table.filter.set_status_checkbox(StatusFilter::Solved, false);
        let pagination = table.pagination_params();
        assert_eq!(value(&pagination, "update_pagination"), Some("true"));
        assert_eq!(value(&pagination, "paginate_by"), Some("10"));
        assert_eq!(value(&pagination, "status"), Some("unsolved"));
        assert_eq!(value(&pagination, "page"), None);
        assert_eq!(value(&pagination, "equation"), None);

        table.page = 2;
        let body = table.body_params();
        assert_eq!(value(&body, "update_body"), Some("true"));
        assert_eq!(value(&body, "page"), Some("2"));
        assert_eq!(value(&body, "order_by"), Some("last-viewed-down"));
    }

    #[test]
    fn equation_filter_is_debounced() {
        let mut table = table();
        table.edit_equation("x".into(), 0.0);
        table.edit_equation("x+1".into(), 0.3);
        assert!(!table.poll_equation(0.6, SENTINEL));
        assert!(table.poll_equation(0.9, SENTINEL));
        assert_eq!(value(&table.filter.params(), "equation"), Some("x+1"));
        assert!(!table.poll_equation(2.0, SENTINEL));
    }

    #[test]
    fn equation_with_sentinel_leaves_the_filter_alone() {
        let mut table = table();
        table.edit_equation("2x".into(), 0.0);
        assert!(table.poll_equation(0.6, SENTINEL));

        table.edit_equation(format!("2x+{SENTINEL}"), 1.0);
        assert!(!table.poll_equation(1.6, SENTINEL));
        assert_eq!(table.filter.equation, "2x");
        assert_eq!(table.equation_remaining(1.6), None);
    }

    #[test]
    fn configured_page_size_seeds_the_filter() {
        let filter = RecentFilter::with_page_size(20);
        assert_eq!(filter.page_size, 20);
        assert_eq!(filter.status(), StatusFilter::All);
        let table = RecentTable::new(filter, vec![10, 20, 50], 0.5);
        assert_eq!(table.filter.page_size, 20);
    }

    #[test]
    fn unknown_page_size_snaps_to_largest() {
        let mut table = table();
        assert!(table.set_page_size(35));
        assert_eq!(table.filter.page_size, 50);
        assert!(!table.set_page_size(50));

        let stored = RecentFilter {
            page_size: 7,
            ..RecentFilter::default()
        };
        let table = RecentTable::new(stored, vec![10, 20, 50], 0.5);
        assert_eq!(table.filter.page_size, 50);
    }

    #[test]
    fn pagination_resets_to_first_page_and_bounds_navigation() {
        let mut table = table();
        table.page = 3;
        table.apply_pagination(PaginationFragment {
            page_count: 4,
            page_size_options: vec![10, 20, 50],
        });
        assert_eq!(table.page, 1);
        assert!(!table.has_previous());
        assert!(table.go_to(4));
        assert!(!table.has_next());
        assert!(!table.go_to(5));
        assert!(!table.go_to(4));
        assert!(!table.go_to(0));
    }
}

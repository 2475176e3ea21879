use super::*;
use crate::backend::Call;
use crate::backend::wire::{PaginationFragment, RecentBody};
use crate::dispatch::OpKey;
use crate::model::{SortKey, StatusFilter};

impl AlgebraApp {
    /// Cualquier cambio de filtro: primero la paginación, después la página 1.
    pub fn change_filter(&mut self) {
        self.recent.loading = true;
        let params = self.recent.pagination_params();
        self.dispatcher
            .submit(OpKey::RecentPagination, Call::RecentPagination { params });
    }

    pub fn go_to_page(&mut self, page: usize) {
        if self.recent.go_to(page) {
            self.fetch_recent_body();
        }
    }

    pub fn set_status_checkbox(&mut self, status: StatusFilter, checked: bool) {
        let before = self.recent.filter.status();
        self.recent.filter.set_status_checkbox(status, checked);
        if self.recent.filter.status() != before {
            self.change_filter();
        }
    }

    pub fn select_sort(&mut self, sort: SortKey) {
        if self.recent.filter.select_sort(sort) {
            self.change_filter();
        }
    }

    pub fn set_page_size(&mut self, size: usize) {
        if self.recent.set_page_size(size) {
            self.change_filter();
        }
    }

    pub fn edit_equation_filter(&mut self, text: String) {
        self.recent.edit_equation(text, self.now);
    }

    fn fetch_recent_body(&mut self) {
        self.recent.loading = true;
        let params = self.recent.body_params();
        self.dispatcher
            .submit(OpKey::RecentBody, Call::RecentBody { params });
    }

    pub(crate) fn recent_pagination_arrived(&mut self, fragment: PaginationFragment) {
        self.recent.apply_pagination(fragment);
        self.fetch_recent_body();
    }

    pub(crate) fn recent_body_arrived(&mut self, body: RecentBody) {
        self.recent.rows = body.rows;
        self.recent.loading = false;
    }
}

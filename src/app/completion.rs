use super::*;
use crate::backend::Reply;
use crate::backend::wire::{DeleteStepUpdate, ExpressionUpdate, NextAction, StepFragment, StepTypeUpdate};
use crate::dispatch::{Completion, OpKey};
use crate::error::BackendError;
use crate::model::CheckKind;

impl AlgebraApp {
    /// Aplica una respuesta ya filtrada por el dispatcher.
    pub fn handle_completion(&mut self, completion: Completion) {
        let key = completion.ticket.key;
        match completion.result {
            Ok(reply) => self.route_reply(key, reply),
            Err(err) => self.operation_failed(key, err),
        }
    }

    fn route_reply(&mut self, key: OpKey, reply: Reply) {
        match (key, reply) {
            (OpKey::SaveProblem, Reply::SavedProblem(saved)) => self.problem_saved(saved),
            (OpKey::StartNew, Reply::StepFragment(fragment)) => self.blank_step_arrived(fragment),
            (OpKey::NewStep(id), Reply::StepFragment(fragment)) => {
                if let Some(step) = self.steps.get_mut(StepKey::Saved(id)) {
                    step.apply_fragment(&fragment);
                }
            }
            (OpKey::LoadProblem, Reply::Problem(fragment)) => self.problem_loaded(fragment),
            (OpKey::StepType(id), Reply::StepType(update)) => self.step_type_updated(id, update),
            (OpKey::Expression(id, side), Reply::Expression(update)) => {
                self.expression_updated(id, side, update)
            }
            (OpKey::Variable, Reply::Mistakes(update)) => self.steps.apply_mistakes(&update.mistakes),
            (OpKey::AddStep, Reply::AttemptNewStep(attempt)) => match attempt.next_action {
                NextAction::Append => match attempt.new_step_id {
                    Some(id) => self.append_step(id),
                    None => log::warn!("append sin id de paso"),
                },
                NextAction::Alert => {
                    self.message = "Finish the current step before adding a new one.".into();
                }
            },
            (OpKey::DeleteStep(id), Reply::DeleteStep(update)) => self.step_deleted(id, update),
            (OpKey::HelpClick(..), Reply::Ack) => {}
            (OpKey::Chat, Reply::Chat(reply)) => {
                let interval = self.config.reveal_interval_secs();
                let settle = self.config.reveal_settle_secs();
                self.chat.response_arrived(reply, self.now, interval, settle);
            }
            (OpKey::RecentPagination, Reply::Pagination(fragment)) => {
                self.recent_pagination_arrived(fragment)
            }
            (OpKey::RecentBody, Reply::RecentBody(body)) => self.recent_body_arrived(body),
            (key, reply) => log::warn!("respuesta inesperada para {key:?}: {reply:?}"),
        }
    }

    fn operation_failed(&mut self, key: OpKey, err: BackendError) {
        log::warn!("{key:?} falló: {err}");
        match key {
            OpKey::SaveProblem => {
                self.problem_save_failed(&err);
                return;
            }
            OpKey::StartNew => {
                if let Some(step) = self.steps.first_mut() {
                    step.loading = false;
                }
            }
            OpKey::NewStep(id) => {
                if let Some(step) = self.steps.get_mut(StepKey::Saved(id)) {
                    step.loading = false;
                }
            }
            OpKey::Chat => self.chat_failed(err.user_message()),
            OpKey::RecentPagination | OpKey::RecentBody => self.recent.loading = false,
            // La ayuda ya se mostró; el registro del clic no afecta a la vista.
            OpKey::HelpClick(..) => return,
            _ => {}
        }
        self.message = err.user_message();
    }

    /// El paso en blanco inicial solo aporta el enunciado; lo escrito mientras
    /// tanto se conserva.
    fn blank_step_arrived(&mut self, fragment: StepFragment) {
        if let Some(step) = self.steps.first_mut() {
            step.prompt = fragment.prompt;
            step.loading = false;
        }
    }

    fn step_type_updated(&mut self, id: StepId, update: StepTypeUpdate) {
        self.steps.apply_mistakes(&update.mistakes);
        // Paso 1: con "Define" se muestra la variable elegida si hay menú;
        // con cualquier otro tipo se vacía la selección.
        if self.steps.is_first(StepKey::Saved(id)) {
            let is_define = self
                .steps
                .get(StepKey::Saved(id))
                .is_some_and(|step| step.step_type == StepType::Define);
            if !is_define {
                self.variable.selected = None;
            } else if !self.variable.options.is_empty() {
                self.variable.selected = update.selected_variable;
            }
        }
        if update.stop_check_rewrite {
            self.stop_check(CheckKind::Rewrite, ResponseCaller::StepTypeChanged);
        }
        if update.stop_check_solution {
            self.stop_check(CheckKind::Solution, ResponseCaller::StepTypeChanged);
        }
    }

    fn expression_updated(&mut self, id: StepId, side: Side, update: ExpressionUpdate) {
        self.steps.apply_mistakes(&update.mistakes);
        self.steps.apply_badges(side, &update.badge_updates);
        if self.steps.is_first(StepKey::Saved(id)) {
            let selected = update.selected_variable.clone();
            self.variable.replace(selected, update.variable_options.clone());
        }
        self.check_solution_visible = update.isolated_side().is_some();
        if let Some(kind) = update.stop_check() {
            self.stop_check(kind, ResponseCaller::ExpressionChanged);
        }
    }

    fn step_deleted(&mut self, id: StepId, update: DeleteStepUpdate) {
        if self.steps.remove(StepKey::Saved(id)).is_none() {
            log::debug!("step{id} ya no estaba en la lista");
        }
        if self
            .help_popup
            .as_ref()
            .is_some_and(|popup| popup.step == StepKey::Saved(id))
        {
            self.help_popup = None;
        }
        self.steps.apply_mistakes(&update.mistakes);
        if let Some(kind) = update.stop_check() {
            self.stop_check(kind, ResponseCaller::DeleteStep);
        }
    }
}

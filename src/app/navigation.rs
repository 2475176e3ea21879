use super::*;
use crate::backend::Call;
use crate::backend::wire::{ProblemFragment, SavedProblem};
use crate::dispatch::OpKey;
use crate::error::BackendError;
use crate::model::SaveOutcome;

impl AlgebraApp {
    /// Descarta el problema actual y deja un primer paso en blanco sin guardar.
    pub fn new_blank_problem(&mut self) {
        self.reset_session();
        let first = self.new_step(StepKey::Unsaved, HelpEntry::define_equation());
        self.steps.push(first);
        self.set_route("/algebra/".into());
        self.dispatcher.submit(OpKey::StartNew, Call::StartNewStep);
        self.change_filter();
    }

    /// Abre un problema existente por id.
    pub fn open_problem(&mut self, problem: ProblemId) {
        self.reset_session();
        self.problem = ProblemState::Saved(problem);
        self.tab = Tab::Problem;
        self.set_route(format!("/algebra/{problem}/"));
        self.dispatcher.submit(OpKey::LoadProblem, Call::LoadProblem { problem });
        self.change_filter();
    }

    fn reset_session(&mut self) {
        self.dispatcher.invalidate_all();
        self.problem = ProblemState::Unsaved;
        self.pending_after_save.clear();
        self.steps.clear();
        self.variable = VariableMenu::default();
        self.check_solution_visible = false;
        self.locked = false;
        self.celebration_started = None;
        self.chat = ChatPanel::default();
        self.help_popup = None;
        self.message.clear();
    }

    pub(crate) fn set_route(&mut self, route: String) {
        #[cfg(target_arch = "wasm32")]
        crate::config::web::replace_route(&route);
        self.route = route;
    }

    pub(crate) fn problem_loaded(&mut self, fragment: ProblemFragment) {
        let quiet = self.config.debounce_secs();
        self.problem = ProblemState::Saved(fragment.problem_id);
        self.steps.clear();
        for step_fragment in &fragment.steps {
            let Some(id) = step_fragment.step_id else {
                log::warn!("paso sin id en el problema {}", fragment.problem_id);
                continue;
            };
            let mut step = Step::new(StepKey::Saved(id), HelpEntry::blank_step(), quiet);
            step.apply_fragment(step_fragment);
            self.steps.push(step);
        }
        self.variable
            .replace(fragment.selected_variable, fragment.variable_options);
        self.chat.restore(&fragment.chat);
        log::info!(
            "problema {} cargado con {} pasos",
            fragment.problem_id,
            self.steps.len()
        );

        if fragment.finished {
            self.lock_everything(false);
            return;
        }

        // El menú de variables sale de la respuesta a la primera expresión.
        let first_left = self
            .steps
            .first()
            .and_then(|step| step.key.id().map(|id| (id, step.exprs[0].text.clone())));
        if let Some((step, latex)) = first_left {
            if !latex.trim().is_empty() {
                self.dispatcher.submit(
                    OpKey::Expression(step, Side::Left),
                    Call::UpdateExpression {
                        step,
                        side: Side::Left,
                        latex,
                    },
                );
            }
        }
    }

    /// Garantiza que el problema existe antes de `after`. Si ya existe se
    /// ejecuta en el acto; si no, se encola y se lanza una sola creación.
    pub(crate) fn ensure_problem_then(&mut self, after: AfterSave) {
        match self.problem {
            ProblemState::Saved(_) => self.run_after_save(after, SaveOutcome::AlreadySaved),
            ProblemState::Creating => self.pending_after_save.push(after),
            ProblemState::Unsaved => {
                self.problem = ProblemState::Creating;
                self.pending_after_save.push(after);
                self.dispatcher.submit(OpKey::SaveProblem, Call::SaveNewProblem);
            }
        }
    }

    pub(crate) fn problem_saved(&mut self, saved: SavedProblem) {
        log::info!(
            "problema {} creado (primer paso {})",
            saved.problem_id,
            saved.step_id
        );
        self.problem = ProblemState::Saved(saved.problem_id);
        if !self.steps.rekey_unsaved(saved.step_id) {
            log::warn!("no había paso provisional que renombrar");
        }
        self.set_route(format!("/algebra/{}/", saved.problem_id));

        let outcome = SaveOutcome::Created {
            problem: saved.problem_id,
            first_step: saved.step_id,
        };
        for after in std::mem::take(&mut self.pending_after_save) {
            self.run_after_save(after, outcome);
        }
    }

    /// La creación falló: el chat sigue sin problema, el resto se abandona.
    /// Un tipo de paso que no llegó al servidor vuelve a "---" para que
    /// elegirlo otra vez lo reintente.
    pub(crate) fn problem_save_failed(&mut self, err: &BackendError) {
        self.problem = ProblemState::Unsaved;
        self.message = err.user_message();
        for after in std::mem::take(&mut self.pending_after_save) {
            match after {
                AfterSave::Chat(message, caller) => self.get_response(message, caller),
                AfterSave::StepType(_) => {
                    if let Some(step) = self.steps.get_mut(StepKey::Unsaved) {
                        step.step_type = StepType::Undefined;
                    }
                }
                AfterSave::Expression(..) => {}
            }
        }
    }

    fn run_after_save(&mut self, after: AfterSave, outcome: SaveOutcome) {
        let first_step = match outcome {
            SaveOutcome::Created { first_step, .. } => Some(first_step),
            SaveOutcome::AlreadySaved => self.steps.first().and_then(|s| s.key.id()),
        };
        match after {
            AfterSave::Chat(message, caller) => self.get_response(message, caller),
            AfterSave::StepType(step_type) => match first_step {
                Some(step) => self.submit_step_type(step, step_type),
                None => log::warn!("cambio de tipo sin paso guardado"),
            },
            AfterSave::Expression(side, latex) => match first_step {
                Some(step) => self.submit_expression(step, side, latex),
                None => log::warn!("expresión sin paso guardado"),
            },
        }
    }

    /// Problema terminado: se bloquea todo lo que no sea el chat.
    pub fn lock_everything(&mut self, celebrate: bool) {
        if !self.locked {
            log::info!("problema terminado, controles bloqueados");
        }
        self.locked = true;
        self.help_popup = None;
        self.steps.cancel_all_inputs();
        for step in self.steps.iter_mut() {
            for expr in &mut step.exprs {
                expr.focused = false;
            }
        }
        if celebrate && self.celebration_started.is_none() {
            self.celebration_started = Some(self.now);
        }
    }
}

use super::*;
use crate::backend::Call;
use crate::dispatch::OpKey;
use crate::error::BackendError;
use crate::model::CheckKind;

impl AlgebraApp {
    /// Pide al servidor un paso nuevo para el problema actual.
    pub fn create_step(&mut self) {
        if self.locked {
            self.message = BackendError::Locked.user_message();
            return;
        }
        let Some(problem) = self.problem.id() else {
            log::info!("añadir paso sin problema guardado");
            self.message = BackendError::NoProblem.user_message();
            return;
        };
        if !self.add_step_enabled() {
            return;
        }
        self.dispatcher
            .submit(OpKey::AddStep, Call::AttemptNewStep { problem });
    }

    /// El servidor acepta el paso: se añade en blanco y se pide su contenido.
    pub(crate) fn append_step(&mut self, step: StepId) {
        let Some(problem) = self.problem.id() else {
            return;
        };
        let new_step = self.new_step(StepKey::Saved(step), HelpEntry::blank_step());
        self.steps.push(new_step);
        self.check_solution_visible = false;
        self.dispatcher
            .submit(OpKey::NewStep(step), Call::NewStep { problem, step });
    }

    pub fn change_step_type(&mut self, key: StepKey, step_type: StepType) {
        if self.locked {
            return;
        }
        let Some(step) = self.steps.get_mut(key) else {
            return;
        };
        if step.step_type == step_type {
            return;
        }
        step.step_type = step_type;
        match key {
            StepKey::Unsaved => self.ensure_problem_then(AfterSave::StepType(step_type)),
            StepKey::Saved(id) => self.submit_step_type(id, step_type),
        }
    }

    pub(crate) fn submit_step_type(&mut self, step: StepId, step_type: StepType) {
        self.dispatcher
            .submit(OpKey::StepType(step), Call::UpdateStepType { step, step_type });
    }

    /// Borra un paso guardado. La fila desaparece cuando el servidor confirma.
    pub fn delete_step(&mut self, key: StepKey) {
        if self.locked {
            return;
        }
        let Some(step) = key.id() else {
            return;
        };
        self.dispatcher
            .submit(OpKey::DeleteStep(step), Call::DeleteStep { step });
    }

    /// Expresión confirmada por el debounce.
    pub fn expression_changed(&mut self, key: StepKey, side: Side, latex: String) {
        if self.locked {
            return;
        }
        match key {
            StepKey::Unsaved => self.ensure_problem_then(AfterSave::Expression(side, latex)),
            StepKey::Saved(id) => self.submit_expression(id, side, latex),
        }
    }

    pub(crate) fn submit_expression(&mut self, step: StepId, side: Side, latex: String) {
        log::debug!("step{step} {} = {latex}", side.as_str());
        self.dispatcher.submit(
            OpKey::Expression(step, side),
            Call::UpdateExpression { step, side, latex },
        );
    }

    /// Abre o cierra la ayuda de un lado. Tras abrirla, el botón queda
    /// inactivo durante el tiempo de espera.
    pub fn toggle_expression_help(&mut self, key: StepKey, side: Side) {
        if self.locked {
            return;
        }
        if let Some(popup) = &self.help_popup {
            if popup.step == key && popup.side == side {
                self.help_popup = None;
                return;
            }
        }
        let now = self.now;
        let cooldown = self.config.help_cooldown_secs();
        let Some(step) = self.steps.get_mut(key) else {
            return;
        };
        if step.help_cooldown[side.index()].is_active(now) {
            return;
        }
        step.help_cooldown[side.index()].start(now, cooldown);
        self.help_popup = Some(HelpPopup {
            step: key,
            side,
            entry: step.help[side.index()].clone(),
        });
        if let StepKey::Saved(id) = key {
            self.dispatcher
                .submit(OpKey::HelpClick(id, side), Call::HelpClick { step: id, side });
        }
    }

    pub fn variable_changed(&mut self, variable: String) {
        if self.locked || self.variable.selected.as_deref() == Some(variable.as_str()) {
            return;
        }
        self.variable.selected = Some(variable.clone());
        let Some(problem) = self.problem.id() else {
            return;
        };
        self.dispatcher
            .submit(OpKey::Variable, Call::UpdateVariable { problem, variable });
    }

    /// Comprueba la reescritura de un lado de un paso.
    pub fn check_rewrite(&mut self, key: StepKey, side: Side) {
        if self.locked {
            return;
        }
        let Some(id) = key.id() else {
            return;
        };
        let message = format!("step{id}-start-check-rewrite-{}", side.as_str());
        self.get_response(message, ResponseCaller::InitializeNewStep);
    }

    pub fn check_solution(&mut self) {
        if !self.check_solution_enabled() {
            return;
        }
        self.get_response(
            "start-check-solution".into(),
            ResponseCaller::CheckSolutionClick,
        );
    }

    /// Detiene una comprobación en curso (el servidor lo pide al cambiar algo).
    pub(crate) fn stop_check(&mut self, kind: CheckKind, caller: ResponseCaller) {
        self.get_response(kind.stop_message().to_string(), caller);
    }
}

use super::*;
use crate::dispatch::OpKey;

/// Duración de la animación de fin de problema.
pub const CELEBRATION_SECS: f64 = 3.0;

impl AlgebraApp {
    /// Añadir paso y comprobar solución esperan a que no haya ediciones
    /// pendientes ni operaciones estructurales en vuelo.
    fn structure_idle(&self) -> bool {
        !self.locked && !self.steps.any_pending_input() && !self.dispatcher.structural_in_flight()
    }

    pub fn add_step_enabled(&self) -> bool {
        self.structure_idle()
    }

    pub fn check_solution_enabled(&self) -> bool {
        self.check_solution_visible && self.structure_idle()
    }

    pub fn step_controls_enabled(&self) -> bool {
        !self.locked
    }

    pub fn delete_enabled(&self, key: StepKey) -> bool {
        match key {
            StepKey::Saved(id) => !self.locked && !self.dispatcher.is_in_flight(OpKey::DeleteStep(id)),
            StepKey::Unsaved => false,
        }
    }

    pub fn help_enabled(&self, key: StepKey, side: Side) -> bool {
        !self.locked
            && self
                .steps
                .get(key)
                .is_some_and(|step| !step.help_cooldown[side.index()].is_active(self.now))
    }

    pub fn is_saving(&self) -> bool {
        self.problem == ProblemState::Creating
    }

    /// Progreso de la animación (0..1) si está en curso.
    pub fn celebration_progress(&self) -> Option<f32> {
        let started = self.celebration_started?;
        let t = (self.now - started) / CELEBRATION_SECS;
        (0.0..1.0).contains(&t).then_some(t as f32)
    }
}

use super::*;
use crate::backend::Call;
use crate::backend::wire::BadgeMarker;
use crate::chat::{CycleOutcome, PendingResponse};
use crate::dispatch::OpKey;
use crate::model::BadgeColor;

impl AlgebraApp {
    /// Envía lo escrito en la calculadora. `from_enter` aplica el límite de
    /// longitud del atajo de teclado.
    pub fn submit_user_message(&mut self, from_enter: bool) {
        let max_len = self.config.max_chat_message_len;
        let Some(message) = self.chat.take_composer(from_enter, max_len) else {
            return;
        };
        match self.problem {
            ProblemState::Saved(_) => self.get_response(message, ResponseCaller::SubmitUserMessage),
            _ => self.ensure_problem_then(AfterSave::Chat(message, ResponseCaller::SubmitUserMessage)),
        }
    }

    /// Pide una respuesta; si hay un ciclo en marcha, espera su turno.
    pub fn get_response(&mut self, message: String, caller: ResponseCaller) {
        if let Some(pending) = self.chat.start_or_queue(message, caller) {
            self.submit_chat(pending);
        }
    }

    fn submit_chat(&mut self, pending: PendingResponse) {
        log::debug!("calculadora: {} ({})", pending.message, pending.caller.as_str());
        self.dispatcher.submit(
            OpKey::Chat,
            Call::ChatResponse {
                sandbox: self.config.sandbox.clone(),
                problem: self.problem.id(),
                message: pending.message,
                caller: pending.caller,
            },
        );
    }

    pub(crate) fn chat_failed(&mut self, reason: String) {
        if let Some(next) = self.chat.response_failed(reason) {
            self.submit_chat(next);
        }
    }

    /// Última burbuja mostrada: marcadores, fin del problema y siguiente ciclo.
    pub(crate) fn finish_response_cycle(&mut self, outcome: CycleOutcome) {
        if let Some(marker) = outcome.badge {
            self.apply_badge_marker(marker);
        }
        if outcome.finished {
            self.lock_everything(true);
        }
        if let Some(next) = self.chat.next_cycle() {
            self.submit_chat(next);
        }
    }

    fn apply_badge_marker(&mut self, marker: BadgeMarker) {
        let Some(step) = self.steps.get_mut(StepKey::Saved(marker.step_id)) else {
            log::debug!("marcador para un paso que ya no existe: {}", marker.step_id);
            return;
        };
        let badge = &mut step.expr_mut(marker.side).badge;
        badge.count = marker.count;
        if marker.danger {
            badge.color = BadgeColor::Danger;
        }
    }
}

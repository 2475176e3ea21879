// src/chat.rs
//
// Panel de la calculadora: historial de mensajes y ciclos de respuesta. Solo
// hay un ciclo activo a la vez; las peticiones que llegan mientras tanto se
// encolan y arrancan en orden al terminar el actual.

use crate::backend::wire::{BadgeMarker, ChatHistoryEntry, ChatReply, ReplyBubble};
use crate::latex_utils::accepts_chat_message;
use crate::model::ResponseCaller;
use crate::timing::RevealSchedule;
use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq)]
pub struct PendingResponse {
    pub message: String,
    pub caller: ResponseCaller,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResponseState {
    /// Esperando al servidor.
    Loading,
    Revealing(RevealSchedule),
    Done,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResponseCycle {
    pub bubbles: Vec<ReplyBubble>,
    pub badge: Option<BadgeMarker>,
    pub finished: bool,
    pub state: ResponseState,
}

impl ResponseCycle {
    fn loading() -> Self {
        Self {
            bubbles: Vec::new(),
            badge: None,
            finished: false,
            state: ResponseState::Loading,
        }
    }

    fn restored(bubbles: Vec<ReplyBubble>) -> Self {
        Self {
            bubbles,
            badge: None,
            finished: false,
            state: ResponseState::Done,
        }
    }

    /// Burbujas con contenido visible.
    pub fn revealed(&self, now: f64) -> usize {
        match &self.state {
            ResponseState::Loading | ResponseState::Failed(_) => 0,
            ResponseState::Revealing(schedule) => schedule.revealed_at(now),
            ResponseState::Done => self.bubbles.len(),
        }
    }

    /// Burbuja que se muestra "escribiendo" (la siguiente a las visibles).
    pub fn typing_index(&self, now: f64) -> Option<usize> {
        match &self.state {
            ResponseState::Loading => Some(0),
            ResponseState::Revealing(_) => {
                let revealed = self.revealed(now);
                (revealed < self.bubbles.len()).then_some(revealed)
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChatEntry {
    User(String),
    Response(ResponseCycle),
}

/// Lo que hay que aplicar al terminar un ciclo.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CycleOutcome {
    pub badge: Option<BadgeMarker>,
    pub finished: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatPanel {
    pub composer: String,
    pub entries: Vec<ChatEntry>,
    queue: VecDeque<PendingResponse>,
    active: Option<usize>,
    submit_locked: bool,
}

impl ChatPanel {
    pub fn submit_enabled(&self) -> bool {
        !self.submit_locked
    }

    pub fn has_active_cycle(&self) -> bool {
        self.active.is_some()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Toma el mensaje del compositor. Con `from_enter` aplica el límite de
    /// longitud; el botón solo exige que no esté vacío.
    pub fn take_composer(&mut self, from_enter: bool, max_len: usize) -> Option<String> {
        if self.submit_locked {
            return None;
        }
        let message = self.composer.trim().to_string();
        let accepted = if from_enter {
            accepts_chat_message(&message, max_len)
        } else {
            !message.is_empty()
        };
        if !accepted {
            return None;
        }
        self.composer.clear();
        self.submit_locked = true;
        self.entries.push(ChatEntry::User(message.clone()));
        Some(message)
    }

    /// Arranca un ciclo si no hay ninguno; si lo hay, lo encola.
    pub fn start_or_queue(&mut self, message: String, caller: ResponseCaller) -> Option<PendingResponse> {
        let pending = PendingResponse { message, caller };
        if self.active.is_some() {
            self.queue.push_back(pending);
            return None;
        }
        self.begin(pending)
    }

    fn begin(&mut self, pending: PendingResponse) -> Option<PendingResponse> {
        if pending.caller == ResponseCaller::SubmitUserMessage {
            self.submit_locked = true;
        }
        self.entries.push(ChatEntry::Response(ResponseCycle::loading()));
        self.active = Some(self.entries.len() - 1);
        Some(pending)
    }

    fn active_cycle_mut(&mut self) -> Option<&mut ResponseCycle> {
        let idx = self.active?;
        match self.entries.get_mut(idx) {
            Some(ChatEntry::Response(cycle)) => Some(cycle),
            _ => None,
        }
    }

    pub fn response_arrived(&mut self, reply: ChatReply, now: f64, interval: f64, settle: f64) {
        let Some(cycle) = self.active_cycle_mut() else {
            log::warn!("respuesta de chat sin ciclo activo");
            return;
        };
        let schedule = RevealSchedule::new(now, interval, settle, reply.bubbles.len());
        cycle.bubbles = reply.bubbles;
        cycle.badge = reply.badge;
        cycle.finished = reply.finished;
        cycle.state = ResponseState::Revealing(schedule);
    }

    /// El ciclo activo falla: se cierra en el acto y el botón vuelve.
    pub fn response_failed(&mut self, reason: String) -> Option<PendingResponse> {
        if let Some(cycle) = self.active_cycle_mut() {
            cycle.state = ResponseState::Failed(reason);
        }
        self.active = None;
        self.next_cycle()
    }

    /// Avanza el ciclo activo. Devuelve los marcadores cuando termina.
    pub fn tick(&mut self, now: f64) -> Option<CycleOutcome> {
        let cycle = self.active_cycle_mut()?;
        let ResponseState::Revealing(schedule) = &cycle.state else {
            return None;
        };
        if !schedule.is_finished(now) {
            return None;
        }
        cycle.state = ResponseState::Done;
        let outcome = CycleOutcome {
            badge: cycle.badge,
            finished: cycle.finished,
        };
        self.active = None;
        Some(outcome)
    }

    /// Siguiente ciclo en cola, ya arrancado. Sin cola, libera el envío.
    pub fn next_cycle(&mut self) -> Option<PendingResponse> {
        if self.active.is_some() {
            return None;
        }
        match self.queue.pop_front() {
            Some(pending) => self.begin(pending),
            None => {
                self.submit_locked = false;
                None
            }
        }
    }

    /// Próximo instante de cambio del ciclo activo.
    pub fn next_event(&self, now: f64) -> Option<f64> {
        let idx = self.active?;
        match self.entries.get(idx) {
            Some(ChatEntry::Response(ResponseCycle {
                state: ResponseState::Revealing(schedule),
                ..
            })) => schedule.next_event(now),
            _ => None,
        }
    }

    /// Historial de un problema abierto: todo visible.
    pub fn restore(&mut self, history: &[ChatHistoryEntry]) {
        self.entries.clear();
        for entry in history {
            if let Some(user) = &entry.user {
                self.entries.push(ChatEntry::User(user.clone()));
            }
            if !entry.bubbles.is_empty() {
                self.entries
                    .push(ChatEntry::Response(ResponseCycle::restored(entry.bubbles.clone())));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::wire::MessagePart;

    fn reply(parts: usize) -> ChatReply {
        ChatReply {
            bubbles: (0..parts)
                .map(|i| ReplyBubble {
                    parts: vec![MessagePart::Text(format!("part {i}"))],
                    timestamp: format!("10:0{i}"),
                })
                .collect(),
            badge: None,
            finished: false,
        }
    }

    fn cycle(panel: &ChatPanel) -> &ResponseCycle {
        match panel.entries.last() {
            Some(ChatEntry::Response(cycle)) => cycle,
            other => panic!("se esperaba respuesta, hay {other:?}"),
        }
    }

    #[test]
    fn three_part_reply_reveals_on_interval_then_unlocks() {
        let mut panel = ChatPanel {
            composer: "2+2".into(),
            ..ChatPanel::default()
        };
        let message = panel.take_composer(false, 250).expect("mensaje");
        assert!(!panel.submit_enabled());
        let pending = panel.start_or_queue(message, ResponseCaller::SubmitUserMessage);
        assert!(pending.is_some());

        panel.response_arrived(reply(3), 0.0, 4.5, 0.1);
        assert_eq!(cycle(&panel).revealed(1.0), 0);
        assert_eq!(cycle(&panel).typing_index(1.0), Some(0));
        assert_eq!(cycle(&panel).revealed(4.5), 1);
        assert_eq!(cycle(&panel).revealed(9.0), 2);
        assert_eq!(panel.tick(9.0), None);
        assert!(!panel.submit_enabled());
        assert_eq!(cycle(&panel).revealed(13.5), 3);
        assert_eq!(cycle(&panel).typing_index(13.5), None);
        assert_eq!(panel.tick(13.5), None);
        assert!(!panel.submit_enabled());

        let outcome = panel.tick(13.7).expect("ciclo terminado");
        assert!(!outcome.finished);
        assert_eq!(panel.next_cycle(), None);
        assert!(panel.submit_enabled());
        assert_eq!(cycle(&panel).revealed(100.0), 3);
    }

    #[test]
    fn enter_respects_length_limit_but_button_does_not() {
        let mut panel = ChatPanel {
            composer: "1".repeat(300),
            ..ChatPanel::default()
        };
        assert_eq!(panel.take_composer(true, 250), None);
        assert!(panel.submit_enabled());
        assert!(panel.take_composer(false, 250).is_some());
        assert!(panel.composer.is_empty());
    }

    #[test]
    fn empty_composer_is_ignored() {
        let mut panel = ChatPanel::default();
        assert_eq!(panel.take_composer(false, 250), None);
        assert!(panel.entries.is_empty());
    }

    #[test]
    fn second_request_waits_for_the_first_cycle() {
        let mut panel = ChatPanel::default();
        assert!(panel
            .start_or_queue("start-check-solution".into(), ResponseCaller::CheckSolutionClick)
            .is_some());
        assert!(panel
            .start_or_queue("stop-check-rewrite".into(), ResponseCaller::DeleteStep)
            .is_none());
        assert_eq!(panel.queued(), 1);

        panel.response_arrived(reply(1), 0.0, 1.0, 0.1);
        assert!(panel.tick(1.2).is_some());
        let next = panel.next_cycle().expect("siguiente en cola");
        assert_eq!(next.message, "stop-check-rewrite");
        assert!(panel.has_active_cycle());
    }

    #[test]
    fn failure_closes_cycle_and_unlocks() {
        let mut panel = ChatPanel {
            composer: "x".into(),
            ..ChatPanel::default()
        };
        let message = panel.take_composer(false, 250).expect("mensaje");
        panel.start_or_queue(message, ResponseCaller::SubmitUserMessage);
        assert_eq!(panel.response_failed("timeout".into()), None);
        assert!(panel.submit_enabled());
        assert!(matches!(cycle(&panel).state, ResponseState::Failed(_)));
    }

    #[test]
    fn restored_history_is_fully_visible() {
        let mut panel = ChatPanel::default();
        panel.restore(&[ChatHistoryEntry {
            user: Some("1+1".into()),
            bubbles: reply(2).bubbles,
        }]);
        assert_eq!(panel.entries.len(), 2);
        assert_eq!(cycle(&panel).revealed(0.0), 2);
        assert!(!panel.has_active_cycle());
    }
}

// Servidor en memoria para los tests: registra cada llamada y responde con
// lo que devuelva el closure configurado.

use super::wire::*;
use super::{Backend, Call, Reply};
use crate::error::BackendError;
use std::cell::RefCell;
use std::rc::Rc;

type Responder = dyn Fn(&Call) -> Result<Reply, BackendError>;

#[derive(Clone)]
pub struct MockBackend {
    calls: Rc<RefCell<Vec<Call>>>,
    responder: Rc<RefCell<Box<Responder>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(default_reply)
    }
}

impl MockBackend {
    pub fn new(responder: impl Fn(&Call) -> Result<Reply, BackendError> + 'static) -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
            responder: Rc::new(RefCell::new(Box::new(responder))),
        }
    }

    pub fn respond_with(&self, responder: impl Fn(&Call) -> Result<Reply, BackendError> + 'static) {
        *self.responder.borrow_mut() = Box::new(responder);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl Backend for MockBackend {
    fn call(&self, call: &Call) -> Result<Reply, BackendError> {
        self.calls.borrow_mut().push(call.clone());
        (**self.responder.borrow())(call)
    }
}

/// Respuestas neutras para cada llamada.
pub fn default_reply(call: &Call) -> Result<Reply, BackendError> {
    let reply = match call {
        Call::SaveNewProblem => Reply::SavedProblem(SavedProblem {
            problem_id: 100,
            step_id: 500,
        }),
        Call::StartNewStep => Reply::StepFragment(StepFragment {
            prompt: "What do you need to do before you start?".into(),
            ..StepFragment::default()
        }),
        Call::NewStep { step, .. } => Reply::StepFragment(StepFragment {
            step_id: Some(*step),
            prompt: "What are you going to do next?".into(),
            ..StepFragment::default()
        }),
        Call::LoadProblem { problem } => Reply::Problem(ProblemFragment {
            problem_id: *problem,
            finished: false,
            selected_variable: None,
            variable_options: vec![],
            steps: vec![],
            chat: vec![],
        }),
        Call::UpdateStepType { .. } => Reply::StepType(StepTypeUpdate::default()),
        Call::UpdateExpression { .. } => Reply::Expression(ExpressionUpdate::default()),
        Call::UpdateVariable { .. } => Reply::Mistakes(MistakesOnly::default()),
        Call::AttemptNewStep { .. } => Reply::AttemptNewStep(AttemptNewStep {
            next_action: NextAction::Append,
            new_step_id: Some(600),
        }),
        Call::DeleteStep { .. } => Reply::DeleteStep(DeleteStepUpdate::default()),
        Call::HelpClick { .. } => Reply::Ack,
        Call::ChatResponse { .. } => Reply::Chat(ChatReply {
            bubbles: vec![ReplyBubble {
                parts: vec![MessagePart::Text("ok".into())],
                timestamp: "now".into(),
            }],
            badge: None,
            finished: false,
        }),
        Call::RecentPagination { .. } => Reply::Pagination(PaginationFragment {
            page_count: 3,
            page_size_options: vec![10, 20, 50],
        }),
        Call::RecentBody { .. } => Reply::RecentBody(RecentBody { rows: vec![] }),
    };
    Ok(reply)
}

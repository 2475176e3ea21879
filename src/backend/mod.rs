pub mod http;
#[cfg(test)]
pub mod mock;
pub mod wire;

use crate::error::BackendError;
use crate::model::{ProblemId, ResponseCaller, Side, StepId, StepType};
use wire::*;

pub use http::HttpBackend;

/// Una llamada al servidor, con todos sus datos.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    SaveNewProblem,
    StartNewStep,
    LoadProblem { problem: ProblemId },
    UpdateStepType { step: StepId, step_type: StepType },
    UpdateExpression { step: StepId, side: Side, latex: String },
    UpdateVariable { problem: ProblemId, variable: String },
    AttemptNewStep { problem: ProblemId },
    NewStep { problem: ProblemId, step: StepId },
    DeleteStep { step: StepId },
    HelpClick { step: StepId, side: Side },
    ChatResponse {
        sandbox: String,
        problem: Option<ProblemId>,
        message: String,
        caller: ResponseCaller,
    },
    RecentPagination { params: Vec<(String, String)> },
    RecentBody { params: Vec<(String, String)> },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    SavedProblem(SavedProblem),
    StepFragment(StepFragment),
    Problem(ProblemFragment),
    StepType(StepTypeUpdate),
    Expression(ExpressionUpdate),
    Mistakes(MistakesOnly),
    AttemptNewStep(AttemptNewStep),
    DeleteStep(DeleteStepUpdate),
    Ack,
    Chat(ChatReply),
    Pagination(PaginationFragment),
    RecentBody(RecentBody),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Petición HTTP resuelta: método, ruta relativa y parámetros (query en GET,
/// formulario en POST).
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoint {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl Endpoint {
    fn get(path: impl Into<String>, params: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            params,
        }
    }

    fn post(path: impl Into<String>, params: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            params,
        }
    }

    /// Las mutaciones llevan el token CSRF.
    pub fn needs_csrf(&self) -> bool {
        self.method == Method::Post
    }
}

fn param(key: &str, value: impl ToString) -> (String, String) {
    (key.to_string(), value.to_string())
}

fn expression_side(side: Side) -> &'static str {
    match side {
        Side::Left => "left-mq-input",
        Side::Right => "right-mq-input",
    }
}

fn help_side(side: Side) -> &'static str {
    match side {
        Side::Left => "left-help-button",
        Side::Right => "right-help-button",
    }
}

impl Call {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Call::SaveNewProblem => Endpoint::get("/algebra/save-new/", vec![]),
            Call::StartNewStep => Endpoint::get("/algebra/start-new/", vec![]),
            Call::LoadProblem { problem } => {
                Endpoint::get("/algebra/load/", vec![param("problem-id", problem)])
            }
            Call::UpdateStepType { step, step_type } => Endpoint::post(
                "/algebra/update-step-type/",
                vec![param("step-id", step), param("step-type", step_type.label())],
            ),
            Call::UpdateExpression { step, side, latex } => Endpoint::post(
                "/algebra/update-expression/",
                vec![
                    param("step-id", step),
                    param("expression", latex),
                    param("side", expression_side(*side)),
                ],
            ),
            Call::UpdateVariable { problem, variable } => Endpoint::post(
                "/algebra/update-variable/",
                vec![param("problem-id", problem), param("variable", variable)],
            ),
            Call::AttemptNewStep { problem } => Endpoint::post(
                "/algebra/attempt-new-step/",
                vec![param("problem-id", problem)],
            ),
            Call::NewStep { problem, step } => Endpoint::get(
                "/algebra/new-step/",
                vec![param("problem-id", problem), param("step-id", step)],
            ),
            Call::DeleteStep { step } => {
                Endpoint::post("/algebra/delete-step/", vec![param("step-id", step)])
            }
            Call::HelpClick { step, side } => Endpoint::post(
                "/algebra/update-help-click/",
                vec![param("step-id", step), param("side", help_side(*side))],
            ),
            Call::ChatResponse {
                sandbox,
                problem,
                message,
                caller,
            } => Endpoint::get(
                "/calculator/get-response/",
                vec![
                    param("sandbox", sandbox),
                    param("problem_id", problem.map(|p| p.to_string()).unwrap_or_default()),
                    param("message", message),
                    param("caller", caller.as_str()),
                ],
            ),
            Call::RecentPagination { params } | Call::RecentBody { params } => {
                Endpoint::get("/algebra/recent-table/", params.clone())
            }
        }
    }

    /// Interpreta el cuerpo de la respuesta según la llamada.
    pub fn decode(&self, body: &str) -> Result<Reply, BackendError> {
        let reply = match self {
            Call::SaveNewProblem => Reply::SavedProblem(serde_json::from_str(body)?),
            Call::StartNewStep | Call::NewStep { .. } => {
                Reply::StepFragment(serde_json::from_str(body)?)
            }
            Call::LoadProblem { .. } => Reply::Problem(serde_json::from_str(body)?),
            Call::UpdateStepType { .. } => Reply::StepType(serde_json::from_str(body)?),
            Call::UpdateExpression { .. } => Reply::Expression(serde_json::from_str(body)?),
            Call::UpdateVariable { .. } => Reply::Mistakes(serde_json::from_str(body)?),
            Call::AttemptNewStep { .. } => Reply::AttemptNewStep(serde_json::from_str(body)?),
            Call::DeleteStep { .. } => Reply::DeleteStep(serde_json::from_str(body)?),
            Call::HelpClick { .. } => Reply::Ack,
            Call::ChatResponse { .. } => Reply::Chat(serde_json::from_str(body)?),
            Call::RecentPagination { .. } => Reply::Pagination(serde_json::from_str(body)?),
            Call::RecentBody { .. } => Reply::RecentBody(serde_json::from_str(body)?),
        };
        Ok(reply)
    }
}

/// Servidor de álgebra visto desde el cliente.
pub trait Backend {
    fn call(&self, call: &Call) -> Result<Reply, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutations_are_posts_with_csrf() {
        let endpoint = Call::DeleteStep { step: 9 }.endpoint();
        assert_eq!(endpoint.method, Method::Post);
        assert!(endpoint.needs_csrf());
        assert_eq!(endpoint.params, vec![("step-id".to_string(), "9".to_string())]);
    }

    #[test]
    fn chat_endpoint_carries_caller_and_blank_problem() {
        let endpoint = Call::ChatResponse {
            sandbox: "Algebra".into(),
            problem: None,
            message: "2+2".into(),
            caller: ResponseCaller::SubmitUserMessage,
        }
        .endpoint();
        assert_eq!(endpoint.method, Method::Get);
        assert!(!endpoint.needs_csrf());
        assert!(endpoint.params.contains(&("problem_id".into(), String::new())));
        assert!(endpoint.params.contains(&("caller".into(), "SubmitUserMessage".into())));
    }

    #[test]
    fn expression_side_uses_input_class_names() {
        let endpoint = Call::UpdateExpression {
            step: 3,
            side: Side::Right,
            latex: "x+1".into(),
        }
        .endpoint();
        assert!(endpoint.params.contains(&("side".into(), "right-mq-input".into())));
    }

    #[test]
    fn help_click_replies_with_ack_regardless_of_body() {
        let call = Call::HelpClick { step: 1, side: Side::Left };
        assert_eq!(call.decode(""), Ok(Reply::Ack));
    }

    #[test]
    fn bad_json_is_a_decode_error() {
        let err = Call::SaveNewProblem.decode("<html>").unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }
}

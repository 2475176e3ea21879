// src/backend/wire.rs
//
// Formas de las respuestas del servidor. Los endpoints estructurales devuelven
// JSON; los "fragmentos" (paso nuevo, tabla, chat) llegan como documentos JSON
// que la vista pinta directamente.

use crate::model::{Badge, BadgeColor, CheckKind, HelpEntry, ProblemId, Side, StepId, StepType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ayuda por paso: `[izquierda, derecha]`.
pub type MistakesMap = BTreeMap<StepId, [HelpEntry; 2]>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedProblem {
    #[serde(rename = "unique-problem-id")]
    pub problem_id: ProblemId,
    #[serde(rename = "unique-step-id")]
    pub step_id: StepId,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepFragment {
    #[serde(default)]
    pub step_id: Option<StepId>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub step_type: StepType,
    #[serde(default)]
    pub left: String,
    #[serde(default)]
    pub right: String,
    #[serde(default)]
    pub badges: [Badge; 2],
    #[serde(default)]
    pub help: Option<[HelpEntry; 2]>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatHistoryEntry {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bubbles: Vec<ReplyBubble>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProblemFragment {
    pub problem_id: ProblemId,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub selected_variable: Option<String>,
    #[serde(default)]
    pub variable_options: Vec<String>,
    pub steps: Vec<StepFragment>,
    #[serde(default)]
    pub chat: Vec<ChatHistoryEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepTypeUpdate {
    #[serde(default)]
    pub mistakes: MistakesMap,
    #[serde(default)]
    pub selected_variable: Option<String>,
    #[serde(default)]
    pub variable_options: Vec<String>,
    #[serde(default)]
    pub stop_check_rewrite: bool,
    #[serde(default)]
    pub stop_check_solution: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeUpdate {
    pub count: u32,
    pub color: BadgeColor,
}

impl From<BadgeUpdate> for Badge {
    fn from(update: BadgeUpdate) -> Self {
        Badge {
            count: update.count,
            color: update.color,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpressionUpdate {
    #[serde(default)]
    pub mistakes: MistakesMap,
    #[serde(default)]
    pub badge_updates: BTreeMap<StepId, BadgeUpdate>,
    #[serde(default)]
    pub selected_variable: Option<String>,
    #[serde(default)]
    pub variable_options: Vec<String>,
    #[serde(default)]
    pub variable_isolated: Option<String>,
    #[serde(default)]
    pub stop_check: Option<String>,
}

impl ExpressionUpdate {
    pub fn isolated_side(&self) -> Option<Side> {
        parse_side(self.variable_isolated.as_deref())
    }

    pub fn stop_check(&self) -> Option<CheckKind> {
        parse_check(self.stop_check.as_deref())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MistakesOnly {
    #[serde(default)]
    pub mistakes: MistakesMap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NextAction {
    Append,
    Alert,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttemptNewStep {
    pub next_action: NextAction,
    #[serde(default)]
    pub new_step_id: Option<StepId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteStepUpdate {
    #[serde(default)]
    pub mistakes: MistakesMap,
    #[serde(default)]
    pub stop_check: Option<String>,
}

impl DeleteStepUpdate {
    pub fn stop_check(&self) -> Option<CheckKind> {
        parse_check(self.stop_check.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MessagePart {
    Text(String),
    Latex(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyBubble {
    pub parts: Vec<MessagePart>,
    #[serde(default)]
    pub timestamp: String,
}

/// Marcadores embebidos al final de una respuesta del chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeMarker {
    pub step_id: StepId,
    pub side: Side,
    pub count: u32,
    #[serde(default)]
    pub danger: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub bubbles: Vec<ReplyBubble>,
    #[serde(default)]
    pub badge: Option<BadgeMarker>,
    #[serde(default)]
    pub finished: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationFragment {
    pub page_count: usize,
    #[serde(default)]
    pub page_size_options: Vec<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentRow {
    pub problem_id: ProblemId,
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
    pub step_count: u32,
    #[serde(default)]
    pub last_viewed: String,
    #[serde(default)]
    pub started: String,
    #[serde(default)]
    pub solved: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentBody {
    pub rows: Vec<RecentRow>,
}

fn parse_side(value: Option<&str>) -> Option<Side> {
    match value {
        Some("left") => Some(Side::Left),
        Some("right") => Some(Side::Right),
        _ => None,
    }
}

fn parse_check(value: Option<&str>) -> Option<CheckKind> {
    match value {
        Some("rewrite") => Some(CheckKind::Rewrite),
        Some("solution") => Some(CheckKind::Solution),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_update_decodes_server_shape() {
        let body = r#"{
            "mistakes": {"12": [{"title": "None", "content": "ok"}, {"title": "Blank", "content": "type"}]},
            "badge_updates": {"12": {"count": 2, "color": "danger"}},
            "selected_variable": "x",
            "variable_options": ["x", "y"],
            "variable_isolated": "left",
            "stop_check": ""
        }"#;
        let update: ExpressionUpdate = serde_json::from_str(body).expect("json válido");
        assert_eq!(update.mistakes[&12][1].title, "Blank");
        assert_eq!(update.badge_updates[&12].color, BadgeColor::Danger);
        assert_eq!(update.isolated_side(), Some(Side::Left));
        assert_eq!(update.stop_check(), None);
    }

    #[test]
    fn saved_problem_uses_dashed_keys() {
        let saved: SavedProblem =
            serde_json::from_str(r#"{"unique-problem-id": 7, "unique-step-id": 31}"#).expect("json");
        assert_eq!(saved.problem_id, 7);
        assert_eq!(saved.step_id, 31);
    }

    #[test]
    fn chat_reply_with_markers() {
        let body = r#"{
            "bubbles": [
                {"parts": [{"kind": "text", "value": "Let's check"}], "timestamp": "10:01"},
                {"parts": [{"kind": "latex", "value": "x=2"}]}
            ],
            "badge": {"step_id": 4, "side": "right", "count": 1, "danger": true},
            "finished": true
        }"#;
        let reply: ChatReply = serde_json::from_str(body).expect("json");
        assert_eq!(reply.bubbles.len(), 2);
        assert_eq!(reply.bubbles[1].timestamp, "");
        assert_eq!(reply.badge.map(|b| b.side), Some(Side::Right));
        assert!(reply.finished);
    }

    #[test]
    fn step_type_accepts_server_values() {
        let fragment: StepFragment =
            serde_json::from_str(r#"{"step_type": "rewrite", "left": "x", "right": "2"}"#).expect("json");
        assert_eq!(fragment.step_type, StepType::Rewrite);
        let fragment: StepFragment = serde_json::from_str(r#"{"step_type": "none"}"#).expect("json");
        assert_eq!(fragment.step_type, StepType::Undefined);
    }
}

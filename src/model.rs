use serde::{Deserialize, Serialize};
use std::fmt;

pub type ProblemId = u64;
pub type StepId = u64;

/// Identificador de un paso en pantalla. Un problema nuevo empieza con un
/// único paso sin guardar hasta que el servidor asigna ids reales.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKey {
    Unsaved,
    Saved(StepId),
}

impl StepKey {
    pub fn id(self) -> Option<StepId> {
        match self {
            StepKey::Unsaved => None,
            StepKey::Saved(id) => Some(id),
        }
    }

    pub fn is_saved(self) -> bool {
        matches!(self, StepKey::Saved(_))
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKey::Unsaved => write!(f, "step0"),
            StepKey::Saved(id) => write!(f, "step{id}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    #[default]
    #[serde(alias = "none")]
    Undefined,
    Define,
    Rewrite,
    Delete,
}

impl StepType {
    pub const SELECTABLE: [StepType; 3] = [StepType::Define, StepType::Rewrite, StepType::Delete];

    /// Etiqueta que espera el servidor (y que se muestra en el selector).
    pub fn label(self) -> &'static str {
        match self {
            StepType::Undefined => "---",
            StepType::Define => "Define Equation",
            StepType::Rewrite => "Rewrite",
            StepType::Delete => "Delete",
        }
    }

    pub fn shows_delete(self) -> bool {
        self == StepType::Delete
    }

    pub fn shows_rewrite_checks(self) -> bool {
        self == StepType::Rewrite
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    #[default]
    Info,
    Danger,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub count: u32,
    pub color: BadgeColor,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpEntry {
    pub title: String,
    pub content: String,
}

impl HelpEntry {
    pub fn new(title: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    pub fn define_equation() -> Self {
        Self::new(
            "Define the Equation",
            "Use the dropdown in the first step to define an equation.",
        )
    }

    pub fn blank_step() -> Self {
        Self::new(
            "Define the Expression",
            "This is blank. Type in math expressions to define an equation!",
        )
    }
}

/// Estado del problema en la sesión.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ProblemState {
    #[default]
    Unsaved,
    Creating,
    Saved(ProblemId),
}

impl ProblemState {
    pub fn id(&self) -> Option<ProblemId> {
        match self {
            ProblemState::Saved(id) => Some(*id),
            _ => None,
        }
    }
}

/// Resultado de pedir que el problema exista.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Created { problem: ProblemId, first_step: StepId },
    AlreadySaved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseCaller {
    SubmitUserMessage,
    InitializeNewStep,
    CheckSolutionClick,
    StepTypeChanged,
    ExpressionChanged,
    DeleteStep,
}

impl ResponseCaller {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseCaller::SubmitUserMessage => "SubmitUserMessage",
            ResponseCaller::InitializeNewStep => "InitializeNewStep",
            ResponseCaller::CheckSolutionClick => "CheckSolutionClick",
            ResponseCaller::StepTypeChanged => "StepTypeChanged",
            ResponseCaller::ExpressionChanged => "ExpressionChanged",
            ResponseCaller::DeleteStep => "DeleteStep",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Rewrite,
    Solution,
}

impl CheckKind {
    pub fn stop_message(self) -> &'static str {
        match self {
            CheckKind::Rewrite => "stop-check-rewrite",
            CheckKind::Solution => "stop-check-solution",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    All,
    Solved,
    Unsolved,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Solved => "solved",
            StatusFilter::Unsolved => "unsolved",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortColumn {
    StepCount,
    LastViewed,
    StartDate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::new(SortColumn::StepCount, SortDirection::Up),
        SortKey::new(SortColumn::StepCount, SortDirection::Down),
        SortKey::new(SortColumn::LastViewed, SortDirection::Up),
        SortKey::new(SortColumn::LastViewed, SortDirection::Down),
        SortKey::new(SortColumn::StartDate, SortDirection::Up),
        SortKey::new(SortColumn::StartDate, SortDirection::Down),
    ];

    pub const fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Id de columna que entiende el servidor (`order_by`).
    pub fn order_by(self) -> &'static str {
        match (self.column, self.direction) {
            (SortColumn::StepCount, SortDirection::Up) => "step-count-up",
            (SortColumn::StepCount, SortDirection::Down) => "step-count-down",
            (SortColumn::LastViewed, SortDirection::Up) => "last-viewed-up",
            (SortColumn::LastViewed, SortDirection::Down) => "last-viewed-down",
            (SortColumn::StartDate, SortDirection::Up) => "start-date-up",
            (SortColumn::StartDate, SortDirection::Down) => "start-date-down",
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::new(SortColumn::LastViewed, SortDirection::Down)
    }
}

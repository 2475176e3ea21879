use crate::backend::HttpBackend;
use crate::chat::ChatPanel;
use crate::config::{ClientConfig, initial_problem};
use crate::dispatch::Dispatcher;
use crate::model::{
    HelpEntry, ProblemId, ProblemState, ResponseCaller, Side, StepId, StepKey, StepType,
};
use crate::recent::{RecentFilter, RecentTable};
use crate::steps::{Step, StepList};
use serde::{Deserialize, Serialize};

// Submódulos
pub mod actions;
pub mod calculator;
pub mod completion;
pub mod navigation;
pub mod queries;
pub mod recent_table;
pub mod view_models;


// Re-export de view models
pub use crate::view_models::{PageButton, RecentRowView, StepView};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum Tab {
    #[default]
    Problem,
    Recent,
}

/// Lo que queda por hacer cuando el problema recién creado tenga id.
#[derive(Clone, Debug, PartialEq)]
pub enum AfterSave {
    StepType(StepType),
    Expression(Side, String),
    Chat(String, ResponseCaller),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariableMenu {
    pub selected: Option<String>,
    pub options: Vec<String>,
}

impl VariableMenu {
    /// La respuesta a la primera expresión trae el menú completo, aunque
    /// venga vacío.
    pub fn replace(&mut self, selected: Option<String>, options: Vec<String>) {
        self.selected = selected;
        self.options = options;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HelpPopup {
    pub step: StepKey,
    pub side: Side,
    pub entry: HelpEntry,
}

/// Lo que se guarda entre sesiones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub recent_filter: RecentFilter,
    pub dark_mode: bool,
    #[serde(default)]
    pub tab: Tab,
}

impl Preferences {
    /// Primera ejecución: el tamaño de página sale de la configuración.
    pub fn for_config(config: &ClientConfig) -> Self {
        Self {
            recent_filter: RecentFilter::with_page_size(config.default_page_size),
            dark_mode: true,
            tab: Tab::Problem,
        }
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::for_config(&ClientConfig::default())
    }
}

pub struct AlgebraApp {
    pub config: ClientConfig,
    pub dispatcher: Dispatcher,
    pub tab: Tab,
    pub problem: ProblemState,
    pending_after_save: Vec<AfterSave>,
    pub steps: StepList,
    pub variable: VariableMenu,
    pub check_solution_visible: bool,
    /// Problema terminado: todo deshabilitado hasta cambiar de problema.
    pub locked: bool,
    pub celebration_started: Option<f64>,
    pub chat: ChatPanel,
    pub recent: RecentTable,
    /// Línea de estado (errores y avisos).
    pub message: String,
    pub now: f64,
    pub route: String,
    pub help_popup: Option<HelpPopup>,
    pub dark_mode: bool,
}

impl AlgebraApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = ClientConfig::load();
        let prefs: Preferences = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_else(|| Preferences::for_config(&config));
        log::info!("backend en {}", config.backend_url);

        let backend = HttpBackend::new(&config);
        #[cfg(not(target_arch = "wasm32"))]
        let mut dispatcher = Dispatcher::threaded(backend);
        #[cfg(target_arch = "wasm32")]
        let mut dispatcher = Dispatcher::fetch(backend);
        dispatcher.set_repaint(cc.egui_ctx.clone());

        cc.egui_ctx.set_visuals(if prefs.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        let mut app = Self::with_dispatcher(config, dispatcher, prefs);
        app.start(initial_problem());
        app
    }

    /// Estado inicial sin ninguna petición lanzada.
    pub fn with_dispatcher(config: ClientConfig, dispatcher: Dispatcher, prefs: Preferences) -> Self {
        let recent = RecentTable::new(
            prefs.recent_filter,
            config.page_size_options.clone(),
            config.filter_debounce_secs(),
        );
        Self {
            dispatcher,
            tab: prefs.tab,
            problem: ProblemState::Unsaved,
            pending_after_save: Vec::new(),
            steps: StepList::default(),
            variable: VariableMenu::default(),
            check_solution_visible: false,
            locked: false,
            celebration_started: None,
            chat: ChatPanel::default(),
            recent,
            message: String::new(),
            now: 0.0,
            route: "/algebra/".into(),
            help_popup: None,
            dark_mode: prefs.dark_mode,
            config,
        }
    }

    pub fn start(&mut self, problem: Option<ProblemId>) {
        match problem {
            Some(id) => self.open_problem(id),
            None => self.new_blank_problem(),
        }
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            recent_filter: self.recent.filter.clone(),
            dark_mode: self.dark_mode,
            tab: self.tab,
        }
    }

    fn new_step(&self, key: StepKey, help: HelpEntry) -> Step {
        Step::new(key, help, self.config.debounce_secs())
    }

    /// Un frame: respuestas, expresiones confirmadas, chat y buscador.
    pub fn tick(&mut self, now: f64) {
        self.now = now;

        for completion in self.dispatcher.poll() {
            self.handle_completion(completion);
        }

        if self.locked {
            self.steps.cancel_all_inputs();
        } else {
            let sentinel = self.config.sentinel.clone();
            for (key, side, latex) in self.steps.take_commits(now, &sentinel) {
                self.expression_changed(key, side, latex);
            }
        }

        if let Some(outcome) = self.chat.tick(now) {
            self.finish_response_cycle(outcome);
        }

        if self.recent.poll_equation(now, &self.config.sentinel) {
            self.change_filter();
        }
    }

    /// Próximo instante en el que algo cambia sin intervención del usuario.
    pub fn next_wakeup(&self) -> Option<f64> {
        let mut wake: Option<f64> = self.chat.next_event(self.now);
        let mut consider = |t: f64| {
            wake = Some(wake.map_or(t, |w| w.min(t)));
        };
        for step in self.steps.iter() {
            for expr in &step.exprs {
                if let Some(remaining) = expr.remaining(self.now) {
                    consider(self.now + remaining);
                }
            }
        }
        if let Some(remaining) = self.recent.equation_remaining(self.now) {
            consider(self.now + remaining);
        }
        wake
    }
}

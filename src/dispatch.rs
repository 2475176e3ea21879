// src/dispatch.rs
//
// Ejecución de llamadas fuera del hilo de la UI. Cada llamada lleva un ticket
// con la operación y su generación: una respuesta cuya generación ya no es la
// última para esa operación se descarta.

use crate::backend::{Backend, Call, Reply};
use crate::error::BackendError;
use crate::model::{Side, StepId};
use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender, channel};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKey {
    SaveProblem,
    StartNew,
    LoadProblem,
    StepType(StepId),
    Expression(StepId, Side),
    Variable,
    AddStep,
    NewStep(StepId),
    DeleteStep(StepId),
    HelpClick(StepId, Side),
    Chat,
    RecentPagination,
    RecentBody,
}

impl OpKey {
    /// Operaciones que cambian la estructura del problema. Mientras alguna
    /// está en vuelo, "añadir paso" y "comprobar solución" no se pueden usar.
    pub fn is_structural(self) -> bool {
        !matches!(
            self,
            OpKey::Chat | OpKey::HelpClick(..) | OpKey::RecentPagination | OpKey::RecentBody
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub key: OpKey,
    pub generation: u64,
    epoch: u64,
}

#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub call: Call,
    pub result: Result<Reply, BackendError>,
}

enum Runner {
    /// Ejecuta en el acto; la respuesta se entrega en el siguiente `poll`.
    Inline(Box<dyn Backend>),
    #[cfg(not(target_arch = "wasm32"))]
    Threaded(std::sync::Arc<dyn Backend + Send + Sync>),
    #[cfg(target_arch = "wasm32")]
    Fetch(std::rc::Rc<crate::backend::HttpBackend>),
}

pub struct Dispatcher {
    runner: Runner,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    generations: HashMap<OpKey, u64>,
    in_flight: HashMap<OpKey, usize>,
    epoch: u64,
    repaint: Option<egui::Context>,
}

impl Dispatcher {
    fn with_runner(runner: Runner) -> Self {
        let (tx, rx) = channel();
        Self {
            runner,
            tx,
            rx,
            generations: HashMap::new(),
            in_flight: HashMap::new(),
            epoch: 0,
            repaint: None,
        }
    }

    pub fn inline(backend: impl Backend + 'static) -> Self {
        Self::with_runner(Runner::Inline(Box::new(backend)))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn threaded(backend: impl Backend + Send + Sync + 'static) -> Self {
        Self::with_runner(Runner::Threaded(std::sync::Arc::new(backend)))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn fetch(backend: crate::backend::HttpBackend) -> Self {
        Self::with_runner(Runner::Fetch(std::rc::Rc::new(backend)))
    }

    /// Pide repintado cuando llega una respuesta desde otro hilo.
    pub fn set_repaint(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    pub fn submit(&mut self, key: OpKey, call: Call) -> Ticket {
        let generation = {
            let g = self.generations.entry(key).or_insert(0);
            *g += 1;
            *g
        };
        *self.in_flight.entry(key).or_insert(0) += 1;
        let ticket = Ticket {
            key,
            generation,
            epoch: self.epoch,
        };
        log::debug!("submit {key:?} gen {generation}");

        match &self.runner {
            Runner::Inline(backend) => {
                let result = backend.call(&call);
                let _ = self.tx.send(Completion {
                    ticket,
                    call,
                    result,
                });
            }
            #[cfg(not(target_arch = "wasm32"))]
            Runner::Threaded(backend) => {
                let backend = std::sync::Arc::clone(backend);
                let tx = self.tx.clone();
                let repaint = self.repaint.clone();
                std::thread::spawn(move || {
                    let result = backend.call(&call);
                    let _ = tx.send(Completion {
                        ticket,
                        call,
                        result,
                    });
                    if let Some(ctx) = repaint {
                        ctx.request_repaint();
                    }
                });
            }
            #[cfg(target_arch = "wasm32")]
            Runner::Fetch(backend) => {
                let backend = std::rc::Rc::clone(backend);
                let tx = self.tx.clone();
                let repaint = self.repaint.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let result = backend.call_async(call.clone()).await;
                    let _ = tx.send(Completion {
                        ticket,
                        call,
                        result,
                    });
                    if let Some(ctx) = repaint {
                        ctx.request_repaint();
                    }
                });
            }
        }
        ticket
    }

    /// Respuestas listas, ya sin las obsoletas.
    pub fn poll(&mut self) -> Vec<Completion> {
        let mut ready = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            let key = completion.ticket.key;
            if completion.ticket.epoch == self.epoch {
                if let Some(count) = self.in_flight.get_mut(&key) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        self.in_flight.remove(&key);
                    }
                }
            }
            if self.is_stale(&completion.ticket) {
                log::debug!(
                    "descartada respuesta obsoleta {key:?} gen {}",
                    completion.ticket.generation
                );
                continue;
            }
            ready.push(completion);
        }
        ready
    }

    pub fn is_stale(&self, ticket: &Ticket) -> bool {
        ticket.epoch != self.epoch || self.generations.get(&ticket.key) != Some(&ticket.generation)
    }

    /// Invalida todo lo que esté en vuelo (p. ej. al abrir otro problema).
    pub fn invalidate_all(&mut self) {
        self.epoch += 1;
        self.generations.clear();
        self.in_flight.clear();
    }

    pub fn is_in_flight(&self, key: OpKey) -> bool {
        self.in_flight.contains_key(&key)
    }

    pub fn any_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn structural_in_flight(&self) -> bool {
        self.in_flight.keys().any(|key| key.is_structural())
    }
}

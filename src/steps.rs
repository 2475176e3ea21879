// src/steps.rs

use crate::backend::wire::{BadgeUpdate, MistakesMap, StepFragment};
use crate::latex_utils::{contains_sentinel, normalize_expression};
use crate::model::{Badge, HelpEntry, Side, StepId, StepKey, StepType};
use crate::timing::{Cooldown, Debouncer};
use std::collections::BTreeMap;

/// Campo de expresión de un lado de un paso: texto editado, debounce y badge.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionInput {
    pub text: String,
    pub badge: Badge,
    pub focused: bool,
    debounce: Debouncer,
}

impl ExpressionInput {
    pub fn new(quiet_secs: f64) -> Self {
        Self {
            text: String::new(),
            badge: Badge::default(),
            focused: false,
            debounce: Debouncer::new(quiet_secs),
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Cada cambio reinicia la espera.
    pub fn edit(&mut self, text: String, now: f64) {
        if text == self.text {
            return;
        }
        self.text = text;
        self.debounce.restart(now);
    }

    /// Texto confirmado si venció la espera y no hay centinela.
    pub fn poll(&mut self, now: f64, sentinel: &str) -> Option<String> {
        if !self.debounce.fire(now) {
            return None;
        }
        if contains_sentinel(&self.text, sentinel) {
            log::debug!("expresión con centinela, no se envía");
            return None;
        }
        Some(normalize_expression(&self.text))
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.is_armed()
    }

    pub fn cancel(&mut self) {
        self.debounce.cancel();
    }

    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.debounce.remaining(now)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub key: StepKey,
    pub step_type: StepType,
    pub prompt: String,
    pub exprs: [ExpressionInput; 2],
    pub help: [HelpEntry; 2],
    pub help_cooldown: [Cooldown; 2],
    /// Esperando el fragmento del servidor.
    pub loading: bool,
}

impl Step {
    pub fn new(key: StepKey, help: HelpEntry, quiet_secs: f64) -> Self {
        Self {
            key,
            step_type: StepType::Undefined,
            prompt: String::new(),
            exprs: [ExpressionInput::new(quiet_secs), ExpressionInput::new(quiet_secs)],
            help: [help.clone(), help],
            help_cooldown: [Cooldown::default(), Cooldown::default()],
            loading: true,
        }
    }

    pub fn expr(&self, side: Side) -> &ExpressionInput {
        &self.exprs[side.index()]
    }

    pub fn expr_mut(&mut self, side: Side) -> &mut ExpressionInput {
        &mut self.exprs[side.index()]
    }

    pub fn is_active(&self) -> bool {
        self.exprs.iter().any(|e| e.focused)
    }

    pub fn apply_fragment(&mut self, fragment: &StepFragment) {
        self.prompt = fragment.prompt.clone();
        self.step_type = fragment.step_type;
        self.exprs[0].text = fragment.left.clone();
        self.exprs[1].text = fragment.right.clone();
        self.exprs[0].badge = fragment.badges[0];
        self.exprs[1].badge = fragment.badges[1];
        if let Some(help) = &fragment.help {
            self.help = help.clone();
        }
        self.loading = false;
    }
}

/// Lista ordenada de pasos. El número visible es la posición (1..n); los ids
/// del servidor no tienen por qué ser consecutivos.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepList {
    steps: Vec<Step>,
}

impl StepList {
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Step> {
        self.steps.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn get(&self, key: StepKey) -> Option<&Step> {
        self.steps.iter().find(|s| s.key == key)
    }

    pub fn get_mut(&mut self, key: StepKey) -> Option<&mut Step> {
        self.steps.iter_mut().find(|s| s.key == key)
    }

    pub fn first(&self) -> Option<&Step> {
        self.steps.first()
    }

    pub fn first_mut(&mut self) -> Option<&mut Step> {
        self.steps.first_mut()
    }

    pub fn is_first(&self, key: StepKey) -> bool {
        self.steps.first().is_some_and(|s| s.key == key)
    }

    /// Número visible (1-based).
    pub fn number_of(&self, key: StepKey) -> Option<usize> {
        self.steps.iter().position(|s| s.key == key).map(|i| i + 1)
    }

    pub fn remove(&mut self, key: StepKey) -> Option<Step> {
        let idx = self.steps.iter().position(|s| s.key == key)?;
        Some(self.steps.remove(idx))
    }

    /// El paso provisional pasa a tener el id asignado por el servidor.
    pub fn rekey_unsaved(&mut self, id: StepId) -> bool {
        match self.get_mut(StepKey::Unsaved) {
            Some(step) => {
                step.key = StepKey::Saved(id);
                true
            }
            None => false,
        }
    }

    /// Sustituye la ayuda de todos los pasos incluidos en el mapa.
    pub fn apply_mistakes(&mut self, mistakes: &MistakesMap) {
        for (id, help) in mistakes {
            if let Some(step) = self.get_mut(StepKey::Saved(*id)) {
                step.help = help.clone();
            }
        }
    }

    pub fn apply_badges(&mut self, side: Side, updates: &BTreeMap<StepId, BadgeUpdate>) {
        for (id, update) in updates {
            if let Some(step) = self.get_mut(StepKey::Saved(*id)) {
                step.expr_mut(side).badge = (*update).into();
            }
        }
    }

    /// Expresiones cuya espera venció en `now`, en orden de pantalla.
    pub fn take_commits(&mut self, now: f64, sentinel: &str) -> Vec<(StepKey, Side, String)> {
        let mut commits = Vec::new();
        for step in &mut self.steps {
            for side in Side::BOTH {
                if let Some(latex) = step.expr_mut(side).poll(now, sentinel) {
                    commits.push((step.key, side, latex));
                }
            }
        }
        commits
    }

    pub fn any_pending_input(&self) -> bool {
        self.steps
            .iter()
            .any(|s| s.exprs.iter().any(ExpressionInput::is_pending))
    }

    pub fn cancel_all_inputs(&mut self) {
        for step in &mut self.steps {
            for expr in &mut step.exprs {
                expr.cancel();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BadgeColor;

    const SENTINEL: &str = "randomstringnoonewillevertypeinhopefully";

    fn saved(id: StepId) -> Step {
        Step::new(StepKey::Saved(id), HelpEntry::blank_step(), 0.5)
    }

    #[test]
    fn five_quick_edits_commit_once_with_latest_text() {
        let mut input = ExpressionInput::new(0.5);
        for (i, text) in ["x", "x+", "x+1", "x+1=", "x+12"].iter().enumerate() {
            input.edit(text.to_string(), i as f64 * 0.1);
            assert_eq!(input.poll(i as f64 * 0.1, SENTINEL), None);
        }
        assert!(input.is_pending());
        assert_eq!(input.poll(0.85, SENTINEL), None);
        assert_eq!(input.poll(0.95, SENTINEL), Some("x+12".to_string()));
        assert_eq!(input.poll(5.0, SENTINEL), None);
    }

    #[test]
    fn sentinel_content_is_never_committed() {
        let mut input = ExpressionInput::new(0.5);
        input.edit(format!("x{SENTINEL}"), 0.0);
        assert_eq!(input.poll(1.0, SENTINEL), None);
        assert!(!input.is_pending());
    }

    #[test]
    fn identical_text_does_not_rearm() {
        let mut input = ExpressionInput::new(0.5).with_text("x");
        input.edit("x".into(), 0.0);
        assert!(!input.is_pending());
    }

    #[test]
    fn deleting_a_step_relabels_remaining_ones() {
        let mut list = StepList::default();
        for id in [11, 12, 13, 14, 15] {
            list.push(saved(id));
        }
        assert_eq!(list.number_of(StepKey::Saved(15)), Some(5));
        list.remove(StepKey::Saved(13));
        assert_eq!(list.len(), 4);
        assert_eq!(list.number_of(StepKey::Saved(14)), Some(3));
        assert_eq!(list.number_of(StepKey::Saved(15)), Some(4));
        assert_eq!(list.number_of(StepKey::Saved(13)), None);
    }

    #[test]
    fn rekey_keeps_help_and_text() {
        let mut list = StepList::default();
        let mut step = Step::new(StepKey::Unsaved, HelpEntry::define_equation(), 0.5);
        step.exprs[0].text = "2x".into();
        list.push(step);
        assert!(list.rekey_unsaved(77));
        let step = list.get(StepKey::Saved(77)).expect("paso renombrado");
        assert_eq!(step.exprs[0].text, "2x");
        assert_eq!(step.help[0], HelpEntry::define_equation());
        assert!(!list.rekey_unsaved(78));
    }

    #[test]
    fn mistakes_and_badges_apply_by_id() {
        let mut list = StepList::default();
        list.push(saved(1));
        list.push(saved(2));
        let mut mistakes = MistakesMap::new();
        mistakes.insert(
            2,
            [HelpEntry::new("Blank", "left"), HelpEntry::new("None", "right")],
        );
        mistakes.insert(99, [HelpEntry::default(), HelpEntry::default()]);
        list.apply_mistakes(&mistakes);
        assert_eq!(list.get(StepKey::Saved(2)).map(|s| s.help[0].title.as_str()), Some("Blank"));
        assert_eq!(list.get(StepKey::Saved(1)).map(|s| s.help[0].clone()), Some(HelpEntry::blank_step()));

        let mut badges = BTreeMap::new();
        badges.insert(1, BadgeUpdate { count: 3, color: BadgeColor::Danger });
        list.apply_badges(Side::Right, &badges);
        let badge = list.get(StepKey::Saved(1)).map(|s| s.exprs[1].badge);
        assert_eq!(badge, Some(Badge { count: 3, color: BadgeColor::Danger }));
    }

    #[test]
    fn commits_are_collected_across_steps() {
        let mut list = StepList::default();
        list.push(saved(1));
        list.push(saved(2));
        if let Some(step) = list.get_mut(StepKey::Saved(2)) {
            step.expr_mut(Side::Right).edit("y".into(), 0.0);
        }
        assert!(list.any_pending_input());
        let commits = list.take_commits(1.0, SENTINEL);
        assert_eq!(commits, vec![(StepKey::Saved(2), Side::Right, "y".to_string())]);
        assert!(!list.any_pending_input());
    }
}

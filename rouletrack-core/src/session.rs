use std::collections::BTreeMap;

use tracing::debug;

use crate::models::Outcome;
use crate::progression::group::{advance_group_progression, GroupProgression};
use crate::progression::ProgressionSystem;
use crate::settlement::{BetCategory, Settlement};

/// Progression globale + une progression isolée par catégorie de mise.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub system: ProgressionSystem,
    pub groups: BTreeMap<BetCategory, GroupProgression>,
    pub group_sequence: Vec<f64>,
    pub net: f64,
    pub spins_played: u32,
}

impl Session {
    pub fn new(system: ProgressionSystem, group_sequence: Vec<f64>) -> Self {
        Self {
            system,
            groups: BTreeMap::new(),
            group_sequence,
            net: 0.0,
            spins_played: 0,
        }
    }

    /// Progression de la catégorie (état initial si jamais jouée).
    pub fn tracker(&self, category: BetCategory) -> GroupProgression {
        self.groups.get(&category).copied().unwrap_or_default()
    }

    pub fn group_stake(&self, category: BetCategory, base_bet: f64) -> f64 {
        self.tracker(category).stake(base_bet, &self.group_sequence)
    }

    /// Tour passé sans mise (règle `pause`) : la progression globale reprend.
    pub fn sit_out(&self) -> Self {
        Self {
            system: self.system.advance(Outcome::Push),
            ..self.clone()
        }
    }

    /// Applique le règlement d'un tirage et retourne la nouvelle session.
    ///
    /// Le bilan net pilote la progression globale (bilan nul : séries remises à zéro,
    /// mise inchangée) ; chaque catégorie avance sa propre progression.
    pub fn apply(&self, settlement: &Settlement) -> Self {
        if settlement.results.is_empty() {
            return self.clone();
        }

        let system = match settlement.signal() {
            Some(outcome) => self.system.advance(outcome),
            None => self.system.reset_streaks(),
        };

        let mut groups = self.groups.clone();
        for (category, won) in settlement.category_outcomes() {
            let tracker = groups.get(&category).copied().unwrap_or_default();
            groups.insert(category, advance_group_progression(&tracker, won, &self.group_sequence));
        }

        debug!(
            spin = settlement.spin.number(),
            net = settlement.net,
            next_bet = system.stake(),
            "tirage réglé"
        );

        Self {
            system,
            groups,
            group_sequence: self.group_sequence.clone(),
            net: self.net + settlement.net,
            spins_played: self.spins_played + 1,
        }
    }
}

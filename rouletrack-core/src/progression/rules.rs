use serde::{Deserialize, Serialize};

use crate::models::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossRule {
    Reset,
    Double,
    Same,
    /// Passer le tour suivant, la mise est conservée.
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinRule {
    Reset,
    Double,
    Same,
}

/// Règles par issue : la règle de perte dépend du rang de la perte consécutive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRules {
    pub first_loss: LossRule,
    pub second_loss: LossRule,
    pub later_losses: LossRule,
    pub on_win: WinRule,
    /// Plafond de la mise, en multiple de la mise de base.
    pub max_multiplier: f64,
}

impl Default for OutcomeRules {
    fn default() -> Self {
        Self {
            first_loss: LossRule::Double,
            second_loss: LossRule::Double,
            later_losses: LossRule::Reset,
            on_win: WinRule::Reset,
            max_multiplier: 8.0,
        }
    }
}

impl OutcomeRules {
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if !self.max_multiplier.is_finite() || self.max_multiplier < 1.0 {
            return Err("multiplicateur maximal inférieur à 1");
        }
        Ok(())
    }

    /// `losses` = pertes consécutives, celle-ci comprise. Retourne (mise, pause).
    pub(crate) fn apply(&self, base: f64, bet: f64, outcome: Outcome, losses: u32) -> (f64, bool) {
        let (amount, paused) = match outcome {
            Outcome::Loss => {
                let rule = match losses {
                    0 | 1 => self.first_loss,
                    2 => self.second_loss,
                    _ => self.later_losses,
                };
                match rule {
                    LossRule::Reset => (base, false),
                    LossRule::Double => (bet * 2.0, false),
                    LossRule::Same => (bet, false),
                    LossRule::Pause => (bet, true),
                }
            }
            Outcome::Win => match self.on_win {
                WinRule::Reset => (base, false),
                WinRule::Double => (bet * 2.0, false),
                WinRule::Same => (bet, false),
            },
            Outcome::Push => (bet, false),
        };
        (amount.clamp(base, self.max_multiplier * base), paused)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WinStep {
    Reset,
    Back1,
    Back2,
    Stay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LossStep {
    Forward1,
    Forward2,
    Stay,
}

/// Progression sur une séquence explicite d'unités de mise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequentialRules {
    pub units: Vec<f64>,
    pub on_win: WinStep,
    /// Retour forcé au début après ce nombre de gains consécutifs.
    #[serde(default)]
    pub reset_after_wins: Option<u32>,
    pub on_loss: LossStep,
    /// Dépasser la fin sur une perte ramène au début (sinon on reste sur la dernière unité).
    #[serde(default)]
    pub reset_at_end: bool,
}

impl Default for SequentialRules {
    fn default() -> Self {
        Self {
            units: vec![1.0, 2.0, 3.0, 5.0, 8.0],
            on_win: WinStep::Back2,
            reset_after_wins: Some(2),
            on_loss: LossStep::Forward1,
            reset_at_end: false,
        }
    }
}

impl SequentialRules {
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.units.is_empty() {
            return Err("séquence vide");
        }
        if self.units.iter().any(|u| !u.is_finite() || *u <= 0.0) {
            return Err("unité de séquence non positive");
        }
        Ok(())
    }

    /// Nouvelle position ; `wins` = gains consécutifs, celui-ci compris.
    pub(crate) fn step(&self, position: usize, outcome: Outcome, wins: u32) -> usize {
        let last = self.units.len().saturating_sub(1);
        let next = match outcome {
            Outcome::Win => match self.reset_after_wins {
                Some(n) if n > 0 && wins > 0 && wins % n == 0 => 0,
                _ => match self.on_win {
                    WinStep::Reset => 0,
                    WinStep::Back1 => position.saturating_sub(1),
                    WinStep::Back2 => position.saturating_sub(2),
                    WinStep::Stay => position,
                },
            },
            Outcome::Loss => {
                let forward = match self.on_loss {
                    LossStep::Forward1 => 1,
                    LossStep::Forward2 => 2,
                    LossStep::Stay => 0,
                };
                let target = position.saturating_add(forward);
                if target > last && self.reset_at_end {
                    0
                } else {
                    target
                }
            }
            Outcome::Push => position,
        };
        next.min(last)
    }
}

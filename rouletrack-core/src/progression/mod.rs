pub mod group;
pub mod rules;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::Outcome;
use self::rules::{OutcomeRules, SequentialRules};

/// Unité de mise utilisée quand le descripteur est inexploitable.
pub const DEFAULT_BASE_UNIT: f64 = 1.0;

pub const FIBONACCI: [f64; 12] = [1.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0, 55.0, 89.0, 144.0];

/// Paroli : mise de base dès ce nombre de gains consécutifs atteint.
pub const PAROLI_CYCLE: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SystemKind {
    Flat,
    Martingale,
    Paroli,
    DAlembert,
    ReverseDAlembert,
    Fibonacci,
    Custom(OutcomeRules),
    CustomSequential(SequentialRules),
}

impl SystemKind {
    pub fn name(&self) -> &str {
        match self {
            SystemKind::Flat => "Flat",
            SystemKind::Martingale => "Martingale",
            SystemKind::Paroli => "Paroli",
            SystemKind::DAlembert => "D'Alembert",
            SystemKind::ReverseDAlembert => "D'Alembert inversé",
            SystemKind::Fibonacci => "Fibonacci",
            SystemKind::Custom(_) => "Personnalisé",
            SystemKind::CustomSequential(_) => "Séquence personnalisée",
        }
    }
}

/// Descripteur sérialisable d'un système de progression.
///
/// Un descripteur illisible (type inconnu, règles incomplètes, base non numérique)
/// se désérialise en flat à l'unité par défaut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DescriptorRepr")]
pub struct SystemConfig {
    #[serde(flatten)]
    pub kind: SystemKind,
    #[serde(default)]
    pub base_bet: Option<f64>,
}

#[derive(Deserialize)]
struct RawDescriptor {
    #[serde(flatten)]
    kind: SystemKind,
    #[serde(default)]
    base_bet: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DescriptorRepr {
    Valid(RawDescriptor),
    Malformed(serde::de::IgnoredAny),
}

impl From<DescriptorRepr> for SystemConfig {
    fn from(repr: DescriptorRepr) -> Self {
        match repr {
            DescriptorRepr::Valid(raw) => Self {
                kind: raw.kind,
                base_bet: raw.base_bet,
            },
            DescriptorRepr::Malformed(_) => {
                warn!("descripteur illisible, repli sur flat");
                Self {
                    kind: SystemKind::Flat,
                    base_bet: Some(DEFAULT_BASE_UNIT),
                }
            }
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            kind: SystemKind::Martingale,
            base_bet: Some(DEFAULT_BASE_UNIT),
        }
    }
}

impl SystemConfig {
    pub fn build(&self) -> ProgressionSystem {
        match self.base_bet {
            Some(base) => ProgressionSystem::new(self.kind.clone(), base),
            None => {
                warn!(kind = self.kind.name(), "mise de base absente, repli sur flat");
                ProgressionSystem::flat(DEFAULT_BASE_UNIT)
            }
        }
    }
}

/// État d'un système de progression. Chaque mise résolue produit un nouvel état.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionSystem {
    pub kind: SystemKind,
    pub base_bet: f64,
    pub current_bet: f64,
    pub consecutive_wins: u32,
    pub consecutive_losses: u32,
    pub sequence_index: usize,
    /// Le prochain tour est passé (règle `pause`).
    pub paused: bool,
}

impl ProgressionSystem {
    /// Un descripteur invalide retombe sur une mise fixe à l'unité par défaut.
    pub fn new(kind: SystemKind, base_bet: f64) -> Self {
        if let Err(reason) = validate(&kind, base_bet) {
            warn!(kind = kind.name(), base_bet, reason, "descripteur invalide, repli sur flat");
            return Self::flat(DEFAULT_BASE_UNIT);
        }
        let current_bet = match &kind {
            SystemKind::CustomSequential(rules) => base_bet * rules.units[0],
            _ => base_bet,
        };
        Self {
            kind,
            base_bet,
            current_bet,
            consecutive_wins: 0,
            consecutive_losses: 0,
            sequence_index: 0,
            paused: false,
        }
    }

    pub fn flat(base_bet: f64) -> Self {
        Self {
            kind: SystemKind::Flat,
            base_bet,
            current_bet: base_bet,
            consecutive_wins: 0,
            consecutive_losses: 0,
            sequence_index: 0,
            paused: false,
        }
    }

    /// Mise à engager au prochain tour (0 en pause).
    pub fn stake(&self) -> f64 {
        if self.paused {
            0.0
        } else {
            self.current_bet
        }
    }

    /// Un état invalide (base ou règles modifiées après construction) repart en flat.
    pub fn advance(&self, outcome: Outcome) -> Self {
        if let Err(reason) = validate(&self.kind, self.base_bet) {
            warn!(kind = self.kind.name(), base_bet = self.base_bet, reason, "état invalide, repli sur flat");
            return Self::flat(DEFAULT_BASE_UNIT).advance(outcome);
        }
        let mut next = self.clone();
        match outcome {
            Outcome::Win => {
                next.consecutive_wins += 1;
                next.consecutive_losses = 0;
            }
            Outcome::Loss => {
                next.consecutive_losses += 1;
                next.consecutive_wins = 0;
            }
            Outcome::Push => {}
        }
        next.paused = false;

        let base = self.base_bet;
        let bet = self.current_bet;

        next.current_bet = match &self.kind {
            SystemKind::Flat => base,
            SystemKind::Martingale => match outcome {
                Outcome::Loss => bet * 2.0,
                Outcome::Win | Outcome::Push => base,
            },
            SystemKind::Paroli => match outcome {
                Outcome::Win if next.consecutive_wins < PAROLI_CYCLE => bet * 2.0,
                _ => base,
            },
            SystemKind::DAlembert => match outcome {
                Outcome::Win => (bet - base).max(base),
                Outcome::Loss => bet + base,
                Outcome::Push => bet,
            },
            SystemKind::ReverseDAlembert => match outcome {
                Outcome::Win => bet + base,
                Outcome::Loss => (bet - base).max(base),
                Outcome::Push => bet,
            },
            SystemKind::Fibonacci => {
                let last = FIBONACCI.len() - 1;
                next.sequence_index = match outcome {
                    Outcome::Loss => self.sequence_index.saturating_add(1),
                    Outcome::Win => self.sequence_index.saturating_sub(2),
                    Outcome::Push => self.sequence_index,
                }
                .min(last);
                base * FIBONACCI[next.sequence_index]
            }
            SystemKind::Custom(rules) => {
                let (amount, paused) = rules.apply(base, bet, outcome, next.consecutive_losses);
                next.paused = paused;
                amount
            }
            SystemKind::CustomSequential(rules) => {
                next.sequence_index = rules.step(self.sequence_index, outcome, next.consecutive_wins);
                base * rules.units[next.sequence_index]
            }
        };
        next
    }

    /// Remet les séries à zéro sans toucher à la mise (tour à bilan nul).
    pub fn reset_streaks(&self) -> Self {
        Self {
            consecutive_wins: 0,
            consecutive_losses: 0,
            ..self.clone()
        }
    }
}

pub fn next_bet(system: &ProgressionSystem, outcome: Outcome) -> f64 {
    system.advance(outcome).stake()
}

pub fn advance(system: &ProgressionSystem, outcome: Outcome) -> ProgressionSystem {
    system.advance(outcome)
}

fn validate(kind: &SystemKind, base_bet: f64) -> Result<(), &'static str> {
    if !base_bet.is_finite() || base_bet <= 0.0 {
        return Err("mise de base non positive");
    }
    match kind {
        SystemKind::Custom(rules) => rules.validate(),
        SystemKind::CustomSequential(rules) => rules.validate(),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::rules::{LossRule, LossStep, WinRule, WinStep};

    fn bets(system: &ProgressionSystem, outcomes: &[Outcome]) -> Vec<f64> {
        let mut state = system.clone();
        let mut seq = vec![state.stake()];
        for &o in outcomes {
            state = state.advance(o);
            seq.push(state.stake());
        }
        seq
    }

    #[test]
    fn test_flat_never_moves() {
        let system = ProgressionSystem::new(SystemKind::Flat, 5.0);
        assert_eq!(bets(&system, &[Outcome::Loss, Outcome::Win, Outcome::Loss]), vec![5.0; 4]);
    }

    #[test]
    fn test_martingale_loss_loss_win() {
        let system = ProgressionSystem::new(SystemKind::Martingale, 10.0);
        assert_eq!(
            bets(&system, &[Outcome::Loss, Outcome::Loss, Outcome::Win]),
            vec![10.0, 20.0, 40.0, 10.0]
        );
    }

    #[test]
    fn test_martingale_doubles_and_push_resets() {
        let system = ProgressionSystem::new(SystemKind::Martingale, 1.0);
        assert_eq!(bets(&system, &[Outcome::Loss; 4]), vec![1.0, 2.0, 4.0, 8.0, 16.0]);
        let after = system.advance(Outcome::Loss).advance(Outcome::Push);
        assert_eq!(after.stake(), 1.0);
    }

    #[test]
    fn test_paroli_resets_after_three_wins() {
        let system = ProgressionSystem::new(SystemKind::Paroli, 10.0);
        assert_eq!(
            bets(&system, &[Outcome::Win, Outcome::Win, Outcome::Win, Outcome::Win]),
            vec![10.0, 20.0, 40.0, 10.0, 10.0]
        );
        assert_eq!(next_bet(&system.advance(Outcome::Win), Outcome::Loss), 10.0);
    }

    #[test]
    fn test_paroli_stays_at_base_past_three_wins() {
        let system = ProgressionSystem::new(SystemKind::Paroli, 10.0);
        let state = (0..6).fold(system, |s, _| s.advance(Outcome::Win));
        assert_eq!(state.consecutive_wins, 6);
        assert_eq!(state.stake(), 10.0);
        // une perte relance le cycle
        let state = state.advance(Outcome::Loss).advance(Outcome::Win);
        assert_eq!(state.stake(), 20.0);
    }

    #[test]
    fn test_dalembert() {
        let system = ProgressionSystem::new(SystemKind::DAlembert, 5.0);
        assert_eq!(
            bets(&system, &[Outcome::Loss, Outcome::Loss, Outcome::Push, Outcome::Win, Outcome::Win, Outcome::Win]),
            vec![5.0, 10.0, 15.0, 15.0, 10.0, 5.0, 5.0]
        );
    }

    #[test]
    fn test_reverse_dalembert() {
        let system = ProgressionSystem::new(SystemKind::ReverseDAlembert, 5.0);
        assert_eq!(
            bets(&system, &[Outcome::Win, Outcome::Win, Outcome::Loss, Outcome::Loss, Outcome::Loss]),
            vec![5.0, 10.0, 15.0, 10.0, 5.0, 5.0]
        );
    }

    #[test]
    fn test_fibonacci_walks_sequence() {
        let system = ProgressionSystem::new(SystemKind::Fibonacci, 2.0);
        assert_eq!(
            bets(&system, &[Outcome::Loss, Outcome::Loss, Outcome::Loss, Outcome::Win, Outcome::Win]),
            vec![2.0, 2.0, 4.0, 6.0, 2.0, 2.0]
        );
    }

    #[test]
    fn test_fibonacci_clamps_at_end() {
        let system = ProgressionSystem::new(SystemKind::Fibonacci, 1.0);
        let seq = bets(&system, &[Outcome::Loss; 20]);
        assert_eq!(*seq.last().unwrap(), 144.0);
        assert_eq!(system.advance(Outcome::Win).sequence_index, 0);
    }

    #[test]
    fn test_fibonacci_out_of_range_index_is_clamped() {
        let mut state = ProgressionSystem::new(SystemKind::Fibonacci, 1.0);
        state.sequence_index = 20;
        let last = FIBONACCI.len() - 1;
        for outcome in [Outcome::Win, Outcome::Push, Outcome::Loss] {
            let next = state.advance(outcome);
            assert!(next.sequence_index <= last);
        }
        assert_eq!(state.advance(Outcome::Win).stake(), 144.0);
    }

    #[test]
    fn test_tampered_sequential_state_falls_back_to_flat() {
        let mut state = ProgressionSystem::new(SystemKind::CustomSequential(SequentialRules::default()), 10.0);
        state.kind = SystemKind::CustomSequential(SequentialRules {
            units: vec![],
            ..SequentialRules::default()
        });
        let next = state.advance(Outcome::Loss);
        assert_eq!(next.kind, SystemKind::Flat);
        assert_eq!(next.stake(), DEFAULT_BASE_UNIT);
        assert_eq!(next.consecutive_losses, 1);

        let mut state = ProgressionSystem::new(SystemKind::Martingale, 10.0);
        state.base_bet = -1.0;
        assert_eq!(state.advance(Outcome::Win).kind, SystemKind::Flat);
    }

    #[test]
    fn test_streak_counters_exclusive() {
        let system = ProgressionSystem::new(SystemKind::Martingale, 1.0);
        let state = system.advance(Outcome::Win).advance(Outcome::Win);
        assert_eq!((state.consecutive_wins, state.consecutive_losses), (2, 0));
        let state = state.advance(Outcome::Loss);
        assert_eq!((state.consecutive_wins, state.consecutive_losses), (0, 1));
        let state = state.advance(Outcome::Push);
        assert_eq!((state.consecutive_wins, state.consecutive_losses), (0, 1));
    }

    #[test]
    fn test_advance_does_not_mutate_input() {
        let system = ProgressionSystem::new(SystemKind::Martingale, 10.0);
        let _ = advance(&system, Outcome::Loss);
        assert_eq!(system.current_bet, 10.0);
        assert_eq!(system.consecutive_losses, 0);
    }

    #[test]
    fn test_invalid_base_falls_back_to_flat() {
        for base in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let system = ProgressionSystem::new(SystemKind::Martingale, base);
            assert_eq!(system.kind, SystemKind::Flat);
            assert_eq!(system.stake(), DEFAULT_BASE_UNIT);
        }
    }

    #[test]
    fn test_empty_sequence_falls_back_to_flat() {
        let rules = SequentialRules {
            units: vec![],
            on_win: WinStep::Reset,
            reset_after_wins: None,
            on_loss: LossStep::Forward1,
            reset_at_end: false,
        };
        let system = ProgressionSystem::new(SystemKind::CustomSequential(rules), 10.0);
        assert_eq!(system.kind, SystemKind::Flat);
        assert_eq!(system.base_bet, DEFAULT_BASE_UNIT);
    }

    #[test]
    fn test_custom_rules_with_pause() {
        let rules = OutcomeRules {
            first_loss: LossRule::Double,
            second_loss: LossRule::Pause,
            later_losses: LossRule::Reset,
            on_win: WinRule::Same,
            max_multiplier: 8.0,
        };
        let system = ProgressionSystem::new(SystemKind::Custom(rules), 5.0);
        let state = system.advance(Outcome::Loss);
        assert_eq!(state.stake(), 10.0);
        let state = state.advance(Outcome::Loss);
        assert!(state.paused);
        assert_eq!(state.stake(), 0.0);
        // Tour passé : la mise reprend là où elle était
        let state = state.advance(Outcome::Push);
        assert_eq!(state.stake(), 10.0);
        let state = state.advance(Outcome::Loss);
        assert_eq!(state.stake(), 5.0);
    }

    #[test]
    fn test_custom_rules_clamped_by_max_multiplier() {
        let rules = OutcomeRules {
            first_loss: LossRule::Double,
            second_loss: LossRule::Double,
            later_losses: LossRule::Double,
            on_win: WinRule::Double,
            max_multiplier: 4.0,
        };
        let system = ProgressionSystem::new(SystemKind::Custom(rules), 10.0);
        assert_eq!(bets(&system, &[Outcome::Loss; 4]), vec![10.0, 20.0, 40.0, 40.0, 40.0]);
    }

    #[test]
    fn test_system_config_missing_base_is_flat() {
        let config: SystemConfig = serde_json::from_str(r#"{"kind":"fibonacci"}"#).unwrap();
        assert_eq!(config.kind, SystemKind::Fibonacci);
        let system = config.build();
        assert_eq!(system.kind, SystemKind::Flat);
    }

    #[test]
    fn test_unreadable_descriptor_is_flat() {
        for json in [
            r#"{"kind":"labouchere","base_bet":5.0}"#,
            r#"{"kind":"custom","base_bet":5}"#,
            r#"{"kind":"martingale","base_bet":"ten"}"#,
            r#"{"base_bet":2.0}"#,
            r#"42"#,
        ] {
            let config: SystemConfig = serde_json::from_str(json).unwrap();
            assert_eq!(config.kind, SystemKind::Flat, "{}", json);
            let system = config.build();
            assert_eq!(system.kind, SystemKind::Flat);
            assert_eq!(system.stake(), DEFAULT_BASE_UNIT);
        }
    }

    #[test]
    fn test_system_config_json_roundtrip() {
        let config = SystemConfig {
            kind: SystemKind::Custom(OutcomeRules::default()),
            base_bet: Some(2.5),
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);

        let config: SystemConfig = serde_json::from_str(r#"{"kind":"reverse-d-alembert","base_bet":3.0}"#).unwrap();
        assert_eq!(config.build().kind, SystemKind::ReverseDAlembert);
    }
}

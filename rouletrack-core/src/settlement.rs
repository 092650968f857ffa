//! Résolution de plusieurs mises simultanées sur un même tirage.
//!
//! Paiements (hors mise) :
//! - plein : 35:1
//! - chances simples (rouge/noir, pair/impair, manque/passe) : 1:1
//! - douzaine, colonne : 2:1
//! - sixain : 5:1
//!
//! Le zéro fait perdre toutes les mises extérieures.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::models::{Color, Outcome, Parity, Range, Spin, MAX_NUMBER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BetType {
    Straight(u8),
    Red,
    Black,
    Even,
    Odd,
    Low,
    High,
    Dozen(u8),
    Column(u8),
    SixLine(u8),
}

/// Clé de suivi des progressions : les deux faces d'une chance simple partagent une catégorie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BetCategory {
    RedBlack,
    EvenOdd,
    LowHigh,
    Dozens,
    Columns,
    SixLines,
    Straights,
}

impl std::fmt::Display for BetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BetCategory::RedBlack => write!(f, "Rouge/Noir"),
            BetCategory::EvenOdd => write!(f, "Pair/Impair"),
            BetCategory::LowHigh => write!(f, "Manque/Passe"),
            BetCategory::Dozens => write!(f, "Douzaines"),
            BetCategory::Columns => write!(f, "Colonnes"),
            BetCategory::SixLines => write!(f, "Sixains"),
            BetCategory::Straights => write!(f, "Pleins"),
        }
    }
}

impl BetType {
    pub fn category(&self) -> BetCategory {
        match self {
            BetType::Red | BetType::Black => BetCategory::RedBlack,
            BetType::Even | BetType::Odd => BetCategory::EvenOdd,
            BetType::Low | BetType::High => BetCategory::LowHigh,
            BetType::Dozen(_) => BetCategory::Dozens,
            BetType::Column(_) => BetCategory::Columns,
            BetType::SixLine(_) => BetCategory::SixLines,
            BetType::Straight(_) => BetCategory::Straights,
        }
    }

    /// Gain pour une unité misée, mise non comprise.
    pub fn payout(&self) -> f64 {
        match self {
            BetType::Straight(_) => 35.0,
            BetType::Red | BetType::Black | BetType::Even | BetType::Odd | BetType::Low | BetType::High => 1.0,
            BetType::Dozen(_) | BetType::Column(_) => 2.0,
            BetType::SixLine(_) => 5.0,
        }
    }

    pub fn wins(&self, spin: Spin) -> bool {
        match self {
            BetType::Straight(n) => spin.number() == *n,
            BetType::Red => spin.color() == Color::Red,
            BetType::Black => spin.color() == Color::Black,
            BetType::Even => spin.parity() == Some(Parity::Even),
            BetType::Odd => spin.parity() == Some(Parity::Odd),
            BetType::Low => spin.range() == Some(Range::Low),
            BetType::High => spin.range() == Some(Range::High),
            BetType::Dozen(d) => spin.dozen() == Some(*d),
            BetType::Column(c) => spin.column() == Some(*c),
            BetType::SixLine(l) => spin.number() != 0 && (spin.number() - 1) / 6 + 1 == *l,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            BetType::Straight(n) if n > MAX_NUMBER => bail!("Plein {} hors limites (0-36)", n),
            BetType::Dozen(d) if !(1..=3).contains(&d) => bail!("Douzaine {} invalide (1-3)", d),
            BetType::Column(c) if !(1..=3).contains(&c) => bail!("Colonne {} invalide (1-3)", c),
            BetType::SixLine(l) if !(1..=6).contains(&l) => bail!("Sixain {} invalide (1-6)", l),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub bet_type: BetType,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetResult {
    pub bet: Bet,
    pub won: bool,
    /// Gain net : `amount × payout` si gagnée, `-amount` sinon.
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub spin: Spin,
    pub results: Vec<BetResult>,
    pub net: f64,
}

impl Settlement {
    /// Signal pour la progression globale : aucun si le bilan est nul.
    pub fn signal(&self) -> Option<Outcome> {
        if self.net > 0.0 {
            Some(Outcome::Win)
        } else if self.net < 0.0 {
            Some(Outcome::Loss)
        } else {
            None
        }
    }

    /// Catégories jouées et leur issue : une catégorie gagne si l'une de ses mises gagne.
    pub fn category_outcomes(&self) -> Vec<(BetCategory, bool)> {
        let mut outcomes: Vec<(BetCategory, bool)> = Vec::new();
        for result in &self.results {
            let category = result.bet.bet_type.category();
            match outcomes.iter_mut().find(|(c, _)| *c == category) {
                Some(entry) => entry.1 |= result.won,
                None => outcomes.push((category, result.won)),
            }
        }
        outcomes
    }
}

pub fn settle(bets: &[Bet], spin: Spin) -> Settlement {
    let results: Vec<BetResult> = bets
        .iter()
        .map(|&bet| {
            let won = bet.bet_type.wins(spin);
            let profit = if won { bet.amount * bet.bet_type.payout() } else { -bet.amount };
            BetResult { bet, won, profit }
        })
        .collect();
    let net = results.iter().map(|r| r.profit).sum();
    Settlement { spin, results, net }
}

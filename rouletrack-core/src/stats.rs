//! Primitives statistiques partagées par les tableaux et les prédicteurs.
//!
//! Convention : `history[0]` = tirage le plus récent.

use crate::groups::{all_groups, Group};
use crate::models::POCKETS;

/// Écart (en points de pourcentage) au-delà duquel un groupe est chaud ou froid.
pub const STATUS_THRESHOLD: f64 = 10.0;

/// Fenêtres glissantes affichées dans les tableaux.
pub const ROLLING_WINDOWS: [usize; 4] = [9, 18, 36, 54];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Run {
    pub current: usize,
    pub max: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Hot,
    Cold,
    Norm,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Hot => write!(f, "HOT"),
            Status::Cold => write!(f, "COLD"),
            Status::Norm => write!(f, "NORM"),
        }
    }
}

pub fn hit_count<F: Fn(u8) -> bool>(history: &[u8], pred: F) -> usize {
    history.iter().filter(|&&n| pred(n)).count()
}

/// Série de sorties consécutives : en cours (depuis le plus récent) et maximale.
pub fn streak<F: Fn(u8) -> bool>(history: &[u8], pred: F) -> Run {
    let current = history.iter().take_while(|&&n| pred(n)).count();
    Run { current, max: longest_run(history, |n| pred(n)) }
}

/// Absence : tirages écoulés depuis la dernière sortie, et plus longue absence.
///
/// Si le groupe n'est jamais sorti, l'absence en cours vaut la longueur de l'historique.
pub fn absence<F: Fn(u8) -> bool>(history: &[u8], pred: F) -> Run {
    let current = last_seen(history, |n| pred(n)).unwrap_or(history.len());
    Run { current, max: longest_run(history, |n| !pred(n)) }
}

/// Index (depuis le plus récent) de la dernière sortie.
pub fn last_seen<F: Fn(u8) -> bool>(history: &[u8], pred: F) -> Option<usize> {
    history.iter().position(|&n| pred(n))
}

/// Sorties parmi les `window` tirages les plus récents.
pub fn window_hits<F: Fn(u8) -> bool>(history: &[u8], pred: F, window: usize) -> usize {
    let end = window.min(history.len());
    hit_count(&history[..end], pred)
}

pub fn expected_percentage(group: &Group) -> f64 {
    group.size() as f64 / POCKETS as f64 * 100.0
}

pub fn actual_percentage<F: Fn(u8) -> bool>(history: &[u8], pred: F) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    hit_count(history, pred) as f64 / history.len() as f64 * 100.0
}

pub fn classify(deviation: f64) -> Status {
    if deviation > STATUS_THRESHOLD {
        Status::Hot
    } else if deviation < -STATUS_THRESHOLD {
        Status::Cold
    } else {
        Status::Norm
    }
}

fn longest_run<F: Fn(u8) -> bool>(history: &[u8], pred: F) -> usize {
    let mut best = 0usize;
    let mut run = 0usize;
    for &n in history {
        if pred(n) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

/// Ligne du tableau de statistiques d'un groupe.
#[derive(Debug, Clone)]
pub struct GroupStats {
    pub group: &'static Group,
    pub hits: usize,
    pub streak: Run,
    pub absence: Run,
    pub last_seen: Option<usize>,
    /// Sorties sur chaque fenêtre de `ROLLING_WINDOWS`.
    pub window_hits: [usize; 4],
    pub expected: f64,
    pub actual: f64,
    pub deviation: f64,
    pub status: Status,
}

pub fn group_stats(history: &[u8], group: &'static Group) -> GroupStats {
    let member = |n: u8| group.contains(n);
    let expected = expected_percentage(group);
    let actual = actual_percentage(history, member);
    // Historique vide : écart indéfini traité comme nul
    let deviation = if history.is_empty() { 0.0 } else { actual - expected };

    GroupStats {
        group,
        hits: hit_count(history, member),
        streak: streak(history, member),
        absence: absence(history, member),
        last_seen: last_seen(history, member),
        window_hits: ROLLING_WINDOWS.map(|w| window_hits(history, member, w)),
        expected,
        actual,
        deviation,
        status: classify(deviation),
    }
}

pub fn group_table(history: &[u8]) -> Vec<GroupStats> {
    all_groups().iter().map(|g| group_stats(history, g)).collect()
}

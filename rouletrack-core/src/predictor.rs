//! Prédicteur de groupes : combine la convergence par numéro et l'écart
//! statistique sur plusieurs fenêtres glissantes.

use tracing::debug;

use crate::convergence::{calculate_convergence, Confidence, Convergence};
use crate::groups::{predictor_groups, Group};
use crate::stats::window_hits;

/// Historique minimal pour produire une prévision.
pub const MIN_HISTORY: usize = 10;

pub const SHORT_WINDOW: usize = 18;
pub const MEDIUM_WINDOW: usize = 36;
pub const LONG_WINDOW: usize = 54;
pub const DISPLAY_WINDOWS: [usize; 4] = [9, SHORT_WINDOW, MEDIUM_WINDOW, LONG_WINDOW];

const CONVERGENCE_WEIGHT: f64 = 0.7;
const PERFORMANCE_WEIGHT: f64 = 0.3;
const SHORT_DEVIATION_WEIGHT: f64 = 0.5;
const MEDIUM_DEVIATION_WEIGHT: f64 = 0.3;
const TREND_MARGIN: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Stable,
    Falling,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Rising => write!(f, "↑ hausse"),
            Trend::Stable => write!(f, "→ stable"),
            Trend::Falling => write!(f, "↓ baisse"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupScore {
    pub group: &'static Group,
    pub score: f64,
    /// Sorties sur 9 / 18 / 36 / 54 tirages.
    pub hits: [usize; 4],
    /// Écarts normalisés sur 18 / 36 / 54 tirages.
    pub deviations: [f64; 3],
    pub convergence: f64,
    pub performance: f64,
    pub confidence: Confidence,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForecastStatus {
    Ready,
    InsufficientData { required: usize, available: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupForecast {
    pub status: ForecastStatus,
    pub groups: Vec<GroupScore>,
}

/// Écart de type z : (observé - attendu) / √attendu.
pub fn deviation_score(hits: usize, group: &Group, window: usize) -> f64 {
    let expected = group.probability() * window as f64;
    if expected <= 0.0 {
        return 0.0;
    }
    (hits as f64 - expected) / expected.sqrt()
}

pub fn classify_trend(short_rate: f64, long_rate: f64) -> Trend {
    if short_rate > long_rate * (1.0 + TREND_MARGIN) {
        Trend::Rising
    } else if short_rate < long_rate * (1.0 - TREND_MARGIN) {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

fn hit_rate(hits: usize, window: usize) -> f64 {
    if window == 0 {
        0.0
    } else {
        hits as f64 / window as f64
    }
}

fn classify_confidence(score: f64, short_deviation: f64, contribution: f64, trend: Trend) -> Confidence {
    if score > 1.5 && short_deviation > 1.5 && trend == Trend::Rising {
        Confidence::High
    } else if score > 0.8 || short_deviation > 1.0 || contribution > 1.0 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

fn score_group(history: &[u8], group: &'static Group, convergence: &Convergence) -> GroupScore {
    let member = |n: u8| group.contains(n);
    let hits = DISPLAY_WINDOWS.map(|w| window_hits(history, member, w));

    let short = SHORT_WINDOW.min(history.len());
    let medium = MEDIUM_WINDOW.min(history.len());
    let long = LONG_WINDOW.min(history.len());

    let deviations = [
        deviation_score(hits[1], group, short),
        deviation_score(hits[2], group, medium),
        deviation_score(hits[3], group, long),
    ];

    let trend = classify_trend(hit_rate(hits[1], short), hit_rate(hits[2], medium));

    let convergence_avg = group
        .numbers
        .iter()
        .map(|&n| convergence.scores[n as usize])
        .sum::<f64>()
        / group.size() as f64;

    let performance = SHORT_DEVIATION_WEIGHT * deviations[0] + MEDIUM_DEVIATION_WEIGHT * deviations[1];
    let contribution = CONVERGENCE_WEIGHT * convergence_avg;
    let score = contribution + PERFORMANCE_WEIGHT * performance;

    GroupScore {
        group,
        score,
        hits,
        deviations,
        convergence: convergence_avg,
        performance,
        confidence: classify_confidence(score, deviations[0], contribution, trend),
        trend,
    }
}

/// Groupes classés par score décroissant, confiance faible exclue.
/// Vide sous `MIN_HISTORY` tirages.
pub fn score_groups(history: &[u8]) -> Vec<GroupScore> {
    if history.len() < MIN_HISTORY {
        return vec![];
    }

    let convergence = calculate_convergence(history);
    let mut scored: Vec<GroupScore> = predictor_groups()
        .iter()
        .map(|g| score_group(history, g, &convergence))
        .filter(|s| s.confidence != Confidence::Low)
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    debug!(history = history.len(), retained = scored.len(), "groupes notés");
    scored
}

pub fn predict_groups(history: &[u8]) -> GroupForecast {
    if history.len() < MIN_HISTORY {
        return GroupForecast {
            status: ForecastStatus::InsufficientData {
                required: MIN_HISTORY,
                available: history.len(),
            },
            groups: vec![],
        };
    }
    GroupForecast {
        status: ForecastStatus::Ready,
        groups: score_groups(history),
    }
}

pub fn top_groups(history: &[u8], n: usize) -> Vec<GroupScore> {
    let mut groups = score_groups(history);
    groups.truncate(n);
    groups
}

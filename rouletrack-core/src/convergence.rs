use tracing::debug;

use crate::groups::all_groups;
use crate::models::{MAX_NUMBER, POCKETS};
use crate::stats::{self, Status};

/// Fenêtre d'analyse : les 36 tirages les plus récents.
pub const CONVERGENCE_WINDOW: usize = 36;
pub const TOP_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Déterminée par la taille de l'échantillon uniquement.
    pub fn from_sample_size(len: usize) -> Self {
        if len > 25 {
            Confidence::High
        } else if len > 10 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "HAUTE"),
            Confidence::Medium => write!(f, "MOYENNE"),
            Confidence::Low => write!(f, "FAIBLE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Convergence {
    pub numbers: [u8; TOP_COUNT],
    pub confidence: Confidence,
    pub reasoning: Vec<String>,
    pub active_patterns: Vec<String>,
    /// scores[n] = sorties de n dans la fenêtre / sorties attendues (1.0 = conforme).
    pub scores: [f64; POCKETS],
    pub window: usize,
    pub sample_size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Strength {
    pub strength: f64,
    pub interpretation: Interpretation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    Strong,
    Moderate,
    Weak,
}

impl std::fmt::Display for Interpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interpretation::Strong => write!(f, "Forte"),
            Interpretation::Moderate => write!(f, "Modérée"),
            Interpretation::Weak => write!(f, "Faible"),
        }
    }
}

pub fn calculate_convergence(history: &[u8]) -> Convergence {
    let valid: Vec<u8> = history.iter().copied().filter(|&n| n <= MAX_NUMBER).collect();
    let window = &valid[..valid.len().min(CONVERGENCE_WINDOW)];

    let mut counts = [0usize; POCKETS];
    for &n in window {
        counts[n as usize] += 1;
    }

    // Tri stable : à égalité, ordre croissant des numéros
    let mut ranked: Vec<u8> = (0..=MAX_NUMBER).collect();
    ranked.sort_by(|a, b| counts[*b as usize].cmp(&counts[*a as usize]));

    let mut numbers = [0u8; TOP_COUNT];
    numbers.copy_from_slice(&ranked[..TOP_COUNT]);

    let expected_per_number = window.len() as f64 / POCKETS as f64;
    let mut scores = [0.0f64; POCKETS];
    if expected_per_number > 0.0 {
        for (score, &count) in scores.iter_mut().zip(counts.iter()) {
            *score = count as f64 / expected_per_number;
        }
    }

    let active_patterns: Vec<String> = if window.is_empty() {
        vec![]
    } else {
        all_groups()
            .iter()
            .filter(|g| {
                let deviation = stats::actual_percentage(window, |n| g.contains(n)) - stats::expected_percentage(g);
                stats::classify(deviation) == Status::Hot
            })
            .map(|g| g.name.to_string())
            .collect()
    };

    let confidence = Confidence::from_sample_size(valid.len());

    let mut reasoning = vec![
        format!("Échantillon de {} tirages (confiance {})", valid.len(), confidence),
        format!("Fenêtre d'analyse : {} derniers tirages", window.len()),
    ];
    if let Some(&top) = numbers.first() {
        if counts[top as usize] > 0 {
            reasoning.push(format!("Numéro le plus fréquent : {} ({} sorties)", top, counts[top as usize]));
        }
    }
    if !active_patterns.is_empty() {
        reasoning.push(format!("Groupes convergents : {}", active_patterns.join(", ")));
    }

    debug!(
        sample = valid.len(),
        ignored = history.len() - valid.len(),
        top = ?numbers,
        "convergence recalculée"
    );

    Convergence {
        numbers,
        confidence,
        reasoning,
        active_patterns,
        scores,
        window: window.len(),
        sample_size: valid.len(),
    }
}

pub fn convergence_strength(result: &Convergence) -> Strength {
    let base = match result.confidence {
        Confidence::High => 80.0,
        Confidence::Medium => 55.0,
        Confidence::Low => 30.0,
    };

    let mut distinct = result.numbers.to_vec();
    distinct.sort();
    distinct.dedup();
    let penalty = TOP_COUNT.saturating_sub(distinct.len()) as f64 * 2.0;

    let strength = (base - penalty).clamp(0.0, 100.0);
    let interpretation = if strength >= 70.0 {
        Interpretation::Strong
    } else if strength >= 40.0 {
        Interpretation::Moderate
    } else {
        Interpretation::Weak
    };

    Strength { strength, interpretation }
}

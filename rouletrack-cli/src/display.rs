use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Row, Table};

use rouletrack_core::convergence::{Confidence, Convergence, Interpretation, Strength};
use rouletrack_core::models::{Outcome, Spin};
use rouletrack_core::predictor::{ForecastStatus, GroupForecast, Trend};
use rouletrack_core::progression::ProgressionSystem;
use rouletrack_core::stats::{GroupStats, Status, ROLLING_WINDOWS};

use crate::simulate::SimulationSummary;

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn new_table(header: impl Into<Row>) -> Table {
    let mut table = base_table();
    table.set_header(header);
    table
}

fn spin_cell(n: u8) -> Cell {
    let color = match Spin::new(n).map(|s| s.color()) {
        Ok(rouletrack_core::models::Color::Red) => Color::Red,
        Ok(rouletrack_core::models::Color::Green) => Color::Green,
        _ => Color::White,
    };
    Cell::new(format!("{:2}", n)).fg(color)
}

pub fn display_history(history: &[u8], last: usize) {
    let shown = &history[..history.len().min(last)];
    if shown.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }
    let mut table = base_table();
    table.add_row(shown.iter().map(|&n| spin_cell(n)).collect::<Vec<_>>());
    println!("\n🎡 Derniers tirages (du plus récent au plus ancien)\n");
    println!("{table}");
}

pub fn display_group_stats(stats: &[GroupStats], history_len: usize) {
    println!("\n📊 Statistiques des groupes sur {} tirages\n", history_len);

    let mut header = vec![
        "Groupe".to_string(),
        "Sorties".to_string(),
        "Série".to_string(),
        "Absence".to_string(),
    ];
    header.extend(ROLLING_WINDOWS.iter().map(|w| format!("/{}", w)));
    header.extend(["Attendu %", "Réel %", "Écart", "Statut"].map(String::from));

    let mut table = new_table(header);

    for stat in stats {
        let color = match stat.status {
            Status::Hot => Color::Green,
            Status::Cold => Color::Red,
            Status::Norm => Color::White,
        };
        let mut row = vec![
            Cell::new(stat.group.name),
            Cell::new(stat.hits),
            Cell::new(format!("{} (max {})", stat.streak.current, stat.streak.max)),
            Cell::new(format!("{} (max {})", stat.absence.current, stat.absence.max)),
        ];
        row.extend(stat.window_hits.iter().map(Cell::new));
        row.extend([
            Cell::new(format!("{:.1}", stat.expected)),
            Cell::new(format!("{:.1}", stat.actual)),
            Cell::new(format!("{:+.1}", stat.deviation)).fg(color),
            Cell::new(stat.status.to_string()).fg(color),
        ]);
        table.add_row(row);
    }
    println!("{table}");
}

fn confidence_color(confidence: Confidence) -> Color {
    match confidence {
        Confidence::High => Color::Green,
        Confidence::Medium => Color::Yellow,
        Confidence::Low => Color::Red,
    }
}

pub fn display_convergence(result: &Convergence, strength: &Strength) {
    println!(
        "\n🎯 Convergence sur {} tirages (fenêtre {})\n",
        result.sample_size, result.window
    );

    let mut table = new_table(vec!["Rang", "Numéro", "Score"]);
    for (i, &n) in result.numbers.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            spin_cell(n),
            Cell::new(format!("{:.2}", result.scores[n as usize])),
        ]);
    }
    println!("{table}");

    let strength_color = match strength.interpretation {
        Interpretation::Strong => Color::Green,
        Interpretation::Moderate => Color::Yellow,
        Interpretation::Weak => Color::Red,
    };
    let mut table = new_table(vec!["Confiance", "Force", "Interprétation"]);
    table.add_row(vec![
        Cell::new(result.confidence.to_string()).fg(confidence_color(result.confidence)),
        Cell::new(format!("{:.0}", strength.strength)),
        Cell::new(strength.interpretation.to_string()).fg(strength_color),
    ]);
    println!("{table}");

    for line in &result.reasoning {
        println!("  • {}", line);
    }
    if !result.active_patterns.is_empty() {
        println!("  Motifs actifs : {}", result.active_patterns.join(", "));
    }
}

pub fn display_forecast(forecast: &GroupForecast) {
    if let ForecastStatus::InsufficientData { required, available } = forecast.status {
        println!(
            "\nHistorique insuffisant : {} tirages requis, {} disponibles.",
            required, available
        );
        return;
    }

    println!("\n🔮 Groupes recommandés\n");
    if forecast.groups.is_empty() {
        println!("Aucun groupe ne dépasse le seuil de confiance.");
        return;
    }

    let mut header = vec!["#".to_string(), "Groupe".to_string(), "Score".to_string()];
    header.extend(ROLLING_WINDOWS.iter().map(|w| format!("/{}", w)));
    header.extend(["Convergence", "Performance", "Confiance", "Tendance"].map(String::from));

    let mut table = new_table(header);

    for (i, score) in forecast.groups.iter().enumerate() {
        let trend_color = match score.trend {
            Trend::Rising => Color::Green,
            Trend::Stable => Color::White,
            Trend::Falling => Color::Red,
        };
        let mut row = vec![
            Cell::new(i + 1),
            Cell::new(score.group.name),
            Cell::new(format!("{:.3}", score.score)),
        ];
        row.extend(score.hits.iter().map(Cell::new));
        row.extend([
            Cell::new(format!("{:.3}", score.convergence)),
            Cell::new(format!("{:+.3}", score.performance)),
            Cell::new(score.confidence.to_string()).fg(confidence_color(score.confidence)),
            Cell::new(score.trend.to_string()).fg(trend_color),
        ]);
        table.add_row(row);
    }
    println!("{table}");
}

/// Une ligne par issue appliquée : mise engagée puis mise suivante.
pub fn display_progression(initial: &ProgressionSystem, steps: &[(Outcome, ProgressionSystem)]) {
    println!(
        "\n📈 Progression {} (base {:.2})\n",
        initial.kind.name(),
        initial.base_bet
    );

    let mut table = new_table(vec!["Tour", "Mise", "Issue", "Mise suivante", "Gains consécutifs", "Pertes consécutives"]);
    let mut previous = initial;
    for (i, (outcome, state)) in steps.iter().enumerate() {
        let color = match outcome {
            Outcome::Win => Color::Green,
            Outcome::Loss => Color::Red,
            Outcome::Push => Color::White,
        };
        let next = if state.paused {
            "pause".to_string()
        } else {
            format!("{:.2}", state.stake())
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{:.2}", previous.stake())),
            Cell::new(outcome.to_string()).fg(color),
            Cell::new(next),
            Cell::new(state.consecutive_wins),
            Cell::new(state.consecutive_losses),
        ]);
        previous = state;
    }
    println!("{table}");
}

pub fn display_simulation(summary: &SimulationSummary) {
    println!("\n🎲 Simulation : {} tirages\n", summary.spins);

    let net_color = if summary.net >= 0.0 { Color::Green } else { Color::Red };
    let mut table = new_table(vec!["Tours joués", "Pauses", "Tours gagnants", "Mise max", "Drawdown max", "Bilan"]);
    table.add_row(vec![
        Cell::new(summary.rounds_played),
        Cell::new(summary.rounds_skipped),
        Cell::new(summary.winning_rounds),
        Cell::new(format!("{:.2}", summary.max_stake)),
        Cell::new(format!("{:.2}", summary.max_drawdown)),
        Cell::new(format!("{:+.2}", summary.net)).fg(net_color),
    ]);
    println!("{table}");

    if summary.session.groups.is_empty() {
        return;
    }
    println!("\n── Progressions par catégorie ──");
    let mut table = new_table(vec!["Catégorie", "Position", "Gains consécutifs", "Dernière issue", "Unités"]);
    for (category, tracker) in &summary.session.groups {
        table.add_row(vec![
            Cell::new(category),
            Cell::new(tracker.position),
            Cell::new(tracker.consecutive_wins),
            Cell::new(tracker.last_outcome.map_or("—".to_string(), |o| o.to_string())),
            Cell::new(format!("{:.2}", tracker.stake(1.0, &summary.session.group_sequence))),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_share_preset() {
        let table = new_table(vec!["Groupe".to_string(), "Score".to_string()]);
        assert_eq!(table.header().map(|h| h.cell_count()), Some(2));
        assert!(base_table().header().is_none());

        let mut table = new_table(vec!["Rang", "Numéro"]);
        table.add_row(vec![Cell::new(1), spin_cell(32)]);
        let rendered = table.to_string();
        assert!(rendered.contains("Numéro"));
        assert!(rendered.contains('┌'));
    }
}

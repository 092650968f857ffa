use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use rouletrack_core::models::{Spin, MAX_NUMBER};
use rouletrack_core::session::Session;
use rouletrack_core::settlement::{settle, Bet};

use crate::config::SessionConfig;

#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub spins: usize,
    pub rounds_played: usize,
    pub rounds_skipped: usize,
    pub winning_rounds: usize,
    /// Plus grosse mise totale engagée sur un tirage.
    pub max_stake: f64,
    pub max_drawdown: f64,
    pub net: f64,
    pub session: Session,
    /// Tirages simulés, le plus récent en tête.
    pub history: Vec<u8>,
}

/// Simulation avec barre de progression sur stderr.
pub fn simulate(config: &SessionConfig, spins: usize, seed: Option<u64>) -> Result<SimulationSummary> {
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let pb = ProgressBar::new(spins as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )?
        .progress_chars("=> "),
    );

    let summary = run_simulation(config, spins, &mut rng, &pb)?;
    pb.finish_and_clear();
    Ok(summary)
}

pub fn run_simulation<R: Rng>(
    config: &SessionConfig,
    spins: usize,
    rng: &mut R,
    pb: &ProgressBar,
) -> Result<SimulationSummary> {
    config.validate()?;

    let mut session = config.session();
    let mut history: Vec<u8> = Vec::with_capacity(spins);
    let mut rounds_played = 0;
    let mut rounds_skipped = 0;
    let mut winning_rounds = 0;
    let mut max_stake: f64 = 0.0;
    let mut peak: f64 = 0.0;
    let mut max_drawdown: f64 = 0.0;

    for _ in 0..spins {
        let spin = Spin::new(rng.random_range(0..=MAX_NUMBER))?;
        history.push(spin.number());
        pb.inc(1);

        if session.system.paused {
            session = session.sit_out();
            rounds_skipped += 1;
            continue;
        }

        let stake = session.system.stake();
        let bets: Vec<Bet> = config
            .bets
            .iter()
            .map(|&bet_type| Bet {
                bet_type,
                amount: session.group_stake(bet_type.category(), stake),
            })
            .collect();
        max_stake = max_stake.max(bets.iter().map(|b| b.amount).sum());

        let settlement = settle(&bets, spin);
        if settlement.net > 0.0 {
            winning_rounds += 1;
        }
        session = session.apply(&settlement);
        rounds_played += 1;

        peak = peak.max(session.net);
        max_drawdown = max_drawdown.max(peak - session.net);
    }

    // le plus récent en tête
    history.reverse();

    debug!(rounds_played, rounds_skipped, "simulation terminée");
    info!(net = session.net, max_drawdown, "bilan de simulation");

    Ok(SimulationSummary {
        spins,
        rounds_played,
        rounds_skipped,
        winning_rounds,
        max_stake,
        max_drawdown,
        net: session.net,
        session,
        history,
    })
}

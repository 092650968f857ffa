mod config;
mod display;
mod input;
mod simulate;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use rouletrack_core::convergence::{calculate_convergence, convergence_strength};
use rouletrack_core::models::Outcome;
use rouletrack_core::predictor::predict_groups;
use rouletrack_core::progression::{ProgressionSystem, SystemKind, DEFAULT_BASE_UNIT};
use rouletrack_core::stats::group_table;

use crate::config::{load_config, save_config, SessionConfig};
use crate::display::{
    display_convergence, display_forecast, display_group_stats, display_history,
    display_progression, display_simulation,
};
use crate::input::{parse_outcomes, HistoryArgs};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum SystemChoice {
    Flat,
    #[default]
    Martingale,
    Paroli,
    Dalembert,
    ReverseDalembert,
    Fibonacci,
}

impl SystemChoice {
    fn kind(self) -> SystemKind {
        match self {
            SystemChoice::Flat => SystemKind::Flat,
            SystemChoice::Martingale => SystemKind::Martingale,
            SystemChoice::Paroli => SystemKind::Paroli,
            SystemChoice::Dalembert => SystemKind::DAlembert,
            SystemChoice::ReverseDalembert => SystemKind::ReverseDAlembert,
            SystemChoice::Fibonacci => SystemKind::Fibonacci,
        }
    }
}

#[derive(Parser)]
#[command(name = "rouletrack", about = "Suivi de tirages et progressions de mises à la roulette")]
struct Cli {
    /// Journalisation détaillée (équivaut à RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Statistiques des groupes (séries, absences, écarts)
    Stats {
        #[command(flatten)]
        history: HistoryArgs,
    },

    /// Numéros convergents et groupes recommandés
    Predict {
        #[command(flatten)]
        history: HistoryArgs,

        /// Nombre de groupes à afficher
        #[arg(short, long, default_value = "5")]
        top: usize,
    },

    /// Dérouler un système de progression sur une suite d'issues
    Progress {
        /// Système de progression
        #[arg(long, default_value = "martingale", conflicts_with = "config")]
        system: SystemChoice,

        /// Mise de base
        #[arg(short, long, default_value_t = DEFAULT_BASE_UNIT)]
        base: f64,

        /// Issues, de la plus ancienne à la plus récente (g = gain, p = perte, n = nul)
        #[arg(short, long)]
        outcomes: String,

        /// Reprendre le système d'une configuration JSON
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Simuler une session sur des tirages aléatoires
    Simulate {
        /// Configuration JSON (défaut : martingale sur rouge et douzaine 3)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Nombre de tirages
        #[arg(short, long, default_value = "1000")]
        spins: usize,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Écrire une configuration de session par défaut
    InitConfig {
        /// Fichier de sortie
        #[arg(short, long, default_value = "rouletrack.json")]
        output: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Stats { history } => cmd_stats(&history),
        Command::Predict { history, top } => cmd_predict(&history, top),
        Command::Progress {
            system,
            base,
            outcomes,
            config,
        } => cmd_progress(system, base, &outcomes, config.as_deref()),
        Command::Simulate { config, spins, seed } => cmd_simulate(config.as_deref(), spins, seed),
        Command::InitConfig { output } => cmd_init_config(&output),
    }
}

fn cmd_stats(args: &HistoryArgs) -> Result<()> {
    let history = args.load()?;
    if history.is_empty() {
        println!("Historique vide.");
        return Ok(());
    }
    display_history(&history, 18);
    display_group_stats(&group_table(&history), history.len());
    Ok(())
}

fn cmd_predict(args: &HistoryArgs, top: usize) -> Result<()> {
    let history = args.load()?;
    display_history(&history, 18);

    let convergence = calculate_convergence(&history);
    let strength = convergence_strength(&convergence);
    display_convergence(&convergence, &strength);

    let mut forecast = predict_groups(&history);
    forecast.groups.truncate(top);
    display_forecast(&forecast);
    Ok(())
}

fn cmd_progress(choice: SystemChoice, base: f64, outcomes: &str, config: Option<&Path>) -> Result<()> {
    let outcomes: Vec<Outcome> = parse_outcomes(outcomes)?;
    if outcomes.is_empty() {
        bail!("Aucune issue fournie");
    }

    let initial = match config {
        Some(path) => load_config(path)?.system.build(),
        None => ProgressionSystem::new(choice.kind(), base),
    };

    let mut state = initial.clone();
    let mut steps = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        state = state.advance(outcome);
        steps.push((outcome, state.clone()));
    }
    display_progression(&initial, &steps);
    Ok(())
}

fn cmd_simulate(config: Option<&Path>, spins: usize, seed: Option<u64>) -> Result<()> {
    let config = match config {
        Some(path) => load_config(path)?,
        None => SessionConfig::default(),
    };
    let summary = simulate::simulate(&config, spins, seed)?;
    display_history(&summary.history, 18);
    display_simulation(&summary);
    Ok(())
}

fn cmd_init_config(output: &Path) -> Result<()> {
    if output.exists() {
        bail!("{:?} existe déjà", output);
    }
    save_config(&SessionConfig::default(), output)?;
    println!("Configuration écrite dans {}", output.display());
    Ok(())
}

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use rouletrack_core::models::{validate_spin, Outcome};

/// Source de l'historique : liste en ligne de commande ou fichier texte.
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Tirages, du plus récent au plus ancien (ex: "32 15 19 4")
    #[arg(short, long, conflicts_with = "file")]
    pub spins: Option<String>,

    /// Fichier texte contenant les tirages (même format)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl HistoryArgs {
    pub fn load(&self) -> Result<Vec<u8>> {
        match (&self.spins, &self.file) {
            (Some(spins), _) => parse_spins(spins),
            (None, Some(path)) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Impossible de lire {:?}", path))?;
                parse_spins(&content)
            }
            (None, None) => bail!("Historique manquant : utilisez --spins ou --file"),
        }
    }
}

fn tokens(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|s| !s.is_empty())
}

pub fn parse_spins(input: &str) -> Result<Vec<u8>> {
    tokens(input)
        .enumerate()
        .map(|(i, token)| {
            let n = token
                .parse::<u8>()
                .with_context(|| format!("Tirage {} invalide : '{}'", i + 1, token))?;
            validate_spin(n)?;
            Ok(n)
        })
        .collect()
}

pub fn parse_outcomes(input: &str) -> Result<Vec<Outcome>> {
    tokens(input)
        .map(|token| match token.to_lowercase().as_str() {
            "w" | "g" | "win" | "gain" => Ok(Outcome::Win),
            "l" | "p" | "loss" | "perte" => Ok(Outcome::Loss),
            "n" | "push" | "nul" => Ok(Outcome::Push),
            other => bail!("Issue inconnue : '{}' (attendu : g, p ou n)", other),
        })
        .collect()
}

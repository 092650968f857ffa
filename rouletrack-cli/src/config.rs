use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use rouletrack_core::progression::SystemConfig;
use rouletrack_core::session::Session;
use rouletrack_core::settlement::BetType;

/// Configuration d'une session de jeu : système global, séquence des groupes et mises jouées.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub system: SystemConfig,
    /// Unités appliquées à chaque catégorie selon sa position.
    pub group_sequence: Vec<f64>,
    pub bets: Vec<BetType>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            system: SystemConfig::default(),
            group_sequence: vec![1.0, 2.0, 4.0, 8.0],
            bets: vec![BetType::Red, BetType::Dozen(3)],
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bets.is_empty() {
            bail!("Aucune mise configurée");
        }
        for bet in &self.bets {
            bet.validate()?;
        }
        if self.group_sequence.iter().any(|u| !u.is_finite() || *u <= 0.0) {
            bail!("La séquence des groupes doit contenir des unités positives");
        }
        Ok(())
    }

    pub fn session(&self) -> Session {
        Session::new(self.system.build(), self.group_sequence.clone())
    }
}

pub fn save_config(config: &SessionConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<SessionConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let config: SessionConfig = serde_json::from_str(&json)
        .with_context(|| format!("Configuration invalide : {:?}", path))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rouletrack_core::progression::rules::SequentialRules;
    use rouletrack_core::progression::SystemKind;

    #[test]
    fn test_default_config_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session().system.kind, SystemKind::Martingale);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = SessionConfig {
            system: SystemConfig {
                kind: SystemKind::CustomSequential(SequentialRules::default()),
                base_bet: Some(2.0),
            },
            group_sequence: vec![1.0, 3.0],
            bets: vec![BetType::Column(2), BetType::Straight(17)],
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_invalid_bet_rejected() {
        let config = SessionConfig {
            bets: vec![BetType::Dozen(4)],
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("rouletrack-config-{}.json", std::process::id()));
        let config = SessionConfig::default();
        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_malformed_system_falls_back_to_flat() {
        let json = r#"{
            "system": {"kind": "martingale", "base_bet": -3.0},
            "group_sequence": [1.0],
            "bets": ["red"]
        }"#;
        let config: SessionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.session().system.kind, SystemKind::Flat);
    }

    #[test]
    fn test_unknown_system_kind_still_loads() {
        let path = std::env::temp_dir().join(format!("rouletrack-unknown-{}.json", std::process::id()));
        let json = r#"{
            "system": {"kind": "labouchere", "base_bet": 5.0},
            "group_sequence": [1.0, 2.0],
            "bets": ["black"]
        }"#;
        std::fs::write(&path, json).unwrap();
        let loaded = load_config(&path);
        std::fs::remove_file(&path).ok();
        let session = loaded.unwrap().session();
        assert_eq!(session.system.kind, SystemKind::Flat);
        assert_eq!(session.system.stake(), 1.0);
    }
}

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub const MAX_NUMBER: u8 = 36;
/// Nombre de cases du cylindre (0 à 36).
pub const POCKETS: usize = 37;

pub const RED_NUMBERS: [u8; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Spin(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Range {
    Low,
    High,
}

impl Spin {
    pub fn new(number: u8) -> Result<Self> {
        validate_spin(number)?;
        Ok(Spin(number))
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn color(&self) -> Color {
        match self.0 {
            0 => Color::Green,
            n if RED_NUMBERS.contains(&n) => Color::Red,
            _ => Color::Black,
        }
    }

    pub fn parity(&self) -> Option<Parity> {
        match self.0 {
            0 => None,
            n if n % 2 == 0 => Some(Parity::Even),
            _ => Some(Parity::Odd),
        }
    }

    pub fn range(&self) -> Option<Range> {
        match self.0 {
            0 => None,
            1..=18 => Some(Range::Low),
            _ => Some(Range::High),
        }
    }

    /// Douzaine 1, 2 ou 3.
    pub fn dozen(&self) -> Option<u8> {
        match self.0 {
            0 => None,
            n => Some((n - 1) / 12 + 1),
        }
    }

    /// Colonne d'après `n % 3` : reste 1 → colonne 1, reste 2 → colonne 2, reste 0 → colonne 3.
    pub fn column(&self) -> Option<u8> {
        match self.0 {
            0 => None,
            n => match n % 3 {
                0 => Some(3),
                r => Some(r),
            },
        }
    }
}

impl TryFrom<u8> for Spin {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self> {
        Spin::new(value)
    }
}

impl From<Spin> for u8 {
    fn from(spin: Spin) -> u8 {
        spin.0
    }
}

impl std::fmt::Display for Spin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Red => write!(f, "ROUGE"),
            Color::Black => write!(f, "NOIR"),
            Color::Green => write!(f, "VERT"),
        }
    }
}

pub fn validate_spin(number: u8) -> Result<()> {
    if number > MAX_NUMBER {
        bail!("Numéro {} hors limites (0-36)", number);
    }
    Ok(())
}

/// Issue d'une mise résolue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Push,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "GAIN"),
            Outcome::Loss => write!(f, "PERTE"),
            Outcome::Push => write!(f, "NUL"),
        }
    }
}

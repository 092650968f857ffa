use crate::models::{POCKETS, RED_NUMBERS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupFamily {
    Binary,
    Dozen,
    Column,
    SixLine,
    Third,
    Nine,
    Sector,
    Zero,
}

/// Sous-ensemble nommé et figé des numéros 0..36. Les groupes se chevauchent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    pub name: &'static str,
    pub family: GroupFamily,
    pub numbers: &'static [u8],
}

impl Group {
    pub fn size(&self) -> usize {
        self.numbers.len()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }

    /// Probabilité théorique d'un tirage dans le groupe (taille / 37).
    pub fn probability(&self) -> f64 {
        self.size() as f64 / POCKETS as f64
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

const BLACK_NUMBERS: [u8; 18] = [2, 4, 6, 8, 10, 11, 13, 15, 17, 20, 22, 24, 26, 28, 29, 31, 33, 35];
const EVEN_NUMBERS: [u8; 18] = [2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22, 24, 26, 28, 30, 32, 34, 36];
const ODD_NUMBERS: [u8; 18] = [1, 3, 5, 7, 9, 11, 13, 15, 17, 19, 21, 23, 25, 27, 29, 31, 33, 35];
const LOW_NUMBERS: [u8; 18] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18];
const HIGH_NUMBERS: [u8; 18] = [19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36];

const DOZEN_1: [u8; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
const DOZEN_2: [u8; 12] = [13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24];
const DOZEN_3: [u8; 12] = [25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36];

const COLUMN_1: [u8; 12] = [1, 4, 7, 10, 13, 16, 19, 22, 25, 28, 31, 34];
const COLUMN_2: [u8; 12] = [2, 5, 8, 11, 14, 17, 20, 23, 26, 29, 32, 35];
const COLUMN_3: [u8; 12] = [3, 6, 9, 12, 15, 18, 21, 24, 27, 30, 33, 36];

const SIX_LINE_1: [u8; 6] = [1, 2, 3, 4, 5, 6];
const SIX_LINE_2: [u8; 6] = [7, 8, 9, 10, 11, 12];
const SIX_LINE_3: [u8; 6] = [13, 14, 15, 16, 17, 18];
const SIX_LINE_4: [u8; 6] = [19, 20, 21, 22, 23, 24];
const SIX_LINE_5: [u8; 6] = [25, 26, 27, 28, 29, 30];
const SIX_LINE_6: [u8; 6] = [31, 32, 33, 34, 35, 36];

// Tiers : transversales regroupées selon (n - 1) / 3 modulo 3
const THIRD_A: [u8; 12] = [1, 2, 3, 10, 11, 12, 19, 20, 21, 28, 29, 30];
const THIRD_B: [u8; 12] = [4, 5, 6, 13, 14, 15, 22, 23, 24, 31, 32, 33];
const THIRD_C: [u8; 12] = [7, 8, 9, 16, 17, 18, 25, 26, 27, 34, 35, 36];

const NINE_1: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
const NINE_2: [u8; 9] = [10, 11, 12, 13, 14, 15, 16, 17, 18];
const NINE_3: [u8; 9] = [19, 20, 21, 22, 23, 24, 25, 26, 27];
const NINE_4: [u8; 9] = [28, 29, 30, 31, 32, 33, 34, 35, 36];

// Secteurs du cylindre européen
const VOISINS: [u8; 17] = [22, 18, 29, 7, 28, 12, 35, 3, 26, 0, 32, 15, 19, 4, 21, 2, 25];
const TIERS: [u8; 12] = [27, 13, 36, 11, 30, 8, 23, 10, 5, 24, 16, 33];
const ORPHELINS: [u8; 8] = [1, 20, 14, 31, 9, 17, 34, 6];
const JEU_ZERO: [u8; 7] = [12, 35, 3, 26, 0, 32, 15];

const ZERO: [u8; 1] = [0];

/// Nombre de groupes utilisés par le prédicteur (tête du catalogue).
pub const PREDICTOR_GROUP_COUNT: usize = 25;

pub const CATALOG: [Group; 30] = [
    Group { name: "Rouge", family: GroupFamily::Binary, numbers: &RED_NUMBERS },
    Group { name: "Noir", family: GroupFamily::Binary, numbers: &BLACK_NUMBERS },
    Group { name: "Pair", family: GroupFamily::Binary, numbers: &EVEN_NUMBERS },
    Group { name: "Impair", family: GroupFamily::Binary, numbers: &ODD_NUMBERS },
    Group { name: "Manque", family: GroupFamily::Binary, numbers: &LOW_NUMBERS },
    Group { name: "Passe", family: GroupFamily::Binary, numbers: &HIGH_NUMBERS },
    Group { name: "Douzaine 1", family: GroupFamily::Dozen, numbers: &DOZEN_1 },
    Group { name: "Douzaine 2", family: GroupFamily::Dozen, numbers: &DOZEN_2 },
    Group { name: "Douzaine 3", family: GroupFamily::Dozen, numbers: &DOZEN_3 },
    Group { name: "Colonne 1", family: GroupFamily::Column, numbers: &COLUMN_1 },
    Group { name: "Colonne 2", family: GroupFamily::Column, numbers: &COLUMN_2 },
    Group { name: "Colonne 3", family: GroupFamily::Column, numbers: &COLUMN_3 },
    Group { name: "Sixain 1", family: GroupFamily::SixLine, numbers: &SIX_LINE_1 },
    Group { name: "Sixain 2", family: GroupFamily::SixLine, numbers: &SIX_LINE_2 },
    Group { name: "Sixain 3", family: GroupFamily::SixLine, numbers: &SIX_LINE_3 },
    Group { name: "Sixain 4", family: GroupFamily::SixLine, numbers: &SIX_LINE_4 },
    Group { name: "Sixain 5", family: GroupFamily::SixLine, numbers: &SIX_LINE_5 },
    Group { name: "Sixain 6", family: GroupFamily::SixLine, numbers: &SIX_LINE_6 },
    Group { name: "Tiers A", family: GroupFamily::Third, numbers: &THIRD_A },
    Group { name: "Tiers B", family: GroupFamily::Third, numbers: &THIRD_B },
    Group { name: "Tiers C", family: GroupFamily::Third, numbers: &THIRD_C },
    Group { name: "Neuf 1-9", family: GroupFamily::Nine, numbers: &NINE_1 },
    Group { name: "Neuf 10-18", family: GroupFamily::Nine, numbers: &NINE_2 },
    Group { name: "Neuf 19-27", family: GroupFamily::Nine, numbers: &NINE_3 },
    Group { name: "Neuf 28-36", family: GroupFamily::Nine, numbers: &NINE_4 },
    Group { name: "Voisins du Zéro", family: GroupFamily::Sector, numbers: &VOISINS },
    Group { name: "Tiers du Cylindre", family: GroupFamily::Sector, numbers: &TIERS },
    Group { name: "Orphelins", family: GroupFamily::Sector, numbers: &ORPHELINS },
    Group { name: "Jeu Zéro", family: GroupFamily::Sector, numbers: &JEU_ZERO },
    Group { name: "Zéro", family: GroupFamily::Zero, numbers: &ZERO },
];

pub fn all_groups() -> &'static [Group] {
    &CATALOG
}

pub fn predictor_groups() -> &'static [Group] {
    &CATALOG[..PREDICTOR_GROUP_COUNT]
}

pub fn find_group(name: &str) -> Option<&'static Group> {
    CATALOG.iter().find(|g| g.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Color, Spin};

    #[test]
    fn test_groups_are_valid_subsets() {
        for group in all_groups() {
            assert!(!group.numbers.is_empty(), "{} vide", group.name);
            assert!(group.numbers.iter().all(|&n| n <= 36), "{} hors limites", group.name);
            let mut sorted = group.numbers.to_vec();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), group.size(), "{} contient des doublons", group.name);
        }
    }

    #[test]
    fn test_group_sizes_by_family() {
        for group in all_groups() {
            let expected = match group.family {
                GroupFamily::Binary => Some(18),
                GroupFamily::Dozen | GroupFamily::Column | GroupFamily::Third => Some(12),
                GroupFamily::SixLine => Some(6),
                GroupFamily::Nine => Some(9),
                GroupFamily::Zero => Some(1),
                GroupFamily::Sector => None,
            };
            if let Some(size) = expected {
                assert_eq!(group.size(), size, "{}", group.name);
            }
        }
    }

    #[test]
    fn test_predictor_excludes_sectors() {
        assert_eq!(predictor_groups().len(), PREDICTOR_GROUP_COUNT);
        assert!(predictor_groups()
            .iter()
            .all(|g| g.family != GroupFamily::Sector && g.family != GroupFamily::Zero));
    }

    #[test]
    fn test_families_cover_table() {
        // Chaque famille hors secteurs partitionne 1..36
        for family in [GroupFamily::Dozen, GroupFamily::Column, GroupFamily::SixLine, GroupFamily::Third, GroupFamily::Nine] {
            let mut covered: Vec<u8> = all_groups()
                .iter()
                .filter(|g| g.family == family)
                .flat_map(|g| g.numbers.iter().copied())
                .collect();
            covered.sort();
            assert_eq!(covered, (1..=36).collect::<Vec<u8>>(), "{:?}", family);
        }
    }

    #[test]
    fn test_sectors_cover_wheel() {
        let mut covered: Vec<u8> = ["Voisins du Zéro", "Tiers du Cylindre", "Orphelins"]
            .iter()
            .filter_map(|name| find_group(name))
            .flat_map(|g| g.numbers.iter().copied())
            .collect();
        covered.sort();
        assert_eq!(covered, (0..=36).collect::<Vec<u8>>());
    }

    #[test]
    fn test_groups_agree_with_spin_properties() {
        let red = find_group("Rouge").unwrap();
        let column_3 = find_group("Colonne 3").unwrap();
        for n in 0..=36u8 {
            let spin = Spin::new(n).unwrap();
            assert_eq!(red.contains(n), spin.color() == Color::Red);
            assert_eq!(column_3.contains(n), spin.column() == Some(3));
        }
    }
}

use crate::models::Outcome;

/// Gains consécutifs qui ramènent une progression de groupe au début.
pub const GROUP_RESET_WINS: u32 = 2;

/// Progression isolée d'une catégorie de mise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupProgression {
    pub position: usize,
    pub consecutive_wins: u32,
    pub last_outcome: Option<Outcome>,
}

impl GroupProgression {
    /// Mise de la catégorie : base × unité à la position courante.
    pub fn stake(&self, base_bet: f64, sequence: &[f64]) -> f64 {
        let unit = sequence
            .get(self.position)
            .or_else(|| sequence.last())
            .copied()
            .unwrap_or(1.0);
        base_bet * unit
    }
}

pub fn advance_group_progression(tracker: &GroupProgression, won: bool, sequence: &[f64]) -> GroupProgression {
    let last = sequence.len().saturating_sub(1);
    if won {
        let wins = tracker.consecutive_wins + 1;
        if wins >= GROUP_RESET_WINS {
            GroupProgression {
                position: 0,
                consecutive_wins: 0,
                last_outcome: Some(Outcome::Win),
            }
        } else {
            GroupProgression {
                position: tracker.position.min(last),
                consecutive_wins: wins,
                last_outcome: Some(Outcome::Win),
            }
        }
    } else {
        GroupProgression {
            position: (tracker.position + 1).min(last),
            consecutive_wins: 0,
            last_outcome: Some(Outcome::Loss),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_loss_win_win() {
        let sequence = [1.0, 2.0, 4.0, 8.0];
        let mut tracker = GroupProgression::default();
        let mut positions = vec![tracker.position];
        for won in [false, false, true, true] {
            tracker = advance_group_progression(&tracker, won, &sequence);
            positions.push(tracker.position);
        }
        assert_eq!(positions, vec![0, 1, 2, 2, 0]);
        assert_eq!(tracker.consecutive_wins, 0);
        assert_eq!(tracker.last_outcome, Some(Outcome::Win));
    }

    #[test]
    fn test_position_clamped() {
        let sequence = [1.0, 2.0];
        let mut tracker = GroupProgression::default();
        for _ in 0..5 {
            tracker = advance_group_progression(&tracker, false, &sequence);
        }
        assert_eq!(tracker.position, 1);
        assert_eq!(tracker.stake(10.0, &sequence), 20.0);
    }

    #[test]
    fn test_loss_breaks_win_streak() {
        let sequence = [1.0, 2.0, 4.0];
        let tracker = GroupProgression { position: 2, consecutive_wins: 0, last_outcome: None };
        let tracker = advance_group_progression(&tracker, true, &sequence);
        let tracker = advance_group_progression(&tracker, false, &sequence);
        assert_eq!(tracker.consecutive_wins, 0);
        let tracker = advance_group_progression(&tracker, true, &sequence);
        assert_eq!(tracker.position, 2);
    }

    #[test]
    fn test_empty_sequence() {
        let tracker = advance_group_progression(&GroupProgression::default(), false, &[]);
        assert_eq!(tracker.position, 0);
        assert_eq!(tracker.stake(5.0, &[]), 5.0);
    }
}

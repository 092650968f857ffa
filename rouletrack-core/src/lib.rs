pub mod models;
pub mod groups;
pub mod stats;
pub mod convergence;
pub mod predictor;
pub mod progression;
pub mod settlement;
pub mod session;

pub use convergence::{calculate_convergence, convergence_strength};
pub use predictor::score_groups;
pub use progression::group::advance_group_progression;
pub use progression::{advance, next_bet};

//! Adaptive learning engine.
//!
//! Each operation loads its inputs through `tutor_db`, applies the rules from
//! `tutor_adaptive` and, for progress aggregation only, writes the result back.
//! Reads take a `&mut PgConnection` so callers can run them on a pooled
//! connection or inside their own transaction. Storage errors propagate
//! unchanged as `sqlx::Error`.

pub mod difficulty;
pub mod progress;
pub mod prompt;
pub mod streak;
pub mod weak_areas;

pub use difficulty::get_adapted_difficulty;
pub use progress::update_user_progress;
pub use prompt::generate_personalized_prompt;
pub use streak::calculate_streak;
pub use weak_areas::identify_weak_areas;

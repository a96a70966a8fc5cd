//! Adaptive learning rules for the language tutor
//!
//! This crate holds the pure decision logic behind the tutor: proficiency tier
//! adaptation, weak-area ranking, prompt composition, daily/lifetime progress
//! folding and practice streaks. Nothing here touches the database; callers
//! load the inputs from the store and persist the outputs.

pub mod clock;
pub mod difficulty;
pub mod progress;
pub mod prompt;
pub mod session;
pub mod streak;
pub mod tier;
pub mod weak_areas;

pub use clock::{Clock, FixedClock, SystemClock};
pub use difficulty::{SessionPerformance, adapt_tier};
pub use progress::{DailyTotals, LifetimeTotals, SessionOutcome, Skill, incremental_mean};
pub use prompt::{PromptContext, compose_prompt};
pub use streak::current_streak;
pub use tier::Tier;
pub use weak_areas::{ErrorTypeCount, rank_error_types, top_weak_areas};

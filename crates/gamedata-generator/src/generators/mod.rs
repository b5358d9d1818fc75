//! Clean entity generators.
//!
//! Each generator is pure given the [`RandomContext`](crate::RandomContext)
//! and the plan: it draws every field from the context and never mutates
//! rows after creating them. Defects are added later by
//! [`DefectInjector`](crate::DefectInjector).

pub mod events;
pub mod players;
pub mod purchases;

pub use events::generate_events;
pub use players::generate_players;
pub use purchases::generate_purchases;

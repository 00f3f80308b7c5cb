//! sea-orm entities
pub mod cards;

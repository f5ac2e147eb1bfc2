//! The session store and its persistence.
//! The basic idea is:
//!  - [entities::Store] is the root document: projects, their counters, and
//!    their work sessions.
//!  - The whole document lives in a single named slot
//!    ([slot::SLOT_NAME]) and is rewritten after every mutating event.
//!  - Loads are tolerant: an absent or corrupt slot is an empty store, not
//!    an error.

pub mod entities;
pub mod slot;

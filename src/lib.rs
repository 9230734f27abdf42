//! Drill Master (workspace facade crate).
//!
//! Re-exports the member crates under one name:
//! `drill_master::{core, engine, input, term, types}`.

pub use drill_master_core as core;
pub use drill_master_engine as engine;
pub use drill_master_input as input;
pub use drill_master_term as term;
pub use drill_master_types as types;

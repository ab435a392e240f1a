//! Counterbalancing, expansion, blocking, and constrained shuffling for trial designs.

mod blocks;
mod expand;
mod factorial;
mod shuffle;

pub use blocks::add_block;
pub use expand::{expand, extend};
pub use factorial::{counterbalance, DesignRow, FactorMap};
pub use shuffle::smart_shuffle;

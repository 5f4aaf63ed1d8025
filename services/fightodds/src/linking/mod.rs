//! Fight record ↔ odds history linking
//!
//! This module implements the matching core:
//! 1. Normalizing fighter names and free-text dates
//! 2. Resolving a fighter name to its page on the odds site
//! 3. Extracting per-matchup odds observations from paired table rows
//! 4. Reconciling a fight record against the observation pools of both fighters

pub mod types;
pub mod names;
pub mod dates;
pub mod american;
pub mod similarity;
pub mod resolver;
pub mod extract;
pub mod reconcile;

pub use types::*;
pub use names::*;
pub use dates::*;
pub use american::*;
pub use similarity::*;
pub use resolver::*;
pub use extract::*;
pub use reconcile::*;

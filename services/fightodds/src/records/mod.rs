//! Fight record and roster files, and the reconciled output

pub mod fighters;
pub mod fights;
pub mod outputs;
pub mod ufcstats;

pub use fighters::*;
pub use fights::*;
pub use outputs::*;
pub use ufcstats::*;

pub mod error;
pub mod models;
pub mod validation;
pub mod tally;

pub use error::{Error, ErrorCode};
pub use models::*;
pub use validation::*;
pub use tally::{Tally, DeltaOutcome};

#[cfg(test)]
mod tests;

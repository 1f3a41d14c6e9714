mod challenge;
mod challenge_set;
mod language;

pub use challenge::*;
pub use challenge_set::*;
pub use language::*;

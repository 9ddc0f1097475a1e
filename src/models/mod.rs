// ============ Model implementations ============

pub(crate) mod robertuito;

// Public model structs and options (for type annotations)
pub use robertuito::{RobertuitoOptions, RobertuitoSentimentModel};

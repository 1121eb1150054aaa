//! Equipment crafting and the weighted option sampler behind it.
mod combine;
mod options;
mod selector;

pub use combine::{CraftError, CraftOutcome, combine_equipment};
pub use options::{OptionSelection, select_options};
pub use selector::{EmptySelection, Selection, WeightedSelector};

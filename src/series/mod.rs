// ============================================================================
// Series Module
// BBP term evaluation, stride partitioning and local accumulation
// ============================================================================

mod accumulator;
mod partition;
mod term;

pub use accumulator::{accumulate, PartialSum};
pub use partition::{owned_terms, StridePartition};
pub use term::{denominators, term, TermEvaluator};

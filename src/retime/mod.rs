/// Re-deriving one pair's handles over a new span.
pub mod pair;
/// Per-attribute retiming plans.
pub mod plan;
pub mod retarget;

use indexmap::IndexMap;

/// Elapsed time printed for one libm function, kept as the raw log token.
pub type Timing = String;

/// Measurements of a single target, keyed by function name in the order they
/// were first seen in the target's output file.
pub type Measurements = IndexMap<String, Timing>;

/// Measurements for every target, in sorted file order.
pub type TargetTable = IndexMap<String, Measurements>;

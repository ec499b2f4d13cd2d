// ============================================================================
// Utilities Module
// Output formatting helpers
// ============================================================================

mod render;

pub use render::{DigitRenderer, CONTINUATION_INDENT, GROUPS_PER_LINE, GROUP_WIDTH};

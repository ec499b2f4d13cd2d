// ============================================================================
// Digit Renderer
// Lays out the fractional digits of the final sum for a terminal
// ============================================================================

use crate::numeric::{BigFixed, NumericResult};

/// Digits per space-separated group
pub const GROUP_WIDTH: usize = 10;

/// Groups per output line
pub const GROUPS_PER_LINE: usize = 5;

/// Prefix of every continuation line
pub const CONTINUATION_INDENT: &str = "  ";

/// Formats `integer.fraction` with grouped, wrapped fractional digits.
///
/// Digits are truncated, never rounded: the precision margin carried by the
/// sum only ever feeds digits that are cut off here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitRenderer {
    group_width: usize,
    groups_per_line: usize,
}

impl DigitRenderer {
    pub const fn new() -> Self {
        Self {
            group_width: GROUP_WIDTH,
            groups_per_line: GROUPS_PER_LINE,
        }
    }

    /// Builder method: digits per group (0 disables grouping)
    pub fn with_group_width(mut self, group_width: usize) -> Self {
        self.group_width = group_width;
        self
    }

    /// Builder method: groups per line (0 disables wrapping)
    pub fn with_groups_per_line(mut self, groups_per_line: usize) -> Self {
        self.groups_per_line = groups_per_line;
        self
    }

    /// Render `value` with exactly `digits` fractional digits.
    pub fn render(&self, value: &BigFixed, digits: usize) -> NumericResult<String> {
        let integer = value.integer_part()?;
        let fraction = value.fractional_digits(digits)?;
        Ok(format!("{}.{}", integer, self.layout(&fraction)))
    }

    /// Insert group separators and line breaks into a run of digits.
    pub fn layout(&self, digits: &str) -> String {
        if self.group_width == 0 {
            return digits.to_string();
        }

        let line_width = self.group_width.saturating_mul(self.groups_per_line);
        let len = digits.len();
        let mut out = String::with_capacity(len + len / self.group_width * 3);

        for (i, digit) in digits.chars().enumerate() {
            out.push(digit);
            let written = i + 1;
            if written % self.group_width != 0 || written == len {
                continue;
            }
            if line_width != 0 && written % line_width == 0 {
                out.push('\n');
                out.push_str(CONTINUATION_INDENT);
            } else {
                out.push(' ');
            }
        }

        out
    }
}

impl Default for DigitRenderer {
    fn default() -> Self {
        Self::new()
    }
}

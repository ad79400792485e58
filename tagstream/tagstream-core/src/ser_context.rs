/// Position reported alongside an event, used only for diagnostics.
///
/// Text readers report 1-based line/column. Binary readers report line 0 and
/// the byte offset of the event as the column.
///
/// The default, `(0, 0)`, stands for an unknown position. It has the same
/// coordinates as `at_offset(0)`, so a binary reader that can tell the two
/// apart re-locates errors raised without a position (flush failures).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SerContext {
    line: usize,
    column: usize,
}

impl SerContext {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Context for a binary source positioned at `offset`.
    pub const fn at_offset(offset: usize) -> Self {
        Self {
            line: 0,
            column: offset,
        }
    }

    pub const fn line(&self) -> usize {
        self.line
    }

    pub const fn column(&self) -> usize {
        self.column
    }
}

/// Default limit on open documents and arrays, the root included.
///
/// Typed decoding recurses once per open container, so this also bounds its
/// stack use.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 128;

/// Options for [`BsonReader`](crate::BsonReader) and
/// [`BsonCursor`](crate::BsonCursor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BsonDecodeOptions {
    max_nesting_depth: usize,
}

impl Default for BsonDecodeOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl BsonDecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `MaxNestingDepthExceeded` once more than `depth` containers
    /// are open at the same time. Raising it far past the default lets deep
    /// input exhaust the thread stack when deserializing into typed values.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }
}

//! Display limits.

/// Marker inserted where content was cut.
pub const ELLIPSIS: &str = "…";

/// Characters after which a top-level display value is truncated.
pub const MAX_CHARACTERS: usize = 1 << 16;

/// Characters after which a display value nested in a collection is truncated.
pub const MAX_CHARACTERS_NESTED: usize = 128;

/// Items rendered per collection, by nesting level. Collections nested deeper
/// than this table are fully elided.
pub const MAX_ITEMS_BY_LEVEL: [usize; 2] = [60, 20];

/// Character budget for a display value at `level`.
pub fn max_characters(level: usize) -> usize {
    if level == 0 {
        MAX_CHARACTERS
    } else {
        MAX_CHARACTERS_NESTED
    }
}

/// Print options handed to numeric-array libraries.
///
/// # Example
///
/// ```
/// use spyglass_core::options::ArrayPrintOptions;
///
/// let options = ArrayPrintOptions {
///     threshold: 100,
///     ..ArrayPrintOptions::default()
/// };
/// assert_eq!(options.edge_items, 9);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayPrintOptions {
    /// Characters per line before wrapping.
    ///
    /// Default: 1000
    pub max_line_width: usize,

    /// Element count above which arrays are summarized.
    ///
    /// Default: 20
    pub threshold: usize,

    /// Elements kept at each edge of a summarized axis.
    ///
    /// Default: 9
    pub edge_items: usize,

    /// Element separator.
    ///
    /// Default: `","`
    pub separator: &'static str,
}

impl Default for ArrayPrintOptions {
    fn default() -> Self {
        Self {
            max_line_width: 1000,
            threshold: 20,
            edge_items: 9,
            separator: ",",
        }
    }
}

//! Printing options

/// Options for [`Sheet::print_values_with`](crate::Sheet::print_values_with) and
/// [`Sheet::print_texts_with`](crate::Sheet::print_texts_with)
#[derive(Debug, Clone)]
pub struct PrintOptions {
    /// Separator between cells of a row (default: tab)
    pub delimiter: char,
    /// Written after every row (default: `"\n"`)
    pub line_terminator: &'static str,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            line_terminator: "\n",
        }
    }
}

impl PrintOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cell separator
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the row terminator
    pub fn with_line_terminator(mut self, line_terminator: &'static str) -> Self {
        self.line_terminator = line_terminator;
        self
    }
}

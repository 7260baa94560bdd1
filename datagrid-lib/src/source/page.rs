//! Page type returned by remote loaders.

/// One window of rows plus the total number of rows matching the view.
///
/// # Example
///
/// ```
/// use datagrid_lib::source::Page;
///
/// let page = Page::new(vec!["a", "b"], 42);
/// assert_eq!(page.len(), 2);
/// assert_eq!(page.total_count(), 42);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    rows: Vec<R>,
    total_count: usize,
}

impl<R> Page<R> {
    /// Creates a new page.
    pub fn new(rows: Vec<R>, total_count: usize) -> Self {
        Self { rows, total_count }
    }

    /// Creates an empty page with a zero count.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Returns a reference to the rows in this page.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Consumes the page and returns the rows.
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    /// Returns the total row count reported by the loader.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

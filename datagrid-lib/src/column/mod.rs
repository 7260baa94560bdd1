//! Column declarations, row actions and column normalization.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::model::GridRow;
use crate::options::GridOptions;

/// Field of the synthetic selection column.
pub const SELECTION_FIELD: &str = "__selection";

/// Field of the synthetic row-actions column.
pub const ACTIONS_FIELD: &str = "__actions";

/// Transforms a row into the text shown in a cell.
pub type Renderer<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// Orders two rows for a single column.
pub type Comparator<R> = Arc<dyn Fn(&R, &R) -> Ordering + Send + Sync>;

/// What a column is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// A declared column reading a row field.
    Data,
    /// The synthetic checkbox column of a selectable grid.
    Selection,
    /// The synthetic row-actions column.
    Actions,
}

/// Column configuration.
///
/// # Examples
///
/// ```
/// use datagrid_lib::column::Column;
/// use datagrid_lib::model::Record;
///
/// let columns: Vec<Column<Record>> = vec![
///     Column::new("id"),
///     Column::new("name").title("Name").sortable().filterable(),
///     Column::new("revenue").sortable().render(|row: &Record| {
///         format!("$ {}", row.get("revenue").map(|v| v.to_string()).unwrap_or_default())
///     }),
/// ];
/// ```
pub struct Column<R> {
    /// Key into the row.
    pub field: String,
    /// Header text. Defaults to the field.
    pub title: String,
    /// Kind of column.
    pub kind: ColumnKind,
    /// Whether clicking the header sorts by this column.
    pub sortable: bool,
    /// Whether the column shows a filter cell.
    pub filterable: bool,
    renderer: Option<Renderer<R>>,
    comparator: Option<Comparator<R>>,
}

impl<R> Column<R> {
    /// Create a new data column reading `field`.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            title: String::new(),
            kind: ColumnKind::Data,
            sortable: false,
            filterable: false,
            renderer: None,
            comparator: None,
        }
    }

    fn synthetic(field: &str, kind: ColumnKind) -> Self {
        Self {
            kind,
            ..Self::new(field)
        }
    }

    /// Set the header text.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Give the column a filter cell.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Render cells with a custom transform instead of the raw field value.
    ///
    /// Text column filters match against the rendered text.
    pub fn render(mut self, renderer: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Sort this column with a custom comparator (ascending order).
    pub fn sort_by(mut self, comparator: impl Fn(&R, &R) -> Ordering + Send + Sync + 'static) -> Self {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    /// Returns `true` for declared (non-synthetic) columns.
    pub fn is_data(&self) -> bool {
        self.kind == ColumnKind::Data
    }

    /// Returns the column's own comparator, if any.
    pub fn comparator(&self) -> Option<&Comparator<R>> {
        self.comparator.as_ref()
    }
}

impl<R: GridRow> Column<R> {
    /// Returns the text shown in this column's cell for `row`.
    pub fn render_cell(&self, row: &R) -> String {
        match &self.renderer {
            Some(render) => render(row),
            None => row.value(&self.field).to_string(),
        }
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            title: self.title.clone(),
            kind: self.kind,
            sortable: self.sortable,
            filterable: self.filterable,
            renderer: self.renderer.clone(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("field", &self.field)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("renderer", &self.renderer.is_some())
            .field("comparator", &self.comparator.is_some())
            .finish()
    }
}

/// A per-row action offered in the actions column.
pub struct RowAction<R> {
    /// Label, also used as the action's key.
    pub label: String,
    /// Tooltip text.
    pub tooltip: Option<String>,
    visible: Option<Arc<dyn Fn(&R) -> bool + Send + Sync>>,
}

impl<R> RowAction<R> {
    /// Create an action that is shown on every row.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tooltip: None,
            visible: None,
        }
    }

    /// Set the tooltip.
    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Only show the action on rows matching `predicate`.
    pub fn visible_when(mut self, predicate: impl Fn(&R) -> bool + Send + Sync + 'static) -> Self {
        self.visible = Some(Arc::new(predicate));
        self
    }

    /// Returns `true` if the action applies to `row`.
    pub fn is_visible_for(&self, row: &R) -> bool {
        self.visible.as_ref().is_none_or(|visible| visible(row))
    }
}

impl<R> Clone for RowAction<R> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            tooltip: self.tooltip.clone(),
            visible: self.visible.clone(),
        }
    }
}

impl<R> fmt::Debug for RowAction<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("label", &self.label)
            .field("tooltip", &self.tooltip)
            .finish_non_exhaustive()
    }
}

/// Normalizes declared columns into the final ordered column list.
///
/// Every declared column needs a unique, non-empty field. Titles default to
/// the field. A selection column is prepended when `options.selection` is set
/// and an actions column is appended when `actions` is non-empty.
pub fn normalize_columns<R>(
    declared: Vec<Column<R>>,
    options: &GridOptions,
    actions: &[RowAction<R>],
) -> Result<Vec<Column<R>>, ConfigError> {
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(declared.len() + 2);

    if options.selection {
        columns.push(Column::synthetic(SELECTION_FIELD, ColumnKind::Selection));
    }

    for (index, mut column) in declared.into_iter().enumerate() {
        let field = column.field.trim().to_string();
        if field.is_empty() {
            return Err(ConfigError::missing_field(index));
        }
        if !seen.insert(field.clone()) {
            return Err(ConfigError::duplicate_field(field));
        }
        column.field = field;
        column.kind = ColumnKind::Data;
        if column.title.is_empty() {
            column.title = column.field.clone();
        }
        columns.push(column);
    }

    if !actions.is_empty() {
        columns.push(Column::synthetic(ACTIONS_FIELD, ColumnKind::Actions));
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[test]
    fn test_titles_default_to_field() {
        let columns = normalize_columns::<Record>(
            vec![Column::new("name"), Column::new("age").title("Age")],
            &GridOptions::default(),
            &[],
        )
        .unwrap();

        assert_eq!(columns[0].title, "name");
        assert_eq!(columns[1].title, "Age");
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let err = normalize_columns::<Record>(
            vec![Column::new("name"), Column::new("  ")],
            &GridOptions::default(),
            &[],
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::MissingField { index: 1 }));
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let err = normalize_columns::<Record>(
            vec![Column::new("name"), Column::new("name")],
            &GridOptions::default(),
            &[],
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::DuplicateField { field } if field == "name"));
    }

    #[test]
    fn test_synthetic_columns() {
        let options = GridOptions::default().with_selection(true);
        let actions = vec![RowAction::<Record>::new("Edit")];
        let columns = normalize_columns(vec![Column::new("name")], &options, &actions).unwrap();

        let kinds: Vec<_> = columns.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ColumnKind::Selection, ColumnKind::Data, ColumnKind::Actions]
        );
        assert_eq!(columns[2].field, ACTIONS_FIELD);
    }

    #[test]
    fn test_render_cell_uses_renderer() {
        let row = Record::new().set("price", 12);
        let plain = Column::<Record>::new("price");
        let custom = Column::<Record>::new("price").render(|r| format!("{} EUR", r.value("price")));

        assert_eq!(plain.render_cell(&row), "12");
        assert_eq!(custom.render_cell(&row), "12 EUR");
    }

    #[test]
    fn test_action_visibility() {
        let action = RowAction::<Record>::new("Archive")
            .visible_when(|r| r.get_bool("active").ok().flatten() == Some(true));

        assert!(action.is_visible_for(&Record::new().set("active", true)));
        assert!(!action.is_visible_for(&Record::new().set("active", false)));
        assert!(RowAction::<Record>::new("View").is_visible_for(&Record::new()));
    }
}

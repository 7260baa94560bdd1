//! Filter types: per-column filters and the advanced predicate tree.

use serde::Deserialize;
use serde::Serialize;

use crate::model::Value;

/// A filter typed into a column's filter cell.
///
/// Text filters match case-insensitively anywhere in the cell's rendered text.
/// Exact filters compare the raw field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnFilter {
    /// Case-insensitive substring match on the cell text.
    Text(String),
    /// Equality on the field value.
    Exact(Value),
}

impl ColumnFilter {
    /// Returns `true` if this filter matches everything and can be dropped.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Exact(value) => value.is_null(),
        }
    }
}

impl From<&str> for ColumnFilter {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ColumnFilter {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for ColumnFilter {
    fn from(value: Value) -> Self {
        Self::Exact(value)
    }
}

/// An advanced filter condition.
///
/// Advanced filters are applied on top of the column filters. Static grids
/// evaluate them locally; remote loaders receive them verbatim in the
/// [`ViewState`](super::ViewState) and translate them for their backend.
///
/// # Example
///
/// ```
/// use datagrid_lib::view::Filter;
///
/// // Simple equality filter
/// let filter = Filter::eq("status", "active");
///
/// // Combined filter
/// let filter = Filter::and([
///     Filter::eq("status", "active"),
///     Filter::gt("revenue", 1_000_000),
/// ]);
///
/// // Using combinators
/// let filter = Filter::eq("status", "active")
///     .and_also(Filter::gt("revenue", 1_000_000));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Equality: `field == value`
    Eq(String, Value),
    /// Not equal: `field != value`
    Ne(String, Value),
    /// Greater than: `field > value`
    Gt(String, Value),
    /// Greater than or equal: `field >= value`
    Ge(String, Value),
    /// Less than: `field < value`
    Lt(String, Value),
    /// Less than or equal: `field <= value`
    Le(String, Value),
    /// Case-insensitive substring match.
    Contains(String, String),
    /// Case-insensitive prefix match.
    StartsWith(String, String),
    /// Case-insensitive suffix match.
    EndsWith(String, String),
    /// Field equals one of the values (multi-select).
    In(String, Vec<Value>),
    /// Field is null.
    IsNull(String),
    /// Field is not null.
    IsNotNull(String),
    /// A predicate registered by name on the grid, with its argument.
    Custom(String, Value),
    /// Logical AND of multiple filters.
    And(Vec<Filter>),
    /// Logical OR of multiple filters.
    Or(Vec<Filter>),
    /// Negation.
    Not(Box<Filter>),
}

impl Filter {
    /// Creates an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    /// Creates a not-equal filter.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ne(field.into(), value.into())
    }

    /// Creates a greater-than filter.
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Gt(field.into(), value.into())
    }

    /// Creates a greater-than-or-equal filter.
    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ge(field.into(), value.into())
    }

    /// Creates a less-than filter.
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Lt(field.into(), value.into())
    }

    /// Creates a less-than-or-equal filter.
    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Le(field.into(), value.into())
    }

    /// Creates a contains filter.
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Contains(field.into(), value.into())
    }

    /// Creates a starts-with filter.
    pub fn starts_with(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::StartsWith(field.into(), value.into())
    }

    /// Creates an ends-with filter.
    pub fn ends_with(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::EndsWith(field.into(), value.into())
    }

    /// Creates a membership filter.
    pub fn one_of<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Filter::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    /// Creates an is-null filter.
    pub fn is_null(field: impl Into<String>) -> Self {
        Filter::IsNull(field.into())
    }

    /// Creates an is-not-null filter.
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Filter::IsNotNull(field.into())
    }

    /// References a predicate registered with
    /// [`GridBuilder::predicate`](crate::GridBuilder::predicate).
    pub fn custom(name: impl Into<String>, argument: impl Into<Value>) -> Self {
        Filter::Custom(name.into(), argument.into())
    }

    /// Creates a logical AND of multiple filters.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(filters.into_iter().collect())
    }

    /// Creates a logical OR of multiple filters.
    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(filters.into_iter().collect())
    }

    /// Combines this filter with another using logical AND.
    pub fn and_also(self, other: Filter) -> Self {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            _ => Filter::And(vec![self, other]),
        }
    }

    /// Combines this filter with another using logical OR.
    pub fn or_else(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut filters) => {
                filters.push(other);
                Filter::Or(filters)
            }
            _ => Filter::Or(vec![self, other]),
        }
    }

    /// Negates this filter.
    pub fn not(self) -> Self {
        Filter::Not(Box::new(self))
    }

    /// Collects the names of every custom predicate referenced in the tree.
    pub fn custom_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_custom_names(&mut names);
        names
    }

    fn collect_custom_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Filter::Custom(name, _) => names.push(name),
            Filter::And(filters) | Filter::Or(filters) => {
                for filter in filters {
                    filter.collect_custom_names(names);
                }
            }
            Filter::Not(inner) => inner.collect_custom_names(names),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_also_flattens() {
        let filter = Filter::eq("a", 1)
            .and_also(Filter::eq("b", 2))
            .and_also(Filter::eq("c", 3));

        match filter {
            Filter::And(filters) => assert_eq!(filters.len(), 3),
            other => panic!("expected And, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_names_are_collected_through_nesting() {
        let filter = Filter::and([
            Filter::custom("overdue", true),
            Filter::or([Filter::eq("a", 1), Filter::custom("vip", Value::Null).not()]),
        ]);

        assert_eq!(filter.custom_names(), vec!["overdue", "vip"]);
    }

    #[test]
    fn test_empty_column_filters() {
        assert!(ColumnFilter::from("   ").is_empty());
        assert!(ColumnFilter::Exact(Value::Null).is_empty());
        assert!(!ColumnFilter::from("x").is_empty());
    }

    #[test]
    fn test_filter_serializes_for_remote_backends() {
        let json = serde_json::to_string(&Filter::one_of("status", ["open", "closed"])).unwrap();
        assert_eq!(json, r#"{"in":["status",["open","closed"]]}"#);
    }
}

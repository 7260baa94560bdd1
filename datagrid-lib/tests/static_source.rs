//! Integration tests for grids over in-memory rows.

use std::sync::Arc;
use std::sync::Mutex;

use datagrid_lib::column::Column;
use datagrid_lib::export::ExportScope;
use datagrid_lib::model::{GridRow, Record, Value};
use datagrid_lib::view::{Filter, SortDirection};
use datagrid_lib::{Grid, GridOptions};

fn people(count: i64) -> Vec<Record> {
    (0..count)
        .map(|i| {
            Record::new()
                .set("id", i)
                .set("name", format!("person {i:02}"))
                .set("team", if i % 2 == 0 { "even" } else { "odd" })
        })
        .collect()
}

fn grid(rows: Vec<Record>) -> Grid<Record> {
    let mut grid = Grid::builder(rows)
        .columns([
            Column::new("id").sortable(),
            Column::new("name").title("Name").sortable().filterable(),
            Column::new("team").filterable(),
        ])
        .identity_field("id")
        .options(
            GridOptions::default()
                .with_pagination(true)
                .with_rows_per_page(10)
                .with_selection(true),
        )
        .build()
        .unwrap();
    assert!(grid.mount().is_none());
    grid
}

fn ids(grid: &Grid<Record>) -> Vec<i64> {
    grid.visible_rows()
        .iter()
        .filter_map(|r| r.get_int("id").ok().flatten())
        .collect()
}

#[test]
fn test_twenty_five_rows_paged_by_ten() {
    let mut grid = grid(people(25));
    assert_eq!(grid.visible_rows().len(), 10);
    assert_eq!(grid.total_count(), 25);
    assert!(!grid.is_loading());

    assert!(grid.on_change_page(2).is_none());
    assert_eq!(grid.view().start_index(), 20);
    assert_eq!(grid.view().stop_index(), 29);
    assert_eq!(grid.page_info().visible_bounds(), Some((20, 24)));
    assert_eq!(grid.visible_rows().len(), 5);
    assert_eq!(ids(&grid), vec![20, 21, 22, 23, 24]);
}

#[test]
fn test_filter_then_clear_restores_count() {
    let mut grid = grid(people(25));

    grid.on_change_page(1);
    grid.on_change_filter("name", Some("PERSON 1".into()));
    assert_eq!(grid.view().page(), 0);
    assert_eq!(grid.total_count(), 10);

    grid.on_change_filter("name", None);
    assert_eq!(grid.total_count(), 25);
    assert!(grid.view().is_unfiltered());
}

#[test]
fn test_column_and_advanced_filters_combine() {
    let mut grid = grid(people(25));

    grid.on_change_filter("team", Some("even".into()));
    grid.on_apply_advanced_filters(Some(Filter::ge("id", 18)));
    assert_eq!(ids(&grid), vec![18, 20, 22, 24]);

    grid.on_apply_advanced_filters(None);
    assert_eq!(grid.total_count(), 13);
}

#[test]
fn test_sort_toggles_direction() {
    let mut grid = grid(people(25));

    grid.on_change_sort("id");
    assert_eq!(grid.view().sort_direction(), SortDirection::Asc);
    grid.on_change_sort("id");
    assert_eq!(grid.view().sort_direction(), SortDirection::Desc);
    assert_eq!(ids(&grid)[..3], [24, 23, 22]);

    grid.on_change_sort("id");
    assert_eq!(grid.view().sort_direction(), SortDirection::Asc);
    assert_eq!(ids(&grid)[..3], [0, 1, 2]);
}

#[test]
fn test_sort_func_applies_to_columns_without_comparator() {
    let mut grid = Grid::builder(people(5))
        .column(Column::new("name").sortable())
        .identity_field("id")
        .sort_func(|a: &Record, b: &Record, field: &str| b.value(field).compare(&a.value(field)))
        .build()
        .unwrap();
    grid.mount();

    grid.on_change_sort("name");
    assert_eq!(ids(&grid), vec![4, 3, 2, 1, 0]);
}

#[test]
fn test_selection_survives_paging_and_prunes_on_new_data() {
    let mut grid = grid(people(25));
    grid.on_toggle_select("3");
    grid.on_toggle_select("22");
    grid.on_change_page(2);
    grid.on_change_filter("team", Some("odd".into()));
    assert_eq!(grid.selection().selected(), vec!["22", "3"]);

    grid.set_data(people(10));
    assert_eq!(grid.selection().selected(), vec!["3"]);
    assert_eq!(grid.total_count(), 5);
}

#[test]
fn test_set_data_with_same_collection_is_noop() {
    let rows = Arc::new(people(12));
    let notified = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&notified);

    let mut grid = Grid::builder(Arc::clone(&rows))
        .column(Column::new("id"))
        .identity_field("id")
        .initial_selection(["100".to_string()])
        .on_select(move |_| *counter.lock().unwrap() += 1)
        .build()
        .unwrap();
    grid.mount();

    grid.set_data(Arc::clone(&rows));
    assert!(grid.selection().is_selected("100"));
    assert_eq!(*notified.lock().unwrap(), 0);

    grid.set_data(people(12));
    assert!(grid.selection().is_empty());
    assert_eq!(*notified.lock().unwrap(), 1);
}

#[test]
fn test_custom_predicate() {
    let mut grid = Grid::builder(people(25))
        .column(Column::new("id"))
        .identity_field("id")
        .predicate("divisible_by", |row: &Record, arg: &Value| {
            match (row.value("id"), arg) {
                (Value::Int(id), Value::Int(n)) if *n != 0 => id % n == 0,
                _ => false,
            }
        })
        .build()
        .unwrap();
    grid.mount();

    grid.on_apply_advanced_filters(Some(Filter::custom("divisible_by", 7)));
    assert_eq!(ids(&grid), vec![0, 7, 14, 21]);

    grid.on_apply_advanced_filters(Some(Filter::custom("unregistered", 7)));
    assert_eq!(grid.total_count(), 0);
}

#[test]
fn test_snapshot() {
    let mut grid = grid(people(25));
    grid.on_toggle_select("1");
    let snapshot = grid.snapshot();

    assert_eq!(snapshot.visible_rows.len(), 10);
    assert_eq!(snapshot.total_count, 25);
    assert!(!snapshot.loading);
    assert_eq!(snapshot.selection, vec!["1"]);
    assert_eq!(snapshot.page_info.page_count, 3);
    assert_eq!(snapshot.columns.len(), 4);
}

#[tokio::test]
async fn test_export_does_not_touch_view() {
    let mut grid = grid(people(25));
    grid.on_change_filter("team", Some("odd".into()));
    grid.on_change_sort("id");
    grid.on_change_sort("id");
    let before = grid.view().clone();

    let page = grid.export(ExportScope::CurrentPage).await;
    assert_eq!(page.len(), 10);

    let all = grid.export(ExportScope::AllFiltered).await;
    assert_eq!(all.len(), 12);
    assert_eq!(all[0].value("id"), Value::Int(23));

    let table = grid.export_table(ExportScope::AllFiltered).await;
    assert_eq!(table.headers, vec!["id", "Name", "team"]);
    assert_eq!(table.rows[0], vec!["23", "person 23", "odd"]);

    assert_eq!(grid.view(), &before);
}

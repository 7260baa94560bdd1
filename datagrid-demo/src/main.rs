mod paths;

use std::fs;
use std::fs::File;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use datagrid_lib::column::{Column, RowAction};
use datagrid_lib::engine::{Fetches, LocalPipeline};
use datagrid_lib::error::{ConfigError, LoaderError};
use datagrid_lib::export::ExportScope;
use datagrid_lib::model::{GridRow, Record, Value};
use datagrid_lib::source::{Page, RemoteLoader, Source};
use datagrid_lib::view::{Filter, ViewState};
use datagrid_lib::{Grid, GridOptions};
use log::{info, warn};
use simplelog::{Config, LevelFilter, WriteLogger};

const DEPARTMENTS: [&str; 4] = ["Engineering", "Sales", "Support", "Finance"];

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grid(#[from] datagrid_lib::error::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn init_logging() -> Result<(), DemoError> {
    let Some(path) = paths::log_file() else {
        eprintln!("No cache directory available, logging disabled");
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    WriteLogger::init(LevelFilter::Debug, Config::default(), File::create(&path)?)?;
    info!("Logging to {}", path.display());
    Ok(())
}

fn load_options() -> Result<GridOptions, DemoError> {
    let defaults = GridOptions::default()
        .with_pagination(true)
        .with_rows_per_page_options(vec![5, 10, 25])
        .with_selection(true);

    match paths::options_file() {
        Some(path) if path.exists() => {
            info!("Loading options from {}", path.display());
            Ok(GridOptions::from_json(&fs::read_to_string(path)?)?)
        }
        _ => Ok(defaults),
    }
}

fn employees(count: i64) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let month = u32::try_from(i % 12).unwrap_or(0) + 1;
            Record::new()
                .set("id", i)
                .set("name", format!("Employee {i:02}"))
                .set("department", DEPARTMENTS[(i as usize) % DEPARTMENTS.len()])
                .set("salary", 40_000 + (i * 1_750) % 60_000)
                .set("joined", Utc.with_ymd_and_hms(2020, month, 1, 9, 0, 0).single())
                .set("active", i % 5 != 0)
        })
        .collect()
}

fn columns() -> Vec<Column<Record>> {
    vec![
        Column::new("id").title("#").sortable(),
        Column::new("name").title("Name").sortable().filterable(),
        Column::new("department").title("Department").sortable().filterable(),
        Column::new("salary")
            .title("Salary")
            .sortable()
            .render(|row: &Record| format!("$ {}", row.value("salary"))),
        Column::new("joined").title("Joined").sortable().render(|row: &Record| {
            match row.value("joined") {
                Value::DateTime(joined) => joined.format("%Y-%m-%d").to_string(),
                other => other.to_string(),
            }
        }),
    ]
}

fn print_grid(title: &str, grid: &Grid<Record>) {
    let snapshot = grid.snapshot();
    let data: Vec<_> = snapshot.columns.iter().filter(|c| c.is_data()).collect();

    println!("\n== {title} ({:?}) ==", snapshot.mode);
    let headers: Vec<_> = data.iter().map(|c| format!("{:<14}", c.title)).collect();
    println!("    {}", headers.join(""));
    for row in snapshot.visible_rows {
        let mark = if grid.is_selected(row) { "[x]" } else { "[ ]" };
        let cells: Vec<_> = data
            .iter()
            .map(|c| format!("{:<14}", c.render_cell(row)))
            .collect();
        let actions: Vec<_> = grid.actions_for(row).iter().map(|a| a.label.as_str()).collect();
        println!("{mark} {} {}", cells.join(""), actions.join("/"));
    }

    let info = snapshot.page_info;
    println!(
        "{}-{} of {} (page {}/{}), selected: {:?}",
        info.from,
        info.to,
        info.total_count,
        info.page + 1,
        info.page_count.max(1),
        snapshot.selection
    );
}

async fn static_demo(options: &GridOptions) -> Result<(), DemoError> {
    let mut grid = Grid::builder(employees(23))
        .columns(columns())
        .identity_field("id")
        .options(options.clone())
        .action(RowAction::new("Edit"))
        .action(
            RowAction::new("Deactivate")
                .tooltip("Disable this account")
                .visible_when(|row: &Record| row.get_bool("active").ok().flatten() == Some(true)),
        )
        .on_select(|ids| info!("Selection changed: {} rows", ids.len()))
        .build()?;
    grid.mount();
    print_grid("Static: first page", &grid);

    grid.on_change_filter("department", Some("eng".into()));
    grid.on_change_sort("salary");
    grid.on_change_sort("salary");
    grid.on_toggle_select_all();
    print_grid("Static: engineering by salary, descending", &grid);

    grid.on_apply_advanced_filters(Some(Filter::ge("salary", 60_000)));
    print_grid("Static: engineering earning 60k or more", &grid);

    grid.set_viewport(true);
    grid.on_apply_advanced_filters(None);
    grid.on_show_more();
    print_grid("Static: narrow viewport after show more", &grid);

    let table = grid.export_table(ExportScope::AllFiltered).await;
    println!("\nExport:\n{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}

/// In-memory stand-in for a paged HTTP endpoint.
struct Directory {
    rows: Vec<Record>,
    pipeline: LocalPipeline<Record>,
}

impl Directory {
    fn new(count: i64) -> Self {
        Self {
            rows: employees(count),
            pipeline: LocalPipeline::new(Arc::new(columns())),
        }
    }
}

#[async_trait]
impl RemoteLoader<Record> for Directory {
    async fn load(&self, view: &ViewState) -> Result<Page<Record>, LoaderError> {
        // Later pages answer faster, so rapid paging resolves out of order.
        let latency = 120u64.saturating_sub(view.page() as u64 * 40);
        tokio::time::sleep(Duration::from_millis(latency)).await;

        let matching = self.pipeline.apply(&self.rows, view);
        let window = view.window();
        let end = window.end.min(matching.len());
        let rows = matching[window.start.min(end)..end].to_vec();
        Ok(Page::new(rows, matching.len()))
    }
}

async fn remote_demo(options: &GridOptions) -> Result<(), DemoError> {
    let mut grid = Grid::builder(Source::remote(Directory::new(64)))
        .columns(columns())
        .identity_field("id")
        .options(options.clone())
        .on_error(|err| warn!("Remote load failed: {err}"))
        .build()?;

    if let Some(fetch) = grid.mount() {
        let completion = fetch.await;
        grid.complete(completion);
    }
    print_grid("Remote: first page", &grid);

    let mut fetches = Fetches::new();
    fetches.push(grid.on_change_page(1));
    fetches.push(grid.on_change_page(2));
    fetches.push(grid.on_change_page(3));
    let applied = fetches.drain_into(&mut grid).await;
    info!("Applied {applied} of 3 remote results");
    print_grid("Remote: after rapid paging", &grid);

    let everything = grid.export(ExportScope::AllFiltered).await;
    println!(
        "\nRemote export: {} rows, payroll $ {}",
        everything.len(),
        payroll(&everything)?
    );
    Ok(())
}

fn payroll(rows: &[Record]) -> datagrid_lib::error::Result<i64> {
    let mut total = 0;
    for row in rows {
        total += row.get_int("salary")?.unwrap_or(0);
    }
    Ok(total)
}

async fn run() -> Result<(), DemoError> {
    init_logging()?;
    let options = load_options()?;
    static_demo(&options).await?;
    remote_demo(&options).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
    }
}

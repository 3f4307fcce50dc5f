//! Layout of the consolidated monthly report workbook.

use std::path::{Path, PathBuf};

use sales_core::calendar::format_date;
use sales_core::error::Result;
use sales_core::models::{GroupKey, MonthlyDataset, RankingEntry};
use sales_core::table::{Cell, Sheet, WorkbookWriter};
use tracing::info;

use crate::validator::REQUIRED_COLUMNS;

pub const CONSOLIDATED_SHEET: &str = "Datos_Consolidados";
pub const RANKING_SHEET: &str = "Ranking_Productos";

/// Consolidated rows: required columns, extra columns, then `RegionOrigen`
/// and `Total`. Dates are rendered `dd/mm/YYYY`.
pub fn consolidated_sheet(dataset: &MonthlyDataset) -> Sheet {
    let mut headers: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    headers.extend(dataset.extra_columns.iter().cloned());
    headers.push("RegionOrigen".to_string());
    headers.push("Total".to_string());

    let rows = dataset
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                Cell::Text(format_date(row.date)),
                Cell::Text(row.region.clone()),
                Cell::Text(row.salesperson.clone()),
                Cell::Text(row.product.clone()),
                Cell::Number(row.quantity),
                Cell::Number(row.unit_price),
            ];
            for name in &dataset.extra_columns {
                let value = row
                    .extra
                    .iter()
                    .find(|(n, _)| n == name)
                    .map(|(_, v)| v.clone())
                    .unwrap_or(Cell::Empty);
                cells.push(value);
            }
            cells.push(Cell::Text(row.region_origen.clone()));
            cells.push(Cell::Number(row.total));
            cells
        })
        .collect();

    Sheet {
        name: CONSOLIDATED_SHEET.to_string(),
        headers,
        rows,
    }
}

/// One row per product: `Product, Quantity, Total`.
pub fn ranking_sheet(ranking: &[RankingEntry]) -> Sheet {
    Sheet {
        name: RANKING_SHEET.to_string(),
        headers: vec!["Product".into(), "Quantity".into(), "Total".into()],
        rows: ranking
            .iter()
            .map(|e| {
                vec![
                    Cell::Text(e.product.clone()),
                    Cell::Number(e.total_quantity),
                    Cell::Number(e.total_amount),
                ]
            })
            .collect(),
    }
}

/// Write the report for `key` into `folder` and return its path.
pub fn write_report(
    writer: &dyn WorkbookWriter,
    folder: &Path,
    key: &GroupKey,
    dataset: &MonthlyDataset,
    ranking: &[RankingEntry],
) -> Result<PathBuf> {
    let path = folder.join(key.report_file_name());
    writer.write_workbook(&path, &[consolidated_sheet(dataset), ranking_sheet(ranking)])?;
    info!(
        "Report generated: {} ({} records, {} products)",
        path.display(),
        dataset.rows.len(),
        ranking.len()
    );
    Ok(path)
}

//! Conversion of the word list spreadsheet into comma-delimited text

use crate::Result;
use anyhow::Context;
use calamine::{open_workbook_auto, DataType, Range, Reader};
use csv_async::AsyncWriterBuilder;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// Convert the first worksheet of a spreadsheet into a CSV file
///
/// Every spreadsheet row becomes one CSV row, header rows included. Returns
/// the number of rows written.
pub async fn spreadsheet_to_csv(spreadsheet: &Path, csv: &Path) -> Result<usize> {
    // Spreadsheet decoding is blocking, keep it away from the async runtime
    let source = spreadsheet.to_path_buf();
    let rows = tokio::task::spawn_blocking(move || read_first_worksheet(source))
        .await
        .context("waiting for the spreadsheet decoder")??;
    log::info!(
        "Read {} rows from spreadsheet {}",
        rows.len(),
        spreadsheet.display()
    );

    // Write them down as CSV
    let context = || format!("writing converted word list to {}", csv.display());
    let file = File::create(csv).await.with_context(context)?;
    let mut writer = AsyncWriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .create_writer(file);
    for row in &rows {
        writer.write_record(row).await.with_context(context)?;
    }
    writer.flush().await.with_context(context)?;
    Ok(rows.len())
}

/// Load the cells of a workbook's first worksheet as text
fn read_first_worksheet(path: PathBuf) -> Result<Vec<Vec<String>>> {
    let context = || format!("opening spreadsheet {}", path.display());
    let mut workbook = open_workbook_auto(&path).with_context(context)?;
    let range = workbook
        .worksheet_range_at(0)
        .with_context(|| format!("spreadsheet {} has no worksheet", path.display()))?
        .with_context(context)?;
    Ok(range_to_rows(&range))
}

/// Turn a worksheet range into rows of text cells
pub fn range_to_rows(range: &Range<DataType>) -> Vec<Vec<String>> {
    range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect()
}

/// Textual rendition of a spreadsheet cell
fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::String(s) => s.clone(),
        other => other.to_string(),
    }
}

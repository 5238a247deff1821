use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::table_view::{TableView, column_titles};
use crate::io_utils::div::write_file_atomically;

pub fn csv_file_write(table: &dyn TableView, file: &Path) -> Result<()> {
    write_file_atomically(file, |out| {
        let mut writer = csv::Writer::from_writer(out);
        writer
            .write_record(column_titles(table))
            .with_context(|| anyhow!("writing CSV header to {file:?}"))?;
        for row in table.table_view_body() {
            writer
                .write_record(row.iter().map(|(val, _)| val.as_ref()))
                .with_context(|| anyhow!("writing CSV row to {file:?}"))?;
        }
        writer
            .flush()
            .with_context(|| anyhow!("writing to {file:?}"))?;
        Ok(())
    })
}

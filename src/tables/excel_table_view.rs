use std::{borrow::Cow, path::Path};

use anyhow::{Context, Result, anyhow};
use rust_xlsxwriter::{Color, Format, FormatAlign, workbook::Workbook};

use super::table_view::{ColumnFormatting, Highlight, TableView, Unit};
use crate::io_utils::div::{tmp_path_for, xrename};

/// Added to our own column width calculation, in characters.
const WIDTH_SAFETY_MARGIN_CHARS: f64 = 2.0;

fn text_width(s: &str) -> usize {
    s.split('\n').map(|s| s.chars().count()).max().unwrap_or(0)
}

fn colnum(i: usize) -> Result<u16> {
    u16::try_from(i).with_context(|| anyhow!("too many columns for excel"))
}

/// Write each table as a worksheet of a new workbook at `file`.
pub fn excel_file_write<'t>(
    tables: impl IntoIterator<Item = &'t (dyn TableView + 't)>,
    file: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();

    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(table.table_name()).with_context(|| {
            anyhow!(
                "trying to use table name as worksheet name: {:?}",
                table.table_name()
            )
        })?;

        let header = table.table_view_header();
        let header = (*header).as_ref();
        let mut column_widths: Vec<usize> = header.iter().map(|_| 1).collect();

        // Units go on a second line of the title cell
        let mut num_lines = 1;
        for (i, (label, unit, _)) in header.iter().enumerate() {
            let unit: Cow<str> = match unit {
                Unit::None | Unit::DimensionLess => "".into(),
                Unit::Named(unit) => format!("\n({unit})").into(),
            };
            let val = format!("{label}{unit}");
            column_widths[i] = column_widths[i].max(text_width(&val));
            num_lines = num_lines.max(val.split('\n').count());
            worksheet
                .write_with_format(0, colnum(i)?, &val, &Format::new().set_bold())
                .with_context(|| anyhow!("write title value {val:?}"))?;
        }
        let height = (num_lines * 15) as f64;
        worksheet
            .set_row_height(0, height)
            .with_context(|| anyhow!("setting height of title row to {height}"))?;

        for (rownum, row) in (1..).zip(table.table_view_body()) {
            for (i, (val, highlight)) in row.iter().enumerate() {
                let mut format = Format::new();
                if let Some((_, _, ColumnFormatting::Number)) = header.get(i) {
                    format = format.set_align(FormatAlign::Right);
                }
                match highlight {
                    Highlight::Neutral => (),
                    Highlight::Red => format = format.set_font_color(Color::Red),
                    Highlight::Green => format = format.set_font_color(Color::Green),
                }
                column_widths[i] = column_widths[i].max(text_width(val));
                worksheet
                    .write_with_format(rownum, colnum(i)?, val.as_ref(), &format)
                    .with_context(|| anyhow!("write value {val:?}"))?;
            }
        }

        for (i, ((_, _, formatting), num_chars)) in header.iter().zip(&column_widths).enumerate() {
            let width = match formatting {
                ColumnFormatting::String {
                    width_chars: Some(width),
                } => *width,
                ColumnFormatting::Number | ColumnFormatting::String { width_chars: None } => {
                    *num_chars as f64 + WIDTH_SAFETY_MARGIN_CHARS
                }
            };
            worksheet
                .set_column_width(colnum(i)?, width)
                .with_context(|| anyhow!("setting width of column {i} to {width}"))?;
        }
    }

    let file_tmp = tmp_path_for(file)?;
    workbook
        .save(&file_tmp)
        .with_context(|| anyhow!("saving to file {file_tmp:?}"))?;
    xrename(&file_tmp, file)
}

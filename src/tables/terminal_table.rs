//! Printing of tables to a terminal in human-readable format (padding
//! with spaces, ANSI sequences for formatting), or as tab-separated
//! values.

//! Does not escape anything in the fields, thus TSV output is
//! ambiguous if values contain tabs or newlines.

use std::io::Write;

use anyhow::{Result, anyhow, bail};
use itertools::Itertools;
use yansi::{Paint, Style};

use super::table_view::{Highlight, TableView, column_titles};

/// Capable of streaming, which requires defining the column widths
/// beforehand. If a value is wider than its column, a single space is
/// still printed before the next value. The last column does not need
/// a width and gets no padding.
pub struct TerminalTable {
    widths: Vec<usize>,
    titles: Vec<String>,
    padding: String,
    /// Whether to print tab-separated, without ANSI codes and
    /// padding.
    pub tsv_mode: bool,
}

const TITLE_STYLE: Style = Style::new().bold().italic();

fn highlight_style(highlight: Highlight) -> Option<Style> {
    match highlight {
        Highlight::Neutral => None,
        Highlight::Red => Some(Style::new().red()),
        Highlight::Green => Some(Style::new().green()),
    }
}

impl TerminalTable {
    /// The length of `widths` must be one less than that of `titles`.
    /// Appends a space to each title so that italic text is not
    /// clipped on terminals.
    pub fn new(widths: &[usize], titles: &[String], tsv_mode: bool) -> Self {
        let titles = titles
            .iter()
            .map(|title| {
                if tsv_mode {
                    title.clone()
                } else {
                    format!("{title} ")
                }
            })
            .collect();
        let max_width = widths.iter().max().copied().unwrap_or(0);
        Self {
            widths: widths.to_owned(),
            titles,
            padding: " ".repeat(max_width),
            tsv_mode,
        }
    }

    /// Column widths fitting the titles and all rows of `table`, plus
    /// one space.
    pub fn for_table_view(table: &dyn TableView, tsv_mode: bool) -> Self {
        let titles = column_titles(table);
        let mut widths: Vec<usize> = titles.iter().map(|t| t.chars().count() + 2).collect();
        for row in table.table_view_body() {
            for (width, (val, _)) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(val.chars().count() + 1);
            }
        }
        widths.pop();
        Self::new(&widths, &titles, tsv_mode)
    }

    fn write_row<V: AsRef<str>>(
        &self,
        row: &[V],
        styles: impl Fn(usize) -> Option<Style>,
        out: &mut impl Write,
    ) -> Result<()> {
        let lens = (self.widths.len(), row.len());
        if lens.0
            != lens
                .1
                .checked_sub(1)
                .ok_or_else(|| anyhow!("need at least 1 column"))?
        {
            bail!("widths.len != data.len - 1: {lens:?}")
        }

        for (i, either_or_both) in self.widths.iter().zip_longest(row).enumerate() {
            if self.tsv_mode && i > 0 {
                out.write_all(b"\t")?;
            }
            let Some(val) = either_or_both.as_ref().right() else {
                bail!("row shorter than widths")
            };
            let s = val.as_ref();
            let s_len = s.chars().count();
            match styles(i).filter(|_| !self.tsv_mode) {
                Some(style) => write!(out, "{}", s.paint(style))?,
                None => out.write_all(s.as_bytes())?,
            }

            if let Some(width) = either_or_both.left() {
                if !self.tsv_mode {
                    if *width > s_len {
                        out.write_all(self.padding[0..width - s_len].as_bytes())?;
                    } else {
                        // at least 1 space anyway
                        out.write_all(b" ")?;
                    }
                }
            }
        }
        out.write_all(b"\n")?;
        Ok(())
    }

    pub fn write_title_row(&self, out: &mut impl Write) -> Result<()> {
        self.write_row(&self.titles, |_| Some(TITLE_STYLE), out)
    }

    pub fn write_data_row<V: AsRef<str>>(
        &self,
        data: &[(V, Highlight)],
        out: &mut impl Write,
    ) -> Result<()> {
        let vals: Vec<&str> = data.iter().map(|(v, _)| v.as_ref()).collect();
        self.write_row(&vals, |i| highlight_style(data[i].1), out)
    }

    pub fn write_table_view(&self, table: &dyn TableView, out: &mut impl Write) -> Result<()> {
        self.write_title_row(out)?;
        for row in table.table_view_body() {
            self.write_data_row(&row[..], out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_tsv() -> Result<()> {
        let table = TerminalTable::new(&[5, 5], &["a".into(), "b".into(), "c".into()], true);
        let mut out = Vec::new();
        table.write_title_row(&mut out)?;
        table.write_data_row(
            &[
                ("1", Highlight::Neutral),
                ("2", Highlight::Green),
                ("3", Highlight::Red),
            ],
            &mut out,
        )?;
        assert_eq!(String::from_utf8(out)?, "a\tb\tc\n1\t2\t3\n");
        Ok(())
    }

    #[test]
    fn t_padding() -> Result<()> {
        yansi::disable();
        let table = TerminalTable::new(&[4, 3], &["a".into(), "b".into(), "c".into()], false);
        let mut out = Vec::new();
        table.write_data_row(
            &[
                ("xy", Highlight::Neutral),
                ("long", Highlight::Neutral),
                ("z", Highlight::Neutral),
            ],
            &mut out,
        )?;
        assert_eq!(String::from_utf8(out)?, "xy  long z\n");
        assert!(table.write_data_row(&[("x", Highlight::Neutral)], &mut Vec::new()).is_err());
        Ok(())
    }
}

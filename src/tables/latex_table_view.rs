//! LaTeX output using the booktabs rules (`\toprule` etc.); the
//! including document needs `\usepackage{booktabs}`.

use std::{io::Write, path::Path};

use anyhow::{Context, Result, anyhow};

use super::table_view::{ColumnFormatting, Highlight, TableView, column_titles};
use crate::io_utils::div::write_file_atomically;

pub fn latex_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '\\' => out.push_str(r"\textbackslash{}"),
            'μ' | 'µ' => out.push_str(r"$\mu$"),
            _ => out.push(c),
        }
    }
    out
}

/// The tabular environment for `table`. Green cells are set bold.
pub fn latex_tabular(table: &dyn TableView) -> String {
    let header = table.table_view_header();
    let alignment: String = (*header)
        .as_ref()
        .iter()
        .map(|(_, _, formatting)| match formatting {
            ColumnFormatting::Number => 'r',
            ColumnFormatting::String { .. } => 'l',
        })
        .collect();

    let row = |cells: Vec<String>| format!("{} \\\\\n", cells.join(" & "));

    let mut s = format!("\\begin{{tabular}}{{{alignment}}}\n\\toprule\n");
    s.push_str(&row(column_titles(table)
        .iter()
        .map(|t| latex_escape(t))
        .collect()));
    s.push_str("\\midrule\n");
    for cells in table.table_view_body() {
        s.push_str(&row(cells
            .iter()
            .map(|(val, highlight)| {
                let val = latex_escape(val);
                match highlight {
                    Highlight::Green => format!("\\textbf{{{val}}}"),
                    Highlight::Neutral | Highlight::Red => val,
                }
            })
            .collect()));
    }
    s.push_str("\\bottomrule\n\\end{tabular}\n");
    s
}

pub fn latex_file_write(table: &dyn TableView, file: &Path) -> Result<()> {
    let s = latex_tabular(table);
    write_file_atomically(file, |out| {
        out.write_all(s.as_bytes())
            .with_context(|| anyhow!("writing to {file:?}"))
    })
}

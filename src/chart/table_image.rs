//! A table view drawn as an image.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use plotters::{
    coord::Shift,
    prelude::*,
    style::{
        FontStyle,
        text_anchor::{HPos, Pos, VPos},
    },
};

use super::theme::Theme;
use crate::{
    io_utils::div::{produce_file_atomically, tmp_path_before_extension},
    tables::table_view::{ColumnFormatting, Highlight, TableView, column_titles},
};

const ROW_HEIGHT: i32 = 30;
const CELL_PADDING: i32 = 10;
const MARGIN: i32 = 20;

struct Layout {
    titles: Vec<String>,
    rows: Vec<Vec<(String, Highlight)>>,
    right_aligned: Vec<bool>,
    /// Left edge of each column, then the right edge of the table
    edges: Vec<i32>,
}

impl Layout {
    fn new(table: &dyn TableView, theme: &Theme) -> Self {
        let titles = column_titles(table);
        let header = table.table_view_header();
        let right_aligned = (*header)
            .as_ref()
            .iter()
            .map(|(_, _, f)| *f == ColumnFormatting::Number)
            .collect();
        let rows: Vec<Vec<(String, Highlight)>> = table
            .table_view_body()
            .map(|row| row.iter().map(|(v, h)| (v.to_string(), *h)).collect())
            .collect();

        // Approximate glyph width
        let char_width = (theme.label_font_size as i32 * 6 / 10).max(1);
        let mut edges = vec![MARGIN];
        for (i, title) in titles.iter().enumerate() {
            let chars = rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|(v, _)| v.chars().count())
                .chain([title.chars().count()])
                .max()
                .unwrap_or(0) as i32;
            let left = edges[edges.len() - 1];
            edges.push(left + chars * char_width + 2 * CELL_PADDING);
        }
        Layout {
            titles,
            rows,
            right_aligned,
            edges,
        }
    }

    fn size(&self) -> (u32, u32) {
        let width = self.edges[self.edges.len() - 1] + MARGIN;
        let height = (self.rows.len() as i32 + 1) * ROW_HEIGHT + 2 * MARGIN;
        (width.max(1) as u32, height as u32)
    }

    fn text_x(&self, i: usize) -> (i32, HPos) {
        if self.right_aligned.get(i).copied().unwrap_or(false) {
            (self.edges[i + 1] - CELL_PADDING, HPos::Right)
        } else {
            (self.edges[i] + CELL_PADDING, HPos::Left)
        }
    }
}

fn draw_table<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &Layout,
    theme: &Theme,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&RGBColor::from(theme.background))?;
    let font = theme.font_family.as_str();
    let left = layout.edges[0];
    let right = layout.edges[layout.edges.len() - 1];
    let row_top = |r: usize| MARGIN + r as i32 * ROW_HEIGHT;

    root.draw(&Rectangle::new(
        [(left, row_top(0)), (right, row_top(1))],
        RGBColor::from(theme.grid).filled(),
    ))?;
    for r in (2..=layout.rows.len()).step_by(2) {
        root.draw(&Rectangle::new(
            [(left, row_top(r)), (right, row_top(r + 1))],
            RGBColor::from(theme.grid).mix(0.35).filled(),
        ))?;
    }

    let cells = layout
        .titles
        .iter()
        .map(|t| (t.as_str(), Highlight::Neutral))
        .enumerate()
        .map(|(i, cell)| (0, i, cell, true))
        .chain(layout.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(i, (v, h))| (r + 1, i, (v.as_str(), *h), false))
        }));
    for (r, i, (text, highlight), bold) in cells {
        let (x, hpos) = layout.text_x(i);
        let color: RGBColor = match highlight {
            Highlight::Green => theme.faster.into(),
            Highlight::Red => theme.slower.into(),
            Highlight::Neutral => theme.text.into(),
        };
        let font_desc = if bold || highlight == Highlight::Green {
            (font, theme.label_font_size).into_font().style(FontStyle::Bold)
        } else {
            (font, theme.label_font_size).into_font()
        };
        root.draw(&Text::new(
            text,
            (x, row_top(r) + ROW_HEIGHT / 2),
            font_desc.color(&color).pos(Pos::new(hpos, VPos::Center)),
        ))?;
    }

    let bottom = row_top(layout.rows.len() + 1);
    for y in [row_top(0), row_top(1), bottom] {
        root.draw(&PathElement::new(
            vec![(left, y), (right, y)],
            RGBColor::from(theme.text).stroke_width(1),
        ))?;
    }
    Ok(())
}

/// Draw `table` into a PNG file at `path`.
pub fn table_image_write(table: &dyn TableView, theme: &Theme, path: &Path) -> Result<()> {
    let layout = Layout::new(table, theme);
    let tmp = tmp_path_before_extension(path)?;
    produce_file_atomically(path, &tmp, |tmp| {
        let root = BitMapBackend::new(tmp, layout.size()).into_drawing_area();
        draw_table(&root, &layout, theme)?;
        root.present()
            .with_context(|| anyhow!("writing image {tmp:?}"))?;
        Ok(())
    })
}

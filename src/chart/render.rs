//! Drawing resolved figures with plotters, to PNG and optionally SVG.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use super::{
    format::{format_ratio, format_value},
    resolve::{PanelData, ResolvedFigure, ResolvedPanel},
    spec::{Orientation, PanelKind, PanelSpec, Scale},
    theme::Theme,
};
use crate::{
    extract::{ScatterSeries, series::SeriesSet},
    info,
    io_utils::div::{produce_file_atomically, tmp_path_before_extension},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Height of the figure title area in pixels.
const TITLE_HEIGHT: u32 = 50;
/// Pixels per category row of horizontal bar charts.
const HORIZONTAL_ROW_HEIGHT: u32 = 28;
/// Longest category label shown unabridged.
const MAX_LABEL_CHARS: usize = 28;
/// Fraction of a category slot covered by its group of bars.
const GROUP_WIDTH: f64 = 0.8;

/// Mapping between data values and plot coordinates; log axes plot
/// log10 of the value.
#[derive(Debug, Clone, Copy)]
struct Axis {
    scale: Scale,
}

impl Axis {
    fn to_plot(self, value: f64) -> Option<f64> {
        match self.scale {
            Scale::Linear => value.is_finite().then_some(value),
            Scale::Log => (value > 0. && value.is_finite()).then(|| value.log10()),
        }
    }

    fn from_plot(self, value: f64) -> f64 {
        match self.scale {
            Scale::Linear => value,
            Scale::Log => 10f64.powf(value),
        }
    }

    /// Plot range covering `values`, including 0 on linear axes.
    fn range(self, values: &[f64]) -> (f64, f64) {
        match self.scale {
            Scale::Linear => {
                let max = values.iter().copied().fold(0., f64::max);
                let min = values.iter().copied().fold(0., f64::min);
                let hi = if max > 0. { max * 1.15 } else { 1. };
                let lo = if min < 0. { min * 1.15 } else { 0. };
                (lo, hi)
            }
            Scale::Log => {
                let plotted: Vec<f64> = values.iter().filter_map(|v| self.to_plot(*v)).collect();
                if plotted.is_empty() {
                    return (0., 1.);
                }
                let lo = plotted.iter().copied().fold(f64::INFINITY, f64::min).floor();
                let hi = plotted.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 0.3;
                (lo, if hi > lo { hi } else { lo + 1. })
            }
        }
    }

    /// Range for an axis that does not need to include 0.
    fn padded_range(self, values: &[f64]) -> (f64, f64) {
        let plotted: Vec<f64> = values.iter().filter_map(|v| self.to_plot(*v)).collect();
        let lo = plotted.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = plotted.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !(lo.is_finite() && hi.is_finite()) {
            return (0., 1.);
        }
        let pad = if hi > lo { (hi - lo) * 0.08 } else { 1. };
        (lo - pad, hi + pad)
    }

    fn label(self, value: f64) -> String {
        format_value(self.from_plot(value))
    }
}

fn shorten(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let mut s: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        s.push('…');
        s
    }
}

fn panel_height(panel: &ResolvedPanel, theme: &Theme) -> u32 {
    match (&panel.data, panel.spec.orientation) {
        (PanelData::Series(set), Orientation::Horizontal) => theme
            .panel_height
            .max(HORIZONTAL_ROW_HEIGHT * set.x_domain.len() as u32 + 140),
        _ => theme.panel_height,
    }
}

/// (rows, columns) for `n` panels laid out `columns` per row.
fn grid(n: usize, columns: usize) -> (usize, usize) {
    let columns = columns.clamp(1, n.max(1));
    (n.div_ceil(columns).max(1), columns)
}

fn figure_size(figure: &ResolvedFigure, theme: &Theme) -> (u32, u32) {
    let (rows, columns) = grid(figure.panels.len(), figure.spec.columns);
    let row_height = figure
        .panels
        .iter()
        .map(|p| panel_height(p, theme))
        .max()
        .unwrap_or(theme.panel_height);
    let title = if figure.spec.title.is_some() {
        TITLE_HEIGHT
    } else {
        0
    };
    (
        theme.panel_width * columns as u32,
        row_height * rows as u32 + title,
    )
}

/// Writes one file per format into `out_dir`, named after the
/// figure. Returns the paths written.
pub fn render_figure(
    figure: &ResolvedFigure,
    theme: &Theme,
    formats: &[ImageFormat],
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let size = figure_size(figure, theme);
    let mut paths = Vec::new();
    for format in formats {
        let path = out_dir.join(format!("{}.{}", figure.spec.name, format.extension()));
        let tmp = tmp_path_before_extension(&path)?;
        produce_file_atomically(&path, &tmp, |tmp| match format {
            ImageFormat::Png => draw_into(BitMapBackend::new(tmp, size), figure, theme, tmp),
            ImageFormat::Svg => draw_into(SVGBackend::new(tmp, size), figure, theme, tmp),
        })?;
        info!("wrote {path:?}");
        paths.push(path);
    }
    Ok(paths)
}

fn draw_into<DB: DrawingBackend>(
    backend: DB,
    figure: &ResolvedFigure,
    theme: &Theme,
    path: &Path,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    draw_figure(&root, figure, theme)?;
    root.present()
        .with_context(|| anyhow!("writing image {path:?}"))?;
    Ok(())
}

pub fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &ResolvedFigure,
    theme: &Theme,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&RGBColor::from(theme.background))?;
    let area = match &figure.spec.title {
        Some(title) => root.titled(
            title,
            (theme.font_family.as_str(), theme.title_font_size)
                .into_font()
                .color(&RGBColor::from(theme.text)),
        )?,
        None => root.clone(),
    };
    let cells = area.split_evenly(grid(figure.panels.len(), figure.spec.columns));
    for (panel, cell) in figure.panels.iter().zip(&cells) {
        draw_panel(cell, panel, theme)
            .with_context(|| anyhow!("drawing panel {:?}", panel.spec.title))?;
    }
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &ResolvedPanel,
    theme: &Theme,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    match &panel.data {
        PanelData::Series(set) => match panel.spec.kind {
            PanelKind::Lines => draw_lines(area, panel.spec, set, theme),
            PanelKind::Bars | PanelKind::Speedup | PanelKind::Scatter { .. } => {
                draw_bars(area, panel.spec, set, theme)
            }
        },
        PanelData::Scatter(series) => draw_scatter(area, panel.spec, series, theme),
    }
}

struct Bar {
    /// Position of the bar center on the category axis
    center: f64,
    value: f64,
    gap: bool,
    color: RGBColor,
    /// (low, high) data values
    error: Option<(f64, f64)>,
    series: usize,
}

struct BarLayout {
    labels: Vec<String>,
    series: Vec<(String, RGBColor)>,
    bars: Vec<Bar>,
    half_width: f64,
    axis: Axis,
    range: (f64, f64),
    horizontal: bool,
    speedup: bool,
}

impl BarLayout {
    fn new(spec: &PanelSpec, set: &SeriesSet, theme: &Theme) -> Self {
        let n = set.x_domain.len();
        let horizontal = spec.orientation == Orientation::Horizontal;
        let speedup = spec.kind == PanelKind::Speedup;
        let axis = Axis {
            scale: spec.y_scale,
        };
        let width = GROUP_WIDTH / set.series.len().max(1) as f64;

        let mut bars = Vec::new();
        let mut series = Vec::new();
        for (j, s) in set.series.iter().enumerate() {
            let color = theme.series_color(s.label.as_str(), j);
            series.push((s.label.to_uppercase(), color));
            for p in &s.points {
                let Some(i) = set.domain_index(&p.x) else {
                    continue;
                };
                let slot = (if horizontal { n - 1 - i } else { i }) as f64;
                let color = match (speedup, p.y >= 1.) {
                    (true, true) => theme.faster.into(),
                    (true, false) => theme.slower.into(),
                    (false, _) => color,
                };
                let error = spec
                    .error_bars
                    .and_then(|field| p.stats?.get(field))
                    .map(|e| (p.y - e, p.y + e));
                bars.push(Bar {
                    center: slot - GROUP_WIDTH / 2. + width * (j as f64 + 0.5),
                    value: p.y,
                    gap: p.gap,
                    color,
                    error,
                    series: j,
                });
            }
        }

        let mut values: Vec<f64> = bars
            .iter()
            .filter(|b| !b.gap)
            .flat_map(|b| [Some(b.value), b.error.map(|(_, hi)| hi)])
            .flatten()
            .collect();
        values.extend(spec.reference_line);
        let range = axis.range(&values);

        BarLayout {
            labels: set.x_labels().iter().map(|l| shorten(l)).collect(),
            series,
            bars,
            half_width: width / 2.,
            axis,
            range,
            horizontal,
            speedup,
        }
    }

    fn slots(&self) -> usize {
        self.labels.len()
    }

    fn category_range(&self) -> std::ops::Range<f64> {
        -0.5..(self.slots() as f64 - 0.5)
    }

    fn key_points(&self) -> Vec<f64> {
        (0..self.slots()).map(|i| i as f64).collect()
    }

    /// Label for a position on the category axis.
    fn category_label(&self, position: f64) -> String {
        let slot = position.round();
        if (position - slot).abs() > 1e-6 || slot < 0. {
            return String::new();
        }
        let slot = slot as usize;
        let i = if self.horizontal {
            match self.slots().checked_sub(slot + 1) {
                Some(i) => i,
                None => return String::new(),
            }
        } else {
            slot
        };
        self.labels.get(i).cloned().unwrap_or_default()
    }

    /// Plot coordinate where bars start.
    fn base(&self) -> f64 {
        match self.axis.scale {
            Scale::Linear => 0f64.clamp(self.range.0, self.range.1),
            Scale::Log => self.range.0,
        }
    }

    fn plot(&self, value: f64) -> f64 {
        self.axis
            .to_plot(value)
            .unwrap_or(self.range.0)
            .clamp(self.range.0, self.range.1)
    }
}

fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    spec: &PanelSpec,
    set: &SeriesSet,
    theme: &Theme,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let layout = BarLayout::new(spec, set, theme);
    let font = theme.font_family.as_str();
    let label_style = (font, theme.label_font_size)
        .into_font()
        .color(&RGBColor::from(theme.text));
    let longest_label = layout
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0) as u32;

    let mut builder = ChartBuilder::on(area);
    builder
        .caption(&spec.title, (font, theme.panel_title_font_size).into_font())
        .margin(12);

    let category_desc = spec.category_label();
    let value_desc = spec.value_label();

    if layout.horizontal {
        let mut chart = builder
            .x_label_area_size(45)
            .y_label_area_size(longest_label * theme.label_font_size * 6 / 10 + 20)
            .build_cartesian_2d(
                layout.range.0..layout.range.1,
                layout.category_range().with_key_points(layout.key_points()),
            )?;
        chart
            .configure_mesh()
            .disable_y_mesh()
            .light_line_style(RGBColor::from(theme.grid).mix(0.5))
            .bold_line_style(RGBColor::from(theme.grid))
            .label_style(label_style.clone())
            .x_label_formatter(&|v| layout.axis.label(*v))
            .y_label_formatter(&|c| layout.category_label(*c))
            .x_desc(value_desc)
            .draw()?;
        draw_bar_layout(&mut chart, &layout, spec, theme)?;
    } else {
        let mut chart = builder
            .x_label_area_size(if category_desc.is_empty() { 35 } else { 55 })
            .y_label_area_size(65)
            .build_cartesian_2d(
                layout.category_range().with_key_points(layout.key_points()),
                layout.range.0..layout.range.1,
            )?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(RGBColor::from(theme.grid).mix(0.5))
            .bold_line_style(RGBColor::from(theme.grid))
            .label_style(label_style.clone())
            .x_label_formatter(&|c| layout.category_label(*c))
            .y_label_formatter(&|v| layout.axis.label(*v))
            .x_desc(category_desc)
            .y_desc(value_desc)
            .draw()?;
        draw_bar_layout(&mut chart, &layout, spec, theme)?;
    }
    Ok(())
}

/// Bars, error bars, gap markers, annotations, reference line and
/// legend, for either orientation.
fn draw_bar_layout<'a, DB, X, Y>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<X, Y>>,
    layout: &BarLayout,
    spec: &PanelSpec,
    theme: &Theme,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    let horizontal = layout.horizontal;
    // (category, value) to chart coordinates
    let pt = |category: f64, value: f64| {
        if horizontal {
            (value, category)
        } else {
            (category, value)
        }
    };
    let base = layout.base();
    let accent = RGBColor::from(theme.accent);
    let font = theme.font_family.as_str();
    let annotation_pos = if horizontal {
        Pos::new(HPos::Left, VPos::Center)
    } else {
        Pos::new(HPos::Center, VPos::Bottom)
    };
    let annotation_style = (font, theme.label_font_size)
        .into_font()
        .color(&RGBColor::from(theme.text))
        .pos(annotation_pos);

    for (j, (label, color)) in layout.series.iter().enumerate() {
        let color = *color;
        let anno = chart.draw_series(
            layout
                .bars
                .iter()
                .filter(|b| b.series == j && !b.gap)
                .map(|b| {
                    let mut bar = Rectangle::new(
                        [
                            pt(b.center - layout.half_width, base),
                            pt(b.center + layout.half_width, layout.plot(b.value)),
                        ],
                        b.color.filled(),
                    );
                    bar.set_margin(0, 0, 1, 1);
                    bar
                }),
        )?;
        if !layout.speedup {
            anno.label(label.as_str()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
        }
    }

    let errors: Vec<(f64, f64, f64, f64)> = layout
        .bars
        .iter()
        .filter(|b| !b.gap)
        .filter_map(|b| {
            let (lo, hi) = b.error?;
            Some((
                b.center,
                layout.plot(lo),
                layout.plot(b.value),
                layout.plot(hi),
            ))
        })
        .collect();
    let error_style = RGBColor::from(theme.text).stroke_width(1);
    if horizontal {
        chart.draw_series(errors.iter().map(|(c, lo, v, hi)| {
            ErrorBar::new_horizontal(*c, *lo, *v, *hi, error_style, 6)
        }))?;
    } else {
        chart.draw_series(errors.iter().map(|(c, lo, v, hi)| {
            ErrorBar::new_vertical(*c, *lo, *v, *hi, error_style, 6)
        }))?;
    }

    chart.draw_series(layout.bars.iter().filter(|b| b.gap).map(|b| {
        Text::new(
            "no data".to_string(),
            pt(b.center, base),
            (font, theme.label_font_size.saturating_sub(3).max(6))
                .into_font()
                .color(&accent)
                .pos(annotation_pos),
        )
    }))?;

    if spec.annotate {
        chart.draw_series(layout.bars.iter().filter(|b| !b.gap).map(|b| {
            let text = if layout.speedup {
                format_ratio(b.value)
            } else {
                format_value(b.value)
            };
            Text::new(
                text,
                pt(b.center, layout.plot(b.value)),
                annotation_style.clone(),
            )
        }))?;
    }

    if let Some(at) = spec.reference_line.and_then(|v| layout.axis.to_plot(v)) {
        draw_dashed_line(
            chart,
            pt(-0.5, at),
            pt(layout.slots() as f64 - 0.5, at),
            accent,
        )?;
    }

    if layout.series.len() > 1 && !layout.speedup {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font((font, theme.label_font_size).into_font())
            .background_style(WHITE.mix(0.8))
            .border_style(RGBColor::from(theme.grid))
            .draw()?;
    }
    Ok(())
}

fn draw_dashed_line<DB, CT>(
    chart: &mut ChartContext<'_, DB, CT>,
    from: (f64, f64),
    to: (f64, f64),
    color: RGBColor,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    const DASHES: usize = 40;
    let at = |t: f64| (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
    chart.draw_series((0..DASHES).map(|k| {
        let t0 = k as f64 / DASHES as f64;
        let t1 = (k as f64 + 0.5) / DASHES as f64;
        PathElement::new(vec![at(t0), at(t1)], color.stroke_width(1))
    }))?;
    Ok(())
}

fn draw_lines<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    spec: &PanelSpec,
    set: &SeriesSet,
    theme: &Theme,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let x_axis = Axis {
        scale: spec.x_scale,
    };
    let y_axis = Axis {
        scale: spec.y_scale,
    };
    let numeric = set.x_domain.iter().all(|x| x.as_number().is_some());
    // Text x values are placed at their index.
    let x_of = |i: usize| -> Option<f64> {
        if numeric {
            x_axis.to_plot(set.x_domain[i].as_number()?)
        } else {
            Some(i as f64)
        }
    };

    let mut y_values = Vec::new();
    for s in &set.series {
        for p in s.data_points() {
            y_values.push(p.y);
            if let Some(e) = spec.error_bars.and_then(|f| p.stats?.get(f)) {
                y_values.push(p.y + e);
            }
        }
    }
    let (y_lo, y_hi) = y_axis.range(&y_values);
    let (x_lo, x_hi) = if numeric {
        let xs: Vec<f64> = set.x_domain.iter().filter_map(|x| x.as_number()).collect();
        x_axis.padded_range(&xs)
    } else {
        (-0.5, set.x_domain.len() as f64 - 0.5)
    };
    let labels = set.x_labels();

    let font = theme.font_family.as_str();
    let mut chart = ChartBuilder::on(area)
        .caption(&spec.title, (font, theme.panel_title_font_size).into_font())
        .margin(12)
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
    chart
        .configure_mesh()
        .light_line_style(RGBColor::from(theme.grid).mix(0.5))
        .bold_line_style(RGBColor::from(theme.grid))
        .label_style(
            (font, theme.label_font_size)
                .into_font()
                .color(&RGBColor::from(theme.text)),
        )
        .x_label_formatter(&|x| {
            if numeric {
                x_axis.label(*x)
            } else {
                let i = x.round();
                if (x - i).abs() < 1e-6 && i >= 0. {
                    labels.get(i as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            }
        })
        .y_label_formatter(&|y| y_axis.label(*y))
        .x_desc(spec.category_label())
        .y_desc(spec.value_label())
        .draw()?;

    for (j, s) in set.series.iter().enumerate() {
        let color = theme.series_color(s.label.as_str(), j);
        let points: Vec<((f64, f64), Option<(f64, f64)>)> = s
            .data_points()
            .filter_map(|p| {
                let i = set.domain_index(&p.x)?;
                let x = x_of(i)?;
                let y = y_axis.to_plot(p.y)?;
                let error = spec
                    .error_bars
                    .and_then(|f| p.stats?.get(f))
                    .map(|e| {
                        (
                            y_axis.to_plot(p.y - e).unwrap_or(y_lo),
                            y_axis.to_plot(p.y + e).unwrap_or(y_hi),
                        )
                    });
                Some(((x, y), error))
            })
            .collect();

        chart
            .draw_series(LineSeries::new(
                points.iter().map(|(xy, _)| *xy),
                color.stroke_width(2),
            ))?
            .label(s.label.to_uppercase())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        chart.draw_series(
            points
                .iter()
                .map(|(xy, _)| Circle::new(*xy, 4, color.filled())),
        )?;
        chart.draw_series(points.iter().filter_map(|((x, y), error)| {
            let (lo, hi) = (*error)?;
            Some(ErrorBar::new_vertical(*x, lo, *y, hi, color.stroke_width(1), 8))
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((font, theme.label_font_size).into_font())
        .background_style(WHITE.mix(0.8))
        .border_style(RGBColor::from(theme.grid))
        .draw()?;
    Ok(())
}

fn draw_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    spec: &PanelSpec,
    series: &[ScatterSeries],
    theme: &Theme,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let x_axis = Axis {
        scale: spec.x_scale,
    };
    let y_axis = Axis {
        scale: spec.y_scale,
    };
    let xs: Vec<f64> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(x, _)| *x))
        .collect();
    let ys: Vec<f64> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, y)| *y))
        .collect();
    let (x_lo, x_hi) = x_axis.padded_range(&xs);
    let (y_lo, y_hi) = y_axis.padded_range(&ys);

    let font = theme.font_family.as_str();
    let mut chart = ChartBuilder::on(area)
        .caption(&spec.title, (font, theme.panel_title_font_size).into_font())
        .margin(12)
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
    chart
        .configure_mesh()
        .light_line_style(RGBColor::from(theme.grid).mix(0.5))
        .bold_line_style(RGBColor::from(theme.grid))
        .label_style(
            (font, theme.label_font_size)
                .into_font()
                .color(&RGBColor::from(theme.text)),
        )
        .x_label_formatter(&|x| x_axis.label(*x))
        .y_label_formatter(&|y| y_axis.label(*y))
        .x_desc(spec.category_label())
        .y_desc(spec.value_label())
        .draw()?;

    for (j, s) in series.iter().enumerate() {
        let color = theme.series_color(s.label.as_str(), j);
        let points: Vec<(f64, f64)> = s
            .points
            .iter()
            .filter_map(|(x, y)| Some((x_axis.to_plot(*x)?, y_axis.to_plot(*y)?)))
            .collect();
        let anno = if j % 2 == 0 {
            chart.draw_series(
                points
                    .iter()
                    .map(|p| Circle::new(*p, 6, color.mix(0.8).filled())),
            )?
        } else {
            chart.draw_series(
                points
                    .iter()
                    .map(|p| TriangleMarker::new(*p, 7, color.mix(0.8).filled())),
            )?
        };
        anno.label(s.label.to_uppercase())
            .legend(move |(x, y)| Circle::new((x + 5, y), 5, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font((font, theme.label_font_size).into_font())
        .background_style(WHITE.mix(0.8))
        .border_style(RGBColor::from(theme.grid))
        .draw()?;
    Ok(())
}

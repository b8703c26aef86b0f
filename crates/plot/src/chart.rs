//! Line charts and the safety heatmap.

use std::fs;
use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use crate::read::{SafetyCell, axis};

pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
}

pub struct ChartLayout {
    pub caption: String,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
    /// Horizontal line drawn across the full x range, e.g. the available friction.
    pub reference: Option<(String, f64)>,
}

const SAFE_COLOR: RGBColor = RGBColor(120, 190, 120);
const UNSAFE_COLOR: RGBColor = RGBColor(220, 110, 100);
const MARKER_COLOR: RGBColor = RGBColor(210, 100, 20);

pub fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

pub fn jet_color(t_in: f64) -> RGBColor {
    let t = t_in.clamp(0.0, 1.0);
    let comp = |v: f64| (1.0 - (v - 1.0).abs()).clamp(0.0, 1.0);
    let r = comp(1.5 - 4.0 * (t - 0.75).abs());
    let g = comp(1.5 - 4.0 * (t - 0.5).abs());
    let b = comp(1.5 - 4.0 * (t - 0.25).abs());
    RGBColor((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

fn canvas(path: &Path, size: (u32, u32)) -> anyhow::Result<DrawingArea<BitMapBackend<'_>, Shift>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    Ok(root)
}

/// Padded range covering every finite value; degenerate spans widen to one unit.
fn padded_range(values: impl Iterator<Item = f64>) -> Option<Range<f64>> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    if (hi - lo).abs() < f64::EPSILON {
        return Some(lo - 1.0..hi + 1.0);
    }
    let pad = 0.05 * (hi - lo);
    Some(lo - pad..hi + pad)
}

/// Draw one or more line series, an optional reference level and highlighted markers.
pub fn draw_lines(
    output: &Path,
    size: (u32, u32),
    layout: &ChartLayout,
    series: &[Series],
    markers: &[(f64, f64)],
) -> anyhow::Result<()> {
    let x_range = padded_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.0)))
        .ok_or_else(|| anyhow::anyhow!("no finite points to plot"))?;
    let reference_level = layout.reference.as_ref().map(|(_, level)| *level);
    let y_range = padded_range(
        series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1))
            .chain(reference_level),
    )
    .ok_or_else(|| anyhow::anyhow!("no finite points to plot"))?;

    let root = canvas(output, size)?;
    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 24.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 18.0, FontStyle::Normal);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(layout.caption.clone(), caption_font)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range.clone(), y_range)?;

    chart
        .configure_mesh()
        .x_desc(layout.x_desc)
        .y_desc(layout.y_desc)
        .label_style(label_font.clone())
        .x_labels(8)
        .y_labels(8)
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()?;

    for s in series {
        let color = s.color;
        chart
            .draw_series(LineSeries::new(
                s.points.iter().copied(),
                ShapeStyle::from(&color).stroke_width(2),
            ))?
            .label(s.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], ShapeStyle::from(&color).stroke_width(2))
            });
    }

    if let Some((label, level)) = &layout.reference {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x_range.start, *level), (x_range.end, *level)],
                ShapeStyle::from(&BLACK.mix(0.6)).stroke_width(2),
            )))?
            .label(label.clone())
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], ShapeStyle::from(&BLACK.mix(0.6)))
            });
    }

    if !markers.is_empty() {
        chart
            .draw_series(
                markers
                    .iter()
                    .map(|&p| Circle::new(p, 3, MARKER_COLOR.filled())),
            )?
            .label("unsafe")
            .legend(|(x, y)| Circle::new((x + 10, y), 3, MARKER_COLOR.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font(label_font)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Safe/unsafe heatmap over radius (x) and friction (y) with the boundary traced.
pub fn draw_safety_map(output: &Path, size: (u32, u32), cells: &[SafetyCell]) -> anyhow::Result<()> {
    let radii = axis(cells.iter().map(|c| c.radius_m));
    let mus = axis(cells.iter().map(|c| c.mu));
    let grid = build_grid(cells, &mus, &radii);

    let x_lo = cell_bounds(&radii, 0).0;
    let x_hi = cell_bounds(&radii, radii.len() - 1).1;
    let y_lo = cell_bounds(&mus, 0).0;
    let y_hi = cell_bounds(&mus, mus.len() - 1).1;

    let root = canvas(output, size)?;
    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 24.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 18.0, FontStyle::Normal);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Cornering safety map", caption_font)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("Radius (m)")
        .y_desc("Available μ")
        .label_style(label_font.clone())
        .x_labels(8)
        .y_labels(8)
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()?;

    for (mu_idx, row) in grid.iter().enumerate() {
        let (y0, y1) = cell_bounds(&mus, mu_idx);
        for (r_idx, &value) in row.iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let (x0, x1) = cell_bounds(&radii, r_idx);
            let color = if value >= 0.5 { SAFE_COLOR } else { UNSAFE_COLOR };
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x0, y0), (x1, y1)],
                color.filled(),
            )))?;
        }
    }

    draw_boundary(&mut chart, &grid, &radii, &mus)?;

    chart
        .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())?
        .label("safe")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], SAFE_COLOR.filled()));
    chart
        .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())?
        .label("risk of sliding")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], UNSAFE_COLOR.filled()));
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font(label_font)
        .draw()?;

    root.present()?;
    Ok(())
}

/// `grid[mu_idx][radius_idx]`: 1.0 safe, 0.0 unsafe, NaN missing.
fn build_grid(cells: &[SafetyCell], mus: &[f64], radii: &[f64]) -> Vec<Vec<f64>> {
    let mut grid = vec![vec![f64::NAN; radii.len()]; mus.len()];
    for cell in cells {
        let Ok(mu_idx) = mus.binary_search_by(|x| x.total_cmp(&cell.mu)) else {
            continue;
        };
        let Ok(r_idx) = radii.binary_search_by(|x| x.total_cmp(&cell.radius_m)) else {
            continue;
        };
        grid[mu_idx][r_idx] = if cell.safe { 1.0 } else { 0.0 };
    }
    grid
}

fn cell_bounds(coords: &[f64], idx: usize) -> (f64, f64) {
    let center = coords[idx];
    let prev = idx.checked_sub(1).and_then(|i| coords.get(i)).copied();
    let next = coords.get(idx + 1).copied();
    let left = match (prev, next) {
        (Some(prev), _) => 0.5 * (prev + center),
        (None, Some(next)) => center - 0.5 * (next - center),
        (None, None) => center - 0.5,
    };
    let right = match (prev, next) {
        (_, Some(next)) => 0.5 * (center + next),
        (Some(prev), None) => center + 0.5 * (center - prev),
        (None, None) => center + 0.5,
    };
    (left, right)
}

fn draw_boundary<DB: DrawingBackend>(
    chart: &mut ChartContext<DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    grid: &[Vec<f64>],
    radii: &[f64],
    mus: &[f64],
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if radii.len() < 2 || mus.len() < 2 {
        return Ok(());
    }
    let style = ShapeStyle::from(&BLACK).stroke_width(2);
    for i in 0..mus.len() - 1 {
        for j in 0..radii.len() - 1 {
            let values = [grid[i][j], grid[i][j + 1], grid[i + 1][j + 1], grid[i + 1][j]];
            if values.iter().any(|v| !v.is_finite()) {
                continue;
            }
            let corners = [
                (radii[j], mus[i]),
                (radii[j + 1], mus[i]),
                (radii[j + 1], mus[i + 1]),
                (radii[j], mus[i + 1]),
            ];
            for (p1, p2) in marching_square_segments(values, corners, 0.5) {
                chart.draw_series(std::iter::once(PathElement::new(vec![p1, p2], style)))?;
            }
        }
    }
    Ok(())
}

/// Iso-line segments through one cell; corners run counter-clockwise from bottom-left.
fn marching_square_segments(
    values: [f64; 4],
    corners: [(f64, f64); 4],
    level: f64,
) -> Vec<((f64, f64), (f64, f64))> {
    let case = values
        .iter()
        .enumerate()
        .fold(0u8, |acc, (k, &v)| if v >= level { acc | (1 << k) } else { acc });

    // Edge k joins corner k and corner (k + 1) % 4.
    let edge_point = |edge: usize| -> (f64, f64) {
        let (a, b) = (edge, (edge + 1) % 4);
        let (va, vb) = (values[a], values[b]);
        let ((xa, ya), (xb, yb)) = (corners[a], corners[b]);
        if (vb - va).abs() < f64::EPSILON {
            return ((xa + xb) * 0.5, (ya + yb) * 0.5);
        }
        let t = (level - va) / (vb - va);
        (xa + t * (xb - xa), ya + t * (yb - ya))
    };

    let edges: &[(usize, usize)] = match case {
        1 | 14 => &[(3, 0)],
        2 | 13 => &[(0, 1)],
        3 | 12 => &[(3, 1)],
        4 | 11 => &[(1, 2)],
        5 => &[(3, 2), (0, 1)],
        6 | 9 => &[(0, 2)],
        7 | 8 => &[(3, 2)],
        10 => &[(3, 0), (1, 2)],
        _ => &[],
    };
    edges
        .iter()
        .map(|&(e1, e2)| (edge_point(e1), edge_point(e2)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_crosses_between_safe_and_unsafe_rows() {
        // Bottom row unsafe, top row safe: a horizontal segment halfway up.
        let segments = marching_square_segments(
            [0.0, 0.0, 1.0, 1.0],
            [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            0.5,
        );
        assert_eq!(segments.len(), 1);
        let ((x1, y1), (x2, y2)) = segments[0];
        assert!((y1 - 0.5).abs() < 1e-12 && (y2 - 0.5).abs() < 1e-12);
        assert!((x1 - x2).abs() > 0.99);
    }

    #[test]
    fn uniform_cells_have_no_boundary() {
        let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        assert!(marching_square_segments([1.0; 4], corners, 0.5).is_empty());
        assert!(marching_square_segments([0.0; 4], corners, 0.5).is_empty());
    }

    #[test]
    fn padded_range_widens_degenerate_spans() {
        let range = padded_range([3.0, 3.0].into_iter()).expect("range");
        assert_eq!(range, 2.0..4.0);
        assert!(padded_range([f64::NAN].into_iter()).is_none());
    }
}

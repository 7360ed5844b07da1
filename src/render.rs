//! Mapping from (matrix, style, bounds) to drawing primitives
//!
//! Pure geometry with no drawing backend: a host paints the returned
//! primitives in order. Coordinates have the origin at the top-left corner
//! with y growing downwards, so a set bit sits at the top of its row.

use serde::Serialize;

use crate::color::RgbaColor;
use crate::converter::{BITS_PER_DIGIT, COLUMNS, DigitColumn, DigitMatrix};
use crate::style::{MarkerShape, RepresentationMode, StyleConfig};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Shrink by `padding` on every side, never below zero size
    pub fn inset(&self, padding: f64) -> Self {
        Self {
            x: self.x + padding,
            y: self.y + padding,
            width: (self.width - 2.0 * padding).max(0.0),
            height: (self.height - 2.0 * padding).max(0.0),
        }
    }

    fn centered_square(center: Point, size: f64) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Primitive {
    Background {
        rect: Rect,
        color: RgbaColor,
    },
    Polyline {
        points: Vec<Point>,
        color: RgbaColor,
        width: f64,
    },
    Marker {
        rect: Rect,
        shape: MarkerShape,
        color: RgbaColor,
    },
    Dot {
        center: Point,
        radius: f64,
        filled: bool,
        color: RgbaColor,
        #[serde(rename = "strokeWidth")]
        stroke_width: f64,
    },
    Bar {
        rect: Rect,
        #[serde(rename = "cornerRadius")]
        corner_radius: f64,
        color: RgbaColor,
    },
}

/// Primitives for `matrix` drawn with `style` inside `bounds`
pub fn render(matrix: &DigitMatrix, style: &StyleConfig, bounds: Rect) -> Vec<Primitive> {
    let mut out = vec![Primitive::Background {
        rect: bounds,
        color: style.background_color,
    }];
    let content = bounds.inset(style.widget_padding);
    match style.representation {
        RepresentationMode::LineGraph => line_graph(matrix, style, content, &mut out),
        RepresentationMode::Dots => dot_grid(matrix, style, content, &mut out),
        RepresentationMode::Bars => bar_chart(matrix, style, content, &mut out),
    }
    out
}

/// Four equal rows separated by the vertical spacing
fn rows(content: Rect, spacing: f64) -> [Rect; COLUMNS] {
    let gaps = spacing * (COLUMNS as f64 - 1.0);
    let row_height = ((content.height - gaps) / COLUMNS as f64).max(0.0);
    std::array::from_fn(|i| {
        Rect::new(
            content.x,
            content.y + i as f64 * (row_height + spacing),
            content.width,
            row_height,
        )
    })
}

/// Left edge and usable width of a row after the horizontal inset
fn horizontal_span(row: Rect, padding_percent: f64) -> (f64, f64) {
    let x_offset = row.width * padding_percent;
    let width = (row.width * (1.0 - 2.0 * padding_percent)).max(0.0);
    (row.x + x_offset, width)
}

fn line_points(column: DigitColumn, row: Rect, style: &StyleConfig) -> Vec<Point> {
    let amplitude = row.height * style.line_amplitude_percent;
    let y_offset = (row.height - amplitude) / 2.0;
    let (left, width) = horizontal_span(row, style.horizontal_padding_percent);
    let x_step = width / (BITS_PER_DIGIT as f64 - 1.0);

    column
        .bits()
        .iter()
        .enumerate()
        .map(|(i, bit)| Point {
            x: left + i as f64 * x_step,
            y: row.y + y_offset + (1.0 - f64::from(*bit)) * amplitude,
        })
        .collect()
}

fn line_graph(matrix: &DigitMatrix, style: &StyleConfig, content: Rect, out: &mut Vec<Primitive>) {
    for (i, (column, row)) in matrix
        .columns()
        .iter()
        .zip(rows(content, style.vertical_spacing))
        .enumerate()
    {
        let color = style.line_color(i);
        let points = line_points(*column, row, style);
        let markers: Vec<Primitive> = points
            .iter()
            .map(|p| Primitive::Marker {
                rect: Rect::centered_square(*p, style.marker_size),
                shape: style.marker_shape,
                color,
            })
            .collect();
        out.push(Primitive::Polyline { points, color, width: style.line_width });
        out.extend(markers);
    }
}

/// Four vertical stacks of dots, centered in the content area
fn dot_grid(matrix: &DigitMatrix, style: &StyleConfig, content: Rect, out: &mut Vec<Primitive>) {
    let diameter = style.marker_size * 2.0;
    let column_gap = style.vertical_spacing;
    let dot_gap = style.marker_size / 2.0;
    let grid_width = COLUMNS as f64 * diameter + (COLUMNS as f64 - 1.0) * column_gap;
    let grid_height = BITS_PER_DIGIT as f64 * diameter + (BITS_PER_DIGIT as f64 - 1.0) * dot_gap;
    let left = content.x + (content.width - grid_width) / 2.0;
    let top = content.y + (content.height - grid_height) / 2.0;

    for (i, column) in matrix.columns().iter().enumerate() {
        let color = style.line_color(i);
        for (j, bit) in column.bits().iter().enumerate() {
            out.push(Primitive::Dot {
                center: Point {
                    x: left + i as f64 * (diameter + column_gap) + diameter / 2.0,
                    y: top + j as f64 * (diameter + dot_gap) + diameter / 2.0,
                },
                radius: diameter / 2.0,
                filled: *bit == 1,
                color,
                stroke_width: style.line_width / 2.0,
            });
        }
    }
}

/// One row per digit; each bit is a bottom-aligned bar, tall when set
fn bar_chart(matrix: &DigitMatrix, style: &StyleConfig, content: Rect, out: &mut Vec<Primitive>) {
    let bar = style.resolved_bar_style();
    for (i, (column, row)) in matrix
        .columns()
        .iter()
        .zip(rows(content, style.vertical_spacing))
        .enumerate()
    {
        let color = style.line_color(i);
        let (left, width) = horizontal_span(row, style.horizontal_padding_percent);
        let gaps = bar.bar_spacing * (BITS_PER_DIGIT as f64 - 1.0);
        let bar_width = ((width - gaps) / BITS_PER_DIGIT as f64).max(0.0);

        for (j, bit) in column.bits().iter().enumerate() {
            let percent = if *bit == 1 {
                bar.bar_max_height_percent
            } else {
                bar.bar_min_height_percent
            };
            let height = row.height * percent;
            out.push(Primitive::Bar {
                rect: Rect::new(
                    left + j as f64 * (bar_width + bar.bar_spacing),
                    row.y + row.height - height,
                    bar_width,
                    height,
                ),
                corner_radius: bar.bar_corner_radius,
                color,
            });
        }
    }
}

/// Terminal preview: one line per digit, `●` for set bits
pub fn render_text(matrix: &DigitMatrix) -> String {
    matrix
        .columns()
        .iter()
        .map(|column| {
            let dots: Vec<&str> = column
                .bits()
                .iter()
                .map(|bit| if *bit == 1 { "●" } else { "○" })
                .collect();
            format!("{}  {}", column.value(), dots.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

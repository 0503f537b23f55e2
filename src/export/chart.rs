//! Raster pie chart of category totals, embedded in the PDF export.

use plotters::{element::Pie, prelude::*};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::Error;

pub(crate) const CHART_WIDTH: u32 = 600;
pub(crate) const CHART_HEIGHT: u32 = 450;

/// How far, in degrees, the first slice is rotated from three o'clock.
const START_ANGLE: f64 = 90.0;

const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// A rendered chart as raw RGB8 pixels.
pub(crate) struct CategoryChart {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Draw a pie chart of category totals with percentage labels (one decimal
/// place).
///
/// `totals` must be non-empty; slice order follows the input order so the
/// chart matches the aggregates it was built from.
pub(crate) fn category_pie_chart(totals: &[(String, Decimal)]) -> Result<CategoryChart, Error> {
    if totals.is_empty() {
        return Err(Error::ChartError(
            "cannot chart an empty category set".to_owned(),
        ));
    }

    let sizes: Vec<f64> = totals
        .iter()
        .map(|(_, total)| total.to_f64().unwrap_or(0.0))
        .collect();
    let labels: Vec<String> = totals.iter().map(|(label, _)| label.clone()).collect();
    let colors: Vec<RGBColor> = PALETTE
        .iter()
        .cycle()
        .take(totals.len())
        .copied()
        .collect();

    let mut pixels = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];

    {
        let root =
            BitMapBackend::with_buffer(&mut pixels, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let chart_area = root
            .titled("Expenses by Category", ("sans-serif", 24))
            .map_err(chart_error)?;

        let (width, height) = chart_area.dim_in_pixel();
        let center = (width as i32 / 2, height as i32 / 2);
        let radius = (width.min(height) as f64 / 2.0 - 60.0).max(40.0);

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(START_ANGLE);
        pie.label_style(("sans-serif", 16).into_font());
        pie.percentages(("sans-serif", 13).into_font());

        chart_area.draw(&pie).map_err(chart_error)?;
        chart_area.present().map_err(chart_error)?;
    }

    Ok(CategoryChart {
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
        pixels,
    })
}

fn chart_error(error: impl std::fmt::Display) -> Error {
    Error::ChartError(error.to_string())
}

#[cfg(test)]
mod chart_tests {
    use rust_decimal_macros::dec;

    use crate::Error;

    use super::{CHART_HEIGHT, CHART_WIDTH, category_pie_chart};

    #[test]
    fn renders_slices_onto_a_white_canvas() {
        let totals = vec![
            ("Office".to_owned(), dec!(124.50)),
            ("Travel".to_owned(), dec!(300.00)),
        ];

        let chart = category_pie_chart(&totals).expect("Could not render chart");

        assert_eq!(chart.width, CHART_WIDTH);
        assert_eq!(chart.height, CHART_HEIGHT);
        assert_eq!(
            chart.pixels.len(),
            (CHART_WIDTH * CHART_HEIGHT * 3) as usize
        );
        assert!(
            chart.pixels.iter().any(|&byte| byte != 255),
            "the canvas should not be all white"
        );
    }

    #[test]
    fn empty_category_set_is_an_error() {
        let result = category_pie_chart(&[]);

        assert!(matches!(result, Err(Error::ChartError(_))));
    }
}

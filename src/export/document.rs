//! The PDF document renderer.
//!
//! Renders a letter-sized report: title, summary line, a pie chart of
//! category shares (when there is data) and a gridded expense table with a
//! shaded header band and total row.

use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Rgb,
    image_crate::{DynamicImage, RgbImage},
    path::{PaintMode, WindingOrder},
};
use rust_decimal::Decimal;

use crate::{
    Error,
    expense::{ExpenseRow, format_date},
    export::{
        MISSING_CATEGORY_LABEL,
        chart::{CategoryChart, category_pie_chart},
    },
    report::{by_category, grand_total},
};

// US letter.
const PAGE_WIDTH_MM: f64 = 215.9;
const PAGE_HEIGHT_MM: f64 = 279.4;
const MARGIN_MM: f64 = 20.0;

const ROW_HEIGHT_MM: f64 = 7.0;
const COLUMN_X_MM: [f64; 4] = [20.0, 50.0, 88.0, 164.0];
const TABLE_WIDTH_MM: f64 = 170.0;

const CHART_DPI: f64 = 150.0;
const MM_PER_INCH: f64 = 25.4;

/// Render the expense report document as PDF bytes.
///
/// The chart is omitted for an empty expense set; the rest of the document
/// still renders.
pub fn render_document(rows: &[ExpenseRow], period_label: &str) -> Result<Vec<u8>, Error> {
    let (document, page, layer) = PdfDocument::new(
        format!("Business Expenses Report - {period_label}"),
        Mm(PAGE_WIDTH_MM as f32),
        Mm(PAGE_HEIGHT_MM as f32),
        "Layer 1",
    );
    let regular = document
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(document_error)?;
    let bold = document
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(document_error)?;

    let mut layer_ref = document.get_page(page).get_layer(layer);
    let mut cursor_mm = PAGE_HEIGHT_MM - MARGIN_MM;

    set_fill(&layer_ref, 0.0, 0.0, 0.0);
    layer_ref.use_text(
        format!("Business Expenses Report - {period_label}"),
        18.0,
        Mm(MARGIN_MM as f32),
        Mm(cursor_mm as f32),
        &bold,
    );
    cursor_mm -= 12.0;

    let total = grand_total(rows);
    layer_ref.use_text(
        format!(
            "Total Expenses: ${total:.2} | Number of Transactions: {count}",
            count = rows.len()
        ),
        11.0,
        Mm(MARGIN_MM as f32),
        Mm(cursor_mm as f32),
        &regular,
    );
    cursor_mm -= 6.0;

    if !rows.is_empty() {
        let chart = category_pie_chart(&by_category(rows))?;
        let chart_height_mm = chart.height as f64 * MM_PER_INCH / CHART_DPI;
        cursor_mm -= chart_height_mm + 2.0;

        embed_chart(&layer_ref, chart, cursor_mm)?;
        cursor_mm -= 6.0;
    }

    draw_table(
        &document,
        &mut layer_ref,
        &mut cursor_mm,
        rows,
        total,
        &regular,
        &bold,
    );

    document.save_to_bytes().map_err(document_error)
}

/// Draw the table: shaded header band, one row per expense, shaded total row.
///
/// Starts a new page whenever the cursor reaches the bottom margin.
fn draw_table(
    document: &PdfDocumentReference,
    layer_ref: &mut PdfLayerReference,
    cursor_mm: &mut f64,
    rows: &[ExpenseRow],
    total: Decimal,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    let header: [String; 4] = [
        "Date".to_owned(),
        "Category".to_owned(),
        "Description".to_owned(),
        "Amount".to_owned(),
    ];

    *cursor_mm -= ROW_HEIGHT_MM;
    draw_header_row(layer_ref, &header, *cursor_mm, bold);

    for row in rows {
        if *cursor_mm < MARGIN_MM + ROW_HEIGHT_MM {
            let (page, layer) =
                document.add_page(Mm(PAGE_WIDTH_MM as f32), Mm(PAGE_HEIGHT_MM as f32), "Layer 1");
            *layer_ref = document.get_page(page).get_layer(layer);
            *cursor_mm = PAGE_HEIGHT_MM - MARGIN_MM - ROW_HEIGHT_MM;
            draw_header_row(layer_ref, &header, *cursor_mm, bold);
        }

        *cursor_mm -= ROW_HEIGHT_MM;
        let columns = [
            format_date(row.date),
            row.category
                .as_deref()
                .unwrap_or(MISSING_CATEGORY_LABEL)
                .to_owned(),
            row.description.clone().unwrap_or_default(),
            format!("${:.2}", row.amount),
        ];
        draw_row(layer_ref, &columns, *cursor_mm, regular, None, (0.0, 0.0, 0.0));
    }

    if *cursor_mm < MARGIN_MM + ROW_HEIGHT_MM {
        let (page, layer) = document.add_page(Mm(PAGE_WIDTH_MM as f32), Mm(PAGE_HEIGHT_MM as f32), "Layer 1");
        *layer_ref = document.get_page(page).get_layer(layer);
        *cursor_mm = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    *cursor_mm -= ROW_HEIGHT_MM;
    let total_columns = [
        String::new(),
        String::new(),
        "Total:".to_owned(),
        format!("${total:.2}"),
    ];
    draw_row(
        layer_ref,
        &total_columns,
        *cursor_mm,
        bold,
        Some((0.83, 0.83, 0.83)),
        (0.0, 0.0, 0.0),
    );
}

fn draw_header_row(
    layer_ref: &PdfLayerReference,
    header: &[String; 4],
    y_mm: f64,
    bold: &IndirectFontRef,
) {
    draw_row(
        layer_ref,
        header,
        y_mm,
        bold,
        Some((0.5, 0.5, 0.5)),
        (0.96, 0.96, 0.96),
    );
}

/// Draw one table row at `y_mm` (the row's bottom edge): optional fill band,
/// a grid outline with column separators, then the cell text.
fn draw_row(
    layer_ref: &PdfLayerReference,
    columns: &[String; 4],
    y_mm: f64,
    font: &IndirectFontRef,
    band: Option<(f64, f64, f64)>,
    text_color: (f64, f64, f64),
) {
    let left = COLUMN_X_MM[0];

    if let Some((red, green, blue)) = band {
        set_fill(layer_ref, red, green, blue);
        layer_ref.add_polygon(rectangle(left, y_mm, TABLE_WIDTH_MM, ROW_HEIGHT_MM, PaintMode::Fill));
    }

    layer_ref.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer_ref.set_outline_thickness(0.4);
    layer_ref.add_polygon(rectangle(
        left,
        y_mm,
        TABLE_WIDTH_MM,
        ROW_HEIGHT_MM,
        PaintMode::Stroke,
    ));
    for x_mm in &COLUMN_X_MM[1..] {
        layer_ref.add_polygon(rectangle(
            *x_mm,
            y_mm,
            0.0,
            ROW_HEIGHT_MM,
            PaintMode::Stroke,
        ));
    }

    let (red, green, blue) = text_color;
    set_fill(layer_ref, red, green, blue);
    for (text, x_mm) in columns.iter().zip(COLUMN_X_MM) {
        if !text.is_empty() {
            layer_ref.use_text(text.clone(), 9.0, Mm((x_mm + 2.0) as f32), Mm((y_mm + 2.2) as f32), font);
        }
    }
}

fn embed_chart(
    layer_ref: &PdfLayerReference,
    chart: CategoryChart,
    y_mm: f64,
) -> Result<(), Error> {
    let buffer = RgbImage::from_raw(chart.width, chart.height, chart.pixels)
        .ok_or_else(|| Error::ChartError("chart buffer size mismatch".to_owned()))?;
    let image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(buffer));

    image.add_to_layer(
        layer_ref.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN_MM as f32)),
            translate_y: Some(Mm(y_mm as f32)),
            dpi: Some(CHART_DPI as f32),
            ..Default::default()
        },
    );

    Ok(())
}

fn rectangle(x_mm: f64, y_mm: f64, width_mm: f64, height_mm: f64, mode: PaintMode) -> Polygon {
    Polygon {
        rings: vec![vec![
            (Point::new(Mm(x_mm as f32), Mm(y_mm as f32)), false),
            (Point::new(Mm((x_mm + width_mm) as f32), Mm(y_mm as f32)), false),
            (Point::new(Mm((x_mm + width_mm) as f32), Mm((y_mm + height_mm) as f32)), false),
            (Point::new(Mm(x_mm as f32), Mm((y_mm + height_mm) as f32)), false),
        ]],
        mode,
        winding_order: WindingOrder::NonZero,
    }
}

fn set_fill(layer_ref: &PdfLayerReference, red: f64, green: f64, blue: f64) {
    layer_ref.set_fill_color(Color::Rgb(Rgb::new(red as f32, green as f32, blue as f32, None)));
}

fn document_error(error: impl std::fmt::Display) -> Error {
    Error::DocumentError(error.to_string())
}

use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rgb,
    image_crate::{self, GenericImageView},
};

use super::{MarketingPage, ReportError, ReportLayout};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const IMAGE_DPI: f32 = 300.0;

// Helvetica averages roughly half an em per glyph.
const AVG_GLYPH_EM: f32 = 0.5;
const PT_TO_MM: f32 = 0.3528;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn text_width_mm(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_EM * PT_TO_MM
}

/// Greedy word wrap on an approximate glyph budget.
pub(crate) fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let extra = if current.is_empty() { 0 } else { 1 };
        if !current.is_empty() && current.chars().count() + extra + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn centered(layer: &PdfLayerReference, text: &str, size: f32, y: f32, font: &IndirectFontRef) {
    let x = ((PAGE_WIDTH - text_width_mm(text, size)) / 2.0).max(MARGIN);
    layer.use_text(text, size, Mm(x), Mm(y), font);
}

fn rule(layer: &PdfLayerReference, y: f32) {
    layer.set_outline_color(rgb(0xe5, 0xe7, 0xeb));
    layer.set_outline_thickness(0.5);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(y)), false),
            (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(y)), false),
        ],
        is_closed: false,
    });
}

/// Places an image centered inside the box, scaled to fit. Returns the
/// bottom edge used.
fn place_image(
    layer: &PdfLayerReference,
    bytes: &[u8],
    max_w: f32,
    max_h: f32,
    top: f32,
) -> Result<f32, ReportError> {
    let decoded =
        image_crate::load_from_memory(bytes).map_err(|e| ReportError::Image(e.to_string()))?;
    let (px_w, px_h) = decoded.dimensions();
    if px_w == 0 || px_h == 0 {
        return Err(ReportError::Image("image has no pixels".to_string()));
    }

    let natural_w = px_w as f32 * 25.4 / IMAGE_DPI;
    let natural_h = px_h as f32 * 25.4 / IMAGE_DPI;
    let scale = (max_w / natural_w).min(max_h / natural_h);
    let (w, h) = (natural_w * scale, natural_h * scale);
    let x = (PAGE_WIDTH - w) / 2.0;
    let y = top - h;

    Image::from_dynamic_image(&decoded).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
    Ok(y)
}

/// Logo header. Returns where the content below it may start.
fn header(layer: &PdfLayerReference, logo: Option<&[u8]>) -> Result<f32, ReportError> {
    let top = PAGE_HEIGHT - MARGIN;
    match logo {
        Some(bytes) => Ok(place_image(layer, bytes, 120.0, 60.0, top)? - 10.0),
        None => Ok(top - 10.0),
    }
}

fn new_page(doc: &PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    doc.get_page(page).get_layer(layer)
}

fn personal_page(
    layer: &PdfLayerReference,
    layout: &ReportLayout,
    fonts: &Fonts,
) -> Result<(), ReportError> {
    let mut y = header(layer, layout.logo.as_deref().map(Vec::as_slice))?;

    layer.set_fill_color(rgb(0x1f, 0x29, 0x37));
    centered(layer, &layout.personal_title, 22.0, y, &fonts.bold);
    y -= 12.0;
    layer.set_fill_color(rgb(0x37, 0x41, 0x51));
    centered(layer, &layout.attended_by, 14.0, y, &fonts.bold);
    y -= 14.0;

    for (label, value) in &layout.personal_rows {
        layer.set_fill_color(rgb(0x37, 0x41, 0x51));
        layer.use_text(*label, 12.0, Mm(MARGIN + 5.0), Mm(y), &fonts.bold);
        layer.set_fill_color(rgb(0x1f, 0x29, 0x37));
        layer.use_text(value.as_str(), 12.0, Mm(MARGIN + 75.0), Mm(y), &fonts.regular);
        rule(layer, y - 3.0);
        y -= 11.0;
    }
    Ok(())
}

fn metrics_page(
    layer: &PdfLayerReference,
    layout: &ReportLayout,
    fonts: &Fonts,
) -> Result<(), ReportError> {
    let mut y = header(layer, layout.logo.as_deref().map(Vec::as_slice))?;

    layer.set_fill_color(rgb(0x1f, 0x29, 0x37));
    centered(layer, &layout.metrics_title, 22.0, y, &fonts.bold);
    y -= 14.0;

    let columns = [MARGIN + 3.0, MARGIN + 75.0, MARGIN + 115.0];
    layer.set_fill_color(rgb(0x37, 0x41, 0x51));
    for (title, x) in layout.metric_header.iter().zip(columns) {
        layer.use_text(*title, 12.0, Mm(x), Mm(y), &fonts.bold);
    }
    rule(layer, y - 3.0);
    y -= 10.0;

    layer.set_fill_color(rgb(0x1f, 0x29, 0x37));
    for row in &layout.metric_rows {
        layer.use_text(row.parameter, 11.0, Mm(columns[0]), Mm(y), &fonts.regular);
        layer.use_text(row.value.as_str(), 11.0, Mm(columns[1]), Mm(y), &fonts.regular);
        let mut ref_y = y;
        for line in wrap(row.reference, 30) {
            layer.use_text(line, 11.0, Mm(columns[2]), Mm(ref_y), &fonts.regular);
            ref_y -= 5.0;
        }
        let row_bottom = ref_y.min(y - 5.0);
        rule(layer, row_bottom + 2.0);
        y = row_bottom - 4.0;
    }

    if let Some(conclusion) = &layout.conclusion {
        y -= 6.0;
        layer.set_fill_color(rgb(0xdc, 0x26, 0x26));
        layer.use_text("Health Report Conclusion -", 16.0, Mm(MARGIN), Mm(y), &fonts.bold);
        y -= 9.0;
        layer.set_fill_color(rgb(0x1f, 0x29, 0x37));
        for line in wrap(conclusion, 85) {
            layer.use_text(line, 12.0, Mm(MARGIN + 4.0), Mm(y), &fonts.regular);
            y -= 6.0;
        }
    }
    Ok(())
}

fn marketing_page(
    layer: &PdfLayerReference,
    layout: &ReportLayout,
    fonts: &Fonts,
) -> Result<(), ReportError> {
    match &layout.marketing {
        MarketingPage::Image(bytes) => {
            let max_w = PAGE_WIDTH - 2.0 * MARGIN;
            let max_h = PAGE_HEIGHT - 2.0 * MARGIN;
            place_image(layer, bytes, max_w, max_h, PAGE_HEIGHT - MARGIN)?;
        }
        MarketingPage::Placeholder { headline, hint } => {
            let middle = PAGE_HEIGHT / 2.0;
            layer.set_fill_color(rgb(0x66, 0x66, 0x66));
            centered(layer, headline, 16.0, middle, &fonts.regular);
            layer.set_fill_color(rgb(0x99, 0x99, 0x99));
            centered(layer, hint, 12.0, middle - 10.0, &fonts.regular);
        }
    }
    Ok(())
}

fn closing_page(
    layer: &PdfLayerReference,
    layout: &ReportLayout,
    fonts: &Fonts,
) -> Result<(), ReportError> {
    let mut y = header(layer, layout.logo.as_deref().map(Vec::as_slice))?;

    layer.set_fill_color(rgb(0x1f, 0x29, 0x37));
    for line in wrap(&layout.closing_title, 40) {
        centered(layer, &line, 22.0, y, &fonts.bold);
        y -= 10.0;
    }
    y -= 4.0;

    layer.set_fill_color(rgb(0x25, 0x63, 0xeb));
    layer.use_text(layout.closing_link.as_str(), 12.0, Mm(MARGIN), Mm(y), &fonts.regular);
    y -= 12.0;

    layer.set_fill_color(rgb(0x1f, 0x29, 0x37));
    for line in wrap(&layout.closing_message, 85) {
        layer.use_text(line, 12.0, Mm(MARGIN), Mm(y), &fonts.regular);
        y -= 6.5;
    }
    Ok(())
}

/// Draws the layout onto four A4 pages.
pub fn render(layout: &ReportLayout) -> Result<Vec<u8>, ReportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        layout.document_title.as_str(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Font(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Font(e.to_string()))?,
    };

    let first = doc.get_page(first_page).get_layer(first_layer);
    personal_page(&first, layout, &fonts)?;
    metrics_page(&new_page(&doc), layout, &fonts)?;
    marketing_page(&new_page(&doc), layout, &fonts)?;
    closing_page(&new_page(&doc), layout, &fonts)?;

    doc.save_to_bytes()
        .map_err(|e| ReportError::Save(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap(super::super::TOUR_MESSAGE, 40);
        assert!(lines.iter().all(|l| l.chars().count() <= 40));
        assert_eq!(lines.join(" "), super::super::TOUR_MESSAGE);
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap("2 - 5%", 30), vec!["2 - 5%".to_string()]);
        assert!(wrap("   ", 30).is_empty());
    }
}

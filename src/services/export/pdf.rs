//! Document (PDF) export of the event set.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rgb};

use crate::models::event::Event;

/// Export options.
pub struct PdfExportOptions {
    /// Title printed at the top of the document
    pub title: String,
    /// Page size (width, height) in mm
    pub page_size: (f32, f32),
    /// Include event descriptions
    pub include_descriptions: bool,
}

impl Default for PdfExportOptions {
    fn default() -> Self {
        Self {
            title: "Event Schedule".to_string(),
            page_size: (210.0, 297.0), // A4 Portrait
            include_descriptions: true,
        }
    }
}

/// Write the event list as a paginated PDF document.
pub fn export_event_list(events: &[Event], path: &Path, options: &PdfExportOptions) -> Result<()> {
    let (doc, page1, layer1) = PdfDocument::new(
        &options.title,
        Mm(options.page_size.0),
        Mm(options.page_size.1),
        "Layer 1",
    );

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .context("Failed to add font")?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .context("Failed to add bold font")?;

    let mut current_layer = doc.get_page(page1).get_layer(layer1);

    draw_text(&current_layer, &font_bold, 18.0, 105.0, 280.0, &options.title, true);

    let mut y = 260.0;
    let margin_left = 20.0;
    let page_height = options.page_size.1;

    for event in events {
        if y < 30.0 {
            let (new_page, new_layer) =
                doc.add_page(Mm(options.page_size.0), Mm(options.page_size.1), "Layer 1");
            current_layer = doc.get_page(new_page).get_layer(new_layer);
            y = page_height - 20.0;
        }

        draw_text(&current_layer, &font_bold, 11.0, margin_left, y, &event.title, false);
        y -= 5.0;

        let interval = if event.duration_days() == 0 {
            format!(
                "{} {} - {}",
                event.start.format("%B %d, %Y"),
                event.start.format("%H:%M"),
                event.end.format("%H:%M"),
            )
        } else {
            format!(
                "{} - {}",
                event.start.format("%B %d, %Y %H:%M"),
                event.end.format("%B %d, %Y %H:%M"),
            )
        };
        draw_text(&current_layer, &font, 9.0, margin_left, y, &interval, false);
        y -= 4.0;

        if let Some(ref category) = event.category_name {
            draw_text(&current_layer, &font, 8.0, margin_left, y, category, false);
            y -= 4.0;
        }

        if options.include_descriptions {
            if let Some(ref desc) = event.description {
                if !desc.is_empty() {
                    let truncated = if desc.chars().count() > 100 {
                        let cut: String = desc.chars().take(97).collect();
                        format!("{}...", cut)
                    } else {
                        desc.clone()
                    };
                    draw_text(&current_layer, &font, 8.0, margin_left, y, &truncated, false);
                    y -= 4.0;
                }
            }
        }

        y -= 6.0; // Space between events
    }

    let file = File::create(path).context("Failed to create PDF file")?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer).context("Failed to save PDF")?;

    Ok(())
}

fn draw_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    size: f32,
    x: f32,
    y: f32,
    text: &str,
    centered: bool,
) {
    layer.begin_text_section();
    layer.set_font(font, size);
    layer.set_fill_color(printpdf::Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));

    let position = if centered {
        // Approximate centering based on character count
        let approx_width = text.len() as f32 * size * 0.4;
        (Mm(x - approx_width / 2.0), Mm(y))
    } else {
        (Mm(x), Mm(y))
    };

    layer.set_text_cursor(position.0, position.1);
    layer.write_text(text, font);
    layer.end_text_section();
}

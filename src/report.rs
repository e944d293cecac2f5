//! PDF report assembly.
//!
//! Builds one titled section per input record, each populated from the
//! narrative service. An upstream failure degrades that record's section to
//! placeholder text; the document itself always renders.

use crate::error::HydroscopeError;
use crate::models::{Parameter, Record};
use crate::narrative::{split_sections, NarrativeSections, NarrativeSource};

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

/// Section text used when the narrative service could not be reached.
pub const PLACEHOLDER: &str =
    "Analysis unavailable: the narrative service could not be reached.";

// A4 page geometry and layout constants, in millimetres.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 18.0;
const BODY_SIZE: f32 = 10.0;
const HEADING_SIZE: f32 = 12.0;
const TITLE_SIZE: f32 = 16.0;
const LINE_HEIGHT: f32 = 5.0;
// Approximate characters per line for Helvetica at the body size.
const WRAP_COLUMNS: usize = 95;

/// Build the narrative prompt for one record.
///
/// The prompt names the section headings the splitter expects, which keeps
/// the heading-marker contract in one place.
pub fn build_prompt(record: &Record) -> String {
    let mut measurements = Vec::new();
    for parameter in Parameter::ALL {
        if let Some(value) = record.value(parameter) {
            measurements.push(format!("{parameter}: {value}"));
        }
    }
    format!(
        "Analyse this water quality observation from station {} at {} in {}. \
         Measurements: {}. \
         Respond with four sections titled POLLUTION REASON, CAUSES, CONSEQUENCES and SOLUTIONS.",
        record.station_code.as_deref().unwrap_or("unknown"),
        record.location.as_deref().unwrap_or("an unknown location"),
        record.state.as_deref().unwrap_or("an unknown state"),
        measurements.join(", ")
    )
}

/// Generate a PDF report with one section per record.
///
/// # Arguments
///
/// * `source`: The narrative source to populate sections from
/// * `records`: Records to report on, one page each
pub async fn generate_report(
    source: &dyn NarrativeSource,
    records: &[Record],
) -> Result<Vec<u8>, HydroscopeError> {
    // Fetch all narratives before building the document: the PDF document is
    // not `Send` and must not be held across an await point.
    let mut all_sections = Vec::with_capacity(records.len());
    for record in records {
        let sections = match source.generate(&build_prompt(record)).await {
            Ok(text) => split_sections(&text),
            Err(err) => {
                tracing::warn!("narrative generation failed, using placeholder: {err}");
                NarrativeSections::placeholder(PLACEHOLDER)
            }
        };
        all_sections.push(sections);
    }

    let (doc, first_page, first_layer) =
        PdfDocument::new("Water Quality Report", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "body");
    let body_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| HydroscopeError::ReportRender {
            detail: err.to_string(),
        })?;
    let heading_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| HydroscopeError::ReportRender {
            detail: err.to_string(),
        })?;

    for (index, (record, sections)) in records.iter().zip(&all_sections).enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "body");
            doc.get_page(page).get_layer(layer)
        };
        render_record(&layer, &body_font, &heading_font, index, record, sections);
    }

    doc.save_to_bytes().map_err(|err| HydroscopeError::ReportRender {
        detail: err.to_string(),
    })
}

/// Lay out one record's section onto a page layer.
fn render_record(
    layer: &PdfLayerReference,
    body_font: &IndirectFontRef,
    heading_font: &IndirectFontRef,
    index: usize,
    record: &Record,
    sections: &NarrativeSections,
) {
    let mut cursor = Cursor {
        layer,
        body_font,
        heading_font,
        y: PAGE_HEIGHT - MARGIN,
    };

    let title = format!(
        "{}. {} ({})",
        index + 1,
        record.location.as_deref().unwrap_or("Unknown location"),
        record.state.as_deref().unwrap_or("Unknown state"),
    );
    cursor.heading(&title, TITLE_SIZE);

    let mut measurements = Vec::new();
    for parameter in Parameter::ALL {
        if let Some(value) = record.value(parameter) {
            measurements.push(format!("{parameter}: {value}"));
        }
    }
    if measurements.is_empty() {
        cursor.body("No measurements recorded.");
    } else {
        cursor.body(&measurements.join("   "));
    }
    cursor.gap();

    for (heading, text) in [
        ("Pollution Reason", &sections.pollution_reason),
        ("Causes", &sections.causes),
        ("Consequences", &sections.consequences),
        ("Solutions", &sections.solutions),
    ] {
        cursor.heading(heading, HEADING_SIZE);
        cursor.body(text);
        cursor.gap();
    }
}

/// Tracks the vertical write position on a page layer.
struct Cursor<'a> {
    layer: &'a PdfLayerReference,
    body_font: &'a IndirectFontRef,
    heading_font: &'a IndirectFontRef,
    y: f32,
}

impl Cursor<'_> {
    fn heading(&mut self, text: &str, size: f32) {
        self.write_line(text, size, true);
        self.y -= 1.5;
    }

    fn body(&mut self, text: &str) {
        for line in text.lines() {
            for wrapped in wrap(line, WRAP_COLUMNS) {
                self.write_line(&wrapped, BODY_SIZE, false);
            }
        }
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT;
    }

    fn write_line(&mut self, text: &str, size: f32, heading: bool) {
        // Clip content that runs off the page rather than overflowing.
        if self.y < MARGIN {
            return;
        }
        let font = if heading {
            self.heading_font
        } else {
            self.body_font
        };
        self.layer.use_text(text, size, Mm(MARGIN), Mm(self.y), font);
        self.y -= LINE_HEIGHT;
    }
}

/// Greedy word wrap to a maximum column count.
fn wrap(line: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > columns {
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
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

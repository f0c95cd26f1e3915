//! Single-page PDF rendering of a text report.
//!
//! Layout on a US Letter page (612 × 792 pt), origin bottom-left:
//!
//! | Element         | Font / size        | Position                       |
//! |-----------------|--------------------|--------------------------------|
//! | Company logo    | image, fit 120×80  | (50, h − 120)                  |
//! | Title           | Helvetica-Bold 14  | (200, h − 50)                  |
//! | Date            | Helvetica 10       | (450, h − 70)                  |
//! | Report body     | Courier 11         | (50, h − 150), 13.2 pt leading |
//! | Developer logo  | image, fit 50×50   | (w − 80, 20)                   |
//!
//! Logos are optional. A logo that is missing or does not decode is logged
//! and left out; the page still renders.

use std::path::Path;

use chrono::NaiveDate;
use fiscal_core::report::REPORT_TITLE;
use fiscal_core::{Client, Period};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use thiserror::Error;
use tracing::{debug, warn};

use crate::utils::file_name_component;

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;

const TITLE_CLIENT_MAX_CHARS: usize = 40;
const BODY_LEADING: f32 = 13.2;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to build PDF: {0}")]
    Build(#[from] lopdf::Error),

    #[error("failed to write PDF: {0}")]
    Write(String),
}

/// Everything printed on the page.
#[derive(Debug, Clone)]
pub struct ReportPage<'a> {
    /// Client as shown in the title.
    pub client: &'a str,
    /// Report text, printed line by line in a monospaced font.
    pub body: &'a str,
    pub date: NaiveDate,
    pub company_logo: Option<&'a Path>,
    pub developer_logo: Option<&'a Path>,
}

/// An image placed inside a box, keeping its aspect ratio and centred.
struct Placement {
    name: &'static str,
    x: f32,
    y: f32,
    box_width: f32,
    box_height: f32,
}

/// `Reporte_{client}_{period}.pdf` from the client's display name, with path
/// separators and spaces replaced.
pub fn report_file_name(
    client: &Client,
    period: Period,
) -> String {
    format!(
        "Reporte_{}_{}.pdf",
        file_name_component(&client.display_name()),
        period
    )
}

/// Title line; long client names are cut to 40 characters plus `...`.
pub fn title_line(client: &str) -> String {
    let client = if client.chars().count() > TITLE_CLIENT_MAX_CHARS {
        let cut: String = client.chars().take(TITLE_CLIENT_MAX_CHARS).collect();
        format!("{cut}...")
    } else {
        client.to_string()
    };
    format!("{REPORT_TITLE}: {client}")
}

/// Renders the page and returns the PDF bytes.
pub fn render_pdf(page: &ReportPage<'_>) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let helvetica = doc.add_object(font("Helvetica"));
    let helvetica_bold = doc.add_object(font("Helvetica-Bold"));
    let courier = doc.add_object(font("Courier"));

    let mut xobjects = Dictionary::new();
    let mut operations = Vec::new();

    if let Some(path) = page.company_logo {
        let placement = Placement {
            name: "ImCompany",
            x: 50.0,
            y: (PAGE_HEIGHT - 120) as f32,
            box_width: 120.0,
            box_height: 80.0,
        };
        place_logo(&mut doc, &mut xobjects, &mut operations, path, &placement);
    }

    operations.extend(text_line("F2", 14, 200, PAGE_HEIGHT - 50, &title_line(page.client)));
    operations.extend(text_line(
        "F1",
        10,
        450,
        PAGE_HEIGHT - 70,
        &format!("Fecha: {}", page.date.format("%d/%m/%Y")),
    ));
    operations.extend(body_block(page.body));

    if let Some(path) = page.developer_logo {
        let placement = Placement {
            name: "ImDeveloper",
            x: (PAGE_WIDTH - 80) as f32,
            y: 20.0,
            box_width: 50.0,
            box_height: 50.0,
        };
        place_logo(&mut doc, &mut xobjects, &mut operations, path, &placement);
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => helvetica,
            "F2" => helvetica_bold,
            "F3" => courier,
        },
        "XObject" => xobjects,
    });

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| PdfError::Write(e.to_string()))?;
    debug!(bytes = bytes.len(), "rendered PDF");
    Ok(bytes)
}

fn font(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// WinAnsi covers Latin-1, which is every accented letter in the labels.
fn pdf_string(text: &str) -> Object {
    let bytes = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect::<Vec<u8>>();
    Object::String(bytes, StringFormat::Literal)
}

fn text_line(
    font: &str,
    size: i64,
    x: i64,
    y: i64,
    text: &str,
) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![pdf_string(text)]),
        Operation::new("ET", vec![]),
    ]
}

fn body_block(body: &str) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F3".into(), 11.into()]),
        Operation::new("TL", vec![BODY_LEADING.into()]),
        Operation::new("Td", vec![50.into(), (PAGE_HEIGHT - 150).into()]),
    ];
    for line in body.lines() {
        ops.push(Operation::new("Tj", vec![pdf_string(line)]));
        ops.push(Operation::new("T*", vec![]));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

fn place_logo(
    doc: &mut Document,
    xobjects: &mut Dictionary,
    operations: &mut Vec<Operation>,
    path: &Path,
    placement: &Placement,
) {
    let Some((image, width, height)) = load_image(path) else {
        return;
    };
    let image_id: ObjectId = doc.add_object(image);
    xobjects.set(placement.name, image_id);

    let scale = (placement.box_width / width as f32).min(placement.box_height / height as f32);
    let draw_width = width as f32 * scale;
    let draw_height = height as f32 * scale;
    let x = placement.x + (placement.box_width - draw_width) / 2.0;
    let y = placement.y + (placement.box_height - draw_height) / 2.0;

    operations.push(Operation::new("q", vec![]));
    operations.push(Operation::new(
        "cm",
        vec![
            draw_width.into(),
            0.into(),
            0.into(),
            draw_height.into(),
            x.into(),
            y.into(),
        ],
    ));
    operations.push(Operation::new("Do", vec![Object::Name(placement.name.as_bytes().to_vec())]));
    operations.push(Operation::new("Q", vec![]));
}

/// Decodes an image file into an RGB image XObject.
fn load_image(path: &Path) -> Option<(Stream, u32, u32)> {
    let decoded = match image::open(path) {
        Ok(img) => img.to_rgb8(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping logo");
            return None;
        }
    };
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        warn!(path = %path.display(), "skipping empty logo");
        return None;
    }

    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        decoded.into_raw(),
    );
    Some((stream, width, height))
}

//! Builds small invoice PDFs in memory with lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

pub const COLUMN_WIDTH: i64 = 150;
pub const ROW_HEIGHT: i64 = 20;

/// CIDs of the composite font are the character code shifted by this much,
/// so text only reads back correctly through the ToUnicode map.
const CID_OFFSET: u16 = 0x100;

/// Text at (`x`, `y`) in PDF user space, 10pt.
pub fn text_ops(text: &str, x: i64, y: i64) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 10.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

fn line_ops(x1: i64, y1: i64, x2: i64, y2: i64) -> Vec<Operation> {
    vec![
        Operation::new("m", vec![x1.into(), y1.into()]),
        Operation::new("l", vec![x2.into(), y2.into()]),
        Operation::new("S", vec![]),
    ]
}

/// A fully ruled table whose top-left corner sits at (`left`, `top`).
pub fn ruled_table_ops(rows: &[&[&str]], left: i64, top: i64) -> Vec<Operation> {
    let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0) as i64;
    let right = left + cols * COLUMN_WIDTH;
    let bottom = top - rows.len() as i64 * ROW_HEIGHT;

    let mut ops = Vec::new();
    for r in 0..=rows.len() as i64 {
        let y = top - r * ROW_HEIGHT;
        ops.extend(line_ops(left, y, right, y));
    }
    for c in 0..=cols {
        let x = left + c * COLUMN_WIDTH;
        ops.extend(line_ops(x, top, x, bottom));
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let x = left + c as i64 * COLUMN_WIDTH + 5;
            let y = top - r as i64 * ROW_HEIGHT - 15;
            ops.extend(text_ops(cell, x, y));
        }
    }
    ops
}

/// The same rows, left-aligned in columns but with no ruling lines.
pub fn unruled_table_ops(rows: &[&[&str]], left: i64, top: i64) -> Vec<Operation> {
    let mut ops = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let x = left + c as i64 * COLUMN_WIDTH;
            let y = top - r as i64 * ROW_HEIGHT;
            ops.extend(text_ops(cell, x, y));
        }
    }
    ops
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontKind {
    /// Standard 14 Helvetica, single-byte codes, no widths.
    #[default]
    Helvetica,
    /// Identity-H composite font with `/W` widths and a ToUnicode CMap.
    Composite,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Layout {
    pub compress: bool,
    pub font: FontKind,
    /// Lower-left corner of the MediaBox; content is shifted to match.
    pub origin: (i64, i64),
    /// Draw each page through a Form XObject instead of directly.
    pub form_xobject: bool,
}

/// One page per entry; fonts are inherited from the page tree root.
pub fn pdf(pages: Vec<Vec<Operation>>, compress: bool) -> Vec<u8> {
    pdf_with(
        pages,
        Layout {
            compress,
            ..Layout::default()
        },
    )
}

pub fn pdf_with(pages: Vec<Vec<Operation>>, layout: Layout) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = match layout.font {
        FontKind::Helvetica => doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        }),
        FontKind::Composite => composite_font(&mut doc),
    };
    let font_resources = dictionary! { "F1" => font_id };
    let resources_id = doc.add_object(dictionary! { "Font" => font_resources.clone() });

    let (ox, oy) = layout.origin;
    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let mut operations = match layout.font {
            FontKind::Helvetica => operations,
            FontKind::Composite => operations.into_iter().map(to_cid_codes).collect(),
        };
        if layout.origin != (0, 0) {
            let mut shifted = vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![1.into(), 0.into(), 0.into(), 1.into(), ox.into(), oy.into()],
                ),
            ];
            shifted.extend(operations);
            shifted.push(Operation::new("Q", vec![]));
            operations = shifted;
        }

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        };
        let body = Content { operations }.encode().unwrap();
        if layout.form_xobject {
            let form_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Form",
                    "BBox" => vec![
                        Object::Integer(ox),
                        Object::Integer(oy),
                        Object::Integer(ox + 612),
                        Object::Integer(oy + 792),
                    ],
                    "Resources" => resources_id,
                },
                body,
            ));
            let wrapper = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new("Do", vec!["Fm0".into()]),
                    Operation::new("Q", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, wrapper.encode().unwrap()));
            page.set("Contents", content_id);
            page.set(
                "Resources",
                dictionary! {
                    "Font" => font_resources.clone(),
                    "XObject" => dictionary! { "Fm0" => form_id },
                },
            );
        } else {
            let content_id = doc.add_object(Stream::new(dictionary! {}, body));
            page.set("Contents", content_id);
        }
        kids.push(doc.add_object(page).into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(ox),
                Object::Integer(oy),
                Object::Integer(ox + 612),
                Object::Integer(oy + 792),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    if layout.compress {
        doc.compress();
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Type0 font over an Identity-H CIDFont. Every CID is 600/1000 em wide and
/// maps back to `cid - CID_OFFSET` through ToUnicode.
fn composite_font(doc: &mut Document) -> lopdf::ObjectId {
    let first = i64::from(CID_OFFSET);
    let last = first + 0x7F;
    let cmap = format!(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CMapName /Invoice-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n\
         1 beginbfrange\n<{first:04X}> <{last:04X}> <0000>\nendbfrange\n\
         endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\nend\n"
    );
    let to_unicode = doc.add_object(Stream::new(dictionary! {}, cmap.into_bytes()));
    let descriptor = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => "InvoiceSans",
        "Flags" => 32,
        "FontBBox" => vec![Object::Integer(0), Object::Integer(-200), Object::Integer(1000), Object::Integer(900)],
        "ItalicAngle" => 0,
        "Ascent" => 800,
        "Descent" => -200,
        "CapHeight" => 700,
        "StemV" => 80,
    });
    let descendant = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "InvoiceSans",
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor,
        "DW" => 1000,
        "W" => vec![Object::Integer(first), Object::Integer(last), Object::Integer(600)],
    });
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "InvoiceSans",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(descendant)],
        "ToUnicode" => to_unicode,
    })
}

/// Re-encode `Tj` strings as two-byte CIDs for the composite font.
fn to_cid_codes(mut op: Operation) -> Operation {
    if op.operator == "Tj" {
        op.operands = op
            .operands
            .into_iter()
            .map(|operand| match operand {
                Object::String(bytes, _) => {
                    let codes = bytes
                        .iter()
                        .flat_map(|&b| (CID_OFFSET + u16::from(b)).to_be_bytes())
                        .collect();
                    Object::String(codes, StringFormat::Hexadecimal)
                }
                other => other,
            })
            .collect();
    }
    op
}

pub const SAMPLE_ROWS: &[&[&str]] = &[
    &["Item", "Total"],
    &["Contraption", "$1,000.00"],
    &["Widget", "$50"],
    &["Contraption", "$250.50"],
];

/// The reference invoice: one ruled table summing to 1250.5.
pub fn sample_invoice() -> Vec<u8> {
    sample_invoice_with(Layout::default())
}

pub fn sample_invoice_with(layout: Layout) -> Vec<u8> {
    let mut ops = text_ops("FinSight Supplies - Invoice #1042", 50, 740);
    ops.extend(ruled_table_ops(SAMPLE_ROWS, 50, 700));
    pdf_with(vec![ops], layout)
}

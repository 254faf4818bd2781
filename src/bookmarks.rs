//! Document outline for the finished report, written with `lopdf`.
//!
//! `genpdf` cannot emit an outline, so the rendered bytes are parsed again and a flat outline with
//! one entry per page is attached to the catalog.

use lopdf::{dictionary, Document, Object, ObjectId};

use crate::error::ReportError;

/// Outline titles of the chart, ledger and placeholder pages, in page order.
pub const PAGE_TITLES: [&str; 3] = ["Sales Graph", "Ledger", "Sample Table"];

/// Returns `pdf` with an outline entry per page, titled from `titles` in page order.
///
/// Each entry opens its page with the `/Fit` view. The number of titles has to match the number
/// of pages.
pub fn add_page_outline(pdf: &[u8], titles: &[&str]) -> Result<Vec<u8>, ReportError> {
    let mut document = Document::load_mem(pdf)?;
    let pages: Vec<ObjectId> = document.get_pages().into_values().collect();
    if pages.len() != titles.len() || pages.is_empty() {
        return Err(ReportError::OutlinePages {
            titles: titles.len(),
            pages: pages.len(),
        });
    }

    let root = document.new_object_id();
    let items: Vec<ObjectId> = pages.iter().map(|_| document.new_object_id()).collect();

    for (index, (page, title)) in pages.iter().zip(titles).enumerate() {
        let mut item = dictionary! {
            "Title" => Object::string_literal(*title),
            "Parent" => root,
            "Dest" => vec![Object::from(*page), Object::from("Fit")],
        };
        if let Some(previous) = index.checked_sub(1) {
            item.set("Prev", items[previous]);
        }
        if let Some(next) = items.get(index + 1) {
            item.set("Next", *next);
        }
        document.objects.insert(items[index], item.into());
    }

    let outline = dictionary! {
        "Type" => "Outlines",
        "Count" => items.len() as i64,
        "First" => items[0],
        "Last" => items[items.len() - 1],
    };
    document.objects.insert(root, outline.into());
    document.catalog_mut()?.set("Outlines", root);

    let mut bytes = Vec::new();
    document.save_to(&mut bytes)?;
    Ok(bytes)
}

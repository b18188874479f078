use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

type FixtureResult<T> = Result<T, Box<dyn std::error::Error>>;

fn page_content(lines: &[&str]) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("TL", vec![16.into()]),
        Operation::new("Td", vec![50.into(), 780.into()]),
    ];
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
    }
    operations.push(Operation::new("ET", vec![]));
    Content { operations }
}

/// One Courier page per entry of `pages`, so column gaps survive text
/// extraction. An empty slice gives a page tree with no kids.
fn courier_document(pages: &[Vec<&str>]) -> FixtureResult<Document> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(pages.len());
    for lines in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(lines).encode()?));
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        }));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<Object>>(),
            "Count" => i64::try_from(page_ids.len())?,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    Ok(doc)
}

fn save(mut doc: Document) -> FixtureResult<Vec<u8>> {
    doc.compress();
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

pub fn build_test_pdf(pages: &[Vec<&str>]) -> FixtureResult<Vec<u8>> {
    save(courier_document(pages)?)
}

pub fn create_test_pdf(path: &Path, pages: &[Vec<&str>]) -> FixtureResult<()> {
    std::fs::write(path, build_test_pdf(pages)?)?;
    Ok(())
}

/// A table PDF whose trailer names a standard security handler.
pub fn build_encrypted_test_pdf(pages: &[Vec<&str>]) -> FixtureResult<Vec<u8>> {
    let mut doc = courier_document(pages)?;
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "O" => Object::string_literal(vec![0_u8; 32]),
        "U" => Object::string_literal(vec![0_u8; 32]),
        "P" => -44,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    save(doc)
}

pub fn build_pageless_test_pdf() -> FixtureResult<Vec<u8>> {
    build_test_pdf(&[])
}

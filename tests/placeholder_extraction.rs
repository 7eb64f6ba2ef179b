mod common;

use reportcam::{Error, inspect_template_bytes};

#[test]
fn single_numbered_placeholder_with_physical_size() {
    let _ = env_logger::try_init();
    let body = common::table_body(&[("PHOTO1", Some(1600), Some(800))]);
    let docx = common::build_docx(&common::document_xml(&body));

    let specs = inspect_template_bytes(&docx).unwrap();
    assert_eq!(specs.len(), 1);
    let spec = &specs[0];
    assert_eq!(spec.token, "PHOTO1");
    assert_eq!((spec.table_index, spec.row_index, spec.col_index), (0, 0, 0));
    assert_eq!(spec.width_mm, Some(28.22));
    assert_eq!(spec.height_mm, Some(14.11));
}

#[test]
fn document_without_tables_yields_empty_list() {
    let _ = env_logger::try_init();
    let docx = common::build_docx(&common::document_xml("<w:p><w:r><w:t>hello</w:t></w:r></w:p>"));
    let specs = inspect_template_bytes(&docx).unwrap();
    assert!(specs.is_empty());
}

#[test]
fn extraction_order_is_document_order() {
    let _ = env_logger::try_init();
    let body = common::table_body(&[
        ("PHOTO2", Some(1600), Some(800)),
        ("note", Some(1600), None),
        ("PHOTO1", Some(3200), Some(800)),
    ]);
    let docx = common::build_docx(&common::document_xml(&body));

    let specs = inspect_template_bytes(&docx).unwrap();
    // Order follows position in the document, not token numbering.
    let tokens: Vec<&str> = specs.iter().map(|s| s.token.as_str()).collect();
    assert_eq!(tokens, vec!["PHOTO2", "PHOTO1"]);
    assert!(specs[0].row_index < specs[1].row_index);
}

#[test]
fn missing_width_is_unknown_not_zero() {
    let _ = env_logger::try_init();
    let body = common::table_body(&[("PHOTO1", None, Some(800))]);
    let docx = common::build_docx(&common::document_xml(&body));

    let specs = inspect_template_bytes(&docx).unwrap();
    assert_eq!(specs[0].width_mm, None);
    assert_eq!(specs[0].height_mm, Some(14.11));
}

#[test]
fn reinspection_is_idempotent() {
    let _ = env_logger::try_init();
    let body = common::table_body(&[("PHOTO1", Some(1600), Some(800)), ("PHOTO2", Some(900), None)]);
    let docx = common::build_docx(&common::document_xml(&body));

    let a = inspect_template_bytes(&docx).unwrap();
    let b = inspect_template_bytes(&docx).unwrap();
    assert_eq!(a, b);
}

#[test]
fn package_without_document_part_is_an_archive_error() {
    let _ = env_logger::try_init();
    let err = inspect_template_bytes(b"not a zip at all").unwrap_err();
    assert!(matches!(err, Error::Archive(_)));
}

mod common;

use common::*;
use image::ColorType;
use mydocs::constants::COMPLETION_MARKER;
use mydocs::{MemorySink, Operation, OutputFormat, SizeClass, Target};
use std::fs;
use std::rc::Rc;

const TO_JPEG: Operation = Operation::Convert(Target::Image(OutputFormat::Jpeg));

#[test]
fn test_png_to_jpeg_with_copy() {
    let temp_dir = create_temp_directory();
    let photo = write_png(temp_dir.path(), "photo.png");
    let root = temp_dir.path().join("myDocs");

    let mut sink = MemorySink::new();
    let summary = processor(&root, false, 0).run_all(&[photo], &[TO_JPEG], &mut sink);

    assert_eq!(list_files(&root), vec!["photo.jpeg", "photo.png"]);
    assert!(sink.contains("--> Processing file: photo.png"));
    assert!(sink.contains("    Standard Output Folder: myDocs/"));
    assert!(sink.contains("    - [A4] Converted to JPEG at "));
    assert!(sink.contains("Copied original file to "));
    assert_eq!(sink.lines.last().map(String::as_str), Some(COMPLETION_MARKER));
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);

    let jpeg = image::open(root.join("photo.jpeg")).unwrap();
    assert_eq!((jpeg.width(), jpeg.height()), (16, 12));
}

#[test]
fn test_pdf_pages_become_numbered_jpegs() {
    let temp_dir = create_temp_directory();
    let doc = write_fake_pdf(temp_dir.path(), "doc.pdf");
    let root = temp_dir.path().join("out");

    let mut sink = MemorySink::new();
    let summary = processor(&root, false, 3).run_all(&[doc], &[Operation::ConvertAll], &mut sink);

    assert_eq!(
        list_files(&root),
        vec!["doc.pdf", "doc_page_1.jpeg", "doc_page_2.jpeg", "doc_page_3.jpeg"]
    );
    assert!(sink.contains("[A1] Page 1 converted to JPEG at "));
    assert!(sink.contains("[A1] Page 3 converted to JPEG at "));
    assert_eq!(summary.succeeded, 4);
}

#[test]
fn test_rerun_does_not_rasterize_existing_pages() {
    let temp_dir = create_temp_directory();
    let doc = write_fake_pdf(temp_dir.path(), "doc.pdf");
    let root = temp_dir.path().join("out");
    let rasterizer = FakeRasterizer::new(3);
    let renders = Rc::clone(&rasterizer.renders);
    let processor = processor_with(&root, false, rasterizer);
    let to_png = [Operation::Convert(Target::Image(OutputFormat::Png))];

    processor.run_all(&[doc.clone()], &to_png, &mut MemorySink::new());
    assert_eq!(renders.get(), 3);

    let mut sink = MemorySink::new();
    processor.run_all(&[doc], &to_png, &mut sink);
    assert_eq!(renders.get(), 3);
    assert!(sink.contains("[A3] Page 1 skipped (exists)."));
    assert!(sink.contains("[A3] Page 3 skipped (exists)."));
}

#[test]
fn test_pdf_to_pdf_is_reported_as_skip() {
    let temp_dir = create_temp_directory();
    let doc = write_fake_pdf(temp_dir.path(), "doc.pdf");
    let root = temp_dir.path().join("out");

    let mut sink = MemorySink::new();
    processor(&root, false, 2).run_all(&[doc], &[Operation::Convert(Target::Pdf)], &mut sink);

    assert!(sink.contains("    - [A2] Skipped: PDF cannot be converted to PDF."));
    assert_eq!(list_files(&root), vec!["doc.pdf"]);
}

#[test]
fn test_second_run_only_skips() {
    let temp_dir = create_temp_directory();
    let photo = write_png(temp_dir.path(), "photo.png");
    let doc = write_fake_pdf(temp_dir.path(), "doc.pdf");
    let root = temp_dir.path().join("out");
    let files = vec![photo, doc];
    let operations = Operation::master_selection();
    let processor = processor(&root, true, 2);

    let first = processor.run_all(&files, &operations, &mut MemorySink::new());
    let before = list_files(&root);
    let jpeg_bytes = fs::read(root.join("jpeg").join("photo.jpeg")).unwrap();

    let mut sink = MemorySink::new();
    let second = processor.run_all(&files, &operations, &mut sink);

    assert_eq!(second.succeeded, 0);
    assert_eq!(second.failed, first.failed);
    assert_eq!(second.skipped, first.succeeded + first.skipped);
    assert_eq!(list_files(&root), before);
    assert_eq!(fs::read(root.join("jpeg").join("photo.jpeg")).unwrap(), jpeg_bytes);
    assert!(sink.contains("Skipped. Target file already exists: photo.jpeg"));
    assert!(sink.contains("Page 2 skipped (exists)."));
    assert!(sink.contains("Skipped: Original file copy already exists in png"));
}

#[test]
fn test_separate_and_flat_layouts_hold_identical_bytes() {
    let temp_dir = create_temp_directory();
    let photo = write_png(temp_dir.path(), "photo.png");
    let flat = temp_dir.path().join("flat");
    let split = temp_dir.path().join("split");
    let operations = [Operation::ConvertAll];

    processor(&flat, false, 0).run_all(&[photo.clone()], &operations, &mut MemorySink::new());
    processor(&split, true, 0).run_all(&[photo], &operations, &mut MemorySink::new());

    assert_eq!(
        list_files(&split),
        vec![
            "bmp/photo.bmp",
            "jpeg/photo.jpeg",
            "pdf/photo.pdf",
            "png/photo.png",
            "tiff/photo.tiff",
            "webp/photo.webp"
        ]
    );
    for name in ["photo.bmp", "photo.jpeg", "photo.tiff", "photo.webp"] {
        let ext = name.rsplit('.').next().unwrap();
        assert_eq!(
            fs::read(flat.join(name)).unwrap(),
            fs::read(split.join(ext).join(name)).unwrap(),
            "{name} differs between layouts"
        );
    }
}

#[test]
fn test_master_selection_on_jpeg_source() {
    let temp_dir = create_temp_directory();
    let photo = write_jpeg(temp_dir.path(), "photo.jpg", 32, 32);
    let root = temp_dir.path().join("out");

    let mut sink = MemorySink::new();
    let summary =
        processor(&root, false, 0).run_all(&[photo], &Operation::master_selection(), &mut sink);

    assert_eq!(
        list_files(&root),
        vec![
            "photo.bmp",
            "photo.jpg",
            "photo.pdf",
            "photo.png",
            "photo.tiff",
            "photo.webp",
            "photo_comp_1MB.jpg",
            "photo_comp_250KB.jpg",
            "photo_comp_500KB.jpg",
            "photo_comp_5MB.jpg",
        ]
    );
    assert!(sink.contains("[B1] Successfully compressed to 5 MB at Q=90"));
    assert_eq!(summary.succeeded, 10);
    assert_eq!(summary.skipped, 0);
}

#[test]
fn test_compression_leaves_only_the_final_attempt() {
    let temp_dir = create_temp_directory();
    let photo = write_jpeg(temp_dir.path(), "noise.jpg", 640, 640);
    let root = temp_dir.path().join("out");
    let budget = SizeClass::Kb250.max_bytes();

    let mut sink = MemorySink::new();
    let summary = processor(&root, true, 0).run_all(
        &[photo],
        &[Operation::Compress(SizeClass::Kb250)],
        &mut sink,
    );

    let target = root.join("compressed").join("noise_comp_250KB.jpg");
    let compressed: Vec<String> = list_files(&root)
        .into_iter()
        .filter(|name| name.starts_with("compressed/"))
        .collect();

    if summary.failed == 0 {
        assert_eq!(compressed, vec!["compressed/noise_comp_250KB.jpg"]);
        assert!(fs::metadata(&target).unwrap().len() <= budget);
        assert!(sink.contains("[B2] Successfully compressed to 250 KB at Q="));
    } else {
        assert!(compressed.is_empty());
        assert!(sink.contains("[B2] Failed to compress to 250 KB. Smallest size achieved was"));
    }
}

#[test]
fn test_png_is_not_compressed() {
    let temp_dir = create_temp_directory();
    let photo = write_png(temp_dir.path(), "photo.png");
    let root = temp_dir.path().join("out");

    let mut sink = MemorySink::new();
    processor(&root, false, 0).run_all(&[photo], &[Operation::CompressAll], &mut sink);

    let skips = sink
        .lines
        .iter()
        .filter(|l| l.contains("[B1] Skipped: Compression logic only implemented for JPG/JPEG."))
        .count();
    assert_eq!(skips, 4);
    assert_eq!(list_files(&root), vec!["photo.png"]);
}

#[test]
fn test_transparency_is_flattened_only_for_jpeg() {
    let temp_dir = create_temp_directory();
    let photo = write_transparent_png(temp_dir.path(), "glass.png");
    let root = temp_dir.path().join("out");

    processor(&root, false, 0).run_all(
        &[photo],
        &[TO_JPEG, Operation::Convert(Target::Image(OutputFormat::WebP))],
        &mut MemorySink::new(),
    );

    let jpeg = image::open(root.join("glass.jpeg")).unwrap();
    assert_eq!(jpeg.color(), ColorType::Rgb8);
    let webp = image::open(root.join("glass.webp")).unwrap();
    assert!(webp.color().has_alpha());
}

#[test]
fn test_batch_continues_past_unsupported_and_broken_files() {
    let temp_dir = create_temp_directory();
    let notes = temp_dir.path().join("notes.txt");
    fs::write(&notes, b"plain text").unwrap();
    let broken = temp_dir.path().join("broken.png");
    fs::write(&broken, b"fake image data").unwrap();
    let photo = write_png(temp_dir.path(), "photo.png");
    let root = temp_dir.path().join("out");

    let mut lines = Vec::new();
    let mut sink = |line: &str| lines.push(line.to_string());
    let summary = processor(&root, false, 0).run_all(&[notes, broken, photo], &[TO_JPEG], &mut sink);

    assert_eq!(summary.files, 3);
    assert!(lines.iter().any(|l| l == "    - [A4] Skipped: Unsupported source extension 'txt'."));
    assert!(lines.iter().any(|l| l.starts_with("    - [A4] Conversion failed: ")));
    assert!(root.join("photo.jpeg").exists());
    assert!(!root.join("broken.jpeg").exists());
    // Originals are copied even when nothing could be converted.
    assert!(root.join("notes.txt").exists());
    assert!(root.join("broken.png").exists());
    assert_eq!(lines.last().map(String::as_str), Some(COMPLETION_MARKER));
}

use std::fs;

use procdoc_client::{ensure_output_dir, export_filename, AtomicFileWriter, PersistError};

#[test]
fn export_filename_is_deterministic() {
    let a = export_filename("documentation", "0f8b2c1a-77aa-4f6e-9a1e-6a9a1c2d3e4f", "md");
    let b = export_filename("documentation", "0f8b2c1a-77aa-4f6e-9a1e-6a9a1c2d3e4f", "md");
    assert_eq!(a, b);
    assert!(a.starts_with("documentation_0f8b2c1a-77aa-4f6e-9a1e-6a9a1c2d3e4f--"));
    assert!(a.ends_with(".md"));
}

#[test]
fn export_filename_sanitizes_hostile_session_ids() {
    let name = export_filename("transcription", "../..\\evil:id?", "txt");
    assert!(!name.contains('/'));
    assert!(!name.contains('\\'));
    assert!(!name.contains(':'));
    assert!(!name.contains('?'));
    assert!(name.ends_with(".txt"));
}

#[test]
fn different_session_ids_produce_different_names() {
    let a = export_filename("documentation", "session-a", "md");
    let b = export_filename("documentation", "session-b", "md");
    assert_ne!(a, b);
}

#[test]
fn atomic_writer_creates_and_replaces() {
    let dir = tempfile::tempdir().expect("tempdir");
    let writer = AtomicFileWriter::new(dir.path().to_path_buf());

    let path = writer.write("doc.md", "first").expect("write");
    assert_eq!(fs::read_to_string(&path).expect("read"), "first");

    let path = writer.write("doc.md", "second").expect("rewrite");
    assert_eq!(fs::read_to_string(&path).expect("read"), "second");
}

#[test]
fn atomic_writer_round_trips_bytes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let writer = AtomicFileWriter::new(dir.path().to_path_buf());

    let body = vec![0u8, 159, 146, 150];
    let path = writer.write_bytes("doc.docx", &body).expect("write");
    assert_eq!(fs::read(&path).expect("read"), body);
}

#[test]
fn ensure_output_dir_rejects_a_file_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("occupied");
    fs::write(&file_path, "x").expect("write");

    let err = ensure_output_dir(&file_path).unwrap_err();
    assert!(matches!(err, PersistError::OutputDir(_)));
}

#[test]
fn ensure_output_dir_creates_missing_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("exports").join("docs");

    ensure_output_dir(&nested).expect("create");
    assert!(nested.is_dir());
}

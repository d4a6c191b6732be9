//! Upload / convert / download flow through a workspace.

use fileshift::{ConverterConfig, Error, Format, Workspace};
use tempfile::TempDir;

fn workspace(dir: &TempDir) -> Workspace {
    Workspace::new(
        &ConverterConfig::new()
            .with_scratch_dir(dir.path())
            .with_office_path(dir.path().join("missing-soffice")),
    )
}

fn scratch_files(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn txt_upload_offers_its_targets() {
    let dir = TempDir::new().unwrap();
    let workspace = workspace(&dir);
    let session = workspace.upload("notes.txt", b"hello").unwrap();
    assert_eq!(
        session.targets(),
        vec![Format::Docx, Format::Pdf, Format::Png]
    );

    let pptx = workspace.upload("deck.pptx", b"PK").unwrap();
    assert_eq!(pptx.targets(), vec![Format::Pdf, Format::Zip]);
}

#[test]
fn several_targets_from_one_upload() {
    let dir = TempDir::new().unwrap();
    let workspace = workspace(&dir);
    let mut session = workspace.upload("minutes.txt", b"agenda\naction items\n").unwrap();

    let docx = session.convert("docx").unwrap();
    let png = session.convert("png").unwrap();

    assert_eq!(docx.file_name, "minutes_converted.docx");
    assert_eq!(
        docx.mime_type,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(png.file_name, "minutes_converted.png");
    assert_eq!(png.mime_type, "image/png");
    assert_eq!(fileshift::extract_text(&docx.path).unwrap(), "agenda\naction items");

    let id = session.id();
    assert_eq!(
        scratch_files(&dir),
        vec![
            format!("input_{id}.txt"),
            format!("output_{id}.docx"),
            format!("output_{id}.png"),
        ]
    );

    drop(session);
    assert!(scratch_files(&dir).is_empty());
}

#[test]
fn failed_conversion_keeps_session_usable() {
    let dir = TempDir::new().unwrap();
    let workspace = workspace(&dir);
    let mut session = workspace.upload("deck.pptx", b"PK\x05\x06").unwrap();

    let err = session.convert("pdf").unwrap_err();
    assert!(matches!(err, Error::CapabilityUnavailable { .. }));

    let id = session.id();
    assert_eq!(scratch_files(&dir), vec![format!("input_{id}.pptx")]);
}

#[test]
fn unknown_upload_is_rejected_without_writing() {
    let dir = TempDir::new().unwrap();
    let workspace = workspace(&dir);

    let err = workspace.upload("photo.heic", b"....").unwrap_err();
    assert!(matches!(err, Error::UnsupportedSource(ref name) if name == "photo.heic"));
    assert!(scratch_files(&dir).is_empty());
}

#[test]
fn sessions_do_not_share_files() {
    let dir = TempDir::new().unwrap();
    let workspace = workspace(&dir);
    let mut first = workspace.upload("a.txt", b"first").unwrap();
    let second = workspace.upload("a.txt", b"second").unwrap();
    assert_ne!(first.id(), second.id());

    let download = first.convert("pdf").unwrap();
    drop(second);
    assert!(download.path.exists());
    assert!(first.input_path().exists());
}

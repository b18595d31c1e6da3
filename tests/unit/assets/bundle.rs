use std::io::{Read, Write};

use super::*;

fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .add_directory("Skin/", zip::write::SimpleFileOptions::default())
        .unwrap();
    for (name, data) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[test]
fn open_matches_names_case_insensitively() {
    let bundle = SkinBundle::from_entries([("MAIN.BMP", vec![1u8, 2, 3])]);

    let mut buf = Vec::new();
    bundle.open("main.bmp").unwrap().read_to_end(&mut buf).unwrap();
    assert_eq!(buf, vec![1, 2, 3]);
    assert!(bundle.contains("Main.Bmp"));
}

#[test]
fn open_missing_name_is_not_found() {
    let bundle = SkinBundle::from_entries([("main.bmp", vec![0u8])]);
    let err = bundle.open("cbuttons.bmp").unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("cbuttons.bmp"));
}

#[test]
fn zip_entries_are_indexed_lowercase_and_dirs_skipped() {
    let bytes = zip_bytes(&[("MAIN.BMP", b"abc"), ("Skin/TEXT.bmp", b"xyz")]);
    let bundle = SkinBundle::from_zip_bytes(&bytes).unwrap();

    assert_eq!(bundle.len(), 2);
    assert_eq!(bundle.names(), vec!["main.bmp", "skin/text.bmp"]);
    assert_eq!(bundle.bytes("main.bmp").unwrap(), b"abc");
    assert_eq!(bundle.bytes("SKIN/text.BMP").unwrap(), b"xyz");
}

#[test]
fn garbage_archive_is_an_error() {
    assert!(SkinBundle::from_zip_bytes(b"definitely not a zip").is_err());
}

#[test]
fn dir_bundle_reads_flat_files() {
    let dir = std::env::temp_dir().join(format!(
        "skinamp_bundle_dir_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(dir.join("nested")).unwrap();
    std::fs::write(dir.join("NUMBERS.BMP"), b"n").unwrap();
    std::fs::write(dir.join("nested").join("ignored.bmp"), b"i").unwrap();

    let bundle = SkinBundle::from_dir(&dir).unwrap();
    assert_eq!(bundle.names(), vec!["numbers.bmp"]);
    assert_eq!(bundle.bytes("numbers.bmp").unwrap(), b"n");

    std::fs::remove_dir_all(&dir).ok();
}

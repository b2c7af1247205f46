//! End-to-end tests for the voicebank import pipeline.
//!
//! Each test builds a small zip voicebank in a temp file, installs it into its
//! own TempDir and inspects the hashed output tree:
//!
//! - **Layout** -- records, images and samples land where the hashing rules say
//! - **Records** -- JSON contents, origin fields and skipped lines
//! - **Encodings** -- Shift_JIS entry names and control files, undetectable names
//! - **Progress** -- one report per file entry, ending at 100
//! - **Failures** -- invalid archives and roots

use encoding_rs::SHIFT_JIS;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};
use vbimport::hash::{hash_key, hash_segment};
use vbimport::{ImportError, Importer};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Helper: write a zip archive with the given entries. Names ending in `/` become
/// directory entries.
fn create_zip(entries: &[(&str, &[u8])]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    {
        let mut writer = ZipWriter::new(tmp.as_file_mut());
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }
        }
        writer.finish().unwrap();
    }
    tmp
}

/// Helper: write a zip archive whose entry names are arbitrary bytes.
///
/// `ZipWriter` only accepts UTF-8 names, so each entry is stored under an ASCII
/// placeholder of the same byte length which is then replaced in the finished
/// archive. Entries are stored uncompressed so contents cannot collide with it.
fn create_zip_raw(entries: &[(Vec<u8>, &[u8])]) -> NamedTempFile {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let placeholders: Vec<Vec<u8>> = entries
        .iter()
        .enumerate()
        .map(|(i, (name, _))| vec![b'A' + i as u8; name.len()])
        .collect();
    for ((_, data), placeholder) in entries.iter().zip(&placeholders) {
        writer
            .start_file(String::from_utf8(placeholder.clone()).unwrap(), options)
            .unwrap();
        writer.write_all(data).unwrap();
    }
    let mut bytes = writer.finish().unwrap().into_inner();

    for ((name, _), placeholder) in entries.iter().zip(&placeholders) {
        let mut i = 0;
        while i + placeholder.len() <= bytes.len() {
            if bytes[i..i + placeholder.len()] == placeholder[..] {
                bytes[i..i + placeholder.len()].copy_from_slice(name);
                i += placeholder.len();
            } else {
                i += 1;
            }
        }
    }

    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(&bytes).unwrap();
    tmp.flush().unwrap();
    tmp
}

fn sjis(s: &str) -> Vec<u8> {
    let (bytes, _, unmappable) = SHIFT_JIS.encode(s);
    assert!(!unmappable);
    bytes.into_owned()
}

/// A voicebank with every kind of entry the router knows about.
fn sample_voicebank() -> NamedTempFile {
    create_zip(&[
        ("teto/", b""),
        (
            "teto/character.txt",
            b"name=Teto\nimage=icon.bmp\nauthor=Someone\nweb=http://example.com\n",
        ),
        ("teto/icon.bmp", b"BM fake bitmap"),
        (
            "teto/oto.ini",
            "a.wav=a,10,20,30,40,50\nbroken line\nか.wav=- か,-5,100,-200,60,30\n".as_bytes(),
        ),
        ("teto/a.wav", b"RIFF a"),
        ("teto/か.wav", b"RIFF ka"),
        ("teto/a_wav.frq", b"FREQ0003"),
        ("teto/prefix.map", "C4\t↑\nC4\t↓\nD4 x y\n".as_bytes()),
        ("teto/readme.txt", b"dropped"),
        ("teto/append/", b""),
        ("teto/append/oto.ini", b"b.wav=b,1,2,3,4,5\n"),
    ])
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn install_produces_hashed_layout() {
    let archive = sample_voicebank();
    let out = TempDir::new().unwrap();

    let stats = Importer::new(out.path())
        .unwrap()
        .install_zip(archive.path(), |_, _| {})
        .unwrap();

    let dir = hash_key("teto").to_path(out.path());
    assert!(dir.join("_voicebank.json").is_file());
    assert!(dir.join("_oto.json").is_file());
    assert!(dir.join("_prefix_map.json").is_file());
    assert_eq!(fs::read(dir.join("icon.bmp")).unwrap(), b"BM fake bitmap");
    assert_eq!(
        fs::read(dir.join(format!("{}.wav", hash_segment("a")))).unwrap(),
        b"RIFF a"
    );
    assert_eq!(
        fs::read(dir.join(format!("{}.wav", hash_segment("か")))).unwrap(),
        b"RIFF ka"
    );
    assert_eq!(
        fs::read(dir.join(format!("{}_wav.frq", hash_segment("a")))).unwrap(),
        b"FREQ0003"
    );
    assert!(hash_key("teto/append")
        .to_path(out.path())
        .join("_oto.json")
        .is_file());
    assert!(!dir.join("readme.txt").exists());

    assert_eq!(stats.entries_total, 9);
    assert_eq!(stats.entries_processed, 9);
    assert_eq!(stats.records_written, 4);
    assert_eq!(stats.files_copied, 1);
    assert_eq!(stats.files_hashed, 3);
    assert_eq!(stats.entries_dropped, 1);
    assert_eq!(stats.lines_skipped, 2);
}

#[test]
fn output_names_are_ascii() {
    let archive = sample_voicebank();
    let out = TempDir::new().unwrap();
    Importer::new(out.path())
        .unwrap()
        .install_zip(archive.path(), |_, _| {})
        .unwrap();

    let mut stack = vec![out.path().to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let entry = entry.unwrap();
            let name = entry.file_name();
            assert!(name.to_str().unwrap().is_ascii(), "{:?}", name);
            if entry.file_type().unwrap().is_dir() {
                assert_eq!(name.len(), 8);
                stack.push(entry.path());
            }
        }
    }
}

#[test]
fn oto_record_contents() {
    let archive = sample_voicebank();
    let out = TempDir::new().unwrap();
    Importer::new(out.path())
        .unwrap()
        .install_zip(archive.path(), |_, _| {})
        .unwrap();

    let dir = hash_key("teto").to_path(out.path());
    let json = read_json(&dir.join("_oto.json"));

    assert_eq!(json["original_file"], "teto/oto.ini");
    assert_eq!(
        json["normalized_file"],
        format!("{}/_oto.json", hash_key("teto"))
    );

    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "a");
    assert_eq!(entries[0]["original_wav"], "a.wav");
    assert_eq!(entries[0]["offset"], 10);
    assert_eq!(entries[0]["consonant"], 20);
    assert_eq!(entries[0]["cutoff"], 30);
    assert_eq!(entries[0]["preutter"], 40);
    assert_eq!(entries[0]["overlap"], 50);
    assert_eq!(entries[1]["name"], "- か");
    assert_eq!(entries[1]["offset"], -5);
    assert_eq!(entries[1]["cutoff"], -200);

    // Hashed wave references resolve to the copied samples.
    for entry in entries {
        let wav = entry["wav"].as_str().unwrap();
        assert!(dir.join(wav).is_file(), "missing sample {}", wav);
    }
}

#[test]
fn metadata_and_prefix_records() {
    let archive = sample_voicebank();
    let out = TempDir::new().unwrap();
    Importer::new(out.path())
        .unwrap()
        .install_zip(archive.path(), |_, _| {})
        .unwrap();

    let dir = hash_key("teto").to_path(out.path());

    let meta = read_json(&dir.join("_voicebank.json"));
    assert_eq!(meta["original_file"], "teto/character.txt");
    assert_eq!(meta["name"], "Teto");
    assert_eq!(meta["image"], "icon.bmp");
    assert_eq!(meta["author"], "Someone");
    assert_eq!(meta["web"], "http://example.com");
    // The image keeps its name, so the metadata reference still resolves.
    assert!(dir.join(meta["image"].as_str().unwrap()).is_file());

    let prefix = read_json(&dir.join("_prefix_map.json"));
    assert_eq!(prefix["original_file"], "teto/prefix.map");
    let map = prefix["map"].as_object().unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map["C4"], "↓");
}

#[test]
fn shift_jis_control_file_with_text_encoding() {
    let (oto, _, _) = SHIFT_JIS.encode("あ.wav=あ,1,2,3,4,5\r\nい.wav=い,6,7,8,9,10\r\n");
    let (character, _, _) = SHIFT_JIS.encode("name=重音テト\r\n");
    let archive = create_zip(&[
        ("bank/oto.ini", oto.as_ref()),
        ("bank/character.txt", character.as_ref()),
    ]);
    let out = TempDir::new().unwrap();

    Importer::new(out.path())
        .unwrap()
        .with_text_encoding(SHIFT_JIS)
        .install_zip(archive.path(), |_, _| {})
        .unwrap();

    let dir = hash_key("bank").to_path(out.path());
    let json = read_json(&dir.join("_oto.json"));
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "あ");
    assert_eq!(entries[0]["original_wav"], "あ.wav");
    assert_eq!(entries[1]["overlap"], 10);

    let meta = read_json(&dir.join("_voicebank.json"));
    assert_eq!(meta["name"], "重音テト");
}

#[test]
fn shift_jis_entry_names_are_detected() {
    let oto = sjis("あ.wav=- あ,1,2,3,4,5\r\nか.wav=- か,6,7,8,9,10\r\n");
    let kana = ["あ", "か", "さ", "た", "な", "は", "ま"];
    let mut entries = vec![(sjis("単独音/oto.ini"), oto.as_slice())];
    entries.extend(
        kana.iter()
            .map(|k| (sjis(&format!("単独音/{}.wav", k)), b"RIFF".as_slice())),
    );
    let archive = create_zip_raw(&entries);
    let out = TempDir::new().unwrap();

    let mut labels = Vec::new();
    Importer::new(out.path())
        .unwrap()
        .install_zip(archive.path(), |_, label| labels.push(label.to_string()))
        .unwrap();

    let mut expected = vec!["単独音/oto.ini".to_string()];
    expected.extend(kana.iter().map(|k| format!("単独音/{}.wav", k)));
    assert_eq!(labels, expected);

    let dir = hash_key("単独音").to_path(out.path());
    for k in kana {
        assert_eq!(
            fs::read(dir.join(format!("{}.wav", hash_segment(k)))).unwrap(),
            b"RIFF"
        );
    }

    let json = read_json(&dir.join("_oto.json"));
    assert_eq!(json["original_file"], "単独音/oto.ini");
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["name"], "- か");
    assert_eq!(entries[1]["original_wav"], "か.wav");
    for entry in entries {
        assert!(dir.join(entry["wav"].as_str().unwrap()).is_file());
    }
}

#[test]
fn undetectable_names_abort_before_writing() {
    let archive = create_zip(&[
        ("teto/oto.ini", b"a.wav=a,1,2,3,4,5\n"),
        ("teto/か.wav", b"RIFF ka"),
        ("teto/bad\u{1}.wav", b"RIFF"),
    ]);
    let out = TempDir::new().unwrap();
    let root = out.path().join("bank");

    let result = Importer::new(&root)
        .unwrap()
        .install_zip(archive.path(), |_, _| {});

    assert!(matches!(result, Err(ImportError::Detection(_))));
    assert!(!root.exists());
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn progress_reports_once_per_file() {
    let archive = sample_voicebank();
    let out = TempDir::new().unwrap();

    let mut reports: Vec<(u32, String)> = Vec::new();
    Importer::new(out.path())
        .unwrap()
        .install_zip(archive.path(), |percent, label| {
            reports.push((percent, label.to_string()))
        })
        .unwrap();

    assert_eq!(reports.len(), 9);
    assert!(reports.windows(2).all(|w| w[0].0 <= w[1].0));
    assert_eq!(reports.iter().filter(|(p, _)| *p == 100).count(), 1);
    assert_eq!(reports.last().unwrap(), &(100, "teto/append/oto.ini".to_string()));
    assert!(reports.iter().any(|(_, label)| label == "teto/か.wav"));
}

#[test]
fn reinstall_overwrites_records() {
    let archive = sample_voicebank();
    let out = TempDir::new().unwrap();
    let importer = Importer::new(out.path()).unwrap();

    importer.install_zip(archive.path(), |_, _| {}).unwrap();
    let first = fs::read(hash_key("teto").to_path(out.path()).join("_oto.json")).unwrap();
    importer.install_zip(archive.path(), |_, _| {}).unwrap();
    let second = fs::read(hash_key("teto").to_path(out.path()).join("_oto.json")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn top_level_entries_land_in_root() {
    let archive = create_zip(&[("prefix.map", b"C4 x\n"), ("logo.png", b"\x89PNG")]);
    let out = TempDir::new().unwrap();
    Importer::new(out.path())
        .unwrap()
        .install_zip(archive.path(), |_, _| {})
        .unwrap();

    let prefix = read_json(&out.path().join("_prefix_map.json"));
    assert_eq!(prefix["normalized_file"], "_prefix_map.json");
    assert!(out.path().join("logo.png").is_file());
}

#[test]
fn invalid_archive_fails() {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(b"definitely not a zip file").unwrap();
    tmp.flush().unwrap();
    let out = TempDir::new().unwrap();

    let result = Importer::new(out.path())
        .unwrap()
        .install_zip(tmp.path(), |_, _| {});
    assert!(matches!(result, Err(ImportError::Archive(_))));
}

#[test]
fn missing_archive_is_io_error() {
    let out = TempDir::new().unwrap();
    let result = Importer::new(out.path())
        .unwrap()
        .install_zip(Path::new("/nonexistent/voicebank.zip"), |_, _| {});
    assert!(matches!(result, Err(ImportError::Io { .. })));
}

#[test]
fn invalid_root_fails_before_io() {
    let root = format!("/tmp/{}", "x".repeat(80));
    assert!(matches!(
        Importer::new(root),
        Err(ImportError::Configuration(_))
    ));
}

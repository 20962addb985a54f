//! Edge case tests for archives, filtering and batch files.

use std::fs;
use std::io::Cursor;

use zimpack::archive::ZimBuilder;
use zimpack::core::batch::{BatchWriter, GzipCodec, read_batch_dir, read_batch_file};
use zimpack::core::filter::admitted;
use zimpack::prelude::*;

const HU: &str = "(egyértelműsítő lap)";
const EN: &str = "(disambiguation)";

// =========================================================================
// Empty inputs
// =========================================================================

#[test]
fn test_empty_archive_produces_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.zim");
    ZimBuilder::new().write_to(&input).unwrap();
    let out = dir.path().join("out");

    let stats = extract(
        &ExtractConfig::new(&input, &out),
        &DisambiguationTable::default(),
        no_events(),
    )
    .unwrap();

    assert_eq!(stats.records_seen, 0);
    assert!(stats.files.is_empty());
    assert!(out.is_dir());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_empty_payload_is_a_bare_length_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let mut archive = MemoryArchive::new().with_article("Stub", Vec::new());
    let mut filter = RecordFilter::new(FilterConfig::new(EN));
    let writer = BatchWriter::new(dir.path(), 10, 4).unwrap();
    run_pipeline(&mut archive, &mut filter, writer).unwrap();

    let path = dir.path().join("0001.htmls.gz");
    assert_eq!(read_batch_file(&path).unwrap(), vec![Vec::<u8>::new()]);

    let mut raw = Vec::new();
    std::io::Read::read_to_end(
        &mut flate2::read::GzDecoder::new(fs::File::open(&path).unwrap()),
        &mut raw,
    )
    .unwrap();
    assert_eq!(raw, [0, 0, 0, 0]);
}

// =========================================================================
// Disambiguation markers
// =========================================================================

#[test]
fn test_marker_anywhere_in_title() {
    let config = FilterConfig::new(HU);
    for title in [
        format!("Pest {HU}"),
        format!("{HU} Pest"),
        format!("Pest {HU} (2)"),
        HU.to_string(),
    ] {
        assert_eq!(
            classify(&Record::new(0, title.clone()), &config),
            Decision::DropDisambiguation,
            "{title}"
        );
    }
}

#[test]
fn test_marker_is_case_sensitive() {
    let config = FilterConfig::new(EN);
    let record = Record::new(0, "Mercury (Disambiguation)");
    assert_eq!(classify(&record, &config), Decision::Admit);
}

#[test]
fn test_other_language_marker_is_admitted() {
    let en = FilterConfig::new(EN);
    assert!(classify(&Record::new(0, format!("Pest {HU}")), &en).is_admit());

    let hu = FilterConfig::new(HU);
    assert!(classify(&Record::new(0, format!("Mercury {EN}")), &hu).is_admit());
}

#[test]
fn test_empty_marker_never_matches() {
    let config = FilterConfig::new("");
    assert!(!config.has_disambiguation_rule());
    assert!(classify(&Record::new(0, "Anything"), &config).is_admit());
    assert!(classify(&Record::new(0, ""), &config).is_admit());
}

#[test]
fn test_unicode_titles_survive_zim_round_trip() {
    let bytes = ZimBuilder::new()
        .add_article('A', "Árvíztűrő", "Árvíztűrő tükörfúrógép", b"x".to_vec())
        .add_article('A', "Kiev", "Киев", b"y".to_vec())
        .add_article('A', "Tokyo", "東京", b"z".to_vec())
        .build()
        .unwrap();
    let mut archive = ZimArchive::from_reader(Cursor::new(bytes)).unwrap();
    let titles: Vec<_> = (0..archive.len())
        .map(|i| archive.record(i).unwrap().title)
        .collect();
    assert_eq!(titles, ["Киев", "東京", "Árvíztűrő tükörfúrógép"]);
}

// =========================================================================
// Record kinds
// =========================================================================

#[test]
fn test_untitled_entry_uses_url() {
    let bytes = ZimBuilder::new()
        .add_article('A', "Only_Url", "", b"body".to_vec())
        .build()
        .unwrap();
    let mut archive = ZimArchive::from_reader(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.record(0).unwrap().title, "Only_Url");
}

#[test]
fn test_redirect_payload_is_never_read() {
    let bytes = ZimBuilder::new()
        .add_article('A', "Target", "Target", b"target".to_vec())
        .add_redirect('A', "Alias", "Alias", "Target")
        .add_deleted('A', "Gone", "Gone")
        .build()
        .unwrap();
    let mut archive = ZimArchive::from_reader(Cursor::new(bytes)).unwrap();
    let mut filter = RecordFilter::new(FilterConfig::new(EN));

    let items: Vec<_> = admitted(&mut archive, &mut filter)
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Target");
    assert_eq!(items[0].payload, b"target");
    assert_eq!(filter.stats().dropped_for(Decision::DropRedirect), 1);
    assert_eq!(filter.stats().dropped_for(Decision::DropDeleted), 1);
}

// =========================================================================
// Broken archives
// =========================================================================

#[test]
fn test_truncated_header() {
    let bytes = ZimBuilder::new()
        .add_article('A', "Foo", "Foo", b"foo".to_vec())
        .build()
        .unwrap();
    let err = ZimArchive::from_reader(Cursor::new(bytes[..40].to_vec())).unwrap_err();
    assert!(err.is_archive());
}

#[test]
fn test_bad_magic() {
    let mut bytes = ZimBuilder::new().build().unwrap();
    bytes[0] ^= 0xFF;
    let err = ZimArchive::from_reader(Cursor::new(bytes)).unwrap_err();
    assert!(err.is_archive());
}

#[test]
fn test_truncated_body() {
    let bytes = ZimBuilder::new()
        .add_article('A', "Foo", "Foo", vec![b'f'; 1000])
        .build()
        .unwrap();
    let truncated = bytes[..bytes.len() - 500].to_vec();

    let result = ZimArchive::from_reader(Cursor::new(truncated))
        .and_then(|mut archive| archive.payload(0));
    let err = result.unwrap_err();
    assert!(err.is_archive() || err.is_io(), "{err}");
}

// =========================================================================
// Output directory
// =========================================================================

#[test]
fn test_unrelated_files_are_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("README.txt"), b"keep me").unwrap();

    let mut writer = BatchWriter::with_codec(dir.path(), 5, 4, GzipCodec::new(1)).unwrap();
    writer.write(b"payload").unwrap();
    writer.finish().unwrap();

    assert_eq!(fs::read(dir.path().join("README.txt")).unwrap(), b"keep me");
    assert_eq!(read_batch_dir(dir.path()).unwrap(), vec![b"payload".to_vec()]);
}

#[test]
fn test_output_path_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wiki.zim");
    ZimBuilder::new()
        .add_article('A', "Foo", "Foo", b"foo".to_vec())
        .write_to(&input)
        .unwrap();
    let out = dir.path().join("occupied");
    fs::write(&out, b"not a directory").unwrap();

    let err = extract(
        &ExtractConfig::new(&input, &out),
        &DisambiguationTable::default(),
        no_events(),
    )
    .unwrap_err();
    assert!(err.is_io());
}

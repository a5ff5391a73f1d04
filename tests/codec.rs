use std::io::Cursor;

use famos_file::famos::codec::{from_bytes, number, to_bytes};
use famos_file::{CodePage, FamosError, Group, KeyGroup, KeyReader, KeyType, KeyWriter};
use rust_decimal::Decimal;

fn reader(bytes: &[u8]) -> KeyReader<Cursor<Vec<u8>>> {
    KeyReader::new(Cursor::new(bytes.to_vec()), CodePage::default()).unwrap()
}

const GROUP_KEY: &[u8] = b"|CB,1,13,1,6,Gruppe,0,;";

#[test]
fn group_key_decodes_and_encodes_byte_exact() {
    let group: Group = from_bytes(GROUP_KEY, CodePage::default()).unwrap();
    assert_eq!(group.index(), 1);
    assert_eq!(group.name, "Gruppe");
    assert_eq!(group.comment, "");

    let bytes = to_bytes(&group, CodePage::default()).unwrap();
    assert_eq!(bytes, GROUP_KEY);
}

#[test]
fn writer_separates_keys_with_line_breaks() {
    let group = Group::new(1, "Gruppe", "").unwrap();

    let mut writer = KeyWriter::new(Vec::new(), CodePage::default()).unwrap();
    writer.write_key(&group).unwrap();
    writer.write_key(&group).unwrap();
    let bytes = writer.into_inner();

    let expected = [GROUP_KEY, b"\r\n".as_slice(), GROUP_KEY, b"\r\n".as_slice()].concat();
    assert_eq!(bytes, expected);

    let mut reader = reader(&bytes);
    for _ in 0..2 {
        assert_eq!(reader.read_tag().unwrap(), Some(KeyType::CB));
        let read: Group = reader.read_key().unwrap();
        assert_eq!(read, group);
    }
    assert!(reader.is_at_end().unwrap());
}

#[test]
fn unknown_key_is_skipped_to_its_end() {
    let stream = [b"|XX,1,5,abcde;".as_slice(), GROUP_KEY].concat();
    let mut reader = reader(&stream);

    let key_type = reader.read_tag().unwrap().unwrap();
    assert!(key_type.is_unknown());
    assert_eq!(key_type.tag(), *b"XX");

    let header = reader.skip_key().unwrap();
    assert_eq!(header.offset, 0);
    assert_eq!(header.header_len(), 8);
    assert_eq!(header.length, 5);
    assert_eq!(
        reader.position().unwrap(),
        header.offset + header.header_len() + header.length + 1
    );

    assert_eq!(reader.read_tag().unwrap(), Some(KeyType::CB));
}

#[test]
fn skipped_payload_may_contain_key_syntax() {
    let stream = [b"|XX,1,7,|CB,;|;;".as_slice(), GROUP_KEY].concat();
    let mut reader = reader(&stream);

    reader.read_tag().unwrap();
    reader.skip_key().unwrap();
    assert_eq!(reader.peek_tag().unwrap(), Some(KeyType::CB));
}

#[test]
fn whitespace_between_keys_is_ignored() {
    let stream = [b"\r\n  \t".as_slice(), GROUP_KEY, b"\n".as_slice()].concat();
    let mut reader = reader(&stream);

    assert_eq!(reader.read_tag().unwrap(), Some(KeyType::CB));
    let group: Group = reader.read_key().unwrap();
    assert_eq!(group.name, "Gruppe");
    assert_eq!(reader.read_tag().unwrap(), None);
}

#[test]
fn push_back_rewinds_exactly_one_tag() {
    let mut reader = reader(GROUP_KEY);

    assert_eq!(reader.read_tag().unwrap(), Some(KeyType::CB));
    assert_eq!(reader.position().unwrap(), 4);
    reader.push_back(KeyType::CB).unwrap();
    assert_eq!(reader.position().unwrap(), 0);

    assert_eq!(reader.read_tag().unwrap(), Some(KeyType::CB));
    let group: Group = reader.read_key().unwrap();
    assert_eq!(group.index(), 1);
}

#[test]
fn push_back_of_another_tag_fails() {
    let mut reader = reader(GROUP_KEY);
    reader.read_tag().unwrap();
    assert!(matches!(
        reader.push_back(KeyType::CG),
        Err(FamosError::InvalidFormat(_))
    ));
}

#[test]
fn unsupported_version_is_rejected() {
    let result: Result<Group, _> = from_bytes(b"|CB,2,13,1,6,Gruppe,0,;", CodePage::default());
    match result {
        Err(FamosError::UnsupportedKeyVersion { key_type, actual, .. }) => {
            assert_eq!(key_type, KeyType::CB);
            assert_eq!(actual, 2);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn missing_terminator_is_a_format_error() {
    let result: Result<Group, _> = from_bytes(b"|CB,1,13,1,6,Gruppe,0,X", CodePage::default());
    assert!(matches!(result, Err(FamosError::InvalidFormat(_))));
}

#[test]
fn truncated_payload_is_reported() {
    let result: Result<Group, _> = from_bytes(b"|CB,1,13,1,6,Gr", CodePage::default());
    assert!(matches!(result, Err(FamosError::UnexpectedEof(_))));
}

#[test]
fn garbage_between_keys_is_a_format_error() {
    let mut reader = reader(b"x|CB,1,13,1,6,Gruppe,0,;");
    assert!(matches!(reader.read_tag(), Err(FamosError::InvalidFormat(_))));
}

#[test]
fn string_length_counts_encoded_bytes() {
    let group = Group::new(1, "Grüße", "").unwrap();

    let utf8 = to_bytes(&group, CodePage::UTF_8).unwrap();
    assert_eq!(utf8, "|CB,1,14,1,7,Grüße,0,;".as_bytes());
    let read: Group = from_bytes(&utf8, CodePage::UTF_8).unwrap();
    assert_eq!(read.name, "Grüße");

    let latin = to_bytes(&group, CodePage::WINDOWS_1252).unwrap();
    assert_eq!(latin, b"|CB,1,12,1,5,Gr\xfc\xdfe,0,;");
    let read: Group = from_bytes(&latin, CodePage::WINDOWS_1252).unwrap();
    assert_eq!(read.name, "Grüße");
}

#[test]
fn string_may_contain_separators() {
    let group = Group::new(3, "a,b;c", "|CB,").unwrap();
    let bytes = to_bytes(&group, CodePage::default()).unwrap();
    let read: Group = from_bytes(&bytes, CodePage::default()).unwrap();
    assert_eq!(read, group);
}

#[test]
fn unencodable_text_fails() {
    let group = Group::new(1, "中文", "").unwrap();
    assert!(matches!(
        to_bytes(&group, CodePage::WINDOWS_1252),
        Err(FamosError::Unencodable { code_page: 1252, .. })
    ));
}

#[test]
fn unknown_code_page_fails() {
    assert!(matches!(
        KeyWriter::new(Vec::new(), CodePage(12345)),
        Err(FamosError::UnknownCodePage(12345))
    ));
}

#[test]
fn group_index_must_be_positive() {
    assert!(matches!(Group::new(0, "g", ""), Err(FamosError::InvalidGroupIndex(0))));
    let result: Result<Group, _> = from_bytes(b"|CB,1,9,-1,1,g,0,;", CodePage::default());
    assert!(matches!(result, Err(FamosError::InvalidGroupIndex(-1))));
}

#[test]
fn numbers_are_culture_invariant() {
    assert_eq!(number::parse_real("3.14"), Some(3.14));
    assert_eq!(number::parse_real("-1e-3"), Some(-0.001));
    assert_eq!(number::parse_real(".5"), Some(0.5));
    assert_eq!(number::parse_real("1,5"), None);
    assert_eq!(number::parse_real("abc"), None);
    assert_eq!(number::parse_real("NaN"), None);
    assert_eq!(number::parse_real("inf"), None);

    assert_eq!(number::parse_decimal("-0.125"), Some(Decimal::new(-125, 3)));
    assert_eq!(number::parse_decimal("1.5e3"), Some(Decimal::new(1500, 0)));
    assert_eq!(number::parse_decimal("1,5"), None);
    assert_eq!(number::parse_decimal("NaN"), None);

    assert_eq!(number::parse_integer("42"), Some(42));
    assert_eq!(number::parse_integer("2.0"), Some(2));
    assert_eq!(number::parse_integer("2.5"), None);

    assert_eq!(number::format_real(0.1).as_deref(), Some("0.1"));
    assert_eq!(number::format_real(30.0).as_deref(), Some("30"));
    assert_eq!(number::format_real(1e-7).as_deref(), Some("0.0000001"));
    assert_eq!(number::format_real(f64::NAN), None);
    assert_eq!(number::format_real(f64::INFINITY), None);
}

#[test]
fn closed_key_group_reads() {
    let key: KeyGroup = from_bytes(b"|CK,1,3,1,1;", CodePage::default()).unwrap();
    assert!(key.closed);
}

#[test]
fn open_key_group_signals_interrupted_write() {
    let result: Result<KeyGroup, _> = from_bytes(b"|CK,1,3,1,0;", CodePage::default());
    assert!(matches!(result, Err(FamosError::InterruptedWrite)));
}

#[test]
fn key_group_is_patched_closed() {
    let group = Group::new(1, "Gruppe", "").unwrap();

    let mut writer = KeyWriter::new(Cursor::new(Vec::new()), CodePage::default()).unwrap();
    let flag = writer.begin_key_group().unwrap();
    writer.write_key(&group).unwrap();

    let open = writer.into_inner().into_inner();
    assert!(open.starts_with(b"|CK,1,3,1,0;\r\n"));
    let result: Result<KeyGroup, _> = from_bytes(&open, CodePage::default());
    assert!(matches!(result, Err(FamosError::InterruptedWrite)));

    let mut writer = KeyWriter::new(Cursor::new(Vec::new()), CodePage::default()).unwrap();
    let flag_again = writer.begin_key_group().unwrap();
    assert_eq!(flag, flag_again);
    writer.write_key(&group).unwrap();
    writer.close_key_group(flag).unwrap();
    writer.write_key(&group).unwrap();

    let bytes = writer.into_inner().into_inner();
    let expected = [
        b"|CK,1,3,1,1;\r\n".as_slice(),
        GROUP_KEY,
        b"\r\n".as_slice(),
        GROUP_KEY,
        b"\r\n".as_slice(),
    ]
    .concat();
    assert_eq!(bytes, expected);

    let mut reader = reader(&bytes);
    assert_eq!(reader.read_tag().unwrap(), Some(KeyType::CK));
    let key: KeyGroup = reader.read_key().unwrap();
    assert!(key.closed);
}

#[test]
fn expected_header_version_is_enforced() {
    let mut newer = reader(b"|CB,2,13,1,6,Gruppe,0,;");
    newer.read_tag().unwrap();
    match newer.read_header(Some(1)) {
        Err(FamosError::UnsupportedKeyVersion { expected, actual, .. }) => {
            assert_eq!(expected, "'1'");
            assert_eq!(actual, 2);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let mut current = reader(GROUP_KEY);
    current.read_tag().unwrap();
    let header = current.read_header(Some(1)).unwrap();
    assert_eq!((header.version, header.length), (1, 13));
    current.skip(&header).unwrap();
    assert!(current.is_at_end().unwrap());
}

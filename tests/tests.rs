use dsstore::{Builder, ErrorKind, Record, RecordType, Store, Value};
use rand::{rngs::StdRng, SeedableRng};
use std::fs;

mod common;

use common::TempPath;

fn put_hex(file: &mut [u8], at: usize, data: &str) {
    let data = hex::decode(data.replace(' ', "")).unwrap();
    file[at..at + data.len()].copy_from_slice(&data);
}

/// Container assembled by hand: root block at 0x800, DSDB block at 0x20,
/// a single leaf with two records at 0x40.
fn hand_built() -> Vec<u8> {
    let mut file = vec![0; 4 + 0x1000];
    put_hex(
        &mut file,
        0,
        "00000001 42756431 00000800 00000800 00000800 00000000 00000000 00000800 00000000",
    );
    put_hex(
        &mut file,
        4 + 0x800,
        "00000003 00000000 0000080b 00000025 00000046",
    );
    put_hex(&mut file, 4 + 0x800 + 8 + 1024, "00000001 04 44534442 00000001");
    put_hex(
        &mut file,
        4 + 0x20,
        "00000002 00000000 00000002 00000001 00001000",
    );
    put_hex(
        &mut file,
        4 + 0x40,
        "00000000 00000002 \
         00000001 002e 00000000 6c6f6e67 0000002a \
         00000001 0061 00000000 75737472 00000002 0068 0069",
    );
    file
}

#[test]
fn test_hand_built_container() {
    common::init_logger();
    let store = Store::from_bytes(&hand_built()).unwrap();
    assert_eq!(
        store.records(),
        &[
            Record::new(".", [0; 4], Value::Long(42)),
            Record::new("a", [0; 4], Value::ustr("hi")),
        ]
    );
}

#[test]
fn test_hand_built_corruptions() {
    common::init_logger();
    let cases: &[(usize, u8, ErrorKind)] = &[
        (3, 0x02, ErrorKind::InvalidFirstMagic),
        (4, b'X', ErrorKind::InvalidSecondMagic),
        (30, 0x09, ErrorKind::InvalidHeaderOffset),
        (4 + 0x800 + 8 + 1024 + 5, b'X', ErrorKind::InvalidDSDBBlock),
        (4 + 0x20 + 18, 0x20, ErrorKind::InvalidDSDBBlock),
        (4 + 0x40 + 9, 0x01, ErrorKind::InvalidDataBlock),
        (4 + 0x40 + 18, b'X', ErrorKind::UnknownRecordType),
    ];
    for &(at, byte, ref kind) in cases {
        let mut file = hand_built();
        file[at] = byte;
        let err = Store::from_bytes(&file).unwrap_err();
        assert_eq!(&err.kind(), kind, "byte {:#x}", at);
    }
}

#[test]
fn test_raw_text_and_flags_survive_rewrite() {
    let mut file = hand_built();
    // "hi" becomes an unpaired high surrogate followed by 'i'
    file[4 + 0x40 + 48 - 4] = 0xd8;
    file[4 + 0x40 + 48 - 3] = 0x00;
    let store = Store::from_bytes(&file).unwrap();
    assert_eq!(store.records()[1].value, Value::Ustr(vec![0xd800, 0x69]));
    let rewritten = Store::from_bytes(&store.to_bytes().unwrap()).unwrap();
    assert_eq!(rewritten.records(), store.records());

    let mut file = hand_built();
    put_hex(&mut file, 4 + 0x40 + 18, "626f6f6c 02");
    assert_eq!(
        Store::from_bytes(&file).unwrap_err().kind(),
        ErrorKind::InvalidDataBlock
    );
}

#[test]
fn test_header_of_written_container() {
    let store = Store::with_records(vec![Record::new("test", [0; 4], Value::Bool(true))]);
    let data = store.to_bytes().unwrap();
    assert_eq!(
        hex::encode(&data[..36]),
        concat!(
            "00000001", "42756431", "00000800", "00000800", "00000800", "00000000", "00000000",
            "00000800", "00000000"
        )
    );
    assert_eq!(data.len(), 4 + 0x1040);
}

#[test]
fn test_truncated_container() {
    let store = Store::with_records(vec![Record::new("a", [0; 4], Value::Comp(7))]);
    let data = store.to_bytes().unwrap();
    assert!(Store::from_bytes(&data[..data.len() - 1]).is_err());
    assert_eq!(
        Store::from_bytes(&data[..20]).unwrap_err().kind(),
        ErrorKind::InvalidHeader
    );
}

#[test]
fn test_many_records_round_trip() {
    common::init_logger();
    let records: Vec<_> = (0..2000)
        .map(|i| Record::new(format!("file{:04}", i), *b"Iloc", Value::Long(i)))
        .collect();
    let mut store = Store::new();
    for record in records.iter().rev() {
        store.push(record.clone());
    }
    let mut buf = Vec::new();
    store.write(&mut buf).unwrap();
    let read = Store::read(buf.as_slice()).unwrap();
    assert_eq!(read.into_records(), records);
}

#[test]
fn test_random_records_round_trip() {
    common::init_logger();
    let mut rng = StdRng::seed_from_u64(42);
    for &capacity in &[2, 5, 64] {
        let records = common::random_records(&mut rng, 700);
        let mut store = Builder::new().node_capacity(capacity).build().unwrap();
        *store.records_mut() = records.clone();
        let read = Store::from_bytes(&store.to_bytes().unwrap()).unwrap();
        assert_eq!(read.into_records(), common::sorted(records));
    }
}

#[test]
fn test_every_type_round_trips() {
    let mut rng = StdRng::seed_from_u64(7);
    for record_type in RecordType::ALL {
        let value = common::random_value(&mut rng, record_type);
        let store = Store::with_records(vec![Record::new("x", *b"abcd", value.clone())]);
        let read = Store::from_bytes(&store.to_bytes().unwrap()).unwrap();
        let record = &read.records()[0];
        assert_eq!(record.record_type(), record_type);
        assert_eq!(record.reserved, *b"abcd");
        assert_eq!(record.value, value);
    }
}

#[test]
fn test_file_round_trip() {
    common::init_logger();
    let path = TempPath::new("file");
    let records = vec![
        Record::new("Documents", *b"Iloc", Value::blob(vec![0, 1, 2, 3])),
        Record::new("Pictures", *b"Iloc", Value::ustr("photos")),
    ];
    Store::with_records(records.clone())
        .write_file(&path.0, 0o600)
        .unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&path.0).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
    assert_eq!(Store::read_file(&path.0).unwrap().into_records(), records);
}

#[test]
fn test_missing_file_is_io_error() {
    let path = TempPath::new("missing");
    let err = Store::read_file(&path.0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);

    let dir = TempPath::new("no-such-dir");
    let err = Store::new()
        .write_file(dir.0.join("file"), 0o644)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_overwrite_existing_file() {
    let path = TempPath::new("overwrite");
    fs::write(&path.0, vec![0xff; 100_000]).unwrap();
    let store = Store::with_records(vec![Record::new("a", [0; 4], Value::Bool(false))]);
    store.write_file(&path.0, 0o644).unwrap();
    assert_eq!(
        fs::metadata(&path.0).unwrap().len() as usize,
        store.to_bytes().unwrap().len()
    );
    assert_eq!(Store::read_file(&path.0).unwrap().len(), 1);
}

#[test]
fn test_tools_rewrite() {
    let input = TempPath::new("rewrite-in");
    let output = TempPath::new("rewrite-out");
    fs::write(&input.0, hand_built()).unwrap();
    assert_eq!(dsstore::tools::validate_store(&input.0).unwrap(), 2);
    assert_eq!(
        dsstore::tools::rewrite_store(&input.0, &output.0, 0o644).unwrap(),
        2
    );
    assert_eq!(
        Store::read_file(&output.0).unwrap().records(),
        Store::from_bytes(&hand_built()).unwrap().records()
    );
}

#[test]
fn test_builder_config() {
    assert_eq!(
        Builder::new().node_capacity(0).build().unwrap_err().kind(),
        ErrorKind::WrongConfig
    );
    assert_eq!(
        Builder::new().max_depth(0).build().unwrap_err().kind(),
        ErrorKind::WrongConfig
    );
    let store = Builder::new().node_capacity(2).max_depth(64).build().unwrap();
    assert!(store.is_empty());
}

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use updown::genomics::{EncodedSequence, SequenceProfile, SequenceRecord};
use updown::io::{FastaRecords, InputError, InputRecord};

pub const REFERENCE: &[u8] = b"ATGATG";

pub const QUERY: (&str, &[u8]) = ("Query1", b"ATTATT");

pub const TARGETS: [(&str, &[u8]); 6] = [
    ("TargetUp1", b"ATGATG"),
    ("TargetSame1", b"ATTATT"),
    ("TargetDown1", b"ATTACT"),
    ("TargetUp2", b"ATGATT"),
    ("TargetSide1", b"CCCCCC"),
    ("TargetSide2", b"ATGCTT"),
];

pub fn reference() -> EncodedSequence {
    EncodedSequence::encode(REFERENCE).expect("reference encodes")
}

pub fn fasta(records: &[(&str, &[u8])]) -> String {
    let mut text = String::new();
    for (id, seq) in records {
        text.push('>');
        text.push_str(id);
        text.push('\n');
        text.push_str(std::str::from_utf8(seq).expect("ascii sequence"));
        text.push('\n');
    }
    text
}

/// Records of `text` as the ranking pipeline would read them from a FASTA file.
pub fn fasta_stream(text: &str) -> Vec<Result<InputRecord, InputError>> {
    FastaRecords::new(text.as_bytes())
        .with_width(REFERENCE.len())
        .map(|record| record.map(InputRecord::Sequence))
        .collect()
}

pub fn profile(id: &str, seq: &[u8], index: usize) -> SequenceProfile {
    let record = SequenceRecord::new(
        id,
        EncodedSequence::encode(seq).expect("sequence encodes"),
        index,
    );
    SequenceProfile::extract(&reference(), &record).expect("profile extracts")
}

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("UPDOWN_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set UPDOWN_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n")
}

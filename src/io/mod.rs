//! Readers and writers for sequence inputs and CSV outputs.
//!
//! Sequences arrive as aligned FASTA (any file) or as a previously written
//! profile listing (files ending in `.csv`). Both yield [`InputRecord`]s so
//! that the ranking pipeline does not care which one it was handed.

mod fasta;
mod listing;
mod ranking;

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use thiserror::Error;

use crate::genomics::{CodecError, EncodedSequence, ProfileError, SequenceProfile, SequenceRecord};

pub use fasta::{read_reference, FastaRecords};
pub use listing::{
    render_profile_listing, write_listing_header, write_listing_row, ListingRecords,
    LISTING_HEADER,
};
pub use ranking::{render_ranking, write_ranking, RANKING_HEADER};

/// Errors raised while reading inputs.
#[derive(Debug, Error)]
pub enum InputError {
    /// Underlying read failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record contains a symbol outside the nucleotide alphabet.
    #[error("record '{id}': {source}")]
    Encoding {
        /// Identifier of the offending record.
        id: String,
        /// Encoding failure.
        #[source]
        source: CodecError,
    },

    /// A record does not match the alignment width of the stream.
    #[error("record '{id}' has width {found}, expected {expected}")]
    WidthMismatch {
        /// Identifier of the offending record.
        id: String,
        /// Width established by the reference or the first record.
        expected: usize,
        /// Width of the offending record.
        found: usize,
    },

    /// A sequence needs profiling but no reference was supplied.
    #[error("sequence '{0}' cannot be profiled without a reference")]
    MissingReference(String),

    /// The reference input does not hold exactly one record.
    #[error("expected exactly one reference record, found {0}")]
    ReferenceCount(usize),

    /// The first line of a profile listing is not the expected header.
    #[error("malformed profile listing header: expected '{expected}', found '{found}'")]
    MalformedHeader {
        /// Header the reader requires.
        expected: &'static str,
        /// Line actually read.
        found: String,
    },

    /// A profile listing row cannot be parsed.
    #[error("malformed profile listing row at line {line}: {reason}")]
    MalformedRow {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

impl From<ProfileError> for InputError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::WidthMismatch {
                id,
                expected,
                found,
            } => InputError::WidthMismatch {
                id,
                expected,
                found,
            },
        }
    }
}

/// One record from a query or target input.
#[derive(Debug, Clone)]
pub enum InputRecord {
    /// An aligned sequence that still needs profiling.
    Sequence(SequenceRecord),
    /// A profile read from a listing.
    Profile(SequenceProfile),
}

impl InputRecord {
    /// Identifier of the record.
    pub fn id(&self) -> &str {
        match self {
            InputRecord::Sequence(record) => &record.id,
            InputRecord::Profile(profile) => profile.id(),
        }
    }

    /// Profile the record against `reference` unless it already is a profile.
    pub fn into_profile(
        self,
        reference: Option<&EncodedSequence>,
    ) -> Result<SequenceProfile, InputError> {
        match self {
            InputRecord::Profile(profile) => Ok(profile),
            InputRecord::Sequence(record) => {
                let reference = reference
                    .ok_or_else(|| InputError::MissingReference(record.id.to_string()))?;
                Ok(SequenceProfile::extract(reference, &record)?)
            }
        }
    }
}

/// How an input file is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Aligned FASTA.
    Fasta,
    /// Profile listing CSV.
    Listing,
}

impl InputFormat {
    /// Choose the format from the file name.
    pub fn from_path(path: &Path) -> Self {
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            InputFormat::Listing
        } else {
            InputFormat::Fasta
        }
    }
}

/// Boxed stream of input records.
pub type RecordStream = Box<dyn Iterator<Item = Result<InputRecord, InputError>> + Send>;

/// Open a file, or standard input for `-` and `stdin`.
pub fn open_input(path: &Path) -> io::Result<Box<dyn Read + Send>> {
    match path.to_str() {
        Some("-") | Some("stdin") => Ok(Box::new(io::stdin())),
        _ => Ok(Box::new(File::open(path)?)),
    }
}

/// Open `path` as a stream of records in the format implied by its name.
///
/// FASTA records are checked against `width` when given.
pub fn open_records(path: &Path, width: Option<usize>) -> Result<RecordStream, InputError> {
    let reader = open_input(path)?;
    let stream: RecordStream = match InputFormat::from_path(path) {
        InputFormat::Fasta => {
            let records = FastaRecords::new(reader);
            let records = match width {
                Some(width) => records.with_width(width),
                None => records,
            };
            Box::new(records.map(|record| record.map(InputRecord::Sequence)))
        }
        InputFormat::Listing => Box::new(
            ListingRecords::new(BufReader::new(reader))
                .map(|profile| profile.map(InputRecord::Profile)),
        ),
    };
    Ok(stream)
}

use std::io::{BufReader, Read};

use bio::io::fasta;

use super::InputError;
use crate::genomics::{EncodedSequence, SequenceRecord};

/// Streaming reader of aligned FASTA records.
///
/// Every record is encoded as it is read and must share the alignment width
/// of the first record (or of the width supplied up front).
pub struct FastaRecords<R: Read> {
    records: fasta::Records<BufReader<R>>,
    width: Option<usize>,
    next_index: usize,
}

impl<R: Read> std::fmt::Debug for FastaRecords<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastaRecords")
            .field("width", &self.width)
            .field("next_index", &self.next_index)
            .finish()
    }
}

impl<R: Read> FastaRecords<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self {
            records: fasta::Reader::new(reader).records(),
            width: None,
            next_index: 0,
        }
    }

    /// Require every record to have `width` columns.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    fn encode(&mut self, record: fasta::Record) -> Result<SequenceRecord, InputError> {
        let sequence =
            EncodedSequence::encode(record.seq()).map_err(|source| InputError::Encoding {
                id: record.id().to_string(),
                source,
            })?;

        let expected = *self.width.get_or_insert(sequence.len());
        if sequence.len() != expected {
            return Err(InputError::WidthMismatch {
                id: record.id().to_string(),
                expected,
                found: sequence.len(),
            });
        }

        let index = self.next_index;
        self.next_index += 1;
        Ok(SequenceRecord::new(record.id(), sequence, index))
    }
}

impl<R: Read> Iterator for FastaRecords<R> {
    type Item = Result<SequenceRecord, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(err.into())),
        };
        Some(self.encode(record))
    }
}

/// Read the single reference record from `reader`.
pub fn read_reference<R: Read>(reader: R) -> Result<SequenceRecord, InputError> {
    let mut records = FastaRecords::new(reader);
    let reference = match records.next() {
        Some(record) => record?,
        None => return Err(InputError::ReferenceCount(0)),
    };
    let extra = records.count();
    if extra > 0 {
        return Err(InputError::ReferenceCount(extra + 1));
    }
    Ok(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_records_in_order() {
        let input = b">a\nACGT\n>b desc\nAC\nGN\n";
        let records: Vec<_> = FastaRecords::new(&input[..])
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id.as_ref(), "b");
        assert_eq!(records[1].sequence.to_string(), "ACGN");
        assert_eq!(records[1].index, 1);
    }

    #[test]
    fn width_mismatch_is_reported() {
        let input = b">a\nACGT\n>b\nACG\n";
        let result: Result<Vec<_>, _> = FastaRecords::new(&input[..]).collect();
        assert!(matches!(
            result,
            Err(InputError::WidthMismatch { expected: 4, found: 3, .. })
        ));
    }

    #[test]
    fn preset_width_applies_to_first_record() {
        let input = b">a\nACGT\n";
        let mut records = FastaRecords::new(&input[..]).with_width(5);
        assert!(matches!(records.next(), Some(Err(InputError::WidthMismatch { .. }))));
    }

    #[test]
    fn bad_symbol_names_the_record() {
        let input = b">bad\nACJT\n";
        let mut records = FastaRecords::new(&input[..]);
        match records.next() {
            Some(Err(InputError::Encoding { id, .. })) => assert_eq!(id, "bad"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn reference_must_be_unique() {
        assert!(matches!(
            read_reference(&b""[..]),
            Err(InputError::ReferenceCount(0))
        ));
        assert!(matches!(
            read_reference(&b">r1\nAC\n>r2\nAC\n"[..]),
            Err(InputError::ReferenceCount(2))
        ));
        let reference = read_reference(&b">r\nATGATG\n"[..]).unwrap();
        assert_eq!(reference.id.as_ref(), "r");
    }
}

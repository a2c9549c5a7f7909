use std::sync::Arc;

use super::EncodedSequence;

/// Named alignment row as delivered by a sequence reader.
#[derive(Debug, Clone)]
pub struct SequenceRecord {
    /// Record identifier.
    pub id: Arc<str>,
    /// Encoded alignment row.
    pub sequence: EncodedSequence,
    /// 0-based ordinal of the record in its input stream.
    pub index: usize,
}

impl SequenceRecord {
    /// Construct a new record wrapper.
    pub fn new(id: impl Into<Arc<str>>, sequence: EncodedSequence, index: usize) -> Self {
        Self {
            id: id.into(),
            sequence,
            index,
        }
    }

    /// Alignment width of the record.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Returns `true` for a zero-width record.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

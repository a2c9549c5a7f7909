use std::collections::HashSet;

use blake3::hash;
use updown::genomics::{EncodedSequence, SequenceRecord};
use updown::io::{render_ranking, InputError, InputRecord};
use updown::pipeline::profile_all;
use updown::{CatchmentConfig, RankingConfig, SequenceProfile, StreamCoordinator};

const WIDTH: usize = 48;

/// Deterministic pseudo-random alignment around a fixed reference.
fn alignment(count: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut state = seed;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    (0..count)
        .map(|_| {
            (0..WIDTH)
                .map(|column| match next() % 16 {
                    0 => b"ACGT"[(next() % 4) as usize],
                    1 => b'N',
                    _ => b"ACGT"[column % 4],
                })
                .collect()
        })
        .collect()
}

fn reference() -> EncodedSequence {
    let seq: Vec<u8> = (0..WIDTH).map(|column| b"ACGT"[column % 4]).collect();
    EncodedSequence::encode(&seq).expect("reference encodes")
}

fn records(prefix: &str, rows: &[Vec<u8>]) -> Vec<Result<InputRecord, InputError>> {
    rows.iter()
        .enumerate()
        .map(|(index, seq)| {
            let sequence = EncodedSequence::encode(seq).expect("row encodes");
            Ok(InputRecord::Sequence(SequenceRecord::new(
                format!("{prefix}{index}"),
                sequence,
                index,
            )))
        })
        .collect()
}

fn queries() -> Vec<SequenceProfile> {
    profile_all(Some(&reference()), records("q", &alignment(24, 0x9e37_79b9))).expect("queries")
}

#[test]
fn ranking_output_is_identical_across_workers_and_batches() {
    let targets = alignment(300, 0x2545_f491);
    let mut fingerprints = HashSet::new();

    for (workers, batch_size) in [(1, 1024), (2, 7), (3, 64), (8, 1), (24, 33)] {
        let config = RankingConfig::new(
            CatchmentConfig::with_total_size(9)
                .with_distance_all(4)
                .with_push_distance(2),
        )
        .with_workers(workers)
        .with_batch_size(batch_size);
        let outcome = StreamCoordinator::new(Some(reference()), queries(), config)
            .expect("valid config")
            .run(records("t", &targets))
            .expect("ranking succeeds");

        let order: Vec<usize> = outcome.results.iter().map(|result| result.index).collect();
        assert_eq!(order, (0..24).collect::<Vec<_>>());

        let rendered = render_ranking(&outcome.results).expect("rendering succeeds");
        fingerprints.insert(hash(rendered.as_bytes()));
    }

    assert_eq!(fingerprints.len(), 1, "outputs diverged across worker counts");
}

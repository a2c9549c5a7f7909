use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;
use test_case::test_case;
use updown::catchment::{CatchmentBin, ResultEntry};
use updown::genomics::nucleotide::{encode, is_different, is_unambiguous};
use updown::genomics::{
    classify, compare, Direction, EncodedSequence, SequenceProfile, SequenceRecord,
};

const ALPHABET: &[u8] = b"ACGTRMWSKYVHDBN-?acgtn";

fn profile(reference: &[u8], seq: &[u8]) -> SequenceProfile {
    let reference = EncodedSequence::encode(reference).expect("reference encodes");
    let record = SequenceRecord::new("s", EncodedSequence::encode(seq).expect("encodes"), 0);
    SequenceProfile::extract(&reference, &record).expect("same width")
}

fn differs(a: u8, b: u8) -> bool {
    is_different(encode(a).expect("valid"), encode(b).expect("valid"))
}

#[test_case(b'A', b'G' => true ; "distinct bases")]
#[test_case(b'A', b'a' => false ; "case is ignored")]
#[test_case(b'A', b'R' => false ; "purine may be adenine")]
#[test_case(b'C', b'R' => true ; "purine is never cytosine")]
#[test_case(b'T', b'N' => false ; "n matches anything")]
#[test_case(b'G', b'-' => false ; "gap matches anything")]
#[test_case(b'W', b'S' => true ; "weak and strong are disjoint")]
#[test_case(b'K', b'Y' => false ; "keto and pyrimidine share t")]
fn difference_table(a: u8, b: u8) -> bool {
    differs(a, b)
}

#[test_case(b'A' => true)]
#[test_case(b't' => true)]
#[test_case(b'R' => false)]
#[test_case(b'N' => false)]
#[test_case(b'-' => false)]
#[test_case(b'?' => false)]
fn unambiguous_table(symbol: u8) -> bool {
    is_unambiguous(encode(symbol).expect("valid"))
}

#[test_case(b'X')]
#[test_case(b'*')]
#[test_case(b'.')]
#[test_case(b'U')]
fn symbols_outside_the_alphabet_are_rejected(symbol: u8) {
    assert_eq!(encode(symbol), None);
}

fn base() -> impl Strategy<Value = u8> {
    prop::sample::select(b"ACGT".to_vec())
}

type Alignment = (Vec<u8>, Vec<u8>, Vec<u8>);

fn aligned_pair(len: std::ops::Range<usize>) -> impl Strategy<Value = Alignment> {
    len.prop_flat_map(|n| {
        (
            prop::collection::vec(base(), n),
            prop::collection::vec(base(), n),
            prop::collection::vec(base(), n),
        )
    })
}

proptest! {
    #[test]
    fn difference_is_symmetric(
        a in prop::sample::select(ALPHABET.to_vec()),
        b in prop::sample::select(ALPHABET.to_vec()),
    ) {
        prop_assert_eq!(differs(a, b), differs(b, a));
    }

    #[test]
    fn masking_never_adds_snps_or_shrinks_tracts(
        (reference, seq) in (1usize..64).prop_flat_map(|n| (
            prop::collection::vec(base(), n),
            prop::collection::vec(prop::sample::select(b"ACGTN-".to_vec()), n),
        )),
        mask in prop::collection::vec(any::<bool>(), 64),
    ) {
        let masked: Vec<u8> = seq
            .iter()
            .zip(&mask)
            .map(|(&b, &m)| if m { b'N' } else { b })
            .collect();
        let before = profile(&reference, &seq);
        let after = profile(&reference, &masked);

        prop_assert!(after.snp_count() <= before.snp_count());
        prop_assert!(after.ambiguity_count() >= before.ambiguity_count());
        for snp in after.snps() {
            prop_assert!(before.snps().contains(snp));
        }
        for tract in before.ambiguities() {
            prop_assert!(after
                .ambiguities()
                .iter()
                .any(|outer| outer.start <= tract.start && tract.stop <= outer.stop));
        }
    }

    #[test]
    fn unambiguous_pairs_always_classify(
        (reference, query, target) in aligned_pair(1..48),
    ) {
        let q = profile(&reference, &query);
        let t = profile(&reference, &target);
        let relationship = classify(&q, &t, 0.0);
        prop_assert!(relationship.is_some());
        let relationship = relationship.unwrap();

        let differing: Vec<usize> = (0..reference.len())
            .filter(|&i| query[i] != target[i])
            .collect();
        prop_assert_eq!(relationship.distance as usize, differing.len());

        let query_private = differing.iter().any(|&i| query[i] != reference[i]);
        let target_private = differing.iter().any(|&i| target[i] != reference[i]);
        let expected = match (query_private, target_private) {
            (false, false) => Direction::Same,
            (true, false) => Direction::Up,
            (false, true) => Direction::Down,
            (true, true) => Direction::Side,
        };
        prop_assert_eq!(relationship.direction, expected);
    }

    #[test]
    fn swapping_roles_mirrors_the_tally(
        (reference, query, target) in aligned_pair(1..48),
    ) {
        let forward = compare(&profile(&reference, &query), &profile(&reference, &target));
        let backward = compare(&profile(&reference, &target), &profile(&reference, &query));
        prop_assert_eq!(forward.distance, backward.distance);
        prop_assert_eq!(forward.tally.shared, backward.tally.shared);
        prop_assert_eq!(forward.tally.query_private, backward.tally.target_private);
        prop_assert_eq!(forward.tally.target_private, backward.tally.query_private);
    }

    #[test]
    fn bins_keep_the_best_candidates_in_order(
        candidates in prop::collection::vec((0u32..12, 0u32..4), 0..40),
        capacity in 0usize..8,
        cutoff in prop::option::of(0u32..12),
    ) {
        let mut bin = CatchmentBin::new(capacity, cutoff);
        let mut eligible = BTreeSet::new();
        for (index, &(distance, ambiguities)) in candidates.iter().enumerate() {
            let entry = ResultEntry {
                name: Arc::from(format!("t{index}")),
                distance,
                ambiguities,
                index,
            };
            if cutoff.map_or(true, |max| distance <= max) {
                eligible.insert(entry.rank_key());
            }
            bin.offer(entry);
        }

        let kept: Vec<_> = bin.finalize().iter().map(ResultEntry::rank_key).collect();
        let best: Vec<_> = eligible.into_iter().take(capacity).collect();
        prop_assert!(kept.len() <= capacity);
        prop_assert_eq!(kept, best);
    }
}

#[path = "common/mod.rs"]
mod common;

use std::io::Cursor;

use common::{fasta, fasta_stream, reference, QUERY, TARGETS};
use updown::io::{render_profile_listing, render_ranking, InputRecord, ListingRecords};
use updown::pipeline::{self, PipelineError, RankingOutcome};
use updown::{CatchmentConfig, Direction, RankingConfig, SequenceProfile, StreamCoordinator};

fn queries() -> Vec<SequenceProfile> {
    pipeline::profile_all(Some(&reference()), fasta_stream(&fasta(&[QUERY])))
        .expect("queries profile")
}

fn rank_fasta(config: RankingConfig) -> RankingOutcome {
    let coordinator =
        StreamCoordinator::new(Some(reference()), queries(), config).expect("valid config");
    coordinator
        .run(fasta_stream(&fasta(&TARGETS)))
        .expect("ranking succeeds")
}

#[test]
fn single_query_fills_every_direction() {
    let outcome = rank_fasta(RankingConfig::new(CatchmentConfig::with_total_size(5)));
    let result = &outcome.results[0];

    assert_eq!(&*result.query, "Query1");
    assert_eq!(result.names(Direction::Same), ["TargetSame1"]);
    assert_eq!(result.names(Direction::Up), ["TargetUp2", "TargetUp1"]);
    assert_eq!(result.names(Direction::Down), ["TargetDown1"]);
    assert_eq!(result.names(Direction::Side), ["TargetSide2"]);

    let distances: Vec<u32> = result
        .bin(Direction::Up)
        .iter()
        .map(|entry| entry.distance)
        .collect();
    assert_eq!(distances, [1, 2]);
}

#[test]
fn push_fallback_backfills_the_side_bin() {
    let catchment = CatchmentConfig::with_total_size(5)
        .with_distance_all(1)
        .with_push_distance(2);
    let outcome = rank_fasta(RankingConfig::new(catchment));
    let result = &outcome.results[0];

    assert_eq!(result.names(Direction::Side), ["TargetSide2", "TargetSide1"]);
    assert_eq!(result.fallbacks, [Direction::Side]);
    assert_eq!(result.names(Direction::Same), ["TargetSame1"]);
    assert_eq!(result.names(Direction::Up), ["TargetUp2"]);
}

#[test]
fn per_bin_sizes_without_fill() {
    let catchment = CatchmentConfig::with_bin_sizes([1, 1, 0, 2]).with_fill(false);
    let outcome = rank_fasta(RankingConfig::new(catchment));
    let result = &outcome.results[0];

    assert_eq!(result.names(Direction::Same), ["TargetSame1"]);
    assert_eq!(result.names(Direction::Up), ["TargetUp2"]);
    assert!(result.bin(Direction::Down).is_empty());
    assert_eq!(result.names(Direction::Side), ["TargetSide2", "TargetSide1"]);
}

#[test]
fn listing_and_fasta_targets_rank_identically() {
    let profiles = pipeline::profile_all(Some(&reference()), fasta_stream(&fasta(&TARGETS)))
        .expect("targets profile");
    let listing = render_profile_listing(&profiles).expect("listing renders");
    let listed: Vec<_> = ListingRecords::new(Cursor::new(listing))
        .map(|profile| profile.map(InputRecord::Profile))
        .collect();

    let config = || {
        RankingConfig::new(
            CatchmentConfig::with_total_size(5)
                .with_distance_all(1)
                .with_push_distance(2),
        )
    };

    // Listing targets need no reference.
    let from_listing = StreamCoordinator::new(None, queries(), config())
        .expect("valid config")
        .run(listed)
        .expect("listing ranking succeeds");
    let from_fasta = rank_fasta(config());

    assert_eq!(from_listing.results, from_fasta.results);
    assert_eq!(
        render_ranking(&from_listing.results).expect("renders"),
        render_ranking(&from_fasta.results).expect("renders")
    );
}

#[test]
fn ignored_and_ambiguous_targets_never_rank() {
    let mut targets = TARGETS.to_vec();
    targets.push(("Blurry", &b"ATTANT"[..]));
    let config = RankingConfig::new(CatchmentConfig::with_total_size(8))
        .with_ignore(["TargetSame1", "TargetSide1"])
        .with_max_target_ambiguities(0);

    let outcome = StreamCoordinator::new(Some(reference()), queries(), config)
        .expect("valid config")
        .run(fasta_stream(&fasta(&targets)))
        .expect("ranking succeeds");
    let result = &outcome.results[0];

    assert!(result.bin(Direction::Same).is_empty());
    assert_eq!(result.names(Direction::Side), ["TargetSide2"]);
    assert_eq!(outcome.summary.targets_read, 7);
    assert_eq!(outcome.summary.ignored, 2);
    assert_eq!(outcome.summary.over_ambiguity_cutoff, 1);
    assert_eq!(outcome.summary.ranked, 4);
}

#[test]
fn sequence_targets_without_reference_fail() {
    let config = RankingConfig::new(CatchmentConfig::with_total_size(4));
    let coordinator = StreamCoordinator::new(None, queries(), config).expect("valid config");
    let result = coordinator.run(fasta_stream(&fasta(&TARGETS)));
    assert!(matches!(result, Err(PipelineError::Input(_))));
}

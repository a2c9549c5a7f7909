use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use updown::catchment::DEFAULT_PAIR_THRESHOLD;
use updown::genomics::SequenceRecord;
use updown::io::{
    open_input, open_records, read_reference, write_ranking, FastaRecords, InputFormat,
};
use updown::pipeline::{self, DEFAULT_BATCH_SIZE};
use updown::{CatchmentConfig, Direction, RankingConfig, StreamCoordinator};

#[derive(Parser, Debug)]
#[command(
    name = "updown",
    version,
    about = "SNP-profile relationships and nearest-neighbour catchments for aligned genomes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List SNPs and ambiguity tracts of each aligned sequence relative to the reference.
    List {
        /// Reference sequence (FASTA with exactly one record).
        #[arg(short, long)]
        reference: PathBuf,
        /// Aligned sequences (FASTA; `-` for stdin).
        #[arg(short, long, default_value = "-")]
        query: PathBuf,
        /// Output CSV (default: stdout).
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Sequences profiled per parallel batch.
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },
    /// Rank the closest same/up/down/side targets for every query.
    Rank(RankArgs),
}

#[derive(Args, Debug)]
struct RankArgs {
    /// Queries (aligned FASTA, or a profile listing ending in .csv).
    #[arg(short, long)]
    query: PathBuf,
    /// Targets (aligned FASTA, or a profile listing ending in .csv; `-` for stdin).
    #[arg(short, long)]
    target: PathBuf,
    /// Reference sequence; required when any input is FASTA.
    #[arg(short, long)]
    reference: Option<PathBuf>,
    /// Output CSV (default: stdout).
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Total neighbours per query, split evenly (remainder to `same`).
    #[arg(long, conflicts_with_all = ["size_same", "size_up", "size_down", "size_side"])]
    size_total: Option<usize>,
    /// Neighbours in the `same` bin.
    #[arg(long)]
    size_same: Option<usize>,
    /// Neighbours in the `up` bin.
    #[arg(long)]
    size_up: Option<usize>,
    /// Neighbours in the `down` bin.
    #[arg(long)]
    size_down: Option<usize>,
    /// Neighbours in the `side` bin.
    #[arg(long)]
    size_side: Option<usize>,

    /// Distance cutoff for every bin.
    #[arg(long)]
    dist_all: Option<u32>,
    /// Distance cutoff for the `same` bin (overrides --dist-all).
    #[arg(long)]
    dist_same: Option<u32>,
    /// Distance cutoff for the `up` bin (overrides --dist-all).
    #[arg(long)]
    dist_up: Option<u32>,
    /// Distance cutoff for the `down` bin (overrides --dist-all).
    #[arg(long)]
    dist_down: Option<u32>,
    /// Distance cutoff for the `side` bin (overrides --dist-all).
    #[arg(long)]
    dist_side: Option<u32>,

    /// Largest fraction of a pair's SNPs that may be masked by ambiguity.
    #[arg(long, default_value_t = DEFAULT_PAIR_THRESHOLD)]
    threshold_pair: f32,
    /// Skip targets with more ambiguous sites than this.
    #[arg(long)]
    threshold_target: Option<u32>,
    /// Do not refill short bins from bins with spare neighbours.
    #[arg(long)]
    no_fill: bool,
    /// Distinct fallback distances kept for bins a distance cutoff leaves empty (0 disables).
    #[arg(long, default_value_t = 0)]
    pushdist: usize,
    /// Target names to skip (comma-separated).
    #[arg(long, value_delimiter = ',')]
    ignore: Vec<String>,
    /// Ranking worker threads (0 = all cores).
    #[arg(long, default_value_t = 0)]
    threads: usize,
    /// Targets profiled per parallel batch.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
}

impl RankArgs {
    fn ranking_config(&self) -> RankingConfig {
        let mut catchment = match self.size_total {
            Some(total) => CatchmentConfig::with_total_size(total),
            None => CatchmentConfig::with_bin_sizes([
                self.size_same.unwrap_or(0),
                self.size_up.unwrap_or(0),
                self.size_down.unwrap_or(0),
                self.size_side.unwrap_or(0),
            ]),
        };
        if let Some(distance) = self.dist_all {
            catchment = catchment.with_distance_all(distance);
        }
        let per_bin = [self.dist_same, self.dist_up, self.dist_down, self.dist_side];
        for (direction, distance) in Direction::ALL.into_iter().zip(per_bin) {
            if let Some(distance) = distance {
                catchment = catchment.with_max_distance(direction, distance);
            }
        }
        let catchment = catchment
            .with_pair_threshold(self.threshold_pair)
            .with_fill(!self.no_fill)
            .with_push_distance(self.pushdist);

        let mut config = RankingConfig::new(catchment)
            .with_ignore(self.ignore.iter().cloned())
            .with_batch_size(self.batch_size)
            .with_workers(self.threads);
        if let Some(limit) = self.threshold_target {
            config = config.with_max_target_ambiguities(limit);
        }
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            reference,
            query,
            out,
            batch_size,
        } => run_list(reference, query, out, batch_size)?,
        Commands::Rank(args) => run_rank(args)?,
    }

    Ok(())
}

fn run_list(
    reference_path: PathBuf,
    query_path: PathBuf,
    out: Option<PathBuf>,
    batch_size: usize,
) -> Result<()> {
    if InputFormat::from_path(&query_path) == InputFormat::Listing {
        bail!("{} is already a profile listing", query_path.display());
    }
    let reference = load_reference(&reference_path)?;
    let reader = open_input(&query_path)
        .with_context(|| format!("failed to open {}", query_path.display()))?;
    let records = FastaRecords::new(reader).with_width(reference.len());

    let mut writer = create_output(out.as_deref())?;
    pipeline::list_profiles(&reference.sequence, records, &mut writer, batch_size)
        .with_context(|| format!("failed to list {}", query_path.display()))?;
    Ok(())
}

fn run_rank(args: RankArgs) -> Result<()> {
    let config = args.ranking_config();

    let reference = args
        .reference
        .as_deref()
        .map(load_reference)
        .transpose()?;
    let needs_reference = [&args.query, &args.target]
        .iter()
        .any(|path| InputFormat::from_path(path) == InputFormat::Fasta);
    if needs_reference && reference.is_none() {
        bail!("--reference is required when queries or targets are FASTA");
    }
    let width = reference.as_ref().map(SequenceRecord::len);
    let reference = reference.map(|record| record.sequence);

    let queries = open_records(&args.query, width)
        .with_context(|| format!("failed to open queries {}", args.query.display()))?;
    let queries = pipeline::profile_all(reference.as_ref(), queries)
        .with_context(|| format!("failed to read queries from {}", args.query.display()))?;

    let targets = open_records(&args.target, width)
        .with_context(|| format!("failed to open targets {}", args.target.display()))?;
    let coordinator = StreamCoordinator::new(reference, queries, config)
        .context("invalid ranking parameters")?;
    info!("loaded {} queries", coordinator.query_count());
    let outcome = coordinator
        .run(targets)
        .with_context(|| format!("ranking against {} failed", args.target.display()))?;

    let mut writer = create_output(args.out.as_deref())?;
    write_ranking(&mut writer, &outcome.results).context("failed to write ranking")?;
    Ok(())
}

fn load_reference(path: &Path) -> Result<SequenceRecord> {
    let reader =
        open_input(path).with_context(|| format!("failed to open reference {}", path.display()))?;
    let reference = read_reference(reader)
        .with_context(|| format!("failed to read reference from {}", path.display()))?;
    pipeline::check_reference(&reference);
    Ok(reference)
}

fn create_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

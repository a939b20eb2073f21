use std::path::{Path, PathBuf};
use anyhow::{bail, Result};
use clap::Parser;
use follow_graph_analyzer::analysis::{analyze_batch, AnalysisReport};
use follow_graph_analyzer::config::Config;
use follow_graph_analyzer::data::{load_follow_records, EdgeSource};
use follow_graph_analyzer::storage;

#[derive(Parser, Debug)]
#[clap(
    name = "follow-graph-analyzer",
    about = "Community detection and influencer ranking over follow relationships"
)]
struct Cli {
    /// Path to an input Parquet or CSV file; repeat to analyze several graphs
    #[clap(long, required = true)]
    input: Vec<PathBuf>,

    /// Output directory for results
    #[clap(long, default_value = "analysis_results")]
    output_dir: PathBuf,

    /// Column holding the following account
    #[clap(long, default_value = "source_id")]
    source_column: String,

    /// Column holding the followed account
    #[clap(long, default_value = "target_id")]
    target_column: String,

    /// Number of top influencers to report, globally and per community
    #[clap(long, default_value = "5")]
    top_k: usize,

    /// Maximum number of label propagation rounds
    #[clap(long, default_value = "100")]
    max_iterations: usize,

    /// Seed for the random source (a random seed is drawn and logged if omitted)
    #[clap(long)]
    seed: Option<u64>,

    /// Skip self-loop records instead of failing the analysis
    #[clap(long)]
    skip_self_loops: bool,

    /// Keep at most this many records per source account
    #[clap(long)]
    max_edges_per_source: Option<usize>,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let config = Config::new(args.top_k, args.max_iterations, args.skip_self_loops);
    config.validate()?;

    // Communities depend on the seed, so always report the one in use
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Random seed: {}", seed);

    let source = EdgeSource {
        source_column: args.source_column.clone(),
        target_column: args.target_column.clone(),
        max_edges_per_source: args.max_edges_per_source,
    };

    // 1. Load data
    let inputs = args
        .input
        .iter()
        .map(|path| load_follow_records(path, &source))
        .collect::<Result<Vec<_>>>()?;

    // 2. Build, detect and rank, one independent analysis per input
    let results = analyze_batch(inputs, &config, seed);

    // 3. Save results
    let mut failures = 0;
    for (path, result) in args.input.iter().zip(results) {
        match result {
            Ok(report) => {
                log_report(path, &report);
                let dir = output_dir_for(&args.output_dir, path, args.input.len());
                storage::save_results(&report, &dir)?;
            }
            Err(err) => {
                log::error!("Analysis of {} failed: {}", path.display(), err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} analyses failed", failures, args.input.len());
    }

    log::info!("Analysis complete. Results saved to {}", args.output_dir.display());

    Ok(())
}

/// Results of a single input go straight into the output directory, several
/// inputs each get a subdirectory named after the file
fn output_dir_for(output_dir: &Path, input: &Path, input_count: usize) -> PathBuf {
    if input_count == 1 {
        return output_dir.to_path_buf();
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    output_dir.join(stem)
}

fn log_report(path: &Path, report: &AnalysisReport) {
    log::info!(
        "{}: {} nodes, {} edges, {} communities (seed {}, converged: {}, rounds: {})",
        path.display(),
        report.graph.node_count(),
        report.graph.edge_count(),
        report.partition.len(),
        report.seed.map_or_else(|| "n/a".to_string(), |s| s.to_string()),
        report.partition.converged,
        report.partition.iterations
    );

    for community in &report.partition.communities {
        log::info!(
            "Community {}: {} members, density {:.4}",
            community.id,
            community.size,
            community.density
        );
        if let Some(ranking) = report.community_rankings.get(&community.id) {
            for (i, entry) in ranking.iter().enumerate() {
                log::debug!("  {}. {} - Degree Centrality: {:.4}", i + 1, entry.node, entry.score);
            }
        }
    }

    log::info!("Top {} influencers:", report.global_ranking.len());
    for (i, entry) in report.global_ranking.iter().enumerate() {
        log::info!("{}. {} - Degree Centrality: {:.4}", i + 1, entry.node, entry.score);
    }
}

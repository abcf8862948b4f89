use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
#[cfg(feature = "tracing")]
use tracing::Level;
#[cfg(feature = "tracing")]
use tracing_subscriber::fmt;

use kdspace::command::{RunSummary, Session, SessionConfig};
use kdspace::distance::{DistanceMetric, Manhattan, SquaredEuclidean};
use kdspace::loader::LoaderConfig;
use kdspace::Traversal;

/// Answers nearest-neighbour (NN) and range (RS) queries over an integer point set,
/// reading LOAD / NN / RS / EXIT commands one per line.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Command script to execute; reads standard input when omitted
    script: Option<PathBuf>,

    /// Seed for the insertion-order shuffle, for a reproducible tree shape
    #[arg(long)]
    seed: Option<u64>,

    /// Fisher-Yates passes over the points before insertion
    #[arg(long, default_value_t = 2)]
    shuffle_passes: usize,

    /// How queries walk the tree
    #[arg(long, value_enum, default_value_t = TraversalArg::Recursive)]
    traversal: TraversalArg,

    /// Distance metric used by NN
    #[arg(long, value_enum, default_value_t = MetricArg::SquaredEuclidean)]
    metric: MetricArg,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); logs go to stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TraversalArg {
    Recursive,
    ExplicitStack,
}

impl From<TraversalArg> for Traversal {
    fn from(arg: TraversalArg) -> Self {
        match arg {
            TraversalArg::Recursive => Traversal::Recursive,
            TraversalArg::ExplicitStack => Traversal::ExplicitStack,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MetricArg {
    SquaredEuclidean,
    Manhattan,
}

fn run<D: DistanceMetric>(
    config: SessionConfig,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<RunSummary, Box<dyn Error>> {
    let mut session: Session<D> = Session::new(config);
    let summary = session.run(input, out)?;
    out.flush()?;
    Ok(summary)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    #[cfg(feature = "tracing")]
    {
        let level = match args.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        let subscriber = fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .without_time()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    let config = SessionConfig {
        loader: LoaderConfig {
            shuffle_passes: args.shuffle_passes,
            seed: args.seed,
        },
        traversal: args.traversal.into(),
    };

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let mut out = BufWriter::new(io::stdout().lock());

    let summary = match args.metric {
        MetricArg::SquaredEuclidean => run::<SquaredEuclidean>(config, input, &mut out)?,
        MetricArg::Manhattan => run::<Manhattan>(config, input, &mut out)?,
    };

    #[cfg(feature = "tracing")]
    tracing::info!(
        executed = summary.executed,
        failed = summary.failed,
        "session finished"
    );
    #[cfg(not(feature = "tracing"))]
    if summary.failed > 0 {
        eprintln!("{} of {} commands failed", summary.failed, summary.executed + summary.failed);
    }

    Ok(())
}

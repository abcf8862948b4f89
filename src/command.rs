//! Line-oriented command interface over a loaded tree.
//!
//! One command per line:
//!
//! | command                   | effect                                                    |
//! |---------------------------|-----------------------------------------------------------|
//! | `LOAD <path>`             | builds a tree from a point-set file, replacing any other  |
//! | `NN x1 .. xk`             | prints every nearest point, one per line                  |
//! | `RS l1 h1 l2 h2 .. lk hk` | prints every point with `li <= xi <= hi` on each axis      |
//! | `EXIT`                    | releases the tree and stops                               |
//!
//! Range bounds are given as low/high pairs per axis.

use std::io::{BufRead, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;

use crate::distance::{DistanceMetric, SquaredEuclidean};
use crate::error::{KdError, Result};
use crate::kdtree::{KdTree, Traversal};
use crate::loader::{load_path, LoaderConfig};
use crate::point::{Coord, Point};

#[cfg(feature = "tracing")]
use tracing::{event, Level};

/// A parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `LOAD <path>`
    Load(PathBuf),
    /// `NN x1 .. xk`
    Nearest(Vec<Coord>),
    /// `RS l1 h1 .. lk hk`, de-interleaved into the two corners of the box
    Range {
        /// lower corner
        low: Vec<Coord>,
        /// upper corner
        high: Vec<Coord>,
    },
    /// `EXIT`
    Exit,
}

impl Command {
    /// Parses one line of input. Blank lines parse to `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdspace::command::Command;
    ///
    /// assert_eq!(
    ///     Command::parse("RS 0 1 0 1", 1).unwrap(),
    ///     Some(Command::Range { low: vec![0, 0], high: vec![1, 1] })
    /// );
    /// assert_eq!(Command::parse("   ", 2).unwrap(), None);
    /// ```
    pub fn parse(line: &str, line_no: usize) -> Result<Option<Command>> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(None);
        };

        let command = match name {
            "LOAD" => {
                let path = tokens
                    .next()
                    .ok_or_else(|| KdError::malformed(line_no, "LOAD needs a file path"))?;
                Command::Load(PathBuf::from(path))
            }
            "NN" => Command::Nearest(parse_coords(tokens, line_no)?),
            "RS" => {
                let bounds = parse_coords(tokens, line_no)?;
                if bounds.len() % 2 != 0 {
                    return Err(KdError::malformed(
                        line_no,
                        format!("RS needs low/high pairs, got {} values", bounds.len()),
                    ));
                }
                let (low, high) = bounds.chunks_exact(2).map(|pair| (pair[0], pair[1])).unzip();
                Command::Range { low, high }
            }
            "EXIT" => Command::Exit,
            other => {
                return Err(KdError::malformed(
                    line_no,
                    format!("unknown command {other:?}"),
                ))
            }
        };

        Ok(Some(command))
    }
}

fn parse_coords<'a>(tokens: impl Iterator<Item = &'a str>, line_no: usize) -> Result<Vec<Coord>> {
    tokens
        .map(|token| {
            token.parse().map_err(|_| {
                KdError::malformed(line_no, format!("expected an integer, found {token:?}"))
            })
        })
        .collect()
}

/// Settings for a [`Session`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// how `LOAD` builds its tree
    pub loader: LoaderConfig,
    /// how queries walk the tree
    pub traversal: Traversal,
}

/// Counts reported at the end of [`Session::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// commands executed successfully
    pub executed: usize,
    /// commands rejected or failed
    pub failed: usize,
}

/// Holds at most one loaded tree and executes commands against it.
#[derive(Debug)]
pub struct Session<D = SquaredEuclidean> {
    tree: Option<KdTree<D>>,
    config: SessionConfig,
}

impl<D: DistanceMetric> Session<D> {
    /// Creates a session with nothing loaded.
    pub fn new(config: SessionConfig) -> Self {
        Self { tree: None, config }
    }

    /// The currently loaded tree, if any.
    pub fn tree(&self) -> Option<&KdTree<D>> {
        self.tree.as_ref()
    }

    /// Executes a single command, writing any query output to `out`.
    ///
    /// A failed `LOAD` leaves the previously loaded tree in place.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<ControlFlow<()>> {
        #[cfg(feature = "tracing")]
        event!(Level::DEBUG, ?command, "executing command");

        match command {
            Command::Load(path) => {
                let tree = load_path(&path, &self.config.loader)?;
                if let Some(previous) = self.tree.replace(tree) {
                    previous.teardown();
                }
            }
            Command::Nearest(query) => {
                let tree = self.tree.as_ref().ok_or(KdError::NotLoaded)?;
                if let Some(nearest) = tree.nearest_with(self.config.traversal, &query)? {
                    #[cfg(feature = "tracing")]
                    event!(
                        Level::DEBUG,
                        distance = nearest.distance,
                        count = nearest.len(),
                        "nearest neighbours"
                    );
                    write_points(out, nearest.iter())?;
                }
            }
            Command::Range { low, high } => {
                let tree = self.tree.as_ref().ok_or(KdError::NotLoaded)?;
                let found = tree.range_with(self.config.traversal, &low, &high)?;
                write_points(out, found)?;
            }
            Command::Exit => {
                if let Some(tree) = self.tree.take() {
                    tree.teardown();
                }
                return Ok(ControlFlow::Break(()));
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Reads commands from `input` until `EXIT` or end of input.
    ///
    /// Commands that fail (including lines that are not valid UTF-8) are reported and
    /// skipped. Failing to read `input` or to write `out` ends the run with an error.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for (idx, bytes) in input.split(b'\n').enumerate() {
            let bytes = bytes?;
            let line_no = idx + 1;

            let outcome = String::from_utf8(bytes)
                .map_err(|_| KdError::malformed(line_no, "command is not valid UTF-8"))
                .and_then(|line| Command::parse(&line, line_no))
                .and_then(|command| match command {
                    Some(command) => self.execute(command, out).map(Some),
                    None => Ok(None),
                });

            match outcome {
                Ok(None) => {}
                Ok(Some(flow)) => {
                    summary.executed += 1;
                    if flow.is_break() {
                        return Ok(summary);
                    }
                }
                Err(err @ KdError::Output(_)) => return Err(err),
                Err(err) => {
                    summary.failed += 1;
                    report_failure(line_no, &err);
                }
            }
        }

        if let Some(tree) = self.tree.take() {
            tree.teardown();
        }
        Ok(summary)
    }
}

#[cfg(feature = "tracing")]
fn report_failure(line_no: usize, err: &KdError) {
    event!(Level::ERROR, line = line_no, error = %err, "command failed");
}

#[cfg(not(feature = "tracing"))]
fn report_failure(line_no: usize, err: &KdError) {
    eprintln!("line {line_no}: {err}");
}

fn write_points<'a, W: Write>(
    out: &mut W,
    points: impl IntoIterator<Item = &'a Point>,
) -> Result<()> {
    for point in points {
        writeln!(out, "{point}").map_err(KdError::Output)?;
    }
    Ok(())
}

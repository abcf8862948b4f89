//! Bulk loading of point-set files.
//!
//! A point set is a header `n k` (point count, dimensionality) followed by `n * k`
//! whitespace-separated integers, conventionally one point per line. Points are shuffled
//! before insertion: files are often sorted or clustered, and inserting them in file order
//! would build a near-linear tree.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{KdError, Result};
use crate::kdtree::KdTree;
use crate::point::{Coord, Point};

#[cfg(feature = "tracing")]
use tracing::{event, Level};

/// Controls how a point set is turned into a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Number of full Fisher-Yates passes over the points before insertion. 0 inserts
    /// them in file order.
    pub shuffle_passes: usize,
    /// Seeds the shuffle, making the tree's shape reproducible. `None` uses the thread RNG.
    pub seed: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            shuffle_passes: 2,
            seed: None,
        }
    }
}

/// The contents of a point-set file, in file order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointSet {
    /// dimensionality declared in the header
    pub dims: usize,
    /// exactly as many points as the header declared
    pub points: Vec<Point>,
}

/// Yields `(line number, token)` pairs over a whole input.
struct Tokens<'a> {
    inner: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
    line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: Box::new(
                text.lines()
                    .enumerate()
                    .flat_map(|(idx, line)| line.split_whitespace().map(move |t| (idx + 1, t))),
            ),
            line: 1,
        }
    }

    fn next_parsed<T: std::str::FromStr>(&mut self, what: &str) -> Result<T> {
        let Some((line, token)) = self.inner.next() else {
            return Err(KdError::malformed(
                self.line,
                format!("unexpected end of input, expected {what}"),
            ));
        };
        self.line = line;

        token
            .parse()
            .map_err(|_| KdError::malformed(line, format!("expected {what}, found {token:?}")))
    }
}

/// Parses a point set, validating it against its header.
///
/// # Examples
///
/// ```rust
/// use kdspace::loader::parse_points;
/// use kdspace::Point;
///
/// let set = parse_points("2 2\n0 0\n1 1\n".as_bytes()).unwrap();
///
/// assert_eq!(set.dims, 2);
/// assert_eq!(set.points, vec![Point::from([0, 0]), Point::from([1, 1])]);
/// ```
pub fn parse_points<R: Read>(mut reader: R) -> Result<PointSet> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = String::from_utf8(bytes).map_err(|err| {
        let valid = &err.as_bytes()[..err.utf8_error().valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        KdError::malformed(line, "point set is not valid UTF-8")
    })?;

    let mut tokens = Tokens::new(&text);
    let count: usize = tokens.next_parsed("a point count")?;
    let dims: usize = tokens.next_parsed("a dimensionality")?;
    if dims == 0 {
        return Err(KdError::malformed(tokens.line, "dimensionality must be at least 1"));
    }

    // the header is untrusted, so don't let it dictate a huge up-front allocation
    let mut points = Vec::with_capacity(count.min(1 << 16));
    for _ in 0..count {
        let coords = (0..dims)
            .map(|_| tokens.next_parsed::<Coord>("an integer coordinate"))
            .collect::<Result<Vec<_>>>()?;
        points.push(Point::from(coords));
    }

    if let Some((line, token)) = tokens.inner.next() {
        return Err(KdError::malformed(
            line,
            format!("unexpected {token:?} after the {count} points declared in the header"),
        ));
    }

    Ok(PointSet { dims, points })
}

/// Shuffles `points` with `passes` rounds of Fisher-Yates.
pub fn shuffle<R: Rng + ?Sized>(points: &mut [Point], passes: usize, rng: &mut R) {
    for _ in 0..passes {
        points.shuffle(rng);
    }
}

/// Reads a point set and builds a tree from it, inserting the points in shuffled order.
pub fn load_reader<D, R: Read>(reader: R, config: &LoaderConfig) -> Result<KdTree<D>> {
    let PointSet { dims, mut points } = parse_points(reader)?;

    match config.seed {
        Some(seed) => shuffle(
            &mut points,
            config.shuffle_passes,
            &mut ChaCha8Rng::seed_from_u64(seed),
        ),
        None => shuffle(&mut points, config.shuffle_passes, &mut rand::rng()),
    }

    let tree = KdTree::from_points_with_metric(dims, points)?;

    #[cfg(feature = "tracing")]
    {
        let height = tree.height();
        let balanced_height = (usize::BITS - tree.size().leading_zeros()) as usize;
        event!(
            Level::INFO,
            points = tree.size(),
            dims,
            height,
            "loaded point set"
        );
        if height > 4 * balanced_height {
            event!(
                Level::WARN,
                height,
                balanced_height,
                "tree is badly unbalanced, queries may approach linear time"
            );
        }
    }

    Ok(tree)
}

/// Opens the point-set file at `path` and builds a tree from it.
///
/// # Examples
///
/// ```no_run
/// use kdspace::loader::{load_path, LoaderConfig};
/// use kdspace::KdTree;
///
/// let tree: KdTree = load_path("data/points.txt", &LoaderConfig::default()).unwrap();
/// ```
pub fn load_path<D>(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<KdTree<D>> {
    let path = path.as_ref();
    #[cfg(feature = "tracing")]
    event!(Level::DEBUG, path = %path.display(), "loading point set");

    let file = File::open(path)?;
    load_reader(BufReader::new(file), config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::distance::SquaredEuclidean;
    use crate::error::KdError;
    use crate::kdtree::KdTree;
    use crate::loader::{load_path, load_reader, parse_points, shuffle, LoaderConfig};
    use crate::point::Point;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    #[test]
    fn parses_tokens_across_line_breaks() {
        let set = parse_points("3 2\n0 0 1\n1\n  2 2 \n".as_bytes()).unwrap();

        assert_eq!(
            set.points,
            vec![Point::from([0, 0]), Point::from([1, 1]), Point::from([2, 2])]
        );
    }

    #[test]
    fn parses_an_empty_point_set() {
        let set = parse_points("0 4\n".as_bytes()).unwrap();

        assert_eq!(set.dims, 4);
        assert!(set.points.is_empty());
    }

    #[rstest]
    #[case("", 1)]
    #[case("x 2\n", 1)]
    #[case("2\n", 1)]
    #[case("1 0\n", 1)]
    #[case("2 2\n1 1\n1 a\n", 3)]
    #[case("2 2\n1 1\n1\n", 3)]
    #[case("1 2\n1 1\n1 1\n", 3)]
    #[case("1 1\n99999999999\n", 2)]
    fn reports_malformed_input_with_its_line(#[case] input: &str, #[case] expected_line: usize) {
        let result = parse_points(input.as_bytes());

        match result {
            Err(KdError::MalformedInput { line, .. }) => assert_eq!(line, expected_line),
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn non_utf8_input_is_malformed_on_its_line() {
        let result = parse_points(&b"2 1\n4\n\xff\n"[..]);

        match result {
            Err(KdError::MalformedInput { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn shuffle_keeps_every_point() {
        let mut points: Vec<Point> = (0..100).map(|i| Point::from([i, -i])).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        shuffle(&mut points, 2, &mut rng);

        let mut sorted = points.clone();
        sorted.sort();
        assert_eq!(sorted, (0..100).map(|i| Point::from([i, -i])).collect::<Vec<_>>());
        assert_ne!(points, sorted);
    }

    #[test]
    fn seeded_loads_build_identically_shaped_trees() {
        let input: String = std::iter::once("200 2\n".to_string())
            .chain((0..200).map(|i| format!("{i} {}\n", i % 7)))
            .collect();
        let config = LoaderConfig {
            seed: Some(42),
            ..LoaderConfig::default()
        };

        let a: KdTree<SquaredEuclidean> = load_reader(input.as_bytes(), &config).unwrap();
        let b: KdTree<SquaredEuclidean> = load_reader(input.as_bytes(), &config).unwrap();

        assert_eq!(a.size(), 200);
        assert_eq!(a.iter().collect::<Vec<_>>(), b.iter().collect::<Vec<_>>());
    }

    #[test]
    fn shuffling_avoids_a_linear_tree_for_sorted_input() {
        let input: String = std::iter::once("1000 1\n".to_string())
            .chain((0..1000).map(|i| format!("{i}\n")))
            .collect();

        let unshuffled: KdTree = load_reader(
            input.as_bytes(),
            &LoaderConfig {
                shuffle_passes: 0,
                seed: None,
            },
        )
        .unwrap();
        let shuffled: KdTree = load_reader(
            input.as_bytes(),
            &LoaderConfig {
                seed: Some(3),
                ..LoaderConfig::default()
            },
        )
        .unwrap();

        assert_eq!(unshuffled.height(), 1000);
        assert!(shuffled.height() < 100);
    }

    #[test]
    fn loads_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "3 2").unwrap();
        writeln!(file, "0 0").unwrap();
        writeln!(file, "1 1").unwrap();
        writeln!(file, "2 2").unwrap();
        file.flush().unwrap();

        let tree: KdTree = load_path(file.path(), &LoaderConfig::default()).unwrap();

        assert_eq!(tree.size(), 3);
        assert_eq!(tree.dims(), 2);
        let nearest = tree.nearest(&[5, 5]).unwrap().unwrap();
        assert_eq!(nearest.distance, 18);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let result: Result<KdTree, _> =
            load_path(dir.path().join("missing.txt"), &LoaderConfig::default());

        assert!(matches!(result, Err(KdError::Io(_))));
    }
}

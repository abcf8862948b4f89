use std::io::Write;

use kdspace::command::{Session, SessionConfig};
use kdspace::distance::SquaredEuclidean;
use kdspace::loader::LoaderConfig;
use kdspace::test_utils::{linear_nearest, linear_range, rand_points};
use kdspace::Traversal;

fn render(points: &[kdspace::Point]) -> String {
    points.iter().map(|p| format!("{p}\n")).collect()
}

#[test]
fn session_output_matches_the_linear_oracle() {
    let content = rand_points(400, 2, -100..100);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{} 2", content.len()).unwrap();
    for p in &content {
        writeln!(file, "{p}").unwrap();
    }
    file.flush().unwrap();

    let queries = [[0, 0], [-100, 100], [57, -3], [250, 250]];
    let boxes = [([-10, -10], [10, 10]), ([50, -100], [70, 100]), ([5, 5], [4, 4])];

    let mut script = format!("LOAD {}\n", file.path().display());
    let mut expected = String::new();
    for q in &queries {
        script.push_str(&format!("NN {} {}\n", q[0], q[1]));
        expected.push_str(&render(&linear_nearest::<SquaredEuclidean>(&content, q).1));
    }
    for (low, high) in &boxes {
        script.push_str(&format!("RS {} {} {} {}\n", low[0], high[0], low[1], high[1]));
        expected.push_str(&render(&linear_range(&content, low, high)));
    }
    script.push_str("EXIT\n");

    for traversal in [Traversal::Recursive, Traversal::ExplicitStack] {
        for seed in [None, Some(11)] {
            let mut session: Session = Session::new(SessionConfig {
                loader: LoaderConfig {
                    seed,
                    ..LoaderConfig::default()
                },
                traversal,
            });
            let mut out = Vec::new();

            let summary = session.run(script.as_bytes(), &mut out).unwrap();

            assert_eq!(summary.failed, 0);
            assert_eq!(summary.executed, 1 + queries.len() + boxes.len() + 1);
            assert_eq!(String::from_utf8(out).unwrap(), expected);
        }
    }
}

#[test]
fn malformed_point_file_is_reported_and_the_session_continues() {
    let mut bad = tempfile::NamedTempFile::new().unwrap();
    write!(bad, "2 2\n1 1\n1 nope\n").unwrap();
    bad.flush().unwrap();
    let mut good = tempfile::NamedTempFile::new().unwrap();
    write!(good, "1 2\n3 4\n").unwrap();
    good.flush().unwrap();

    let script = format!(
        "LOAD {}\nNN 0 0\nLOAD {}\nNN 0 0\n",
        bad.path().display(),
        good.path().display()
    );
    let mut session: Session = Session::new(SessionConfig::default());
    let mut out = Vec::new();

    let summary = session.run(script.as_bytes(), &mut out).unwrap();

    assert_eq!(summary.failed, 2);
    assert_eq!(summary.executed, 2);
    assert_eq!(String::from_utf8(out).unwrap(), "3 4\n");
}

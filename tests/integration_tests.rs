use gfaprune::cmd::{check, prune};
use gfaprune::config::PruneParams;
use gfaprune::error::CmdError;
use std::fs;
use std::path::Path;
use tempdir::TempDir;

const DIAMOND: &str = "H\tVN:Z:1.0\n\
S\t1\tACGT\n\
S\t2\tC\n\
S\t3\tG\n\
S\t4\tTTA\n\
L\t1\t+\t2\t+\t0M\n\
L\t1\t+\t3\t+\t0M\n\
L\t2\t+\t4\t+\t0M\n\
L\t3\t+\t4\t+\t0M\n\
P\tread1\t1+,2+,4+\t*\n\
P\tread2\t1+,2+,4+\t*\n\
P\tread3\t1+,3+,4+\t*\n";

fn write_input(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write input");
    path.to_string_lossy().into_owned()
}

fn prefix(dir: &TempDir) -> String {
    dir.path().join("out").to_string_lossy().into_owned()
}

fn open_filters(min_weight: u64) -> PruneParams {
    PruneParams {
        min_weight,
        min_confidence: 0.0,
        min_support: 0.0,
        ..Default::default()
    }
}

#[test]
fn test_diamond_keeps_both_branches() {
    let dir = TempDir::new("gfaprune").unwrap();
    let input = write_input(&dir, "diamond.gfa", DIAMOND);
    let summary = prune::prune_gfa(&input, &prefix(&dir), &open_filters(1)).unwrap();

    assert!(summary.connected);
    assert_eq!(summary.kept_size, 4);
    let (gfa, _, _) = prune::output_paths(&prefix(&dir));
    let text = fs::read_to_string(gfa).unwrap();
    assert_eq!(text.lines().filter(|l| l.starts_with('S')).count(), 4);
    assert_eq!(text.lines().filter(|l| l.starts_with('L')).count(), 4);
    assert!(!text.contains("\nP\t"));
}

#[test]
fn test_diamond_drops_weak_branch() {
    let dir = TempDir::new("gfaprune").unwrap();
    let input = write_input(&dir, "diamond.gfa", DIAMOND);
    let out = prefix(&dir);
    let summary = prune::prune_gfa(&input, &out, &open_filters(2)).unwrap();

    assert_eq!(summary.sizes, vec![3]);
    assert!(summary.connected);

    let (gfa, weights, votes) = prune::output_paths(&out);
    assert_eq!(
        fs::read_to_string(gfa).unwrap(),
        "H\tVN:Z:1.0\n\
S\t1\tACGT\n\
S\t2\tC\n\
S\t4\tTTA\n\
L\t1\t+\t2\t+\t0M\n\
L\t2\t+\t4\t+\t0M\n"
    );
    assert_eq!(
        fs::read_to_string(weights).unwrap(),
        "1\t3\t1\n3\t4\t1\n1\t2\t2\n2\t4\t2\n"
    );
    assert_eq!(
        fs::read_to_string(votes).unwrap(),
        "1+:2+\t1\n2+:4+\t1\n"
    );
    assert!(check::check_gfa(&format!("{}.gfa", out)).unwrap());
}

#[test]
fn test_keep_paths() {
    let dir = TempDir::new("gfaprune").unwrap();
    let input = write_input(&dir, "diamond.gfa", DIAMOND);
    let params = PruneParams {
        keep_paths: true,
        ..open_filters(2)
    };
    prune::prune_gfa(&input, &prefix(&dir), &params).unwrap();
    let (gfa, _, _) = prune::output_paths(&prefix(&dir));
    let text = fs::read_to_string(gfa).unwrap();
    let paths: Vec<&str> = text.lines().filter(|l| l.starts_with('P')).collect();
    assert_eq!(
        paths,
        vec!["P\tread1\t1+,2+,4+\t*", "P\tread2\t1+,2+,4+\t*"]
    );
}

#[test]
fn test_chi_square_without_triple_pass() {
    let dir = TempDir::new("gfaprune").unwrap();
    let input = write_input(&dir, "diamond.gfa", DIAMOND);
    let params = PruneParams {
        use_chi_square: true,
        triple_nodes: false,
        p_cutoff: 0.05,
        weight_cutoff: 1,
        ..open_filters(1)
    };
    let out = prefix(&dir);
    let summary = prune::prune_gfa(&input, &out, &params).unwrap();
    assert_eq!(summary.kept_size, 3);
    let (_, _, votes) = prune::output_paths(&out);
    assert!(!Path::new(&votes).exists());
}

#[test]
fn test_reverse_path_writes_nothing() {
    let dir = TempDir::new("gfaprune").unwrap();
    let input = write_input(
        &dir,
        "reverse.gfa",
        "S\t1\tA\nS\t2\tC\nL\t1\t+\t2\t-\t0M\nP\tread1\t1+,2-\t*\n",
    );
    let out = prefix(&dir);
    let err = prune::prune_gfa(&input, &out, &PruneParams::default()).unwrap_err();
    assert!(matches!(err, CmdError::ReverseOrientedPath { line: 4, .. }));
    let (gfa, weights, votes) = prune::output_paths(&out);
    assert!(!Path::new(&gfa).exists());
    assert!(!Path::new(&weights).exists());
    assert!(!Path::new(&votes).exists());
}

#[test]
fn test_missing_input() {
    let dir = TempDir::new("gfaprune").unwrap();
    let missing = dir.path().join("nope.gfa");
    let err = prune::prune_gfa(
        &missing.to_string_lossy(),
        &prefix(&dir),
        &PruneParams::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CmdError::FileOpenError(_)));
}

#[test]
fn test_output_is_connected_after_split() {
    // the 5->6 bridge is walked once and falls at min weight 2,
    // leaving {1,2,3,4,5} and {6,7}
    let dir = TempDir::new("gfaprune").unwrap();
    let input = write_input(
        &dir,
        "split.gfa",
        "S\t1\tA\nS\t2\tA\nS\t3\tA\nS\t4\tA\nS\t5\tA\nS\t6\tA\nS\t7\tA\n\
L\t1\t+\t2\t+\t0M\nL\t2\t+\t3\t+\t0M\nL\t3\t+\t4\t+\t0M\nL\t4\t+\t5\t+\t0M\n\
L\t5\t+\t6\t+\t0M\nL\t6\t+\t7\t+\t0M\n\
P\ta\t1+,2+,3+,4+,5+\t*\nP\tb\t1+,2+,3+,4+,5+\t*\nP\tc\t4+,5+,6+\t*\n\
P\td\t6+,7+\t*\nP\te\t6+,7+\t*\n",
    );
    let out = prefix(&dir);
    let params = PruneParams {
        triple_nodes: false,
        ..open_filters(2)
    };
    let summary = prune::prune_gfa(&input, &out, &params).unwrap();
    assert_eq!(summary.sizes, vec![5, 2]);
    assert_eq!(summary.kept_size, 5);
    assert!(summary.connected);
    assert!(check::check_gfa(&input).unwrap());
    assert!(check::check_gfa(&format!("{}.gfa", out)).unwrap());
}

#[test]
fn test_check_reports_split_graph() {
    let dir = TempDir::new("gfaprune").unwrap();
    let input = write_input(&dir, "two.gfa", "L\t1\t+\t2\t+\t0M\nL\t3\t+\t4\t+\t0M\n");
    assert!(!check::check_gfa(&input).unwrap());
}

#[test]
fn test_unlayered_component_can_win() {
    // a 5-node chain seeds the layering; the 7-node fan is never layered
    // and must survive on weight and confidence alone
    let mut data = String::new();
    for id in 1..=5 {
        data.push_str(&format!("S\t{}\tA\n", id));
    }
    for id in [20, 21, 22, 23, 24, 25, 30] {
        data.push_str(&format!("S\t{}\tC\n", id));
    }
    for (u, v) in [(1, 2), (2, 3), (3, 4), (4, 5)] {
        data.push_str(&format!("L\t{}\t+\t{}\t+\t0M\n", u, v));
    }
    for b in 21..=25 {
        data.push_str(&format!("L\t20\t+\t{}\t+\t0M\nL\t{}\t+\t30\t+\t0M\n", b, b));
    }
    for copy in 0..3 {
        data.push_str(&format!("P\tchain{}\t1+,2+,3+,4+,5+\t*\n", copy));
        for b in 21..=25 {
            data.push_str(&format!("P\tfan{}_{}\t20+,{}+,30+\t*\n", b, copy, b));
        }
    }

    let dir = TempDir::new("gfaprune").unwrap();
    let input = write_input(&dir, "fan.gfa", &data);
    let out = prefix(&dir);
    let params = PruneParams {
        min_weight: 1,
        min_confidence: 0.0,
        min_support: 0.2,
        triple_nodes: false,
        ..Default::default()
    };
    let summary = prune::prune_gfa(&input, &out, &params).unwrap();
    assert_eq!(summary.sizes, vec![7, 5]);
    assert_eq!(summary.kept_size, 7);
    assert!(summary.connected);

    let (gfa, _, _) = prune::output_paths(&out);
    let text = fs::read_to_string(gfa).unwrap();
    assert_eq!(text.lines().filter(|l| l.starts_with('L')).count(), 10);
    assert!(text.contains("S\t20\tC\n"));
    assert!(!text.contains("S\t1\tA\n"));
}

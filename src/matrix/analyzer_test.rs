use super::*;
use crate::authorship::{CoChange, EstimateOptions, estimate};
use crate::history::Contribution;
use crate::knowledge::{DecayModel, compute};
use crate::ownership::accumulate;

fn contrib(author: &str, path: &str, weight: u64, time: i64) -> Contribution {
    Contribution {
        author: author.to_string(),
        path: PathBuf::from(path),
        weight,
        time,
    }
}

fn sample() -> AssignmentMatrix {
    let contributions = vec![
        contrib("bob@x.com", "src/a.rs", 10, 0),
        contrib("bob@x.com", "src/a.rs", 6, 10),
        contrib("alice@x.com", "src/a.rs", 4, 10),
        contrib("alice@x.com", "src/b.rs", 8, 20),
    ];
    let ownership = accumulate(&contributions);
    let knowledge = compute(&contributions, DecayModel::new(1e9).unwrap(), 20).unwrap();
    let co = CoChange::from_commits(&[], 50);
    let opts = EstimateOptions {
        co_change_weight: 1.0,
        directory_weight: 0.5,
        min_estimate: 0.0,
    };
    let potential = estimate(&ownership, &knowledge, &co, &opts);
    build(&ownership, &knowledge, &potential)
}

#[test]
fn ids_follow_sorted_order() {
    let m = sample();
    assert_eq!(m.users, vec!["alice@x.com", "bob@x.com"]);
    assert_eq!(m.files, vec![PathBuf::from("src/a.rs"), PathBuf::from("src/b.rs")]);
    assert_eq!(m.user_id("bob@x.com"), Some(1));
    assert_eq!(m.file_id(Path::new("src/b.rs")), Some(1));
    assert_eq!(m.user_id("carol@x.com"), None);
}

#[test]
fn direct_cells_carry_commits_and_knowledge() {
    let m = sample();
    let cell = m.cell("bob@x.com", Path::new("src/a.rs")).unwrap();
    assert_eq!(cell.commits, 2);
    assert_eq!(cell.weight, 16);
    assert!((cell.knowledge - 0.8).abs() < 1e-6);
    assert_eq!(cell.potential, 0.0);
    assert_eq!(cell.score(), cell.knowledge);
}

#[test]
fn potential_cells_have_no_commits() {
    let m = sample();
    // bob never touched b.rs but knows its sibling a.rs
    let cell = m.cell("bob@x.com", Path::new("src/b.rs")).unwrap();
    assert!(!cell.is_direct());
    assert_eq!(cell.weight, 0);
    assert!((cell.potential - 0.8).abs() < 1e-6);
    assert_eq!(cell.score(), cell.potential);
}

#[test]
fn row_lists_user_cells() {
    let m = sample();
    let alice: Vec<usize> = m.row(0).map(|(f, _)| f).collect();
    assert_eq!(alice, vec![0, 1]);
    assert_eq!(m.len(), 4);
    assert_eq!(m.row(7).count(), 0);
}

#[test]
fn empty_inputs_give_empty_matrix() {
    let m = build(
        &Ownership::default(),
        &DeveloperKnowledge::default(),
        &PotentialAuthorship::default(),
    );
    assert!(m.is_empty());
    assert!(m.users.is_empty());
    assert!(m.files.is_empty());
}

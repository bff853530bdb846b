use super::*;
use crate::matrix::Cell;
use std::path::PathBuf;

fn direct(commits: usize) -> Cell {
    Cell {
        commits,
        weight: commits as u64 * 10,
        knowledge: 1.0,
        potential: 0.0,
    }
}

#[test]
fn role_thresholds() {
    assert_eq!(suggest_role(120, 10, 12.0), (Role::Coder, 0.8));
    assert_eq!(suggest_role(120, 30, 4.0), (Role::Reviewer, 0.7));
    // broad activity needs at least ten files
    assert_eq!(suggest_role(120, 9, 13.33), (Role::Coder, 0.6));
    assert_eq!(suggest_role(50, 2, 25.0), (Role::Coder, 0.6));
    assert_eq!(suggest_role(49, 2, 24.5), (Role::Reviewer, 0.5));
    assert_eq!(suggest_role(10, 1, 10.0), (Role::Reviewer, 0.5));
    assert_eq!(suggest_role(9, 1, 9.0), (Role::Unclassified, 0.3));
    assert_eq!(suggest_role(0, 0, 0.0), (Role::Unclassified, 0.3));
}

#[test]
fn login_extraction() {
    assert_eq!(login_from_email("jane@example.com"), "jane");
    assert_eq!(
        login_from_email("12345+octocat@users.noreply.github.com"),
        "octocat"
    );
    assert_eq!(login_from_email("octocat@users.noreply.github.com"), "octocat");
    assert_eq!(login_from_email("no-at-sign"), "no-at-sign");
}

#[test]
fn extensions_are_lowercased() {
    assert_eq!(extension_of(Path::new("src/Main.RS")), "rs");
    assert_eq!(extension_of(Path::new("Makefile")), "no_ext");
    assert_eq!(extension_of(Path::new("a.tar.gz")), "gz");
}

#[test]
fn stats_from_matrix() {
    let matrix = AssignmentMatrix {
        users: vec!["alice@x.com".into(), "bob@x.com".into()],
        files: vec![
            PathBuf::from("a.rs"),
            PathBuf::from("b.rs"),
            PathBuf::from("README"),
        ],
        cells: BTreeMap::from([
            (0, BTreeMap::from([(0, direct(3)), (1, direct(2)), (2, direct(2))])),
            (
                1,
                BTreeMap::from([(
                    0,
                    Cell {
                        potential: 0.4,
                        ..Cell::default()
                    },
                )]),
            ),
        ]),
    };
    let stats = analyze(&matrix);
    assert_eq!(stats.len(), 2);

    let alice = &stats[0];
    assert_eq!(alice.login, "alice");
    assert_eq!(alice.files_count, 3);
    assert_eq!(alice.total_modifications, 7);
    assert_eq!(alice.avg_modifications_per_file, 2.33);
    assert_eq!(alice.file_types["rs"], 5);
    assert_eq!(alice.file_types["no_ext"], 2);
    assert_eq!(alice.role, Role::Unclassified);
    assert!(!alice.is_core);

    // potential-only users contribute no modifications
    let bob = &stats[1];
    assert_eq!(bob.files_count, 0);
    assert_eq!(bob.avg_modifications_per_file, 0.0);
    assert!(bob.file_types.is_empty());
}

#[test]
fn core_contributor() {
    let row: BTreeMap<usize, Cell> = (0..10).map(|i| (i, direct(12))).collect();
    let matrix = AssignmentMatrix {
        users: vec!["dev@x.com".into()],
        files: (0..10).map(|i| PathBuf::from(format!("f{i}.rs"))).collect(),
        cells: BTreeMap::from([(0, row)]),
    };
    let stats = analyze(&matrix);
    assert_eq!(stats[0].total_modifications, 120);
    assert_eq!(stats[0].role, Role::Coder);
    assert_eq!(stats[0].role_confidence, 0.8);
    assert!(stats[0].is_core);
}

use super::*;
use crate::git::{Author, ChangeKind, FileChange};

fn change(path: &str, added: usize, removed: usize) -> FileChange {
    FileChange {
        path: PathBuf::from(path),
        old_path: None,
        added,
        removed,
        kind: ChangeKind::Modified,
    }
}

fn commit(who: &str, time: i64, parents: usize, changes: Vec<FileChange>) -> Commit {
    Commit {
        id: format!("{who}-{time}"),
        author: Author::new(who, &format!("{}@x.com", who.to_lowercase())),
        time,
        parents: (0..parents).map(|i| format!("p{i}")).collect(),
        changes,
    }
}

fn options(filter: &PathFilter, count_merges: bool) -> FlattenOptions<'_> {
    FlattenOptions {
        filter,
        weight: WeightMode::Churn,
        count_merges,
    }
}

#[test]
fn flatten_one_contribution_per_file() {
    let commits = vec![
        commit("Alice", 10, 0, vec![change("a.rs", 10, 0), change("b.rs", 3, 1)]),
        commit("Bob", 20, 1, vec![change("a.rs", 2, 2)]),
    ];
    let filter = PathFilter::permissive();
    let h = flatten(&commits, &options(&filter, false));

    assert_eq!(h.contributions.len(), 3);
    assert_eq!(h.commits, 2);
    assert_eq!(h.latest, Some(20));
    assert_eq!(total_weight(&h), 10 + 4 + 4);
    assert_eq!(h.authors.get("bob@x.com").map(String::as_str), Some("Bob"));
    assert_eq!(
        h.commit_files[0],
        vec![PathBuf::from("a.rs"), PathBuf::from("b.rs")]
    );
}

#[test]
fn flatten_skips_merges_unless_counted() {
    let commits = vec![
        commit("Alice", 10, 0, vec![change("a.rs", 1, 0)]),
        commit("Alice", 20, 2, vec![change("b.rs", 5, 0)]),
    ];
    let filter = PathFilter::permissive();

    let h = flatten(&commits, &options(&filter, false));
    assert_eq!(h.skipped_merges, 1);
    assert_eq!(total_weight(&h), 1);

    let h = flatten(&commits, &options(&filter, true));
    assert_eq!(h.skipped_merges, 0);
    assert_eq!(total_weight(&h), 6);
}

#[test]
fn flatten_applies_path_filter() {
    let commits = vec![commit(
        "Alice",
        10,
        0,
        vec![change("Cargo.lock", 500, 0), change("src/main.rs", 5, 0)],
    )];
    let filter = PathFilter::permissive();
    let h = flatten(&commits, &options(&filter, false));
    assert_eq!(h.contributions.len(), 1);
    assert_eq!(h.contributions[0].path, PathBuf::from("src/main.rs"));
}

#[test]
fn flatten_keeps_first_display_name() {
    let mut second = commit("Alice", 20, 1, vec![change("a.rs", 1, 0)]);
    second.author = Author::new("A. Liddell", "alice@x.com");
    let commits = vec![commit("Alice", 10, 0, vec![change("a.rs", 1, 0)]), second];
    let filter = PathFilter::permissive();
    let h = flatten(&commits, &options(&filter, false));
    assert_eq!(h.authors.len(), 1);
    assert_eq!(h.authors["alice@x.com"], "Alice");
}

#[test]
fn flatten_empty_history() {
    let filter = PathFilter::permissive();
    let h = flatten(&[], &options(&filter, false));
    assert!(h.contributions.is_empty());
    assert_eq!(h.latest, None);
}

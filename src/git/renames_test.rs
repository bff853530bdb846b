use super::*;
use crate::git::{Author, FileChange};

fn change(path: &str, kind: ChangeKind, old: Option<&str>) -> FileChange {
    FileChange {
        path: PathBuf::from(path),
        old_path: old.map(PathBuf::from),
        added: 1,
        removed: 0,
        kind,
    }
}

fn commit(id: &str, changes: Vec<FileChange>) -> Commit {
    Commit {
        id: id.to_string(),
        author: Author::new("Alice", "alice@x.com"),
        time: 0,
        parents: vec![],
        changes,
    }
}

fn paths(c: &Commit) -> Vec<&str> {
    c.changes
        .iter()
        .map(|ch| ch.path.to_str().unwrap())
        .collect()
}

#[test]
fn single_rename_rewrites_history() {
    let mut history = vec![
        commit("1", vec![change("a.rs", ChangeKind::Added, None)]),
        commit("2", vec![change("a.rs", ChangeKind::Modified, None)]),
        commit("3", vec![change("b.rs", ChangeKind::Renamed, Some("a.rs"))]),
    ];
    track_renames(&mut history);
    assert_eq!(paths(&history[0]), vec!["b.rs"]);
    assert_eq!(paths(&history[1]), vec!["b.rs"]);
    assert_eq!(paths(&history[2]), vec!["b.rs"]);
}

#[test]
fn rename_chain_resolves_to_final_name() {
    let mut history = vec![
        commit("1", vec![change("a.rs", ChangeKind::Added, None)]),
        commit("2", vec![change("b.rs", ChangeKind::Renamed, Some("a.rs"))]),
        commit("3", vec![change("c.rs", ChangeKind::Renamed, Some("b.rs"))]),
    ];
    track_renames(&mut history);
    for c in &history {
        assert_eq!(paths(c), vec!["c.rs"]);
    }
}

#[test]
fn recreated_path_keeps_own_identity() {
    let mut history = vec![
        commit("1", vec![change("a.rs", ChangeKind::Added, None)]),
        commit("2", vec![change("b.rs", ChangeKind::Renamed, Some("a.rs"))]),
        commit("3", vec![change("a.rs", ChangeKind::Added, None)]),
    ];
    track_renames(&mut history);
    assert_eq!(paths(&history[0]), vec!["b.rs"]);
    assert_eq!(paths(&history[2]), vec!["a.rs"]);
}

#[test]
fn move_and_recreate_in_same_commit() {
    let mut history = vec![
        commit("1", vec![change("a.rs", ChangeKind::Added, None)]),
        commit(
            "2",
            vec![
                change("a.rs", ChangeKind::Added, None),
                change("b.rs", ChangeKind::Renamed, Some("a.rs")),
            ],
        ),
    ];
    track_renames(&mut history);
    assert_eq!(paths(&history[0]), vec!["b.rs"]);
    assert_eq!(paths(&history[1]), vec!["a.rs", "b.rs"]);
}

#[test]
fn old_path_is_preserved() {
    let mut history = vec![commit(
        "1",
        vec![change("b.rs", ChangeKind::Renamed, Some("a.rs"))],
    )];
    track_renames(&mut history);
    assert_eq!(
        history[0].changes[0].old_path.as_deref(),
        Some(std::path::Path::new("a.rs"))
    );
}

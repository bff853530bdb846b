//! Git fixtures shared by unit tests: real repositories in temp dirs,
//! with explicit authors and timestamps on every commit.

use std::fs;
use std::path::Path;

use git2::{Oid, Repository, Signature, Time};

pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

fn signature(who: &str, epoch: i64) -> Signature<'static> {
    let email = format!("{}@test.com", who.to_lowercase());
    Signature::new(who, &email, &Time::new(epoch, 0)).unwrap()
}

/// `n` distinct lines, handy for exact line-count assertions.
pub fn lines(prefix: &str, n: usize) -> String {
    (0..n).map(|i| format!("{prefix} {i}\n")).collect()
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test").unwrap();
        config.set_str("user.email", "test@test.com").unwrap();
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `files` into the work tree and commit them on HEAD.
    pub fn commit(&self, who: &str, epoch: i64, files: &[(&str, &str)], message: &str) -> Oid {
        let mut index = self.repo.index().unwrap();
        for (path, content) in files {
            let full_path = self.path().join(path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full_path, content).unwrap();
            index.add_path(Path::new(path)).unwrap();
        }
        self.commit_index(&mut index, who, epoch, message)
    }

    pub fn remove(&self, who: &str, epoch: i64, paths: &[&str], message: &str) -> Oid {
        let mut index = self.repo.index().unwrap();
        for path in paths {
            fs::remove_file(self.path().join(path)).unwrap();
            index.remove_path(Path::new(path)).unwrap();
        }
        self.commit_index(&mut index, who, epoch, message)
    }

    pub fn rename(&self, who: &str, epoch: i64, from: &str, to: &str, message: &str) -> Oid {
        let mut index = self.repo.index().unwrap();
        let target = self.path().join(to);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::rename(self.path().join(from), &target).unwrap();
        index.remove_path(Path::new(from)).unwrap();
        index.add_path(Path::new(to)).unwrap();
        self.commit_index(&mut index, who, epoch, message)
    }

    /// Commit a flat tree built from `files` with explicit parents,
    /// optionally moving `update_ref`. Used to shape merge histories.
    pub fn commit_tree(
        &self,
        update_ref: Option<&str>,
        who: &str,
        epoch: i64,
        files: &[(&str, &str)],
        parents: &[Oid],
        message: &str,
    ) -> Oid {
        let mut builder = self.repo.treebuilder(None).unwrap();
        for (path, content) in files {
            let blob = self.repo.blob(content.as_bytes()).unwrap();
            builder.insert(path, blob, 0o100644).unwrap();
        }
        let tree = self.repo.find_tree(builder.write().unwrap()).unwrap();
        let parents: Vec<git2::Commit> = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).unwrap())
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        let sig = signature(who, epoch);
        self.repo
            .commit(update_ref, &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    fn commit_index(&self, index: &mut git2::Index, who: &str, epoch: i64, message: &str) -> Oid {
        index.write().unwrap();
        let tree_oid = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_oid).unwrap();

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let sig = signature(who, epoch);
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }
}

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::authorship::PotentialAuthorship;
use crate::knowledge::DeveloperKnowledge;
use crate::ownership::Ownership;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cell {
    /// Commits by the user touching the file.
    pub commits: usize,
    pub weight: u64,
    /// Knowledge share of the file, in `[0, 1]`.
    pub knowledge: f64,
    /// Potential-authorship estimate; zero for direct contributors.
    pub potential: f64,
}

impl Cell {
    pub fn is_direct(&self) -> bool {
        self.commits > 0
    }

    /// Knowledge share for direct contributors, potential otherwise.
    pub fn score(&self) -> f64 {
        if self.is_direct() {
            self.knowledge
        } else {
            self.potential
        }
    }
}

#[derive(Debug, Default)]
pub struct AssignmentMatrix {
    /// Author keys; the position is the user id.
    pub users: Vec<String>,
    /// Paths; the position is the file id.
    pub files: Vec<PathBuf>,
    /// user id -> file id -> cell. Only non-empty cells are stored.
    pub cells: BTreeMap<usize, BTreeMap<usize, Cell>>,
}

impl AssignmentMatrix {
    pub fn user_id(&self, author: &str) -> Option<usize> {
        self.users.binary_search_by(|u| u.as_str().cmp(author)).ok()
    }

    pub fn file_id(&self, path: &Path) -> Option<usize> {
        self.files.binary_search_by(|f| f.as_path().cmp(path)).ok()
    }

    pub fn cell(&self, author: &str, path: &Path) -> Option<&Cell> {
        let user = self.user_id(author)?;
        let file = self.file_id(path)?;
        self.cells.get(&user)?.get(&file)
    }

    /// Cells of one user, keyed by file id.
    pub fn row(&self, user: usize) -> impl Iterator<Item = (usize, &Cell)> {
        self.cells
            .get(&user)
            .into_iter()
            .flat_map(|row| row.iter().map(|(f, c)| (*f, c)))
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

pub fn build(
    ownership: &Ownership,
    knowledge: &DeveloperKnowledge,
    potential: &PotentialAuthorship,
) -> AssignmentMatrix {
    let mut users: BTreeSet<&str> = BTreeSet::new();
    for f in ownership.files.values() {
        users.extend(f.owners.iter().map(|o| o.author.as_str()));
    }
    for estimates in potential.by_file.values() {
        users.extend(estimates.keys().map(String::as_str));
    }

    let mut matrix = AssignmentMatrix {
        users: users.into_iter().map(str::to_string).collect(),
        files: ownership.files.keys().cloned().collect(),
        cells: BTreeMap::new(),
    };

    for (file_id, path) in matrix.files.iter().enumerate() {
        if let Some(f) = ownership.get(path) {
            for o in &f.owners {
                let Some(user_id) = matrix.user_id(&o.author) else {
                    continue;
                };
                matrix.cells.entry(user_id).or_default().insert(
                    file_id,
                    Cell {
                        commits: o.commits,
                        weight: o.weight,
                        knowledge: knowledge.share(&o.author, path),
                        potential: 0.0,
                    },
                );
            }
        }
        if let Some(estimates) = potential.by_file.get(path) {
            for (author, estimate) in estimates {
                let Some(user_id) = matrix.user_id(author) else {
                    continue;
                };
                matrix
                    .cells
                    .entry(user_id)
                    .or_default()
                    .entry(file_id)
                    .or_default()
                    .potential = *estimate;
            }
        }
    }

    matrix
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;

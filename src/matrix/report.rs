use std::collections::BTreeMap;

use serde::Serialize;

use super::analyzer::{AssignmentMatrix, Cell};
use crate::report_helpers;
use crate::util::round6;

pub fn print_report(matrix: &AssignmentMatrix, authors: &BTreeMap<String, String>, top: usize) {
    if matrix.is_empty() {
        println!("No assignments found.");
        return;
    }

    let mut rows: Vec<(&str, String, &Cell)> = Vec::with_capacity(matrix.len());
    for (user, row) in &matrix.cells {
        let key = matrix.users[*user].as_str();
        let name = authors.get(key).map(String::as_str).unwrap_or(key);
        for (file, cell) in row {
            rows.push((name, matrix.files[*file].display().to_string(), cell));
        }
    }
    rows.sort_by(|a, b| {
        b.2.score()
            .total_cmp(&a.2.score())
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.0.cmp(b.0))
    });
    let shown = report_helpers::limit(&rows, top);

    let name_width = report_helpers::max_text_width(shown.iter().map(|r| r.0), 4);
    let path_width = report_helpers::max_text_width(shown.iter().map(|r| r.1.as_str()), 4);
    let separator = report_helpers::separator((name_width + path_width + 42).max(78));

    println!(
        "Assignment Matrix — {} users x {} files",
        matrix.users.len(),
        matrix.files.len()
    );
    println!("{separator}");
    println!(
        " {}  {}  {:>7}  {:>9}  {:>9}  {:>6}",
        report_helpers::pad("User", name_width),
        report_helpers::pad("File", path_width),
        "Commits",
        "Knowledge",
        "Potential",
        "Score",
    );
    println!("{separator}");
    for (name, path, cell) in shown {
        println!(
            " {}  {}  {:>7}  {:>9.3}  {:>9.3}  {:>6.3}",
            report_helpers::pad(name, name_width),
            report_helpers::pad(path, path_width),
            cell.commits,
            cell.knowledge,
            cell.potential,
            cell.score(),
        );
    }
    println!("{separator}");
    if rows.len() > shown.len() {
        println!();
        println!("{} cells ({} shown).", rows.len(), shown.len());
    }
}

#[derive(Serialize)]
pub struct CellEntry {
    pub commits: usize,
    pub weight: u64,
    pub knowledge: f64,
    pub potential: f64,
    pub score: f64,
}

impl From<&Cell> for CellEntry {
    fn from(cell: &Cell) -> Self {
        Self {
            commits: cell.commits,
            weight: cell.weight,
            knowledge: round6(cell.knowledge),
            potential: round6(cell.potential),
            score: round6(cell.score()),
        }
    }
}

#[derive(Serialize)]
pub struct MatrixDocument {
    pub users: usize,
    pub files: usize,
    /// user id -> file id -> cell
    pub matrix: BTreeMap<String, BTreeMap<String, CellEntry>>,
}

/// `idToUser.json` payload.
#[derive(Serialize)]
pub struct UserIdsDocument {
    pub users: BTreeMap<String, UserEntry>,
}

#[derive(Serialize)]
pub struct UserEntry {
    pub email: String,
    pub name: String,
}

/// `idToFile.json` payload.
#[derive(Serialize)]
pub struct FileIdsDocument {
    pub files: BTreeMap<String, String>,
}

pub fn document(matrix: &AssignmentMatrix) -> MatrixDocument {
    let cells = matrix
        .cells
        .iter()
        .map(|(user, row)| {
            let row = row
                .iter()
                .map(|(file, cell)| (file.to_string(), CellEntry::from(cell)))
                .collect();
            (user.to_string(), row)
        })
        .collect();
    MatrixDocument {
        users: matrix.users.len(),
        files: matrix.files.len(),
        matrix: cells,
    }
}

pub fn user_ids(matrix: &AssignmentMatrix, authors: &BTreeMap<String, String>) -> UserIdsDocument {
    let users = matrix
        .users
        .iter()
        .enumerate()
        .map(|(id, key)| {
            let entry = UserEntry {
                email: key.clone(),
                name: authors.get(key).cloned().unwrap_or_else(|| key.clone()),
            };
            (id.to_string(), entry)
        })
        .collect();
    UserIdsDocument { users }
}

pub fn file_ids(matrix: &AssignmentMatrix) -> FileIdsDocument {
    let files = matrix
        .files
        .iter()
        .enumerate()
        .map(|(id, path)| (id.to_string(), path.display().to_string()))
        .collect();
    FileIdsDocument { files }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::matrix::AssignmentMatrix;

const CORE_MODIFICATIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Coder,
    Reviewer,
    Unclassified,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Coder => "coder",
            Role::Reviewer => "reviewer",
            Role::Unclassified => "unclassified",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContributorStats {
    pub user_id: usize,
    pub email: String,
    pub login: String,
    /// Files with at least one modification.
    pub files_count: usize,
    pub total_modifications: usize,
    /// Rounded to 2 decimals.
    pub avg_modifications_per_file: f64,
    /// Modifications per lower-cased extension (`no_ext` when absent).
    pub file_types: BTreeMap<String, usize>,
    pub role: Role,
    pub role_confidence: f64,
    pub is_core: bool,
}

/// Suggest a role from activity volume and depth.
///
/// Broad, heavy activity is coding when each file gets more than five
/// modifications on average and reviewing otherwise; medium activity is
/// coding; light activity is reviewing.
pub fn suggest_role(total: usize, files: usize, avg: f64) -> (Role, f64) {
    if total >= 100 && files >= 10 {
        if avg > 5.0 {
            (Role::Coder, 0.8)
        } else {
            (Role::Reviewer, 0.7)
        }
    } else if total >= 50 {
        (Role::Coder, 0.6)
    } else if total >= 10 {
        (Role::Reviewer, 0.5)
    } else {
        (Role::Unclassified, 0.3)
    }
}

/// Login part of an e-mail address. GitHub noreply addresses
/// (`12345+login@users.noreply.github.com`) yield the login.
pub fn login_from_email(email: &str) -> String {
    let Some((local, domain)) = email.split_once('@') else {
        return email.to_string();
    };
    if domain.ends_with("users.noreply.github.com")
        && let Some((_, login)) = local.split_once('+')
    {
        return login.to_string();
    }
    local.to_string()
}

pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "no_ext".to_string())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Statistics for every user in the matrix, in user id order.
/// Users with only potential cells get zero counts.
pub fn analyze(matrix: &AssignmentMatrix) -> Vec<ContributorStats> {
    matrix
        .users
        .iter()
        .enumerate()
        .map(|(user_id, email)| {
            let mut files_count = 0;
            let mut total = 0;
            let mut file_types: BTreeMap<String, usize> = BTreeMap::new();
            for (file_id, cell) in matrix.row(user_id).filter(|(_, c)| c.is_direct()) {
                files_count += 1;
                total += cell.commits;
                *file_types
                    .entry(extension_of(&matrix.files[file_id]))
                    .or_insert(0) += cell.commits;
            }
            let avg = if files_count > 0 {
                round2(total as f64 / files_count as f64)
            } else {
                0.0
            };
            let (role, role_confidence) = suggest_role(total, files_count, avg);
            ContributorStats {
                user_id,
                email: email.clone(),
                login: login_from_email(email),
                files_count,
                total_modifications: total,
                avg_modifications_per_file: avg,
                file_types,
                role,
                role_confidence,
                is_core: total >= CORE_MODIFICATIONS,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;

use std::collections::BTreeMap;

use serde::Serialize;

use super::analyzer::{FileOwnership, Ownership};
use crate::report_helpers;
use crate::util::round6;

pub fn print_report(ownership: &Ownership, authors: &BTreeMap<String, String>, top: usize) {
    if ownership.is_empty() {
        println!("No files found for ownership analysis.");
        return;
    }

    let mut files: Vec<&FileOwnership> = ownership.files.values().collect();
    files.sort_by(|a, b| {
        a.risk
            .sort_key()
            .cmp(&b.risk.sort_key())
            .then_with(|| b.total_weight.cmp(&a.total_weight))
            .then_with(|| a.path.cmp(&b.path))
    });
    let shown = report_helpers::limit(&files, top);

    let name_of = |f: &FileOwnership| -> String {
        f.primary()
            .map(|o| authors.get(&o.author).unwrap_or(&o.author).clone())
            .unwrap_or_else(|| "unknown".to_string())
    };
    let owners: Vec<String> = shown.iter().map(|f| name_of(*f)).collect();

    let max_path_len = report_helpers::max_path_width(shown.iter().map(|f| f.path.as_path()), 4);
    let max_owner_len = report_helpers::max_text_width(owners.iter().map(String::as_str), 5);
    let header_width = max_path_len + max_owner_len + 36;
    let separator = report_helpers::separator(header_width.max(78));

    println!("Files Ownership — Accumulated Line Contributions");
    println!("{separator}");
    println!(
        " {:<pw$}  {:>8}  {}  {:>5} {:>7} {:>8}",
        "File",
        "Weight",
        report_helpers::pad("Owner", max_owner_len),
        "Own%",
        "Authors",
        "Risk",
        pw = max_path_len,
    );
    println!("{separator}");

    for (f, owner) in shown.iter().zip(&owners) {
        println!(
            " {:<pw$}  {:>8}  {}  {:>4.0}% {:>7} {:>8}",
            f.path.display(),
            f.total_weight,
            report_helpers::pad(owner, max_owner_len),
            f.ownership_pct(),
            f.owners.len(),
            f.risk.label(),
            pw = max_path_len,
        );
    }

    println!("{separator}");
    if files.len() > shown.len() {
        println!();
        println!(
            "{total} files analyzed ({shown} shown).",
            total = files.len(),
            shown = shown.len()
        );
    }
}

#[derive(Serialize)]
pub struct OwnershipDocument {
    pub authors: BTreeMap<String, String>,
    pub files: BTreeMap<String, FileEntry>,
}

#[derive(Serialize)]
pub struct FileEntry {
    pub total_weight: u64,
    pub risk: &'static str,
    pub owners: Vec<OwnerEntry>,
}

#[derive(Serialize)]
pub struct OwnerEntry {
    pub author: String,
    pub weight: u64,
    pub share: f64,
    pub commits: usize,
    pub first_contribution: i64,
    pub last_contribution: i64,
}

pub fn document(ownership: &Ownership, authors: &BTreeMap<String, String>) -> OwnershipDocument {
    let files = ownership
        .files
        .values()
        .map(|f| {
            let owners = f
                .owners
                .iter()
                .map(|o| OwnerEntry {
                    author: o.author.clone(),
                    weight: o.weight,
                    share: if f.total_weight > 0 {
                        round6(o.weight as f64 / f.total_weight as f64)
                    } else {
                        0.0
                    },
                    commits: o.commits,
                    first_contribution: o.first_contribution,
                    last_contribution: o.last_contribution,
                })
                .collect();
            (
                f.path.display().to_string(),
                FileEntry {
                    total_weight: f.total_weight,
                    risk: f.risk.label(),
                    owners,
                },
            )
        })
        .collect();

    OwnershipDocument {
        authors: authors.clone(),
        files,
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;

use std::collections::BTreeMap;

use serde::Serialize;

use super::analyzer::{ContributorStats, Role};
use crate::report_helpers;

pub fn print_report(stats: &[ContributorStats], authors: &BTreeMap<String, String>, top: usize) {
    let mut rows: Vec<&ContributorStats> = stats.iter().filter(|s| s.files_count > 0).collect();
    if rows.is_empty() {
        println!("No contributors found.");
        return;
    }
    rows.sort_by(|a, b| {
        b.total_modifications
            .cmp(&a.total_modifications)
            .then_with(|| a.email.cmp(&b.email))
    });
    let shown = report_helpers::limit(&rows, top);

    let names: Vec<&str> = shown
        .iter()
        .map(|s| authors.get(&s.email).map(String::as_str).unwrap_or(&s.email))
        .collect();
    let name_width = report_helpers::max_text_width(names.iter().copied(), 11);
    let separator = report_helpers::separator((name_width + 52).max(78));

    println!("Contributors — Activity and Suggested Roles");
    println!("{separator}");
    println!(
        " {}  {:>6}  {:>6}  {:>6}  {:<12}  {:>4}  {}",
        report_helpers::pad("Contributor", name_width),
        "Files",
        "Mods",
        "Avg",
        "Role",
        "Conf",
        "Core",
    );
    println!("{separator}");
    for (s, name) in shown.iter().zip(&names) {
        println!(
            " {}  {:>6}  {:>6}  {:>6.2}  {:<12}  {:>4.1}  {}",
            report_helpers::pad(name, name_width),
            s.files_count,
            s.total_modifications,
            s.avg_modifications_per_file,
            s.role.label(),
            s.role_confidence,
            if s.is_core { "yes" } else { "" },
        );
    }
    println!("{separator}");
}

#[derive(Serialize)]
pub struct ContributorsDocument {
    /// user id -> statistics
    pub contributors: BTreeMap<String, ContributorEntry>,
}

#[derive(Serialize)]
pub struct ContributorEntry {
    pub email: String,
    pub name: String,
    pub login: String,
    pub files_count: usize,
    pub total_modifications: usize,
    pub avg_modifications_per_file: f64,
    pub file_types: BTreeMap<String, usize>,
    pub role: Role,
    pub role_confidence: f64,
    pub is_core: bool,
}

pub fn document(stats: &[ContributorStats], authors: &BTreeMap<String, String>) -> ContributorsDocument {
    let contributors = stats
        .iter()
        .map(|s| {
            let entry = ContributorEntry {
                email: s.email.clone(),
                name: authors.get(&s.email).cloned().unwrap_or_else(|| s.email.clone()),
                login: s.login.clone(),
                files_count: s.files_count,
                total_modifications: s.total_modifications,
                avg_modifications_per_file: s.avg_modifications_per_file,
                file_types: s.file_types.clone(),
                role: s.role,
                role_confidence: s.role_confidence,
                is_core: s.is_core,
            };
            (s.user_id.to_string(), entry)
        })
        .collect();
    ContributorsDocument { contributors }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;

use std::collections::BTreeMap;

use serde::Serialize;

use super::analyzer::PotentialAuthorship;
use crate::report_helpers;
use crate::util::round6;

struct Row<'a> {
    path: String,
    candidate: &'a str,
    estimate: f64,
    others: usize,
}

pub fn print_report(potential: &PotentialAuthorship, authors: &BTreeMap<String, String>, top: usize) {
    if potential.is_empty() {
        println!("No potential authors found (no related files with known authors).");
        return;
    }

    let mut rows: Vec<Row> = potential
        .by_file
        .iter()
        .filter_map(|(path, estimates)| {
            let (author, estimate) = estimates
                .iter()
                .max_by(|a, b| a.1.total_cmp(b.1).then_with(|| b.0.cmp(a.0)))?;
            Some(Row {
                path: path.display().to_string(),
                candidate: authors.get(author).map(String::as_str).unwrap_or(author),
                estimate: *estimate,
                others: estimates.len() - 1,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.estimate.total_cmp(&a.estimate).then_with(|| a.path.cmp(&b.path)));
    let shown = report_helpers::limit(&rows, top);

    let path_width = report_helpers::max_text_width(shown.iter().map(|r| r.path.as_str()), 4);
    let name_width = report_helpers::max_text_width(shown.iter().map(|r| r.candidate), 9);
    let separator = report_helpers::separator((path_width + name_width + 22).max(78));

    println!("Potential Authorship — Best Candidate Per File");
    println!("{separator}");
    println!(
        " {}  {}  {:>8}  {:>6}",
        report_helpers::pad("File", path_width),
        report_helpers::pad("Candidate", name_width),
        "Estimate",
        "Others",
    );
    println!("{separator}");
    for r in shown {
        println!(
            " {}  {}  {:>8.3}  {:>6}",
            report_helpers::pad(&r.path, path_width),
            report_helpers::pad(r.candidate, name_width),
            r.estimate,
            r.others,
        );
    }
    println!("{separator}");
    println!();
    println!(
        "{} estimates over {} files.",
        potential.len(),
        potential.by_file.len()
    );
}

#[derive(Serialize)]
pub struct PotentialDocument {
    pub authors: BTreeMap<String, String>,
    /// author -> file -> estimate in (0, 1]
    pub potential: BTreeMap<String, BTreeMap<String, f64>>,
}

pub fn document(potential: &PotentialAuthorship, authors: &BTreeMap<String, String>) -> PotentialDocument {
    let mut per_author: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for (path, estimates) in &potential.by_file {
        for (author, estimate) in estimates {
            per_author
                .entry(author.clone())
                .or_default()
                .insert(path.display().to_string(), round6(*estimate));
        }
    }
    PotentialDocument {
        authors: authors.clone(),
        potential: per_author,
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;

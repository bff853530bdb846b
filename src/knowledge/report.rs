use std::collections::BTreeMap;

use serde::Serialize;

use super::analyzer::DeveloperKnowledge;
use crate::report_helpers;
use crate::util::{format_timestamp, round6};

struct AuthorRow<'a> {
    name: &'a str,
    files: usize,
    total: f64,
    top_module: String,
}

pub fn print_report(knowledge: &DeveloperKnowledge, authors: &BTreeMap<String, String>, top: usize) {
    if knowledge.is_empty() {
        println!("No contributions found for knowledge analysis.");
        return;
    }

    let modules = knowledge.modules();
    let mut rows: Vec<AuthorRow> = knowledge
        .by_author()
        .into_iter()
        .map(|(author, files)| {
            let top_module = modules
                .get(author)
                .and_then(|m| {
                    m.iter()
                        .max_by(|a, b| a.1.total_cmp(b.1).then_with(|| b.0.cmp(a.0)))
                })
                .map(|(module, _)| module.clone())
                .unwrap_or_default();
            AuthorRow {
                name: authors.get(author).map(String::as_str).unwrap_or(author),
                files: files.len(),
                total: files.values().sum(),
                top_module,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.name.cmp(b.name)));
    let shown = report_helpers::limit(&rows, top);

    let name_width = report_helpers::max_text_width(shown.iter().map(|r| r.name), 6);
    let module_width = report_helpers::max_text_width(shown.iter().map(|r| r.top_module.as_str()), 10);
    let separator = report_helpers::separator((name_width + module_width + 26).max(78));

    println!(
        "Developer Knowledge — evaluated at {}",
        format_timestamp(knowledge.evaluated_at)
    );
    println!("{separator}");
    println!(
        " {}  {:>6}  {:>12}  {}",
        report_helpers::pad("Author", name_width),
        "Files",
        "Knowledge",
        "Top module",
    );
    println!("{separator}");
    for r in shown {
        println!(
            " {}  {:>6}  {:>12.2}  {}",
            report_helpers::pad(r.name, name_width),
            r.files,
            r.total,
            r.top_module,
        );
    }
    println!("{separator}");
}

#[derive(Serialize)]
pub struct KnowledgeDocument {
    pub half_life_days: f64,
    pub authors: BTreeMap<String, String>,
    /// author -> file -> score
    pub knowledge: BTreeMap<String, BTreeMap<String, KnowledgeEntry>>,
    /// author -> module -> summed score
    pub modules: BTreeMap<String, BTreeMap<String, f64>>,
}

#[derive(Serialize)]
pub struct KnowledgeEntry {
    pub score: f64,
    pub share: f64,
}

pub fn document(
    knowledge: &DeveloperKnowledge,
    authors: &BTreeMap<String, String>,
    half_life_days: f64,
) -> KnowledgeDocument {
    let mut per_author: BTreeMap<String, BTreeMap<String, KnowledgeEntry>> = BTreeMap::new();
    for (path, scores) in &knowledge.by_file {
        let total: f64 = scores.values().sum();
        for (author, score) in scores.iter().filter(|(_, s)| **s > 0.0) {
            per_author.entry(author.clone()).or_default().insert(
                path.display().to_string(),
                KnowledgeEntry {
                    score: round6(*score),
                    share: round6(score / total),
                },
            );
        }
    }

    let modules = knowledge
        .modules()
        .into_iter()
        .filter(|(author, _)| per_author.contains_key(*author))
        .map(|(author, m)| {
            let m = m
                .into_iter()
                .filter(|(_, s)| *s > 0.0)
                .map(|(module, s)| (module, round6(s)))
                .collect();
            (author.to_string(), m)
        })
        .collect();

    KnowledgeDocument {
        half_life_days,
        authors: authors.clone(),
        knowledge: per_author,
        modules,
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;

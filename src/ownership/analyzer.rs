use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::history::Contribution;

/// Bus-factor risk derived from how concentrated a file's weight is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "CRITICAL",
            RiskLevel::High => "HIGH",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::Low => "LOW",
        }
    }

    pub fn sort_key(&self) -> u8 {
        match self {
            RiskLevel::Critical => 0,
            RiskLevel::High => 1,
            RiskLevel::Medium => 2,
            RiskLevel::Low => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OwnerShare {
    pub author: String,
    pub weight: u64,
    pub commits: usize,
    pub first_contribution: i64,
    pub last_contribution: i64,
}

#[derive(Debug, Clone)]
pub struct FileOwnership {
    pub path: PathBuf,
    /// Ranked: weight desc, then earliest first contribution, then author.
    pub owners: Vec<OwnerShare>,
    pub total_weight: u64,
    pub risk: RiskLevel,
}

impl FileOwnership {
    pub fn primary(&self) -> Option<&OwnerShare> {
        self.owners.first()
    }

    /// Primary owner's share of the file's weight, in percent.
    pub fn ownership_pct(&self) -> f64 {
        match self.primary() {
            Some(p) if self.total_weight > 0 => p.weight as f64 / self.total_weight as f64 * 100.0,
            _ => 0.0,
        }
    }
}

/// Per-file ownership for one analysis run.
#[derive(Debug, Default)]
pub struct Ownership {
    pub files: BTreeMap<PathBuf, FileOwnership>,
}

impl Ownership {
    pub fn get(&self, path: &Path) -> Option<&FileOwnership> {
        self.files.get(path)
    }

    /// Whether `author` ever contributed to `path` directly.
    pub fn is_direct(&self, author: &str, path: &Path) -> bool {
        self.files
            .get(path)
            .is_some_and(|f| f.owners.iter().any(|o| o.author == author))
    }

    pub fn total_weight(&self) -> u64 {
        self.files.values().map(|f| f.total_weight).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Fold contributions into per-file, per-author totals.
///
/// Entries are never removed: a deleted file that is later re-added at
/// the same path continues its earlier ownership.
pub fn accumulate(contributions: &[Contribution]) -> Ownership {
    let mut per_file: BTreeMap<&Path, HashMap<&str, OwnerShare>> = BTreeMap::new();

    for c in contributions {
        per_file
            .entry(c.path.as_path())
            .or_default()
            .entry(c.author.as_str())
            .and_modify(|o| {
                o.weight += c.weight;
                o.commits += 1;
                o.first_contribution = o.first_contribution.min(c.time);
                o.last_contribution = o.last_contribution.max(c.time);
            })
            .or_insert_with(|| OwnerShare {
                author: c.author.clone(),
                weight: c.weight,
                commits: 1,
                first_contribution: c.time,
                last_contribution: c.time,
            });
    }

    let files = per_file
        .into_iter()
        .map(|(path, owners)| {
            let mut owners: Vec<OwnerShare> = owners.into_values().collect();
            rank(&mut owners);
            let total_weight = owners.iter().map(|o| o.weight).sum();
            let risk = classify_risk(&owners, total_weight);
            let path = path.to_path_buf();
            (
                path.clone(),
                FileOwnership {
                    path,
                    owners,
                    total_weight,
                    risk,
                },
            )
        })
        .collect();

    Ownership { files }
}

fn rank(owners: &mut [OwnerShare]) {
    owners.sort_by(|a, b| {
        b.weight
            .cmp(&a.weight)
            .then_with(|| a.first_contribution.cmp(&b.first_contribution))
            .then_with(|| a.author.cmp(&b.author))
    });
}

fn classify_risk(owners: &[OwnerShare], total_weight: u64) -> RiskLevel {
    if owners.is_empty() || total_weight == 0 {
        return RiskLevel::Low;
    }

    let pct = |o: &OwnerShare| o.weight as f64 / total_weight as f64 * 100.0;
    let top_pct = pct(&owners[0]);

    if top_pct >= 80.0 {
        return RiskLevel::Critical;
    }
    if top_pct >= 60.0 {
        return RiskLevel::High;
    }

    // Check if top 2-3 contributors combine for >80%
    let top_combined: f64 = owners.iter().take(3).map(pct).sum();
    if owners.len() <= 3 && top_combined >= 80.0 {
        return RiskLevel::Medium;
    }

    RiskLevel::Low
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;

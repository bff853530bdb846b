//! Long help text constants for CLI subcommands.
//!
//! Kept apart from `cli.rs` so the argument definitions stay readable.

/// Files ownership: accumulated line contributions per file and author.
pub const OWNERSHIP: &str = "\
Attribute every file's history to the authors who wrote it.

Each commit adds the author's line delta to a running total per file:
  weight = lines added + lines removed   (weight = \"churn\", default)
  weight = lines added                   (weight = \"added\" in lineage.toml)

Deleting a file never resets its totals. Renames are followed, so work
done under an older name counts for the current path. Merge commits are
skipped unless --first-parent is given.

Risk levels (bus factor):
  CRITICAL  -- one author holds >= 80% of the weight
  HIGH      -- one author holds 60-80%
  MEDIUM    -- two or three authors together hold >= 80%
  LOW       -- well distributed

Writes FilesOwnership.json with --output-dir or --files-ownership.";

/// Developer knowledge: exponentially decayed contributions.
pub const KNOWLEDGE: &str = "\
Score how much each author still knows about each file.

A contribution of weight w made at time t is worth
  w * 2^(-(T - t) / half_life)
at the evaluation instant T. T is --until when given, otherwise the time
of the newest commit analyzed, so reruns give identical scores.

--half-life sets the half-life in days (default: 180).

Writes DeveloperKnowledge.json with --output-dir or --developer-knowledge.";

/// Potential authorship: knowledge transferred from related files.
pub const AUTHORSHIP: &str = "\
Estimate who could work on a file they never touched.

Two files are related when they change in the same commits or live in
the same directory:
  rel(f, g) = co_change_weight * shared(f, g) / min(commits_f, commits_g)
            + directory_weight * [same directory]

An author's estimate for f is the relatedness-weighted mean of their
knowledge share over f's related files. Direct contributors to f are
never listed. Commits touching more than max_commit_files files are
ignored for co-change.

Writes PotentialAuthorship.json with --output-dir or --potential-ownership.";

/// Assignment matrix and id maps.
pub const MATRIX: &str = "\
Build the user x file assignment matrix.

Users and files get dense numeric ids in sorted order of e-mail and path.
Each cell holds the commit count, line weight, knowledge share and
potential estimate; its score is the knowledge share for direct
contributors and the potential estimate otherwise.

Writes AssignmentMatrix.json, idToUser.json and idToFile.json with
--output-dir (or the matrix alone with --assignment-matrix).";

/// Contributor statistics and suggested roles.
pub const CONTRIBUTORS: &str = "\
Summarize each contributor's activity and suggest a functional role.

  files      -- files with at least one modification
  mods       -- total modifications (commits per file, summed)
  avg        -- mods / files

Roles:
  coder (0.8)        -- mods >= 100, files >= 10, avg > 5
  reviewer (0.7)     -- mods >= 100, files >= 10, avg <= 5
  coder (0.6)        -- mods >= 50
  reviewer (0.5)     -- mods >= 10
  unclassified (0.3) -- otherwise

Contributors with 100 or more modifications are core contributors.
Writes Contributors.json with --output-dir.";

pub const BATCH: &str = "\
Mine several repositories in parallel.

Each repository is written to <output-dir>/<repository name>. A
repository that fails is reported and skipped; the exit code is the
highest failure code among all repositories.";

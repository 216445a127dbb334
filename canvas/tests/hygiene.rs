//! Hygiene: source-level budgets for the canvas crate.
//!
//! Drop handling must never crash the host or swallow an error, so panicking
//! and discarding constructs are banned from production sources. Test
//! sidecars (`*_test.rs`) are exempt. Budgets only ever go down.

use std::fs;
use std::path::{Path, PathBuf};

/// `(pattern, budget, why it is banned)`.
const BUDGETS: &[(&str, usize, &str)] = &[
    (".unwrap()", 0, "panics on None/Err"),
    (".expect(", 0, "panics on None/Err"),
    ("panic!(", 0, "crashes the host"),
    ("unreachable!(", 0, "crashes the host"),
    ("todo!(", 0, "unfinished code"),
    ("unimplemented!(", 0, "unfinished code"),
    ("let _ =", 0, "discards a result unseen"),
    (".ok()", 0, "discards an error unseen"),
    ("println!(", 0, "bypasses tracing"),
    ("#[allow(dead_code)]", 0, "hides unused code"),
];

fn production_sources(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            production_sources(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs")
            && !path.to_string_lossy().ends_with("_test.rs")
        {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push((path, content));
            }
        }
    }
}

#[test]
fn sources_stay_within_budgets() {
    let mut files = Vec::new();
    production_sources(Path::new("src"), &mut files);
    assert!(!files.is_empty(), "no sources found; run from the crate root");

    let mut report = Vec::new();
    for (pattern, budget, why) in BUDGETS {
        let hits: Vec<String> = files
            .iter()
            .filter_map(|(path, content)| {
                let count = content.lines().filter(|line| line.contains(pattern)).count();
                (count > 0).then(|| format!("    {}: {count}", path.display()))
            })
            .collect();
        let total: usize = files
            .iter()
            .map(|(_, content)| content.lines().filter(|line| line.contains(pattern)).count())
            .sum();
        if total > *budget {
            report.push(format!("`{pattern}` ({why}): found {total}, max {budget}\n{}", hits.join("\n")));
        }
    }
    assert!(report.is_empty(), "hygiene budgets exceeded:\n{}", report.join("\n"));
}

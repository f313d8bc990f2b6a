//! Combination Generator & Filter Module
//!
//! The core of the tool: lazy enumeration of genome combinations over the
//! flattened inventory list, plus the provenance filter that keeps only
//! combinations mixing genomes from distinct source directories.
//!
//! # Enumeration Order
//! Combinations of a given size are produced in lexicographic-by-position
//! order over the input list. `all` mode concatenates the size-1 stream,
//! then size-2, up to the full list size. The order is deterministic for a
//! fixed input list and defines ID assignment downstream.
//!
//! # Design Limit
//! `all` mode walks the power set (2^n - 1 combinations) and is impractical
//! beyond a few dozen genomes. This is a domain constraint of exhaustive
//! community enumeration, not an optimization target; a warning is logged
//! past [`ALL_MODE_FEASIBLE_LIMIT`] inputs.
//!
//! # Example
//! ```no_run
//! use combigen::combine::{combinations, accepts};
//! use combigen::inventory::Inventory;
//! use std::path::Path;
//!
//! let inventory = Inventory::scan(Path::new("./test_genome")).unwrap();
//! let index = inventory.dir_index();
//! for comb in combinations(&inventory.all_genomes, 2) {
//!     if accepts(&comb, &index).unwrap() {
//!         println!("{}", comb.join(" + "));
//!     }
//! }
//! ```

use anyhow::Result;
use rustc_hash::FxHashSet;

use crate::inventory::DirIndex;

/// Above this many genomes, `all` mode is considered infeasible and a
/// warning is logged before enumeration starts (2^24 combinations).
pub const ALL_MODE_FEASIBLE_LIMIT: usize = 24;

// ============================================================================
// Run Mode
// ============================================================================

/// Enumeration strategy selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Every combination size from 1 up to the genome count.
    All,
    /// A single fixed combination size, clamped to the genome count.
    Fixed,
}

// ============================================================================
// Combination Iterator
// ============================================================================

/// Lazy iterator over size-k combinations of a genome list.
///
/// Yields combinations in lexicographic-by-position order, borrowing the
/// names from the input slice. k = 0 yields exactly one empty combination;
/// k larger than the list yields nothing.
pub struct Combinations<'a> {
    genomes: &'a [String],
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl<'a> Combinations<'a> {
    fn new(genomes: &'a [String], k: usize) -> Self {
        Self {
            genomes,
            indices: (0..k).collect(),
            started: false,
            done: k > genomes.len(),
        }
    }

    fn current(&self) -> Vec<&'a str> {
        self.indices
            .iter()
            .map(|&i| self.genomes[i].as_str())
            .collect()
    }
}

impl<'a> Iterator for Combinations<'a> {
    type Item = Vec<&'a str>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.current());
        }

        let k = self.indices.len();
        let n = self.genomes.len();

        // Rightmost position that has not reached its final value.
        let mut pos = k;
        loop {
            if pos == 0 {
                self.done = true;
                return None;
            }
            pos -= 1;
            if self.indices[pos] != pos + n - k {
                break;
            }
        }

        self.indices[pos] += 1;
        for i in pos + 1..k {
            self.indices[i] = self.indices[i - 1] + 1;
        }

        Some(self.current())
    }
}

/// Returns the size-k combination stream over `genomes`.
pub fn combinations(genomes: &[String], k: usize) -> Combinations<'_> {
    Combinations::new(genomes, k)
}

/// Returns every combination of every size from 1 to the genome count.
///
/// Size-1 combinations come first, then size-2, and so on; each size runs
/// in lexicographic-by-position order. The stream holds up to
/// 2^len - 1 combinations, see the module-level design limit.
pub fn generate_all(genomes: &[String]) -> impl Iterator<Item = Vec<&str>> {
    (1..=genomes.len()).flat_map(move |k| combinations(genomes, k))
}

/// Returns every combination of exactly size `n`.
///
/// If `n` exceeds the genome count it is clamped to the count, so at most
/// the single full-set combination is produced.
pub fn generate_fixed(genomes: &[String], n: usize) -> Combinations<'_> {
    combinations(genomes, n.min(genomes.len()))
}

// ============================================================================
// Provenance Filter
// ============================================================================

/// Decides whether a combination is kept.
///
/// A combination is accepted when every member comes from a distinct source
/// directory and it has at least two members. Single-genome combinations
/// carry no comparative value and are always rejected.
///
/// # Errors
/// Fails if a member cannot be resolved through the index: an
/// inconsistency between the inventory and the combination stream that
/// must never be masked as a filter decision.
pub fn accepts(comb: &[&str], index: &DirIndex) -> Result<bool> {
    if comb.len() < 2 {
        return Ok(false);
    }

    let mut seen_dirs: FxHashSet<&str> = FxHashSet::default();
    for genome in comb {
        if !seen_dirs.insert(index.owner_of(genome)?) {
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Inventory;
    use std::fs::{self, File};

    fn genome_list(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn scan_fixture(dirs: &[(&str, &[&str])]) -> Inventory {
        let root = tempfile::tempdir().unwrap();
        for (dir, files) in dirs {
            fs::create_dir(root.path().join(dir)).unwrap();
            for file in *files {
                File::create(root.path().join(dir).join(file)).unwrap();
            }
        }
        Inventory::scan(root.path()).unwrap()
    }

    #[test]
    fn test_combinations_lexicographic_order() {
        let genomes = genome_list(&["a", "b", "c", "d"]);
        let combs: Vec<Vec<&str>> = combinations(&genomes, 2).collect();
        assert_eq!(
            combs,
            vec![
                vec!["a", "b"],
                vec!["a", "c"],
                vec!["a", "d"],
                vec!["b", "c"],
                vec!["b", "d"],
                vec!["c", "d"],
            ]
        );
    }

    #[test]
    fn test_combinations_full_size_and_oversize() {
        let genomes = genome_list(&["a", "b", "c"]);
        let full: Vec<Vec<&str>> = combinations(&genomes, 3).collect();
        assert_eq!(full, vec![vec!["a", "b", "c"]]);

        let oversize: Vec<Vec<&str>> = combinations(&genomes, 4).collect();
        assert!(oversize.is_empty(), "k > len should yield nothing");
    }

    #[test]
    fn test_combinations_size_zero_yields_one_empty() {
        let genomes = genome_list(&["a", "b"]);
        let combs: Vec<Vec<&str>> = combinations(&genomes, 0).collect();
        assert_eq!(combs, vec![Vec::<&str>::new()]);
    }

    #[test]
    fn test_generate_all_sizes_in_order() {
        let genomes = genome_list(&["a", "b", "c"]);
        let combs: Vec<Vec<&str>> = generate_all(&genomes).collect();
        assert_eq!(
            combs,
            vec![
                vec!["a"],
                vec!["b"],
                vec!["c"],
                vec!["a", "b"],
                vec!["a", "c"],
                vec!["b", "c"],
                vec!["a", "b", "c"],
            ]
        );
        assert_eq!(combs.len(), 7, "power set minus the empty set");
    }

    #[test]
    fn test_generate_all_empty_list() {
        let genomes: Vec<String> = Vec::new();
        assert_eq!(generate_all(&genomes).count(), 0);
    }

    #[test]
    fn test_generate_fixed_clamps_oversize_request() {
        let genomes = genome_list(&["a", "b", "c"]);
        let combs: Vec<Vec<&str>> = generate_fixed(&genomes, 10).collect();
        assert_eq!(
            combs,
            vec![vec!["a", "b", "c"]],
            "oversize n clamps to the full set"
        );
    }

    #[test]
    fn test_accepts_rejects_singletons() {
        let inventory = scan_fixture(&[("A", &["a1.xml"]), ("B", &["b1.xml"])]);
        let index = inventory.dir_index();
        assert!(!accepts(&["a1.xml"], &index).unwrap());
        assert!(!accepts(&[], &index).unwrap());
    }

    #[test]
    fn test_accepts_rejects_same_directory_pairs() {
        let inventory = scan_fixture(&[("A", &["a1.xml", "a2.xml"]), ("B", &["b1.xml"])]);
        let index = inventory.dir_index();
        assert!(!accepts(&["a1.xml", "a2.xml"], &index).unwrap());
        assert!(accepts(&["a1.xml", "b1.xml"], &index).unwrap());
    }

    #[test]
    fn test_accepts_fails_loudly_on_unknown_genome() {
        let inventory = scan_fixture(&[("A", &["a1.xml"]), ("B", &["b1.xml"])]);
        let index = inventory.dir_index();
        assert!(accepts(&["a1.xml", "ghost.xml"], &index).is_err());
    }

    #[test]
    fn test_accepted_combinations_cross_all_directories() {
        let inventory = scan_fixture(&[
            ("A", &["a1.xml", "a2.xml"]),
            ("B", &["b1.xml"]),
            ("C", &["c1.xml", "c2.xml"]),
        ]);
        let index = inventory.dir_index();

        for comb in generate_all(&inventory.all_genomes) {
            if accepts(&comb, &index).unwrap() {
                let dirs: FxHashSet<&str> = comb
                    .iter()
                    .map(|g| index.owner_of(g).unwrap())
                    .collect();
                assert_eq!(
                    dirs.len(),
                    comb.len(),
                    "accepted combination {:?} pairs genomes from one directory",
                    comb
                );
                assert!(comb.len() >= 2);
            }
        }
    }

    #[test]
    fn test_worked_pair_example() {
        // A = {a1.xml, a2.xml}, B = {b1.xml}, size 2:
        // (a1,a2) same directory, (a1,b1) and (a2,b1) accepted.
        let inventory = scan_fixture(&[("A", &["a1.xml", "a2.xml"]), ("B", &["b1.xml"])]);
        let index = inventory.dir_index();

        let accepted: Vec<Vec<&str>> = generate_fixed(&inventory.all_genomes, 2)
            .filter(|c| accepts(c, &index).unwrap())
            .collect();

        assert_eq!(
            accepted,
            vec![vec!["a1.xml", "b1.xml"], vec!["a2.xml", "b1.xml"]]
        );
    }
}

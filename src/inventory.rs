//! Genome Inventory Module
//!
//! Scans a root directory holding one subdirectory per genome source and
//! builds the in-memory inventory the combination pipeline runs over.
//!
//! # Directory Layout
//! ```text
//! genome_dir/
//!   gut_isolates/      f1.xml  f2.xml
//!   soil_isolates/     f3.xml
//!   reference_set/     f4.xml  f5.xml
//! ```
//! Every entry name found directly inside a source directory is taken as a
//! genome name; no extension filtering is applied.
//!
//! # Ordering
//! Source directory names and the genome names within each directory are
//! sorted, so the flattened genome list (and with it combination
//! enumeration order and ID assignment) is reproducible across platforms.
//!
//! # Example
//! ```no_run
//! use combigen::inventory::Inventory;
//! use std::path::Path;
//!
//! let inventory = Inventory::scan(Path::new("./test_genome")).unwrap();
//! let index = inventory.dir_index();
//! for name in &inventory.all_genomes {
//!     println!("{}\t{}", name, index.owner_of(name).unwrap());
//! }
//! ```

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Snapshot of the genome directory tree taken once per run.
///
/// # Fields
/// - `dir_genomes`: (source directory name, genome names) pairs, both sorted
/// - `all_genomes`: flattened genome list, concatenated in directory order
#[derive(Debug, Clone)]
pub struct Inventory {
    /// Per-directory genome listing in sorted directory order.
    pub dir_genomes: Vec<(String, Vec<String>)>,
    /// All genome names across directories, in directory then name order.
    pub all_genomes: Vec<String>,
}

impl Inventory {
    /// Scans the genome root and builds the inventory.
    ///
    /// Only immediate subdirectories of the root are inventoried; plain
    /// files directly under the root are skipped. Every entry inside a
    /// source directory counts as a genome name.
    ///
    /// # Errors
    /// Returns an error if the root or any source directory cannot be
    /// listed. The scan is all-or-nothing; no partial inventory is used.
    pub fn scan(genome_dir: &Path) -> Result<Self> {
        let mut source_dirs: BTreeSet<String> = BTreeSet::new();

        let entries = fs::read_dir(genome_dir)
            .with_context(|| format!("Failed to list genome directory: {}", genome_dir.display()))?;
        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to read entry in {}", genome_dir.display()))?;
            if !entry.path().is_dir() {
                continue;
            }
            let dir_name = entry.file_name();
            if let Some(name) = dir_name.to_str() {
                source_dirs.insert(name.to_string());
            }
        }

        let mut dir_genomes = Vec::with_capacity(source_dirs.len());
        let mut all_genomes = Vec::new();

        for dir_name in source_dirs {
            let dir_path = genome_dir.join(&dir_name);
            let mut genomes: Vec<String> = Vec::new();

            let entries = fs::read_dir(&dir_path)
                .with_context(|| format!("Failed to list source directory: {}", dir_path.display()))?;
            for entry in entries {
                let entry = entry
                    .with_context(|| format!("Failed to read entry in {}", dir_path.display()))?;
                let genome_name = entry.file_name();
                if let Some(name) = genome_name.to_str() {
                    genomes.push(name.to_string());
                }
            }

            genomes.sort();
            all_genomes.extend(genomes.iter().cloned());
            dir_genomes.push((dir_name, genomes));
        }

        Ok(Self {
            dir_genomes,
            all_genomes,
        })
    }

    /// Total number of genomes across all source directories.
    pub fn genome_count(&self) -> usize {
        self.all_genomes.len()
    }

    /// Builds the genome → source directory reverse index.
    ///
    /// The index is computed once per run; the filter resolves provenance
    /// through it in constant time. If the same genome name appears under
    /// several directories, the first directory in inventory order owns it.
    pub fn dir_index(&self) -> DirIndex {
        let mut owners: FxHashMap<String, String> = FxHashMap::default();
        for (dir_name, genomes) in &self.dir_genomes {
            for genome in genomes {
                owners
                    .entry(genome.clone())
                    .or_insert_with(|| dir_name.clone());
            }
        }
        DirIndex { owners }
    }
}

/// Reverse lookup from genome name to owning source directory.
#[derive(Debug, Clone)]
pub struct DirIndex {
    owners: FxHashMap<String, String>,
}

impl DirIndex {
    /// Resolves the source directory that owns `genome`.
    ///
    /// # Errors
    /// A miss means the caller is filtering a genome that was never
    /// inventoried. That is an internal consistency error, not a
    /// recoverable condition, so it fails loudly instead of letting the
    /// combination slip through the provenance check.
    pub fn owner_of(&self, genome: &str) -> Result<&str> {
        self.owners
            .get(genome)
            .map(String::as_str)
            .ok_or_else(|| anyhow::anyhow!("Genome '{}' is not present in any source directory", genome))
    }
}

//! Manifest & Script Emitter Module
//!
//! Turns the accepted-combination stream into durable output: the
//! tab-separated manifest plus the two shell scripts driving the
//! downstream merge and analysis tools.
//!
//! # Output Files
//! - `combition_results.txt`: one `combination_<ID>\t<genome>` row per
//!   combination member, appended in acceptance then member order
//! - `merge.sh`: one `merge_community` invocation per accepted
//!   combination, producing `combination_<ID>.xml`
//! - `run_smetana.sh`: a single `smetana` invocation over all merged XML
//!   models, with the manifest as the community definition
//!
//! The manifest is opened in append mode: rows from a previous run in the
//! same output directory are kept, and avoiding that accumulation is the
//! caller's responsibility (pick a fresh output directory).

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Manifest file name, kept verbatim from the established pipeline so
/// existing smetana configurations keep working.
pub const MANIFEST_FILE_NAME: &str = "combition_results.txt";
/// Merge script file name.
pub const MERGE_SCRIPT_NAME: &str = "merge.sh";
/// Analysis script file name.
pub const SMETANA_SCRIPT_NAME: &str = "run_smetana.sh";

/// Run-scoped emitter owning the combination ID counter and the
/// accumulated merge commands.
///
/// IDs start at 1 and are assigned in acceptance order, never reused or
/// reset within a run. The manifest writer is buffered and flushed in
/// [`ScriptEmitter::finish`]; dropping the emitter without calling
/// `finish` leaves the script files unwritten.
pub struct ScriptEmitter {
    out_dir: PathBuf,
    manifest: BufWriter<File>,
    merge_cmds: Vec<String>,
    next_id: usize,
}

impl ScriptEmitter {
    /// Creates the output directory (with intermediate segments) and opens
    /// the manifest for appending.
    ///
    /// The output directory is resolved to an absolute path so the
    /// manifest reference embedded in the smetana command stays valid
    /// wherever the script is later run from.
    ///
    /// # Errors
    /// Fails if the directory cannot be created or the manifest cannot be
    /// opened for writing; the run aborts before any combination work.
    pub fn create(out_dir: &Path) -> Result<Self> {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;
        let out_dir = fs::canonicalize(out_dir)
            .with_context(|| format!("Failed to resolve output directory: {}", out_dir.display()))?;

        let manifest_path = out_dir.join(MANIFEST_FILE_NAME);
        let manifest = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&manifest_path)
            .with_context(|| format!("Failed to open manifest: {}", manifest_path.display()))?;

        Ok(Self {
            out_dir,
            manifest: BufWriter::new(manifest),
            merge_cmds: Vec::new(),
            next_id: 1,
        })
    }

    /// Absolute output directory the emitter writes into.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Number of combinations recorded so far.
    pub fn accepted_count(&self) -> usize {
        self.next_id - 1
    }

    /// Records one accepted combination and returns its assigned ID.
    ///
    /// Writes one manifest row per member in member order and accumulates
    /// the matching merge command.
    pub fn record(&mut self, comb: &[&str]) -> Result<usize> {
        let id = self.next_id;

        for genome in comb {
            writeln!(self.manifest, "combination_{}\t{}", id, genome)
                .context("Failed to append manifest row")?;
        }

        self.merge_cmds.push(format!(
            "merge_community {} -o combination_{}.xml",
            comb.join(" "),
            id
        ));

        self.next_id += 1;
        Ok(id)
    }

    /// Flushes the manifest and writes the merge and analysis scripts.
    ///
    /// Returns the number of recorded combinations, which equals the
    /// highest assigned ID.
    pub fn finish(mut self) -> Result<usize> {
        self.manifest
            .flush()
            .context("Failed to flush manifest")?;

        let merge_path = self.out_dir.join(MERGE_SCRIPT_NAME);
        let merge_file = File::create(&merge_path)
            .with_context(|| format!("Failed to create merge script: {}", merge_path.display()))?;
        let mut merge = BufWriter::new(merge_file);
        for cmd in &self.merge_cmds {
            writeln!(merge, "{}", cmd)?;
        }
        merge
            .flush()
            .context("Failed to flush merge script")?;

        let smetana_path = self.out_dir.join(SMETANA_SCRIPT_NAME);
        let mut smetana = File::create(&smetana_path)
            .with_context(|| format!("Failed to create analysis script: {}", smetana_path.display()))?;
        writeln!(
            smetana,
            "smetana *.xml -c {}/{}",
            self.out_dir.display(),
            MANIFEST_FILE_NAME
        )?;

        Ok(self.accepted_count())
    }
}

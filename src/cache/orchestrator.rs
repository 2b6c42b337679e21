// In: src/cache/orchestrator.rs

//! The transform-and-cache orchestrator.
//!
//! `ArtifactCache::resolve` is the one public entry point: given the base
//! table location and an ordered stage chain, it either hands back a cached
//! artifact for the chain's identity key or produces one. Production loads
//! the base table re-rooted to the working namespace, runs every stage in
//! order against the single shared store, and serializes the result with the
//! output namespace as the declared source.
//!
//! Publication is atomic: the table is serialized into a temporary file
//! inside the cache directory and renamed onto the candidate path only after
//! the write completed, so no partially written artifact is ever visible
//! under a valid key. At-most-one-writer-per-key across concurrent build
//! invocations remains the caller's responsibility; concurrent producers of
//! the same key write identical bytes and the rename keeps the entry
//! well-formed either way.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::cache::traits::{chain_identity, MappingStage};
use crate::config::PipelineConfig;
use crate::error::SymmapError;
use crate::format::{reader, writer};

/// A key-addressed, on-disk cache of fully transformed mapping tables.
///
/// The cache directory and namespace orientation are explicit dependencies,
/// injected at construction, never ambient state.
pub struct ArtifactCache {
    cache_dir: PathBuf,
    config: PipelineConfig,
}

impl ArtifactCache {
    pub fn new(cache_dir: impl Into<PathBuf>, config: PipelineConfig) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            config,
        }
    }

    /// Resolves the canonical mapping table for this chain.
    ///
    /// An empty chain is a pure pass-through: the base table path is returned
    /// unchanged and no cache entry is created. Otherwise the chain's
    /// identity selects the cache entry; `force_refresh` recomputes it even
    /// when an entry exists. Any failure leaves no new entry behind.
    pub fn resolve(
        &self,
        base_table: &Path,
        chain: &[Box<dyn MappingStage>],
        force_refresh: bool,
    ) -> Result<PathBuf, SymmapError> {
        if chain.is_empty() {
            log::info!("No mapping stages configured, using the base table unchanged");
            return Ok(base_table.to_path_buf());
        }

        let key = chain_identity(chain);
        let candidate = self
            .cache_dir
            .join(format!("{}.{}", key, self.config.artifact_extension));

        if candidate.exists() && !force_refresh {
            log::debug!("Using cached mapping artifact for key {}", key);
            return Ok(candidate);
        }

        log::info!("Producing mapping artifact for key {}", key);
        fs::create_dir_all(&self.cache_dir).map_err(|e| SymmapError::IoAt {
            path: self.cache_dir.clone(),
            source: e,
        })?;

        // Idempotent cleanup in case a prior run left a stale entry behind.
        if let Err(e) = fs::remove_file(&candidate) {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(SymmapError::IoAt {
                    path: candidate,
                    source: e,
                });
            }
        }

        self.produce(base_table, chain, &candidate)?;
        Ok(candidate)
    }

    /// Cache-miss path: load, transform, serialize, publish.
    fn produce(
        &self,
        base_table: &Path,
        chain: &[Box<dyn MappingStage>],
        candidate: &Path,
    ) -> Result<(), SymmapError> {
        let mut store = reader::read_path(base_table, &self.config.work_namespace)?;

        let mut changed = false;
        for stage in chain {
            changed |= stage.process(&mut store).map_err(|e| SymmapError::Stage {
                stage: stage.name().to_string(),
                source: Box::new(e),
            })?;
        }
        if !changed {
            // Informational only. A no-op pass still produces a cache entry.
            log::info!("No mapping stage reported a change");
        }

        let mut tmp = NamedTempFile::new_in(&self.cache_dir).map_err(|e| SymmapError::IoAt {
            path: self.cache_dir.clone(),
            source: e,
        })?;
        writer::write(
            &store,
            &self.config.output_namespace,
            &mut BufWriter::new(tmp.as_file_mut()),
        )?;

        // The artifact becomes visible at the candidate path only now, after
        // serialization fully succeeded. On any earlier failure the temporary
        // file is deleted when it drops.
        tmp.persist(candidate).map_err(|e| SymmapError::IoAt {
            path: candidate.to_path_buf(),
            source: e.error,
        })?;
        Ok(())
    }
}

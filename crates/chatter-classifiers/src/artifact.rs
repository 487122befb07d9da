//! Persistence of a trained model.
//!
//! An artifact directory holds four JSON files:
//!
//! * `manifest.json`: format version, training run id, creation time, model
//!   and extractor settings, class list
//! * `vocabulary.json`: feature names in dimension order
//! * `selection.json`: the chi-squared selection mask
//! * `weights.json`: the one-vs-rest hyperplanes
//!
//! Each component file is stamped with the run id of the training run that
//! produced it, and loading refuses components whose stamp does not match the
//! manifest: a vocabulary, mask and weight set are only meaningful together.
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{ExtractorConfig, ModelConfig};
use crate::error::{ClassifierError, Result};
use crate::feature_selection::SelectionMask;
use crate::models::Weights;
use crate::vectorizer::Vocabulary;

/// Artifact format version written by this build.
pub const ARTIFACT_VERSION: u32 = 1;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const VOCABULARY_FILE: &str = "vocabulary.json";
pub const SELECTION_FILE: &str = "selection.json";
pub const WEIGHTS_FILE: &str = "weights.json";

/// Identity of one training run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: String,
    pub created_at: DateTime<Utc>,
}

impl RunInfo {
    pub fn generate() -> Self {
        let created_at = Utc::now();
        let run_id = format!(
            "{}-{:016x}",
            created_at.format("%Y%m%dT%H%M%S"),
            rand::random::<u64>()
        );
        RunInfo { run_id, created_at }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    #[serde(flatten)]
    pub run: RunInfo,
    pub model: ModelConfig,
    pub extractor: ExtractorConfig,
    pub classes: Vec<String>,
    pub n_features: usize,
    pub n_selected: usize,
}

/// On-disk wrapper stamping a component with its training run.
#[derive(Serialize, Deserialize)]
struct Component<T> {
    run_id: String,
    data: T,
}

/// Vocabulary, selection mask and weights of one training run, with the
/// settings needed to reproduce its feature extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifact {
    manifest: Manifest,
    vocabulary: Vocabulary,
    mask: SelectionMask,
    weights: Weights,
}

impl ModelArtifact {
    /// Bundle the frozen state of one training run, checking that the three
    /// components describe the same feature space.
    pub fn new(
        run: RunInfo,
        model: ModelConfig,
        extractor: ExtractorConfig,
        vocabulary: Vocabulary,
        mask: SelectionMask,
        weights: Weights,
    ) -> Result<Self> {
        check_consistency(&vocabulary, &mask, &weights)?;
        let manifest = Manifest {
            version: ARTIFACT_VERSION,
            run,
            model,
            extractor,
            classes: weights.classes().to_vec(),
            n_features: vocabulary.len(),
            n_selected: mask.len(),
        };
        Ok(ModelArtifact {
            manifest,
            vocabulary,
            mask,
            weights,
        })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn mask(&self) -> &SelectionMask {
        &self.mask
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn into_parts(self) -> (Manifest, Vocabulary, SelectionMask, Weights) {
        (self.manifest, self.vocabulary, self.mask, self.weights)
    }

    /// Write the artifact into `dir`, creating it if needed. The manifest is
    /// written last, so a directory without one is never a complete artifact.
    pub fn dump<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let run_id = &self.manifest.run.run_id;

        write_json(&dir.join(VOCABULARY_FILE), &Component { run_id: run_id.clone(), data: &self.vocabulary })?;
        write_json(&dir.join(SELECTION_FILE), &Component { run_id: run_id.clone(), data: &self.mask })?;
        write_json(&dir.join(WEIGHTS_FILE), &Component { run_id: run_id.clone(), data: &self.weights })?;
        write_json(&dir.join(MANIFEST_FILE), &self.manifest)?;

        log::info!(
            "Model artifact {} written to {} ({} features, {} selected, {} classes)",
            run_id,
            dir.display(),
            self.manifest.n_features,
            self.manifest.n_selected,
            self.manifest.classes.len()
        );
        Ok(())
    }

    /// Read an artifact written by [`ModelArtifact::dump`].
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let manifest: Manifest = read_json(&dir.join(MANIFEST_FILE))?;
        if manifest.version != ARTIFACT_VERSION {
            return Err(ClassifierError::UnsupportedVersion {
                found: manifest.version,
                expected: ARTIFACT_VERSION,
            });
        }

        let vocabulary = read_component(dir, VOCABULARY_FILE, "vocabulary", &manifest)?;
        let mask = read_component(dir, SELECTION_FILE, "selection", &manifest)?;
        let weights: Weights = read_component(dir, WEIGHTS_FILE, "weights", &manifest)?;
        check_consistency(&vocabulary, &mask, &weights)?;
        check_manifest(&manifest, &vocabulary, &mask, &weights)?;

        log::info!("Loaded model artifact {} from {}", manifest.run.run_id, dir.display());
        Ok(ModelArtifact {
            manifest,
            vocabulary,
            mask,
            weights,
        })
    }
}

/// Paths of every file belonging to an artifact in `dir`.
pub fn artifact_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    [MANIFEST_FILE, VOCABULARY_FILE, SELECTION_FILE, WEIGHTS_FILE]
        .iter()
        .map(|name| dir.as_ref().join(name))
        .collect()
}

fn check_consistency(vocabulary: &Vocabulary, mask: &SelectionMask, weights: &Weights) -> Result<()> {
    if mask.n_input() != vocabulary.len() {
        return Err(ClassifierError::DimensionMismatch {
            expected: vocabulary.len(),
            found: mask.n_input(),
        });
    }
    if weights.n_features() != mask.len() {
        return Err(ClassifierError::DimensionMismatch {
            expected: mask.len(),
            found: weights.n_features(),
        });
    }
    Ok(())
}

/// The manifest's summary must describe the components it was written with.
fn check_manifest(
    manifest: &Manifest,
    vocabulary: &Vocabulary,
    mask: &SelectionMask,
    weights: &Weights,
) -> Result<()> {
    if manifest.classes != weights.classes() {
        return Err(ClassifierError::InconsistentArtifact(format!(
            "manifest lists classes {:?}, weights hold {:?}",
            manifest.classes,
            weights.classes()
        )));
    }
    if manifest.n_features != vocabulary.len() || manifest.n_selected != mask.len() {
        return Err(ClassifierError::InconsistentArtifact(format!(
            "manifest expects {} features with {} selected, components hold {} and {}",
            manifest.n_features,
            manifest.n_selected,
            vocabulary.len(),
            mask.len()
        )));
    }
    Ok(())
}

fn read_component<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    component: &'static str,
    manifest: &Manifest,
) -> Result<T> {
    let stamped: Component<T> = read_json(&dir.join(file))?;
    if stamped.run_id != manifest.run.run_id {
        return Err(ClassifierError::ArtifactMismatch {
            component,
            expected: manifest.run.run_id.clone(),
            found: stamped.run_id,
        });
    }
    Ok(stamped.data)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

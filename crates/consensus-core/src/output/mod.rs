//! Result Output
//!
//! Writes batch results as parameter-stamped JSON files into an output
//! directory. The probabilistic variants get their own subdirectory, the
//! default ordinal variant writes at the root.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use consensus_eval::BatchRecord;

/// Result-writing error type
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("could not write results: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes a batch to `<dir>[/<variant>]/<stem>.json`, creating directories
/// as needed. Returns the written path.
pub fn write_batch(dir: &Path, batch: &BatchRecord) -> Result<PathBuf, OutputError> {
    let mut target = dir.to_path_buf();
    if let Some(variant_dir) = batch.parameters.variant_dir() {
        target.push(variant_dir);
    }
    fs::create_dir_all(&target)?;

    let path = target.join(format!("{}.json", batch.parameters.file_stem()));
    let json = batch.to_json_pretty()?;
    fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_eval::{ParameterStamp, TrialRecord};
    use std::env;

    fn stamp(variant: &str) -> ParameterStamp {
        ParameterStamp {
            agents: 10,
            states: 3,
            connectivity: 1.0,
            evidence_rate: 0.5,
            noise_level: None,
            fusion_rate: None,
            variant: variant.to_string(),
            closure: false,
            evidence_only: false,
            num_trials: 1,
            seed: Some(128),
        }
    }

    #[test]
    fn test_write_batch_roundtrip() {
        let dir = env::temp_dir().join("consensus_sim_test_output");
        let mut batch = BatchRecord::new(stamp("ordinal"));
        batch.trials.push(TrialRecord::new(0));

        let path = write_batch(&dir, &batch).unwrap();
        assert_eq!(path.file_name().unwrap(), "10a_3s_1.00con_0.50er_no_cl.json");

        let json = fs::read_to_string(&path).unwrap();
        let parsed = BatchRecord::from_json(&json).unwrap();
        assert_eq!(parsed.trials.len(), 1);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_probabilistic_batches_get_a_subdirectory() {
        let dir = env::temp_dir().join("consensus_sim_test_output");
        let batch = BatchRecord::new(stamp("averaging"));

        let path = write_batch(&dir, &batch).unwrap();
        assert!(path.parent().unwrap().ends_with("averaging"));

        fs::remove_file(path).ok();
    }
}

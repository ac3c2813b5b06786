//! Content-based hashing for run IDs.

use hf_config::schema::RunConfig;
use sha2::{Digest, Sha256};

pub fn compute_run_id(config: &RunConfig, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(config).unwrap_or_default();
    hasher.update(config_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_stability() {
        let config = RunConfig::example();
        let hash1 = compute_run_id(&config, "v1");
        let hash2 = compute_run_id(&config, "v1");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let config1 = RunConfig::example();
        let mut config2 = RunConfig::example();
        config2.cardiac.cycles += 1;

        assert_ne!(
            compute_run_id(&config1, "v1"),
            compute_run_id(&config2, "v1")
        );
        assert_ne!(
            compute_run_id(&config1, "v1"),
            compute_run_id(&config1, "v2")
        );
    }
}

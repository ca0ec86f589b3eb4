use serde::Deserialize;

use super::cancel::CancelToken;

/// Knobs for building and sampling the augmented MDP. Missing JSON fields fall
/// back to the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Sampled paths are cut off after this many steps.
    pub max_path_length: usize,
    pub sampling_tolerance: f64,
    #[serde(skip)]
    pub cancel: CancelToken,
}

impl Default for SynthesisConfig {
    fn default() -> SynthesisConfig {
        SynthesisConfig {
            max_path_length: 1000,
            sampling_tolerance: 1e-4,
            cancel: CancelToken::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SynthesisConfig = serde_json::from_str(r#"{"max_path_length": 20}"#).unwrap();
        assert_eq!(config.max_path_length, 20);
        assert_eq!(config.sampling_tolerance, 1e-4);
        assert!(!config.cancel.is_cancelled());
    }
}

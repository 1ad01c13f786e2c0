use std::path::Path;

use synthlab_core::EngineConfig;

use super::RegistryResult;

/// Read an `EngineConfig` from TOML; missing keys keep their defaults.
pub fn load_config(path: Option<&Path>) -> RegistryResult<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_gives_defaults() {
        let config = load_config(None).expect("config");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn file_overrides_selected_keys() {
        let path = std::env::temp_dir().join(format!("synthlab-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "significance_level = 0.01\n\n[adversarial]\nn_estimators = 25\ntimeout_ms = 5000\n",
        )
        .expect("write");

        let config = load_config(Some(&path)).expect("config");
        assert_eq!(config.significance_level, 0.01);
        assert_eq!(config.adversarial.n_estimators, 25);
        assert_eq!(config.adversarial.timeout_ms, Some(5000));
        assert_eq!(config.adversarial.seed, 42);
        assert_eq!(config.infer.categorical_threshold, 10);

        let _ = std::fs::remove_file(&path);
    }
}

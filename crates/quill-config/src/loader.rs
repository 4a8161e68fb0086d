use std::collections::HashSet;
use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, placeholder expansion
    /// fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from raw TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw)
            .map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self =
            toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// Misconfiguration fails here, at startup, rather than at task time.
    ///
    /// # Errors
    ///
    /// Returns an error on out-of-range scores, duplicate catalog ids,
    /// empty priority lists, or policies referencing unknown models
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_router()?;
        self.validate_budget()?;
        self.validate_catalog()?;
        self.validate_policies()?;
        Ok(())
    }

    fn validate_router(&self) -> anyhow::Result<()> {
        if self.router.max_attempts == 0 {
            anyhow::bail!("router.max_attempts must be at least 1");
        }
        Ok(())
    }

    fn validate_budget(&self) -> anyhow::Result<()> {
        if self.budget.monthly_usd <= 0.0 {
            anyhow::bail!("budget.monthly_usd must be positive");
        }
        if self.budget.projection_window_days == 0 {
            anyhow::bail!("budget.projection_window_days must be at least 1");
        }
        Ok(())
    }

    fn validate_catalog(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();

        for record in &self.catalog {
            if !seen.insert(record.id.as_str()) {
                anyhow::bail!("duplicate catalog entry: '{}'", record.id);
            }
            for (name, score) in [
                ("quality", record.quality),
                ("speed", record.speed),
                ("value", record.value),
            ] {
                if !(0.0..=100.0).contains(&score) {
                    anyhow::bail!("{name} score for '{}' must be within 0..=100", record.id);
                }
            }
            if record.input_per_mtok < 0.0 || record.output_per_mtok < 0.0 {
                anyhow::bail!("pricing for '{}' must not be negative", record.id);
            }
        }

        Ok(())
    }

    fn validate_policies(&self) -> anyhow::Result<()> {
        let catalog_ids: HashSet<&str> = self.catalog.iter().map(|r| r.id.as_str()).collect();

        for (category, policy) in &self.policies {
            if policy.priority_models.is_empty() {
                anyhow::bail!("policy '{category}' has an empty priority list");
            }
            if !(0.0..=100.0).contains(&policy.min_quality_score) {
                anyhow::bail!("policy '{category}' quality floor must be within 0..=100");
            }
            if policy.cost_ceiling_per_1k_tokens <= 0.0 {
                anyhow::bail!("policy '{category}' cost ceiling must be positive");
            }

            // Cross-check against the config catalog only when one is given;
            // otherwise the policy table validates against the built-in
            // catalog when it is constructed.
            if !self.catalog.is_empty() {
                for model in policy.priority_models.iter().chain(&policy.fallback_models) {
                    if !catalog_ids.contains(model.as_str()) {
                        anyhow::bail!("policy '{category}' references unknown model '{model}'");
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [router]
        api_key = "sk-or-test"
    "#;

    #[test]
    fn minimal_config_is_valid() {
        let config = Config::from_toml(MINIMAL).unwrap();
        assert!(config.catalog.is_empty());
        assert!(config.policies.is_empty());
        assert!((config.budget.monthly_usd - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn api_key_from_environment() {
        temp_env::with_var("QT_OPENROUTER_KEY", Some("sk-or-env"), || {
            let toml = r#"
                [router]
                api_key = "{{ env.QT_OPENROUTER_KEY }}"
            "#;
            let config = Config::from_toml(toml).unwrap();
            use secrecy::ExposeSecret;
            assert_eq!(config.router.api_key.expose_secret(), "sk-or-env");
        });
    }

    #[test]
    fn empty_priority_list_rejected() {
        let toml = r#"
            [router]
            api_key = "sk-or-test"

            [policies.bulk_content]
            min_quality_score = 80.0
            priority_models = []
            cost_ceiling_per_1k_tokens = 0.002
        "#;

        let err = Config::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("empty priority list"));
    }

    #[test]
    fn dangling_policy_model_rejected() {
        let toml = r#"
            [router]
            api_key = "sk-or-test"

            [[catalog]]
            id = "deepseek/deepseek-chat"
            provider = "deepseek"
            context_window = 64000
            max_output_tokens = 8192
            input_per_mtok = 0.27
            output_per_mtok = 1.1
            cost_tier = "budget"
            quality = 92.0
            speed = 80.0
            value = 96.0

            [policies.bulk_content]
            min_quality_score = 80.0
            priority_models = ["missing/model"]
            cost_ceiling_per_1k_tokens = 0.002
        "#;

        let err = Config::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("unknown model 'missing/model'"));
    }

    #[test]
    fn out_of_range_quality_rejected() {
        let toml = r#"
            [router]
            api_key = "sk-or-test"

            [[catalog]]
            id = "x/y"
            provider = "x"
            context_window = 1000
            max_output_tokens = 100
            input_per_mtok = 1.0
            output_per_mtok = 2.0
            cost_tier = "budget"
            quality = 120.0
            speed = 80.0
            value = 96.0
        "#;

        assert!(Config::from_toml(toml).is_err());
    }

    #[test]
    fn zero_attempts_rejected() {
        let toml = r#"
            [router]
            api_key = "sk-or-test"
            max_attempts = 0
        "#;

        assert!(Config::from_toml(toml).is_err());
    }
}

use glob::Pattern;
use regex::Regex;

use super::schema::Config;

/// Validate a configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Size rules
    if config.size.thresholds.is_empty() {
        errors.push("size.thresholds: must not be empty".to_string());
    }
    let mut boundaries: Vec<u64> = config.size.thresholds.iter().map(|t| t.max_changes).collect();
    boundaries.sort_unstable();
    for pair in boundaries.windows(2) {
        if pair[0] == pair[1] {
            errors.push(format!("size.thresholds: duplicate boundary {}", pair[0]));
        }
    }
    for (i, pattern) in config.size.exclude.iter().enumerate() {
        if let Err(e) = Pattern::new(pattern) {
            errors.push(format!("size.exclude[{}]: invalid glob '{}' - {}", i, pattern, e));
        }
    }

    // Staleness ladder
    for (i, threshold) in config.staleness.iter().enumerate() {
        if threshold.min_days < 0 {
            errors.push(format!(
                "staleness[{}]: min_days must be non-negative, got {}",
                i, threshold.min_days
            ));
        }
        if threshold.label.is_empty() {
            errors.push(format!("staleness[{}]: label must not be empty", i));
        }
    }
    let mut days: Vec<i64> = config.staleness.iter().map(|t| t.min_days).collect();
    days.sort_unstable();
    for pair in days.windows(2) {
        if pair[0] == pair[1] {
            errors.push(format!("staleness: duplicate min_days {}", pair[0]));
        }
    }

    // Dependency detection
    match Regex::new(&config.dependencies.mention_pattern) {
        Ok(re) => {
            // Group 0 is the whole match; the id needs its own group
            if re.captures_len() < 2 {
                errors.push(format!(
                    "dependencies.mention_pattern: '{}' has no capture group for the PR id",
                    config.dependencies.mention_pattern
                ));
            }
        }
        Err(e) => {
            errors.push(format!(
                "dependencies.mention_pattern: invalid regex '{}' - {}",
                config.dependencies.mention_pattern, e
            ));
        }
    }
    if config.dependencies.min_shared_files == 0 {
        errors.push("dependencies.min_shared_files: must be at least 1".to_string());
    }

    // Workload bands
    let light = &config.workload.light;
    let medium = &config.workload.medium;
    for (name, value) in [
        ("workload.light.max_avg_response_days", light.max_avg_response_days),
        ("workload.medium.max_avg_response_days", medium.max_avg_response_days),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!("{}: must be a non-negative finite number", name));
        }
    }
    if light.max_pending > medium.max_pending {
        errors.push("workload: light.max_pending exceeds medium.max_pending".to_string());
    }
    if light.max_avg_response_days > medium.max_avg_response_days {
        errors.push(
            "workload: light.max_avg_response_days exceeds medium.max_avg_response_days"
                .to_string(),
        );
    }

    // File labels
    for (i, rule) in config.file_labels.iter().enumerate() {
        if rule.label.is_empty() {
            errors.push(format!("file_labels[{}]: label must not be empty", i));
        }
        if rule.patterns.is_empty() {
            errors.push(format!("file_labels[{}]: patterns must not be empty", i));
        }
        for (j, pattern) in rule.patterns.iter().enumerate() {
            if let Err(e) = Pattern::new(pattern) {
                errors.push(format!(
                    "file_labels[{}].patterns[{}]: invalid glob '{}' - {}",
                    i, j, pattern, e
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staleness::StalenessThreshold;
    use crate::triage::FileLabelRule;

    #[test]
    fn test_default_config_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_size_ladder_rejected() {
        let mut config = Config::default();
        config.size.thresholds.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("size.thresholds"));
    }

    #[test]
    fn test_duplicate_size_boundary_rejected() {
        let mut config = Config::default();
        config.size.thresholds[1].max_changes = config.size.thresholds[0].max_changes;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("duplicate boundary")));
    }

    #[test]
    fn test_bad_exclude_glob_rejected() {
        let mut config = Config::default();
        config.size.exclude = vec!["[".to_string()];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("size.exclude[0]"));
    }

    #[test]
    fn test_negative_staleness_days_rejected() {
        let mut config = Config::default();
        config.staleness.push(StalenessThreshold {
            label: "Future".to_string(),
            min_days: -1,
        });
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("staleness[3]"));
    }

    #[test]
    fn test_mention_pattern_without_group_rejected() {
        let mut config = Config::default();
        config.dependencies.mention_pattern = r"depends on #\d+".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("capture group"));
    }

    #[test]
    fn test_invalid_mention_regex_rejected() {
        let mut config = Config::default();
        config.dependencies.mention_pattern = "(".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("invalid regex"));
    }

    #[test]
    fn test_zero_overlap_threshold_rejected() {
        let mut config = Config::default();
        config.dependencies.min_shared_files = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("min_shared_files"));
    }

    #[test]
    fn test_inverted_bands_rejected() {
        let mut config = Config::default();
        config.workload.light.max_pending = 10;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("light.max_pending"));
    }

    #[test]
    fn test_non_finite_band_rejected() {
        let mut config = Config::default();
        config.workload.light.max_avg_response_days = f64::NAN;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("finite")));
    }

    #[test]
    fn test_empty_file_label_rejected() {
        let mut config = Config::default();
        config.file_labels.push(FileLabelRule {
            label: String::new(),
            patterns: vec![],
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2); // empty label and empty patterns
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = Config::default();
        config.size.thresholds.clear(); // Error 1
        config.dependencies.min_shared_files = 0; // Error 2
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}

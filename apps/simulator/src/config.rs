use std::{collections::HashMap, fs};

use shared::domain::{IntakePlan, MAX_AMOUNT_ML, STEP_ML};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub step_ml: u32,
    pub goal_ml: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            step_ml: STEP_ML,
            goal_ml: MAX_AMOUNT_ML,
        }
    }
}

impl Settings {
    pub fn plan(&self) -> IntakePlan {
        IntakePlan {
            step_ml: self.step_ml,
            goal_ml: self.goal_ml,
        }
    }
}

/// Defaults, overridden by `waterlog.toml` in the working directory,
/// overridden in turn by `WATERLOG__*` environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("waterlog.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("step_ml") {
                if let Ok(parsed) = v.parse::<u32>() {
                    settings.step_ml = parsed;
                }
            }
            if let Some(v) = file_cfg.get("goal_ml") {
                if let Ok(parsed) = v.parse::<u32>() {
                    settings.goal_ml = parsed;
                }
            }
        }
    }

    if let Ok(v) = std::env::var("WATERLOG__STEP_ML") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.step_ml = parsed;
        }
    }
    if let Ok(v) = std::env::var("WATERLOG__GOAL_ML") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.goal_ml = parsed;
        }
    }

    // A zero step would make every press a no-op put that the channel
    // suppresses as unchanged, so nothing would ever be delivered.
    if settings.step_ml == 0 {
        settings.step_ml = STEP_ML;
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_plan() {
        let settings = Settings::default();
        assert_eq!(settings.step_ml, 250);
        assert_eq!(settings.goal_ml, 2500);
        assert_eq!(settings.plan(), IntakePlan::default());
    }

    // Single test so the env mutations cannot interleave across threads.
    #[test]
    fn env_vars_override_defaults_and_garbage_is_ignored() {
        std::env::set_var("WATERLOG__STEP_ML", "100");
        std::env::set_var("WATERLOG__GOAL_ML", "1000");
        let settings = load_settings();
        assert_eq!(settings.step_ml, 100);
        assert_eq!(settings.goal_ml, 1000);

        std::env::set_var("WATERLOG__GOAL_ML", "a-lot");
        let settings = load_settings();
        assert_eq!(settings.goal_ml, MAX_AMOUNT_ML);

        // A configured zero step falls back to the stock step; otherwise a
        // press would resend an unchanged payload and never be echoed.
        std::env::set_var("WATERLOG__STEP_ML", "0");
        let settings = load_settings();
        assert_eq!(settings.step_ml, STEP_ML);

        std::env::remove_var("WATERLOG__STEP_ML");
        std::env::remove_var("WATERLOG__GOAL_ML");
    }
}

//! Config command handler

use crate::error::CliResult;
use crate::ConfigArgs;
use shopcheck::SuiteConfig;

/// Text or JSON rendering of the effective suite configuration
pub fn render_config(config: &SuiteConfig, json: bool) -> CliResult<String> {
    if json {
        return Ok(serde_json::to_string_pretty(config)?);
    }
    let browser = &config.browser;
    let lines = [
        "Suite configuration:".to_string(),
        format!("  Base URL:           {}", config.base_url),
        format!("  Headless:           {}", browser.headless),
        format!(
            "  Viewport:           {}x{}",
            browser.viewport_width, browser.viewport_height
        ),
        format!(
            "  Chromium:           {}",
            browser.chromium_path.as_deref().unwrap_or("auto-detect")
        ),
        format!("  Sandbox:            {}", browser.sandbox),
        format!("  Action timeout:     {}ms", config.action_timeout_ms),
        format!("  Expect timeout:     {}ms", config.expect_timeout_ms),
        format!("  Navigation timeout: {}ms", config.navigation_timeout_ms),
        format!("  Consent timeout:    {}ms", config.consent_timeout_ms),
        format!("  Workers:            {}", config.workers),
        format!("  State file:         {}", config.state_file.display()),
    ];
    Ok(lines.join("\n"))
}

pub fn execute_config(config: &SuiteConfig, args: &ConfigArgs) -> CliResult<()> {
    println!("{}", render_config(config, args.json)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_defaults() {
        let text = render_config(&SuiteConfig::default(), false).unwrap();
        assert!(text.contains("https://automationexercise.com"));
        assert!(text.contains("shared-state.json"));
        assert!(text.contains("auto-detect"));
    }

    #[test]
    fn test_render_json_round_trips() {
        let config = SuiteConfig::default().with_workers(2);
        let json = render_config(&config, true).unwrap();
        let back: SuiteConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}

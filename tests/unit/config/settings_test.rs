// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置设置测试模块
///
/// 测试默认值、配置文件覆盖以及派生的运行时参数

#[cfg(test)]
mod tests {
    use config::File;
    use reviewrs::config::settings::Settings;
    use reviewrs::domain::services::review_collector::StallPolicy;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let settings: Settings = Settings::builder()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 8001);
        assert_eq!(settings.scraper.reviews_per_pass, 10);
        assert_eq!(settings.scraper.stall_policy, StallPolicy::KeepScrolling);
        assert!(settings.scraper.snapshot_paths.is_empty());
        assert_eq!(settings.layout.container, ".rnr-com-w");
        assert_eq!(settings.classifier.batch_size, 20);
        assert_eq!(settings.classifier.summary_sample, 50);

        let names: Vec<&str> = settings
            .classifier
            .providers
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["gemini", "openai"]);

        let timings = settings.scraper.timings();
        assert_eq!(timings.settle, Duration::from_secs(5));
        assert_eq!(timings.scroll_steps, 3);
        assert_eq!(timings.step_pause, Duration::from_millis(300));
        assert_eq!(timings.render_pause, Duration::from_secs(1));
    }

    #[test]
    fn test_file_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9100

[scraper]
settle_ms = 0
headless = false
stall_policy = "keep_scrolling"
snapshot_paths = ["fixtures/page-1.html", "fixtures/page-2.html"]

[layout]
container = ".review-card"
default_author = "Customer"

[[classifier.providers]]
name = "local-llm"
api_key = "secret"
model = "llama3"
api_base_url = "http://localhost:11434/v1"
"#
        )
        .unwrap();

        let settings: Settings = Settings::builder()
            .unwrap()
            .add_source(File::from(file.path()))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.scraper.timings().settle, Duration::ZERO);
        assert!(!settings.scraper.browser_options().headless);
        assert_eq!(settings.scraper.snapshot_paths.len(), 2);
        assert_eq!(settings.layout.container, ".review-card");
        assert_eq!(settings.layout.default_author, "Customer");
        assert_eq!(settings.layout.text, ".rnr-com-tx");

        assert_eq!(settings.classifier.providers.len(), 1);
        let provider = &settings.classifier.providers[0];
        assert_eq!(provider.name, "local-llm");
        assert_eq!(provider.resolve_api_key().as_deref(), Some("secret"));
    }

    fn with_stall_policy(policy: &str) -> Result<Settings, config::ConfigError> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[scraper]\nstall_policy = {policy}").unwrap();

        Settings::builder()?
            .add_source(File::from(file.path()))
            .build()?
            .try_deserialize::<Settings>()?
            .validated()
    }

    #[test]
    fn test_stop_after_zero_is_rejected() {
        let err = with_stall_policy("{ stop_after = 0 }").unwrap_err();
        assert!(err.to_string().contains("stop_after"));

        let settings = with_stall_policy("{ stop_after = 2 }").unwrap();
        assert_eq!(settings.scraper.stall_policy, StallPolicy::StopAfter(2));
        assert_eq!(
            settings.scraper.collector().stall_policy,
            StallPolicy::StopAfter(2)
        );
    }
}

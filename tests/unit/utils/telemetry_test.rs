// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use reviewrs::utils::telemetry;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn test_default_filter_is_valid() {
        assert!(EnvFilter::try_new(telemetry::DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_telemetry_initialization() {
        telemetry::init_telemetry();

        tracing::debug!(target: "reviewrs", "debug message");
        tracing::info!(pass = 1, new_reviews = 10, "Pass finished");
        tracing::warn!("Business name fallback used");
    }
}

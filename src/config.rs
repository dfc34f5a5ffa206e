//! Runtime settings: site endpoints and concurrency limits.
//!
//! Settings are layered: built-in defaults, then an optional YAML file
//! (`--config`), then command-line overrides. Every field is optional in the
//! YAML file.
//!
//! ```yaml
//! endpoints:
//!   roster_url_template: "https://{code}.unibo.it/it/dipartimento/persone/docenti-e-ricercatori?pagesize=500"
//! concurrency: 4
//! request_timeout_secs: 60
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tracing::{info, instrument};

/// Placeholder substituted with the department code in the roster template.
pub const CODE_PLACEHOLDER: &str = "{code}";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Endpoints {
    /// Page whose description block links every department.
    pub departments_url: String,
    /// Roster page URL with [`CODE_PLACEHOLDER`] in place of the code.
    pub roster_url_template: String,
    /// Appended to a professor's URL to reach their thesis tab.
    pub thesis_suffix: String,
    /// Registrable domain under which each department has a subdomain.
    pub domain: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            departments_url: "https://www.unibo.it/it/ateneo/sedi-e-strutture/dipartimenti"
                .to_string(),
            roster_url_template: "https://{code}.unibo.it/it/dipartimento/persone/docenti-e-ricercatori?pagenumber=1&pagesize=100000000&order=asc&sort=Cognome&".to_string(),
            thesis_suffix: "/didattica?tab=tesi".to_string(),
            domain: "unibo.it".to_string(),
        }
    }
}

impl Endpoints {
    /// Roster page of a department: `roster_url_template` with `code` filled in.
    pub fn roster_url(&self, code: &str) -> String {
        self.roster_url_template.replace(CODE_PLACEHOLDER, code)
    }

    /// Thesis tab of a professor: the profile URL plus `thesis_suffix`.
    pub fn thesis_url(&self, professor_url: &str) -> String {
        format!("{}{}", professor_url, self.thesis_suffix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub endpoints: Endpoints,
    /// Thesis pages fetched at once within one department.
    pub concurrency: usize,
    /// Departments processed at once in a multi-department run.
    pub department_concurrency: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            concurrency: 8,
            department_concurrency: 2,
            request_timeout_secs: 30,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse settings from YAML text, filling gaps with defaults.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        let mut settings: Settings = serde_yaml::from_str(text)?;
        settings.clamp();
        Ok(settings)
    }

    /// Apply command-line overrides on top of the loaded settings.
    pub fn with_overrides(
        mut self,
        concurrency: Option<usize>,
        department_concurrency: Option<usize>,
    ) -> Self {
        if let Some(n) = concurrency {
            self.concurrency = n;
        }
        if let Some(n) = department_concurrency {
            self.department_concurrency = n;
        }
        self.clamp();
        self
    }

    // A pool of width zero would never make progress.
    fn clamp(&mut self) {
        self.concurrency = self.concurrency.max(1);
        self.department_concurrency = self.department_concurrency.max(1);
    }
}

/// Load settings from `path`, or return the defaults when no path is given.
#[instrument(level = "info")]
pub async fn load_settings(path: Option<&str>) -> Result<Settings, Box<dyn Error>> {
    match path {
        Some(path) => {
            let text = tokio::fs::read_to_string(path).await?;
            let settings = Settings::from_yaml(&text)?;
            info!(path, "Loaded settings file");
            Ok(settings)
        }
        None => Ok(Settings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_url_substitutes_code() {
        let endpoints = Endpoints::default();
        let url = endpoints.roster_url("disi");
        assert!(url.starts_with("https://disi.unibo.it/it/dipartimento/persone/docenti-e-ricercatori?"));
        assert!(url.contains("pagesize=100000000"));
    }

    #[test]
    fn test_thesis_url_appends_suffix() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.thesis_url("https://www.unibo.it/sitoweb/maria.rossi"),
            "https://www.unibo.it/sitoweb/maria.rossi/didattica?tab=tesi"
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "concurrency: 3\nendpoints:\n  domain: example.edu\n";
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.concurrency, 3);
        assert_eq!(settings.endpoints.domain, "example.edu");
        assert_eq!(settings.endpoints.thesis_suffix, "/didattica?tab=tesi");
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn test_zero_width_is_clamped() {
        let settings = Settings::default().with_overrides(Some(0), Some(0));
        assert_eq!(settings.concurrency, 1);
        assert_eq!(settings.department_concurrency, 1);
    }

    #[test]
    fn test_overrides_win() {
        let settings = Settings::from_yaml("concurrency: 3").unwrap();
        let settings = settings.with_overrides(Some(16), None);
        assert_eq!(settings.concurrency, 16);
        assert_eq!(settings.department_concurrency, 2);
    }

    #[tokio::test]
    async fn test_load_settings_without_path() {
        let settings = load_settings(None).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_load_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "department_concurrency: 5\n").unwrap();
        let settings = load_settings(path.to_str()).await.unwrap();
        assert_eq!(settings.department_concurrency, 5);
    }
}

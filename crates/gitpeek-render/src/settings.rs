//! Engine settings derived from configuration.

use gitpeek_config::{Config, DEFAULT_HISTORY_LIMIT, MarkdownRenderer};
use gitpeek_forge::{Provider, ProviderDefaults};

use crate::markdown::MarkdownConverter;

/// Read-only settings shared by every render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    pub github: ProviderDefaults,
    pub gitlab: ProviderDefaults,
    /// History limit used when a shortcode gives none.
    pub history_limit: usize,
    pub markdown: MarkdownConverter,
    /// Base URL of the notebook viewer.
    pub viewer_url: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            github: ProviderDefaults::default(),
            gitlab: ProviderDefaults::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            markdown: MarkdownConverter::default(),
            viewer_url: "https://nbviewer.jupyter.org".to_owned(),
        }
    }
}

impl RenderSettings {
    /// Build settings from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let markdown = match config.markdown.renderer {
            MarkdownRenderer::Service => MarkdownConverter::Service {
                url: config.markdown.service_url.clone(),
                user: config.markdown.user.clone(),
                token: config.markdown.token.clone(),
            },
            MarkdownRenderer::Local => MarkdownConverter::Local,
        };

        Self {
            github: ProviderDefaults {
                user: config.github.user.clone(),
                token: config.github.token.clone(),
            },
            gitlab: ProviderDefaults {
                user: config.gitlab.user.clone(),
                token: config.gitlab.token.clone(),
            },
            history_limit: config.history.limit,
            markdown,
            viewer_url: config.notebook.viewer_url.clone(),
        }
    }

    /// Default credentials for a provider.
    #[must_use]
    pub fn defaults_for(&self, provider: Provider) -> &ProviderDefaults {
        match provider {
            Provider::GitHub => &self.github,
            Provider::GitLab => &self.gitlab,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_matches_default_settings() {
        assert_eq!(RenderSettings::from_config(&Config::default()), RenderSettings::default());
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.gitlab.user = "tanuki".to_owned();
        config.gitlab.token = "glpat".to_owned();
        config.history.limit = 2;
        config.markdown.renderer = MarkdownRenderer::Local;

        let settings = RenderSettings::from_config(&config);
        assert_eq!(settings.defaults_for(Provider::GitLab).user, "tanuki");
        assert_eq!(settings.defaults_for(Provider::GitLab).token, "glpat");
        assert_eq!(settings.defaults_for(Provider::GitHub).token, "");
        assert_eq!(settings.history_limit, 2);
        assert_eq!(settings.markdown, MarkdownConverter::Local);
    }
}

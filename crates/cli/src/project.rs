use anyhow::{Context, Result};
use blogkit_core::config::{CONFIG_FILE, parse_blog_toml};
use blogkit_core::Config;
use blogkit_generator::{Content, Theme, load_content};
use std::fs;
use std::path::{Path, PathBuf};

/// A loaded blog project: configuration, ingested content and theme
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
    pub content: Content,
    pub theme: Theme,
}

impl Project {
    pub fn load(root: &Path) -> Result<Self> {
        if !root.exists() {
            anyhow::bail!("Blog directory does not exist: {}", root.display());
        }

        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            anyhow::bail!(
                "{} not found in {}\nRun 'blogkit init {}' first",
                CONFIG_FILE,
                root.display(),
                root.display()
            );
        }

        let config = parse_blog_toml(&config_path)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        let content_dir = root.join(&config.build.content_dir);
        let content = load_content(&config.site, &content_dir)
            .with_context(|| format!("Failed to load content from {}", content_dir.display()))?;

        let theme = match &config.theme.stylesheet {
            Some(stylesheet) => {
                let path = root.join(stylesheet);
                let css = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read stylesheet {}", path.display()))?;
                Theme::with_stylesheet(css)
            }
            None => Theme::default(),
        };

        Ok(Self {
            root: root.to_path_buf(),
            config,
            content,
            theme,
        })
    }

    /// Default build output directory
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.config.build.output_dir)
    }
}

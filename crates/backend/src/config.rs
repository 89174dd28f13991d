use std::path::PathBuf;

/// Server settings, read once from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub assets_dir: PathBuf,
    pub port: u16,
    /// Paths below relative to `assets_dir`.
    pub posts_file: PathBuf,
    pub flags_file: PathBuf,
    pub world_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            port: 3000,
            posts_file: PathBuf::from("data/trading_posts.csv"),
            flags_file: PathBuf::from("config/flags.json"),
            world_file: PathBuf::from("data/countries-110m.json"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset or unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup("ASSETS_DIR") {
            config.assets_dir = PathBuf::from(dir);
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => tracing::warn!(%port, "Ignoring invalid PORT"),
            }
        }
        if let Some(file) = lookup("POSTS_FILE") {
            config.posts_file = PathBuf::from(file);
        }
        if let Some(file) = lookup("FLAGS_FILE") {
            config.flags_file = PathBuf::from(file);
        }
        if let Some(file) = lookup("WORLD_FILE") {
            config.world_file = PathBuf::from(file);
        }
        config
    }

    pub fn posts_path(&self) -> PathBuf {
        self.assets_dir.join(&self.posts_file)
    }

    pub fn flags_path(&self) -> PathBuf {
        self.assets_dir.join(&self.flags_file)
    }

    pub fn world_path(&self) -> PathBuf {
        self.assets_dir.join(&self.world_file)
    }
}

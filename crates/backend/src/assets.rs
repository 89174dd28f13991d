use std::path::{Path, PathBuf};

use atlas_shared::error::{FlagConfigError, TableError, TopologyError};
use atlas_shared::flags::FlagConfig;
use atlas_shared::posts;
use atlas_shared::state::Atlas;
use atlas_shared::topology::{self, Topology, WorldMap};

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("trading post table {}: {source}", .path.display())]
    Posts { path: PathBuf, source: TableError },

    #[error("flag configuration {}: {source}", .path.display())]
    Flags {
        path: PathBuf,
        source: FlagConfigError,
    },

    #[error("world geometry {}: {source}", .path.display())]
    World {
        path: PathBuf,
        source: TopologyError,
    },
}

/// Everything served by the API, loaded once at startup.
pub struct Assets {
    pub atlas: Atlas,
    pub world: WorldMap,
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl Assets {
    pub fn load(config: &Config) -> Result<Self, LoadError> {
        let posts_path = config.posts_path();
        let flags_path = config.flags_path();
        let world_path = config.world_path();

        let table = posts::parse_posts(&read(&posts_path)?).map_err(|source| LoadError::Posts {
            path: posts_path.clone(),
            source,
        })?;
        for row in &table.skipped {
            tracing::warn!(file = %posts_path.display(), %row, "Skipped trading post");
        }

        let flags = FlagConfig::from_json(&read(&flags_path)?).map_err(|source| {
            LoadError::Flags {
                path: flags_path.clone(),
                source,
            }
        })?;

        let world = Topology::from_json(&read(&world_path)?)
            .and_then(|t| WorldMap::build(&t, topology::COUNTRIES_OBJECT))
            .map_err(|source| LoadError::World {
                path: world_path.clone(),
                source,
            })?;

        let atlas = Atlas::new(table.posts, flags);
        for empire in atlas.empires() {
            if atlas.flags().rules(empire).is_empty() {
                tracing::warn!(%empire, "No flag rules; markers fall back to a plain dot");
            }
        }

        tracing::info!(
            posts = atlas.posts().len(),
            skipped = table.skipped.len(),
            empires = atlas.empires().len(),
            flag_rules = atlas.flags().len(),
            land_shapes = world.land_paths.len(),
            "Loaded atlas assets"
        );

        Ok(Assets { atlas, world })
    }
}

use std::path::Path;

use serde::Deserialize;

/// Settings shared by both peers. Any field missing from a config file
/// takes its default.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    /// The game is over once this many rounds have been played.
    pub total_turns: u32,
    /// Minimum time between two animation steps.
    pub tick_interval_ms: u64,
    /// How many changes each animation step applies.
    pub changes_per_tick: usize,
    pub port: u16,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            total_turns: 10,
            tick_interval_ms: 50,
            changes_per_tick: 1,
            port: 5555,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&contents)?;
        if config.grid_width == 0 || config.grid_height == 0 {
            anyhow::bail!("Grid in '{}' has no cells", path.display());
        }
        Ok(config)
    }
}

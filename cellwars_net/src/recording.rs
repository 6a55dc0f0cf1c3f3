use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use cellwars::{ActionResult, GameResult, ResolvedTurn};
use serde::{Deserialize, Serialize};

/// Writes every played turn of a game into a JSON file.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    turns: Vec<TurnRecord>,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            turns: Vec::new(),
        })
    }

    pub fn store_turn(&mut self, resolved: &ResolvedTurn) {
        self.turns.push(TurnRecord {
            turn: resolved.turn,
            player: resolved.player.id(),
            result: resolved.result.clone(),
        });
    }

    /// Writes the stored turns to `game_NNNNNN.json` and starts a new recording.
    pub fn write_game_recording(&mut self, result: Option<GameResult>) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("game_{:0>6}.json", self.num));
        let writer = BufWriter::new(File::create(&filepath)?);
        let recording = GameRecording {
            winner: match result {
                Some(GameResult::WonByPlayer { player }) => Some(player.id()),
                _ => None,
            },
            turns: std::mem::take(&mut self.turns),
        };
        serde_json::to_writer_pretty(writer, &recording)?;
        self.num += 1;
        Ok(filepath)
    }
}

#[derive(Serialize, Deserialize)]
pub struct GameRecording {
    /// Player id of the winner. Absent for a tie or an unfinished game.
    pub winner: Option<u8>,
    pub turns: Vec<TurnRecord>,
}

#[derive(Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub player: u8,
    #[serde(flatten)]
    pub result: ActionResult,
}

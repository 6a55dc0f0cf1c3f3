use std::cmp::Ordering;

use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::{
    ActionRegistry, ActionResult, ChangeRecord, GameConfig, Grid, Player, Transport, WireMessage,
};

/// Where the coordinator is in a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the current player to choose an action, or, in a
    /// networked game, for the remote player's result.
    AwaitingSelection,
    /// An action was chosen and the player has to pick a cell.
    AwaitingTarget { action: usize },
    /// Changes are being applied to the grid, a few per tick.
    Animating(AnimationQueue),
    /// No more actions are accepted.
    GameOver,
}

/// A change list being replayed onto the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationQueue {
    player: Player,
    result: ActionResult,
    cursor: usize,
}

impl AnimationQueue {
    fn new(player: Player, result: ActionResult) -> Self {
        Self {
            player,
            result,
            cursor: 0,
        }
    }

    /// The player whose action is being replayed.
    pub fn player(&self) -> Player {
        self.player
    }

    pub fn result(&self) -> &ActionResult {
        &self.result
    }

    /// Changes that have already been applied to the grid.
    pub fn applied(&self) -> &[ChangeRecord] {
        &self.result.changes[..self.cursor]
    }

    /// Changes that have yet to be applied.
    pub fn pending(&self) -> &[ChangeRecord] {
        &self.result.changes[self.cursor..]
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.result.changes.len()
    }

    /// Moves the cursor forward by up to `n` and returns the changes passed over.
    fn advance(&mut self, n: usize) -> &[ChangeRecord] {
        let start = self.cursor;
        self.cursor = (self.cursor + n).min(self.result.changes.len());
        &self.result.changes[start..self.cursor]
    }
}

/// Whose turn it is and how far the game has progressed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TurnState {
    pub current_player: Player,
    /// Starts at 1 and increases whenever play returns to the first player.
    pub turn: u32,
    pub total_turns: u32,
    pub game_over: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    WonByPlayer { player: Player },
    Tie,
}

/// Summarizes the outcome of a resolved turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Normal,
    GameEnded(GameResult),
}

/// Everything about a turn that just finished replaying.
#[derive(Clone, Debug)]
pub struct ResolvedTurn {
    pub player: Player,
    /// The turn number during which the action was played.
    pub turn: u32,
    pub result: ActionResult,
    pub outcome: TurnOutcome,
}

struct PeerConnection {
    transport: Box<dyn Transport>,
    local_player: Player,
}

/// Sequences the turns of a game and replays their effects onto the grid.
///
/// All methods are non-blocking and meant to be called from one loop:
/// input handling calls [`Self::select_action()`] and [`Self::pick_cell()`],
/// and [`Self::tick()`] is called once per frame. Rejected calls return
/// `false` and change nothing.
pub struct TurnCoordinator {
    grid: Grid,
    actions: ActionRegistry,
    turn: TurnState,
    phase: Phase,
    conquered: [usize; 2],
    rng: StdRng,
    peer: Option<PeerConnection>,
    tick_interval_ms: u64,
    changes_per_tick: usize,
    last_step_ms: Option<u64>,
}

impl TurnCoordinator {
    /// A game where both players share this coordinator.
    pub fn new(config: &GameConfig, actions: ActionRegistry, rng: StdRng) -> Self {
        Self {
            grid: Grid::new(config.grid_width, config.grid_height),
            actions,
            turn: TurnState {
                current_player: Player::One,
                turn: 1,
                total_turns: config.total_turns,
                game_over: false,
            },
            phase: Phase::AwaitingSelection,
            conquered: [0, 0],
            rng,
            peer: None,
            tick_interval_ms: config.tick_interval_ms,
            changes_per_tick: config.changes_per_tick.max(1),
            last_step_ms: None,
        }
    }

    /// A game against a remote peer, where only `local_player` is controlled
    /// through this coordinator.
    pub fn networked(
        config: &GameConfig,
        actions: ActionRegistry,
        rng: StdRng,
        transport: Box<dyn Transport>,
        local_player: Player,
    ) -> Self {
        let mut coordinator = Self::new(config, actions, rng);
        coordinator.peer = Some(PeerConnection {
            transport,
            local_player,
        });
        coordinator
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn turn_state(&self) -> TurnState {
        self.turn
    }

    pub fn current_player(&self) -> Player {
        self.turn.current_player
    }

    pub fn turn(&self) -> u32 {
        self.turn.turn
    }

    pub fn is_game_over(&self) -> bool {
        self.turn.game_over
    }

    /// Cells owned by `player` as of the last resolved turn.
    pub fn conquered(&self, player: Player) -> usize {
        self.conquered[player.index()]
    }

    /// The replay in progress, if any.
    pub fn animation(&self) -> Option<&AnimationQueue> {
        match &self.phase {
            Phase::Animating(queue) => Some(queue),
            _ => None,
        }
    }

    pub fn is_networked(&self) -> bool {
        self.peer.is_some()
    }

    /// The player controlled through this coordinator, if the game is networked.
    pub fn local_player(&self) -> Option<Player> {
        self.peer.as_ref().map(|peer| peer.local_player)
    }

    /// Always false for a local game.
    pub fn is_peer_connected(&self) -> bool {
        self.peer
            .as_ref()
            .map_or(false, |peer| peer.transport.is_connected())
    }

    /// Whether the current player is controlled through this coordinator.
    pub fn is_local_turn(&self) -> bool {
        self.local_player()
            .map_or(true, |local| local == self.turn.current_player)
    }

    /// Closes the connection to the peer, if any.
    pub fn disconnect(&mut self) {
        if let Some(peer) = &mut self.peer {
            peer.transport.disconnect();
        }
    }

    /// The final standings, once the game is over.
    pub fn game_result(&self) -> Option<GameResult> {
        self.turn.game_over.then(|| self.standings())
    }

    fn standings(&self) -> GameResult {
        match self.conquered[0].cmp(&self.conquered[1]) {
            Ordering::Less => GameResult::WonByPlayer {
                player: Player::Two,
            },
            Ordering::Equal => GameResult::Tie,
            Ordering::Greater => GameResult::WonByPlayer {
                player: Player::One,
            },
        }
    }

    /// Chooses the action with index `action` for the current player.
    ///
    /// A different action may be chosen as long as no cell has been picked.
    pub fn select_action(&mut self, action: usize) -> bool {
        if !matches!(
            self.phase,
            Phase::AwaitingSelection | Phase::AwaitingTarget { .. }
        ) || !self.is_local_turn()
            || self.actions.get(action).is_none()
        {
            return false;
        }
        debug!(player = %self.turn.current_player, action, "Action selected");
        self.phase = Phase::AwaitingTarget { action };
        true
    }

    pub fn select_action_by_name(&mut self, name: &str) -> bool {
        match self.actions.position(name) {
            Some(idx) => self.select_action(idx),
            None => false,
        }
    }

    /// Runs the selected action from `(x, y)` and starts replaying it.
    ///
    /// In a networked game the result is sent to the peer before the replay
    /// starts. Picking a cell outside of the grid is rejected.
    pub fn pick_cell(&mut self, x: i32, y: i32) -> bool {
        let Phase::AwaitingTarget { action } = self.phase else {
            return false;
        };
        if !self.grid.is_in_bounds(x, y) {
            return false;
        }
        let Some(action) = self.actions.get(action) else {
            return false;
        };

        let player = self.turn.current_player;
        let mut changes = vec![ChangeRecord::new(x, y, player.into())];
        changes.extend(action.simulate(&self.grid, (x, y), player, &mut self.rng));
        let result = ActionResult {
            action_name: action.name.clone(),
            grid_x: x,
            grid_y: y,
            changes,
        };
        info!(
            %player,
            action = %result.action_name,
            x,
            y,
            num_changes = result.changes.len(),
            "Playing action"
        );

        if let Some(peer) = &mut self.peer {
            if !peer
                .transport
                .send(&WireMessage::ActionResult(result.clone()))
            {
                warn!("Could not send action result to peer");
            }
        }
        self.start_animation(player, result);
        true
    }

    /// Replays an action result played by the remote player.
    ///
    /// Only accepted while waiting for the remote player in a networked game.
    /// The change list is applied as-is.
    pub fn accept_remote_result(&mut self, result: ActionResult) -> bool {
        if self.phase != Phase::AwaitingSelection || self.peer.is_none() || self.is_local_turn() {
            return false;
        }
        let player = self.turn.current_player;
        info!(
            %player,
            action = %result.action_name,
            x = result.grid_x,
            y = result.grid_y,
            num_changes = result.changes.len(),
            "Replaying remote action"
        );
        self.start_animation(player, result);
        true
    }

    /// Advances the game by one frame.
    ///
    /// Takes at most one message from the peer if it is the remote player's
    /// turn, then applies the next batch of changes if at least the tick
    /// interval has passed since the previous batch. Returns the resolved
    /// turn when the replay finishes.
    pub fn tick(&mut self, now_ms: u64) -> Option<ResolvedTurn> {
        if self.phase == Phase::AwaitingSelection && !self.is_local_turn() {
            self.receive_remote();
        }

        let Phase::Animating(queue) = &mut self.phase else {
            return None;
        };
        if let Some(last) = self.last_step_ms {
            if now_ms.saturating_sub(last) < self.tick_interval_ms {
                return None;
            }
        }
        self.last_step_ms = Some(now_ms);
        self.grid.apply_all(queue.advance(self.changes_per_tick));
        if !queue.is_exhausted() {
            return None;
        }

        match std::mem::replace(&mut self.phase, Phase::AwaitingSelection) {
            Phase::Animating(queue) => Some(self.resolve_turn(queue)),
            other => {
                self.phase = other;
                None
            }
        }
    }

    fn receive_remote(&mut self) {
        let Some(peer) = &mut self.peer else {
            return;
        };
        match peer.transport.poll_next_message() {
            Some(WireMessage::ActionResult(result)) => {
                self.accept_remote_result(result);
            }
            None => {}
        }
    }

    fn start_animation(&mut self, player: Player, result: ActionResult) {
        self.phase = Phase::Animating(AnimationQueue::new(player, result));
        self.last_step_ms = None;
    }

    fn resolve_turn(&mut self, queue: AnimationQueue) -> ResolvedTurn {
        let player = queue.player;
        let played_turn = self.turn.turn;
        self.conquered = [
            self.grid.count_owned(Player::One),
            self.grid.count_owned(Player::Two),
        ];

        self.turn.current_player = self.turn.current_player.other();
        if self.turn.current_player == Player::One {
            self.turn.turn += 1;
        }

        let outcome = if self.turn.turn > self.turn.total_turns {
            self.turn.game_over = true;
            self.phase = Phase::GameOver;
            TurnOutcome::GameEnded(self.standings())
        } else {
            TurnOutcome::Normal
        };
        info!(
            %player,
            turn = played_turn,
            conquered_1 = self.conquered[0],
            conquered_2 = self.conquered[1],
            game_over = self.turn.game_over,
            "Turn resolved"
        );

        ResolvedTurn {
            player,
            turn: played_turn,
            result: queue.result,
            outcome,
        }
    }
}

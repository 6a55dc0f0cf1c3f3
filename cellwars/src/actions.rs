use rand::rngs::StdRng;

use crate::automaton::{Automaton, Cell, OverwritePolicy, RunSettings};
use crate::{ChangeRecord, Grid, Player};

/// An action a player can choose on their turn.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerAction {
    pub name: String,
    pub description: String,
    pub automaton: Automaton,
    /// The generation budget of each run.
    pub generations: u32,
    pub policy: OverwritePolicy,
    /// Not used by the rules yet.
    pub cost: u32,
}

impl PlayerAction {
    pub fn new(name: &str, description: &str, automaton: Automaton, generations: u32) -> Self {
        Self {
            name: String::from(name),
            description: String::from(description),
            automaton,
            generations,
            policy: OverwritePolicy::default(),
            cost: 1,
        }
    }

    /// Simulates this action for `player` starting at `start`.
    pub fn simulate(
        &self,
        grid: &Grid,
        start: Cell,
        player: Player,
        rng: &mut StdRng,
    ) -> Vec<ChangeRecord> {
        let settings = RunSettings {
            player,
            budget: self.generations,
            policy: self.policy,
        };
        self.automaton.simulate(grid, start, settings, rng)
    }
}

/// The actions available to both players, in the order they are offered.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionRegistry {
    actions: Vec<PlayerAction>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new(vec![
            PlayerAction::new(
                "Diamond Bomb",
                "Expands in a diamond shape",
                Automaton::diamond(),
                3,
            ),
            PlayerAction::new(
                "Snake Attack",
                "Slithers like a snake",
                Automaton::snake(),
                10,
            ),
            PlayerAction::new(
                "Root Growth",
                "Spreads like a tree root",
                Automaton::root(),
                7,
            ),
        ])
    }
}

impl ActionRegistry {
    pub fn new(actions: Vec<PlayerAction>) -> Self {
        Self { actions }
    }

    pub fn get(&self, idx: usize) -> Option<&PlayerAction> {
        self.actions.get(idx)
    }

    /// Returns the index of the action with this name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.actions.iter().position(|action| action.name == name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerAction> {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn default_actions() {
        let registry = ActionRegistry::default();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.position("Snake Attack"), Some(1));
        assert_eq!(registry.position("Nuke"), None);
        let root = registry.get(2).unwrap();
        assert!(matches!(root.automaton, Automaton::Root(_)));
        assert_eq!(root.generations, 7);
        assert!(root.policy.overwrite_neutral);
        assert!(!root.policy.overwrite_enemy);
    }

    #[test]
    fn diamond_bomb_uses_its_budget() {
        let registry = ActionRegistry::default();
        let grid = Grid::new(20, 20);
        let mut rng = StdRng::seed_from_u64(0);
        let changes = registry
            .get(0)
            .unwrap()
            .simulate(&grid, (10, 10), Player::One, &mut rng);
        // 4 + 8 + 12 cells for three generations
        assert_eq!(changes.len(), 24);
    }
}

//! Scene progression state
//!
//! Owned by the game and mutated only by the scene processor.

use serde::Serialize;

use crate::core::error::Result;

use super::book::{SceneBook, SceneDef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SceneState {
    /// Waiting to spawn the current scene
    #[default]
    Pending,
    Fighting,
    /// All enemies down; walking to the exit moves on
    Cleared,
    GameOver,
    /// Last scene cleared and exited
    Victory,
}

impl SceneState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SceneState::GameOver | SceneState::Victory)
    }
}

#[derive(Debug)]
pub struct SceneManager {
    book: SceneBook,
    current: usize,
    state: SceneState,
    enemies_remaining: usize,
    intro_pending: bool,
}

impl SceneManager {
    pub fn new(book: SceneBook) -> Self {
        Self {
            book,
            current: 0,
            state: SceneState::Pending,
            enemies_remaining: 0,
            intro_pending: false,
        }
    }

    pub fn book(&self) -> &SceneBook {
        &self.book
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Result<&SceneDef> {
        self.book.get(self.current)
    }

    pub fn enemies_remaining(&self) -> usize {
        self.enemies_remaining
    }

    /// Enter scene `index` and start the fight
    pub fn begin(&mut self, index: usize) -> Result<&SceneDef> {
        let scene = self.book.get(index)?;
        self.current = index;
        self.state = SceneState::Fighting;
        self.enemies_remaining = scene.enemies.len();
        self.intro_pending = scene.intro.is_some();
        Ok(scene)
    }

    /// Index of the scene after the current one, if any
    pub fn next_index(&self) -> Option<usize> {
        let next = self.current + 1;
        (next < self.book.len()).then_some(next)
    }

    /// Record one enemy down; returns true when that cleared the scene
    pub fn enemy_down(&mut self) -> bool {
        self.enemies_remaining = self.enemies_remaining.saturating_sub(1);
        if self.state == SceneState::Fighting && self.enemies_remaining == 0 {
            self.state = SceneState::Cleared;
            return true;
        }
        false
    }

    /// Intro text to show once the player exists; yields it only once
    pub fn take_intro(&mut self) -> Option<String> {
        if !self.intro_pending {
            return None;
        }
        self.intro_pending = false;
        self.current().ok().and_then(|s| s.intro.clone())
    }

    pub fn set_state(&mut self, state: SceneState) {
        self.state = state;
    }

    /// Back to the first scene, waiting to spawn
    pub fn restart(&mut self) {
        self.current = 0;
        self.state = SceneState::Pending;
        self.enemies_remaining = 0;
        self.intro_pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_after_all_enemies_down() {
        let mut manager = SceneManager::new(SceneBook::default());
        manager.begin(0).unwrap();
        assert_eq!(manager.enemies_remaining(), 3);

        assert!(!manager.enemy_down());
        assert!(!manager.enemy_down());
        assert!(manager.enemy_down());
        assert_eq!(manager.state(), SceneState::Cleared);
        assert!(!manager.enemy_down());
    }

    #[test]
    fn test_intro_is_taken_once() {
        let mut manager = SceneManager::new(SceneBook::default());
        manager.begin(1).unwrap();
        assert!(manager.take_intro().is_some());
        assert!(manager.take_intro().is_none());
    }

    #[test]
    fn test_next_index_stops_at_last_scene() {
        let mut manager = SceneManager::new(SceneBook::default());
        assert_eq!(manager.next_index(), Some(1));
        manager.begin(2).unwrap();
        assert_eq!(manager.next_index(), None);

        manager.restart();
        assert_eq!(manager.current_index(), 0);
        assert_eq!(manager.state(), SceneState::Pending);
    }
}

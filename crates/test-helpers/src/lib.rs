//! Deterministic engine doubles for packmind tests.
//!
//! [`ScriptedEngine`] stands in for a real Monte-Carlo engine: tests choose
//! what `best_move` returns, what shape the root reports, and what quality
//! signal each `iterate` call yields (including `NaN` no-playout returns).

use packmind_search::{RootView, SearchEngine};
use packmind_types::JointAction;
use std::collections::VecDeque;

/// A search engine whose answers are chosen by the test.
///
/// `iterate` consumes a script of quality values front-to-back and falls
/// back to a default once the script runs dry. The root view and best move
/// are plain settable state.
pub struct ScriptedEngine {
    best: JointAction,
    view: RootView,
    script: VecDeque<f64>,
    default_quality: f64,
    iterations: u64,
}

impl ScriptedEngine {
    /// An engine for a team of `team_size` units: neutral best move,
    /// opponent-turn root, every iteration a playout of quality 1.0.
    pub fn new(team_size: usize) -> Self {
        ScriptedEngine {
            best: JointAction::neutral(team_size),
            view: RootView::OpponentTurn,
            script: VecDeque::new(),
            default_quality: 1.0,
            iterations: 0,
        }
    }

    pub fn with_best(mut self, best: JointAction) -> Self {
        self.best = best;
        self
    }

    pub fn with_view(mut self, view: RootView) -> Self {
        self.view = view;
        self
    }

    /// Queue quality values for upcoming `iterate` calls. Push `f64::NAN`
    /// to script a call that performs no playout.
    pub fn with_script(mut self, qualities: impl IntoIterator<Item = f64>) -> Self {
        self.script.extend(qualities);
        self
    }

    pub fn set_best(&mut self, best: JointAction) {
        self.best = best;
    }

    pub fn set_view(&mut self, view: RootView) {
        self.view = view;
    }

    /// How many times `iterate` has been called.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

impl SearchEngine for ScriptedEngine {
    fn iterate(&mut self) -> f64 {
        self.iterations += 1;
        self.script.pop_front().unwrap_or(self.default_quality)
    }

    fn root(&self) -> RootView {
        self.view.clone()
    }

    fn best_move(&self) -> JointAction {
        self.best.clone()
    }
}

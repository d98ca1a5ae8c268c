//! Search state and worker.
//!
//! Query, results, and selection live behind a single `parking_lot::RwLock`.
//! `SearchState` is a cheap, `Clone`-able handle (an `Arc` to the real
//! state), so subsystems and their public callers share the same data
//! through a narrow cloned handle rather than a manager/client split.

mod grep;
mod list;
mod results;

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Error;
use crate::trigger::{Subscription, Trigger};
use results::Results;

struct State {
    query: Vec<char>,
    results: Vec<String>,
    selection: isize,
}

struct Shared {
    notes_dir: PathBuf,
    state: RwLock<State>,
    render_trigger: Trigger,
    query_trigger: Trigger,
    selection_tx: Sender<String>,
}

/// A cloneable handle over the shared search state.
#[derive(Clone)]
pub struct SearchState(Arc<Shared>);

impl SearchState {
    pub fn new(notes_dir: PathBuf, selection_tx: Sender<String>) -> Self {
        Self(Arc::new(Shared {
            notes_dir,
            state: RwLock::new(State {
                query: Vec::new(),
                results: Vec::new(),
                selection: -1,
            }),
            render_trigger: Trigger::new(),
            query_trigger: Trigger::new(),
            selection_tx,
        }))
    }

    /// Push a rune onto the query; notify both the renderer and the worker.
    pub fn append(&self, c: char) {
        self.0.state.write().query.push(c);
        self.0.render_trigger.notify();
        self.0.query_trigger.notify();
    }

    /// Pop the last rune off the query, if any; notify both triggers.
    pub fn backspace(&self) {
        let popped = self.0.state.write().query.pop().is_some();
        if popped {
            self.0.render_trigger.notify();
            self.0.query_trigger.notify();
        }
    }

    /// Move the selection toward the query line, clamped at `-1`.
    pub fn select_prev(&self) {
        {
            let mut state = self.0.state.write();
            if state.selection > -1 {
                state.selection -= 1;
            }
        }
        self.0.render_trigger.notify();
    }

    /// Move the selection toward the end of the result list, clamped at
    /// `len - 1`.
    pub fn select_next(&self) {
        {
            let mut state = self.0.state.write();
            let max = state.results.len() as isize - 1;
            if state.selection < max {
                state.selection += 1;
            }
        }
        self.0.render_trigger.notify();
    }

    /// Emit the chosen note path onto the selection channel.
    pub fn select(&self) {
        let state = self.0.state.read();
        let query: String = state.query.iter().collect();
        if query.is_empty() {
            let _ = self.0.selection_tx.send(String::new());
            return;
        }
        let title = if state.selection == -1 {
            query
        } else {
            state.results[state.selection as usize].clone()
        };
        drop(state);
        let path = self.0.notes_dir.join(format!("{title}.txt"));
        let _ = self.0.selection_tx.send(path.to_string_lossy().into_owned());
    }

    /// Snapshot of the current query.
    pub fn query(&self) -> String {
        self.0.state.read().query.iter().collect()
    }

    /// A consistent `(selection, titles)` snapshot.
    pub fn results(&self) -> (isize, Vec<String>) {
        let state = self.0.state.read();
        (state.selection, state.results.clone())
    }

    /// Change-notifications for visible state (query, selection, results).
    pub fn subscribe(&self) -> Subscription {
        self.0.render_trigger.subscribe()
    }

    /// Run the search worker loop: wait for a query change, run one search
    /// cycle, publish results. Never returns except on a fatal error.
    pub fn run(&self) -> Result<(), Error> {
        let mut subscription = self.0.query_trigger.subscribe();
        loop {
            subscription.wait();
            self.run_one_cycle()?;
        }
    }

    fn run_one_cycle(&self) -> Result<(), Error> {
        let query = self.query();

        let titles = if query.is_empty() {
            // Empty query yields no results; avoid feeding grep an empty
            // pattern, which would match every line.
            Vec::new()
        } else {
            let mut aggregate = Results::new();
            let candidates = list::list_titles(&self.0.notes_dir);
            for hit in grep::search_titles(&query, &candidates)? {
                aggregate.add(hit);
            }
            for hit in grep::search_contents(&query, &self.0.notes_dir)? {
                aggregate.add(hit);
            }
            aggregate.into_sorted()
        };

        let mut state = self.0.state.write();
        state.results = titles;
        let len = state.results.len() as isize;
        if state.selection >= len {
            state.selection = len - 1;
        }
        drop(state);
        self.0.render_trigger.notify();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    fn new_state() -> SearchState {
        let (tx, _rx) = channel();
        SearchState::new(PathBuf::from("/tmp/notes"), tx)
    }

    #[test]
    fn selection_clamps_to_result_length() {
        let search = new_state();
        {
            let mut state = search.0.state.write();
            state.results = vec!["a".into(), "b".into(), "c".into()];
            state.selection = 2;
        }
        search.select_next();
        assert_eq!(search.0.state.read().selection, 2);

        {
            let mut state = search.0.state.write();
            state.results = vec!["a".into()];
        }
        // simulate a refresh clamp directly, as run_one_cycle would
        {
            let mut state = search.0.state.write();
            let len = state.results.len() as isize;
            if state.selection >= len {
                state.selection = len - 1;
            }
        }
        assert_eq!(search.0.state.read().selection, 0);
    }

    #[test]
    fn select_prev_never_goes_below_negative_one() {
        let search = new_state();
        search.select_prev();
        search.select_prev();
        assert_eq!(search.0.state.read().selection, -1);
    }

    #[test]
    fn select_emits_query_when_selection_is_negative_one() {
        let (tx, rx) = channel();
        let search = SearchState::new(PathBuf::from("/tmp/notes"), tx);
        search.append('n');
        search.append('e');
        search.append('w');
        search.select();
        assert_eq!(rx.recv().unwrap(), "/tmp/notes/new.txt");
    }

    #[test]
    fn select_with_empty_query_emits_empty_string() {
        let (tx, rx) = channel();
        let search = SearchState::new(PathBuf::from("/tmp/notes"), tx);
        search.select();
        assert_eq!(rx.recv().unwrap(), "");
    }

    #[test]
    fn backspace_on_empty_query_does_not_notify() {
        let search = new_state();
        let mut subscription = search.subscribe();
        search.backspace();
        // no notify happened; spawn a notifier so the test still terminates
        search.append('x');
        subscription.wait();
    }
}

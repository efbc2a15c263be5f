use std::cell::Cell;
use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};

use crate::error::StoreError;
use crate::listener::{ListenerRegistry, Subscription};
use crate::reducer::Reducer;

/// Holds one state value and replaces it only through its reducer.
///
/// Dispatches are serialised by a re-entrant gate: another thread waits until
/// the running dispatch (reducer, commit and listener pass) has finished, while
/// a listener on the dispatching thread may dispatch again. Such a nested
/// dispatch completes entirely before the outer listener pass resumes.
pub struct Store<State, Action> {
    name: Option<String>,
    reducer: Box<dyn Reducer<State, Action>>,
    gate: ReentrantMutex<Cell<bool>>,
    state: RwLock<Arc<State>>,
    listeners: Arc<ListenerRegistry>,
}

/// Resets the "reducer running" flag even if the reducer panics.
struct Reducing<'a>(&'a Cell<bool>);

impl<'a> Reducing<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for Reducing<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<State, Action> Store<State, Action>
where
    State: Send + Sync + 'static,
    Action: Debug + 'static,
{
    /// Builds a store whose initial state comes from `reducer.init()`.
    pub fn new<R: Reducer<State, Action> + 'static>(reducer: R) -> Result<Self, StoreError> {
        Self::builder(reducer).build()
    }

    /// Builds a store around a preloaded state; `reducer.init()` is not called.
    pub fn with_state<R: Reducer<State, Action> + 'static>(state: State, reducer: R) -> Self {
        Self::from_parts(None, state, Box::new(reducer))
    }

    pub fn builder<R: Reducer<State, Action> + 'static>(reducer: R) -> StoreBuilder<State, Action> {
        StoreBuilder {
            reducer: Box::new(reducer),
            name: None,
            initial_state: None,
        }
    }

    fn from_parts(
        name: Option<String>,
        state: State,
        reducer: Box<dyn Reducer<State, Action>>,
    ) -> Self {
        Self {
            name,
            reducer,
            gate: ReentrantMutex::new(Cell::new(false)),
            state: RwLock::new(Arc::new(state)),
            listeners: Arc::new(ListenerRegistry::default()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Current state. The handle stays valid after later dispatches replace it.
    pub fn state(&self) -> Arc<State> {
        self.state.read().clone()
    }

    /// Registers `listener` for every dispatch that starts its listener pass
    /// after this call returns.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.listeners.insert(Arc::new(listener));
        log::trace!("{}: subscribed listener {:?}", self.label(), id);
        Subscription::new(id, &self.listeners)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Runs the reducer, commits its result and notifies every listener
    /// registered when the notification pass starts.
    ///
    /// On reducer failure the state is unchanged, no listener runs and the
    /// error is returned. The dispatched action is handed back on success.
    pub fn dispatch(&self, action: Action) -> Result<Action, StoreError> {
        let gate = self.gate.lock();
        if gate.get() {
            return Err(StoreError::DispatchInReducer);
        }

        log::debug!("{}: dispatching {:?}", self.label(), action);

        let current = self.state();
        let next = {
            let _reducing = Reducing::enter(&gate);
            self.reducer.reduce(&current, &action)
        };
        *self.state.write() = Arc::new(next.map_err(StoreError::Reducer)?);

        let listeners = self.listeners.snapshot();
        log::trace!("{}: notifying {} listener(s)", self.label(), listeners.len());
        for listener in &listeners {
            listener();
        }

        Ok(action)
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("store")
    }
}

impl<State, Action> Debug for Store<State, Action> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

pub struct StoreBuilder<State, Action> {
    reducer: Box<dyn Reducer<State, Action>>,
    name: Option<String>,
    initial_state: Option<State>,
}

impl<State, Action> StoreBuilder<State, Action>
where
    State: Send + Sync + 'static,
    Action: Debug + 'static,
{
    /// Label used in log records.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Skips `reducer.init()` and starts from `state`.
    pub fn initial_state(mut self, state: State) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn build(self) -> Result<Store<State, Action>, StoreError> {
        let state = match self.initial_state {
            Some(state) => state,
            None => self.reducer.init().map_err(StoreError::Init)?,
        };
        Ok(Store::from_parts(self.name, state, self.reducer))
    }
}

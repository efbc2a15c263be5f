use std::marker::PhantomData;
use std::sync::Arc;

/// Pure transition from the current state and an action to the next state.
///
/// Implementations must be deterministic and must return a value equal to
/// `state` for actions they do not handle. An `Err` is reserved for genuine
/// failures; the store keeps its previous state when one is returned.
pub trait Reducer<State, Action>: Send + Sync {
    /// Produces the default state. Called once, when a store is built
    /// without a preloaded state.
    fn init(&self) -> anyhow::Result<State>;

    fn reduce(&self, state: &State, action: &Action) -> anyhow::Result<State>;
}

impl<State, Action, R> Reducer<State, Action> for Box<R>
where
    R: Reducer<State, Action> + ?Sized,
{
    fn init(&self) -> anyhow::Result<State> {
        (**self).init()
    }

    fn reduce(&self, state: &State, action: &Action) -> anyhow::Result<State> {
        (**self).reduce(state, action)
    }
}

impl<State, Action, R> Reducer<State, Action> for Arc<R>
where
    R: Reducer<State, Action> + ?Sized,
{
    fn init(&self) -> anyhow::Result<State> {
        (**self).init()
    }

    fn reduce(&self, state: &State, action: &Action) -> anyhow::Result<State> {
        (**self).reduce(state, action)
    }
}

/// Reducer assembled from two closures.
pub struct FnReducer<State, Action, I, F>
where
    I: Fn() -> anyhow::Result<State> + Send + Sync,
    F: Fn(&State, &Action) -> anyhow::Result<State> + Send + Sync,
{
    init: I,
    reduce: F,
    _phantom: PhantomData<fn(&State, &Action) -> State>,
}

impl<State, Action, I, F> FnReducer<State, Action, I, F>
where
    I: Fn() -> anyhow::Result<State> + Send + Sync,
    F: Fn(&State, &Action) -> anyhow::Result<State> + Send + Sync,
{
    pub fn new(init: I, reduce: F) -> Self {
        Self {
            init,
            reduce,
            _phantom: PhantomData,
        }
    }
}

impl<State, Action, I, F> Reducer<State, Action> for FnReducer<State, Action, I, F>
where
    I: Fn() -> anyhow::Result<State> + Send + Sync,
    F: Fn(&State, &Action) -> anyhow::Result<State> + Send + Sync,
{
    fn init(&self) -> anyhow::Result<State> {
        (self.init)()
    }

    fn reduce(&self, state: &State, action: &Action) -> anyhow::Result<State> {
        (self.reduce)(state, action)
    }
}

/// Builds a reducer whose default state is `State::default()` and which
/// never fails.
pub fn reducer_fn<State, Action, F>(
    reduce: F,
) -> FnReducer<
    State,
    Action,
    impl Fn() -> anyhow::Result<State> + Send + Sync,
    impl Fn(&State, &Action) -> anyhow::Result<State> + Send + Sync,
>
where
    State: Default,
    F: Fn(&State, &Action) -> State + Send + Sync,
{
    FnReducer::new(
        || Ok(State::default()),
        move |state: &State, action: &Action| Ok(reduce(state, action)),
    )
}

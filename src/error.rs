use thiserror::Error;

/// Errors surfaced by a [`Store`](crate::Store) to the direct caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The reducer failed; the state was left untouched and no listener ran.
    #[error("reducer failed: {0}")]
    Reducer(#[source] anyhow::Error),

    /// The reducer could not produce the initial state.
    #[error("initial state could not be produced: {0}")]
    Init(#[source] anyhow::Error),

    /// `dispatch` was called while the reducer for another dispatch was running.
    #[error("reducers may not dispatch actions")]
    DispatchInReducer,

    #[error("slice '{0}' is registered more than once")]
    DuplicateSlice(String),

    /// A weak dispatcher outlived its store.
    #[error("store has been dropped")]
    StoreDropped,
}

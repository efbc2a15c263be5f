//! A minimal predictable state container.
//!
//! A [`Store`] owns one state value that is replaced only by its [`Reducer`]
//! in response to dispatched actions. Listeners registered with
//! [`Store::subscribe`] run synchronously after every committed dispatch.
//! Independent slice reducers are combined into one root reducer with
//! [`CombineReducers`] or [`combine_reducers!`].

mod combine;
mod dispatcher;
mod error;
mod listener;
mod reducer;
mod store;

pub use combine::{CombineReducers, Combined};
pub use dispatcher::{AnyDispatcher, Dispatcher};
pub use error::StoreError;
pub use listener::Subscription;
pub use reducer::{reducer_fn, FnReducer, Reducer};
pub use store::{Store, StoreBuilder};

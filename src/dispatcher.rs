use std::fmt::Debug;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use crate::error::StoreError;
use crate::store::Store;

/// Anything actions can be dispatched through.
///
/// Listeners usually capture a [`Weak`] handle to their store so the store
/// and its listeners do not keep each other alive.
pub trait Dispatcher: Send + Sync {
    type Action;

    fn dispatch(&self, action: Self::Action) -> Result<Self::Action, StoreError>;
}

impl<State, Action> Dispatcher for Store<State, Action>
where
    State: Send + Sync + 'static,
    Action: Debug + 'static,
{
    type Action = Action;

    fn dispatch(&self, action: Action) -> Result<Action, StoreError> {
        Store::dispatch(self, action)
    }
}

impl<T> Dispatcher for Arc<T>
where
    T: Dispatcher + ?Sized,
{
    type Action = T::Action;

    fn dispatch(&self, action: Self::Action) -> Result<Self::Action, StoreError> {
        self.deref().dispatch(action)
    }
}

impl<T> Dispatcher for Weak<T>
where
    T: Dispatcher + ?Sized,
{
    type Action = T::Action;

    fn dispatch(&self, action: Self::Action) -> Result<Self::Action, StoreError> {
        match self.upgrade() {
            Some(target) => target.dispatch(action),
            None => Err(StoreError::StoreDropped),
        }
    }
}

/// Type-erased dispatcher for a given action type.
pub type AnyDispatcher<Action> = Arc<dyn Dispatcher<Action = Action>>;

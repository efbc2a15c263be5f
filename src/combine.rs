//! Composition of independent slice reducers into one root reducer.
//!
//! Every slice owns one field of the root state. On each action the root
//! reducer hands every slice its own sub-state from the previous root and
//! writes the results into a fresh root. Slices never see each other, and the
//! set of slices is fixed once [`CombineReducers::build`] has run.

use std::collections::HashSet;
use std::marker::PhantomData;

use anyhow::Context;

use crate::error::StoreError;
use crate::reducer::Reducer;

trait SliceReducer<Root, Action>: Send + Sync {
    fn init_into(&self, root: &mut Root) -> anyhow::Result<()>;

    fn reduce_into(&self, previous: &Root, next: &mut Root, action: &Action) -> anyhow::Result<()>;
}

struct Lens<Sub, G, S, R> {
    get: G,
    set: S,
    reducer: R,
    _phantom: PhantomData<fn() -> Sub>,
}

impl<Root, Sub, Action, G, S, R> SliceReducer<Root, Action> for Lens<Sub, G, S, R>
where
    G: Fn(&Root) -> &Sub + Send + Sync,
    S: Fn(&mut Root, Sub) + Send + Sync,
    R: Reducer<Sub, Action>,
{
    fn init_into(&self, root: &mut Root) -> anyhow::Result<()> {
        let sub = self.reducer.init()?;
        (self.set)(root, sub);
        Ok(())
    }

    fn reduce_into(&self, previous: &Root, next: &mut Root, action: &Action) -> anyhow::Result<()> {
        let sub = self.reducer.reduce((self.get)(previous), action)?;
        (self.set)(next, sub);
        Ok(())
    }
}

struct Slice<Root, Action> {
    name: String,
    reducer: Box<dyn SliceReducer<Root, Action>>,
}

/// Builder for a [`Combined`] root reducer.
///
/// ```
/// use reduce_store::{reducer_fn, CombineReducers, Store};
///
/// #[derive(Debug, Default, Clone)]
/// struct Root {
///     clicks: u32,
///     log: Vec<String>,
/// }
///
/// let root = CombineReducers::<Root, String>::new()
///     .slice(
///         "clicks",
///         |root| &root.clicks,
///         |root, value| root.clicks = value,
///         reducer_fn(|clicks: &u32, action: &String| match action.as_str() {
///             "CLICK" => clicks + 1,
///             _ => *clicks,
///         }),
///     )
///     .slice(
///         "log",
///         |root| &root.log,
///         |root, value| root.log = value,
///         reducer_fn(|log: &Vec<String>, action: &String| {
///             let mut log = log.clone();
///             log.push(action.clone());
///             log
///         }),
///     )
///     .build()
///     .unwrap();
///
/// let store = Store::new(root).unwrap();
/// store.dispatch("CLICK".to_string()).unwrap();
/// assert_eq!(store.state().clicks, 1);
/// assert_eq!(store.state().log, vec!["CLICK".to_string()]);
/// ```
pub struct CombineReducers<Root, Action> {
    slices: Vec<Slice<Root, Action>>,
}

impl<Root, Action> Default for CombineReducers<Root, Action> {
    fn default() -> Self {
        Self { slices: Vec::new() }
    }
}

impl<Root, Action> CombineReducers<Root, Action>
where
    Root: Default + Clone + 'static,
    Action: 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a slice named `name`, read with `get`, written with `set` and
    /// driven by `reducer`.
    pub fn slice<Sub, G, S, R>(mut self, name: impl Into<String>, get: G, set: S, reducer: R) -> Self
    where
        Sub: 'static,
        G: Fn(&Root) -> &Sub + Send + Sync + 'static,
        S: Fn(&mut Root, Sub) + Send + Sync + 'static,
        R: Reducer<Sub, Action> + 'static,
    {
        self.slices.push(Slice {
            name: name.into(),
            reducer: Box::new(Lens {
                get,
                set,
                reducer,
                _phantom: PhantomData,
            }),
        });
        self
    }

    pub fn build(self) -> Result<Combined<Root, Action>, StoreError> {
        {
            let mut seen = HashSet::new();
            for slice in &self.slices {
                if !seen.insert(slice.name.as_str()) {
                    return Err(StoreError::DuplicateSlice(slice.name.clone()));
                }
            }
        }
        Ok(Combined {
            slices: self.slices,
        })
    }
}

/// Root reducer produced by [`CombineReducers`].
pub struct Combined<Root, Action> {
    slices: Vec<Slice<Root, Action>>,
}

impl<Root, Action> Combined<Root, Action> {
    /// Slice names in registration order.
    pub fn slice_names(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(|slice| slice.name.as_str())
    }
}

impl<Root, Action> Reducer<Root, Action> for Combined<Root, Action>
where
    Root: Default + Clone,
{
    fn init(&self) -> anyhow::Result<Root> {
        let mut root = Root::default();
        for slice in &self.slices {
            slice
                .reducer
                .init_into(&mut root)
                .with_context(|| format!("slice '{}' failed to initialise", slice.name))?;
        }
        Ok(root)
    }

    fn reduce(&self, state: &Root, action: &Action) -> anyhow::Result<Root> {
        let mut next = state.clone();
        for slice in &self.slices {
            slice
                .reducer
                .reduce_into(state, &mut next, action)
                .with_context(|| format!("slice '{}' failed", slice.name))?;
        }
        Ok(next)
    }
}

/// Combines reducers over the same-named fields of a root struct.
///
/// Expands to a [`CombineReducers`] chain and evaluates to
/// `Result<Combined<Root, Action>, StoreError>`.
///
/// ```
/// use reduce_store::{combine_reducers, reducer_fn, Reducer};
///
/// #[derive(Default, Clone)]
/// struct Root {
///     hits: u32,
///     misses: u32,
/// }
///
/// let root = combine_reducers!(Root {
///     hits: reducer_fn(|n: &u32, hit: &bool| if *hit { n + 1 } else { *n }),
///     misses: reducer_fn(|n: &u32, hit: &bool| if *hit { *n } else { n + 1 }),
/// })
/// .unwrap();
///
/// let state = root.reduce(&root.init().unwrap(), &false).unwrap();
/// assert_eq!((state.hits, state.misses), (0, 1));
/// ```
#[macro_export]
macro_rules! combine_reducers {
    ($root:ty { $($field:ident : $reducer:expr),+ $(,)? }) => {
        $crate::CombineReducers::<$root, _>::new()
            $(
                .slice(
                    stringify!($field),
                    |state: &$root| &state.$field,
                    |state: &mut $root, value| state.$field = value,
                    $reducer,
                )
            )+
            .build()
    };
}

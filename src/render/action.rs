//! Actions and the action registry.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::model::{EventType, VerseRange};

use super::config::RenderConfig;
use super::context::Context;

/// Session-scoped running state.
///
/// The chapter/verse pointers are shared by every action set; `state` holds
/// whatever else a particular action set needs to carry between events.
#[derive(Debug, Default)]
pub struct Workspace<S = ()> {
    pub chapter: Option<u32>,
    pub verses: Option<VerseRange>,
    pub state: S,
}

impl<S> Workspace<S> {
    /// The current position as `chapter:verses`, once both are known.
    pub fn cv(&self) -> Option<String> {
        match (self.chapter, self.verses) {
            (Some(chapter), Some(verses)) => Some(format!("{chapter}:{verses}")),
            _ => None,
        }
    }
}

/// Everything an action may look at (and, for effects, change) for one event.
pub struct Snapshot<'a, O, S = ()> {
    pub context: &'a Context<'a>,
    pub workspace: &'a mut Workspace<S>,
    pub output: &'a mut O,
    pub config: &'a RenderConfig,
}

type Predicate<O, S> = Rc<dyn Fn(&Snapshot<'_, O, S>) -> bool>;
type Effect<O, S> = Rc<dyn Fn(&mut Snapshot<'_, O, S>) -> Result<()>>;

/// A named rule: when `predicate` holds for an event, run `effect`.
///
/// Cloning an action shares its closures, so the same action can be
/// registered more than once.
pub struct Action<O, S = ()> {
    description: String,
    predicate: Predicate<O, S>,
    effect: Effect<O, S>,
}

impl<O, S> Action<O, S> {
    pub fn new<P, E>(description: impl Into<String>, predicate: P, effect: E) -> Self
    where
        P: Fn(&Snapshot<'_, O, S>) -> bool + 'static,
        E: Fn(&mut Snapshot<'_, O, S>) -> Result<()> + 'static,
    {
        Self {
            description: description.into(),
            predicate: Rc::new(predicate),
            effect: Rc::new(effect),
        }
    }

    /// An action whose predicate always holds.
    pub fn always<E>(description: impl Into<String>, effect: E) -> Self
    where
        E: Fn(&mut Snapshot<'_, O, S>) -> Result<()> + 'static,
    {
        Self::new(description, |_| true, effect)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn test(&self, snapshot: &Snapshot<'_, O, S>) -> bool {
        (self.predicate)(snapshot)
    }

    pub fn apply(&self, snapshot: &mut Snapshot<'_, O, S>) -> Result<()> {
        (self.effect)(snapshot)
    }
}

impl<O, S> Clone for Action<O, S> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            predicate: Rc::clone(&self.predicate),
            effect: Rc::clone(&self.effect),
        }
    }
}

impl<O, S> fmt::Debug for Action<O, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Ordered actions per event type.
///
/// Actions for one event type run in the order they were registered, and
/// every action whose predicate holds runs; there is no first-match cutoff.
pub struct ActionSet<O, S = ()> {
    actions: HashMap<EventType, Vec<Action<O, S>>>,
}

impl<O, S> ActionSet<O, S> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Append a rule built from its parts.
    pub fn register<P, E>(
        &mut self,
        event_type: EventType,
        predicate: P,
        effect: E,
        description: impl Into<String>,
    ) where
        P: Fn(&Snapshot<'_, O, S>) -> bool + 'static,
        E: Fn(&mut Snapshot<'_, O, S>) -> Result<()> + 'static,
    {
        self.add(event_type, Action::new(description, predicate, effect));
    }

    /// Append an already-built action.
    pub fn add(&mut self, event_type: EventType, action: Action<O, S>) {
        self.actions.entry(event_type).or_default().push(action);
    }

    /// Append an action, returning the set for chaining.
    pub fn on(mut self, event_type: EventType, action: Action<O, S>) -> Self {
        self.add(event_type, action);
        self
    }

    /// The actions registered for `event_type`, in registration order.
    pub fn actions_for(&self, event_type: EventType) -> &[Action<O, S>] {
        self.actions
            .get(&event_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<O, S> Default for ActionSet<O, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O, S> Clone for ActionSet<O, S> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
        }
    }
}

impl<O, S> fmt::Debug for ActionSet<O, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for event_type in EventType::ALL {
            let actions = self.actions_for(event_type);
            if !actions.is_empty() {
                map.entry(&event_type, &actions);
            }
        }
        map.finish()
    }
}

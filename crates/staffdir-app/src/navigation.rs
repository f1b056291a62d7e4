//! Navigation between views with transient, take-once payloads.
//!
//! A payload rides along with exactly one navigation. It is never
//! persisted, so a fresh process (the equivalent of a page reload) starts
//! without one and views that need it fall back to a safe route.

use staffdir_core::Employee;
use tracing::debug;

use crate::camera::CapturedPhoto;
use crate::route::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// The employee selected on the list, handed to the details view.
    Employee(Employee),
    /// A freshly captured photo and whose it is.
    Photo {
        image: CapturedPhoto,
        employee: Employee,
    },
}

#[derive(Debug)]
pub struct Navigator {
    current: Route,
    history: Vec<Route>,
    pending: Option<Payload>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: Route::Login,
            history: Vec::new(),
            pending: None,
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Navigate without a payload. Any unconsumed payload is dropped.
    pub fn navigate(&mut self, route: Route) {
        self.transition(route, None);
    }

    pub fn navigate_with_payload(&mut self, route: Route, payload: Payload) {
        self.transition(route, Some(payload));
    }

    /// Take the payload delivered with the current navigation, if any.
    pub fn consume_payload(&mut self) -> Option<Payload> {
        self.pending.take()
    }

    /// Return to the previous route. Payloads are not restored.
    pub fn back(&mut self) -> Option<&Route> {
        let previous = self.history.pop()?;
        debug!(from = %self.current, to = %previous, "navigating back");
        self.current = previous;
        self.pending = None;
        Some(&self.current)
    }

    fn transition(&mut self, route: Route, payload: Option<Payload>) {
        debug!(from = %self.current, to = %route, payload = payload.is_some(), "navigating");
        let previous = std::mem::replace(&mut self.current, route);
        self.history.push(previous);
        self.pending = payload;
    }
}

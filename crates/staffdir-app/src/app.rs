//! Application shell: one session, one repository, one navigator.

use staffdir_core::{Employee, RankPolicy};
use staffdir_fetch::EmployeeSource;
use tracing::debug;

use crate::camera::{CameraError, CameraFlow, CaptureDevice};
use crate::navigation::{Navigator, Payload};
use crate::repository::Repository;
use crate::route::Route;
use crate::session::{Credentials, Session, SessionError};
use crate::views::{self, Outcome, RedirectReason, Screen};

/// Redirect chains longer than this are cut off by [`App::follow`].
pub const MAX_REDIRECTS: usize = 4;

/// One redirect taken while following a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    pub from: Route,
    pub to: Route,
    pub reason: RedirectReason,
}

pub struct App<S> {
    session: Session,
    repository: Repository<S>,
    navigator: Navigator,
    rank_policy: RankPolicy,
}

impl<S: EmployeeSource> App<S> {
    pub fn new(session: Session, source: S) -> Self {
        Self {
            session,
            repository: Repository::new(source),
            navigator: Navigator::new(),
            rank_policy: RankPolicy::default(),
        }
    }

    pub fn with_rank_policy(mut self, policy: RankPolicy) -> Self {
        self.rank_policy = policy;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn repository(&self) -> &Repository<S> {
        &self.repository
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Navigate to `route` and activate it.
    pub async fn open(&mut self, route: Route) -> Outcome<Screen> {
        self.navigator.navigate(route);
        self.activate().await
    }

    pub async fn open_with_payload(&mut self, route: Route, payload: Payload) -> Outcome<Screen> {
        self.navigator.navigate_with_payload(route, payload);
        self.activate().await
    }

    /// Open `route` and keep following redirects, up to [`MAX_REDIRECTS`].
    ///
    /// Returns each redirect taken and the last outcome.
    pub async fn follow(&mut self, route: Route) -> (Vec<Hop>, Outcome<Screen>) {
        let mut hops = Vec::new();
        let mut from = route.clone();
        let mut outcome = self.open(route).await;
        for _ in 0..MAX_REDIRECTS {
            let Outcome::Redirect { to, reason } = &outcome else {
                break;
            };
            let (to, reason) = (to.clone(), *reason);
            hops.push(Hop {
                from,
                to: to.clone(),
                reason,
            });
            from = to.clone();
            outcome = self.open(to).await;
        }
        (hops, outcome)
    }

    /// Activate the current route, consuming its payload.
    pub async fn activate(&mut self) -> Outcome<Screen> {
        let route = self.navigator.current().clone();
        let payload = self.navigator.consume_payload();
        debug!(route = %route, "activating view");

        match route {
            Route::Login => Outcome::Render(Screen::Login(self.session.state().clone())),
            Route::List => views::list(&self.session, &self.repository)
                .await
                .map(Screen::List),
            Route::Details(id) => views::details(&self.session, &self.repository, &id, payload)
                .await
                .map(Screen::Details),
            Route::PhotoResult => {
                views::photo_result(&self.session, payload).map(Screen::PhotoResult)
            }
            Route::Charts => views::charts(&self.session, &self.repository, self.rank_policy)
                .await
                .map(Screen::Charts),
            Route::Map => views::map(&self.session, &self.repository)
                .await
                .map(Screen::Map),
        }
    }

    /// The "try again" action: drop the cached snapshot and re-activate.
    pub async fn retry(&mut self) -> Outcome<Screen> {
        self.repository.invalidate();
        self.activate().await
    }

    pub fn login(&mut self, credentials: &Credentials) -> Result<Outcome<()>, SessionError> {
        views::login(&mut self.session, credentials)
    }

    /// Sign out and forget the cached roster.
    pub fn logout(&mut self) -> Result<Outcome<()>, SessionError> {
        let outcome = views::logout(&mut self.session)?;
        self.repository.invalidate();
        Ok(outcome)
    }

    /// Select an employee from the list: details via the fast path.
    pub async fn open_employee(&mut self, employee: Employee) -> Outcome<Screen> {
        let route = Route::Details(employee.id.clone());
        self.open_with_payload(route, Payload::Employee(employee)).await
    }

    /// Capture a frame from an active preview and show the result.
    pub async fn capture_photo<D: CaptureDevice>(
        &mut self,
        camera: &mut CameraFlow<D>,
        employee: &Employee,
    ) -> Result<Outcome<Screen>, CameraError> {
        let image = camera.capture()?;
        let payload = Payload::Photo {
            image,
            employee: employee.clone(),
        };
        Ok(self.open_with_payload(Route::PhotoResult, payload).await)
    }
}

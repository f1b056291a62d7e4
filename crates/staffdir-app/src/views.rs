//! View activation handlers.
//!
//! Each handler receives the session explicitly and checks it before doing
//! anything else, so an anonymous activation never reaches the repository.
//! Handlers return an [`Outcome`]: data to render, a redirect, or a
//! view-local error the user can recover from.

use std::sync::Arc;

use staffdir_core::{Employee, MapProjection, RankPolicy, SalaryChart, find_by_id};
use staffdir_fetch::EmployeeSource;
use thiserror::Error;
use tracing::{debug, warn};

use crate::camera::CapturedPhoto;
use crate::navigation::Payload;
use crate::repository::{Repository, RepositoryError};
use crate::route::Route;
use crate::session::{AuthState, Credentials, Session, SessionError};

/// Errors rendered inside a view. None of them end the process.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Fetch failed; the view offers a manual retry.
    #[error("unable to load employee data: {0}")]
    Network(#[from] RepositoryError),
    #[error("employee {id} not found")]
    NotFound { id: String },
    #[error("username and password are required")]
    InvalidCredentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// No authenticated session.
    AuthRequired,
    /// The view needs a navigation payload that was not delivered.
    MissingNavigationPayload,
    SignedIn,
    SignedOut,
}

#[derive(Debug)]
pub enum Outcome<T> {
    Render(T),
    Redirect { to: Route, reason: RedirectReason },
    Failed(ViewError),
}

impl<T> Outcome<T> {
    pub fn redirect(to: Route, reason: RedirectReason) -> Self {
        Self::Redirect { to, reason }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Render(view) => Outcome::Render(f(view)),
            Self::Redirect { to, reason } => Outcome::Redirect { to, reason },
            Self::Failed(e) => Outcome::Failed(e),
        }
    }

    pub fn redirect_target(&self) -> Option<&Route> {
        match self {
            Self::Redirect { to, .. } => Some(to),
            _ => None,
        }
    }
}

// ── View data ──

#[derive(Debug, Clone)]
pub struct ListView {
    pub epoch: u64,
    pub employees: Arc<[Employee]>,
}

/// Where the details view got its employee from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSource {
    /// Carried over from the list via the navigation payload.
    Payload,
    /// Looked up by id in the snapshot of this epoch.
    Snapshot { epoch: u64 },
}

#[derive(Debug, Clone)]
pub struct DetailView {
    pub employee: Employee,
    pub source: DetailSource,
}

#[derive(Debug, Clone)]
pub struct PhotoResultView {
    pub image: CapturedPhoto,
    pub employee: Employee,
}

#[derive(Debug)]
pub enum Screen {
    /// The login form, with whoever is currently signed in.
    Login(AuthState),
    List(ListView),
    Details(DetailView),
    PhotoResult(PhotoResultView),
    Charts(SalaryChart),
    Map(MapProjection),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::List(_) => "list",
            Self::Details(_) => "details",
            Self::PhotoResult(_) => "photo-result",
            Self::Charts(_) => "charts",
            Self::Map(_) => "map",
        }
    }
}

// ── Handlers ──

fn gate<T>(session: &Session) -> Option<Outcome<T>> {
    if session.is_authenticated() {
        return None;
    }
    debug!("no session, redirecting to login");
    Some(Outcome::redirect(Route::Login, RedirectReason::AuthRequired))
}

fn network_failure<T>(err: RepositoryError) -> Outcome<T> {
    warn!(error = %err, "failed to load employee data");
    Outcome::Failed(ViewError::Network(err))
}

/// Accept or reject the login form.
pub fn login(session: &mut Session, credentials: &Credentials) -> Result<Outcome<()>, SessionError> {
    if session.login(credentials)? {
        Ok(Outcome::redirect(Route::List, RedirectReason::SignedIn))
    } else {
        Ok(Outcome::Failed(ViewError::InvalidCredentials))
    }
}

pub fn logout(session: &mut Session) -> Result<Outcome<()>, SessionError> {
    session.logout()?;
    Ok(Outcome::redirect(Route::Login, RedirectReason::SignedOut))
}

pub async fn list<S: EmployeeSource>(session: &Session, repo: &Repository<S>) -> Outcome<ListView> {
    if let Some(redirect) = gate(session) {
        return redirect;
    }
    match repo.snapshot().await {
        Ok(snapshot) => Outcome::Render(ListView {
            epoch: snapshot.epoch,
            employees: snapshot.employees,
        }),
        Err(e) => network_failure(e),
    }
}

/// Show one employee.
///
/// An `Employee` payload whose id matches is used directly. Otherwise the
/// id is resolved against the current snapshot.
pub async fn details<S: EmployeeSource>(
    session: &Session,
    repo: &Repository<S>,
    id: &str,
    payload: Option<Payload>,
) -> Outcome<DetailView> {
    if let Some(redirect) = gate(session) {
        return redirect;
    }
    if let Some(Payload::Employee(employee)) = payload
        && employee.id == id
    {
        return Outcome::Render(DetailView {
            employee,
            source: DetailSource::Payload,
        });
    }

    let snapshot = match repo.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return network_failure(e),
    };
    match find_by_id(&snapshot.employees, id) {
        Some(employee) => Outcome::Render(DetailView {
            employee: employee.clone(),
            source: DetailSource::Snapshot {
                epoch: snapshot.epoch,
            },
        }),
        None => {
            debug!(id, epoch = snapshot.epoch, "employee not found");
            Outcome::Failed(ViewError::NotFound { id: id.to_string() })
        }
    }
}

pub async fn charts<S: EmployeeSource>(
    session: &Session,
    repo: &Repository<S>,
    policy: RankPolicy,
) -> Outcome<SalaryChart> {
    if let Some(redirect) = gate(session) {
        return redirect;
    }
    match repo.snapshot().await {
        Ok(snapshot) => Outcome::Render(SalaryChart::build(&snapshot.employees, policy)),
        Err(e) => network_failure(e),
    }
}

pub async fn map<S: EmployeeSource>(session: &Session, repo: &Repository<S>) -> Outcome<MapProjection> {
    if let Some(redirect) = gate(session) {
        return redirect;
    }
    match repo.snapshot().await {
        Ok(snapshot) => Outcome::Render(MapProjection::build(&snapshot.employees)),
        Err(e) => network_failure(e),
    }
}

/// Show a captured photo. Without a photo payload there is nothing to show,
/// so the user is sent back to the list.
pub fn photo_result(session: &Session, payload: Option<Payload>) -> Outcome<PhotoResultView> {
    if let Some(redirect) = gate(session) {
        return redirect;
    }
    match payload {
        Some(Payload::Photo { image, employee }) => {
            Outcome::Render(PhotoResultView { image, employee })
        }
        _ => {
            debug!("photo result opened without a photo");
            Outcome::redirect(Route::List, RedirectReason::MissingNavigationPayload)
        }
    }
}

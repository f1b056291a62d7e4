//! Session gate, snapshot repository, navigation, photo capture, and view
//! activation for the staffdir employee directory.

pub mod app;
pub mod camera;
pub mod navigation;
pub mod repository;
pub mod route;
pub mod session;
pub mod views;

pub use app::{App, Hop, MAX_REDIRECTS};
pub use camera::{
    CameraError, CameraFlow, CameraPhase, CaptureDevice, CapturedPhoto, FrameFileDevice,
    PNG_SIGNATURE, VideoStream,
};
pub use navigation::{Navigator, Payload};
pub use repository::{Repository, RepositoryError, Snapshot};
pub use route::Route;
pub use session::{AuthState, Credentials, Session, SessionError, SessionStore};
pub use views::{
    DetailSource, DetailView, ListView, Outcome, PhotoResultView, RedirectReason, Screen,
    ViewError,
};

//! Photo capture sub-flow: `Idle → Previewing → Captured`.
//!
//! A capture device hands out a [`VideoStream`]; the device is held for as
//! long as the stream value lives and released when it is dropped. Every
//! transition out of `Previewing` goes through [`CameraFlow::release`], so
//! stop, capture, retake, and dropping the flow all release the device.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

/// MIME type of captured frames.
pub const PHOTO_MIME: &str = "image/png";

/// Leading bytes of every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Error)]
pub enum CameraError {
    /// Permission denied or no device. Recoverable: the flow stays idle.
    #[error("unable to access camera: {0}")]
    DeviceAccess(String),
    #[error("camera is already active")]
    AlreadyActive,
    #[error("camera is not previewing")]
    NotPreviewing,
    #[error("failed to grab frame: {0}")]
    Frame(String),
}

/// An acquired, live video stream. Dropping it releases the device.
pub trait VideoStream {
    /// Grab the current frame as encoded image bytes.
    fn grab_frame(&mut self) -> Result<Vec<u8>, CameraError>;
}

pub trait CaptureDevice {
    type Stream: VideoStream;

    fn acquire(&mut self) -> Result<Self::Stream, CameraError>;
}

/// A single captured frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub captured_at: DateTime<Utc>,
}

impl CapturedPhoto {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: PHOTO_MIME.to_string(),
            captured_at: Utc::now(),
        }
    }

    /// `data:image/png;base64,...`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Suggested file name when saving the photo for `employee_name`.
    ///
    /// Names come from the roster endpoint, so path separators, `..` and
    /// control characters are replaced with `_`; the result is always a
    /// single path component.
    pub fn download_file_name(employee_name: &str) -> String {
        let stem: String = employee_name
            .trim()
            .chars()
            .map(|c| if matches!(c, '/' | '\\') || c.is_control() { '_' } else { c })
            .collect();
        let stem = stem.replace("..", "_");
        let stem = if stem.is_empty() { "employee" } else { stem.as_str() };
        format!("{stem}-photo.png")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPhase {
    Idle,
    Previewing,
    Captured,
}

enum CameraState<S> {
    Idle,
    Previewing(S),
    Captured(CapturedPhoto),
}

pub struct CameraFlow<D: CaptureDevice> {
    device: D,
    state: CameraState<D::Stream>,
}

impl<D: CaptureDevice> CameraFlow<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            state: CameraState::Idle,
        }
    }

    pub fn phase(&self) -> CameraPhase {
        match self.state {
            CameraState::Idle => CameraPhase::Idle,
            CameraState::Previewing(_) => CameraPhase::Previewing,
            CameraState::Captured(_) => CameraPhase::Captured,
        }
    }

    pub fn photo(&self) -> Option<&CapturedPhoto> {
        match &self.state {
            CameraState::Captured(photo) => Some(photo),
            _ => None,
        }
    }

    /// Acquire the device and start previewing.
    ///
    /// Rejected while a stream is already active. On acquisition failure
    /// the flow is left idle.
    pub fn start(&mut self) -> Result<(), CameraError> {
        if matches!(self.state, CameraState::Previewing(_)) {
            return Err(CameraError::AlreadyActive);
        }
        match self.device.acquire() {
            Ok(stream) => {
                debug!("camera stream acquired");
                self.state = CameraState::Previewing(stream);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "camera acquisition failed");
                self.state = CameraState::Idle;
                Err(e)
            }
        }
    }

    /// Grab one frame and release the device immediately.
    ///
    /// A failed grab also releases the device and returns the flow to idle.
    pub fn capture(&mut self) -> Result<CapturedPhoto, CameraError> {
        let mut stream = self.release().ok_or(CameraError::NotPreviewing)?;
        let frame = stream.grab_frame();
        drop(stream);

        let photo = CapturedPhoto::new(frame?);
        self.state = CameraState::Captured(photo.clone());
        Ok(photo)
    }

    /// Stop previewing without capturing.
    pub fn stop(&mut self) {
        self.release();
    }

    /// Discard any captured photo and return to idle.
    pub fn retake(&mut self) {
        self.release();
        self.state = CameraState::Idle;
    }

    /// Leave `Previewing`, handing back the stream so the caller decides
    /// when it drops. Returns `None` (and changes nothing) in other phases.
    fn release(&mut self) -> Option<D::Stream> {
        if !matches!(self.state, CameraState::Previewing(_)) {
            return None;
        }
        match std::mem::replace(&mut self.state, CameraState::Idle) {
            CameraState::Previewing(stream) => {
                debug!("camera stream released");
                Some(stream)
            }
            _ => None,
        }
    }
}

impl<D: CaptureDevice> Drop for CameraFlow<D> {
    fn drop(&mut self) {
        self.release();
    }
}

// ── File-backed device ──

/// A capture device whose "frames" are read from an image file.
///
/// Used by the terminal front end, which has no video hardware.
#[derive(Debug, Clone)]
pub struct FrameFileDevice {
    path: PathBuf,
}

impl FrameFileDevice {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub struct FrameFileStream {
    path: PathBuf,
}

impl VideoStream for FrameFileStream {
    /// Frames are labelled [`PHOTO_MIME`], so anything that is not a PNG
    /// is rejected.
    fn grab_frame(&mut self) -> Result<Vec<u8>, CameraError> {
        let bytes = std::fs::read(&self.path).map_err(|e| CameraError::Frame(e.to_string()))?;
        if !bytes.starts_with(&PNG_SIGNATURE) {
            return Err(CameraError::Frame(format!(
                "{} is not a PNG image",
                self.path.display()
            )));
        }
        Ok(bytes)
    }
}

impl CaptureDevice for FrameFileDevice {
    type Stream = FrameFileStream;

    fn acquire(&mut self) -> Result<FrameFileStream, CameraError> {
        let meta = std::fs::metadata(&self.path)
            .map_err(|e| CameraError::DeviceAccess(format!("{}: {e}", self.path.display())))?;
        if !meta.is_file() {
            return Err(CameraError::DeviceAccess(format!(
                "{} is not a file",
                self.path.display()
            )));
        }
        Ok(FrameFileStream {
            path: self.path.clone(),
        })
    }
}

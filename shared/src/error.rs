use thiserror::Error;

/// The camera could not be opened for this session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("no camera device found")]
    NoDevice,
    #[error("media devices are not available in this browser")]
    Unsupported,
    #[error("camera error: {0}")]
    Other(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataUriError {
    #[error("not a data URI")]
    MissingScheme,
    #[error("data URI has no payload separator")]
    MissingPayload,
    #[error("data URI payload is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Decode(String),
}

/// A transition was requested that the current session state does not allow.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("camera stream is not active")]
    NoActiveStream,
    #[error("no captured image to analyze")]
    NoCapturedImage,
    #[error("an analysis is already in progress")]
    AlreadyAnalyzing,
    #[error("captured image is invalid: {0}")]
    InvalidImage(#[from] DataUriError),
}

/// Failure of one submission to the relay, as seen by the client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("network error: {0}")]
    Network(String),
    #[error("relay responded with status {0}")]
    Rejected(u16),
    #[error("failed to parse response: {0}")]
    Decode(String),
    #[error("failed to build request: {0}")]
    Request(String),
}

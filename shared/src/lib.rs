pub mod data_uri;
pub mod emotion;
pub mod error;
pub mod prediction;
pub mod session;

pub use data_uri::{DecodedImage, decode_data_uri};
pub use emotion::EmotionLabel;
pub use error::{CameraError, DataUriError, SessionError, SubmitError};
pub use prediction::{
    ErrorResponse, Prediction, PredictionResponse, PredictionResult, format_score,
    probability_to_percent,
};
pub use session::{
    ANALYSIS_ERROR_MESSAGE, CAMERA_ALERT_MESSAGE, CameraStream, CaptureSession, SessionState,
    UploadRequest,
};

/// Multipart field carrying the captured JPEG.
pub const IMAGE_FIELD: &str = "image";
/// Multipart field carrying the selected emotion label.
pub const EMOTION_FIELD: &str = "emotion";
/// File name attached to the image part of every upload.
pub const CAPTURE_FILE_NAME: &str = "captured_image.jpg";
/// Path of the relay endpoint, also appended to the upstream base URL.
pub const UPLOAD_PATH: &str = "/upload";

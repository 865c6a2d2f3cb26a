use crate::data_uri::decode_data_uri;
use crate::emotion::EmotionLabel;
use crate::error::{CameraError, SessionError, SubmitError};
use crate::prediction::{PredictionResponse, format_score, probability_to_percent};

/// Shown as a blocking alert when the camera cannot be opened.
pub const CAMERA_ALERT_MESSAGE: &str =
    "카메라를 시작할 수 없습니다. 카메라 접근 권한을 확인해주세요.";
/// Shown in the result panel when a submission fails.
pub const ANALYSIS_ERROR_MESSAGE: &str = "이미지 분석 중 오류가 발생했습니다. 다시 시도해 주세요";

/// An open camera stream owned by a capture session.
pub trait CameraStream {
    /// Stops every track of the stream. Called at most once per stream.
    fn stop(&mut self);
}

/// Image and label packaged for one relay submission.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub image: Vec<u8>,
    pub mime_type: String,
    /// Label text, or an empty string when nothing is selected.
    pub emotion: String,
    /// Capture cycle this request belongs to; hand it back to
    /// [`CaptureSession::finish_submit`].
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSelection,
    AwaitingCamera,
    CameraActive,
    Captured,
    Analyzing,
    Result,
    Error,
}

/// Client-side state of one capture-and-analyze cycle.
///
/// The session exclusively owns the camera stream: it is stopped before a new
/// one is attached, when a frame is captured, on reselection, and when the
/// session is dropped. A held stream and a captured image never coexist.
pub struct CaptureSession<S: CameraStream> {
    emotion: Option<EmotionLabel>,
    stream: Option<S>,
    captured_image: Option<String>,
    loading: bool,
    initializing: bool,
    error: Option<String>,
    score: Option<f64>,
    generation: u64,
}

impl<S: CameraStream> CaptureSession<S> {
    pub fn new() -> Self {
        Self {
            emotion: None,
            stream: None,
            captured_image: None,
            loading: false,
            initializing: false,
            error: None,
            score: None,
            generation: 0,
        }
    }

    /// Resets the session for `label`. Returns whether the camera should be
    /// acquired next.
    pub fn select_emotion(&mut self, label: EmotionLabel) -> bool {
        self.release_camera();
        self.captured_image = None;
        self.loading = false;
        self.error = None;
        self.score = None;
        self.generation += 1;
        self.emotion = Some(label);
        true
    }

    /// Starts an acquisition. Returns `false` when one is already in flight
    /// or the session has no use for a camera.
    pub fn begin_acquire(&mut self) -> bool {
        if self.initializing || !self.wants_camera() {
            return false;
        }
        self.initializing = true;
        self.release_camera();
        true
    }

    /// Completes the acquisition started by [`begin_acquire`](Self::begin_acquire).
    ///
    /// A stream that arrives after the session stopped wanting one is stopped
    /// right away instead of being attached.
    pub fn finish_acquire(&mut self, result: Result<S, CameraError>) -> Result<(), CameraError> {
        self.initializing = false;
        match result {
            Ok(mut stream) => {
                if self.wants_camera() {
                    self.release_camera();
                    self.stream = Some(stream);
                } else {
                    stream.stop();
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Stops the held stream, if any. Safe to call repeatedly.
    pub fn release_camera(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }

    /// Stores an encoded still frame and releases the camera.
    pub fn capture(&mut self, data_uri: String) -> Result<(), SessionError> {
        if self.stream.is_none() {
            return Err(SessionError::NoActiveStream);
        }
        self.captured_image = Some(data_uri);
        self.release_camera();
        Ok(())
    }

    /// Marks the session as analyzing and returns the payload to upload.
    pub fn begin_submit(&mut self) -> Result<UploadRequest, SessionError> {
        if self.loading {
            return Err(SessionError::AlreadyAnalyzing);
        }
        let image = self
            .captured_image
            .as_deref()
            .ok_or(SessionError::NoCapturedImage)?;

        let decoded = match decode_data_uri(image) {
            Ok(decoded) => decoded,
            Err(e) => {
                self.error = Some(ANALYSIS_ERROR_MESSAGE.to_string());
                self.score = None;
                return Err(e.into());
            }
        };

        self.loading = true;
        self.error = None;

        Ok(UploadRequest {
            image: decoded.bytes,
            mime_type: decoded.mime_type,
            emotion: self.emotion.map(|e| e.to_string()).unwrap_or_default(),
            generation: self.generation,
        })
    }

    /// Applies the outcome of the submission tagged `generation`. Returns
    /// `false` when the outcome was discarded because a reselection or retake
    /// happened since it was sent.
    ///
    /// A response without `results[0].predictions[0]` leaves both score and
    /// error unset.
    pub fn finish_submit(
        &mut self,
        generation: u64,
        result: Result<PredictionResponse, SubmitError>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        if self.captured_image.is_none() {
            return false;
        }
        match result {
            Ok(response) => {
                self.score = response
                    .top_prediction()
                    .map(|p| probability_to_percent(p.probability));
            }
            Err(_) => {
                self.error = Some(ANALYSIS_ERROR_MESSAGE.to_string());
                self.score = None;
            }
        }
        true
    }

    /// Discards the capture and its outcome. Returns whether the camera
    /// should be acquired again.
    pub fn retake(&mut self) -> bool {
        self.generation += 1;
        self.loading = false;
        self.error = None;
        self.score = None;
        self.captured_image = None;
        self.emotion.is_some()
    }

    pub fn state(&self) -> SessionState {
        if self.emotion.is_none() {
            return SessionState::NoSelection;
        }
        if self.loading {
            return SessionState::Analyzing;
        }
        if self.captured_image.is_some() {
            return if self.error.is_some() {
                SessionState::Error
            } else if self.score.is_some() {
                SessionState::Result
            } else {
                SessionState::Captured
            };
        }
        if self.stream.is_some() {
            SessionState::CameraActive
        } else {
            SessionState::AwaitingCamera
        }
    }

    /// Whether the session currently calls for a live camera.
    pub fn wants_camera(&self) -> bool {
        self.emotion.is_some() && self.captured_image.is_none()
    }

    pub fn emotion(&self) -> Option<EmotionLabel> {
        self.emotion
    }

    pub fn stream(&self) -> Option<&S> {
        self.stream.as_ref()
    }

    pub fn captured_image(&self) -> Option<&str> {
        self.captured_image.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_initializing(&self) -> bool {
        self.initializing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn score_label(&self) -> String {
        format_score(self.score)
    }
}

impl<S: CameraStream> Default for CaptureSession<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CameraStream> Drop for CaptureSession<S> {
    fn drop(&mut self) {
        self.release_camera();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::{Prediction, PredictionResult};
    use std::cell::RefCell;
    use std::rc::Rc;

    const FRAME: &str = "data:image/jpeg;base64,/9j/4A==";

    type Log = Rc<RefCell<Vec<String>>>;

    struct FakeStream {
        id: u32,
        log: Log,
    }

    impl CameraStream for FakeStream {
        fn stop(&mut self) {
            self.log.borrow_mut().push(format!("stop {}", self.id));
        }
    }

    fn stream(id: u32, log: &Log) -> FakeStream {
        FakeStream {
            id,
            log: log.clone(),
        }
    }

    fn response(probability: f64) -> PredictionResponse {
        PredictionResponse {
            results: vec![PredictionResult {
                predictions: vec![Prediction {
                    label: "x".to_string(),
                    probability,
                }],
            }],
        }
    }

    fn active_session(log: &Log) -> CaptureSession<FakeStream> {
        let mut session = CaptureSession::new();
        session.select_emotion(EmotionLabel::Happy);
        assert!(session.begin_acquire());
        session.finish_acquire(Ok(stream(1, log))).unwrap();
        session
    }

    #[test]
    fn test_new_session_has_no_selection() {
        let session: CaptureSession<FakeStream> = CaptureSession::new();
        assert_eq!(session.state(), SessionState::NoSelection);
        assert_eq!(session.score_label(), "-");
    }

    #[test]
    fn test_selecting_any_label_resets_previous_cycle() {
        for label in EmotionLabel::all() {
            let log = Log::default();
            let mut session = active_session(&log);
            session.capture(FRAME.to_string()).unwrap();
            let request = session.begin_submit().unwrap();
            session.finish_submit(request.generation, Err(SubmitError::Rejected(500)));
            assert_eq!(session.state(), SessionState::Error);

            assert!(session.select_emotion(label));
            assert_eq!(session.emotion(), Some(label));
            assert!(session.captured_image().is_none());
            assert!(session.error().is_none());
            assert!(session.score().is_none());
            assert!(!session.is_loading());
            assert_eq!(session.state(), SessionState::AwaitingCamera);
        }
    }

    #[test]
    fn test_reselect_releases_live_stream() {
        let log = Log::default();
        let mut session = active_session(&log);
        session.select_emotion(EmotionLabel::Sad);
        assert_eq!(*log.borrow(), vec!["stop 1"]);
        assert!(session.stream().is_none());
    }

    #[test]
    fn test_acquire_releases_old_stream_before_attaching() {
        let log = Log::default();
        let mut session = active_session(&log);

        assert!(session.begin_acquire());
        assert_eq!(*log.borrow(), vec!["stop 1"]);
        assert!(session.stream().is_none());

        session.finish_acquire(Ok(stream(2, &log))).unwrap();
        assert_eq!(session.stream().map(|s| s.id), Some(2));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_overlapping_acquire_is_ignored() {
        let log = Log::default();
        let mut session: CaptureSession<FakeStream> = CaptureSession::new();
        session.select_emotion(EmotionLabel::Angry);

        assert!(session.begin_acquire());
        assert!(session.is_initializing());
        assert!(!session.begin_acquire());

        session.finish_acquire(Ok(stream(1, &log))).unwrap();
        assert!(!session.is_initializing());
        assert_eq!(session.state(), SessionState::CameraActive);
    }

    #[test]
    fn test_acquire_without_selection_is_refused() {
        let mut session: CaptureSession<FakeStream> = CaptureSession::new();
        assert!(!session.begin_acquire());
        assert!(!session.is_initializing());
    }

    #[test]
    fn test_failed_acquire_leaves_no_stream() {
        let mut session: CaptureSession<FakeStream> = CaptureSession::new();
        session.select_emotion(EmotionLabel::Fearful);
        session.begin_acquire();

        let err = session
            .finish_acquire(Err(CameraError::PermissionDenied))
            .unwrap_err();
        assert_eq!(err, CameraError::PermissionDenied);
        assert!(session.stream().is_none());
        assert!(!session.is_initializing());
        assert_eq!(session.state(), SessionState::AwaitingCamera);
    }

    #[test]
    fn test_late_stream_is_stopped_when_no_longer_wanted() {
        let log = Log::default();
        let mut session = active_session(&log);
        session.capture(FRAME.to_string()).unwrap();
        assert!(!session.begin_acquire());

        session.finish_acquire(Ok(stream(2, &log))).unwrap();
        assert!(session.stream().is_none());
        assert_eq!(*log.borrow(), vec!["stop 1", "stop 2"]);
    }

    #[test]
    fn test_capture_requires_stream() {
        let mut session: CaptureSession<FakeStream> = CaptureSession::new();
        session.select_emotion(EmotionLabel::Happy);
        assert_eq!(
            session.capture(FRAME.to_string()),
            Err(SessionError::NoActiveStream)
        );
    }

    #[test]
    fn test_capture_always_releases_stream() {
        for outcome in [Ok(response(0.5)), Err(SubmitError::Network("down".into()))] {
            let log = Log::default();
            let mut session = active_session(&log);

            session.capture(FRAME.to_string()).unwrap();
            assert_eq!(*log.borrow(), vec!["stop 1"]);
            assert!(session.stream().is_none());
            assert_eq!(session.state(), SessionState::Captured);

            let request = session.begin_submit().unwrap();
            session.finish_submit(request.generation, outcome);
            assert_eq!(log.borrow().len(), 1);
        }
    }

    #[test]
    fn test_submit_packages_image_and_label() {
        let log = Log::default();
        let mut session = active_session(&log);
        session.capture(FRAME.to_string()).unwrap();

        let request = session.begin_submit().unwrap();
        assert_eq!(request.mime_type, "image/jpeg");
        assert_eq!(request.image, vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(request.emotion, "행복한, 좋은 표정");
        assert_eq!(session.state(), SessionState::Analyzing);
    }

    #[test]
    fn test_duplicate_submit_is_refused() {
        let log = Log::default();
        let mut session = active_session(&log);
        session.capture(FRAME.to_string()).unwrap();
        session.begin_submit().unwrap();
        assert_eq!(session.begin_submit(), Err(SessionError::AlreadyAnalyzing));
    }

    #[test]
    fn test_submit_without_capture_is_refused() {
        let log = Log::default();
        let mut session = active_session(&log);
        assert_eq!(session.begin_submit(), Err(SessionError::NoCapturedImage));
    }

    #[test]
    fn test_undecodable_capture_sets_error() {
        let log = Log::default();
        let mut session = active_session(&log);
        session.capture("not a data uri".to_string()).unwrap();

        assert!(matches!(
            session.begin_submit(),
            Err(SessionError::InvalidImage(_))
        ));
        assert_eq!(session.error(), Some(ANALYSIS_ERROR_MESSAGE));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_successful_analysis_shows_percentage() {
        let log = Log::default();
        let mut session = active_session(&log);
        session.capture(FRAME.to_string()).unwrap();
        let request = session.begin_submit().unwrap();

        assert!(session.finish_submit(request.generation, Ok(response(0.837))));
        assert_eq!(session.state(), SessionState::Result);
        assert_eq!(session.score(), Some(83.7));
        assert_eq!(session.score_label(), "83.7%");
    }

    #[test]
    fn test_response_without_results_is_silent() {
        let log = Log::default();
        let mut session = active_session(&log);
        session.capture(FRAME.to_string()).unwrap();
        let request = session.begin_submit().unwrap();

        let empty = Ok(PredictionResponse::default());
        assert!(session.finish_submit(request.generation, empty));
        assert!(session.score().is_none());
        assert!(session.error().is_none());
        assert!(!session.is_loading());
        assert_eq!(session.state(), SessionState::Captured);
    }

    #[test]
    fn test_failed_analysis_shows_fixed_message() {
        let log = Log::default();
        let mut session = active_session(&log);
        session.capture(FRAME.to_string()).unwrap();
        let request = session.begin_submit().unwrap();

        session.finish_submit(request.generation, Err(SubmitError::Rejected(500)));
        assert_eq!(session.error(), Some(ANALYSIS_ERROR_MESSAGE));
        assert!(session.score().is_none());
        assert_eq!(session.state(), SessionState::Error);
    }

    #[test]
    fn test_stale_outcome_after_retake_is_discarded() {
        let log = Log::default();
        let mut session = active_session(&log);
        session.capture(FRAME.to_string()).unwrap();
        let request = session.begin_submit().unwrap();
        session.retake();

        assert!(!session.finish_submit(request.generation, Ok(response(0.9))));
        assert!(session.score().is_none());
        assert!(!session.is_loading());
    }

    #[test]
    fn test_late_outcome_from_previous_selection_is_discarded() {
        let log = Log::default();
        let mut session = active_session(&log);
        session.capture(FRAME.to_string()).unwrap();
        let first = session.begin_submit().unwrap();

        session.select_emotion(EmotionLabel::Sad);
        assert!(session.begin_acquire());
        session.finish_acquire(Ok(stream(2, &log))).unwrap();
        session.capture(FRAME.to_string()).unwrap();
        let second = session.begin_submit().unwrap();
        assert_eq!(second.emotion, "슬픈, 우울한 표정");
        assert_ne!(first.generation, second.generation);

        assert!(!session.finish_submit(first.generation, Ok(response(0.9))));
        assert!(session.is_loading());
        assert!(session.score().is_none());
        assert_eq!(session.state(), SessionState::Analyzing);

        assert!(session.finish_submit(second.generation, Ok(response(0.42))));
        assert_eq!(session.score(), Some(42.0));
        assert_eq!(session.state(), SessionState::Result);
    }

    #[test]
    fn test_retake_during_analysis_returns_to_live_camera() {
        let log = Log::default();
        let mut session = active_session(&log);
        session.capture(FRAME.to_string()).unwrap();
        let request = session.begin_submit().unwrap();
        assert_eq!(session.state(), SessionState::Analyzing);

        assert!(session.retake());
        assert!(!session.is_loading());
        assert!(session.begin_acquire());
        session.finish_acquire(Ok(stream(2, &log))).unwrap();
        assert_eq!(session.state(), SessionState::CameraActive);

        let stale = Err(SubmitError::Rejected(500));
        assert!(!session.finish_submit(request.generation, stale));
        assert!(session.error().is_none());
        assert_eq!(session.state(), SessionState::CameraActive);

        session.capture(FRAME.to_string()).unwrap();
        assert!(session.begin_submit().is_ok());
    }

    #[test]
    fn test_retake_returns_to_camera_without_reselect() {
        let log = Log::default();
        let mut session = active_session(&log);
        session.capture(FRAME.to_string()).unwrap();
        let request = session.begin_submit().unwrap();
        session.finish_submit(request.generation, Ok(response(0.837)));
        assert_eq!(session.state(), SessionState::Result);

        assert!(session.retake());
        assert!(session.score().is_none());
        assert!(session.error().is_none());
        assert!(session.captured_image().is_none());
        assert_eq!(session.emotion(), Some(EmotionLabel::Happy));

        assert!(session.begin_acquire());
        session.finish_acquire(Ok(stream(2, &log))).unwrap();
        assert_eq!(session.state(), SessionState::CameraActive);
    }

    #[test]
    fn test_release_is_idempotent() {
        let log = Log::default();
        let mut session = active_session(&log);
        session.release_camera();
        session.release_camera();
        assert_eq!(*log.borrow(), vec!["stop 1"]);
    }

    #[test]
    fn test_drop_releases_stream() {
        let log = Log::default();
        {
            let _session = active_session(&log);
        }
        assert_eq!(*log.borrow(), vec!["stop 1"]);
    }
}

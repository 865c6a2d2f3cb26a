use js_sys::{Object, Reflect};
use shared::{CameraError, CameraStream};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, DomException, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

/// Browser camera stream owned by the capture session.
pub struct MediaStreamHandle(MediaStream);

impl MediaStreamHandle {
    pub fn media_stream(&self) -> &MediaStream {
        &self.0
    }
}

impl CameraStream for MediaStreamHandle {
    fn stop(&mut self) {
        for track in self.0.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        log::info!("Camera stream {} stopped", self.0.id());
    }
}

/// Requests the user-facing camera.
pub async fn acquire_user_camera() -> Result<MediaStreamHandle, CameraError> {
    let window = web_sys::window().ok_or(CameraError::Unsupported)?;
    let media_devices = window
        .navigator()
        .media_devices()
        .map_err(|_| CameraError::Unsupported)?;

    let video = Object::new();
    Reflect::set(&video, &"facingMode".into(), &"user".into())
        .map_err(|e| CameraError::Other(js_error_message(&e)))?;
    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video.into());

    let promise = media_devices
        .get_user_media_with_constraints(&constraints)
        .map_err(classify_media_error)?;
    let stream = JsFuture::from(promise)
        .await
        .map_err(classify_media_error)?
        .dyn_into::<MediaStream>()
        .map_err(|_| CameraError::Other("getUserMedia did not return a MediaStream".into()))?;

    log::info!("Camera stream {} acquired", stream.id());
    Ok(MediaStreamHandle(stream))
}

/// Points `video` at the session's stream, or detaches it when there is none.
pub fn sync_video(video: &HtmlVideoElement, stream: Option<&MediaStreamHandle>) {
    let wanted = stream.map(MediaStreamHandle::media_stream);
    let current = video.src_object();
    let same = match (&current, wanted) {
        (Some(current), Some(wanted)) => current.id() == wanted.id(),
        (None, None) => true,
        _ => false,
    };
    if !same {
        video.set_src_object(wanted);
    }
}

/// Draws the current video frame horizontally mirrored, matching the
/// preview the user saw, and encodes it as a JPEG data URI.
pub fn capture_mirrored_frame(video: &HtmlVideoElement) -> Result<String, CameraError> {
    let to_err = |e: JsValue| CameraError::Other(js_error_message(&e));

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(CameraError::Unsupported)?;
    let canvas = document
        .create_element("canvas")
        .map_err(to_err)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| CameraError::Other("failed to create canvas".into()))?;

    let width = video.video_width();
    let height = video.video_height();
    if width == 0 || height == 0 {
        return Err(CameraError::Other("video frame is not ready".into()));
    }
    canvas.set_width(width);
    canvas.set_height(height);

    let context = canvas
        .get_context("2d")
        .map_err(to_err)?
        .ok_or_else(|| CameraError::Other("2d context unavailable".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| CameraError::Other("2d context unavailable".into()))?;

    context.translate(width as f64, 0.0).map_err(to_err)?;
    context.scale(-1.0, 1.0).map_err(to_err)?;
    context
        .draw_image_with_html_video_element_and_dw_and_dh(
            video,
            0.0,
            0.0,
            width as f64,
            height as f64,
        )
        .map_err(to_err)?;

    canvas.to_data_url_with_type("image/jpeg").map_err(to_err)
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn classify_media_error(err: JsValue) -> CameraError {
    gloo_console::error!("Camera access error:", err.clone());
    match err.dyn_ref::<DomException>().map(|e| e.name()) {
        Some(name) if name == "NotAllowedError" || name == "SecurityError" => {
            CameraError::PermissionDenied
        }
        Some(name) if name == "NotFoundError" || name == "OverconstrainedError" => {
            CameraError::NoDevice
        }
        _ => CameraError::Other(js_error_message(&err)),
    }
}

fn js_error_message(err: &JsValue) -> String {
    if let Some(exception) = err.dyn_ref::<DomException>() {
        return format!("{}: {}", exception.name(), exception.message());
    }
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

use super::super::{Model, Msg};
use crate::api::submit_for_analysis;
use crate::camera::{self, acquire_user_camera, capture_mirrored_frame, MediaStreamHandle};
use shared::{CAMERA_ALERT_MESSAGE, CameraError, EmotionLabel, PredictionResponse, SubmitError};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlVideoElement;
use yew::prelude::*;

pub fn handle_select_emotion(model: &mut Model, ctx: &Context<Model>, label: EmotionLabel) -> bool {
    log::info!("Emotion selected: {}", label.code());
    if model.session.select_emotion(label) {
        start_camera(model, ctx);
    }
    true
}

/// Kicks off camera acquisition unless one is already in flight.
pub fn start_camera(model: &mut Model, ctx: &Context<Model>) {
    if !model.session.begin_acquire() {
        log::debug!("Camera acquisition skipped");
        return;
    }

    let link = ctx.link().clone();
    spawn_local(async move {
        let result = acquire_user_camera().await;
        link.send_message(Msg::CameraReady(result));
    });
}

pub fn handle_camera_ready(
    model: &mut Model,
    result: Result<MediaStreamHandle, CameraError>,
) -> bool {
    if let Err(e) = model.session.finish_acquire(result) {
        log::error!("Failed to start camera: {}", e);
        camera::alert(CAMERA_ALERT_MESSAGE);
    }
    true
}

pub fn handle_capture_and_analyze(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(video) = model.video_ref.cast::<HtmlVideoElement>() else {
        log::warn!("Capture requested without a video surface");
        return false;
    };

    let frame = match capture_mirrored_frame(&video) {
        Ok(frame) => frame,
        Err(e) => {
            log::warn!("Frame capture failed: {}", e);
            return false;
        }
    };

    if let Err(e) = model.session.capture(frame) {
        log::warn!("Capture rejected: {}", e);
        return false;
    }
    camera::sync_video(&video, None);

    match model.session.begin_submit() {
        Ok(request) => {
            let link = ctx.link().clone();
            let generation = request.generation;
            spawn_local(async move {
                let result = submit_for_analysis(request).await;
                link.send_message(Msg::AnalysisFinished(generation, result));
            });
        }
        Err(e) => log::error!("Cannot submit capture: {}", e),
    }
    true
}

pub fn handle_analysis_finished(
    model: &mut Model,
    generation: u64,
    result: Result<PredictionResponse, SubmitError>,
) -> bool {
    match &result {
        Ok(response) if response.top_prediction().is_none() => {
            log::warn!("Relay response carried no prediction; leaving result empty");
        }
        Ok(response) => {
            if let Some(top) = response.top_prediction() {
                log::info!("Top prediction {} at {}", top.label, top.probability);
            }
        }
        Err(e) => log::error!("Analysis failed: {}", e),
    }

    if !model.session.finish_submit(generation, result) {
        log::info!("Discarded analysis result from capture cycle {}", generation);
    }
    true
}

pub fn handle_retake(model: &mut Model, ctx: &Context<Model>) -> bool {
    if model.session.retake() {
        start_camera(model, ctx);
    }
    true
}

pub fn handle_release_camera(model: &mut Model) -> bool {
    model.session.release_camera();
    if let Some(video) = model.video_ref.cast::<HtmlVideoElement>() {
        camera::sync_video(&video, None);
    }
    true
}

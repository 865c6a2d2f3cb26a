mod api;
mod camera;
mod components;

use camera::MediaStreamHandle;
use components::camera_view::render_camera_view;
use components::emotion_picker::render_emotion_picker;
use components::handlers;
use components::header::{render_header, render_tips};
use components::results::render_results;
use gloo_events::EventListener;
use shared::{CameraError, CaptureSession, EmotionLabel, PredictionResponse, SubmitError};
use web_sys::HtmlVideoElement;
use yew::prelude::*;

// Yew msg components
enum Msg {
    // Session transitions
    SelectEmotion(EmotionLabel),
    CameraReady(Result<MediaStreamHandle, CameraError>),
    CaptureAndAnalyze,
    AnalysisFinished(u64, Result<PredictionResponse, SubmitError>),
    Retake,

    // Page lifecycle
    ReleaseCamera,
}

// Main component
struct Model {
    session: CaptureSession<MediaStreamHandle>,
    video_ref: NodeRef,
    pagehide_listener: Option<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut model = Self {
            session: CaptureSession::new(),
            video_ref: NodeRef::default(),
            pagehide_listener: None,
        };

        // Closing or navigating away from the tab must not leave the camera on.
        let link = ctx.link().clone();
        let window = web_sys::window().expect("no global `window` exists");
        let listener = EventListener::new(&window, "pagehide", move |_| {
            link.send_message(Msg::ReleaseCamera);
        });
        model.pagehide_listener = Some(listener);

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SelectEmotion(label) => handlers::handle_select_emotion(self, ctx, label),
            Msg::CameraReady(result) => handlers::handle_camera_ready(self, result),
            Msg::CaptureAndAnalyze => handlers::handle_capture_and_analyze(self, ctx),
            Msg::AnalysisFinished(generation, result) => {
                handlers::handle_analysis_finished(self, generation, result)
            }
            Msg::Retake => handlers::handle_retake(self, ctx),
            Msg::ReleaseCamera => handlers::handle_release_camera(self),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                    <section class="side-panel">
                        { render_tips() }
                        { render_emotion_picker(self, ctx) }
                    </section>
                    <section class="capture-panel">
                        {
                            if self.session.emotion().is_some() {
                                html! {
                                    <>
                                        { render_camera_view(self, ctx) }
                                        { render_results(self) }
                                    </>
                                }
                            } else {
                                html! {
                                    <div class="select-prompt">{"감정을 선택해주세요"}</div>
                                }
                            }
                        }
                    </section>
                </main>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if let Some(video) = self.video_ref.cast::<HtmlVideoElement>() {
            camera::sync_video(&video, self.session.stream());
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        handlers::handle_release_camera(self);
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}

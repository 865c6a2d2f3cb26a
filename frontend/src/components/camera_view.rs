use super::super::{Model, Msg};
use super::utils::debounce;
use yew::prelude::*;

pub fn render_camera_view(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(emotion) = model.session.emotion() else {
        return html! {};
    };

    html! {
        <div class="camera-card">
            <p class="capture-prompt">
                { format!("{} {}을 찍어 보세요!", emotion.emoticon(), emotion) }
            </p>
            <div class="camera-frame">
                { render_surface(model) }
            </div>
            <div class="button-container">
                { render_action_button(model, ctx) }
            </div>
        </div>
    }
}

fn render_surface(model: &Model) -> Html {
    match model.session.captured_image() {
        Some(image) => html! {
            <img class="captured-image" src={image.to_string()} alt="Captured" />
        },
        None => html! {
            <>
                <video
                    ref={model.video_ref.clone()}
                    class="live-preview"
                    autoplay=true
                    playsinline=true
                    muted=true
                    style="transform: scaleX(-1);"
                />
                {
                    if model.session.is_initializing() {
                        html! { <div class="camera-status">{"카메라 준비 중..."}</div> }
                    } else {
                        html! {}
                    }
                }
            </>
        },
    }
}

fn render_action_button(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link().clone();

    if model.session.captured_image().is_some() {
        html! {
            <button
                class="retake-btn"
                onclick={link.callback(|_| Msg::Retake)}
            >
                {"다시 찍기"}
            </button>
        }
    } else {
        html! {
            <button
                class="capture-btn"
                onclick={debounce(300, {
                    let link = link.clone();
                    move || link.send_message(Msg::CaptureAndAnalyze)
                })}
                disabled={model.session.stream().is_none() || model.session.is_loading()}
            >
                <i class="fa-solid fa-camera"></i>{" 사진 찍기"}
            </button>
        }
    }
}

use super::super::Model;
use shared::SessionState;
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    let session = &model.session;

    html! {
        <div class="results-container">
            <h2>{"표정 분석 결과"}</h2>
            {
                match session.state() {
                    SessionState::Analyzing => html! {
                        <div class="analyzing"><i class="fa-solid fa-spinner fa-spin"></i>{" 분석중..."}</div>
                    },
                    SessionState::Error => html! {
                        <div class="error-message">
                            <i class="fa-solid fa-circle-exclamation"></i>
                            <p>{ session.error().unwrap_or_default() }</p>
                        </div>
                    },
                    _ => html! {
                        <span class="score">{ session.score_label() }</span>
                    },
                }
            }
        </div>
    }
}

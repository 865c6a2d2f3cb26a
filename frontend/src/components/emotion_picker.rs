use super::super::{Model, Msg};
use shared::EmotionLabel;
use yew::prelude::*;

pub fn render_emotion_picker(model: &Model, ctx: &Context<Model>) -> Html {
    let selected = model.session.emotion();

    html! {
        <div class="emotion-picker">
            <h2>{"감정 선택"}</h2>
            <div class="emotion-grid">
                { for EmotionLabel::all().into_iter().map(|label| {
                    let is_selected = selected == Some(label);
                    html! {
                        <button
                            key={label.code()}
                            class={classes!("emotion-btn", label.code(), is_selected.then_some("selected"))}
                            onclick={ctx.link().callback(move |_| Msg::SelectEmotion(label))}
                        >
                            <span class="emoticon">{ label.emoticon() }</span>
                            <span class="emotion-label">{ label.to_string() }</span>
                        </button>
                    }
                })}
            </div>
        </div>
    }
}

use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1>{"😊 표정 분석"}</h1>
            <p class="subtitle">{"감정을 고르고, 그 표정을 지어 사진을 찍어 보세요"}</p>
        </header>
    }
}

pub fn render_tips() -> Html {
    html! {
        <div class="tips-panel">
            <h2>{"촬영 시 주의사항 ✨"}</h2>
            <ul>
                <li><span class="tip-icon">{"💡"}</span>{"밝은 곳에서 촬영해주세요"}</li>
                <li><span class="tip-icon">{"📱"}</span>{"얼굴을 카메라에 가까이 해주세요"}</li>
                <li><span class="tip-icon">{"🎭"}</span>{"표정을 최대한 뚜렷하고 분명하게 지어주세요"}</li>
            </ul>
        </div>
    }
}

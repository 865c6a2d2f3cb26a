use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Expression the user is asked to make in front of the camera.
///
/// The display form is the prompt string the upstream model was trained on,
/// so it doubles as the `emotion` multipart field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    AsRefStr,
)]
pub enum EmotionLabel {
    #[strum(serialize = "행복한, 좋은 표정")]
    #[serde(rename = "행복한, 좋은 표정")]
    Happy,
    #[strum(serialize = "짜증난, 싫은 표정")]
    #[serde(rename = "짜증난, 싫은 표정")]
    Annoyed,
    #[strum(serialize = "두려운, 무서운 표정")]
    #[serde(rename = "두려운, 무서운 표정")]
    Fearful,
    #[strum(serialize = "화난, 분노의 표정")]
    #[serde(rename = "화난, 분노의 표정")]
    Angry,
    #[strum(serialize = "슬픈, 우울한 표정")]
    #[serde(rename = "슬픈, 우울한 표정")]
    Sad,
    #[strum(serialize = "놀란, 놀라는 표정")]
    #[serde(rename = "놀란, 놀라는 표정")]
    Surprised,
    #[strum(serialize = "덤덤한, 무표정")]
    #[serde(rename = "덤덤한, 무표정")]
    Neutral,
}

impl EmotionLabel {
    pub fn all() -> Vec<EmotionLabel> {
        EmotionLabel::iter().collect()
    }

    pub fn emoticon(&self) -> &'static str {
        match self {
            EmotionLabel::Happy => "😄",
            EmotionLabel::Annoyed => "😣",
            EmotionLabel::Fearful => "😨",
            EmotionLabel::Angry => "😠",
            EmotionLabel::Sad => "😢",
            EmotionLabel::Surprised => "😲",
            EmotionLabel::Neutral => "😐",
        }
    }

    /// ASCII identifier for logs and CSS classes.
    pub fn code(&self) -> &'static str {
        match self {
            EmotionLabel::Happy => "happy",
            EmotionLabel::Annoyed => "annoyed",
            EmotionLabel::Fearful => "fearful",
            EmotionLabel::Angry => "angry",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Surprised => "surprised",
            EmotionLabel::Neutral => "neutral",
        }
    }
}

mod ids;
mod lesson;
mod quiz;
mod video;

pub use ids::{OptionLabel, ParseIdError, VideoId};

pub use lesson::{LessonDraft, LessonDuration, LessonRequest, LessonRequestError, Randomness};
pub use quiz::{QuestionError, QuizOption, QuizQuestion};
pub use video::{VideoDescriptor, VideoError, VideoList, extract_identifier, thumbnail_url};

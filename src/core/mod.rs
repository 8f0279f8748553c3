pub mod controller;
pub mod renderer;

pub use crate::domain::model::{AnswerValue, Question, QuestionKind, Session};
pub use crate::domain::ports::{ConfigProvider, Presenter, QuestionService};
pub use crate::utils::error::Result;

use crate::core::controller::QuizPhase;
use crate::domain::model::{Question, QuestionKind, Session};
use crate::domain::view::{
    BlankInput, ChoiceList, Message, OrderingBoard, QuestionScreen, Screen, SetupDefaults, Widget,
};
use chrono::{DateTime, Utc};

/// UI state the controller owns next to the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub message: Option<Message>,
    /// The current question was answered correctly and waits to be advanced past.
    pub answered: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Everything a screen is computed from.
#[derive(Debug, Clone, Copy)]
pub struct ViewState<'a> {
    pub phase: QuizPhase,
    pub session: Option<&'a Session>,
    pub ui: &'a UiState,
    pub defaults: &'a SetupDefaults,
}

pub struct QuestionRenderer;

impl QuestionRenderer {
    /// Fresh interaction widget for a question, seeded in the order received.
    pub fn widget_for(question: &Question) -> Widget {
        match question.kind {
            QuestionKind::MultipleChoice => {
                Widget::Choices(ChoiceList::new(question.options().to_vec()))
            }
            QuestionKind::FillInBlank => Widget::Blank(BlankInput::default()),
            QuestionKind::Ordering => {
                Widget::Ordering(OrderingBoard::new(question.options().to_vec()))
            }
        }
    }

    pub fn render(view: ViewState<'_>) -> Screen {
        match (view.phase, view.session) {
            (QuizPhase::Loading, _) => Screen::Loading {
                request: view.defaults.clone(),
            },
            (QuizPhase::InProgress, Some(session)) => match session.current_question() {
                Some(question) => {
                    Screen::Question(Self::question_screen(session, question, view.ui))
                }
                None => Self::summary_screen(session, view.ui),
            },
            (QuizPhase::Complete, Some(session)) => Self::summary_screen(session, view.ui),
            _ => Screen::Setup {
                defaults: view.defaults.clone(),
                message: view.ui.message.clone(),
            },
        }
    }

    fn question_screen(session: &Session, question: &Question, ui: &UiState) -> QuestionScreen {
        QuestionScreen {
            position: session.current_index() + 1,
            total: session.total(),
            score: session.score(),
            attempts: session.attempts(),
            prompt: question.prompt.clone(),
            code_snippet: question.code_snippet.clone(),
            widget: Self::widget_for(question),
            message: ui.message.clone(),
            answered: ui.answered,
        }
    }

    fn summary_screen(session: &Session, ui: &UiState) -> Screen {
        let summary = session.summary(ui.completed_at.unwrap_or_else(|| session.started_at()));
        let headline = summary.headline();
        Screen::Summary { summary, headline }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::QuestionBatch;

    fn session() -> Session {
        let batch = QuestionBatch {
            session_id: "s-1".into(),
            questions: vec![
                Question {
                    question_id: "q-1".into(),
                    kind: QuestionKind::Ordering,
                    prompt: "Order the loop steps".into(),
                    code_snippet: Some("for (;;) {}".into()),
                    options: Some(vec!["init".into(), "test".into(), "update".into()]),
                },
                Question {
                    question_id: "q-2".into(),
                    kind: QuestionKind::FillInBlank,
                    prompt: "Fill it".into(),
                    code_snippet: None,
                    options: None,
                },
            ],
        };
        Session::from_batch(batch, Utc::now()).unwrap()
    }

    fn defaults() -> SetupDefaults {
        SetupDefaults {
            topic: "loops".into(),
            difficulty: "easy".into(),
            count: 2,
        }
    }

    #[test]
    fn test_setup_screen_carries_message() {
        let ui = UiState {
            message: Some(Message::error("boom")),
            ..UiState::default()
        };
        let defaults = defaults();
        let screen = QuestionRenderer::render(ViewState {
            phase: QuizPhase::Setup,
            session: None,
            ui: &ui,
            defaults: &defaults,
        });
        assert_eq!(
            screen,
            Screen::Setup {
                defaults: defaults.clone(),
                message: Some(Message::error("boom")),
            }
        );
    }

    #[test]
    fn test_question_screen_shows_snippet_and_seeded_board() {
        let session = session();
        let ui = UiState::default();
        let defaults = defaults();
        let screen = QuestionRenderer::render(ViewState {
            phase: QuizPhase::InProgress,
            session: Some(&session),
            ui: &ui,
            defaults: &defaults,
        });

        let Screen::Question(q) = screen else {
            panic!("expected a question screen");
        };
        assert_eq!(q.position, 1);
        assert_eq!(q.total, 2);
        assert_eq!(q.code_snippet.as_deref(), Some("for (;;) {}"));
        let Widget::Ordering(board) = q.widget else {
            panic!("expected an ordering board");
        };
        assert_eq!(board.items(), ["init", "test", "update"]);
    }

    #[test]
    fn test_blank_widget_starts_empty() {
        let session = session();
        let widget = QuestionRenderer::widget_for(&session.questions()[1]);
        assert_eq!(widget, Widget::Blank(BlankInput::default()));
    }

    #[test]
    fn test_complete_phase_renders_summary() {
        let session = session();
        let ui = UiState::default();
        let defaults = defaults();
        let screen = QuestionRenderer::render(ViewState {
            phase: QuizPhase::Complete,
            session: Some(&session),
            ui: &ui,
            defaults: &defaults,
        });
        let Screen::Summary { headline, .. } = screen else {
            panic!("expected the summary");
        };
        assert_eq!(headline, "You scored 0 / 2");
    }
}

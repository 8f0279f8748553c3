//! Presentation-independent description of what the player sees.
//!
//! Widgets carry their own interaction state (typed text, current item
//! order) so a front-end only has to forward input events and hand the
//! resulting [`AnswerValue`] back to the controller.

use crate::domain::model::{AnswerValue, SessionSummary};
use crate::domain::ports::ConfigProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

/// Topic, difficulty and count offered on the setup screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupDefaults {
    pub topic: String,
    pub difficulty: String,
    pub count: u32,
}

impl SetupDefaults {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            topic: config.topic().to_string(),
            difficulty: config.difficulty().to_string(),
            count: config.question_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Setup {
        defaults: SetupDefaults,
        message: Option<Message>,
    },
    Loading {
        request: SetupDefaults,
    },
    Question(QuestionScreen),
    Summary {
        summary: SessionSummary,
        headline: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionScreen {
    /// 1-based position shown to the player.
    pub position: usize,
    pub total: usize,
    pub score: usize,
    pub attempts: u32,
    pub prompt: String,
    pub code_snippet: Option<String>,
    pub widget: Widget,
    pub message: Option<Message>,
    /// Set while the question waits to be advanced past after a correct answer.
    pub answered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    Choices(ChoiceList),
    Blank(BlankInput),
    Ordering(OrderingBoard),
}

/// Options rendered as discrete controls; picking one is the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceList {
    options: Vec<String>,
}

impl ChoiceList {
    pub fn new(options: Vec<String>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn select(&self, index: usize) -> Option<AnswerValue> {
        self.options
            .get(index)
            .map(|option| AnswerValue::Text(option.clone()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlankInput {
    text: String,
}

impl BlankInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Empty input is submitted as-is; the service decides.
    pub fn submit(&self) -> AnswerValue {
        AnswerValue::Text(self.text.clone())
    }
}

/// Reorderable list seeded in the order the question arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingBoard {
    items: Vec<String>,
    dragged: Option<usize>,
}

impl OrderingBoard {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            dragged: None,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn dragged(&self) -> Option<usize> {
        self.dragged
    }

    /// Move the item at `from` so that it ends up at index `to`.
    /// Targets past the end append. Returns false for an unknown `from`.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() {
            return false;
        }
        let item = self.items.remove(from);
        let to = to.min(self.items.len());
        self.items.insert(to, item);
        true
    }

    pub fn start_drag(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.dragged = Some(index);
        true
    }

    /// Drop the dragged item. Over another item it lands immediately before
    /// that item; anywhere else (including over itself) it goes to the end.
    pub fn drop_on(&mut self, target: Option<usize>) -> bool {
        let Some(from) = self.dragged.take() else {
            return false;
        };

        match target {
            Some(target) if target != from && target < self.items.len() => {
                let to = if from < target { target - 1 } else { target };
                self.move_item(from, to)
            }
            _ => self.move_item(from, self.items.len()),
        }
    }

    /// Current visual order, verbatim.
    pub fn submit(&self) -> AnswerValue {
        AnswerValue::Sequence(self.items.clone())
    }
}

use crate::core::controller::SessionController;
use crate::core::{AnswerValue, Presenter, QuestionService};
use crate::domain::view::{BlankInput, MessageKind, OrderingBoard, Screen, Widget};
use crate::utils::error::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Writes screens as plain text.
pub struct TerminalPresenter<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn notice(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!("Could not write to terminal: {}", e);
        }
    }

    pub fn show_board(&mut self, board: &OrderingBoard) {
        if let Err(e) = self.write_board(board) {
            tracing::warn!("Could not write to terminal: {}", e);
        }
    }

    fn write_board(&mut self, board: &OrderingBoard) -> std::io::Result<()> {
        for (i, item) in board.items().iter().enumerate() {
            writeln!(self.out, "  {}. {}", i + 1, item)?;
        }
        Ok(())
    }

    fn write_screen(&mut self, screen: &Screen) -> std::io::Result<()> {
        match screen {
            Screen::Setup { defaults, message } => {
                writeln!(self.out)?;
                writeln!(self.out, "=== Code Quiz ===")?;
                writeln!(
                    self.out,
                    "Topic: {} | Difficulty: {} | Questions: {}",
                    defaults.topic, defaults.difficulty, defaults.count
                )?;
                if let Some(message) = message {
                    writeln!(self.out, "{}", format_message(message.kind, &message.text))?;
                }
                writeln!(
                    self.out,
                    "Press Enter to start, or type: start <topic> <difficulty> <count>  (:quit to exit)"
                )?;
            }
            Screen::Loading { request } => {
                writeln!(
                    self.out,
                    "⏳ Generating {} {} questions about {}...",
                    request.count, request.difficulty, request.topic
                )?;
            }
            Screen::Question(q) => {
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "--- Question {}/{} (score {}) ---",
                    q.position, q.total, q.score
                )?;
                writeln!(self.out, "{}", q.prompt)?;
                if let Some(code) = &q.code_snippet {
                    writeln!(self.out)?;
                    for line in code.lines() {
                        writeln!(self.out, "    {}", line)?;
                    }
                    writeln!(self.out)?;
                }
                if let Some(message) = &q.message {
                    writeln!(self.out, "{}", format_message(message.kind, &message.text))?;
                }
                if q.answered {
                    return Ok(());
                }
                match &q.widget {
                    Widget::Choices(choices) => {
                        for (i, option) in choices.options().iter().enumerate() {
                            writeln!(self.out, "  {}) {}", i + 1, option)?;
                        }
                        writeln!(self.out, "Type the number of your answer.")?;
                    }
                    Widget::Blank(_) => {
                        writeln!(self.out, "Type your answer and press Enter.")?;
                    }
                    Widget::Ordering(board) => {
                        self.write_board(board)?;
                        writeln!(
                            self.out,
                            "Commands: move <from> <to> | end <from> | submit (or Enter)"
                        )?;
                    }
                }
            }
            Screen::Summary { summary, headline } => {
                let took = summary.completed_at - summary.started_at;
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "🏁 {} (took {}s)",
                    headline,
                    took.num_seconds().max(0)
                )?;
                writeln!(self.out, "Press Enter to play again, :quit to exit.")?;
            }
        }
        Ok(())
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn present(&mut self, screen: &Screen) {
        if let Err(e) = self.write_screen(screen).and_then(|_| self.out.flush()) {
            tracing::warn!("Could not write to terminal: {}", e);
        }
    }
}

fn format_message(kind: MessageKind, text: &str) -> String {
    match kind {
        MessageKind::Success => format!("✅ {}", text),
        MessageKind::Error => format!("❌ {}", text),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Restart,
    Show,
    Start {
        topic: Option<String>,
        difficulty: Option<String>,
        count: Option<u32>,
    },
    /// 0-based option index.
    Choose(usize),
    Text(String),
    /// Drag item `from` onto item `to` (both 0-based).
    MoveBefore { from: usize, to: usize },
    MoveToEnd(usize),
    SubmitOrder,
    Unknown(String),
}

/// Interpret one input line in the context of the screen currently shown.
pub fn parse_command(line: &str, screen: &Screen) -> Command {
    let line = line.trim_end_matches('\r');
    let trimmed = line.trim();
    match trimmed {
        ":quit" | ":q" => return Command::Quit,
        ":restart" => return Command::Restart,
        ":show" => return Command::Show,
        _ => {}
    }

    let unknown = || Command::Unknown(trimmed.to_string());
    match screen {
        Screen::Setup { .. } => parse_start(trimmed).unwrap_or_else(unknown),
        Screen::Summary { .. } if trimmed.is_empty() => Command::Restart,
        Screen::Question(q) if !q.answered => match &q.widget {
            Widget::Choices(_) => match trimmed.parse::<usize>() {
                Ok(n) if n >= 1 => Command::Choose(n - 1),
                _ => unknown(),
            },
            Widget::Blank(_) => Command::Text(line.to_string()),
            Widget::Ordering(_) => parse_ordering(trimmed).unwrap_or_else(unknown),
        },
        _ => unknown(),
    }
}

fn parse_start(trimmed: &str) -> Option<Command> {
    if trimmed.is_empty() {
        return Some(Command::Start {
            topic: None,
            difficulty: None,
            count: None,
        });
    }

    let mut words = trimmed.split_whitespace();
    if words.next()? != "start" {
        return None;
    }
    let topic = words.next().map(str::to_string);
    let difficulty = words.next().map(str::to_string);
    let count = match words.next() {
        Some(n) => Some(n.parse().ok()?),
        None => None,
    };
    Some(Command::Start {
        topic,
        difficulty,
        count,
    })
}

fn parse_ordering(trimmed: &str) -> Option<Command> {
    let words: Vec<&str> = trimmed.split_whitespace().collect();
    let position = |word: &str| word.parse::<usize>().ok().filter(|n| *n >= 1).map(|n| n - 1);

    match words.as_slice() {
        [] | ["submit"] => Some(Command::SubmitOrder),
        ["move", from, to] => Some(Command::MoveBefore {
            from: position(*from)?,
            to: position(*to)?,
        }),
        ["end", from] => Some(Command::MoveToEnd(position(*from)?)),
        _ => None,
    }
}

/// Board for the question on screen, kept across reorder commands until the
/// controller moves on.
fn ordering_board<'a>(
    local: &'a mut Option<Widget>,
    screen: &Screen,
) -> Option<&'a mut OrderingBoard> {
    if local.is_none() {
        if let Screen::Question(q) = screen {
            *local = Some(q.widget.clone());
        }
    }
    match local {
        Some(Widget::Ordering(board)) => Some(board),
        _ => None,
    }
}

/// Play quizzes until the input ends or the player quits.
pub async fn run<S, W, R>(
    controller: &mut SessionController<S, TerminalPresenter<W>>,
    input: R,
) -> Result<()>
where
    S: QuestionService,
    W: Write + Send,
    R: AsyncBufRead + Unpin,
{
    controller.show();
    let mut lines = input.lines();
    let mut local_widget: Option<Widget> = None;

    while let Some(line) = lines.next_line().await? {
        let screen = controller.screen();
        let command = parse_command(&line, &screen);
        tracing::debug!("Command: {:?}", command);

        match command {
            Command::Quit => break,
            Command::Restart => {
                controller.restart().await;
                local_widget = None;
            }
            Command::Show => controller.show(),
            Command::Start {
                topic,
                difficulty,
                count,
            } => {
                let defaults = controller.defaults().clone();
                let topic = topic.unwrap_or(defaults.topic);
                let difficulty = difficulty.unwrap_or(defaults.difficulty);
                let count = count.unwrap_or(defaults.count);
                if let Err(e) = controller.start_session(&topic, &difficulty, count).await {
                    tracing::debug!("Start failed: {}", e);
                }
                local_widget = None;
            }
            Command::Choose(index) => {
                let answer = match &screen {
                    Screen::Question(q) => match &q.widget {
                        Widget::Choices(choices) => choices.select(index),
                        _ => None,
                    },
                    _ => None,
                };
                match answer {
                    Some(answer) => {
                        submit(controller, answer).await;
                        local_widget = None;
                    }
                    None => controller
                        .presenter_mut()
                        .notice(&format!("There is no option {}.", index + 1)),
                }
            }
            Command::Text(text) => {
                let mut input = BlankInput::default();
                input.set_text(text);
                submit(controller, input.submit()).await;
                local_widget = None;
            }
            Command::MoveBefore { from, to } => {
                let moved = ordering_board(&mut local_widget, &screen)
                    .map(|board| board.start_drag(from) && board.drop_on(Some(to)));
                show_local_board(controller, &local_widget, moved);
            }
            Command::MoveToEnd(from) => {
                let moved = ordering_board(&mut local_widget, &screen)
                    .map(|board| board.start_drag(from) && board.drop_on(None));
                show_local_board(controller, &local_widget, moved);
            }
            Command::SubmitOrder => {
                if let Some(board) = ordering_board(&mut local_widget, &screen) {
                    let answer = board.submit();
                    submit(controller, answer).await;
                }
                local_widget = None;
            }
            Command::Unknown(text) => {
                let hint = if text.is_empty() {
                    "Nothing to do here. Type :show to redraw or :quit to exit.".to_string()
                } else {
                    format!("Unrecognised input '{}'. Type :show to redraw.", text)
                };
                controller.presenter_mut().notice(&hint);
            }
        }
    }

    controller.wait_for_session_end().await;
    Ok(())
}

async fn submit<S, W>(
    controller: &mut SessionController<S, TerminalPresenter<W>>,
    answer: AnswerValue,
) where
    S: QuestionService,
    W: Write + Send,
{
    match controller.submit_answer(answer).await {
        Ok(outcome) => tracing::debug!("Outcome: {:?}", outcome),
        Err(e) if e.severity() == crate::utils::error::ErrorSeverity::Low => {
            controller.presenter_mut().notice(&e.user_friendly_message());
        }
        // Already shown inline by the controller.
        Err(e) => tracing::debug!("Submission failed: {}", e),
    }
}

fn show_local_board<S, W>(
    controller: &mut SessionController<S, TerminalPresenter<W>>,
    local: &Option<Widget>,
    moved: Option<bool>,
) where
    S: QuestionService,
    W: Write + Send,
{
    match (moved, local) {
        (Some(true), Some(Widget::Ordering(board))) => controller.presenter_mut().show_board(board),
        (Some(false), _) => controller.presenter_mut().notice("No item at that position."),
        _ => controller
            .presenter_mut()
            .notice("This question has no items to reorder."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::view::{ChoiceList, QuestionScreen, SetupDefaults};

    fn question_screen(widget: Widget) -> Screen {
        Screen::Question(QuestionScreen {
            position: 1,
            total: 1,
            score: 0,
            attempts: 0,
            prompt: "?".into(),
            code_snippet: None,
            widget,
            message: None,
            answered: false,
        })
    }

    fn setup_screen() -> Screen {
        Screen::Setup {
            defaults: SetupDefaults {
                topic: "loops".into(),
                difficulty: "mixed".into(),
                count: 5,
            },
            message: None,
        }
    }

    #[test]
    fn test_global_commands() {
        let screen = setup_screen();
        assert_eq!(parse_command(":quit", &screen), Command::Quit);
        assert_eq!(parse_command(" :restart ", &screen), Command::Restart);
    }

    #[test]
    fn test_start_commands() {
        let screen = setup_screen();
        assert_eq!(
            parse_command("", &screen),
            Command::Start {
                topic: None,
                difficulty: None,
                count: None
            }
        );
        assert_eq!(
            parse_command("start arrays hard 3", &screen),
            Command::Start {
                topic: Some("arrays".into()),
                difficulty: Some("hard".into()),
                count: Some(3)
            }
        );
        assert!(matches!(
            parse_command("start arrays hard many", &screen),
            Command::Unknown(_)
        ));
    }

    #[test]
    fn test_choice_numbers_are_one_based() {
        let screen = question_screen(Widget::Choices(ChoiceList::new(vec!["a".into()])));
        assert_eq!(parse_command("1", &screen), Command::Choose(0));
        assert!(matches!(parse_command("0", &screen), Command::Unknown(_)));
    }

    #[test]
    fn test_blank_submits_raw_line() {
        let screen = question_screen(Widget::Blank(BlankInput::default()));
        assert_eq!(parse_command("", &screen), Command::Text(String::new()));
        assert_eq!(
            parse_command("  i < arr.length\r", &screen),
            Command::Text("  i < arr.length".into())
        );
    }

    #[test]
    fn test_ordering_commands() {
        let screen = question_screen(Widget::Ordering(OrderingBoard::new(vec!["a".into()])));
        assert_eq!(
            parse_command("move 3 1", &screen),
            Command::MoveBefore { from: 2, to: 0 }
        );
        assert_eq!(parse_command("end 1", &screen), Command::MoveToEnd(0));
        assert_eq!(parse_command("", &screen), Command::SubmitOrder);
        assert!(matches!(parse_command("move 0 1", &screen), Command::Unknown(_)));
    }

    #[test]
    fn test_presenter_writes_choices_and_snippet() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        let screen = Screen::Question(QuestionScreen {
            position: 2,
            total: 3,
            score: 1,
            attempts: 0,
            prompt: "Which keyword?".into(),
            code_snippet: Some("let x = 1;\nx++;".into()),
            widget: Widget::Choices(ChoiceList::new(vec!["let".into(), "var".into()])),
            message: None,
            answered: false,
        });
        presenter.present(&screen);

        let out = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(out.contains("--- Question 2/3 (score 1) ---"));
        assert!(out.contains("    let x = 1;\n    x++;"));
        assert!(out.contains("  2) var"));
    }
}

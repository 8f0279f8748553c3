use clap::Parser;
use code_quiz::app::terminal::{self, TerminalPresenter};
use code_quiz::core::ConfigProvider;
use code_quiz::domain::view::SetupDefaults;
use code_quiz::utils::error::{ErrorSeverity, QuizError};
use code_quiz::utils::{logger, validation::Validate};
use code_quiz::{CliConfig, HttpQuestionService, QuizPolicy, SessionController};
use tokio::io::BufReader;

fn exit_code(e: &QuizError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(e: QuizError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e).max(1));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 設定檔解析失敗時還沒有 logger，直接輸出到 stderr
    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e).max(1));
        }
    };

    if settings.log_json {
        logger::init_json_logger(settings.verbose);
    } else {
        logger::init_cli_logger(settings.verbose);
    }
    tracing::debug!("Settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        fail(e);
    }

    let service = HttpQuestionService::from_config(&settings).unwrap_or_else(|e| fail(e));
    match service.health().await {
        Ok(true) => tracing::info!("Question service at {} is up", service.base_url()),
        Ok(false) => tracing::warn!("Question service at {} reports unhealthy", service.base_url()),
        Err(e) => tracing::warn!("Question service at {} unreachable: {}", service.base_url(), e),
    }

    let presenter = TerminalPresenter::new(std::io::stdout());
    let mut controller = SessionController::new(
        service,
        presenter,
        SetupDefaults::from_config(&settings),
        QuizPolicy::from_config(&settings),
    )
    .with_language(settings.language());

    let stdin = BufReader::new(tokio::io::stdin());
    if let Err(e) = terminal::run(&mut controller, stdin).await {
        fail(e);
    }

    if controller.session().is_some() {
        controller.restart().await;
        controller.wait_for_session_end().await;
    }
    Ok(())
}

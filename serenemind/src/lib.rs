pub mod commands;
pub mod infrastructure;
pub mod modules;
pub mod shared;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use commands::{execute, render_message, ChatCommand, CommandOutput};
use modules::{ChatModule, ConfigModule};
use shared::AppResult;

/// 初始化日志；`RUST_LOG` 未设置时使用 `info`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 命令行对话入口
pub async fn run() -> AppResult<()> {
    // .env 需在日志初始化前加载，RUST_LOG 可能来自其中
    let env_file = dotenvy::dotenv();
    init_tracing();
    if let Ok(path) = env_file {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    tracing::info!("SereneMind starting...");

    let config_module = ConfigModule::new_with_store(".");
    let config = config_module.load().await?;
    if config.generator.api_key.is_empty() {
        tracing::warn!("Generator api key is not set; replies will use the fallback text");
    }

    let chat_module = ChatModule::new_with_persistence(&config).await?;
    let session = chat_module.primary_session().await?;

    let mut stdout = tokio::io::stdout();
    let snapshot = session.get_session().await?;
    for message in snapshot.tail(config.conversation.context_window) {
        stdout
            .write_all(format!("{}\n", render_message(message)).as_bytes())
            .await?;
    }
    stdout.write_all(b"(type /help for commands)\n").await?;
    stdout.flush().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = ChatCommand::parse(&line) else {
            continue;
        };

        match execute(&session, command).await? {
            CommandOutput::Print(text) => {
                stdout.write_all(format!("{}\n", text).as_bytes()).await?;
                stdout.flush().await?;
            }
            CommandOutput::Quit => break,
        }
    }

    tracing::info!("SereneMind shutting down");
    Ok(())
}

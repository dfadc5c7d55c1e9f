// Chat Commands
//
// 命令行入口的命令解析与执行，业务逻辑全部通过 Orchestrator 处理

use std::fmt::Write as _;

use crate::modules::chat::{Message, Orchestrator, Sender};
use crate::shared::AppResult;

/// 命令行输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// 普通消息
    Say(String),
    /// `/name <name>`；不带参数表示清除
    SetName(Option<String>),
    /// `/moods`
    Moods,
    /// `/history [page]`
    History { page: u32 },
    Help,
    Quit,
}

impl ChatCommand {
    /// 解析一行输入；空行返回 `None`
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let Some(rest) = line.strip_prefix('/') else {
            return Some(ChatCommand::Say(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        Some(match name {
            "name" => ChatCommand::SetName(Some(arg.to_string()).filter(|a| !a.is_empty())),
            "moods" => ChatCommand::Moods,
            "history" => ChatCommand::History {
                page: arg.parse().unwrap_or(1),
            },
            "help" => ChatCommand::Help,
            "quit" | "exit" => ChatCommand::Quit,
            // 未知命令按普通消息处理
            _ => ChatCommand::Say(line.to_string()),
        })
    }
}

/// 命令执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Print(String),
    Quit,
}

pub const HELP_TEXT: &str = "Commands:
  /name <name>     set your display name (no argument clears it)
  /moods           show your mood history summary
  /history [page]  show earlier messages
  /quit            leave the conversation";

const HISTORY_PAGE_SIZE: u32 = 10;

/// 执行命令
pub async fn execute(orchestrator: &Orchestrator, command: ChatCommand) -> AppResult<CommandOutput> {
    let output = match command {
        ChatCommand::Say(text) => {
            let response = orchestrator.submit_message(text).await?;
            render_message(&response.reply)
        }
        ChatCommand::SetName(name) => {
            let response = orchestrator.set_display_name(name).await?;
            match response.user_name {
                Some(name) => format!("Nice to meet you, {}.", name),
                None => "Display name cleared.".to_string(),
            }
        }
        ChatCommand::Moods => {
            let moods = orchestrator.list_moods(None).await?;
            let summary = moods.summary;
            if summary.total == 0 {
                "No moods recorded yet.".to_string()
            } else {
                let mut out = format!("{} moods recorded", summary.total);
                if let Some(mean) = summary.mean_score {
                    let _ = write!(out, ", mean confidence {:.2}", mean);
                }
                for (label, count) in &summary.counts {
                    let _ = write!(out, "\n  {:<10} {}", label, count);
                }
                if let Some(dominant) = summary.dominant() {
                    let _ = write!(out, "\nMost frequent: {}", dominant);
                }
                out
            }
        }
        ChatCommand::History { page } => {
            let result = orchestrator.list_messages(page, HISTORY_PAGE_SIZE).await?;
            let mut out = format!(
                "Messages {} of {}:",
                result.messages.len(),
                result.total
            );
            for message in &result.messages {
                let _ = write!(out, "\n{}", render_message(message));
            }
            if result.has_more {
                let _ = write!(out, "\n(/history {} for more)", result.page + 1);
            }
            out
        }
        ChatCommand::Help => HELP_TEXT.to_string(),
        ChatCommand::Quit => return Ok(CommandOutput::Quit),
    };

    Ok(CommandOutput::Print(output))
}

/// 渲染一条消息，危机消息附带热线列表
pub fn render_message(message: &Message) -> String {
    let speaker = match message.sender() {
        Sender::User => "You",
        Sender::Bot => "SereneMind",
    };
    let mut out = format!("{}: {}", speaker, message.text());
    for helpline in message.helplines() {
        let _ = write!(
            out,
            "\n  - {}: {} ({})",
            helpline.name, helpline.phone, helpline.info
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::domain::default_helplines;
    use crate::modules::chat::infrastructure::adapters::{
        ClassifierStep, GeneratorStep, ScriptedClassifier, ScriptedGenerator,
    };
    use crate::modules::chat::{ChatModule, ChatSettings};
    use std::sync::Arc;

    #[test]
    fn test_parse() {
        assert_eq!(ChatCommand::parse("   "), None);
        assert_eq!(
            ChatCommand::parse(" hello there "),
            Some(ChatCommand::Say("hello there".into()))
        );
        assert_eq!(
            ChatCommand::parse("/name  Asha"),
            Some(ChatCommand::SetName(Some("Asha".into())))
        );
        assert_eq!(ChatCommand::parse("/name"), Some(ChatCommand::SetName(None)));
        assert_eq!(ChatCommand::parse("/moods"), Some(ChatCommand::Moods));
        assert_eq!(
            ChatCommand::parse("/history 2"),
            Some(ChatCommand::History { page: 2 })
        );
        assert_eq!(ChatCommand::parse("/exit"), Some(ChatCommand::Quit));
        assert_eq!(
            ChatCommand::parse("/shrug"),
            Some(ChatCommand::Say("/shrug".into()))
        );
    }

    #[test]
    fn test_render_distress_message() {
        let rendered = render_message(&Message::distress("Please reach out:", default_helplines()));
        assert!(rendered.starts_with("SereneMind: Please reach out:"));
        assert!(rendered.contains("\n  - AASRA: 9820466726 (24/7 helpline)"));
        assert_eq!(rendered.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_execute_round() {
        let module = ChatModule::new(
            Arc::new(ScriptedClassifier::always(ClassifierStep::emotion("joy", 0.9))),
            Arc::new(ScriptedGenerator::always(GeneratorStep::reply("Yay! 🎉"))),
            ChatSettings::default().with_greeting(false),
        );
        let session = module.primary_session().await.unwrap();

        let out = execute(&session, ChatCommand::Say("I passed".into())).await.unwrap();
        assert_eq!(out, CommandOutput::Print("SereneMind: Yay! 🎉".into()));

        let CommandOutput::Print(moods) = execute(&session, ChatCommand::Moods).await.unwrap() else {
            panic!("expected output");
        };
        assert!(moods.starts_with("1 moods recorded"));
        assert!(moods.contains("Most frequent: joy"));

        assert_eq!(
            execute(&session, ChatCommand::Quit).await.unwrap(),
            CommandOutput::Quit
        );
    }
}

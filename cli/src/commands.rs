//! Subcommand implementations
//!
//! Every command writes to a caller-supplied writer so it can be exercised
//! against an in-memory store.

use std::io::{BufRead, Write};

use ai_chatbot_core::chat::{ChatHistory, GeminiClient, LanguageModel, StaticIdentity, UserSession};
use ai_chatbot_core::storage::{migrate_legacy_data, KeyValueBackend, Store};
use ai_chatbot_core::{ChatSummary, Error, Message, MessageKind, UserId};

/// Resolve a chat by 1-based position in the list, full id, or unique id prefix
pub fn resolve_chat<'a>(chats: &'a [ChatSummary], selector: &str) -> Result<&'a ChatSummary, Error> {
    if let Ok(position) = selector.parse::<usize>() {
        if let Some(chat) = position.checked_sub(1).and_then(|i| chats.get(i)) {
            return Ok(chat);
        }
    }
    if let Some(chat) = chats.iter().find(|chat| chat.id == selector) {
        return Ok(chat);
    }

    let mut matches = chats.iter().filter(|chat| chat.id.starts_with(selector));
    match (matches.next(), matches.next()) {
        (Some(chat), None) if !selector.is_empty() => Ok(chat),
        (Some(_), Some(_)) => Err(Error::invalid_input(format!("Chat selector '{}' is ambiguous", selector))),
        _ => Err(Error::not_found(format!("chat '{}'", selector))),
    }
}

/// One message as a terminal line
pub fn format_message(message: &Message) -> String {
    let who = match message.kind {
        MessageKind::Prompt => "you",
        MessageKind::Response => "bot",
        MessageKind::Error => "error",
    };
    if message.time_stamp.is_empty() {
        format!("{}: {}", who, message.text)
    } else {
        format!("[{}] {}: {}", message.time_stamp, who, message.text)
    }
}

fn write_chat_list(chats: &[ChatSummary], active: Option<&str>, out: &mut impl Write) -> anyhow::Result<()> {
    if chats.is_empty() {
        writeln!(out, "No chats yet")?;
        return Ok(());
    }
    for (i, chat) in chats.iter().enumerate() {
        let marker = if active == Some(chat.id.as_str()) { "*" } else { " " };
        let label = if chat.display_id.is_empty() { "(untitled)" } else { &chat.display_id };
        writeln!(out, "{}{:>3}. {}  {}", marker, i + 1, label, chat.id)?;
    }
    Ok(())
}

/// `list`
pub fn list<B: KeyValueBackend>(store: &Store<B>, user: &UserId, out: &mut impl Write) -> anyhow::Result<()> {
    let history = ChatHistory::new(store, user.clone());
    write_chat_list(&history.chats(), None, out)
}

/// `show <chat>`
pub fn show<B: KeyValueBackend>(
    store: &Store<B>,
    user: &UserId,
    selector: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let history = ChatHistory::new(store, user.clone());
    let chats = history.chats();
    let chat = resolve_chat(&chats, selector)?;

    writeln!(out, "{} ({})", chat.display_id, chat.id)?;
    for message in history.messages(&chat.id) {
        writeln!(out, "{}", format_message(&message))?;
    }
    Ok(())
}

/// `delete <chat>`
pub fn delete<B: KeyValueBackend>(
    store: &Store<B>,
    user: &UserId,
    selector: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let history = ChatHistory::new(store, user.clone());
    let chats = history.chats();
    let id = resolve_chat(&chats, selector)?.id.clone();

    let remaining = history.delete_chat(&id);
    writeln!(out, "Deleted chat {} ({} left)", id, remaining.len())?;
    Ok(())
}

/// `migrate`
pub fn migrate<B: KeyValueBackend>(store: &Store<B>, user: &UserId, out: &mut impl Write) -> anyhow::Result<()> {
    let report = migrate_legacy_data(store, user);
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}

/// `clear`
pub fn clear<B: KeyValueBackend>(store: &Store<B>, user: &UserId, out: &mut impl Write) -> anyhow::Result<()> {
    let removed = ChatHistory::new(store, user.clone()).clear();
    writeln!(out, "Removed {} keys for {}", removed, user)?;
    Ok(())
}

/// `models`
pub async fn models(client: &GeminiClient, out: &mut impl Write) -> anyhow::Result<()> {
    for model in client.list_models().await? {
        match model.display_name {
            Some(display_name) => writeln!(out, "{}  {}", model.name, display_name)?,
            None => writeln!(out, "{}", model.name)?,
        }
    }
    Ok(())
}

const CHAT_HELP: &str = "Commands: /new, /chats, /open <chat>, /delete <chat>, /help, /quit";

/// `chat`: read prompts from `input` until EOF or `/quit`
pub async fn chat<B, M>(
    store: &Store<B>,
    user: &UserId,
    model: &M,
    input: impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    B: KeyValueBackend,
    M: LanguageModel,
{
    let identity = StaticIdentity::signed_in(user.as_str());
    let mut session = UserSession::start(store, &identity)
        .ok_or_else(|| Error::invalid_input("a user id is required"))?;

    writeln!(out, "Signed in as {}. {}", session.user_id(), CHAT_HELP)?;
    for message in session.messages() {
        writeln!(out, "{}", format_message(message))?;
    }

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        let (command, arg) = line.split_once(' ').map_or((line, ""), |(c, a)| (c, a.trim()));

        match command {
            "/quit" | "/exit" => break,
            "/help" => writeln!(out, "{}", CHAT_HELP)?,
            "/new" => {
                let chat = session.new_chat();
                writeln!(out, "Started {}", chat.display_id)?;
            }
            "/chats" => write_chat_list(session.chats(), session.active_chat(), out)?,
            "/open" => match resolve_chat(session.chats(), arg).map(|chat| chat.id.clone()) {
                Ok(id) => {
                    session.select_chat(&id);
                    for message in session.messages() {
                        writeln!(out, "{}", format_message(message))?;
                    }
                }
                Err(e) => writeln!(out, "{}", e)?,
            },
            "/delete" => match resolve_chat(session.chats(), arg).map(|chat| chat.id.clone()) {
                Ok(id) => {
                    session.delete_chat(&id);
                    writeln!(out, "Deleted chat {}", id)?;
                }
                Err(e) => writeln!(out, "{}", e)?,
            },
            _ => {
                if let Some(reply) = session.send_message(model, line).await {
                    writeln!(out, "{}", format_message(&reply))?;
                }
            }
        }
        out.flush()?;
    }
    Ok(())
}

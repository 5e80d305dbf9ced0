//! Recording doubles for router tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::access::AccessControl;
use crate::core::message::{IncomingMessage, Media, MediaKind, MessageContent, Sender};
use crate::core::responder::AiResponder;
use crate::core::router::Relay;
use crate::error::{Error, Result};
use crate::providers::{self, CompletionProvider, ProviderError, Turn};
use crate::store::{AdminSet, StateStore};
use crate::telegram::Messenger;

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: String,
        text: String,
    },
    Media {
        chat_id: String,
        kind: MediaKind,
        file_id: String,
        caption: Option<String>,
    },
}

impl Sent {
    pub fn chat_id(&self) -> &str {
        match self {
            Sent::Text { chat_id, .. } | Sent::Media { chat_id, .. } => chat_id,
        }
    }
}

/// Messenger that records successful sends and fails for chosen chats.
#[derive(Default)]
pub struct StubMessenger {
    failing: HashSet<String>,
    sent: Mutex<Vec<Sent>>,
}

impl StubMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(chat_ids: &[&str]) -> Self {
        Self {
            failing: chat_ids.iter().map(|c| c.to_string()).collect(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts delivered to one chat, in order.
    pub fn texts_to(&self, chat_id: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { chat_id: c, text } if c == chat_id => Some(text),
                _ => None,
            })
            .collect()
    }

    fn check(&self, chat_id: &str) -> Result<()> {
        if self.failing.contains(chat_id) {
            return Err(Error::Telegram("Forbidden: bot was blocked by the user".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Messenger for StubMessenger {
    async fn send_text(&self, chat_id: &str, text: &str) -> Result<()> {
        self.check(chat_id)?;
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_media(&self, chat_id: &str, media: &Media, caption: Option<&str>) -> Result<()> {
        self.check(chat_id)?;
        self.sent.lock().unwrap().push(Sent::Media {
            chat_id: chat_id.to_string(),
            kind: media.kind,
            file_id: media.file_id.clone(),
            caption: caption.map(str::to_string),
        });
        Ok(())
    }

    async fn send_typing(&self, chat_id: &str) -> Result<()> {
        self.check(chat_id)
    }
}

/// Scripted completion outcome.
#[derive(Clone)]
pub enum Script {
    Reply(String),
    Empty,
    Fail,
}

/// Provider returning a fixed outcome and recording each request.
pub struct StubProvider {
    script: Script,
    requests: Mutex<Vec<(String, Vec<Turn>)>>,
}

impl StubProvider {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(Script::Reply(text.to_string()))
    }

    pub fn requests(&self) -> Vec<(String, Vec<Turn>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, system_prompt: &str, history: &[Turn]) -> providers::Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), history.to_vec()));
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Empty => Err(ProviderError::EmptyResponse("no candidates".to_string())),
            Script::Fail => Err(ProviderError::ApiError("HTTP 500".to_string())),
        }
    }
}

/// A relay wired to stubs over a temporary data directory.
pub struct Harness {
    pub relay: Arc<Relay>,
    pub messenger: Arc<StubMessenger>,
    pub provider: Arc<StubProvider>,
    _dir: tempfile::TempDir,
}

/// Build a relay whose admin list is exactly `admins`, first one primary.
pub fn harness_with(admins: &[&str], messenger: StubMessenger, provider: StubProvider) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(StateStore::open(dir.path(), admins[0]).unwrap());
    store
        .save_admins(&AdminSet::new(admins.iter().map(|a| a.to_string()).collect()))
        .unwrap();
    let messenger = Arc::new(messenger);
    let provider = Arc::new(provider);
    let relay = Arc::new(Relay::new(
        store,
        AccessControl::new(None),
        messenger.clone(),
        AiResponder::new(provider.clone()),
    ));
    Harness {
        relay,
        messenger,
        provider,
        _dir: dir,
    }
}

pub fn harness(admins: &[&str]) -> Harness {
    harness_with(admins, StubMessenger::new(), StubProvider::replying("hi from ai"))
}

/// Private-chat text message from `id`.
pub fn text_from(id: &str, text: &str) -> IncomingMessage {
    IncomingMessage {
        chat_id: id.to_string(),
        sender: Sender {
            id: id.to_string(),
            first_name: Some("Bob".to_string()),
            username: Some("bob".to_string()),
        },
        content: MessageContent::Text(text.to_string()),
        reply_to_text: None,
    }
}

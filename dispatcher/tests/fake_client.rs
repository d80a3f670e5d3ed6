//! Recording [`MessagingClient`] for dispatcher tests.
//!
//! Every call is appended to `calls`; a call named in `fail_on` returns an error after being recorded,
//! and `fail_chat` restricts failures to one chat.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use figbot_core::{
    ChatPresence, ChatPresenceMedia, FigbotError, Jid, MediaKind, MediaRef, MessagingClient,
    OutboundMessage, Presence, Result, SendReceipt, UploadReceipt,
};
use std::sync::Mutex;

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    MarkRead {
        ids: Vec<String>,
        chat: Jid,
        sender: Jid,
    },
    Presence(Presence),
    ChatPresence(Jid, ChatPresence),
    Send(OutboundMessage),
    Download(String),
    Upload(Vec<u8>, MediaKind),
}

#[allow(dead_code)]
impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::MarkRead { .. } => "mark_read",
            Call::Presence(_) => "send_presence",
            Call::ChatPresence(..) => "send_chat_presence",
            Call::Send(_) => "send_message",
            Call::Download(_) => "download",
            Call::Upload(..) => "upload",
        }
    }
}

#[derive(Default)]
pub struct FakeClient {
    pub calls: Mutex<Vec<Call>>,
    pub download_data: Vec<u8>,
    pub fail_on: Option<&'static str>,
    pub fail_chat: Option<Jid>,
    pub panic_on_mark_read: bool,
}

#[allow(dead_code)]
impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_download(mut self, data: Vec<u8>) -> Self {
        self.download_data = data;
        self
    }

    pub fn failing_on(mut self, op: &'static str) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn failing_in_chat(mut self, chat: Jid) -> Self {
        self.fail_chat = Some(chat);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls().iter().map(Call::name).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.name() == name).count()
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call, chat: Option<&Jid>) -> Result<()> {
        let name = call.name();
        self.calls.lock().unwrap().push(call);
        let chat_matches = match (&self.fail_chat, chat) {
            (None, _) => true,
            (Some(fail), Some(chat)) => fail == chat,
            (Some(_), None) => false,
        };
        if self.fail_on == Some(name) && chat_matches {
            return Err(FigbotError::Client(format!("{} failed", name)));
        }
        Ok(())
    }
}

#[async_trait]
impl MessagingClient for FakeClient {
    async fn mark_read(
        &self,
        message_ids: &[String],
        _timestamp: DateTime<Utc>,
        chat: &Jid,
        sender: &Jid,
    ) -> Result<()> {
        if self.panic_on_mark_read {
            panic!("client blew up");
        }
        self.record(
            Call::MarkRead {
                ids: message_ids.to_vec(),
                chat: chat.clone(),
                sender: sender.clone(),
            },
            Some(chat),
        )
    }

    async fn send_presence(&self, presence: Presence) -> Result<()> {
        self.record(Call::Presence(presence), None)
    }

    async fn send_chat_presence(
        &self,
        chat: &Jid,
        state: ChatPresence,
        _media: ChatPresenceMedia,
    ) -> Result<()> {
        self.record(Call::ChatPresence(chat.clone(), state), Some(chat))
    }

    async fn send_message(&self, message: &OutboundMessage) -> Result<SendReceipt> {
        self.record(Call::Send(message.clone()), Some(&message.chat))?;
        Ok(SendReceipt {
            id: format!("SENT{}", self.count("send_message")),
            timestamp: Utc::now(),
        })
    }

    async fn download(&self, media: &MediaRef) -> Result<Vec<u8>> {
        self.record(Call::Download(media.direct_path.clone()), None)?;
        Ok(self.download_data.clone())
    }

    async fn upload(&self, data: &[u8], kind: MediaKind) -> Result<UploadReceipt> {
        self.record(Call::Upload(data.to_vec(), kind), None)?;
        Ok(UploadReceipt {
            url: "https://mmg.example.net/d/f/abc.enc".to_string(),
            direct_path: "/v/t62.15575-24/abc.enc".to_string(),
            media_key: vec![7; 32],
            file_enc_sha256: vec![8; 32],
            file_sha256: vec![9; 32],
            file_length: data.len() as u64,
        })
    }
}

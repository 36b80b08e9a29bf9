use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use acord_discord::{
    ChatChannel, ChatGuild, ChatMessage, ChatMessageReceipt, ChatPlatform, ChatPlatformError,
    ChatUser, UserResolver,
};
use acord_mapping::{ChannelMapping, MappingStore, StaticMappingStore, UserMapping};
use acord_remote::{RemoteApi, RemoteApiError};
use async_trait::async_trait;
use serde_json::{json, Value};

#[derive(Default)]
pub(crate) struct ScriptedRemote {
    responses: BTreeMap<String, Value>,
    failing_routes: BTreeSet<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRemote {
    pub(crate) fn with_response(mut self, route: &str, response: Value) -> Self {
        self.responses.insert(route.to_string(), response);
        self
    }

    pub(crate) fn with_failure(mut self, route: &str) -> Self {
        self.failing_routes.insert(route.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl RemoteApi for ScriptedRemote {
    async fn get(&self, route: &str, _query: &[(&str, &str)]) -> Result<Value, RemoteApiError> {
        self.calls.lock().expect("calls lock").push(route.to_string());
        if self.failing_routes.contains(route) {
            return Err(RemoteApiError::HttpStatus {
                route: route.to_string(),
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        self.responses
            .get(route)
            .cloned()
            .ok_or_else(|| RemoteApiError::invalid_response(route, "no scripted response"))
    }

    async fn post(&self, route: &str, _body: &Value) -> Result<Value, RemoteApiError> {
        self.calls.lock().expect("calls lock").push(route.to_string());
        Ok(Value::Null)
    }
}

#[derive(Default)]
pub(crate) struct FakeChat {
    pub(crate) guilds: Vec<ChatGuild>,
    pub(crate) channels: Vec<ChatChannel>,
    pub(crate) members: Vec<(String, ChatUser)>,
    pub(crate) failing_targets: BTreeSet<String>,
    pub(crate) sent: Mutex<Vec<(String, ChatMessage)>>,
}

impl FakeChat {
    pub(crate) fn sent_targets(&self) -> Vec<String> {
        self.sent
            .lock()
            .expect("sent lock")
            .iter()
            .map(|(target, _)| target.clone())
            .collect()
    }

    pub(crate) fn sent_messages(&self) -> Vec<ChatMessage> {
        self.sent
            .lock()
            .expect("sent lock")
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn record(
        &self,
        target: &str,
        message: &ChatMessage,
    ) -> Result<ChatMessageReceipt, ChatPlatformError> {
        if self.failing_targets.contains(target) {
            return Err(ChatPlatformError::HttpStatus {
                endpoint: format!("/channels/{target}/messages"),
                status: 403,
                body: "missing access".to_string(),
            });
        }
        let mut sent = self.sent.lock().expect("sent lock");
        sent.push((target.to_string(), message.clone()));
        Ok(ChatMessageReceipt {
            channel_id: target.to_string(),
            message_id: format!("m{}", sent.len()),
        })
    }
}

#[async_trait]
impl ChatPlatform for FakeChat {
    async fn guilds(&self) -> Result<Vec<ChatGuild>, ChatPlatformError> {
        Ok(self.guilds.clone())
    }

    async fn guild_channels(
        &self,
        guild_id: &str,
    ) -> Result<Vec<ChatChannel>, ChatPlatformError> {
        Ok(self
            .channels
            .iter()
            .filter(|channel| channel.guild_id == guild_id)
            .cloned()
            .collect())
    }

    async fn search_members(
        &self,
        guild_id: &str,
        username: &str,
    ) -> Result<Vec<ChatUser>, ChatPlatformError> {
        Ok(self
            .members
            .iter()
            .filter(|(guild, member)| {
                guild == guild_id && member.username.eq_ignore_ascii_case(username)
            })
            .map(|(_, member)| member.clone())
            .collect())
    }

    async fn send_to_channel(
        &self,
        channel_id: &str,
        message: &ChatMessage,
    ) -> Result<ChatMessageReceipt, ChatPlatformError> {
        self.record(channel_id, message)
    }

    async fn send_to_user(
        &self,
        user_id: &str,
        message: &ChatMessage,
    ) -> Result<ChatMessageReceipt, ChatPlatformError> {
        self.record(user_id, message)
    }
}

pub(crate) fn guild(id: &str, name: &str) -> ChatGuild {
    ChatGuild {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub(crate) fn channel(id: &str, name: &str, guild_id: &str) -> ChatChannel {
    ChatChannel {
        id: id.to_string(),
        name: name.to_string(),
        guild_id: guild_id.to_string(),
    }
}

pub(crate) fn member(id: &str, username: &str) -> ChatUser {
    ChatUser {
        id: id.to_string(),
        username: username.to_string(),
        discriminator: None,
    }
}

/// Project 5 maps to `#dev` in guild0 and `#ops` in guild1; users 12 and 13
/// map to `alice` and `bob`.
pub(crate) fn mapping_store() -> Arc<dyn MappingStore> {
    Arc::new(StaticMappingStore::new(
        vec![
            ChannelMapping {
                project_id: 5,
                channel_name: "dev".to_string(),
                guild_index: 0,
            },
            ChannelMapping {
                project_id: 5,
                channel_name: "ops".to_string(),
                guild_index: 1,
            },
        ],
        vec![
            UserMapping {
                discord_user: "alice".to_string(),
                active_collab_user: 12,
            },
            UserMapping {
                discord_user: "bob".to_string(),
                active_collab_user: 13,
            },
        ],
    ))
}

pub(crate) fn populated_chat() -> FakeChat {
    FakeChat {
        guilds: vec![guild("g0", "guild0"), guild("g1", "guild1")],
        channels: vec![channel("c-dev", "dev", "g0"), channel("c-ops", "ops", "g1")],
        members: vec![
            ("g0".to_string(), member("42", "alice")),
            ("g1".to_string(), member("43", "bob")),
        ],
        ..FakeChat::default()
    }
}

pub(crate) fn user_resolver(chat: Arc<FakeChat>) -> UserResolver {
    UserResolver::new(mapping_store(), chat)
}

pub(crate) fn task_event(event_type: &str, assignee_id: u64) -> Value {
    json!({
        "type": event_type,
        "timestamp": 1_700_000_000,
        "payload": {
            "class": "Task",
            "id": 9,
            "name": "Write release notes",
            "project_id": 5,
            "assignee_id": assignee_id,
            "task_list_id": 3,
            "url_path": "/projects/5/tasks/9",
            "is_completed": false
        }
    })
}

pub(crate) fn comment_event(event_type: &str, parent_type: &str) -> Value {
    json!({
        "type": event_type,
        "timestamp": 1_700_000_000,
        "payload": {
            "class": "Comment",
            "id": 77,
            "parent_type": parent_type,
            "parent_id": 9,
            "body": "Looks good to me",
            "created_by_id": 13,
            "url_path": "/projects/5/tasks/9#comment-77"
        }
    })
}

pub(crate) fn assignment_report() -> Value {
    json!({
        "all": {
            "assignments": {
                "9": {"id": 9, "type": "Task", "project_id": 5, "name": "Write release notes"},
                "10": {"id": 10, "type": "Task", "project_id": 6, "name": "Other"}
            }
        }
    })
}

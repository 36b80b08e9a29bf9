use std::sync::Arc;

use acord_contract::{
    CommandEvent, NotificationDocument, ProcessedEvent, COMMAND_REPLY_COLOR,
    TASK_NOTIFICATION_COLOR,
};
use acord_discord::{
    render_discord_message, ChannelResolver, ChatMessage, ChatPlatform, DiscordRestClient,
    DiscordRestClientConfig, UserResolver,
};
use acord_mapping::{parse_mapping_file, MappingStore};
use acord_pipeline::{
    deliver_processed_event, route_command, ChatCommandActions, DeliveryError, EventDispatcher,
    STATUS_OK,
};
use acord_remote::{ActiveCollabClient, ActiveCollabClientConfig, RemoteApi};
use httpmock::prelude::*;
use serde_json::{json, Value};

const WEB_BASE: &str = "https://pm.example.com";

const MAPPINGS: &str = r#"{
  "schema_version": 1,
  "channels": [
    {"projectId": 5, "channelName": "dev", "guildIndex": 0},
    {"projectId": 5, "channelName": "ops", "guildIndex": 1},
    {"projectId": 5, "channelName": "archive", "guildIndex": 0}
  ],
  "users": [
    {"discordUser": "alice", "activeCollabUser": 12},
    {"discordUser": "bob#0", "activeCollabUser": 13}
  ]
}"#;

struct Bridge {
    dispatcher: EventDispatcher,
    channels: ChannelResolver,
    chat: Arc<dyn ChatPlatform>,
    remote: Arc<dyn RemoteApi>,
}

fn bridge(activecollab: &MockServer, discord: &MockServer) -> Bridge {
    let mappings: Arc<dyn MappingStore> = Arc::new(
        parse_mapping_file(MAPPINGS)
            .expect("mapping file")
            .into_store(),
    );
    let remote: Arc<dyn RemoteApi> = Arc::new(
        ActiveCollabClient::new(&ActiveCollabClientConfig {
            api_base: format!("{}/api/v1", activecollab.base_url()),
            token: "ac-token".to_string(),
            request_timeout_ms: 2_000,
        })
        .expect("activecollab client"),
    );
    let chat: Arc<dyn ChatPlatform> = Arc::new(
        DiscordRestClient::new(&DiscordRestClientConfig {
            api_base: format!("{}/api/v10", discord.base_url()),
            bot_token: "bot-token".to_string(),
            request_timeout_ms: 2_000,
        })
        .expect("discord client"),
    );
    Bridge {
        dispatcher: EventDispatcher::new(
            remote.clone(),
            UserResolver::new(mappings.clone(), chat.clone()),
            WEB_BASE,
        ),
        channels: ChannelResolver::new(mappings, chat.clone()),
        chat,
        remote,
    }
}

fn mock_discord_directory(discord: &MockServer) {
    discord.mock(|when, then| {
        when.method(GET)
            .path("/api/v10/users/@me/guilds")
            .header("authorization", "Bot bot-token");
        then.status(200).json_body(json!([
            {"id": "g0", "name": "guild0"},
            {"id": "g1", "name": "guild1"}
        ]));
    });
    discord.mock(|when, then| {
        when.method(GET).path("/api/v10/guilds/g0/channels");
        then.status(200).json_body(json!([
            {"id": "c-dev", "type": 0, "name": "dev", "guild_id": "g0"},
            {"id": "c-voice", "type": 2, "name": "archive", "guild_id": "g0"}
        ]));
    });
    discord.mock(|when, then| {
        when.method(GET).path("/api/v10/guilds/g1/channels");
        then.status(200).json_body(json!([
            {"id": "c-ops", "type": 0, "name": "ops", "guild_id": "g1"}
        ]));
    });
    discord.mock(|when, then| {
        when.method(GET)
            .path("/api/v10/guilds/g0/members/search")
            .query_param("query", "alice");
        then.status(200).json_body(json!([
            {"user": {"id": "42", "username": "alice", "discriminator": "0"}}
        ]));
    });
    discord.mock(|when, then| {
        when.method(GET)
            .path("/api/v10/guilds/g0/members/search")
            .query_param("query", "bob");
        then.status(200).json_body(json!([]));
    });
    discord.mock(|when, then| {
        when.method(GET)
            .path("/api/v10/guilds/g1/members/search")
            .query_param("query", "bob");
        then.status(200).json_body(json!([
            {"user": {"id": "43", "username": "bob", "discriminator": "0"}}
        ]));
    });
}

fn task_created(assignee_id: u64) -> Value {
    json!({
        "type": "TaskCreated",
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

#[tokio::test]
async fn integration_task_webhook_reaches_every_live_channel_and_reports_gaps() {
    let activecollab = MockServer::start();
    let discord = MockServer::start();
    mock_discord_directory(&discord);
    let status_lookup = activecollab.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/projects/5/task-lists/3")
            .header("x-angie-authapitoken", "ac-token");
        then.status(200)
            .json_body(json!({"single": {"id": 3, "name": "In Progress"}}));
    });
    let bridge = bridge(&activecollab, &discord);

    let processed = bridge
        .dispatcher
        .process_json_event(task_created(12))
        .await
        .expect("processed task event");
    status_lookup.assert_calls(1);
    assert_eq!(processed.project_id, 5);
    assert_eq!(processed.body.title, "*Task Created:* Write release notes");
    assert_eq!(
        processed.body.url.as_deref(),
        Some("https://pm.example.com/projects/5/tasks/9")
    );
    let fields = processed
        .body
        .fields
        .iter()
        .map(|field| (field.name.as_str(), field.value.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(fields, vec![("Assignee", "<@42>"), ("Status", "In Progress")]);

    let expected_payload =
        render_discord_message(&ChatMessage::Notification(processed.body.clone()));
    let dev_post = discord.mock(|when, then| {
        when.method(POST)
            .path("/api/v10/channels/c-dev/messages")
            .json_body(expected_payload.clone());
        then.status(200)
            .json_body(json!({"id": "m-1", "channel_id": "c-dev"}));
    });
    let ops_post = discord.mock(|when, then| {
        when.method(POST).path("/api/v10/channels/c-ops/messages");
        then.status(403).body(r#"{"message":"Missing Access"}"#);
    });

    let report = deliver_processed_event(&bridge.channels, bridge.chat.as_ref(), &processed)
        .await
        .expect("delivery report");
    dev_post.assert_calls(1);
    ops_post.assert_calls(1);
    assert_eq!(report.delivered.len(), 1);
    assert_eq!(report.delivered[0].message_id, "m-1");
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].channel_name, "ops");
    assert!(report.failed[0].error.contains("403"));
    let missing = report
        .missing
        .iter()
        .map(|row| row.label())
        .collect::<Vec<_>>();
    assert_eq!(missing, vec!["archive (guild0)".to_string()]);
}

#[tokio::test]
async fn integration_comment_webhook_resolves_project_through_assignment_report() {
    let activecollab = MockServer::start();
    let discord = MockServer::start();
    mock_discord_directory(&discord);
    let report_lookup = activecollab.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/reports/run")
            .query_param("type", "AssignmentFilter");
        then.status(200).json_body(json!({
            "all": {
                "assignments": {
                    "9": {"id": 9, "type": "Task", "project_id": 5, "name": "Write release notes"}
                }
            }
        }));
    });
    activecollab.mock(|when, then| {
        when.method(GET).path("/api/v1/projects/5/tasks/9");
        then.status(200)
            .json_body(json!({"single": {"id": 9, "name": "Write release notes"}}));
    });
    discord.mock(|when, then| {
        when.method(POST).path("/api/v10/channels/c-dev/messages");
        then.status(200)
            .json_body(json!({"id": "m-1", "channel_id": "c-dev"}));
    });
    discord.mock(|when, then| {
        when.method(POST).path("/api/v10/channels/c-ops/messages");
        then.status(200)
            .json_body(json!({"id": "m-2", "channel_id": "c-ops"}));
    });
    let bridge = bridge(&activecollab, &discord);

    let processed = bridge
        .dispatcher
        .process_json_event(json!({
            "type": "CommentCreated",
            "timestamp": 1_700_000_000,
            "payload": {
                "class": "Comment",
                "id": 77,
                "parent_type": "Task",
                "parent_id": 9,
                "body": "Shipped in 1.4",
                "created_by_id": 13
            }
        }))
        .await
        .expect("processed comment event");
    report_lookup.assert_calls(1);
    assert_eq!(processed.project_id, 5);
    assert_eq!(
        processed.body.title,
        "*Comment Added to Task:* Write release notes"
    );
    assert_eq!(processed.body.description.as_deref(), Some("Shipped in 1.4"));
    assert_eq!(
        processed.body.field("Author").map(|field| field.value.as_str()),
        Some("<@43>")
    );

    let report = deliver_processed_event(&bridge.channels, bridge.chat.as_ref(), &processed)
        .await
        .expect("delivery report");
    let delivered = report
        .delivered
        .iter()
        .map(|receipt| receipt.channel_id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(delivered, vec!["c-dev", "c-ops"]);
}

#[tokio::test]
async fn regression_unmapped_assignee_fails_before_any_discord_message() {
    let activecollab = MockServer::start();
    let discord = MockServer::start();
    mock_discord_directory(&discord);
    let status_lookup = activecollab.mock(|when, then| {
        when.method(GET).path("/api/v1/projects/5/task-lists/3");
        then.status(200).json_body(json!({"single": {"name": "In Progress"}}));
    });
    let any_post = discord.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(json!({"id": "m-1", "channel_id": "c-dev"}));
    });
    let bridge = bridge(&activecollab, &discord);

    let error = bridge
        .dispatcher
        .process_json_event(task_created(99))
        .await
        .expect_err("unmapped assignee");
    assert_eq!(
        error.to_string(),
        "Unable to process Task Event: No Discord user mapped for ActiveCollab user: 99"
    );
    status_lookup.assert_calls(0);
    any_post.assert_calls(0);
}

#[tokio::test]
async fn regression_delivery_with_every_send_failing_is_an_error() {
    let activecollab = MockServer::start();
    let discord = MockServer::start();
    mock_discord_directory(&discord);
    activecollab.mock(|when, then| {
        when.method(GET).path("/api/v1/projects/5/task-lists/3");
        then.status(200).json_body(json!({"single": {"name": "Done"}}));
    });
    discord.mock(|when, then| {
        when.method(POST);
        then.status(500).body("boom");
    });
    let bridge = bridge(&activecollab, &discord);

    let processed = bridge
        .dispatcher
        .process_json_event(task_created(0))
        .await
        .expect("processed");
    let error = deliver_processed_event(&bridge.channels, bridge.chat.as_ref(), &processed)
        .await
        .expect_err("nothing delivered");
    assert!(matches!(
        error,
        DeliveryError::NothingDelivered { project_id: 5, .. }
    ));
}

#[tokio::test]
async fn integration_projects_command_posts_project_list_to_channel() {
    let activecollab = MockServer::start();
    let discord = MockServer::start();
    activecollab.mock(|when, then| {
        when.method(GET).path("/api/v1/projects");
        then.status(200).json_body(json!([
            {"id": 5, "name": "Website", "is_completed": false},
            {"id": 6, "name": "Mobile", "is_completed": false}
        ]));
    });
    let expected = render_discord_message(&ChatMessage::Notification(
        NotificationDocument::new("Projects", COMMAND_REPLY_COLOR)
            .with_description("5: Website\n6: Mobile"),
    ));
    let reply = discord.mock(|when, then| {
        when.method(POST)
            .path("/api/v10/channels/c-dev/messages")
            .json_body(expected.clone());
        then.status(200)
            .json_body(json!({"id": "m-9", "channel_id": "c-dev"}));
    });
    let bridge = bridge(&activecollab, &discord);
    let actions = ChatCommandActions::new(bridge.remote.clone(), bridge.chat.clone());

    let status = route_command(
        &actions,
        &CommandEvent {
            command: "!projects".to_string(),
            address_type: "channel".to_string(),
            address: "c-dev".to_string(),
            parameters: Vec::new(),
        },
    )
    .await;
    assert_eq!(status, STATUS_OK);
    reply.assert_calls(1);
}

#[tokio::test]
async fn regression_guild_with_failing_channel_listing_does_not_block_healthy_guild() {
    let activecollab = MockServer::start();
    let discord = MockServer::start();
    discord.mock(|when, then| {
        when.method(GET).path("/api/v10/users/@me/guilds");
        then.status(200).json_body(json!([
            {"id": "g0", "name": "guild0"},
            {"id": "g1", "name": "guild1"}
        ]));
    });
    discord.mock(|when, then| {
        when.method(GET).path("/api/v10/guilds/g0/channels");
        then.status(200).json_body(json!([
            {"id": "c-dev", "type": 0, "name": "dev", "guild_id": "g0"}
        ]));
    });
    let failing_listing = discord.mock(|when, then| {
        when.method(GET).path("/api/v10/guilds/g1/channels");
        then.status(403).body(r#"{"message":"Missing Access"}"#);
    });
    let dev_post = discord.mock(|when, then| {
        when.method(POST).path("/api/v10/channels/c-dev/messages");
        then.status(200)
            .json_body(json!({"id": "m-9", "channel_id": "c-dev"}));
    });
    let bridge = bridge(&activecollab, &discord);
    let processed = ProcessedEvent {
        project_id: 5,
        body: NotificationDocument::new("*Task Created:* Ship", TASK_NOTIFICATION_COLOR),
    };

    let report = deliver_processed_event(&bridge.channels, bridge.chat.as_ref(), &processed)
        .await
        .expect("healthy guild still receives the notification");
    failing_listing.assert_calls(1);
    dev_post.assert_calls(1);
    assert_eq!(report.delivered.len(), 1);
    let missing = report
        .missing
        .iter()
        .map(|row| row.label())
        .collect::<Vec<_>>();
    assert_eq!(
        missing,
        vec!["ops (guild1)".to_string(), "archive (guild0)".to_string()]
    );
}

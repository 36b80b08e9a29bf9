//! ActiveCollab user id -> Discord member resolution.

use std::sync::Arc;

use acord_mapping::MappingStore;

use crate::chat_platform::{ChatPlatform, ChatUser};
use crate::resolve_error::ResolveError;

const LEGACY_DISCRIMINATOR_UNSET: &str = "0";

#[derive(Clone)]
/// Public struct `UserResolver` used across acord components.
pub struct UserResolver {
    mappings: Arc<dyn MappingStore>,
    chat: Arc<dyn ChatPlatform>,
}

impl UserResolver {
    pub fn new(mappings: Arc<dyn MappingStore>, chat: Arc<dyn ChatPlatform>) -> Self {
        Self { mappings, chat }
    }

    /// Maps the internal user to its Discord tag, then searches guild members
    /// (guild order) for a matching username. A guild whose search fails is
    /// skipped; when no guild matched, the first search failure is returned
    /// instead of `MemberNotFound`.
    pub async fn user_id(&self, active_collab_user: u64) -> Result<ChatUser, ResolveError> {
        let tag = self
            .mappings
            .discord_user_for(active_collab_user)
            .ok_or(ResolveError::UserNotMapped(active_collab_user))?
            .to_string();
        let (username, discriminator) = split_user_tag(&tag);

        let mut first_failure = None;
        for guild in self.chat.guilds().await? {
            let members = match self.chat.search_members(&guild.id, username).await {
                Ok(members) => members,
                Err(error) => {
                    tracing::warn!(
                        guild_id = %guild.id,
                        %error,
                        "member search failed; trying next guild"
                    );
                    first_failure.get_or_insert(error);
                    continue;
                }
            };
            if let Some(member) = members
                .into_iter()
                .find(|member| member_matches(member, username, discriminator))
            {
                return Ok(member);
            }
        }
        match first_failure {
            Some(error) => Err(ResolveError::Platform(error)),
            None => Err(ResolveError::MemberNotFound(tag)),
        }
    }
}

/// Splits `name#1234` tags; bare usernames have no discriminator.
fn split_user_tag(tag: &str) -> (&str, Option<&str>) {
    match tag.trim().rsplit_once('#') {
        Some((username, discriminator))
            if !discriminator.is_empty()
                && discriminator.chars().all(|ch| ch.is_ascii_digit()) =>
        {
            (username, Some(discriminator))
        }
        _ => (tag.trim(), None),
    }
}

fn member_matches(member: &ChatUser, username: &str, discriminator: Option<&str>) -> bool {
    if !member.username.eq_ignore_ascii_case(username) {
        return false;
    }
    match (discriminator, member.discriminator.as_deref()) {
        (None, _) => true,
        (Some(expected), Some(actual)) => {
            expected == actual || actual == LEGACY_DISCRIMINATOR_UNSET
        }
        (Some(_), None) => true,
    }
}

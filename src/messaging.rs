//! Messaging service
//!
//! Collaborator-facing CRUD over conversations, participants, and messages.
//! This sits outside the pure suggestion core: it writes through the
//! [`MessagingStore`] trait and reads wall-clock time, unlike the planning
//! engines. The admin check on participant management is the one permission
//! rule enforced here.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, WellnessError};
use crate::models::{
    Conversation, ConversationParticipant, ConversationType, Message, MessageType,
    ParticipantRole,
};
use crate::store::MessagingStore;

/// A conversation as listed for one user, with unread bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub conversation: Conversation,

    pub last_message: Option<Message>,

    /// 0 or 1: only the latest message is inspected against the reader's
    /// high-water mark
    pub unread_count: u32,
}

/// CRUD service over the messaging store
pub struct MessagingService<'a> {
    store: &'a dyn MessagingStore,
}

impl<'a> MessagingService<'a> {
    pub fn new(store: &'a dyn MessagingStore) -> Self {
        Self { store }
    }

    /// Create a conversation with the given participants plus the creator
    ///
    /// More than two supplied participant ids makes a group conversation.
    /// The creator is deduplicated into the participant set and gets the
    /// admin role.
    pub fn create_conversation(
        &self,
        participant_ids: &[Uuid],
        title: Option<String>,
        creator_id: Uuid,
    ) -> Result<(Conversation, Vec<ConversationParticipant>)> {
        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4(),
            title,
            conversation_type: if participant_ids.len() > 2 {
                ConversationType::Group
            } else {
                ConversationType::Direct
            },
            last_message_at: now,
            created_at: now,
        };
        self.store.insert_conversation(&conversation)?;

        let mut member_ids: Vec<Uuid> = Vec::new();
        for id in participant_ids.iter().chain(std::iter::once(&creator_id)) {
            if !member_ids.contains(id) {
                member_ids.push(*id);
            }
        }

        let mut participants = Vec::with_capacity(member_ids.len());
        for user_id in member_ids {
            let participant = ConversationParticipant {
                id: Uuid::new_v4(),
                conversation_id: conversation.id,
                user_id,
                role: if user_id == creator_id {
                    ParticipantRole::Admin
                } else {
                    ParticipantRole::Participant
                },
                last_read_at: now,
            };
            self.store.insert_participant(&participant)?;
            participants.push(participant);
        }

        tracing::info!(
            conversation_id = %conversation.id,
            kind = conversation.conversation_type.as_str(),
            participants = participants.len(),
            "conversation created"
        );

        Ok((conversation, participants))
    }

    /// Persist a message, bump the conversation, and mark the sender read
    pub fn send_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: &str,
        message_type: MessageType,
        attachments: Vec<String>,
    ) -> Result<Message> {
        let now = Utc::now();
        let message = Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id,
            content: content.to_string(),
            message_type,
            attachments,
            created_at: now,
        };

        self.store.insert_message(&message)?;
        self.store.touch_conversation(conversation_id, now)?;
        self.store.mark_read(conversation_id, sender_id, now)?;

        Ok(message)
    }

    /// List the user's conversations, newest activity first, with unread counts
    ///
    /// `page` starts at 1.
    pub fn conversations_for(
        &self,
        user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> Result<Vec<ConversationSummary>> {
        let offset = page.saturating_sub(1) * limit;
        let rows = self.store.conversations_for(user_id, limit, offset)?;

        let mut summaries = Vec::with_capacity(rows.len());
        for (conversation, participant) in rows {
            let last_message = self.store.latest_message(conversation.id)?;
            let unread_count = match &last_message {
                Some(message) if message.created_at > participant.last_read_at => 1,
                _ => 0,
            };
            summaries.push(ConversationSummary {
                conversation,
                last_message,
                unread_count,
            });
        }

        Ok(summaries)
    }

    /// List messages ascending and mark the reader caught up
    ///
    /// `page` starts at 1.
    pub fn messages(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Message>> {
        // Opening the conversation counts as reading it
        self.store.mark_read(conversation_id, user_id, Utc::now())?;

        let offset = page.saturating_sub(1) * limit;
        self.store.list_messages(conversation_id, limit, offset)
    }

    /// Existing direct conversation between two users, if any
    pub fn find_direct_conversation(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<Conversation>> {
        self.store.find_direct_conversation(user_a, user_b)
    }

    /// Add a participant on behalf of a conversation admin
    ///
    /// Find-or-create: the returned flag reports whether a row was created.
    /// A non-admin caller gets `PermissionDenied` and nothing is written.
    pub fn add_participant(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        admin_id: Uuid,
    ) -> Result<(ConversationParticipant, bool)> {
        let admin = self.store.find_participant(conversation_id, admin_id)?;
        let is_admin = admin.is_some_and(|p| p.role == ParticipantRole::Admin);
        if !is_admin {
            return Err(WellnessError::PermissionDenied {
                reason: "Only conversation admins can add participants".to_string(),
            });
        }

        if let Some(existing) = self.store.find_participant(conversation_id, user_id)? {
            return Ok((existing, false));
        }

        let participant = ConversationParticipant {
            id: Uuid::new_v4(),
            conversation_id,
            user_id,
            role: ParticipantRole::Participant,
            last_read_at: Utc::now(),
        };
        self.store.insert_participant(&participant)?;

        Ok((participant, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    fn service_with_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_direct_conversation() {
        let store = service_with_store();
        let service = MessagingService::new(&store);
        let creator = Uuid::new_v4();
        let other = Uuid::new_v4();

        let (conversation, participants) = service
            .create_conversation(&[other, creator], None, creator)
            .unwrap();

        assert_eq!(conversation.conversation_type, ConversationType::Direct);
        // Creator deduplicated: two members, creator is admin
        assert_eq!(participants.len(), 2);
        let admin = participants.iter().find(|p| p.user_id == creator).unwrap();
        assert_eq!(admin.role, ParticipantRole::Admin);
        let member = participants.iter().find(|p| p.user_id == other).unwrap();
        assert_eq!(member.role, ParticipantRole::Participant);
    }

    #[test]
    fn test_create_group_conversation() {
        let store = service_with_store();
        let service = MessagingService::new(&store);
        let creator = Uuid::new_v4();
        let others: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

        let (conversation, participants) = service
            .create_conversation(&others, Some("Coaching circle".to_string()), creator)
            .unwrap();

        assert_eq!(conversation.conversation_type, ConversationType::Group);
        assert_eq!(participants.len(), 4);
    }

    #[test]
    fn test_send_message_updates_bookkeeping() {
        let store = service_with_store();
        let service = MessagingService::new(&store);
        let creator = Uuid::new_v4();
        let other = Uuid::new_v4();

        let (conversation, _) = service
            .create_conversation(&[other], None, creator)
            .unwrap();
        let before = conversation.last_message_at;

        let message = service
            .send_message(
                conversation.id,
                creator,
                "How was the workout?",
                MessageType::Text,
                Vec::new(),
            )
            .unwrap();
        assert_eq!(message.content, "How was the workout?");

        // Sender sees no unread, the other participant sees one
        let sender_view = service.conversations_for(creator, 1, 20).unwrap();
        assert_eq!(sender_view.len(), 1);
        assert_eq!(sender_view[0].unread_count, 0);
        assert!(sender_view[0].conversation.last_message_at >= before);
        assert_eq!(
            sender_view[0].last_message.as_ref().unwrap().id,
            message.id
        );

        let other_view = service.conversations_for(other, 1, 20).unwrap();
        assert_eq!(other_view[0].unread_count, 1);
    }

    #[test]
    fn test_reading_messages_clears_unread() {
        let store = service_with_store();
        let service = MessagingService::new(&store);
        let creator = Uuid::new_v4();
        let other = Uuid::new_v4();

        let (conversation, _) = service
            .create_conversation(&[other], None, creator)
            .unwrap();
        service
            .send_message(conversation.id, creator, "Hello", MessageType::Text, Vec::new())
            .unwrap();

        let messages = service.messages(conversation.id, other, 1, 50).unwrap();
        assert_eq!(messages.len(), 1);

        let view = service.conversations_for(other, 1, 20).unwrap();
        assert_eq!(view[0].unread_count, 0);
    }

    #[test]
    fn test_find_direct_conversation() {
        let store = service_with_store();
        let service = MessagingService::new(&store);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        assert!(service.find_direct_conversation(a, b).unwrap().is_none());

        let (conversation, _) = service.create_conversation(&[b], None, a).unwrap();
        let found = service.find_direct_conversation(a, b).unwrap().unwrap();
        assert_eq!(found.id, conversation.id);
        assert!(service.find_direct_conversation(a, c).unwrap().is_none());
    }

    #[test]
    fn test_add_participant_requires_admin() {
        let store = service_with_store();
        let service = MessagingService::new(&store);
        let creator = Uuid::new_v4();
        let member = Uuid::new_v4();
        let newcomer = Uuid::new_v4();

        let (conversation, _) = service
            .create_conversation(&[member], None, creator)
            .unwrap();

        let err = service
            .add_participant(conversation.id, newcomer, member)
            .unwrap_err();
        assert!(matches!(err, WellnessError::PermissionDenied { .. }));
        // No side effect: participant table unchanged
        assert_eq!(store.count_participants(conversation.id).unwrap(), 2);

        let outsider = Uuid::new_v4();
        let err = service
            .add_participant(conversation.id, newcomer, outsider)
            .unwrap_err();
        assert!(matches!(err, WellnessError::PermissionDenied { .. }));
        assert_eq!(store.count_participants(conversation.id).unwrap(), 2);
    }

    #[test]
    fn test_add_participant_find_or_create() {
        let store = service_with_store();
        let service = MessagingService::new(&store);
        let creator = Uuid::new_v4();
        let member = Uuid::new_v4();
        let newcomer = Uuid::new_v4();

        let (conversation, _) = service
            .create_conversation(&[member], None, creator)
            .unwrap();

        let (added, created) = service
            .add_participant(conversation.id, newcomer, creator)
            .unwrap();
        assert!(created);
        assert_eq!(added.role, ParticipantRole::Participant);
        assert_eq!(store.count_participants(conversation.id).unwrap(), 3);

        // Adding again finds the existing row
        let (existing, created) = service
            .add_participant(conversation.id, newcomer, creator)
            .unwrap();
        assert!(!created);
        assert_eq!(existing.id, added.id);
        assert_eq!(store.count_participants(conversation.id).unwrap(), 3);
    }
}

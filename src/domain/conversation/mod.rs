//! Conversation domain module.
//!
//! The conversation aggregate with its message log and group membership
//! rules.

mod conversation;
mod message;

pub use conversation::{
    group_title, individual_title, Conversation, ConversationDraft, ConversationKind,
    DEFAULT_GROUP_PARTICIPANTS, MAX_GROUP_PARTICIPANTS,
};
pub use message::{Message, Sender};

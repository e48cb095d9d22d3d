pub mod catalog;
pub mod conversation;

pub use catalog::{OrderItemLine, OrderRecord, ProductRecord, TopProductRow};
pub use conversation::{
    ConversationRecord, ConversationSummary, MessageKind, MessageRecord, NewMessage, TurnRecord,
};

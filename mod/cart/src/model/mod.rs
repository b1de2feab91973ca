pub mod item;
pub mod order;
pub mod slot;

pub use item::CartItem;
pub use order::{Order, OrderForm, OrderStatus, OrderSubmission, SubmissionItem, SubmissionSlot};
pub use slot::{DeliverySlot, SlotPatch};

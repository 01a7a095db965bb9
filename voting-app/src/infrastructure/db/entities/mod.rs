pub mod proposal;
pub mod user;
pub mod vote;

pub use proposal::Entity as Proposal;
pub use user::Entity as User;
pub use vote::Entity as Vote;

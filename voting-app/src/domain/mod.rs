mod channel;
mod page;
mod proposal;
mod user;
mod vote;

pub use channel::Channel;
pub use page::{total_pages, Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use proposal::{
    CommunitySubmission, Creator, NewProposal, Proposal, ProposalChanges, ProposalStatus,
    ProposalUpdate, ProposalWithDetails, COMMUNITY_PLACEHOLDER_THUMBNAIL,
};
pub use user::{role_for_email, Identity, Role, User};
pub use vote::Vote;

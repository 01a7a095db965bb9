mod identify_caller;
mod list_proposals;
mod moderate_proposals;
mod submit_proposal;
mod vote_on_proposal;

pub use identify_caller::IdentifyCaller;
pub use list_proposals::{ListProposals, Listing};
pub use moderate_proposals::{plan_edit, ModerateProposals};
pub use submit_proposal::SubmitProposal;
pub use vote_on_proposal::VoteOnProposal;

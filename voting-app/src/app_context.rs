use crate::application::{
    IdentifyCaller, ListProposals, ModerateProposals, SubmitProposal, VoteOnProposal,
};
use crate::config::{AppConfig, ConfigError};
use crate::domain::Channel;
use crate::infrastructure::auth::GoogleOAuth;
use crate::infrastructure::db::{ProposalRepository, UserRepository, VoteRepository};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Everything a request handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub oauth: GoogleOAuth,
    pub channel: Channel,
    pub list_proposals: Arc<ListProposals>,
    pub vote_on_proposal: Arc<VoteOnProposal>,
    pub moderate_proposals: Arc<ModerateProposals>,
    pub submit_proposal: Arc<SubmitProposal>,
    pub identify_caller: Arc<IdentifyCaller>,
}

impl AppContext {
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Result<Self, ConfigError> {
        let oauth = GoogleOAuth::from_config(&config)?;
        let channel = Channel::from_handle(config.channel_name.as_deref());

        let proposal_repo = ProposalRepository::new(db.clone());
        let vote_repo = VoteRepository::new(db.clone());
        let user_repo = UserRepository::new(db);

        Ok(Self {
            oauth,
            channel,
            list_proposals: Arc::new(ListProposals::new(proposal_repo.clone(), vote_repo.clone())),
            vote_on_proposal: Arc::new(VoteOnProposal::new(vote_repo)),
            moderate_proposals: Arc::new(ModerateProposals::new(proposal_repo.clone())),
            submit_proposal: Arc::new(SubmitProposal::new(proposal_repo)),
            identify_caller: Arc::new(IdentifyCaller::new(user_repo, config.admin_email.clone())),
            config: Arc::new(config),
        })
    }
}

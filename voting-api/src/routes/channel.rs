use axum::{extract::State, Json};
use voting_app::domain::Channel;
use voting_app::AppContext;

pub async fn show(State(ctx): State<AppContext>) -> Json<Channel> {
    Json(ctx.channel.clone())
}

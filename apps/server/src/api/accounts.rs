//! Account linking endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use banksync_core::accounts::{LinkedAccount, NewLinkedAccount};

use crate::error::ApiResult;
use crate::state::AppState;

/// Link one external bank account to a business. The account enters the
/// store `Pending` until the provider's historical backfill completes.
pub async fn link_account(
    State(state): State<AppState>,
    Json(payload): Json<NewLinkedAccount>,
) -> ApiResult<(StatusCode, Json<LinkedAccount>)> {
    let linked = state.links.link_account(payload).await?;
    info!(
        account_id = %linked.id,
        external_item_id = %linked.external_item_id,
        "Linked new account"
    );
    Ok((StatusCode::CREATED, Json(linked)))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{link_payload, post_json, test_state_with_settle};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn linking_creates_a_pending_account() {
        let (state, repo) = test_state_with_settle(0).await;
        let response = post_json(state, "/accounts/link", link_payload("item-1", "acc-1")).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            repo.count_by_status(banksync_core::accounts::AccountStatus::Pending),
            1
        );
    }

    #[tokio::test]
    async fn relinking_the_same_account_is_rejected() {
        let (state, _repo) = test_state_with_settle(0).await;
        let first = post_json(
            state.clone(),
            "/accounts/link",
            link_payload("item-1", "acc-1"),
        )
        .await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = post_json(state, "/accounts/link", link_payload("item-1", "acc-1")).await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    }
}

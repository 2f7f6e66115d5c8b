use actix_web::{get, put, web};

use crate::{
    api::{error, success},
    modules::decision::{
        model::{
            CountLikedYouResponse, ListLikedYouResponse, PaginationQuery, PutDecisionBody,
            PutDecisionResponse, RecipientPath,
        },
        repository_pg::DecisionRepositoryPg,
        service::DecisionService,
    },
    utils::{LenientQuery, ValidatedJson, ValidatedPath},
};

pub type DecisionSvc = DecisionService<DecisionRepositoryPg>;

#[get("/{recipient_user_id}")]
pub async fn list_liked_you(
    decision_service: web::Data<DecisionSvc>,
    path: ValidatedPath<RecipientPath>,
    query: LenientQuery<PaginationQuery>,
) -> Result<success::Success<ListLikedYouResponse>, error::Error> {
    let res = decision_service
        .list_liked_you(&path.0.recipient_user_id, query.0.pagination_token.as_deref())
        .await?;

    Ok(success::Success::ok(Some(res)).message("Likers retrieved successfully"))
}

#[get("/{recipient_user_id}/new")]
pub async fn list_new_liked_you(
    decision_service: web::Data<DecisionSvc>,
    path: ValidatedPath<RecipientPath>,
    query: LenientQuery<PaginationQuery>,
) -> Result<success::Success<ListLikedYouResponse>, error::Error> {
    let res = decision_service
        .list_new_liked_you(&path.0.recipient_user_id, query.0.pagination_token.as_deref())
        .await?;

    Ok(success::Success::ok(Some(res)).message("New likers retrieved successfully"))
}

#[get("/{recipient_user_id}/count")]
pub async fn count_liked_you(
    decision_service: web::Data<DecisionSvc>,
    path: ValidatedPath<RecipientPath>,
) -> Result<success::Success<CountLikedYouResponse>, error::Error> {
    let res = decision_service.count_liked_you(&path.0.recipient_user_id).await?;

    Ok(success::Success::ok(Some(res)).message("Likers counted successfully"))
}

#[put("")]
pub async fn put_decision(
    decision_service: web::Data<DecisionSvc>,
    body: ValidatedJson<PutDecisionBody>,
) -> Result<success::Success<PutDecisionResponse>, error::Error> {
    let body = body.0;
    let res = decision_service
        .put_decision(&body.actor_user_id, &body.recipient_user_id, body.liked_recipient)
        .await?;

    Ok(success::Success::ok(Some(res)).message("Decision recorded successfully"))
}

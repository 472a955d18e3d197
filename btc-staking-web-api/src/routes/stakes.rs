use crate::dto::{ErrorResponse, STAKER_PARAM_MESSAGE};
use btc_staking_store::{
    db::stake::MAX_STAKER_LEN, QueryError, StakeDetails, StakeQueryService,
};
use rocket::{http::Status, response::status, serde::json::Json, State};
use tracing::warn;

type StakesResponse = Result<Json<Vec<StakeDetails>>, status::Custom<Json<ErrorResponse>>>;

#[get("/stakes?<staker>")]
pub async fn by_staker(
    service: &State<StakeQueryService>,
    staker: Option<String>,
) -> StakesResponse {
    let staker = match staker {
        Some(staker) if is_valid_staker(&staker) => staker,
        staker => {
            warn!("Rejected stakes query for staker {:?}", staker);
            return Err(status::Custom(
                Status::BadRequest,
                Json(ErrorResponse::new(STAKER_PARAM_MESSAGE)),
            ));
        }
    };

    match service.by_staker(&staker).await {
        Ok(stakes) => Ok(Json(stakes)),
        Err(QueryError::Internal(message)) => Err(status::Custom(
            Status::InternalServerError,
            Json(ErrorResponse::new(message)),
        )),
    }
}

fn is_valid_staker(staker: &str) -> bool {
    !staker.trim().is_empty() && staker.chars().count() <= MAX_STAKER_LEN
}

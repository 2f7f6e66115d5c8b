use actix_web::{web, FromRequest};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use validator::Validate;

use crate::api::error;

pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest for ValidatedJson<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            let json = fut.await.map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            let model = json.into_inner();
            model.validate().map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            Ok(ValidatedJson(model))
        })
    }
}

pub struct ValidatedPath<T>(pub T);

impl<T> FromRequest for ValidatedPath<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Path::<T>::from_request(req, payload);

        Box::pin(async move {
            let path = fut.await.map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            path.validate().map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            Ok(ValidatedPath(path.into_inner()))
        })
    }
}

/// Query extractor that never rejects: a query string that does not deserialize into `T`
/// (duplicate keys, wrong shapes) yields `T::default()`.
pub struct LenientQuery<T>(pub T);

impl<T> FromRequest for LenientQuery<T>
where
    T: Default + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let query = match web::Query::<T>::from_query(req.query_string()) {
            Ok(query) => query.into_inner(),
            Err(e) => {
                log::debug!("Ignoring unreadable query string {:?}: {}", req.query_string(), e);
                T::default()
            }
        };

        ready(Ok(LenientQuery(query)))
    }
}

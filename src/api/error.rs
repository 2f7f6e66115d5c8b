use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::borrow::Cow;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(Cow<'static, str>),
    #[error("Internal Server Error")]
    InternalServer,
}

#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub message: Cow<'static, str>,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());

        match self {
            // Has Message
            Error::BadRequest(msg) | Error::ServiceUnavailable(msg) => {
                res.json(ErrorBody { message: msg.clone() })
            }
            // No Message
            Error::InternalServer => {
                res.json(ErrorBody { message: "Internal Server Error".into() })
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    // pool / connection failures
    #[error("Store Unavailable: {0}")]
    StoreUnavailable(Cow<'static, str>),
    // malformed query or constraint violation
    #[error("Query Failed: {0:?}")]
    QueryFailed(DbErrorMeta),
    // rolled back on conflict, cancellation or deadline
    #[error("Transaction Aborted: {0}")]
    TransactionAborted(Cow<'static, str>),
    // Custom Errors
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Internal System Error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug)]
pub struct DbErrorMeta {
    pub code: Option<String>,
    pub constraint: Option<String>,
    pub message: String,
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            SystemError::BadRequest(msg) => Error::BadRequest(msg),
            SystemError::StoreUnavailable(_) => {
                log::error!("Store unavailable: {:?}", value);
                Error::ServiceUnavailable("Store is unavailable, try again later".into())
            }
            SystemError::TransactionAborted(_) => {
                log::warn!("Request rolled back: {:?}", value);
                Error::ServiceUnavailable("Request was aborted, try again later".into())
            }
            SystemError::QueryFailed(meta) => {
                log::error!(
                    "Query failed: code={:?} constraint={:?} message={}",
                    meta.code,
                    meta.constraint,
                    meta.message
                );
                Error::InternalServer
            }
            _ => {
                log::error!("Internal Server Error: {:?}", value);
                Error::InternalServer
            }
        }
    }
}

impl From<sqlx::Error> for SystemError {
    fn from(err: sqlx::Error) -> Self {
        log::error!("{:?}", err);
        if let sqlx::Error::Database(db_err) = &err {
            let code = db_err.code().map(|s| s.to_string());
            return match code.as_deref() {
                // serialization_failure, deadlock_detected, query_canceled
                Some("40001") | Some("40P01") | Some("57014") => {
                    SystemError::TransactionAborted(db_err.message().to_string().into())
                }
                // connection exceptions, too_many_connections, admin shutdown
                Some(c) if c.starts_with("08") || c == "53300" || c == "57P01" => {
                    SystemError::StoreUnavailable(db_err.message().to_string().into())
                }
                _ => SystemError::QueryFailed(DbErrorMeta {
                    code: db_err.code().map(|s| s.to_string()),
                    constraint: db_err.constraint().map(|s| s.to_string()),
                    message: db_err.message().to_string(),
                }),
            };
        }
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => SystemError::StoreUnavailable(err.to_string().into()),
            _ => SystemError::InternalError(Box::new(err)),
        }
    }
}

impl SystemError {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn aborted(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::TransactionAborted(msg.into())
    }
}

use axum::extract::{FromRequest, Request};
use axum::Json;
use cn_core::{CompanyQuery, Error};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub trait Validate {
    fn validate(&self) -> cn_core::Result<()>;
}

impl Validate for CompanyQuery {
    fn validate(&self) -> cn_core::Result<()> {
        CompanyQuery::validate(self)
    }
}

/// JSON body that has been deserialized and validated. Any failure is
/// rejected with 422 before the handler runs.
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| Error::Validation(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

//! Path parameter extractors
//!
//! Type-safe extraction of row ids from path parameters.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use forum_core::{CommentId, PostId};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::response::ApiError;

/// Path extractor whose rejection is an [`ApiError`]
#[derive(Debug, Clone)]
pub struct IdPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for IdPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Ok(IdPath(inner))
    }
}

/// Path parameters with post_id
#[derive(Debug, Deserialize)]
pub struct PostPath {
    pub post_id: String,
}

impl PostPath {
    pub fn post_id(&self) -> Result<PostId, ApiError> {
        PostId::parse(&self.post_id).map_err(|_| ApiError::invalid_path("Invalid post_id format"))
    }
}

/// Path parameters with post_id and comment_id
#[derive(Debug, Deserialize)]
pub struct CommentPath {
    pub post_id: String,
    pub comment_id: String,
}

impl CommentPath {
    pub fn post_id(&self) -> Result<PostId, ApiError> {
        PostId::parse(&self.post_id).map_err(|_| ApiError::invalid_path("Invalid post_id format"))
    }

    pub fn comment_id(&self) -> Result<CommentId, ApiError> {
        CommentId::parse(&self.comment_id)
            .map_err(|_| ApiError::invalid_path("Invalid comment_id format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids() {
        let path = CommentPath {
            post_id: "12".to_string(),
            comment_id: "0".to_string(),
        };
        assert_eq!(path.post_id().unwrap(), PostId::new(12));
        assert!(matches!(path.comment_id(), Err(ApiError::InvalidPath(_))));

        let path = PostPath {
            post_id: "abc".to_string(),
        };
        assert!(path.post_id().is_err());
    }
}

use std::sync::Arc;

use validator::Validate;

use crate::{
    domain::{PlayerId, RepoError},
    ports::store::{DocumentStorePort, NewPlayer},
};

#[derive(Clone, Debug)]
pub struct RegisterPlayerRequest {
    pub name: String,
    pub photo: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RegisterPlayerError {
    InvalidName(String),
    InvalidPhoto(String),
    Internal,
}

#[async_trait::async_trait]
pub trait RegisterPlayerUseCase {
    async fn register(&self, request: RegisterPlayerRequest)
    -> Result<PlayerId, RegisterPlayerError>;
}

#[derive(Validate)]
struct NameValidator {
    #[validate(length(min = 1, message = "name must not be blank"))]
    name: String,
}

pub struct RegisterPlayerUseCaseImpl<S: DocumentStorePort> {
    store: Arc<S>,
    max_photo_bytes: usize,
}

impl<S: DocumentStorePort> RegisterPlayerUseCaseImpl<S> {
    pub fn new(store: Arc<S>, max_photo_bytes: usize) -> Self {
        Self {
            store,
            max_photo_bytes,
        }
    }

    fn validate_name(name: &str) -> Result<(), RegisterPlayerError> {
        let validator = NameValidator {
            name: name.trim().to_string(),
        };
        validator.validate().map_err(|errors| {
            let message = errors
                .field_errors()
                .get("name")
                .and_then(|errs| errs.first())
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "invalid name".to_string());
            RegisterPlayerError::InvalidName(message)
        })
    }

    fn validate_photo(&self, photo: Option<String>) -> Result<Option<String>, RegisterPlayerError> {
        let Some(photo) = photo.filter(|p| !p.is_empty()) else {
            return Ok(None);
        };
        if !photo.starts_with("data:image/") {
            return Err(RegisterPlayerError::InvalidPhoto(
                "photo must be an embedded image data URL".to_string(),
            ));
        }
        if photo.len() > self.max_photo_bytes {
            return Err(RegisterPlayerError::InvalidPhoto(format!(
                "photo exceeds {} bytes",
                self.max_photo_bytes
            )));
        }
        Ok(Some(photo))
    }
}

#[async_trait::async_trait]
impl<S: DocumentStorePort + Send + Sync + 'static> RegisterPlayerUseCase
    for RegisterPlayerUseCaseImpl<S>
{
    async fn register(
        &self,
        request: RegisterPlayerRequest,
    ) -> Result<PlayerId, RegisterPlayerError> {
        Self::validate_name(&request.name)?;
        let photo = self.validate_photo(request.photo)?;
        let name = request.name;

        match self.store.add_player(NewPlayer { name, photo }).await {
            Ok(player_id) => {
                log::info!("Registered player {}", player_id);
                Ok(player_id)
            }
            Err(RepoError::StorageError(e)) => {
                log::error!("Failed to register player: {}", e);
                Err(RegisterPlayerError::Internal)
            }
        }
    }
}

use altruist_database::Stored;
use altruist_storage::encoding::upload_base64;
use serde::Deserialize;
use tracing::info;

use crate::address::normalize;
use crate::context::Backend;
use crate::error::require;
use crate::ops::foundation::{foundation_by_wallet, ETH_ADDRESS};
use crate::parser::post::Post;
use crate::ServiceError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub eth_address: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,          // base64
}

/// Publishes a post. The author's foundation name is copied onto it when registered.
pub async fn create_post<B: Backend>(backend: &B, request: CreatePost) -> Result<Stored<Post>, ServiceError> {
    let eth_address = normalize(&require(request.eth_address, ETH_ADDRESS)?);
    let title = require(request.title, "title")?;
    let description = require(request.description, "description")?;
    let image = require(request.image, "image")?;

    let image = upload_base64(backend.objects(), &title, &image).await?;
    let name_foundation = foundation_by_wallet(backend, &eth_address)?.map(|foundation| foundation.record.name);

    let post = backend.records().insert(Post {
        eth_address,
        title,
        description,
        image: image.to_string(),
        name_foundation,
    })?;

    info!(object_id = %post.object_id, wallet = %post.eth_address, "post created");
    Ok(post)
}

pub fn posts_by_foundation_name<B: Backend>(backend: &B, name: &str) -> Result<Vec<Stored<Post>>, ServiceError> {
    Ok(backend.records().find::<Post>("name_foundation", name)?)
}

pub fn posts_by_wallet<B: Backend>(backend: &B, wallet: &str) -> Result<Vec<Stored<Post>>, ServiceError> {
    Ok(backend.records().find::<Post>(ETH_ADDRESS, normalize(wallet))?)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::foundation::{create_foundation, CreateFoundation};
    use crate::ops::testing::{backend, IMAGE};

    fn request(wallet: &str, title: &str) -> CreatePost {
        CreatePost {
            eth_address: Some(wallet.to_string()),
            title: Some(title.to_string()),
            description: Some("update".to_string()),
            image: Some(IMAGE.to_string()),
        }
    }

    #[tokio::test]
    async fn test_posts_by_wallet_and_name() {
        let (_dir, backend) = backend();
        create_foundation(&backend, CreateFoundation {
            eth_address: Some("0xf1".into()),
            name: Some("Ocean Care".into()),
            email: Some("a@ocean.care".into()),
            country: Some("CO".into()),
            description: Some("d".into()),
            image: Some(IMAGE.into()),
        })
        .await
        .unwrap();

        let first = create_post(&backend, request("0xf1", "first")).await.unwrap();
        create_post(&backend, request("0xf2", "unregistered")).await.unwrap();

        assert_eq!(first.name_foundation.as_deref(), Some("Ocean Care"));
        assert_eq!(posts_by_wallet(&backend, "0xf1").unwrap().len(), 1);
        assert_eq!(posts_by_foundation_name(&backend, "Ocean Care").unwrap()[0].title, "first");
        assert!(posts_by_foundation_name(&backend, "Nobody").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_post_requires_image() {
        let (_dir, backend) = backend();
        let mut incomplete = request("0xf1", "first");
        incomplete.image = None;

        assert!(matches!(create_post(&backend, incomplete).await, Err(ServiceError::Validation(_))));
        assert!(posts_by_wallet(&backend, "0xf1").unwrap().is_empty());
    }
}

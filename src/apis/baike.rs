use crate::{
    client::{LarkClient, RequestOptions},
    error::LarkResult,
    models::{
        Entity, EntityData, EntityPage, EntityRequest, EntitySearchRequest, MatchData, MatchInfo,
    },
    pagination::{PageIterator, PageRequest, PaginationConfig},
};
use log::{debug, info};
use reqwest::Method;

const BASE: &str = "/open-apis/baike/v1";

/// Baike (enterprise glossary) API operations
pub struct BaikeApi<'a> {
    client: &'a LarkClient,
}

impl<'a> BaikeApi<'a> {
    pub fn new(client: &'a LarkClient) -> Self {
        Self { client }
    }

    /// Create a glossary entity
    pub async fn create_entity(
        &self,
        request: &EntityRequest,
        options: Option<&RequestOptions>,
    ) -> LarkResult<Entity> {
        info!("Creating glossary entity");
        let path = format!("{}/entities", BASE);
        let req = self.client.request_with(Method::POST, &path, options).await?;
        debug!("HTTP POST {} body: {:?}", path, request);

        let data: EntityData = self.client.execute(req.json(request)).await?;
        Ok(data.entity)
    }

    /// Get a glossary entity
    ///
    /// # Arguments
    /// * `entity_id` - ID of the entity
    pub async fn get_entity(
        &self,
        entity_id: &str,
        options: Option<&RequestOptions>,
    ) -> LarkResult<Entity> {
        info!("Getting glossary entity: {}", entity_id);
        let path = format!("{}/entities/{}", BASE, urlencoding::encode(entity_id));
        let req = self.client.request_with(Method::GET, &path, options).await?;
        debug!("HTTP GET {}", path);

        let data: EntityData = self.client.execute(req).await?;
        Ok(data.entity)
    }

    /// Replace a glossary entity
    pub async fn update_entity(
        &self,
        entity_id: &str,
        request: &EntityRequest,
        options: Option<&RequestOptions>,
    ) -> LarkResult<Entity> {
        info!("Updating glossary entity: {}", entity_id);
        let path = format!("{}/entities/{}", BASE, urlencoding::encode(entity_id));
        let req = self.client.request_with(Method::PUT, &path, options).await?;
        debug!("HTTP PUT {} body: {:?}", path, request);

        let data: EntityData = self.client.execute(req.json(request)).await?;
        Ok(data.entity)
    }

    /// Exact-match a word against entity keys and aliases
    pub async fn match_entities(
        &self,
        word: &str,
        options: Option<&RequestOptions>,
    ) -> LarkResult<Vec<MatchInfo>> {
        info!("Matching glossary word: {}", word);
        let path = format!("{}/entities/match", BASE);
        let req = self.client.request_with(Method::POST, &path, options).await?;

        let data: MatchData = self
            .client
            .execute(req.json(&serde_json::json!({ "word": word })))
            .await?;
        Ok(data.results)
    }

    /// Download an image or file referenced from an entity description
    pub async fn download_file(
        &self,
        file_token: &str,
        options: Option<&RequestOptions>,
    ) -> LarkResult<bytes::Bytes> {
        info!("Downloading glossary file: {}", file_token);
        let path = format!("{}/files/{}/download", BASE, urlencoding::encode(file_token));
        let req = self.client.request_with(Method::GET, &path, options).await?;
        debug!("HTTP GET {}", path);

        self.client.execute_bytes(req).await
    }

    /// Iterate all glossary entities
    ///
    /// # Arguments
    /// * `provider` - Only entities imported by this external provider
    /// * `page_size` - Maximum entities per page
    /// * `options` - Extra headers and query values sent with every page
    pub fn list_entities_with_iterator(
        &self,
        provider: Option<&str>,
        page_size: Option<u32>,
        options: Option<&RequestOptions>,
    ) -> PageIterator<'a, EntityPage> {
        info!("Listing glossary entities");
        let page = PageRequest::get(format!("{}/entities", BASE))
            .query_opt("provider", provider)
            .page_size(page_size)
            .options(options.cloned().unwrap_or_default());

        self.client.paginate(page, PaginationConfig::default())
    }

    /// Iterate glossary entities matching a fuzzy search
    pub fn search_entities_with_iterator(
        &self,
        request: &EntitySearchRequest,
        page_size: Option<u32>,
        options: Option<&RequestOptions>,
    ) -> LarkResult<PageIterator<'a, EntityPage>> {
        info!("Searching glossary entities");
        let page = PageRequest::post(format!("{}/entities/search", BASE))
            .page_size(page_size)
            .options(options.cloned().unwrap_or_default())
            .body(serde_json::to_value(request)?);

        Ok(self.client.paginate(page, PaginationConfig::default()))
    }
}

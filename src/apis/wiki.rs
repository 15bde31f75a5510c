use crate::{
    client::{LarkClient, RequestOptions},
    error::LarkResult,
    models::{
        Node, NodeCreateRequest, NodeData, NodePage, NodeSearchPage, NodeSearchRequest, Space,
        SpaceData, SpacePage,
    },
    pagination::{PageIterator, PageRequest, PaginationConfig},
};
use log::{debug, info};
use reqwest::Method;

const BASE: &str = "/open-apis/wiki/v2";

/// Wiki API operations
pub struct WikiApi<'a> {
    client: &'a LarkClient,
}

impl<'a> WikiApi<'a> {
    pub fn new(client: &'a LarkClient) -> Self {
        Self { client }
    }

    /// Get information about a knowledge space
    ///
    /// # Arguments
    /// * `space_id` - ID of the space
    pub async fn get_space(
        &self,
        space_id: &str,
        options: Option<&RequestOptions>,
    ) -> LarkResult<Space> {
        info!("Getting wiki space: {}", space_id);
        let path = format!("{}/spaces/{}", BASE, urlencoding::encode(space_id));
        let req = self.client.request_with(Method::GET, &path, options).await?;
        debug!("HTTP GET {}", path);

        let data: SpaceData = self.client.execute(req).await?;
        Ok(data.space)
    }

    /// Resolve a node from its node token (or document token with `obj_type`)
    ///
    /// # Arguments
    /// * `token` - Node token, or object token when `obj_type` is given
    /// * `obj_type` - Object type of `token` (e.g. "docx", "sheet")
    pub async fn get_node(
        &self,
        token: &str,
        obj_type: Option<&str>,
        options: Option<&RequestOptions>,
    ) -> LarkResult<Node> {
        info!("Getting wiki node: {}", token);
        let path = format!("{}/spaces/get_node", BASE);
        let mut req = self.client.request_with(Method::GET, &path, options).await?;
        req = req.query(&[("token", token)]);
        if let Some(obj_type) = obj_type {
            req = req.query(&[("obj_type", obj_type)]);
        }
        debug!("HTTP GET {} with token={}", path, token);

        let data: NodeData = self.client.execute(req).await?;
        Ok(data.node)
    }

    /// Create a node in a knowledge space
    pub async fn create_node(
        &self,
        space_id: &str,
        request: &NodeCreateRequest,
        options: Option<&RequestOptions>,
    ) -> LarkResult<Node> {
        info!("Creating wiki node in space: {}", space_id);
        let path = format!("{}/spaces/{}/nodes", BASE, urlencoding::encode(space_id));
        let req = self.client.request_with(Method::POST, &path, options).await?;
        debug!("HTTP POST {} body: {:?}", path, request);

        let data: NodeData = self.client.execute(req.json(request)).await?;
        Ok(data.node)
    }

    /// Iterate the knowledge spaces visible to the caller
    pub fn list_spaces_with_iterator(
        &self,
        page_size: Option<u32>,
        options: Option<&RequestOptions>,
    ) -> PageIterator<'a, SpacePage> {
        info!("Listing wiki spaces");
        let page = PageRequest::get(format!("{}/spaces", BASE))
            .page_size(page_size)
            .options(options.cloned().unwrap_or_default());

        self.client.paginate(page, PaginationConfig::default())
    }

    /// Iterate the child nodes of a space, or of one parent node
    ///
    /// # Arguments
    /// * `space_id` - ID of the space
    /// * `parent_node_token` - List children of this node instead of the space root
    /// * `page_size` - Maximum nodes per page
    /// * `options` - Extra headers and query values sent with every page
    pub fn list_nodes_with_iterator(
        &self,
        space_id: &str,
        parent_node_token: Option<&str>,
        page_size: Option<u32>,
        options: Option<&RequestOptions>,
    ) -> PageIterator<'a, NodePage> {
        info!("Listing wiki nodes in space: {}", space_id);
        let page = PageRequest::get(format!(
            "{}/spaces/{}/nodes",
            BASE,
            urlencoding::encode(space_id)
        ))
        .query_opt("parent_node_token", parent_node_token)
        .page_size(page_size)
        .options(options.cloned().unwrap_or_default());

        self.client.paginate(page, PaginationConfig::default())
    }

    /// Iterate full-text search hits over wiki nodes
    pub fn search_nodes_with_iterator(
        &self,
        request: &NodeSearchRequest,
        page_size: Option<u32>,
        options: Option<&RequestOptions>,
    ) -> LarkResult<PageIterator<'a, NodeSearchPage>> {
        info!("Searching wiki nodes for: {}", request.query);
        let page = PageRequest::post("/open-apis/wiki/v1/nodes/search")
            .page_size(page_size)
            .options(options.cloned().unwrap_or_default())
            .body(serde_json::to_value(request)?);

        Ok(self.client.paginate(page, PaginationConfig::default()))
    }
}

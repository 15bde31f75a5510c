use crate::{
    client::{LarkClient, RequestOptions},
    error::LarkResult,
    models::{
        millis, Approval, Instance, InstanceCancelRequest, InstanceCodePage, InstanceCreateRequest,
        InstanceCreated, TaskActionRequest, TaskSearchPage, TaskSearchRequest, TaskTopic,
        UserTaskPage,
    },
    pagination::{PageIterator, PageRequest, PaginationConfig},
};
use chrono::{DateTime, Utc};
use log::{debug, info};
use reqwest::Method;

const BASE: &str = "/open-apis/approval/v4";

/// Approval API operations
pub struct ApprovalApi<'a> {
    client: &'a LarkClient,
}

impl<'a> ApprovalApi<'a> {
    pub fn new(client: &'a LarkClient) -> Self {
        Self { client }
    }

    /// Get an approval definition
    ///
    /// # Arguments
    /// * `approval_code` - Code of the approval definition
    /// * `options` - Extra headers/query for this call
    pub async fn get_approval(
        &self,
        approval_code: &str,
        options: Option<&RequestOptions>,
    ) -> LarkResult<Approval> {
        info!("Getting approval definition: {}", approval_code);
        let path = format!("{}/approvals/{}", BASE, urlencoding::encode(approval_code));
        let req = self.client.request_with(Method::GET, &path, options).await?;
        debug!("HTTP GET {}", path);

        self.client.execute(req).await
    }

    /// Create an approval instance
    pub async fn create_instance(
        &self,
        request: &InstanceCreateRequest,
        options: Option<&RequestOptions>,
    ) -> LarkResult<InstanceCreated> {
        info!("Creating instance of approval: {}", request.approval_code);
        let path = format!("{}/instances", BASE);
        let req = self.client.request_with(Method::POST, &path, options).await?;
        debug!("HTTP POST {} body: {:?}", path, request);

        self.client.execute(req.json(request)).await
    }

    /// Get an approval instance with its tasks
    pub async fn get_instance(
        &self,
        instance_code: &str,
        options: Option<&RequestOptions>,
    ) -> LarkResult<Instance> {
        info!("Getting approval instance: {}", instance_code);
        let path = format!("{}/instances/{}", BASE, urlencoding::encode(instance_code));
        let req = self.client.request_with(Method::GET, &path, options).await?;
        debug!("HTTP GET {}", path);

        self.client.execute(req).await
    }

    /// Cancel (withdraw) an approval instance
    pub async fn cancel_instance(
        &self,
        request: &InstanceCancelRequest,
        options: Option<&RequestOptions>,
    ) -> LarkResult<serde_json::Value> {
        info!("Cancelling approval instance: {}", request.instance_code);
        let path = format!("{}/instances/cancel", BASE);
        let req = self.client.request_with(Method::POST, &path, options).await?;
        debug!("HTTP POST {} body: {:?}", path, request);

        self.client.execute(req.json(request)).await
    }

    /// Approve a task
    pub async fn approve_task(
        &self,
        request: &TaskActionRequest,
        options: Option<&RequestOptions>,
    ) -> LarkResult<serde_json::Value> {
        info!("Approving task {} of {}", request.task_id, request.instance_code);
        let path = format!("{}/tasks/approve", BASE);
        let req = self.client.request_with(Method::POST, &path, options).await?;

        self.client.execute(req.json(request)).await
    }

    /// Reject a task
    pub async fn reject_task(
        &self,
        request: &TaskActionRequest,
        options: Option<&RequestOptions>,
    ) -> LarkResult<serde_json::Value> {
        info!("Rejecting task {} of {}", request.task_id, request.instance_code);
        let path = format!("{}/tasks/reject", BASE);
        let req = self.client.request_with(Method::POST, &path, options).await?;

        self.client.execute(req.json(request)).await
    }

    /// Iterate instance codes of one approval created within a time window
    ///
    /// # Arguments
    /// * `approval_code` - Code of the approval definition
    /// * `start_time` - Window start (inclusive)
    /// * `end_time` - Window end (inclusive)
    /// * `page_size` - Maximum codes per page (server default when `None`)
    /// * `options` - Extra headers and query values sent with every page
    pub fn list_instances_with_iterator(
        &self,
        approval_code: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        page_size: Option<u32>,
        options: Option<&RequestOptions>,
    ) -> PageIterator<'a, InstanceCodePage> {
        info!("Listing instances of approval: {}", approval_code);
        let page = PageRequest::get(format!("{}/instances", BASE))
            .query("approval_code", approval_code)
            .query("start_time", millis(start_time))
            .query("end_time", millis(end_time))
            .page_size(page_size)
            .options(options.cloned().unwrap_or_default());

        self.client.paginate(page, PaginationConfig::default())
    }

    /// Iterate the tasks of a user under a topic (todo, done, ...)
    pub fn query_tasks_with_iterator(
        &self,
        user_id: &str,
        topic: TaskTopic,
        page_size: Option<u32>,
        options: Option<&RequestOptions>,
    ) -> PageIterator<'a, UserTaskPage> {
        info!("Querying {:?} tasks of user: {}", topic, user_id);
        let page = PageRequest::get(format!("{}/tasks/query", BASE))
            .query("user_id", user_id)
            .query("topic", topic.as_param())
            .page_size(page_size)
            .options(options.cloned().unwrap_or_default());

        self.client.paginate(page, PaginationConfig::default())
    }

    /// Iterate tasks matching a search filter
    pub fn search_tasks_with_iterator(
        &self,
        request: &TaskSearchRequest,
        page_size: Option<u32>,
        options: Option<&RequestOptions>,
    ) -> LarkResult<PageIterator<'a, TaskSearchPage>> {
        info!("Searching approval tasks");
        let page = PageRequest::post(format!("{}/tasks/search", BASE))
            .page_size(page_size)
            .options(options.cloned().unwrap_or_default())
            .body(serde_json::to_value(request)?);

        Ok(self.client.paginate(page, PaginationConfig::default()))
    }
}

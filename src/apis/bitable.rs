use crate::{
    client::{LarkClient, RequestOptions},
    error::LarkResult,
    models::{
        App, AppData, DeletedRecord, FieldPage, Record, RecordData, RecordPage, RecordRequest,
        RecordSearchRequest, TablePage,
    },
    pagination::{PageIterator, PageRequest, PaginationConfig},
};
use log::{debug, info};
use reqwest::Method;

/// Bitable (base tables) API operations
pub struct BitableApi<'a> {
    client: &'a LarkClient,
}

fn app_path(app_token: &str) -> String {
    format!(
        "/open-apis/bitable/v1/apps/{}",
        urlencoding::encode(app_token)
    )
}

fn records_path(app_token: &str, table_id: &str) -> String {
    format!(
        "{}/tables/{}/records",
        app_path(app_token),
        urlencoding::encode(table_id)
    )
}

impl<'a> BitableApi<'a> {
    pub fn new(client: &'a LarkClient) -> Self {
        Self { client }
    }

    /// Get base metadata
    ///
    /// # Arguments
    /// * `app_token` - Token of the base
    pub async fn get_app(
        &self,
        app_token: &str,
        options: Option<&RequestOptions>,
    ) -> LarkResult<App> {
        info!("Getting base: {}", app_token);
        let path = app_path(app_token);
        let req = self.client.request_with(Method::GET, &path, options).await?;
        debug!("HTTP GET {}", path);

        let data: AppData = self.client.execute(req).await?;
        Ok(data.app)
    }

    /// Create a record
    pub async fn create_record(
        &self,
        app_token: &str,
        table_id: &str,
        request: &RecordRequest,
        options: Option<&RequestOptions>,
    ) -> LarkResult<Record> {
        info!("Creating record in table {} of base {}", table_id, app_token);
        let path = records_path(app_token, table_id);
        let req = self.client.request_with(Method::POST, &path, options).await?;
        debug!("HTTP POST {} body: {:?}", path, request);

        let data: RecordData = self.client.execute(req.json(request)).await?;
        Ok(data.record)
    }

    /// Get a record
    pub async fn get_record(
        &self,
        app_token: &str,
        table_id: &str,
        record_id: &str,
        options: Option<&RequestOptions>,
    ) -> LarkResult<Record> {
        info!("Getting record {} in table {}", record_id, table_id);
        let path = format!(
            "{}/{}",
            records_path(app_token, table_id),
            urlencoding::encode(record_id)
        );
        let req = self.client.request_with(Method::GET, &path, options).await?;
        debug!("HTTP GET {}", path);

        let data: RecordData = self.client.execute(req).await?;
        Ok(data.record)
    }

    /// Update the given fields of a record
    pub async fn update_record(
        &self,
        app_token: &str,
        table_id: &str,
        record_id: &str,
        request: &RecordRequest,
        options: Option<&RequestOptions>,
    ) -> LarkResult<Record> {
        info!("Updating record {} in table {}", record_id, table_id);
        let path = format!(
            "{}/{}",
            records_path(app_token, table_id),
            urlencoding::encode(record_id)
        );
        let req = self.client.request_with(Method::PUT, &path, options).await?;
        debug!("HTTP PUT {} body: {:?}", path, request);

        let data: RecordData = self.client.execute(req.json(request)).await?;
        Ok(data.record)
    }

    /// Delete a record
    pub async fn delete_record(
        &self,
        app_token: &str,
        table_id: &str,
        record_id: &str,
        options: Option<&RequestOptions>,
    ) -> LarkResult<DeletedRecord> {
        info!("Deleting record {} in table {}", record_id, table_id);
        let path = format!(
            "{}/{}",
            records_path(app_token, table_id),
            urlencoding::encode(record_id)
        );
        let req = self
            .client
            .request_with(Method::DELETE, &path, options)
            .await?;
        debug!("HTTP DELETE {}", path);

        self.client.execute(req).await
    }

    /// Iterate the tables of a base
    pub fn list_tables_with_iterator(
        &self,
        app_token: &str,
        page_size: Option<u32>,
        options: Option<&RequestOptions>,
    ) -> PageIterator<'a, TablePage> {
        info!("Listing tables of base: {}", app_token);
        let page = PageRequest::get(format!("{}/tables", app_path(app_token)))
            .page_size(page_size)
            .options(options.cloned().unwrap_or_default());

        self.client.paginate(page, PaginationConfig::default())
    }

    /// Iterate the field definitions of a table
    ///
    /// # Arguments
    /// * `app_token` - Token of the base
    /// * `table_id` - ID of the table
    /// * `view_id` - Only fields visible in this view
    /// * `page_size` - Maximum fields per page
    /// * `options` - Extra headers and query values sent with every page
    pub fn list_fields_with_iterator(
        &self,
        app_token: &str,
        table_id: &str,
        view_id: Option<&str>,
        page_size: Option<u32>,
        options: Option<&RequestOptions>,
    ) -> PageIterator<'a, FieldPage> {
        info!("Listing fields of table {} in base {}", table_id, app_token);
        let page = PageRequest::get(format!(
            "{}/tables/{}/fields",
            app_path(app_token),
            urlencoding::encode(table_id)
        ))
        .query_opt("view_id", view_id)
        .page_size(page_size)
        .options(options.cloned().unwrap_or_default());

        self.client.paginate(page, PaginationConfig::default())
    }

    /// Iterate the records of a table
    ///
    /// # Arguments
    /// * `app_token` - Token of the base
    /// * `table_id` - ID of the table
    /// * `view_id` - Only records of this view, in view order
    /// * `filter` - Formula filter, e.g. `CurrentValue.[Status]="Done"`
    /// * `page_size` - Maximum records per page
    /// * `options` - Extra headers and query values sent with every page
    pub fn list_records_with_iterator(
        &self,
        app_token: &str,
        table_id: &str,
        view_id: Option<&str>,
        filter: Option<&str>,
        page_size: Option<u32>,
        options: Option<&RequestOptions>,
    ) -> PageIterator<'a, RecordPage> {
        info!("Listing records of table {} in base {}", table_id, app_token);
        let page = PageRequest::get(records_path(app_token, table_id))
            .query_opt("view_id", view_id)
            .query_opt("filter", filter)
            .page_size(page_size)
            .options(options.cloned().unwrap_or_default());

        self.client.paginate(page, PaginationConfig::default())
    }

    /// Iterate the records matching a structured search
    pub fn search_records_with_iterator(
        &self,
        app_token: &str,
        table_id: &str,
        request: &RecordSearchRequest,
        page_size: Option<u32>,
        options: Option<&RequestOptions>,
    ) -> LarkResult<PageIterator<'a, RecordPage>> {
        info!("Searching records of table {} in base {}", table_id, app_token);
        let page = PageRequest::post(format!("{}/search", records_path(app_token, table_id)))
            .page_size(page_size)
            .options(options.cloned().unwrap_or_default())
            .body(serde_json::to_value(request)?);

        Ok(self.client.paginate(page, PaginationConfig::default()))
    }
}

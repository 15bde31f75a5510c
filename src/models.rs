use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Envelope wrapping every open platform response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub code: i64,
    pub msg: Option<String>,
    pub data: Option<serde_json::Value>,
}

/// Decode a missing or `null` collection as empty
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Millisecond timestamp string, as the open platform expects in query parameters
pub fn millis(time: DateTime<Utc>) -> String {
    time.timestamp_millis().to_string()
}

// ---------------------------------------------------------------------------
// Approval
// ---------------------------------------------------------------------------

/// Approval definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Approval {
    pub approval_name: Option<String>,
    pub status: Option<String>,
    pub form: Option<String>,
    pub node_list: Option<Vec<ApprovalNode>>,
}

/// Node of an approval definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalNode {
    pub name: Option<String>,
    pub need_approver: Option<bool>,
    pub node_id: Option<String>,
    pub custom_node_id: Option<String>,
    pub node_type: Option<String>,
}

/// Approval instance lifecycle status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceStatus {
    Pending,
    Approved,
    Rejected,
    Canceled,
    Deleted,
    #[serde(other)]
    Unknown,
}

/// Approval instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub approval_code: Option<String>,
    pub approval_name: Option<String>,
    pub instance_code: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<InstanceStatus>,
    pub user_id: Option<String>,
    pub open_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub form: Option<String>,
    pub task_list: Option<Vec<InstanceTask>>,
}

/// Task attached to an approval instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceTask {
    pub id: String,
    pub user_id: Option<String>,
    pub open_id: Option<String>,
    pub status: Option<String>,
    pub node_id: Option<String>,
    pub node_name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Instance creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceCreateRequest {
    pub approval_code: String,
    /// Form widget values serialized as a JSON string
    pub form: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    /// Idempotency key; resubmitting the same uuid never creates a second instance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

impl InstanceCreateRequest {
    /// Build a request with a fresh idempotency key
    pub fn new(approval_code: impl Into<String>, form: impl Into<String>) -> Self {
        Self {
            approval_code: approval_code.into(),
            form: form.into(),
            user_id: None,
            open_id: None,
            department_id: None,
            uuid: Some(uuid::Uuid::new_v4().to_string()),
        }
    }
}

/// Response of instance creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceCreated {
    pub instance_code: String,
}

/// Instance cancellation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceCancelRequest {
    pub approval_code: String,
    pub instance_code: String,
    pub user_id: String,
}

/// Approve or reject a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskActionRequest {
    pub approval_code: String,
    pub instance_code: String,
    pub user_id: String,
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
}

/// One page of instance codes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceCodePage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub instance_code_list: Vec<String>,
}

/// Task topic for task queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTopic {
    Todo,
    Done,
    Initiated,
    CcUnread,
    CcRead,
}

impl TaskTopic {
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Todo => "1",
            Self::Done => "2",
            Self::Initiated => "3",
            Self::CcUnread => "17",
            Self::CcRead => "18",
        }
    }
}

/// Task as returned by the user task query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTask {
    pub topic: Option<String>,
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub task_id: Option<String>,
    pub process_id: Option<String>,
    pub process_code: Option<String>,
    pub status: Option<String>,
    pub process_status: Option<String>,
    pub definition_code: Option<String>,
    pub definition_name: Option<String>,
    pub initiators: Option<Vec<String>>,
    pub initiator_names: Option<Vec<String>>,
}

/// Task counters returned alongside task queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCount {
    pub total: Option<i64>,
    pub has_more: Option<bool>,
}

/// One page of the user task query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTaskPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<UserTask>,
    pub count: Option<TaskCount>,
}

/// Task search filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskSearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_start_time_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_start_time_to: Option<String>,
}

/// Search hit combining approval, instance and task views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSearchItem {
    pub approval: Option<serde_json::Value>,
    pub group: Option<serde_json::Value>,
    pub instance: Option<serde_json::Value>,
    pub task: Option<serde_json::Value>,
}

/// One page of task search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSearchPage {
    pub count: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub task_list: Vec<TaskSearchItem>,
}

// ---------------------------------------------------------------------------
// Wiki
// ---------------------------------------------------------------------------

/// Knowledge space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    pub space_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub space_type: Option<String>,
    pub visibility: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SpaceData {
    pub space: Space,
}

/// One page of knowledge spaces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacePage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Space>,
}

/// Node in a knowledge space tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub space_id: Option<String>,
    pub node_token: String,
    pub obj_token: Option<String>,
    pub obj_type: Option<String>,
    pub parent_node_token: Option<String>,
    pub node_type: Option<String>,
    pub origin_node_token: Option<String>,
    pub has_child: Option<bool>,
    pub title: Option<String>,
    pub obj_create_time: Option<String>,
    pub obj_edit_time: Option<String>,
    pub node_create_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NodeData {
    pub node: Node,
}

/// One page of child nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Node>,
}

/// Node creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeCreateRequest {
    pub obj_type: String,
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_node_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_node_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Full-text node search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

/// Node search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchedNode {
    pub node_id: Option<String>,
    pub space_id: Option<String>,
    pub obj_type: Option<i64>,
    pub obj_token: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

/// One page of node search hits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSearchPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<SearchedNode>,
}

// ---------------------------------------------------------------------------
// Baike (glossary)
// ---------------------------------------------------------------------------

/// Visibility of a glossary term
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayStatus {
    pub allow_highlight: bool,
    pub allow_search: bool,
}

/// Glossary key or alias
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_status: Option<DisplayStatus>,
}

impl Term {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_status: Some(DisplayStatus {
                allow_highlight: true,
                allow_search: true,
            }),
        }
    }
}

/// Link back to an external system owning the entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OuterInfo {
    pub provider: String,
    pub outer_id: String,
}

/// Glossary entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub main_keys: Vec<Term>,
    pub aliases: Option<Vec<Term>>,
    pub description: Option<String>,
    pub related_meta: Option<serde_json::Value>,
    pub outer_info: Option<OuterInfo>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EntityData {
    pub entity: Entity,
}

/// Entity creation or update request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRequest {
    pub main_keys: Vec<Term>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<Term>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_meta: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outer_info: Option<OuterInfo>,
}

/// One page of glossary entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entities: Vec<Entity>,
}

/// Entity search filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitySearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification_filter: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creators: Option<Vec<String>>,
}

/// Exact match hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchInfo {
    pub entity_id: String,
    #[serde(rename = "type")]
    pub match_type: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MatchData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<MatchInfo>,
}

// ---------------------------------------------------------------------------
// Bitable (base tables)
// ---------------------------------------------------------------------------

/// Base application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    pub app_token: String,
    pub name: Option<String>,
    pub revision: Option<i64>,
    pub is_advanced: Option<bool>,
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AppData {
    pub app: App,
}

/// Table inside a base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub table_id: String,
    pub revision: Option<i64>,
    pub name: Option<String>,
}

/// One page of tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablePage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Table>,
    pub total: Option<i64>,
}

/// Column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub field_id: String,
    pub field_name: String,
    #[serde(rename = "type")]
    pub field_type: Option<i64>,
    pub property: Option<serde_json::Value>,
    pub is_primary: Option<bool>,
    pub ui_type: Option<String>,
}

/// One page of field definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Field>,
    pub total: Option<i64>,
}

/// Table row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub record_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: HashMap<String, serde_json::Value>,
    pub created_time: Option<i64>,
    pub last_modified_time: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RecordData {
    pub record: Record,
}

/// One page of records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Record>,
    pub total: Option<i64>,
}

/// Record creation or update request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordRequest {
    pub fields: HashMap<String, serde_json::Value>,
}

/// Result of a record deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedRecord {
    pub deleted: bool,
    pub record_id: String,
}

/// Sort clause for record search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSort {
    pub field_name: String,
    #[serde(default)]
    pub desc: bool,
}

/// Single filter condition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field_name: String,
    pub operator: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: Vec<String>,
}

/// Filter combining conditions with `and`/`or`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordFilter {
    pub conjunction: String,
    pub conditions: Vec<FilterCondition>,
}

/// Record search request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<RecordSort>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<RecordFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatic_fields: Option<bool>,
}

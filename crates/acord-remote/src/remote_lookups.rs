//! Typed lookups over the generic [`RemoteApi`] contract.
//!
//! ActiveCollab wraps single-resource responses as `{"single": {...}}`; the
//! helpers accept the bare object as well.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::remote_api::{RemoteApi, RemoteApiError};

pub const ASSIGNMENT_REPORT_ROUTE: &str = "reports/run";
pub const ASSIGNMENT_REPORT_TYPE: &str = "AssignmentFilter";
const PROJECTS_ROUTE: &str = "projects";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Public struct `RemoteProject` used across acord components.
pub struct RemoteProject {
    pub id: u64,
    pub name: String,
}

pub async fn task_list_name(
    api: &dyn RemoteApi,
    project_id: u64,
    task_list_id: u64,
) -> Result<String, RemoteApiError> {
    let route = format!("projects/{project_id}/task-lists/{task_list_id}");
    let response = api.get(&route, &[]).await?;
    single_resource_name(&route, &response)
}

pub async fn task_name(
    api: &dyn RemoteApi,
    project_id: u64,
    task_id: u64,
) -> Result<String, RemoteApiError> {
    let route = format!("projects/{project_id}/tasks/{task_id}");
    let response = api.get(&route, &[]).await?;
    single_resource_name(&route, &response)
}

/// Scans the "all assignments" report for the task and returns its project.
///
/// The report is fetched whole on every call; `Ok(None)` means the task is not
/// present in it.
pub async fn find_task_project_id(
    api: &dyn RemoteApi,
    task_id: u64,
) -> Result<Option<u64>, RemoteApiError> {
    let report = api
        .get(ASSIGNMENT_REPORT_ROUTE, &[("type", ASSIGNMENT_REPORT_TYPE)])
        .await?;
    Ok(assignment_records(&report)
        .into_iter()
        .filter(|record| is_task_record(record))
        .find(|record| record.get("id").and_then(Value::as_u64) == Some(task_id))
        .and_then(|record| record.get("project_id").and_then(Value::as_u64)))
}

pub async fn list_projects(api: &dyn RemoteApi) -> Result<Vec<RemoteProject>, RemoteApiError> {
    let response = api.get(PROJECTS_ROUTE, &[]).await?;
    let Value::Array(rows) = response else {
        return Err(RemoteApiError::invalid_response(
            PROJECTS_ROUTE,
            "expected an array of projects",
        ));
    };
    rows.into_iter()
        .map(|row| serde_json::from_value::<RemoteProject>(row).map_err(RemoteApiError::from))
        .collect()
}

fn single_resource_name(route: &str, response: &Value) -> Result<String, RemoteApiError> {
    let resource = response.get("single").unwrap_or(response);
    resource
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| RemoteApiError::invalid_response(route, "response has no name"))
}

/// Flattens report groups (`{"<group>": {"assignments": {..} | [..]}}`) into
/// their assignment records, keeping report order.
fn assignment_records(report: &Value) -> Vec<&Value> {
    let groups: Vec<&Value> = match report {
        Value::Object(object) if object.contains_key("assignments") => vec![report],
        Value::Object(object) => object.values().collect(),
        Value::Array(rows) => rows.iter().collect(),
        _ => Vec::new(),
    };
    let mut records = Vec::new();
    for group in groups {
        match group.get("assignments") {
            Some(Value::Object(assignments)) => records.extend(assignments.values()),
            Some(Value::Array(assignments)) => records.extend(assignments.iter()),
            _ => {}
        }
    }
    records
}

fn is_task_record(record: &Value) -> bool {
    match record.get("type").and_then(Value::as_str) {
        Some(kind) => kind == "Task",
        None => true,
    }
}

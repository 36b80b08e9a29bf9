//! ActiveCollab REST collaborator: the generic `get`/`post` contract, the
//! reqwest-backed client, and the typed lookups the event pipeline consumes.

mod activecollab_client;
mod remote_api;
mod remote_lookups;

pub use activecollab_client::{ActiveCollabClient, ActiveCollabClientConfig};
pub use remote_api::{RemoteApi, RemoteApiError};
pub use remote_lookups::{
    find_task_project_id, list_projects, task_list_name, task_name, RemoteProject,
    ASSIGNMENT_REPORT_ROUTE, ASSIGNMENT_REPORT_TYPE,
};

use serde::{Deserialize, Serialize};

/// Planner plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerPlan {
    pub id: Option<String>,
    pub title: Option<String>,
    pub owner: Option<String>,
}

/// Planner task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerTask {
    pub id: Option<String>,
    pub plan_id: Option<String>,
    pub title: Option<String>,
    pub percent_complete: Option<i32>,
    pub due_date_time: Option<String>,
}

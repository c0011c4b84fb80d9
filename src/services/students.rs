//! Student service and the student sub-resources

use serde_json::json;
use tracing::info;

use super::resource::ResourceService;
use super::units::decode_list;
use crate::api::{ApiClient, ModuleApi};
use crate::models::{BillingPlan, Enrollment, FinancialSummary, Resource, Student, StudentCourse, Subscription};
use crate::utils::errors::Result;
use crate::utils::logging::log_admin_action;

#[derive(Debug, Clone)]
pub struct StudentService {
    resource: ResourceService<Student>,
    api: ModuleApi,
}

impl StudentService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            resource: ResourceService::new(client.clone()),
            api: ModuleApi::new("students", client),
        }
    }

    pub fn resource(&self) -> &ResourceService<Student> {
        &self.resource
    }

    pub async fn enrollments(&self, student_id: &str) -> Result<Vec<Enrollment>> {
        self.sub_list(student_id, "enrollments").await
    }

    pub async fn courses(&self, student_id: &str) -> Result<Vec<StudentCourse>> {
        self.sub_list(student_id, "courses").await
    }

    pub async fn financial_summary(&self, student_id: &str) -> Result<FinancialSummary> {
        let path = format!("{}/financial-summary", Student::item_path(student_id));
        let state = self.api.fetch_with_states(&path, &[]).await?;
        if state.is_empty() {
            return Ok(FinancialSummary::default());
        }
        Ok(serde_json::from_value(state.into_envelope().data)?)
    }

    pub async fn subscriptions(&self, student_id: &str) -> Result<Vec<Subscription>> {
        let envelope = self
            .api
            .fetch_with_states(
                "/api/financial/subscriptions",
                &[("studentId".to_string(), student_id.to_string())],
            )
            .await?
            .into_envelope();
        decode_list(envelope.data)
    }

    /// Activate or deactivate a student without touching other fields
    pub async fn set_active(&self, student_id: &str, active: bool) -> Result<()> {
        self.resource
            .patch(student_id, &json!({ "isActive": active }))
            .await?;
        log_admin_action(
            "students",
            if active { "activate" } else { "deactivate" },
            Some(student_id),
            None,
        );
        Ok(())
    }

    pub async fn billing_plans(&self) -> Result<Vec<BillingPlan>> {
        let envelope = self
            .api
            .fetch_with_states("/api/billing-plans", &[])
            .await?
            .into_envelope();
        decode_list(envelope.data)
    }

    async fn sub_list<T: serde::de::DeserializeOwned>(&self, student_id: &str, segment: &str) -> Result<Vec<T>> {
        let path = format!("{}/{}", Student::item_path(student_id), segment);
        let envelope = self.api.fetch_with_states(&path, &[]).await?.into_envelope();
        let items: Vec<T> = decode_list(envelope.data)?;
        info!(student_id = %student_id, segment = segment, count = items.len(), "Student sub-resource loaded");
        Ok(items)
    }
}

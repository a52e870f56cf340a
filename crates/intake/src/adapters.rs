//! Database-backed implementations of the collaborator traits.

use database::{complaint, department, Database, DatabaseError, NewComplaint};
use intake_core::{
    async_trait, ComplaintPayload, ComplaintReceipt, ComplaintSink, Department,
    DepartmentDirectory, ServiceError,
};
use tracing::info;

fn service_error(err: DatabaseError) -> ServiceError {
    match err {
        DatabaseError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
        other => ServiceError::ProcessingFailed(other.to_string()),
    }
}

/// Lists departments from the `departments` table.
#[derive(Debug, Clone)]
pub struct DatabaseDirectory {
    database: Database,
}

impl DatabaseDirectory {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl DepartmentDirectory for DatabaseDirectory {
    async fn list_departments(&self) -> Result<Vec<Department>, ServiceError> {
        let rows = department::list_departments(self.database.pool())
            .await
            .map_err(service_error)?;
        Ok(rows
            .into_iter()
            .map(|row| Department::new(row.code, row.name))
            .collect())
    }
}

/// Files complaints into the `complaints` table.
#[derive(Debug, Clone)]
pub struct DatabaseComplaintSink {
    database: Database,
}

impl DatabaseComplaintSink {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl ComplaintSink for DatabaseComplaintSink {
    async fn create(&self, payload: ComplaintPayload) -> Result<ComplaintReceipt, ServiceError> {
        let metadata = serde_json::to_value(&payload.metadata)
            .map_err(|e| ServiceError::ProcessingFailed(e.to_string()))?;

        let new = NewComplaint {
            title: payload.title,
            description: payload.description,
            transcript: payload.transcript,
            language: payload.language,
            translated_text: payload.translated_text,
            category: payload.category,
            subcategory: payload.subcategory,
            department_code: payload.department_code,
            source: payload.source,
            metadata,
        };

        let created = complaint::create_complaint(self.database.pool(), &new)
            .await
            .map_err(service_error)?;
        info!(reference_number = %created.reference_number, "Complaint filed");

        Ok(ComplaintReceipt {
            id: created.id.to_string(),
            reference_number: created.reference_number,
            status: created.status,
        })
    }

    async fn find_by_reference(
        &self,
        reference_number: &str,
    ) -> Result<Option<ComplaintReceipt>, ServiceError> {
        match complaint::get_complaint_by_reference(self.database.pool(), reference_number).await {
            Ok(found) => Ok(Some(ComplaintReceipt {
                id: found.id.to_string(),
                reference_number: found.reference_number,
                status: found.status,
            })),
            Err(DatabaseError::NotFound { .. }) => Ok(None),
            Err(err) => Err(service_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::{ComplaintMetadata, Intent, COMPLAINT_SOURCE_CHATBOT};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn payload(department_code: &str) -> ComplaintPayload {
        ComplaintPayload {
            title: "Garbage".to_string(),
            description: "Garbage rotting near my house".to_string(),
            transcript: Some("Garbage rotting near my house".to_string()),
            language: Some("en".to_string()),
            translated_text: Some("Garbage rotting near my house".to_string()),
            category: Some("Sanitation".to_string()),
            subcategory: Some("General".to_string()),
            department_code: department_code.to_string(),
            source: COMPLAINT_SOURCE_CHATBOT.to_string(),
            metadata: ComplaintMetadata {
                location: Some("MG Road".to_string()),
                phone: Some("9876543210".to_string()),
                intent: Some(Intent::Complaint),
            },
        }
    }

    #[tokio::test]
    async fn test_sink_creates_and_finds() {
        let db = test_db().await;
        let sink = DatabaseComplaintSink::new(db.clone());

        let receipt = sink.create(payload("BBMP")).await.unwrap();
        assert!(receipt.reference_number.starts_with("COMP-"));
        assert_eq!(receipt.status, "new");

        let stored = complaint::get_complaint_by_reference(db.pool(), &receipt.reference_number)
            .await
            .unwrap();
        let metadata = stored.metadata_json().unwrap();
        assert_eq!(metadata["intent"], "complaint");
        assert_eq!(metadata["location"], "MG Road");
        assert_eq!(stored.source, "chatbot");

        let found = sink.find_by_reference(&receipt.reference_number).await.unwrap();
        assert_eq!(found, Some(receipt));
        assert_eq!(sink.find_by_reference("COMP-000000").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sink_unknown_department() {
        let sink = DatabaseComplaintSink::new(test_db().await);
        let err = sink.create(payload("NOPE")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "Department", .. }));
    }

    #[tokio::test]
    async fn test_directory_lists_seeds() {
        let directory = DatabaseDirectory::new(test_db().await);
        let departments = directory.list_departments().await.unwrap();
        assert!(departments.iter().any(|d| d.code == "BESCOM"));
    }
}

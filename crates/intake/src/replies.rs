//! Fixed chatbot replies.

use crate::session::{AwaitingField, ConversationSession};

pub const GREETING: &str = "Hello! 👋 I'm the GRS Assistant. I can help you with:\n• Filing complaints\n• Checking complaint status\n• Providing information\n• Taking suggestions\n\nHow can I assist you today?";

pub const THANKS: &str =
    "You're very welcome! 😊 Is there anything else I can help you with?";

pub const INCOMPLETE: &str = "I didn't quite understand that. Could you please provide more details? For example:\n• 'There is garbage on my street'\n• 'Water supply is not working'\n• 'Street lights are broken'\n\nOr if you have a question, feel free to ask!";

pub const QUERY: &str = "I can help you with information about the grievance system. You can:\n• File a complaint by describing your issue\n• Check complaint status (provide reference number)\n• Get department information\n\nWhat information do you need?";

pub const STATUS_QUERY: &str = "To check your complaint status, please provide your reference number (e.g., COMP-123456). You can also file a new complaint by describing your issue.";

pub const SUGGESTION: &str = "Thank you for your suggestion! I appreciate your feedback. While I currently help with filing complaints, I'll note your suggestion for the system administrators.\n\nWould you like to file a complaint or need any other assistance?";

pub const REQUEST: &str = "I can help you file a complaint about the service or issue you're requesting. Please describe what you need, and I'll assist you in filing it with the appropriate department.\n\nFor applications and forms, you may need to visit the department directly or their website.";

pub const INVALID_PHONE: &str =
    "⚠️ Invalid phone number. Please provide a valid 10-digit phone number (e.g., 9876543210).";

pub const INVALID_LOCATION: &str = "⚠️ Please provide a more specific location (e.g., 'Main Street, Area Name' or 'Near XYZ School').";

pub const CREATION_FAILED: &str =
    "There was an error processing your complaint. Please try again later or contact support.";

pub const STATUS_UNAVAILABLE: &str =
    "I couldn't check the complaint status right now. Please try again in a little while.";

const NOT_AVAILABLE: &str = "N/A";

/// The question asking for a field.
pub fn question(field: AwaitingField) -> &'static str {
    match field {
        AwaitingField::Phone => "Please provide your phone number (10 digits):",
        AwaitingField::Location => "Please share the location of the issue (street/area):",
        AwaitingField::DepartmentCode => {
            "Which department should handle this? 1. Sanitation 2. Water Supply 3. Street Lighting"
        }
        AwaitingField::Confirmation => "Is this correct? (Yes/No, or add more details)",
    }
}

fn category_label(session: &ConversationSession) -> &'static str {
    session.category.unwrap_or_default().as_str()
}

/// Summary shown before the citizen confirms.
pub fn confirmation_summary(session: &ConversationSession) -> String {
    format!(
        "Please review your complaint:\nDescription: {}\nCategory: {}\nLocation: {}\nPhone: {}\n\nIs this correct? (Yes/No, or add more details)",
        session.description.as_deref().unwrap_or_default(),
        category_label(session),
        session.location.as_deref().unwrap_or(NOT_AVAILABLE),
        session.phone.as_deref().unwrap_or(NOT_AVAILABLE),
    )
}

/// Summary shown after a correction changed the category.
pub fn updated_summary(session: &ConversationSession) -> String {
    format!(
        "Updated complaint based on new details:\n📝 Description: {}\n🏷️ Category: {} (updated)\n📍 Location: {}\n📞 Phone: {}\n\nDoes this look correct now? (Yes/No, or add more details)",
        session.description.as_deref().unwrap_or_default(),
        category_label(session),
        session.location.as_deref().unwrap_or(NOT_AVAILABLE),
        session.phone.as_deref().unwrap_or(NOT_AVAILABLE),
    )
}

/// Reply after a complaint was filed.
pub fn filed(session: &ConversationSession, reference_number: &str) -> String {
    format!(
        "✅ Your complaint has been filed successfully!\n\n📋 Reference No: {}\n📁 Department: {}\n📍 Location: {}\n\nYou can track your complaint status using the reference number. Is there anything else I can help you with?",
        reference_number,
        category_label(session),
        session.location.as_deref().unwrap_or(NOT_AVAILABLE),
    )
}

/// Reply to a status lookup.
pub fn complaint_status(reference_number: &str, status: &str) -> String {
    format!(
        "📋 Complaint {} is currently: {}.\n\nIs there anything else I can help you with?",
        reference_number,
        status.replace('_', " ")
    )
}

/// Reply when a looked-up reference does not exist.
pub fn complaint_not_found(reference_number: &str) -> String {
    format!(
        "I couldn't find a complaint with reference number {}. Please check the number and try again.",
        reference_number
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::Category;

    #[test]
    fn test_confirmation_summary() {
        let session = ConversationSession {
            description: Some("Garbage pile".to_string()),
            category: Some(Category::Sanitation),
            phone: Some("9876543210".to_string()),
            ..ConversationSession::new("s1")
        };
        let summary = confirmation_summary(&session);
        assert!(summary.starts_with("Please review your complaint:\nDescription: Garbage pile\n"));
        assert!(summary.contains("Category: Sanitation\nLocation: N/A\nPhone: 9876543210"));
    }

    #[test]
    fn test_status_reply() {
        assert_eq!(
            complaint_status("COMP-123456", "in_progress"),
            "📋 Complaint COMP-123456 is currently: in progress.\n\nIs there anything else I can help you with?"
        );
    }
}

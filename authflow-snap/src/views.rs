//! Dialog contents shown by the plugin

use std::collections::HashMap;

use authflow_core::types::{CredentialCollection, CredentialData, DialogContent, SyncReport};
use serde_json::Value;

pub fn hello(origin: &str) -> DialogContent {
    DialogContent::new(format!("Hello, {origin}!"))
        .line("This is an AuthFlow test message.")
        .line("Keep those passwords safe!")
}

pub fn failure(message: &str) -> DialogContent {
    DialogContent::new("Failure").line(format!("Error: {message}"))
}

pub fn retrieve_basic_creds(description: &str, origin: &str) -> DialogContent {
    DialogContent::new(format!("Send login for {description}")).line(format!(
        "Are you sure you want to send the login for {description} to {origin}?"
    ))
}

pub fn retrieve_verifiable_creds(description: &str, origin: &str) -> DialogContent {
    DialogContent::new(format!("Send verifiable credential for {description}")).line(format!(
        "Are you sure you want to send the verifiable credential for {description} to {origin}?"
    ))
}

pub fn create_presentation(description: &str, origin: &str) -> DialogContent {
    DialogContent::new(format!(
        "Create verifiable presentation for verifiable credential(s) {description}"
    ))
    .line(format!(
        "Are you sure you want to create a verifiable presentation for {description} and send to {origin}?"
    ))
}

pub fn clear_all() -> DialogContent {
    DialogContent::new("Clear all passwords?")
        .line("Are you sure you want to clear all passwords?")
}

pub fn clear_all_verifiable() -> DialogContent {
    DialogContent::new("Clear all verified credentials?")
        .line("Are you sure you want to clear all verified credentials?")
}

/// Basic records, one block per credential
pub fn basic_credentials(collection: &CredentialCollection) -> DialogContent {
    let mut content = DialogContent::new("Basic Credentials");
    let mut records: Vec<_> = collection.values().collect();
    records.sort_by(|a, b| a.description.cmp(&b.description));

    for record in records {
        if let CredentialData::Basic(basic) = &record.data {
            content = content
                .line(record.description.clone())
                .line(basic.username.clone())
                .line(basic.password.clone())
                .line("---");
        }
    }
    content
}

/// Identify records with the remote payload for each id, when known
pub fn verifiable_credentials(
    collection: &CredentialCollection,
    remote: &HashMap<String, Value>,
) -> DialogContent {
    let mut content = DialogContent::new("Verifiable Credentials");
    let mut records: Vec<_> = collection.values().collect();
    records.sort_by(|a, b| a.description.cmp(&b.description));

    for record in records {
        if let Some(id) = record.identify_id() {
            let data = remote
                .get(id)
                .map_or_else(|| "(not available)".to_string(), Value::to_string);
            content = content
                .line(record.description.clone())
                .line(id.to_string())
                .line(data)
                .line("---");
        }
    }
    content
}

/// Search hits, Basic and Identify alike
pub fn search_results(term: &str, hits: &CredentialCollection) -> DialogContent {
    let mut content = DialogContent::new(format!("Results for \"{term}\""));
    if hits.is_empty() {
        return content.line("No matching credentials.");
    }

    let mut records: Vec<_> = hits.values().collect();
    records.sort_by(|a, b| a.description.cmp(&b.description));
    for record in records {
        content = match &record.data {
            CredentialData::Basic(basic) => content
                .line(record.description.clone())
                .line(basic.username.clone())
                .line(basic.password.clone()),
            CredentialData::Identify(identify) => content
                .line(record.description.clone())
                .line(identify.id.clone()),
        }
        .line("---");
    }
    content
}

pub fn sync_report(report: &SyncReport) -> DialogContent {
    if report.is_noop() {
        return DialogContent::new("Sync complete").line("Credentials are already in sync.");
    }
    DialogContent::new("Sync complete")
        .line(format!("Added: {}", report.added.len()))
        .line(format!("Removed: {}", report.removed.len()))
}

pub fn saved(description: &str) -> DialogContent {
    DialogContent::new("Credential saved").line(format!("Stored login for {description}."))
}

pub fn enter_basic_description() -> DialogContent {
    DialogContent::new("Basic Credential").line("Enter basic credential description")
}

pub fn enter_basic_user() -> DialogContent {
    DialogContent::new("Basic Credential").line("Enter basic credential user")
}

pub fn enter_basic_password() -> DialogContent {
    DialogContent::new("Basic Credential").line("Enter basic credential password")
}

pub fn enter_search_term() -> DialogContent {
    DialogContent::new("Search Passwords").line("Enter a search term")
}

pub fn select_credential_to_rename() -> DialogContent {
    DialogContent::new("Rename Verifiable Credential").line("Enter current name")
}

pub fn rename_credential() -> DialogContent {
    DialogContent::new("Rename Verifiable Credential").line("Enter name")
}

pub fn renamed(old_name: &str, new_name: &str) -> DialogContent {
    DialogContent::new("Credential renamed").line(format!("{old_name} is now {new_name}."))
}

pub fn enter_presentation_names() -> DialogContent {
    DialogContent::new("Create Verifiable Presentation")
        .line("Enter a comma separated list of credential names")
}

pub fn show_presentation(json: &str) -> DialogContent {
    DialogContent::new("Verifiable Presentation")
        .line("Generated Verifiable Presentation:")
        .line(json)
}

pub fn seeded(id: &str) -> DialogContent {
    DialogContent::new("Sample credential created").line(format!("Stored as {id}."))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use authflow_core::types::CredentialRecord;

    #[test]
    fn basic_list_skips_identify_records() {
        let mut collection = CredentialCollection::new();
        collection.insert("k1".to_string(), CredentialRecord::basic("site1", "u", "p"));
        collection.insert("k2".to_string(), CredentialRecord::identify("vc", "vc-1"));

        let content = basic_credentials(&collection);
        assert_eq!(content.lines, vec!["site1", "u", "p", "---"]);
    }

    #[test]
    fn verifiable_list_marks_unknown_remote() {
        let mut collection = CredentialCollection::new();
        collection.insert("k".to_string(), CredentialRecord::identify("Passport", "vc-1"));

        let content = verifiable_credentials(&collection, &HashMap::new());
        assert_eq!(content.lines[2], "(not available)");
    }
}

//! Home page and user input events
//!
//! The wallet shows [`home_page`] as the plugin's own page and forwards button
//! clicks and form submissions to [`UiHandler::on_user_input`]. Service
//! failures never escape as errors here; they are logged and shown to the user
//! in a failure alert instead. Only a broken dialog channel is returned as an
//! error.

use std::collections::HashMap;
use std::sync::Arc;

use authflow_app::AppState;
use authflow_core::error::{CoreError, CoreResult};
use authflow_core::traits::Dialog;
use authflow_core::types::{CredentialKind, CredentialRecord, DialogContent};
use authflow_core::utils::strip_newlines;
use serde_json::{json, Value};

use crate::handler::split_names;
use crate::schemas::UserInputEvent;
use crate::views;

/// Form field names
mod field {
    pub const DESCRIPTION: &str = "credential-description";
    pub const USER_NAME: &str = "user-name";
    pub const PASSWORD: &str = "password";
    pub const SEARCH_TERM: &str = "search-term";
}

/// Form names
pub mod form {
    pub const PASSWORD_SAVE: &str = "password-save-form";
    pub const PASSWORD_SEARCH: &str = "password-search-form";
}

/// Buttons on the home page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    Store,
    Clear,
    ClearVerifiable,
    Show,
    ShowVerifiable,
    Search,
    Sync,
    Debug,
    Rename,
    CreatePresentation,
    Seed,
}

impl HomeAction {
    /// All buttons, in page order
    pub const ALL: [Self; 11] = [
        Self::Store,
        Self::Clear,
        Self::ClearVerifiable,
        Self::Show,
        Self::ShowVerifiable,
        Self::Search,
        Self::Sync,
        Self::Debug,
        Self::Rename,
        Self::CreatePresentation,
        Self::Seed,
    ];

    /// Button name carried by click events
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Store => "btn-home-store",
            Self::Clear => "btn-home-clear",
            Self::ClearVerifiable => "btn-home-clear-vc",
            Self::Show => "btn-home-show",
            Self::ShowVerifiable => "btn-home-show-vc",
            Self::Search => "btn-home-search",
            Self::Sync => "btn-home-sync",
            Self::Debug => "btn-home-debug",
            Self::Rename => "btn-home-rename",
            Self::CreatePresentation => "btn-home-create-vp",
            Self::Seed => "btn-home-seed",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Store => "Store New Passwords",
            Self::Clear => "Clear All Passwords",
            Self::ClearVerifiable => "Clear All Verified Credentials",
            Self::Show => "Show All Passwords",
            Self::ShowVerifiable => "Show All Verified Credentials",
            Self::Search => "Search Passwords",
            Self::Sync => "Sync Verified Credentials",
            Self::Debug => "Log Stored Credentials",
            Self::Rename => "Rename Verified Credential",
            Self::CreatePresentation => "Create Verifiable Presentation",
            Self::Seed => "Create Sample Credential",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}

/// Home page content: heading, welcome text and one button per action
#[must_use]
pub fn home_page() -> Value {
    let mut children = vec![
        json!({ "type": "heading", "value": "AuthFlow" }),
        json!({ "type": "text", "value": "Welcome to AuthFlow! Select an option below :" }),
    ];
    children.extend(HomeAction::ALL.into_iter().map(|action| {
        json!({
            "type": "button",
            "name": action.name(),
            "value": action.label(),
        })
    }));

    json!({ "content": { "type": "panel", "children": children } })
}

/// Handler for home page interaction
pub struct UiHandler {
    app: Arc<AppState>,
    dialog: Arc<dyn Dialog>,
}

impl UiHandler {
    #[must_use]
    pub fn new(app: Arc<AppState>, dialog: Arc<dyn Dialog>) -> Self {
        Self { app, dialog }
    }

    /// Handle one event.
    ///
    /// Confirmation-gated actions return the user's answer; everything else
    /// returns `null`.
    pub async fn on_user_input(&self, event: UserInputEvent) -> CoreResult<Value> {
        match event {
            UserInputEvent::ButtonClick { name } => match HomeAction::from_name(&name) {
                Some(action) => self.on_action(action).await,
                None => {
                    tracing::debug!("No logic for button {name}");
                    Ok(Value::Null)
                }
            },
            UserInputEvent::FormSubmit { name, value } => match name.as_str() {
                form::PASSWORD_SAVE => self.on_save_form(&value).await,
                form::PASSWORD_SEARCH => self.on_search_form(&value).await,
                _ => {
                    tracing::debug!("No logic for form {name}");
                    Ok(Value::Null)
                }
            },
        }
    }

    async fn on_action(&self, action: HomeAction) -> CoreResult<Value> {
        tracing::debug!("Home action {}", action.name());
        match action {
            HomeAction::Store => self.store_from_prompts().await,
            HomeAction::Clear => self.clear_basic().await,
            HomeAction::ClearVerifiable => self.clear_verifiable().await,
            HomeAction::Show => self.show_basic().await,
            HomeAction::ShowVerifiable => self.show_verifiable().await,
            HomeAction::Search => {
                let Some(term) = self.prompt_text(&views::enter_search_term()).await? else {
                    return Ok(Value::Null);
                };
                self.show_search(&term).await
            }
            HomeAction::Sync => self.sync().await,
            HomeAction::Debug => {
                self.app.credential_service.log_summary().await;
                Ok(Value::Null)
            }
            HomeAction::Rename => self.rename().await,
            HomeAction::CreatePresentation => self.create_presentation().await,
            HomeAction::Seed => self.seed().await,
        }
    }

    // ===== Basic credentials =====

    async fn store_from_prompts(&self) -> CoreResult<Value> {
        let Some(description) = self.prompt_text(&views::enter_basic_description()).await? else {
            return Ok(Value::Null);
        };
        let Some(username) = self.prompt_text(&views::enter_basic_user()).await? else {
            return Ok(Value::Null);
        };
        let Some(password) = self
            .dialog
            .prompt(&views::enter_basic_password())
            .await?
            .map(|text| strip_newlines(&text))
        else {
            return Ok(Value::Null);
        };

        self.save_basic(description, username, password).await
    }

    async fn on_save_form(&self, value: &HashMap<String, Option<String>>) -> CoreResult<Value> {
        let (Some(description), Some(username), Some(password)) = (
            form_field(value, field::DESCRIPTION),
            form_field(value, field::USER_NAME),
            form_value(value, field::PASSWORD),
        ) else {
            tracing::warn!("Incomplete {} submission ignored", form::PASSWORD_SAVE);
            return Ok(Value::Null);
        };

        self.save_basic(description, username, password).await
    }

    async fn save_basic(
        &self,
        description: String,
        username: String,
        password: String,
    ) -> CoreResult<Value> {
        let record = CredentialRecord::basic(description.clone(), username, password);
        match self.app.credential_service.set_credential(record).await {
            Ok(_) => self.dialog.alert(&views::saved(&description)).await?,
            Err(e) => self.fail("Store credential", &e).await?,
        }
        Ok(Value::Null)
    }

    async fn clear_basic(&self) -> CoreResult<Value> {
        let approved = self.dialog.confirm(&views::clear_all()).await?;
        if approved {
            match self
                .app
                .credential_service
                .clear_all_of_type(CredentialKind::Basic)
                .await
            {
                Ok(count) => tracing::info!("Cleared {count} passwords"),
                Err(e) => self.fail("Clear passwords", &e).await?,
            }
        }
        Ok(Value::Bool(approved))
    }

    async fn show_basic(&self) -> CoreResult<Value> {
        let collection = self.app.credential_service.get_all().await.unwrap_or_default();
        self.dialog
            .alert(&views::basic_credentials(&collection))
            .await?;
        Ok(Value::Null)
    }

    async fn on_search_form(&self, value: &HashMap<String, Option<String>>) -> CoreResult<Value> {
        match form_field(value, field::SEARCH_TERM) {
            Some(term) => self.show_search(&term).await,
            None => Ok(Value::Null),
        }
    }

    async fn show_search(&self, term: &str) -> CoreResult<Value> {
        let hits = self.app.credential_service.search(term).await;
        tracing::debug!("Search matched {} credentials", hits.len());
        self.dialog.alert(&views::search_results(term, &hits)).await?;
        Ok(Value::Null)
    }

    // ===== Verifiable credentials =====

    async fn clear_verifiable(&self) -> CoreResult<Value> {
        let approved = self.dialog.confirm(&views::clear_all_verifiable()).await?;
        if approved {
            match self
                .app
                .verifiable_credential_service
                .clear_verifiable_credentials()
                .await
            {
                Ok(count) => tracing::info!("Cleared {count} verified credentials"),
                Err(e) => self.fail("Clear verified credentials", &e).await?,
            }
        }
        Ok(Value::Bool(approved))
    }

    async fn show_verifiable(&self) -> CoreResult<Value> {
        let collection = self.app.credential_service.get_all().await.unwrap_or_default();
        let remote = match self.app.identify_gateway.list_remote_credentials().await {
            Ok(payload) => remote_by_id(&payload),
            Err(e) => {
                tracing::warn!("Remote credentials unavailable: {e}");
                HashMap::new()
            }
        };

        self.dialog
            .alert(&views::verifiable_credentials(&collection, &remote))
            .await?;
        Ok(Value::Null)
    }

    async fn sync(&self) -> CoreResult<Value> {
        match self.app.sync_service.sync_credentials().await {
            Ok(report) => self.dialog.alert(&views::sync_report(&report)).await?,
            Err(e) => self.fail("Sync", &e).await?,
        }
        Ok(Value::Null)
    }

    async fn rename(&self) -> CoreResult<Value> {
        let Some(current) = self
            .prompt_text(&views::select_credential_to_rename())
            .await?
        else {
            return Ok(Value::Null);
        };

        let Some(credential) = self
            .app
            .credential_service
            .get_identify_credential_for_description(&current)
            .await
        else {
            self.fail("Rename", &CoreError::CredentialNotFound(current))
                .await?;
            return Ok(Value::Null);
        };

        let Some(new_name) = self.prompt_text(&views::rename_credential()).await? else {
            return Ok(Value::Null);
        };

        match self
            .app
            .credential_service
            .rename_identify_credential(&credential.id, &new_name)
            .await
        {
            Ok(true) => self.dialog.alert(&views::renamed(&current, &new_name)).await?,
            Ok(false) => {
                self.fail("Rename", &CoreError::CredentialNotFound(current))
                    .await?;
            }
            Err(e) => self.fail("Rename", &e).await?,
        }
        Ok(Value::Null)
    }

    async fn create_presentation(&self) -> CoreResult<Value> {
        let Some(csv) = self.prompt_text(&views::enter_presentation_names()).await? else {
            return Ok(Value::Null);
        };

        let names = split_names(&csv);
        match self.app.identify_gateway.create_presentation(&names).await {
            Ok(presentation) => {
                let json = serde_json::to_string_pretty(&presentation)?;
                self.dialog.alert(&views::show_presentation(&json)).await?;
            }
            Err(e) => self.fail("Create presentation", &e).await?,
        }
        Ok(Value::Null)
    }

    async fn seed(&self) -> CoreResult<Value> {
        match self
            .app
            .verifiable_credential_service
            .seed_sample_credential()
            .await
        {
            Ok(id) => self.dialog.alert(&views::seeded(&id)).await?,
            Err(e) => self.fail("Create sample credential", &e).await?,
        }
        Ok(Value::Null)
    }

    // ===== Helpers =====

    /// Prompt for text; dismissed or blank input is `None`
    async fn prompt_text(&self, content: &DialogContent) -> CoreResult<Option<String>> {
        Ok(self
            .dialog
            .prompt(content)
            .await?
            .map(|text| strip_newlines(&text))
            .filter(|text| !text.is_empty()))
    }

    async fn fail(&self, action: &str, err: &CoreError) -> CoreResult<()> {
        if err.is_expected() {
            tracing::warn!("{action} failed: {err}");
        } else {
            tracing::error!("{action} failed: {err}");
        }
        self.dialog.alert(&views::failure(&err.to_string())).await
    }
}

/// Submitted text of `key`, which may be empty
fn form_value(value: &HashMap<String, Option<String>>, key: &str) -> Option<String> {
    value.get(key).and_then(Option::as_deref).map(strip_newlines)
}

/// Submitted text of `key`, blank counts as missing
fn form_field(value: &HashMap<String, Option<String>>, key: &str) -> Option<String> {
    form_value(value, key).filter(|text| !text.is_empty())
}

/// Index a `getVCs` payload by `metadata.id`
fn remote_by_id(payload: &Value) -> HashMap<String, Value> {
    payload
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let id = item.pointer("/metadata/id")?.as_str()?;
                    Some((id.to_string(), item.get("data").unwrap_or(item).clone()))
                })
                .collect()
        })
        .unwrap_or_default()
}

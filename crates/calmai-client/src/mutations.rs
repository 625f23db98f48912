//! Writes, each followed by a refetch of the list it touched.
//!
//! The returned collection is whatever the backend reports after the
//! write, so server-side effects (topic classification, counters, removed
//! children) show up without the caller patching anything locally.

use calmai_core::models::account::{NotificationSettings, PasswordChange, ProfileUpdate};
use calmai_core::models::{InviteCode, JournalDraft, JournalEntry, Patient, TherapistPrompt, User};
use tracing::info;

use crate::api::CalmApi;
use crate::error::ClientError;

/// Create a journal entry and return the refreshed journal.
pub async fn submit_entry<A>(
    api: &A,
    content: &str,
    mood: Option<u8>,
) -> Result<Vec<JournalEntry>, ClientError>
where
    A: CalmApi + ?Sized,
{
    let draft = JournalDraft::new(content, mood)?;
    let created = api.create_journal(&draft).await?;
    info!(entry_id = %created.id, words = created.word_count, "journal entry submitted");
    api.my_journals().await
}

pub async fn edit_entry<A>(
    api: &A,
    entry_id: &str,
    content: &str,
    mood: Option<u8>,
) -> Result<Vec<JournalEntry>, ClientError>
where
    A: CalmApi + ?Sized,
{
    let draft = JournalDraft::new(content, mood)?;
    api.update_journal(entry_id, &draft).await?;
    info!(entry_id, "journal entry updated");
    api.my_journals().await
}

pub async fn delete_entry<A>(api: &A, entry_id: &str) -> Result<Vec<JournalEntry>, ClientError>
where
    A: CalmApi + ?Sized,
{
    api.delete_journal(entry_id).await?;
    info!(entry_id, "journal entry deleted");
    api.my_journals().await
}

/// Remove a patient from the caseload and return the remaining patients.
pub async fn remove_patient<A>(api: &A, patient_id: &str) -> Result<Vec<Patient>, ClientError>
where
    A: CalmApi + ?Sized,
{
    api.remove_patient(patient_id).await?;
    info!(patient_id, "patient removed");
    api.patients().await
}

/// Ask a patient a question; returns that patient's prompts.
pub async fn assign_prompt<A>(
    api: &A,
    patient_id: &str,
    question: &str,
) -> Result<Vec<TherapistPrompt>, ClientError>
where
    A: CalmApi + ?Sized,
{
    let question = question.trim();
    if question.is_empty() {
        return Err(ClientError::Invalid("prompt question is empty".to_string()));
    }
    let prompt = api.create_prompt(patient_id, question).await?;
    info!(prompt_id = %prompt.id, patient_id, "prompt assigned");
    api.patient_prompts(patient_id).await
}

pub async fn answer_prompt<A>(
    api: &A,
    prompt_id: &str,
    response: &str,
) -> Result<Vec<TherapistPrompt>, ClientError>
where
    A: CalmApi + ?Sized,
{
    let response = response.trim();
    if response.is_empty() {
        return Err(ClientError::Invalid("response is empty".to_string()));
    }
    api.answer_prompt(prompt_id, response).await?;
    info!(prompt_id, "prompt answered");
    api.my_prompts().await
}

/// Generate an invite code; returns the new code and the refreshed list.
pub async fn issue_invite<A>(api: &A) -> Result<(InviteCode, Vec<InviteCode>), ClientError>
where
    A: CalmApi + ?Sized,
{
    let invite = api.create_invite().await?;
    info!(code = %invite.code, expires_at = %invite.expires_at, "invite issued");
    let invites = api.invite_codes().await?;
    Ok((invite, invites))
}

pub async fn update_profile<A>(api: &A, update: &ProfileUpdate) -> Result<User, ClientError>
where
    A: CalmApi + ?Sized,
{
    if *update == ProfileUpdate::default() {
        return Err(ClientError::Invalid("nothing to update".to_string()));
    }
    let user = api.update_profile(update).await?;
    info!(user_id = %user.id, "profile updated");
    Ok(user)
}

pub async fn change_password<A>(api: &A, current: &str, new: &str) -> Result<(), ClientError>
where
    A: CalmApi + ?Sized,
{
    if current == new {
        return Err(ClientError::Invalid(
            "new password must differ from the current one".to_string(),
        ));
    }
    let change = PasswordChange {
        current_password: current.to_string(),
        new_password: new.to_string(),
    };
    api.change_password(&change).await?;
    info!("password changed");
    Ok(())
}

pub async fn save_notification_settings<A>(
    api: &A,
    settings: &NotificationSettings,
) -> Result<NotificationSettings, ClientError>
where
    A: CalmApi + ?Sized,
{
    api.update_notification_settings(settings).await?;
    api.notification_settings().await
}

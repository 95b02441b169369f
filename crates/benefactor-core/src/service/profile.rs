//! Profile form service.
//!
//! Assembles the profile form for the current visitor, issues the nonce that
//! guards it, and applies submitted updates to the donor record.

use benefactor_types::donor::{Donor, UserContext};
use benefactor_types::error::{DonorError, ProfileError};
use benefactor_types::field::{FieldType, ProfileFields};
use benefactor_types::submission::{IgnoreReason, Submission, SubmissionOutcome};

use crate::form::profile::{DonorAttribute, ProfileForm, NONCE_ACTION, NONCE_FIELD};
use crate::repository::donor::DonorRepository;
use crate::service::donor::{is_valid_email, normalize_email, DonorService};
use crate::service::nonce::{NonceBinding, NonceIssuer};

/// Service behind the profile page.
pub struct ProfileService<D: DonorRepository, N: NonceIssuer> {
    donors: DonorService<D>,
    nonces: N,
    form: ProfileForm,
}

fn storage_error(e: DonorError) -> ProfileError {
    match e {
        DonorError::NotFound => ProfileError::DonorNotFound,
        DonorError::EmailConflict(email) => ProfileError::EmailConflict(email),
        other => ProfileError::StorageError(other.to_string()),
    }
}

impl<D: DonorRepository, N: NonceIssuer> ProfileService<D, N> {
    pub fn new(donors: DonorService<D>, nonces: N, form: ProfileForm) -> Self {
        Self {
            donors,
            nonces,
            form,
        }
    }

    pub fn donors(&self) -> &DonorService<D> {
        &self.donors
    }

    pub fn form(&self) -> &ProfileForm {
        &self.form
    }

    /// The assembled, ordered profile fields for `user`.
    ///
    /// Built fresh on every call.
    pub async fn fields(&self, user: &UserContext) -> Result<ProfileFields, ProfileError> {
        let donor = self.donors.donor_for(user).await.map_err(storage_error)?;
        Ok(self.form.fields(user, &donor))
    }

    /// The profile fields for `user`, showing the submitted value of every
    /// field that `submission` carries.
    ///
    /// Used to redisplay a rejected submission.
    pub async fn refill(
        &self,
        user: &UserContext,
        submission: &Submission,
    ) -> Result<ProfileFields, ProfileError> {
        let mut fields = self.fields(user).await?;
        for group in fields.values_mut() {
            for (key, field) in group.fields.iter_mut() {
                if let Some(value) = submission.get(key) {
                    field.value = value.trim().to_string();
                }
            }
        }
        Ok(fields)
    }

    /// A nonce for the profile form, bound to the visitor.
    pub fn issue_nonce(&self, binding: &NonceBinding) -> String {
        self.nonces.create(NONCE_ACTION, binding)
    }

    /// Apply a submitted profile update.
    ///
    /// A missing or invalid nonce, or an anonymous submitter, yields
    /// [`SubmissionOutcome::Ignored`] with nothing read beyond the nonce and
    /// nothing written. Otherwise every field of the assembled form whose key
    /// was submitted is trimmed and checked; the donor record is written only
    /// when all checks pass and at least one value changed.
    pub async fn update_profile(
        &self,
        user: &UserContext,
        binding: &NonceBinding,
        submission: &Submission,
    ) -> Result<SubmissionOutcome, ProfileError> {
        let Some(nonce) = submission.get(NONCE_FIELD) else {
            tracing::debug!("profile submission without nonce ignored");
            return Ok(SubmissionOutcome::Ignored {
                reason: IgnoreReason::MissingNonce,
            });
        };

        if !self.nonces.verify(nonce, NONCE_ACTION, binding).is_valid() {
            tracing::debug!("profile submission with invalid nonce ignored");
            return Ok(SubmissionOutcome::Ignored {
                reason: IgnoreReason::InvalidNonce,
            });
        }

        let Some(user_id) = user.user_id() else {
            tracing::debug!("anonymous profile submission ignored");
            return Ok(SubmissionOutcome::Ignored {
                reason: IgnoreReason::Anonymous,
            });
        };

        let donor = self
            .donors
            .get_by_user(&user_id)
            .await
            .map_err(storage_error)?;
        let fields = self.form.fields(user, &donor);

        let (updated, changed) = apply_submission(&donor, &fields, submission)?;
        if changed.is_empty() {
            tracing::debug!(%user_id, "profile submission changed nothing");
            return Ok(SubmissionOutcome::Updated { changed });
        }

        let mut updated = updated;
        updated.updated_at = chrono::Utc::now();
        self.donors.save(&updated).await.map_err(storage_error)?;

        tracing::info!(%user_id, changed = ?changed, "profile updated");
        Ok(SubmissionOutcome::Updated { changed })
    }
}

/// Validate `submission` against the assembled `fields` and produce the
/// edited donor plus the keys whose value changed.
fn apply_submission(
    donor: &Donor,
    fields: &ProfileFields,
    submission: &Submission,
) -> Result<(Donor, Vec<String>), ProfileError> {
    let mut updated = donor.clone();
    let mut changed = Vec::new();
    let mut missing = Vec::new();

    for group in fields.values() {
        for (key, field) in group.fields.iter() {
            let Some(raw) = submission.get(key) else {
                if field.required && field.value.trim().is_empty() {
                    missing.push(field.label.clone());
                }
                continue;
            };

            let mut value = raw.trim().to_string();
            if value.is_empty() {
                if field.required {
                    missing.push(field.label.clone());
                }
            } else {
                match &field.field_type {
                    FieldType::Email => {
                        value = normalize_email(&value);
                        if !is_valid_email(&value) {
                            return Err(ProfileError::InvalidEmail(raw.to_string()));
                        }
                    }
                    FieldType::Select => {
                        let options = field.options.as_deref().unwrap_or_default();
                        let known = value == field.value || options.iter().any(|o| o.value == value);
                        if !options.is_empty() && !known {
                            return Err(ProfileError::InvalidChoice {
                                field: field.label.clone(),
                            });
                        }
                    }
                    _ => {}
                }
            }

            let attribute = DonorAttribute::for_field(key);
            if attribute.read(&updated) != value {
                attribute.write(&mut updated, value);
                changed.push(key.to_string());
            }
        }
    }

    if !missing.is_empty() {
        return Err(ProfileError::Validation { missing });
    }

    Ok((updated, changed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use benefactor_types::donor::{meta, UserId};

    use crate::form::filter::FilterPipeline;
    use crate::service::donor::tests::MemoryDonorRepository;
    use crate::service::nonce::NonceValidity;

    /// Accepts exactly `"{action}:{user}:{session}"`.
    struct PlainNonces;

    impl NonceIssuer for PlainNonces {
        fn create(&self, action: &str, binding: &NonceBinding) -> String {
            let user = binding.user.map(|u| u.to_string()).unwrap_or_default();
            format!("{action}:{user}:{}", binding.session)
        }

        fn verify(&self, nonce: &str, action: &str, binding: &NonceBinding) -> NonceValidity {
            if nonce == self.create(action, binding) {
                NonceValidity::Fresh
            } else {
                NonceValidity::Invalid
            }
        }
    }

    type TestService = ProfileService<MemoryDonorRepository, PlainNonces>;

    async fn setup() -> (TestService, UserContext, NonceBinding) {
        let mut donor = Donor::new(UserId::new(), "ada@example.org", "Ada", "Lovelace");
        donor.set_meta(meta::CITY, "London");
        let user_id = donor.user_id.unwrap();

        let repo = MemoryDonorRepository::default();
        repo.create(&donor).await.unwrap();
        let service = ProfileService::new(
            DonorService::new(repo),
            PlainNonces,
            ProfileForm::new(FilterPipeline::new()),
        );
        let binding = NonceBinding::new(Some(user_id), "session-token");
        (service, UserContext::Authenticated(user_id), binding)
    }

    fn update_count(service: &TestService) -> usize {
        *service.donors().repo().updates.lock().unwrap()
    }

    fn submission(service: &TestService, binding: &NonceBinding, pairs: &[(&str, &str)]) -> Submission {
        let mut all: Vec<(String, String)> = vec![(
            NONCE_FIELD.to_string(),
            service.issue_nonce(binding),
        )];
        all.extend(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        Submission::new(all)
    }

    #[tokio::test]
    async fn test_missing_nonce_is_silent_noop() {
        let (service, user, binding) = setup().await;
        let sub: Submission = [("first_name", "Grace")].into_iter().collect();
        let outcome = service.update_profile(&user, &binding, &sub).await.unwrap();
        assert_eq!(
            outcome,
            SubmissionOutcome::Ignored {
                reason: IgnoreReason::MissingNonce
            }
        );
        assert_eq!(update_count(&service), 0);
    }

    #[tokio::test]
    async fn test_invalid_nonce_is_silent_noop() {
        let (service, user, binding) = setup().await;
        let sub: Submission = [(NONCE_FIELD, "forged"), ("first_name", "Grace")]
            .into_iter()
            .collect();
        let outcome = service.update_profile(&user, &binding, &sub).await.unwrap();
        assert_eq!(
            outcome,
            SubmissionOutcome::Ignored {
                reason: IgnoreReason::InvalidNonce
            }
        );
        let donor = service.donors().donor_for(&user).await.unwrap();
        assert_eq!(donor.first_name, "Ada");
        assert_eq!(update_count(&service), 0);
    }

    #[tokio::test]
    async fn test_nonce_from_other_session_rejected() {
        let (service, user, binding) = setup().await;
        let other = NonceBinding::new(binding.user, "other-session");
        let sub = submission(&service, &other, &[("first_name", "Grace")]);
        let outcome = service.update_profile(&user, &binding, &sub).await.unwrap();
        assert!(matches!(outcome, SubmissionOutcome::Ignored { .. }));
    }

    #[tokio::test]
    async fn test_anonymous_with_valid_nonce_ignored() {
        let (service, _, _) = setup().await;
        let anon_binding = NonceBinding::default();
        let sub = submission(&service, &anon_binding, &[("first_name", "Grace")]);
        let outcome = service
            .update_profile(&UserContext::Anonymous, &anon_binding, &sub)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SubmissionOutcome::Ignored {
                reason: IgnoreReason::Anonymous
            }
        );
    }

    #[tokio::test]
    async fn test_valid_update_persists_changed_fields() {
        let (service, user, binding) = setup().await;
        let sub = submission(
            &service,
            &binding,
            &[
                ("first_name", " Augusta Ada "),
                ("last_name", "Lovelace"),
                ("city", "London"),
                ("country", "GB"),
                ("twitter", "@ada"),
                ("not_a_field", "ignored"),
            ],
        );
        let outcome = service.update_profile(&user, &binding, &sub).await.unwrap();
        assert_eq!(
            outcome,
            SubmissionOutcome::Updated {
                changed: vec![
                    "first_name".to_string(),
                    "country".to_string(),
                    "twitter".to_string()
                ]
            }
        );

        let donor = service.donors().donor_for(&user).await.unwrap();
        assert_eq!(donor.first_name, "Augusta Ada");
        assert_eq!(donor.get(meta::COUNTRY), "GB");
        assert_eq!(donor.get(meta::TWITTER), "@ada");
        assert_eq!(donor.get("not_a_field"), "");
        assert_eq!(update_count(&service), 1);
    }

    #[tokio::test]
    async fn test_unchanged_submission_does_not_write() {
        let (service, user, binding) = setup().await;
        let sub = submission(&service, &binding, &[("first_name", "Ada"), ("city", "London")]);
        let outcome = service.update_profile(&user, &binding, &sub).await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::Updated { changed: vec![] });
        assert_eq!(update_count(&service), 0);
    }

    #[tokio::test]
    async fn test_clearing_required_field_fails_validation() {
        let (service, user, binding) = setup().await;
        let sub = submission(
            &service,
            &binding,
            &[("first_name", "  "), ("last_name", ""), ("city", "Paris")],
        );
        let err = service
            .update_profile(&user, &binding, &sub)
            .await
            .unwrap_err();
        match err {
            ProfileError::Validation { missing } => {
                assert_eq!(missing, vec!["First name".to_string(), "Last name".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        let donor = service.donors().donor_for(&user).await.unwrap();
        assert_eq!(donor.get(meta::CITY), "London");
    }

    #[tokio::test]
    async fn test_optional_field_can_be_cleared() {
        let (service, user, binding) = setup().await;
        let sub = submission(&service, &binding, &[("city", "")]);
        let outcome = service.update_profile(&user, &binding, &sub).await.unwrap();
        assert_eq!(
            outcome,
            SubmissionOutcome::Updated {
                changed: vec!["city".to_string()]
            }
        );
        let donor = service.donors().donor_for(&user).await.unwrap();
        assert_eq!(donor.get(meta::CITY), "");
    }

    #[tokio::test]
    async fn test_bad_email_and_country_rejected() {
        let (service, user, binding) = setup().await;
        let sub = submission(&service, &binding, &[("user_email", "not-an-email")]);
        let err = service.update_profile(&user, &binding, &sub).await.unwrap_err();
        assert!(matches!(err, ProfileError::InvalidEmail(_)));

        let sub = submission(&service, &binding, &[("country", "Atlantis")]);
        let err = service.update_profile(&user, &binding, &sub).await.unwrap_err();
        assert!(matches!(err, ProfileError::InvalidChoice { .. }));
        assert_eq!(update_count(&service), 0);
    }

    #[tokio::test]
    async fn test_email_taken_by_other_donor_conflicts() {
        let (service, user, binding) = setup().await;
        let grace = Donor::new(UserId::new(), "grace@example.org", "Grace", "Hopper");
        service.donors().repo().create(&grace).await.unwrap();

        let sub = submission(&service, &binding, &[("user_email", "Grace@Example.org")]);
        let err = service.update_profile(&user, &binding, &sub).await.unwrap_err();
        assert!(matches!(err, ProfileError::EmailConflict(ref email) if email == "grace@example.org"));

        let donor = service.donors().donor_for(&user).await.unwrap();
        assert_eq!(donor.email, "ada@example.org");
        assert_eq!(update_count(&service), 0);
    }

    #[tokio::test]
    async fn test_update_without_donor_record_not_found() {
        let (service, _, _) = setup().await;
        let ghost_id = UserId::new();
        let ghost = UserContext::Authenticated(ghost_id);
        let binding = NonceBinding::new(Some(ghost_id), "session-token");

        let sub = submission(&service, &binding, &[("first_name", "Grace")]);
        let err = service.update_profile(&ghost, &binding, &sub).await.unwrap_err();
        assert!(matches!(err, ProfileError::DonorNotFound));
        assert_eq!(update_count(&service), 0);
    }

    #[tokio::test]
    async fn test_stored_select_value_outside_options_can_be_resubmitted() {
        let (service, user, binding) = setup().await;
        let mut donor = service.donors().donor_for(&user).await.unwrap();
        donor.set_meta(meta::COUNTRY, "XK");
        service.donors().save(&donor).await.unwrap();

        let sub = submission(&service, &binding, &[("country", "XK")]);
        let outcome = service.update_profile(&user, &binding, &sub).await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::Updated { changed: vec![] });

        let sub = submission(&service, &binding, &[("country", "Atlantis")]);
        let err = service.update_profile(&user, &binding, &sub).await.unwrap_err();
        assert!(matches!(err, ProfileError::InvalidChoice { .. }));
    }

    #[tokio::test]
    async fn test_refill_shows_submitted_values() {
        let (service, user, binding) = setup().await;
        let sub = submission(&service, &binding, &[("first_name", ""), ("city", " Paris ")]);
        let groups = service.refill(&user, &sub).await.unwrap();

        let details = groups.get("user_fields").unwrap();
        assert_eq!(details.fields.get("first_name").unwrap().value, "");
        assert_eq!(details.fields.get("last_name").unwrap().value, "Lovelace");
        let address = groups.get("address_fields").unwrap();
        assert_eq!(address.fields.get("city").unwrap().value, "Paris");
    }

    #[tokio::test]
    async fn test_fields_for_anonymous_are_empty() {
        let (service, _, _) = setup().await;
        let groups = service.fields(&UserContext::Anonymous).await.unwrap();
        assert!(
            groups
                .values()
                .flat_map(|g| g.fields.values())
                .all(|f| f.value.is_empty())
        );
    }
}

//! Product form controller
//!
//! One controller drives both the create and the edit flow; they
//! differ only in the verb used on submit and in the edit flow's
//! load pre-step. The submit is two-phase: the asset is uploaded
//! first (from `upload_asset`), then the record referencing its URL
//! is persisted. The two phases carry no atomicity guarantee; a
//! failed persist leaves the uploaded asset in place.

use shared::{Product, ProductPayload};

use crate::{ApiGateway, AssetFile, ClientError, ClientResult, UploadGateway};

/// Which flow the form is driving
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// Form lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    /// Creation starts here; nothing touched yet
    #[default]
    Empty,
    /// Edit flow only: waiting for the existing record
    Loading,
    /// Interactive; re-entered on every field edit
    Editing,
    Validating,
    Uploading,
    Submitting,
    /// Persisted; the caller should navigate back to the list
    Success,
    Failed,
}

/// Field-level validation errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.image.is_none()
    }

    pub fn messages(&self) -> Vec<&str> {
        [&self.title, &self.description, &self.price, &self.image]
            .into_iter()
            .filter_map(|e| e.as_deref())
            .collect()
    }
}

/// Editable state for one product
#[derive(Debug, Clone)]
pub struct ProductForm {
    mode: FormMode,
    phase: FormPhase,
    title: String,
    description: String,
    price: f64,
    image_url: String,
    errors: FieldErrors,
    notice: Option<String>,
}

impl ProductForm {
    /// Blank form for the creation flow
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            phase: FormPhase::Empty,
            title: String::new(),
            description: String::new(),
            price: 0.0,
            image_url: String::new(),
            errors: FieldErrors::default(),
            notice: None,
        }
    }

    /// Form for the edit flow; call [`load`](Self::load) (or feed
    /// [`apply_loaded`](Self::apply_loaded)) to seed the fields
    pub fn edit(id: impl Into<String>) -> Self {
        Self {
            mode: FormMode::Edit { id: id.into() },
            phase: FormPhase::Loading,
            ..Self::create()
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Generic failure message for the UI; the specific backend error
    /// is only logged
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    // ---- field edits ----

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.title = value.into();
        self.touch();
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = value.into();
        self.touch();
    }

    pub fn set_price(&mut self, value: f64) {
        self.price = value;
        self.touch();
    }

    /// Any keystroke returns the form to `Editing`
    fn touch(&mut self) {
        if matches!(self.phase, FormPhase::Empty | FormPhase::Failed) {
            self.phase = FormPhase::Editing;
        }
        self.notice = None;
    }

    // ---- load pre-step (edit flow) ----

    /// Seed all fields, including the existing asset URL
    pub fn apply_loaded(&mut self, product: Product) {
        self.title = product.title;
        self.description = product.description;
        self.price = product.price;
        self.image_url = product.image_url;
        self.phase = FormPhase::Editing;
    }

    /// Settle the load fetch
    ///
    /// A load failure still lands in `Editing` (with blank fields),
    /// matching the listing's tolerance for failed reads.
    pub fn apply_load(&mut self, outcome: ClientResult<Product>) -> ClientResult<()> {
        match outcome {
            Ok(product) => {
                self.apply_loaded(product);
                Ok(())
            }
            Err(error) => {
                tracing::error!(error = %error, "failed to load product");
                self.phase = FormPhase::Editing;
                Err(error)
            }
        }
    }

    /// Fetch the existing record for the edit flow
    pub async fn load(&mut self, api: &ApiGateway) -> ClientResult<()> {
        let FormMode::Edit { id } = &self.mode else {
            return Ok(());
        };
        let outcome = api.get::<Product>(&format!("/product/{id}"), false, &[]).await;
        self.apply_load(outcome)
    }

    // ---- asset upload (two-phase submit, phase one) ----

    pub fn begin_upload(&mut self) {
        self.phase = FormPhase::Uploading;
    }

    /// Settle an upload; both arms land back in `Editing`
    ///
    /// On failure the previous `image_url` is left untouched: a
    /// failed re-upload during edit keeps the old asset valid, while
    /// a failed first upload leaves the required field empty and the
    /// submit stays blocked.
    pub fn apply_upload(&mut self, outcome: ClientResult<Option<String>>) -> ClientResult<()> {
        self.phase = FormPhase::Editing;
        match outcome {
            Ok(Some(url)) => {
                self.image_url = url;
                self.errors.image = None;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(error) => {
                tracing::warn!(error = %error, "asset upload failed");
                Err(error)
            }
        }
    }

    pub async fn upload_asset(
        &mut self,
        uploads: &UploadGateway,
        file: AssetFile,
    ) -> ClientResult<()> {
        self.begin_upload();
        let outcome = uploads.upload(file).await;
        self.apply_upload(outcome)
    }

    // ---- validation ----

    /// Pure check over the current fields; mutates nothing
    ///
    /// Required: non-empty title, non-empty description, a finite
    /// price above zero (zero is rejected the same as a missing
    /// price), and an asset URL.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.title.is_empty() {
            errors.title = Some("Product name is required".to_string());
        }
        if self.description.is_empty() {
            errors.description = Some("Description is required".to_string());
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            errors.price = Some("Valid price is required".to_string());
        }
        if self.image_url.is_empty() {
            errors.image = Some("Product image is required".to_string());
        }
        errors
    }

    // ---- submit (two-phase submit, phase two) ----

    /// Validate and, when clean, produce the payload to persist
    ///
    /// Invalid fields transition to `Failed` with the error set
    /// attached and no payload is produced, so nothing remote runs.
    pub fn begin_submit(&mut self) -> ClientResult<ProductPayload> {
        self.phase = FormPhase::Validating;
        let errors = self.validate();
        if !errors.is_empty() {
            self.errors = errors.clone();
            self.phase = FormPhase::Failed;
            return Err(ClientError::Validation(errors));
        }
        self.errors = FieldErrors::default();
        self.phase = FormPhase::Submitting;
        Ok(ProductPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
            image_url: self.image_url.clone(),
        })
    }

    /// Settle the persist call
    pub fn apply_submit(&mut self, outcome: ClientResult<serde_json::Value>) -> ClientResult<()> {
        match outcome {
            Ok(_) => {
                self.phase = FormPhase::Success;
                Ok(())
            }
            Err(error) => {
                // Full error to the log only; the UI gets a generic line.
                tracing::error!(error = %error, "product submit failed");
                self.notice = Some("Something went wrong!".to_string());
                self.phase = FormPhase::Failed;
                Err(error)
            }
        }
    }

    /// Validate, persist, and settle in one call
    ///
    /// Issues exactly one create-or-update call for a valid field
    /// set; `Success` is the signal to navigate back to the list.
    pub async fn submit(&mut self, api: &ApiGateway) -> ClientResult<()> {
        let payload = self.begin_submit()?;
        let outcome = match &self.mode {
            FormMode::Create => api.post("/product", &payload).await,
            FormMode::Edit { id } => api.put(&format!("/product/{id}"), &payload).await,
        };
        self.apply_submit(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ProductForm {
        let mut form = ProductForm::create();
        form.set_title("Pen");
        form.set_description("Blue ink pen");
        form.set_price(10.0);
        form.apply_upload(Ok(Some("https://bucket/assets/abc.png".into())))
            .unwrap();
        form
    }

    #[test]
    fn creation_starts_empty_and_edits_enter_editing() {
        let mut form = ProductForm::create();
        assert_eq!(form.phase(), FormPhase::Empty);
        form.set_title("Pen");
        assert_eq!(form.phase(), FormPhase::Editing);
    }

    #[test]
    fn edit_flow_starts_loading_and_seeds_fields() {
        let mut form = ProductForm::edit("p1");
        assert_eq!(form.phase(), FormPhase::Loading);
        form.apply_loaded(Product {
            id: "p1".into(),
            title: "Pen".into(),
            description: "Blue ink pen".into(),
            price: 10.0,
            image_url: "https://bucket/assets/old.png".into(),
        });
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.image_url(), "https://bucket/assets/old.png");
    }

    #[test]
    fn validate_flags_each_missing_field() {
        let form = ProductForm::create();
        let errors = form.validate();
        assert_eq!(errors.messages().len(), 4);

        let mut form = valid_form();
        assert!(form.validate().is_empty());

        form.set_title("");
        let errors = form.validate();
        assert_eq!(errors.title.as_deref(), Some("Product name is required"));
        assert!(errors.description.is_none());
    }

    #[test]
    fn zero_price_counts_as_missing() {
        let mut form = valid_form();
        form.set_price(0.0);
        assert_eq!(
            form.validate().price.as_deref(),
            Some("Valid price is required")
        );
        form.set_price(f64::NAN);
        assert!(form.validate().price.is_some());
    }

    #[test]
    fn invalid_submit_fails_without_payload() {
        let mut form = ProductForm::create();
        form.set_title("Pen");
        let result = form.begin_submit();
        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert_eq!(form.phase(), FormPhase::Failed);
        assert!(!form.errors().is_empty());
    }

    #[test]
    fn valid_submit_produces_exact_payload() {
        let mut form = valid_form();
        let payload = form.begin_submit().unwrap();
        assert_eq!(form.phase(), FormPhase::Submitting);
        assert_eq!(payload.title, "Pen");
        assert_eq!(payload.description, "Blue ink pen");
        assert_eq!(payload.price, 10.0);
        assert_eq!(payload.image_url, "https://bucket/assets/abc.png");

        form.apply_submit(Ok(serde_json::json!({"status": "success"})))
            .unwrap();
        assert_eq!(form.phase(), FormPhase::Success);
    }

    #[test]
    fn remote_failure_lands_in_failed_with_generic_notice() {
        let mut form = valid_form();
        let _ = form.begin_submit().unwrap();
        let result = form.apply_submit(Err(ClientError::Http {
            status: 500,
            message: "boom".into(),
        }));
        assert!(result.is_err());
        assert_eq!(form.phase(), FormPhase::Failed);
        assert_eq!(form.notice(), Some("Something went wrong!"));
        // A keystroke resumes editing and clears the notice.
        form.set_price(11.0);
        assert_eq!(form.phase(), FormPhase::Editing);
        assert!(form.notice().is_none());
    }

    #[test]
    fn failed_upload_keeps_previous_asset() {
        let mut form = valid_form();
        form.begin_upload();
        assert_eq!(form.phase(), FormPhase::Uploading);
        let result = form.apply_upload(Err(ClientError::Upload("timeout".into())));
        assert!(result.is_err());
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.image_url(), "https://bucket/assets/abc.png");
    }

    #[test]
    fn skipped_upload_changes_nothing() {
        let mut form = ProductForm::create();
        form.begin_upload();
        form.apply_upload(Ok(None)).unwrap();
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.image_url(), "");
    }
}

//! Integrations - one-shot calls to the backend's helper endpoints

use std::sync::Arc;

use cobra_client::{ClientError, HttpClient, ImageUpload};
use shared::models::{EquipmentRecognition, FireDetection, ReportSummary, ReportSummaryRequest};

use super::error::{ConsoleError, ConsoleResult};
use super::session::SessionStore;

const RECOGNIZE_PATH: &str = "equipements/recognize/";
const SUMMARIZE_PATH: &str = "report/summarize/";
const DETECT_FIRE_PATH: &str = "cameras/detect-fire/";

/// Equipment recognition, fire detection and report summarization. All of
/// them need a session.
pub struct Integrations<C: HttpClient> {
    session: Arc<SessionStore<C>>,
}

impl<C: HttpClient> Integrations<C> {
    pub fn new(session: Arc<SessionStore<C>>) -> Self {
        Self { session }
    }

    /// Classifies one captured frame against the equipment catalogue.
    pub async fn recognize_equipment(&self, image: Vec<u8>) -> ConsoleResult<EquipmentRecognition> {
        let token = self.require_session()?;
        require_image(&image)?;

        let result: EquipmentRecognition = self
            .session
            .client()
            .post_image(RECOGNIZE_PATH, ImageUpload::jpeg(image))
            .await
            .map_err(|e| self.failed("recognize_equipment", token, e))?;
        tracing::info!(
            status = %result.status,
            confidence = ?result.confidence,
            "Equipment recognized"
        );
        Ok(result)
    }

    /// Runs the fire/smoke detector on one camera frame.
    pub async fn detect_fire(&self, image: Vec<u8>) -> ConsoleResult<FireDetection> {
        let token = self.require_session()?;
        require_image(&image)?;

        let result: FireDetection = self
            .session
            .client()
            .post_image(DETECT_FIRE_PATH, ImageUpload::jpeg(image))
            .await
            .map_err(|e| self.failed("detect_fire", token, e))?;
        if result.is_alarm() {
            tracing::warn!(
                fire = result.fire_detected,
                smoke = result.smoke_detected,
                alert_level = ?result.alert_level,
                "Fire or smoke detected"
            );
        } else {
            tracing::debug!(confidence = result.confidence, "No fire detected");
        }
        Ok(result)
    }

    pub async fn summarize_report(&self, subject: &str, body: &str) -> ConsoleResult<ReportSummary> {
        let token = self.require_session()?;
        if subject.trim().is_empty() || body.trim().is_empty() {
            return Err(ConsoleError::Validation(
                "subject and body are required".into(),
            ));
        }

        let req = ReportSummaryRequest {
            subject: subject.to_string(),
            body: body.to_string(),
        };
        self.session
            .client()
            .post(SUMMARIZE_PATH, &req)
            .await
            .map_err(|e| self.failed("summarize_report", token, e))
    }

    /// The token the call will be sent with
    fn require_session(&self) -> ConsoleResult<Option<String>> {
        if self.session.is_authenticated() {
            Ok(self.session.client().token())
        } else {
            Err(ConsoleError::NotAuthenticated)
        }
    }

    fn failed(&self, op: &'static str, token: Option<String>, err: ClientError) -> ConsoleError {
        if err.is_unauthorized() {
            self.session.expire_token(token.as_deref());
        }
        tracing::warn!(op, error = %err, "Integration call failed");
        ConsoleError::Client(err)
    }
}

fn require_image(image: &[u8]) -> ConsoleResult<()> {
    if image.is_empty() {
        return Err(ConsoleError::Validation("a captured image is required".into()));
    }
    Ok(())
}

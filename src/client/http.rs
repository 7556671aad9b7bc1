//! HTTP implementation of [`PortalClient`] over the student portal's REST
//! API.
//!
//! The portal wraps every JSON response in an envelope:
//!
//! ```text
//! { "status": { "responseStatus": "Success", ... }, "response": { ... } }
//! ```
//!
//! [`WebPortalClient`] unwraps that envelope once, maps transport and status
//! failures onto the categorized [`PortalError`] variants, and deserializes
//! the payload into the typed models before anything else sees it. The marks
//! report document is the one non-JSON endpoint; it is fetched as raw bytes
//! for the extractor.

use crate::core::{PortalError, Result};
use crate::models::{
    ExamEvent, ExamScheduleEntry, GradeCard, GradeSummary, PersonalInfo, RegisteredSubjects,
    SemesterRef,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::RwLock;

use super::PortalClient;

/// Default portal API root.
pub const DEFAULT_BASE_URL: &str = "https://webportal.jiit.ac.in:6011/StudentPortalAPI";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Session established by a successful login.
#[derive(Debug, Clone)]
struct Session {
    token: String,
    institute_id: String,
}

/// Portal client over HTTP.
pub struct WebPortalClient {
    http: reqwest::Client,
    base_url: String,
    session: RwLock<Option<Session>>,
}

impl WebPortalClient {
    /// Client against the default portal URL.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against a custom portal URL (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into(),
            session: RwLock::new(None),
        }
    }

    async fn session(&self) -> Result<Session> {
        self.session
            .read()
            .await
            .clone()
            .ok_or_else(|| PortalError::LoginFailed {
                reason: "no active session; call student_login first".to_string(),
            })
    }

    /// POST a JSON request and unwrap the portal envelope down to the
    /// `response` object.
    async fn call(&self, endpoint: &str, payload: Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.http.post(&url).json(&payload);
        if let Some(session) = self.session.read().await.as_ref() {
            request = request.bearer_auth(&session.token);
        }

        tracing::debug!(target: "portal", endpoint, "portal API call");
        let response = request
            .send()
            .await
            .map_err(|err| PortalError::from_transport(endpoint, &err))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(PortalError::ServerUnavailable);
        }
        if !status.is_success() {
            return Err(PortalError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let mut body: Value =
            response
                .json()
                .await
                .map_err(|err| PortalError::MalformedResponse {
                    endpoint: endpoint.to_string(),
                    reason: err.to_string(),
                })?;

        let ok = body
            .pointer("/status/responseStatus")
            .and_then(Value::as_str)
            == Some("Success");
        if !ok {
            let message = body
                .pointer("/status/errors")
                .map(Value::to_string)
                .unwrap_or_else(|| "portal reported failure".to_string());
            return Err(PortalError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(body
            .get_mut("response")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }

    /// Deserialize a node of the response, by JSON pointer ("" for the root).
    fn extract<T: DeserializeOwned>(endpoint: &str, response: &Value, pointer: &str) -> Result<T> {
        let node = if pointer.is_empty() {
            response
        } else {
            response
                .pointer(pointer)
                .ok_or_else(|| PortalError::MalformedResponse {
                    endpoint: endpoint.to_string(),
                    reason: format!("missing field '{pointer}'"),
                })?
        };
        serde_json::from_value(node.clone()).map_err(|err| PortalError::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        })
    }

    /// Fetch a semester list from an endpoint that returns `registrations`.
    async fn semester_list(&self, endpoint: &str) -> Result<Vec<SemesterRef>> {
        let session = self.session().await?;
        let response = self
            .call(endpoint, json!({ "instituteid": session.institute_id }))
            .await?;
        Self::extract(endpoint, &response, "/registrations")
    }

    fn marks_document_endpoint(&self, semester: &SemesterRef, institute_id: &str) -> String {
        format!(
            "{}/studentsexamview/printstudent-exammarks/{}/{}/{}",
            self.base_url, institute_id, semester.registration_id, semester.registration_code
        )
    }
}

impl Default for WebPortalClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PortalClient for WebPortalClient {
    async fn student_login(&self, username: &str, password: &str) -> Result<()> {
        let endpoint = "/token/generate-token1";
        let response = self
            .call(
                endpoint,
                json!({
                    "username": username,
                    "passwd": password,
                    "clienttype": "SOA",
                }),
            )
            .await
            .map_err(|err| match err {
                // Envelope-level failure on the login endpoint means the
                // credentials were rejected; transport failures keep their
                // categories.
                PortalError::Api { message, .. } => PortalError::LoginFailed { reason: message },
                other => other,
            })?;

        let token = response
            .pointer("/token")
            .and_then(Value::as_str)
            .ok_or_else(|| PortalError::MalformedResponse {
                endpoint: endpoint.to_string(),
                reason: "missing field '/token'".to_string(),
            })?
            .to_string();
        let institute_id = response
            .pointer("/regdata/instituteid")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        *self.session.write().await = Some(Session {
            token,
            institute_id,
        });
        tracing::info!(target: "portal", "login successful");
        Ok(())
    }

    async fn get_sgpa_cgpa(&self) -> Result<Vec<GradeSummary>> {
        let endpoint = "/studentsgpacgpa/getallsemesterdata";
        let session = self.session().await?;
        let response = self
            .call(endpoint, json!({ "instituteid": session.institute_id }))
            .await?;
        Self::extract(endpoint, &response, "/semesterList")
    }

    async fn get_semesters_for_grade_card(&self) -> Result<Vec<SemesterRef>> {
        self.semester_list("/studentgradecard/getregistrationList")
            .await
    }

    async fn get_grade_card(&self, semester: &SemesterRef) -> Result<GradeCard> {
        let endpoint = "/studentgradecard/showstudentgradecard";
        let session = self.session().await?;
        let response = self
            .call(
                endpoint,
                json!({
                    "instituteid": session.institute_id,
                    "registrationid": semester.registration_id,
                }),
            )
            .await?;
        let subjects = Self::extract(endpoint, &response, "/gradecard")?;
        Ok(GradeCard {
            semester_id: semester.registration_id.clone(),
            subjects,
        })
    }

    async fn get_semesters_for_exam_events(&self) -> Result<Vec<SemesterRef>> {
        self.semester_list("/studentcommonfunctions/getsemestercode-exam")
            .await
    }

    async fn get_exam_events(&self, semester: &SemesterRef) -> Result<Vec<ExamEvent>> {
        let endpoint = "/studentcommonfunctions/getexamevents";
        let session = self.session().await?;
        let response = self
            .call(
                endpoint,
                json!({
                    "instituteid": session.institute_id,
                    "registrationid": semester.registration_id,
                }),
            )
            .await?;
        Self::extract(endpoint, &response, "/events")
    }

    async fn get_exam_schedule(&self, event: &ExamEvent) -> Result<Vec<ExamScheduleEntry>> {
        let endpoint = "/studentsexamview/getstudent-examschedule";
        let session = self.session().await?;
        let response = self
            .call(
                endpoint,
                json!({
                    "instituteid": session.institute_id,
                    "exameventid": event.exam_event_id,
                }),
            )
            .await?;
        Self::extract(endpoint, &response, "/subjectinfo")
    }

    async fn get_registered_semesters(&self) -> Result<Vec<SemesterRef>> {
        self.semester_list("/reqsubfaculty/getregistrationList").await
    }

    async fn get_registered_subjects_and_faculties(
        &self,
        semester: &SemesterRef,
    ) -> Result<RegisteredSubjects> {
        let endpoint = "/reqsubfaculty/getfaculties";
        let session = self.session().await?;
        let response = self
            .call(
                endpoint,
                json!({
                    "instituteid": session.institute_id,
                    "registrationid": semester.registration_id,
                }),
            )
            .await?;
        Self::extract(endpoint, &response, "")
    }

    async fn get_semesters_for_marks(&self) -> Result<Vec<SemesterRef>> {
        self.semester_list("/studentsexamview/getsemestercode-exammarks")
            .await
    }

    async fn fetch_marks_document(&self, semester: &SemesterRef) -> Result<Vec<u8>> {
        let session = self.session().await?;
        let url = self.marks_document_endpoint(semester, &session.institute_id);
        let endpoint = "/studentsexamview/printstudent-exammarks";

        let response = self
            .http
            .get(&url)
            .bearer_auth(&session.token)
            .send()
            .await
            .map_err(|err| PortalError::from_transport(endpoint, &err))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(PortalError::ServerUnavailable);
        }
        if !status.is_success() {
            return Err(PortalError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| PortalError::from_transport(endpoint, &err))?;
        if bytes.is_empty() {
            return Err(PortalError::EmptyData {
                domain: "marks".to_string(),
            });
        }
        Ok(bytes.to_vec())
    }

    async fn download_marks(&self, semester: &SemesterRef, dest: &Path) -> Result<PathBuf> {
        let bytes = self.fetch_marks_document(semester).await?;
        let path = dest.join(format!("marks-{}.pdf", semester.registration_code));
        tokio::fs::write(&path, &bytes).await?;
        tracing::info!(target: "portal", path = %path.display(), "marks report saved");
        Ok(path)
    }

    async fn get_personal_info(&self) -> Result<PersonalInfo> {
        let endpoint = "/studentpersinfo/getstudent-personalinformation";
        let session = self.session().await?;
        let response = self
            .call(
                endpoint,
                json!({
                    "instituteid": session.institute_id,
                    "clienttype": "SOA",
                }),
            )
            .await?;
        Self::extract(endpoint, &response, "")
    }
}

use crate::{
    config::ApiConfig,
    data::student::{Student, StudentDraft, StudentId},
    error::{DecodeStudentsSnafu, RosterResult, SendRequestSnafu, UnsuccessfulStatusSnafu},
};
use reqwest::{Client, StatusCode};
use snafu::{ResultExt, ensure};
use std::sync::Arc;

///Thin client for the remote `students` collection. No auth, no pagination, no timeout.
#[derive(Clone, Debug)]
pub struct StudentsClient {
    http: Client,
    config: Arc<ApiConfig>,
}

impl StudentsClient {
    pub fn new(config: Arc<ApiConfig>) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    ///The status isn't looked at - anything that decodes as a list of students counts.
    pub async fn list(&self) -> RosterResult<Vec<Student>> {
        let url = self.config.students_url();
        let rsp = self
            .http
            .get(&url)
            .send()
            .await
            .context(SendRequestSnafu {
                method: "GET",
                url: url.clone(),
            })?;

        rsp.json().await.context(DecodeStudentsSnafu { url })
    }

    pub async fn create(&self, draft: &StudentDraft) -> RosterResult<()> {
        let url = self.config.students_url();
        let rsp = self
            .http
            .post(&url)
            .json(draft)
            .send()
            .await
            .context(SendRequestSnafu {
                method: "POST",
                url: url.clone(),
            })?;

        ensure!(
            rsp.status().is_success(),
            UnsuccessfulStatusSnafu {
                status: rsp.status(),
                method: "POST",
                url
            }
        );
        Ok(())
    }

    pub async fn update(&self, id: &StudentId, draft: &StudentDraft) -> RosterResult<()> {
        let url = self.config.student_url(id);
        let rsp = self
            .http
            .put(&url)
            .json(draft)
            .send()
            .await
            .context(SendRequestSnafu {
                method: "PUT",
                url: url.clone(),
            })?;

        ensure!(
            rsp.status().is_success(),
            UnsuccessfulStatusSnafu {
                status: rsp.status(),
                method: "PUT",
                url
            }
        );
        Ok(())
    }

    ///Hands back whatever status came back, ok or not - callers decide whether they care.
    pub async fn delete(&self, id: &StudentId) -> RosterResult<StatusCode> {
        let url = self.config.student_url(id);
        let rsp = self
            .http
            .delete(&url)
            .send()
            .await
            .context(SendRequestSnafu {
                method: "DELETE",
                url,
            })?;

        Ok(rsp.status())
    }
}

///A base url whose port had a listener a moment ago, and now has nothing.
#[cfg(test)]
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    fn client_for(server: &MockServer) -> StudentsClient {
        StudentsClient::new(Arc::new(ApiConfig::new(server.uri())))
    }

    fn kim() -> StudentDraft {
        StudentDraft {
            name: "Kim".into(),
            email: "k@x.com".into(),
            student_id: "2024001".into(),
            phone: "010-1111-2222".into(),
        }
    }

    #[tokio::test]
    async fn list_decodes_even_with_odd_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/students"))
            .respond_with(ResponseTemplate::new(203).set_body_json(json!([
                {"id": "1", "name": "Kim", "email": "k@x.com", "studentId": "2024001", "phone": "010-1111-2222"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let students = client_for(&server).list().await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].draft(), kim());
    }

    #[tokio::test]
    async fn list_keeps_records_with_null_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/students"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "name": "Kim", "email": "k@x.com", "studentId": "2024001", "phone": null},
                {"name": "Lee", "email": null, "studentId": "2024002", "phone": "010-3333-4444"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let students = client_for(&server).list().await.unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].id, StudentId::from("1"));
        assert_eq!(students[0].phone, "");
        assert_eq!(students[1].id, StudentId::default());
        assert_eq!(students[1].name, "Lee");
        assert_eq!(students[1].email, "");
    }

    #[tokio::test]
    async fn list_rejects_non_array_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/students"))
            .respond_with(ResponseTemplate::new(404).set_body_string("\"Not found\""))
            .mount(&server)
            .await;

        let err = client_for(&server).list().await.unwrap_err();
        assert!(matches!(err, RosterError::DecodeStudents { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn create_posts_json_draft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/students"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "name": "Kim",
                "email": "k@x.com",
                "studentId": "2024001",
                "phone": "010-1111-2222",
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).create(&kim()).await.unwrap();
    }

    #[tokio::test]
    async fn update_fails_on_non_ok() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/students/1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .update(&StudentId::from("1"), &kim())
            .await
            .unwrap_err();
        assert!(
            matches!(err, RosterError::UnsuccessfulStatus { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn delete_reports_status_without_judging() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/students/9"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let status = client_for(&server)
            .delete(&StudentId::from("9"))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unreachable_server_is_a_send_error() {
        let client = StudentsClient::new(Arc::new(ApiConfig::new(unreachable_base_url().await)));

        let err = client.list().await.unwrap_err();
        assert!(matches!(err, RosterError::SendRequest { .. }), "{err:?}");
    }
}

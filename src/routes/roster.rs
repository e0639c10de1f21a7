use crate::{
    data::{
        IdForm,
        student::{StudentDraft, StudentField},
    },
    error::RosterResult,
    maud_conveniences::{render_table, simple_form_element, title},
    roster::{SessionState, editor::StudentEditor},
    state::RosterState,
};
use axum::{
    Form,
    extract::{Path, Query, State},
};
use maud::{Markup, html};
use uuid::Uuid;

pub fn render_roster(view: Uuid, session: &SessionState) -> Markup {
    let base = format!("/internal/roster/{view}");

    let rows = session
        .students()
        .iter()
        .enumerate()
        .map(|(index, student)| {
            let hx_vals = serde_json::json!({ "id": student.id }).to_string();
            (
                format!("student-{}", student.id),
                [
                    html! {(index + 1)},
                    html! {(student.name)},
                    html! {(student.email)},
                    html! {(student.student_id)},
                    html! {(student.phone)},
                    html! {
                        button class="btn btn-primary btn-sm" hx-post={(base) "/edit"} hx-vals=(hx_vals) hx-target="#roster" hx-swap="outerHTML" {
                            "Edit"
                        }
                        " "
                        button class="btn btn-danger btn-sm" hx-delete={(base) "/student"} hx-vals=(hx_vals) hx-target="#roster" hx-swap="outerHTML" {
                            "Delete"
                        }
                    },
                ],
            )
        })
        .collect();

    html! {
        div id="roster" class="container text-center" {
            (title("Student List"))
            button class="btn btn-primary my-3" hx-post={(base) "/add"} hx-target="#roster" hx-swap="outerHTML" {
                "Add Student"
            }
            (render_table(
                ["No.", "Name", "Email", "Student ID", "Phone", "Edit / Delete"],
                rows,
            ))
            @if let Some(editor) = session.editor() {
                (render_editor(&base, editor))
            }
        }
    }
}

fn render_editor(base: &str, editor: &StudentEditor) -> Markup {
    let editor_url = format!("{base}/editor");

    html! {
        div class="modal show d-block" tabindex="-1" {
            div class="modal-dialog" {
                div class="modal-content" {
                    div class="modal-header" {
                        h5 class="modal-title" {(editor.title())}
                        button type="button" class="btn-close" hx-post={(base) "/close"} hx-target="#roster" hx-swap="outerHTML" {}
                    }
                    div class="modal-body" {
                        form hx-put=(editor_url) hx-target="#roster" hx-swap="outerHTML" {
                            @for field in StudentField::ALL {
                                (simple_form_element(
                                    field.form_name(),
                                    field.label(),
                                    true,
                                    field.input_type(),
                                    editor.draft().get(field),
                                    &editor_url,
                                ))
                            }
                            button type="submit" class="btn btn-primary" {(editor.submit_label())}
                        }
                    }
                }
            }
        }
    }
}

async fn render_view(state: &RosterState, view: Uuid) -> RosterResult<Markup> {
    let controller = state.get_view(view).await?;
    Ok(render_roster(view, &controller.snapshot().await))
}

pub async fn internal_get_roster(
    State(state): State<RosterState>,
    Path(view): Path<Uuid>,
) -> RosterResult<Markup> {
    render_view(&state, view).await
}

pub async fn internal_post_add(
    State(state): State<RosterState>,
    Path(view): Path<Uuid>,
) -> RosterResult<Markup> {
    state.get_view(view).await?.handle_add_click().await;
    render_view(&state, view).await
}

pub async fn internal_post_edit(
    State(state): State<RosterState>,
    Path(view): Path<Uuid>,
    Form(IdForm { id }): Form<IdForm>,
) -> RosterResult<Markup> {
    let controller = state.get_view(view).await?;
    let student = controller.find_student(&id).await?;
    controller.handle_edit_click(student).await;

    render_view(&state, view).await
}

pub async fn internal_post_close(
    State(state): State<RosterState>,
    Path(view): Path<Uuid>,
) -> RosterResult<Markup> {
    state.get_view(view).await?.handle_close_click().await;
    render_view(&state, view).await
}

pub async fn internal_delete_student(
    State(state): State<RosterState>,
    Path(view): Path<Uuid>,
    Query(IdForm { id }): Query<IdForm>,
) -> RosterResult<Markup> {
    if let Err(e) = state.get_view(view).await?.handle_delete_click(&id).await {
        error!(?e, "Failed to reload students after delete");
    }

    render_view(&state, view).await
}

///Keystrokes. Anything that isn't one of the four fields gets ignored.
pub async fn internal_patch_editor(
    State(state): State<RosterState>,
    Path(view): Path<Uuid>,
    Form(fields): Form<Vec<(String, String)>>,
) -> RosterResult<()> {
    let changes = fields.into_iter().filter_map(|(name, value)| {
        name.parse::<StudentField>()
            .ok()
            .map(|field| (field, value))
    });

    state
        .get_view(view)
        .await?
        .handle_field_changes(changes)
        .await;
    Ok(())
}

pub async fn internal_put_editor(
    State(state): State<RosterState>,
    Path(view): Path<Uuid>,
    Form(draft): Form<StudentDraft>,
) -> RosterResult<Markup> {
    let changes = StudentField::ALL.map(|field| (field, draft.get(field).to_string()));

    if let Err(e) = state.get_view(view).await?.handle_submit(changes).await {
        error!(?e, "Failed to save student");
    }

    render_view(&state, view).await
}

pub async fn internal_post_unmount(State(state): State<RosterState>, Path(view): Path<Uuid>) {
    state.unmount_view(view).await;
}

#[cfg(test)]
mod tests {
    use crate::{config::RuntimeConfiguration, routes::router, state::RosterState};
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header::CONTENT_TYPE},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    const FORM: &str = "application/x-www-form-urlencoded";

    fn kim_json() -> Value {
        json!({"id": "1", "name": "Kim", "email": "k@x.com", "studentId": "2024001", "phone": "010-1111-2222"})
    }

    async fn mock_list(server: &MockServer, body: Value, times: u64) {
        Mock::given(method("GET"))
            .and(path("/students"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(times)
            .mount(server)
            .await;
    }

    async fn mounted(server: &MockServer) -> (Router, Uuid) {
        let state = RosterState::new(&RuntimeConfiguration::for_api(server.uri()));
        let (view, _) = state.mount_view().await;
        (router(state), view)
    }

    async fn send(app: &Router, method: &str, uri: String, form: Option<&str>) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match form {
            Some(body) => builder
                .header(CONTENT_TYPE, FORM)
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let rsp = app.clone().oneshot(req).await.unwrap();
        let status = rsp.status();
        let bytes = axum::body::to_bytes(rsp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn index_shows_one_row_per_student() {
        let server = MockServer::start().await;
        mock_list(&server, json!([kim_json()]), 1).await;

        let state = RosterState::new(&RuntimeConfiguration::for_api(server.uri()));
        let (status, body) = send(&router(state), "GET", "/".into(), None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Student List"));
        assert!(body.contains(
            "<tr id=\"student-1\"><td>1</td><td>Kim</td><td>k@x.com</td><td>2024001</td><td>010-1111-2222</td>"
        ));
        assert!(!body.contains("modal-dialog"));
        assert!(body.contains("sendBeacon"));
    }

    #[tokio::test]
    async fn rows_are_numbered_by_position_not_id() {
        let server = MockServer::start().await;
        mock_list(
            &server,
            json!([
                {"id": "17", "name": "A", "email": "a@x.com", "studentId": "1", "phone": "1"},
                {"id": "4", "name": "B", "email": "b@x.com", "studentId": "2", "phone": "2"},
            ]),
            1,
        )
        .await;

        let (app, view) = mounted(&server).await;
        let (_, body) = send(&app, "GET", format!("/internal/roster/{view}"), None).await;

        assert!(body.contains("<tr id=\"student-17\"><td>1</td><td>A</td>"));
        assert!(body.contains("<tr id=\"student-4\"><td>2</td><td>B</td>"));
    }

    #[tokio::test]
    async fn add_opens_empty_modal_and_submit_posts_fields() {
        let server = MockServer::start().await;
        mock_list(&server, json!([]), 2).await;
        Mock::given(method("POST"))
            .and(path("/students"))
            .and(body_json(json!({"name": "Lee", "email": "l@x.com", "studentId": "2024002", "phone": "010-3333-4444"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let (app, view) = mounted(&server).await;

        let (_, body) = send(&app, "POST", format!("/internal/roster/{view}/add"), None).await;
        assert!(body.contains("modal-dialog"));
        assert!(body.contains("Add Student</h5>"));
        assert_eq!(body.matches("value=\"\"").count(), 4);

        let (status, body) = send(
            &app,
            "PUT",
            format!("/internal/roster/{view}/editor"),
            Some("name=Lee&phone=010-3333-4444&email=l%40x.com&studentId=2024002"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("modal-dialog"));
    }

    #[tokio::test]
    async fn edit_prefills_and_submit_puts_to_record() {
        let server = MockServer::start().await;
        mock_list(&server, json!([kim_json()]), 2).await;
        Mock::given(method("PUT"))
            .and(path("/students/1"))
            .and(body_json(json!({"name": "Kim", "email": "k@x.com", "studentId": "2024001", "phone": "010-9999-0000"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (app, view) = mounted(&server).await;

        let (_, body) = send(&app, "POST", format!("/internal/roster/{view}/edit"), Some("id=1")).await;
        assert!(body.contains("Edit Student</h5>"));
        assert!(body.contains("value=\"Kim\""));
        assert!(body.contains("value=\"010-1111-2222\""));
        assert!(body.contains("Save Changes"));

        let (status, _) = send(
            &app,
            "PATCH",
            format!("/internal/roster/{view}/editor"),
            Some("phone=010-9999-0000&bogus=1"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, "GET", format!("/internal/roster/{view}"), None).await;
        assert!(body.contains("value=\"010-9999-0000\""));

        let (_, body) = send(
            &app,
            "PUT",
            format!("/internal/roster/{view}/editor"),
            Some("name=Kim&phone=010-9999-0000&email=k%40x.com&studentId=2024001"),
        )
        .await;
        assert!(!body.contains("modal-dialog"));
    }

    #[tokio::test]
    async fn rejected_save_keeps_modal_open() {
        let server = MockServer::start().await;
        mock_list(&server, json!([kim_json()]), 1).await;
        Mock::given(method("PUT"))
            .and(path("/students/1"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let (app, view) = mounted(&server).await;
        send(&app, "POST", format!("/internal/roster/{view}/edit"), Some("id=1")).await;

        let (status, body) = send(
            &app,
            "PUT",
            format!("/internal/roster/{view}/editor"),
            Some("name=Park&phone=010-1111-2222&email=k%40x.com&studentId=2024001"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("modal-dialog"));
        assert!(body.contains("value=\"Park\""));
    }

    #[tokio::test]
    async fn delete_always_reloads() {
        let server = MockServer::start().await;
        mock_list(&server, json!([kim_json()]), 2).await;
        Mock::given(method("DELETE"))
            .and(path("/students/1"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let (app, view) = mounted(&server).await;
        let (status, body) = send(&app, "DELETE", format!("/internal/roster/{view}/student?id=1"), None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("student-1"));
    }

    #[tokio::test]
    async fn close_discards_modal() {
        let server = MockServer::start().await;
        mock_list(&server, json!([kim_json()]), 1).await;

        let (app, view) = mounted(&server).await;
        send(&app, "POST", format!("/internal/roster/{view}/edit"), Some("id=1")).await;
        let (_, body) = send(&app, "POST", format!("/internal/roster/{view}/close"), None).await;

        assert!(!body.contains("modal-dialog"));
    }

    #[tokio::test]
    async fn editing_unknown_student_is_not_found() {
        let server = MockServer::start().await;
        mock_list(&server, json!([kim_json()]), 1).await;

        let (app, view) = mounted(&server).await;
        let (status, _) = send(&app, "POST", format!("/internal/roster/{view}/edit"), Some("id=2")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unmounted_views_are_gone() {
        let server = MockServer::start().await;
        mock_list(&server, json!([]), 1).await;

        let (app, view) = mounted(&server).await;
        let (status, _) = send(&app, "POST", format!("/internal/roster/{view}/unmount"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", format!("/internal/roster/{view}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Roster Error"));
    }
}

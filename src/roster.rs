use crate::{
    api::StudentsClient,
    data::student::{Student, StudentDraft, StudentField, StudentId},
    error::{MissingStudentSnafu, RosterResult},
};
use snafu::OptionExt;
use tokio::sync::Mutex;

pub mod editor;

use editor::StudentEditor;

///Everything one mounted roster view knows about. The editor is only around while the modal is open.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    students: Vec<Student>,
    selected_student: Option<Student>,
    editor: Option<StudentEditor>,
}

impl SessionState {
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    #[cfg(test)]
    pub const fn selected_student(&self) -> Option<&Student> {
        self.selected_student.as_ref()
    }

    pub const fn modal_open(&self) -> bool {
        self.editor.is_some()
    }

    pub const fn editor(&self) -> Option<&StudentEditor> {
        self.editor.as_ref()
    }

    fn open_modal(&mut self) {
        self.editor = Some(StudentEditor::initialize(self.selected_student.as_ref()));
    }

    fn close_modal(&mut self) {
        if self.editor.take().is_some_and(StudentEditor::on_close) {
            debug!("Discarded unsaved student draft");
        }
        self.selected_student = None;
    }

    ///The draft has gone to the remote store, so nothing is being discarded here.
    fn finish_save(&mut self) {
        self.editor = None;
        self.selected_student = None;
    }
}

///Owns one view's session state and does all the talking to the remote store.
///
///The lock is never held across a request, so overlapping actions interleave rather than queue. After any
///successful mutation, the whole list is fetched again rather than patched locally.
#[derive(Debug)]
pub struct RosterController {
    client: StudentsClient,
    session: Mutex<SessionState>,
}

impl RosterController {
    pub fn new(client: StudentsClient) -> Self {
        Self {
            client,
            session: Mutex::new(SessionState::default()),
        }
    }

    ///A fresh controller with the first list load done. A failed load is only logged.
    pub async fn mount(client: StudentsClient) -> Self {
        let controller = Self::new(client);
        if let Err(e) = controller.load_student_list().await {
            error!(?e, "Failed to load students on mount");
        }
        controller
    }

    pub async fn snapshot(&self) -> SessionState {
        self.session.lock().await.clone()
    }

    ///Replaces the whole collection. On failure the old one stays.
    pub async fn load_student_list(&self) -> RosterResult<()> {
        let students = self.client.list().await?;
        debug!(count = students.len(), "Loaded students");
        self.session.lock().await.students = students;
        Ok(())
    }

    ///Updates the selected student if there is one, creates otherwise. Only a successful save reloads and
    ///closes the modal - on failure everything is left as it was.
    pub async fn handle_save_student(&self, draft: StudentDraft) -> RosterResult<()> {
        let selected_id = self
            .session
            .lock()
            .await
            .selected_student
            .as_ref()
            .map(|student| student.id.clone());

        match &selected_id {
            Some(id) => self.client.update(id, &draft).await?,
            None => self.client.create(&draft).await?,
        }
        info!(?selected_id, "Saved student");

        if let Err(e) = self.load_student_list().await {
            error!(?e, "Failed to reload students after save");
        }
        self.session.lock().await.finish_save();

        Ok(())
    }

    pub async fn handle_edit_click(&self, student: Student) {
        let mut session = self.session.lock().await;
        session.selected_student = Some(student);
        session.open_modal();
    }

    ///The delete's status is never checked, and the list is reloaded whatever happened.
    pub async fn handle_delete_click(&self, id: &StudentId) -> RosterResult<()> {
        match self.client.delete(id).await {
            Ok(status) => debug!(%id, %status, "Sent student delete"),
            //no answer at all still falls through to the reload below
            Err(e) => error!(?e, "Failed to delete student"),
        }

        self.load_student_list().await
    }

    pub async fn handle_add_click(&self) {
        self.session.lock().await.open_modal();
    }

    pub async fn handle_close_click(&self) {
        self.session.lock().await.close_modal();
    }

    pub async fn find_student(&self, id: &StudentId) -> RosterResult<Student> {
        self.session
            .lock()
            .await
            .students
            .iter()
            .find(|student| &student.id == id)
            .cloned()
            .context(MissingStudentSnafu { id: id.clone() })
    }

    ///Feeds edits into the open editor. With the modal closed, there's nothing to edit and they're dropped.
    pub async fn handle_field_changes(
        &self,
        changes: impl IntoIterator<Item = (StudentField, String)>,
    ) {
        let mut session = self.session.lock().await;
        let Some(editor) = session.editor.as_mut() else {
            debug!("Dropping field changes with no open editor");
            return;
        };

        for (field, value) in changes {
            editor.on_field_change(field, value);
        }
    }

    ///Applies the last round of field changes, then saves whatever the editor has.
    pub async fn handle_submit(
        &self,
        changes: impl IntoIterator<Item = (StudentField, String)>,
    ) -> RosterResult<()> {
        let draft = {
            let mut session = self.session.lock().await;
            let Some(editor) = session.editor.as_mut() else {
                warn!("Got a submit with no open editor");
                return Ok(());
            };

            for (field, value) in changes {
                editor.on_field_change(field, value);
            }
            editor.on_submit()
        };

        self.handle_save_student(draft).await
    }
}

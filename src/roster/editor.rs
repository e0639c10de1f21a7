use crate::data::student::{Student, StudentDraft, StudentField};

///The modal form's own state: a draft of the four fields, seeded when the modal opens.
///
///It never talks to the remote store - [`StudentEditor::on_submit`] hands the draft back, and closing/clearing
///is left to whoever owns the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentEditor {
    is_editing: bool,
    initial: StudentDraft,
    draft: StudentDraft,
}

impl StudentEditor {
    pub fn initialize(student: Option<&Student>) -> Self {
        let (is_editing, initial) = match student {
            Some(student) => (true, student.draft()),
            None => (false, StudentDraft::default()),
        };

        Self {
            is_editing,
            draft: initial.clone(),
            initial,
        }
    }

    pub fn on_field_change(&mut self, field: StudentField, value: String) {
        self.draft.set(field, value);
    }

    pub fn on_submit(&self) -> StudentDraft {
        self.draft.clone()
    }

    ///Drops the draft unsaved. Returns whether that threw away any edits.
    pub fn on_close(self) -> bool {
        self.draft != self.initial
    }

    pub const fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub const fn draft(&self) -> &StudentDraft {
        &self.draft
    }

    pub const fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Student"
        } else {
            "Add Student"
        }
    }

    pub const fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Save Changes"
        } else {
            "Add"
        }
    }
}

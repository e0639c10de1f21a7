use crate::data::student::StudentId;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;
use snafu::Snafu;
use std::num::ParseIntError;
use uuid::Uuid;

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RosterError {
    #[snafu(display("Error sending {} request to {}", method, url))]
    SendRequest {
        source: reqwest::Error,
        method: &'static str,
        url: String,
    },
    #[snafu(display("Got non-ok status {} from {} {}", status, method, url))]
    UnsuccessfulStatus {
        status: reqwest::StatusCode,
        method: &'static str,
        url: String,
    },
    #[snafu(display("Unable to decode student list from {}", url))]
    DecodeStudents { source: reqwest::Error, url: String },
    #[snafu(display("Unable to find view session with UUID: {}", id))]
    MissingView { id: Uuid },
    #[snafu(display("Unable to find student with ID: {}", id))]
    MissingStudent { id: StudentId },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse view idle timeout seconds"))]
    ParseIdleSecs { source: ParseIntError },
}

impl IntoResponse for RosterError {
    #[allow(clippy::match_same_arms)]
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const BG: StatusCode = StatusCode::BAD_GATEWAY; //remote api misbehaved
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found

        let basic_error = |desc| {
            html! {
                div class="alert alert-danger" role="alert" {
                    strong {"Roster Error: "}
                    span {(desc)}
                }
            }
        };

        let status_code = match &self {
            Self::SendRequest { .. } => BG,
            Self::UnsuccessfulStatus { .. } => BG,
            Self::DecodeStudents { .. } => BG,
            Self::MissingView { .. } | Self::MissingStudent { .. } => NF,
            Self::BadEnvVar { .. } | Self::ParseIdleSecs { .. } => ISE,
        };

        error!(?self, "Error!");
        (status_code, Html(basic_error(self.to_string()))).into_response()
    }
}

use anyhow::Context;
use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::errors::AppError;

const FILENAME_SUFFIX: &str = "_job_description.txt";

/// `"Acme", "Backend Engineer"` → `Acme_Backend_Engineer_job_description.txt`.
pub fn download_filename(company_name: &str, job_title: &str) -> String {
    format!(
        "{}_{}{FILENAME_SUFFIX}",
        company_name.replace(' ', "_"),
        job_title.replace(' ', "_")
    )
}

/// RFC 5987 `attr-char`: everything else in `filename*` is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// `Content-Disposition` value with an ASCII `filename` for old clients and
/// the exact UTF-8 name in `filename*`.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();
    let encoded = utf8_percent_encode(filename, ATTR_CHAR);
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

/// Plain-text attachment carrying the generated description verbatim.
pub fn text_attachment(filename: &str, body: String) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_str(&content_disposition(filename))
        .context("building Content-Disposition header")?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

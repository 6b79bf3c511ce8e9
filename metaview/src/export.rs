// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::content::ItemId;
use crate::meta::PostDataDocument;
use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::panic::Location;

pub const EXPORT_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Characters dropped from download file names.
const UNSAFE_FILE_NAME_CHARS: &[char] = &[
    '?', '[', ']', '/', '\\', '=', '<', '>', ':', ';', ',', '\'', '"', '&', '$', '#', '*', '(',
    ')', '|', '~', '`', '!', '{', '}', '%', '+', '\u{2019}', '\u{ab}', '\u{bb}', '\u{201d}',
    '\u{201c}', '\0',
];

const UNNAMED_FILE: &str = "unnamed-file";

#[derive(Debug)]
pub enum ExportError {
    Encode(serde_json::Error),
    HeadersAlreadySent { file: String, line: u32 },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Encode(err) => write!(f, "export encoding failed: {}", err),
            ExportError::HeadersAlreadySent { file, line } => write!(
                f,
                "Headers already sent. Output has started in file {} on line {}",
                file, line
            ),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Encode(err)
    }
}

/// A ready-to-send JSON download.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Serializes the document and computes the download headers.
pub fn build_export(
    document: &PostDataDocument,
    item_type: &str,
    item_id: ItemId,
    timestamp: DateTime<FixedOffset>,
) -> Result<ExportFile, ExportError> {
    let body = serde_json::to_vec_pretty(document)?;
    let filename = export_filename(item_type, item_id, timestamp);
    let headers = vec![
        ("Content-Type".to_string(), EXPORT_CONTENT_TYPE.to_string()),
        (
            "Content-Disposition".to_string(),
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok(ExportFile {
        filename,
        headers,
        body,
    })
}

/// Sortable timestamp without characters that need escaping in file names,
/// e.g. `20261016t143005e0200` (`+` becomes `e`, `-` becomes `w`).
pub fn export_file_date(timestamp: DateTime<FixedOffset>) -> String {
    timestamp
        .format("%Y%m%dt%H%M%S%z")
        .to_string()
        .replace('+', "e")
        .replace('-', "w")
}

pub fn export_filename(item_type: &str, item_id: ItemId, timestamp: DateTime<FixedOffset>) -> String {
    let raw = format!(
        "{}-{}-meta-export-{}.json",
        item_type,
        item_id,
        export_file_date(timestamp)
    );
    sanitize_file_name(&raw).replace('"', "")
}

/// Drops characters unsafe on common file systems, collapses whitespace and
/// dash runs into a single dash and trims `.`, `-` and `_` from both ends.
pub fn sanitize_file_name(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    let mut in_separator_run = false;
    for ch in name.chars() {
        if UNSAFE_FILE_NAME_CHARS.contains(&ch) {
            continue;
        }
        if matches!(ch, '\r' | '\n' | '\t' | ' ' | '-') {
            if !in_separator_run {
                sanitized.push('-');
                in_separator_run = true;
            }
            continue;
        }
        if ch.is_control() {
            continue;
        }
        in_separator_run = false;
        sanitized.push(ch);
    }
    let trimmed = sanitized.trim_matches(|ch| matches!(ch, '.' | '-' | '_'));
    if trimmed.is_empty() {
        UNNAMED_FILE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Where response body output first started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLocation {
    pub file: &'static str,
    pub line: u32,
}

/// Response under construction: headers are accepted only until the first
/// body byte is written.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    output_started: Option<OutputLocation>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_started(&self) -> Option<OutputLocation> {
        self.output_started
    }

    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), ExportError> {
        if let Some(location) = self.output_started {
            return Err(ExportError::HeadersAlreadySent {
                file: location.file.to_string(),
                line: location.line,
            });
        }
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    #[track_caller]
    pub fn write_body(&mut self, bytes: &[u8]) {
        if self.output_started.is_none() {
            let caller = Location::caller();
            self.output_started = Some(OutputLocation {
                file: caller.file(),
                line: caller.line(),
            });
        }
        self.body.extend_from_slice(bytes);
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_parts(self) -> (Vec<(String, String)>, Vec<u8>) {
        (self.headers, self.body)
    }
}

/// Writes the export into the response, failing when output already started.
pub fn send_export(response: &mut ResponseBuffer, export: ExportFile) -> Result<(), ExportError> {
    for (name, value) in &export.headers {
        response.set_header(name, value)?;
    }
    response.write_body(&export.body);
    Ok(())
}

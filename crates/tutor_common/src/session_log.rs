//! Session logging
//!
//! Append-only JSONL record of each tutoring session, one event per line,
//! under `<config dir>/logs/`. Write failures are swallowed after a trace
//! warning; a full disk must never abort a live session. Structured tracing
//! covers operator diagnostics, this file covers replaying what the student
//! and the model actually said.

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const LOG_DIR_NAME: &str = "logs";

/// One session's JSONL event log.
pub struct SessionLogger {
    enabled: bool,
    session_id: String,
    session_start: chrono::DateTime<Utc>,
    log_dir: PathBuf,
    log_file: PathBuf,
    event_count: usize,
}

#[derive(Debug, Clone, Serialize)]
struct Event {
    event_type: String,
    timestamp: String,
    session_id: String,
    #[serde(flatten)]
    fields: Value,
}

impl SessionLogger {
    /// A logger writing under `config_dir/logs/`. The directory is created
    /// lazily on first write.
    pub fn new(config_dir: &Path, enabled: bool) -> Self {
        let session_id = Uuid::new_v4().to_string();
        let session_start = Utc::now();
        let log_dir = config_dir.join(LOG_DIR_NAME);
        let log_file = log_dir.join(format!(
            "session_{}_{}.jsonl",
            session_start.format("%Y%m%d_%H%M%S"),
            &session_id[..8]
        ));

        Self {
            enabled,
            session_id,
            session_start,
            log_dir,
            log_file,
            event_count: 0,
        }
    }

    /// A logger that records nothing.
    pub fn disabled() -> Self {
        Self::new(Path::new("."), false)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    pub fn start_session(&mut self, session_type: &str, metadata: Value) {
        self.write_event(
            "session_start",
            json!({
                "session_type": session_type,
                "metadata": metadata,
            }),
        );
    }

    pub fn log_user_input(&mut self, input_type: &str, content: &str) {
        self.write_event(
            "user_input",
            json!({
                "input_type": input_type,
                "content": content,
            }),
        );
    }

    pub fn log_ai_response(&mut self, response_type: &str, content: &str) {
        self.write_event(
            "ai_response",
            json!({
                "response_type": response_type,
                "content": content,
            }),
        );
    }

    pub fn log_code_analysis(&mut self, file_path: &Path, analysis: &str) {
        self.write_event(
            "code_analysis",
            json!({
                "file_path": file_path.display().to_string(),
                "analysis": analysis,
            }),
        );
    }

    pub fn log_teaching_round(
        &mut self,
        round_number: u32,
        topic: &str,
        flawed_content: &str,
        student_explanation: &str,
        ai_evaluation: &str,
    ) {
        self.write_event(
            "teaching_round",
            json!({
                "round_number": round_number,
                "topic": topic,
                "flawed_content": flawed_content,
                "student_explanation": student_explanation,
                "ai_evaluation": ai_evaluation,
            }),
        );
    }

    pub fn log_error(&mut self, error_type: &str, message: &str) {
        self.write_event(
            "error",
            json!({
                "error_type": error_type,
                "message": message,
            }),
        );
    }

    pub fn end_session(&mut self) {
        let duration = Utc::now()
            .signed_duration_since(self.session_start)
            .num_seconds();
        self.write_event("session_end", json!({ "duration_seconds": duration }));
    }

    fn write_event(&mut self, event_type: &str, fields: Value) {
        if !self.enabled {
            return;
        }

        let event = Event {
            event_type: event_type.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            session_id: self.session_id.clone(),
            fields,
        };
        self.event_count += 1;

        if let Err(e) = self.append_line(&event) {
            tracing::warn!(error = %e, file = %self.log_file.display(), "failed to write session log");
        }
    }

    fn append_line(&self, event: &Event) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.log_dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;
        let line = serde_json::to_string(event).unwrap_or_default();
        writeln!(file, "{line}")
    }
}

/// Delete all session logs under `config_dir/logs/`, returning how many
/// files were removed.
pub fn clear_logs(config_dir: &Path) -> usize {
    let log_dir = config_dir.join(LOG_DIR_NAME);
    let Ok(entries) = std::fs::read_dir(&log_dir) else {
        return 0;
    };

    let mut count = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("session_") && name.ends_with(".jsonl") {
            if std::fs::remove_file(entry.path()).is_ok() {
                count += 1;
            }
        }
    }
    count
}

/// Gather every session log into one JSON document for export.
pub fn export_all_logs(config_dir: &Path, output_path: &Path) -> anyhow::Result<usize> {
    let log_dir = config_dir.join(LOG_DIR_NAME);

    let mut sessions = Vec::new();
    if log_dir.exists() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&log_dir)?
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .map(|n| {
                        let n = n.to_string_lossy();
                        n.starts_with("session_") && n.ends_with(".jsonl")
                    })
                    .unwrap_or(false)
            })
            .collect();
        files.sort();

        for file in files {
            let Ok(text) = std::fs::read_to_string(&file) else {
                continue;
            };
            let events: Vec<Value> = text
                .lines()
                .filter(|l| !l.trim().is_empty())
                .filter_map(|l| serde_json::from_str(l).ok())
                .collect();
            if events.is_empty() {
                continue;
            }

            let first = &events[0];
            let last = &events[events.len() - 1];
            sessions.push(json!({
                "session_id": first.get("session_id"),
                "session_type": first.get("session_type"),
                "start_time": first.get("timestamp"),
                "end_time": last.get("timestamp"),
                "events": events,
                "event_count": events.len(),
                "log_file": file.file_name().map(|n| n.to_string_lossy().into_owned()),
            }));
        }
    }

    let count = sessions.len();
    let export = json!({
        "export_timestamp": Utc::now().to_rfc3339(),
        "total_sessions": count,
        "sessions": sessions,
    });
    std::fs::write(output_path, serde_json::to_string_pretty(&export)?)?;
    Ok(count)
}

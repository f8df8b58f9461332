//! Exercise working directory
//!
//! Each generated exercise lives in its own directory under the exercises
//! root: a `.meta.json` with lifecycle state, a README, a starter file and
//! optionally a test file. Hints are stored in the metadata and revealed
//! one at a time; `hints_revealed` persists across invocations so the
//! student cannot un-see a hint by restarting.

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const METADATA_FILE: &str = ".meta.json";
pub const README_FILE: &str = "README.md";
pub const STARTER_STEM: &str = "starter";
pub const ARCHIVE_DIR: &str = "archived";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseStatus {
    Pending,
    InProgress,
    Submitted,
    Reviewed,
    Archived,
}

impl std::fmt::Display for ExerciseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Submitted => "submitted",
            Self::Reviewed => "reviewed",
            Self::Archived => "archived",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ExerciseStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "submitted" => Ok(Self::Submitted),
            "reviewed" => Ok(Self::Reviewed),
            "archived" => Ok(Self::Archived),
            other => Err(anyhow!("Unknown exercise status: {other}")),
        }
    }
}

pub const EXERCISE_TYPES: &[&str] = &[
    "fill_in_blank",
    "bug_fix",
    "implementation",
    "refactoring",
    "test_writing",
];

pub fn validate_exercise_type(exercise_type: &str) -> bool {
    EXERCISE_TYPES.contains(&exercise_type)
}

/// Language name (lowercased) to file extension.
const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("python", ".py"),
    ("javascript", ".js"),
    ("typescript", ".ts"),
    ("java", ".java"),
    ("c", ".c"),
    ("cpp", ".cpp"),
    ("c++", ".cpp"),
    ("go", ".go"),
    ("rust", ".rs"),
    ("ruby", ".rb"),
    ("php", ".php"),
    ("swift", ".swift"),
    ("kotlin", ".kt"),
    ("scala", ".scala"),
    ("shell", ".sh"),
    ("bash", ".sh"),
    ("sql", ".sql"),
    ("r", ".r"),
];

pub fn extension_for_language(language: &str) -> &'static str {
    let lowered = language.to_lowercase();
    LANGUAGE_EXTENSIONS
        .iter()
        .find(|(lang, _)| *lang == lowered)
        .map(|(_, ext)| *ext)
        .unwrap_or(".txt")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseMetadata {
    pub id: String,
    pub topic: String,
    pub language: String,
    pub exercise_type: String,
    pub difficulty: String,
    pub status: ExerciseStatus,
    pub created_at: String,
    pub updated_at: String,
    pub learning_objectives: Vec<String>,
    pub solution_hints: Vec<String>,
    #[serde(default)]
    pub hints_revealed: usize,
}

/// An exercise directory with loaded metadata.
#[derive(Debug, Clone)]
pub struct Exercise {
    pub id: String,
    pub path: PathBuf,
    pub metadata: ExerciseMetadata,
}

impl Exercise {
    pub fn starter_file(&self) -> Option<PathBuf> {
        let entries = std::fs::read_dir(&self.path).ok()?;
        entries
            .flatten()
            .map(|e| e.path())
            .find(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().starts_with(STARTER_STEM))
                    .unwrap_or(false)
            })
    }

    pub fn starter_code(&self) -> Option<String> {
        std::fs::read_to_string(self.starter_file()?).ok()
    }
}

/// What to write when creating a new exercise directory.
pub struct NewExercise<'a> {
    pub topic: &'a str,
    pub language: &'a str,
    pub exercise_type: &'a str,
    pub difficulty: &'a str,
    pub instructions: &'a str,
    pub starter_code: &'a str,
    pub test_code: Option<&'a str>,
    pub hints: Vec<String>,
    pub learning_objectives: Vec<String>,
}

pub struct ExerciseStore {
    exercises_dir: PathBuf,
}

impl ExerciseStore {
    pub fn new(exercises_dir: PathBuf) -> Self {
        Self { exercises_dir }
    }

    pub fn exercises_dir(&self) -> &Path {
        &self.exercises_dir
    }

    /// Directory name from the topic plus a timestamp for uniqueness.
    pub fn generate_exercise_id(&self, topic: &str) -> String {
        let sanitized: String = topic
            .to_lowercase()
            .replace(' ', "-")
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-')
            .take(30)
            .collect();
        format!("{sanitized}-{}", Local::now().format("%Y%m%d-%H%M%S"))
    }

    /// Write a new exercise directory and return it.
    pub fn create(&self, new: &NewExercise) -> Result<Exercise> {
        std::fs::create_dir_all(&self.exercises_dir).with_context(|| {
            format!("Failed to create {}", self.exercises_dir.display())
        })?;

        let id = self.generate_exercise_id(new.topic);
        let path = self.exercises_dir.join(&id);
        std::fs::create_dir_all(&path)?;

        let now = Local::now().to_rfc3339();
        let metadata = ExerciseMetadata {
            id: id.clone(),
            topic: new.topic.to_string(),
            language: new.language.to_string(),
            exercise_type: new.exercise_type.to_string(),
            difficulty: new.difficulty.to_string(),
            status: ExerciseStatus::Pending,
            created_at: now.clone(),
            updated_at: now,
            learning_objectives: new.learning_objectives.clone(),
            solution_hints: new.hints.clone(),
            hints_revealed: 0,
        };
        write_metadata(&path, &metadata)?;

        std::fs::write(
            path.join(README_FILE),
            render_readme(new, &self.exercises_dir),
        )?;

        let extension = extension_for_language(new.language);
        std::fs::write(
            path.join(format!("{STARTER_STEM}{extension}")),
            new.starter_code,
        )?;

        if let Some(test_code) = new.test_code {
            if !test_code.trim().is_empty() {
                std::fs::write(path.join(format!("test_exercise{extension}")), test_code)?;
            }
        }

        tracing::info!(id = %id, path = %path.display(), "created exercise");

        Ok(Exercise { id, path, metadata })
    }

    /// List exercises, newest first. Directories without readable metadata
    /// are skipped.
    pub fn list(&self, status_filter: Option<ExerciseStatus>) -> Vec<Exercise> {
        let Ok(entries) = std::fs::read_dir(&self.exercises_dir) else {
            return Vec::new();
        };

        let mut exercises: Vec<Exercise> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .filter_map(|p| load_exercise(&p))
            .filter(|e| status_filter.map_or(true, |s| e.metadata.status == s))
            .collect();

        exercises.sort_by(|a, b| b.metadata.created_at.cmp(&a.metadata.created_at));
        exercises
    }

    /// Look up by ID or by path (absolute paths are taken as-is).
    pub fn get(&self, id_or_path: &str) -> Option<Exercise> {
        let path = Path::new(id_or_path);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.exercises_dir.join(id_or_path)
        };
        load_exercise(&path)
    }

    pub fn update_status(&self, id_or_path: &str, new_status: ExerciseStatus) -> Result<()> {
        let mut exercise = self
            .get(id_or_path)
            .ok_or_else(|| anyhow!("Exercise not found: {id_or_path}"))?;

        exercise.metadata.status = new_status;
        exercise.metadata.updated_at = Local::now().to_rfc3339();
        write_metadata(&exercise.path, &exercise.metadata)
    }

    /// Reveal the next hint, persisting the new count. `None` once all
    /// hints are spent.
    pub fn next_hint(&self, id_or_path: &str) -> Result<Option<String>> {
        let mut exercise = self
            .get(id_or_path)
            .ok_or_else(|| anyhow!("Exercise not found: {id_or_path}"))?;

        let revealed = exercise.metadata.hints_revealed;
        if revealed >= exercise.metadata.solution_hints.len() {
            return Ok(None);
        }

        let hint = exercise.metadata.solution_hints[revealed].clone();
        exercise.metadata.hints_revealed = revealed + 1;
        exercise.metadata.updated_at = Local::now().to_rfc3339();
        write_metadata(&exercise.path, &exercise.metadata)?;

        Ok(Some(hint))
    }

    /// Move an exercise under `archived/` and mark it.
    pub fn archive(&self, id_or_path: &str) -> Result<PathBuf> {
        let exercise = self
            .get(id_or_path)
            .ok_or_else(|| anyhow!("Exercise not found: {id_or_path}"))?;

        let archive_dir = self.exercises_dir.join(ARCHIVE_DIR);
        std::fs::create_dir_all(&archive_dir)?;

        let dest = archive_dir.join(&exercise.id);
        std::fs::rename(&exercise.path, &dest)
            .with_context(|| format!("Failed to archive {}", exercise.path.display()))?;

        let mut metadata = exercise.metadata;
        metadata.status = ExerciseStatus::Archived;
        metadata.updated_at = Local::now().to_rfc3339();
        write_metadata(&dest, &metadata)?;

        Ok(dest)
    }

    pub fn delete(&self, id_or_path: &str) -> Result<()> {
        let exercise = self
            .get(id_or_path)
            .ok_or_else(|| anyhow!("Exercise not found: {id_or_path}"))?;
        std::fs::remove_dir_all(&exercise.path)
            .with_context(|| format!("Failed to delete {}", exercise.path.display()))
    }
}

fn load_exercise(path: &Path) -> Option<Exercise> {
    let metadata_path = path.join(METADATA_FILE);
    let text = std::fs::read_to_string(metadata_path).ok()?;
    let metadata: ExerciseMetadata = serde_json::from_str(&text).ok()?;

    Some(Exercise {
        id: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_path_buf(),
        metadata,
    })
}

fn write_metadata(path: &Path, metadata: &ExerciseMetadata) -> Result<()> {
    let text = serde_json::to_string_pretty(metadata)?;
    std::fs::write(path.join(METADATA_FILE), text)
        .with_context(|| format!("Failed to write metadata in {}", path.display()))
}

fn type_description(exercise_type: &str) -> &str {
    match exercise_type {
        "fill_in_blank" => "Complete the missing parts of the code",
        "bug_fix" => "Find and fix the bug(s) in the code",
        "implementation" => "Implement the function/class from scratch",
        "refactoring" => "Refactor the code to be cleaner/more efficient",
        "test_writing" => "Write tests for the provided implementation",
        other => other,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn render_readme(new: &NewExercise, exercises_dir: &Path) -> String {
    let objectives = new
        .learning_objectives
        .iter()
        .map(|o| format!("- {o}"))
        .collect::<Vec<_>>()
        .join("\n");
    let extension = extension_for_language(new.language);
    let dir_name = exercises_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!(
        "# Exercise: {topic}\n\
         \n\
         **Language:** {language}\n\
         **Type:** {type_desc}\n\
         **Difficulty:** {difficulty}\n\
         \n\
         ## Learning Objectives\n\
         \n\
         {objectives}\n\
         \n\
         ## Instructions\n\
         \n\
         {instructions}\n\
         \n\
         ## Getting Started\n\
         \n\
         1. Open the `starter{extension}` file\n\
         2. Read through the code and comments carefully\n\
         3. Complete the exercise according to the instructions above\n\
         4. When done, run `tutorctl exercise submit {dir_name}/{topic}` to get feedback\n\
         \n\
         ## Need Help?\n\
         \n\
         - Run `tutorctl exercise hint <path>` to get a hint\n\
         - Hints are revealed progressively - try to solve it first!\n",
        topic = new.topic,
        language = new.language,
        type_desc = type_description(new.exercise_type),
        difficulty = capitalize(new.difficulty),
        instructions = new.instructions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(topic: &str) -> NewExercise<'_> {
        NewExercise {
            topic,
            language: "Python",
            exercise_type: "bug_fix",
            difficulty: "intermediate",
            instructions: "Fix the off-by-one error without changing the signature.",
            starter_code: "def f(xs):\n    return xs[1:]\n",
            test_code: Some("assert f([1]) == [1]\n"),
            hints: vec!["Look at the slice".to_string(), "Start index".to_string()],
            learning_objectives: vec!["Understand slicing".to_string()],
        }
    }

    #[test]
    fn test_create_writes_all_files() {
        let dir = TempDir::new().unwrap();
        let store = ExerciseStore::new(dir.path().to_path_buf());

        let exercise = store.create(&sample("List Slicing")).unwrap();
        assert!(exercise.id.starts_with("list-slicing-"));
        assert!(exercise.path.join(".meta.json").exists());
        assert!(exercise.path.join("README.md").exists());
        assert!(exercise.path.join("starter.py").exists());
        assert!(exercise.path.join("test_exercise.py").exists());
        assert_eq!(exercise.metadata.status, ExerciseStatus::Pending);

        let readme = std::fs::read_to_string(exercise.path.join("README.md")).unwrap();
        assert!(readme.contains("# Exercise: List Slicing"));
        assert!(readme.contains("Find and fix the bug(s)"));
        assert!(readme.contains("- Understand slicing"));
    }

    #[test]
    fn test_get_and_starter_code() {
        let dir = TempDir::new().unwrap();
        let store = ExerciseStore::new(dir.path().to_path_buf());
        let created = store.create(&sample("slicing")).unwrap();

        let fetched = store.get(&created.id).unwrap();
        assert_eq!(fetched.metadata.topic, "slicing");
        assert_eq!(
            fetched.starter_code().unwrap(),
            "def f(xs):\n    return xs[1:]\n"
        );

        assert!(store.get("no-such-exercise").is_none());
    }

    #[test]
    fn test_status_transitions_persist() {
        let dir = TempDir::new().unwrap();
        let store = ExerciseStore::new(dir.path().to_path_buf());
        let created = store.create(&sample("topic")).unwrap();

        store
            .update_status(&created.id, ExerciseStatus::Submitted)
            .unwrap();
        assert_eq!(
            store.get(&created.id).unwrap().metadata.status,
            ExerciseStatus::Submitted
        );
    }

    #[test]
    fn test_hints_reveal_progressively() {
        let dir = TempDir::new().unwrap();
        let store = ExerciseStore::new(dir.path().to_path_buf());
        let created = store.create(&sample("topic")).unwrap();

        assert_eq!(
            store.next_hint(&created.id).unwrap().as_deref(),
            Some("Look at the slice")
        );
        assert_eq!(
            store.next_hint(&created.id).unwrap().as_deref(),
            Some("Start index")
        );
        assert_eq!(store.next_hint(&created.id).unwrap(), None);
        assert_eq!(store.get(&created.id).unwrap().metadata.hints_revealed, 2);
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        let store = ExerciseStore::new(dir.path().to_path_buf());
        let a = store.create(&sample("first topic")).unwrap();
        store.create(&sample("second topic")).unwrap();
        store.update_status(&a.id, ExerciseStatus::Reviewed).unwrap();

        assert_eq!(store.list(None).len(), 2);
        let reviewed = store.list(Some(ExerciseStatus::Reviewed));
        assert_eq!(reviewed.len(), 1);
        assert_eq!(reviewed[0].metadata.topic, "first topic");
    }

    #[test]
    fn test_archive_and_delete() {
        let dir = TempDir::new().unwrap();
        let store = ExerciseStore::new(dir.path().to_path_buf());
        let created = store.create(&sample("topic")).unwrap();

        let dest = store.archive(&created.id).unwrap();
        assert!(dest.starts_with(dir.path().join("archived")));
        assert!(!created.path.exists());

        let archived = load_exercise(&dest).unwrap();
        assert_eq!(archived.metadata.status, ExerciseStatus::Archived);

        let second = store.create(&sample("another")).unwrap();
        store.delete(&second.id).unwrap();
        assert!(store.get(&second.id).is_none());
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(extension_for_language("Rust"), ".rs");
        assert_eq!(extension_for_language("COBOL"), ".txt");
    }
}

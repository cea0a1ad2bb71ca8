//! Pipeline command construction.
//!
//! The production pipeline lives on a separate server and is driven through
//! a single shell command. This module builds that command string from
//! project parameters; submitting it is `narrata-pipeline`'s job.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Trial run versus full-book run of the remote pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Limited-scope trial run.
    Validation,
    /// Full-book run.
    Production,
}

impl Mode {
    /// The `--mode` flag value the pipeline expects.
    pub fn as_flag(&self) -> &'static str {
        match self {
            Mode::Validation => "validation",
            Mode::Production => "production",
        }
    }
}

/// Parameters embedded into the pipeline command.
#[derive(Debug, Clone)]
pub struct RunParams {
    pub epub_filename: String,
    pub user_id: String,
    pub project_id: DbId,
    pub author: String,
    pub title: String,
    pub voice: String,
    /// Pronunciation dictionary to apply, if the project has one.
    pub dictionary: Option<String>,
    /// Maximum number of chunks to process (validation runs cap this low).
    pub limit: u32,
    pub mode: Mode,
}

impl RunParams {
    /// Render the shell command the remote execution server will run.
    ///
    /// Every user-supplied value is single-quoted; the pipeline entrypoint
    /// parses its own flags, so argument order is part of the contract.
    pub fn to_command(&self) -> String {
        let mut cmd = format!(
            "python3 run_pipeline.py --epub {} --user-id {} --project-id {} --author {} --title {} --voice {}",
            shell_quote(&self.epub_filename),
            shell_quote(&self.user_id),
            self.project_id,
            shell_quote(&self.author),
            shell_quote(&self.title),
            shell_quote(&self.voice),
        );
        if let Some(dictionary) = &self.dictionary {
            cmd.push_str(" --dictionary ");
            cmd.push_str(&shell_quote(dictionary));
        }
        cmd.push_str(&format!(" --limit {} --mode {}", self.limit, self.mode.as_flag()));
        cmd
    }
}

/// Single-quote a value for POSIX shells.
///
/// Embedded single quotes are rendered as `'\''` (close, escaped quote,
/// reopen), which is the only escaping a single-quoted string needs.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> RunParams {
        RunParams {
            epub_filename: "moby-dick.epub".into(),
            user_id: "user-42".into(),
            project_id: 7,
            author: "Herman Melville".into(),
            title: "Moby Dick".into(),
            voice: "en-US-BrianNeural".into(),
            dictionary: None,
            limit: 5,
            mode: Mode::Validation,
        }
    }

    #[test]
    fn builds_expected_command() {
        assert_eq!(
            params().to_command(),
            "python3 run_pipeline.py --epub 'moby-dick.epub' --user-id 'user-42' \
             --project-id 7 --author 'Herman Melville' --title 'Moby Dick' \
             --voice 'en-US-BrianNeural' --limit 5 --mode validation"
        );
    }

    #[test]
    fn dictionary_flag_is_optional() {
        let mut p = params();
        assert!(!p.to_command().contains("--dictionary"));

        p.dictionary = Some("master-dict".into());
        assert!(p
            .to_command()
            .contains("--dictionary 'master-dict' --limit 5"));
    }

    #[test]
    fn production_mode_flag() {
        let mut p = params();
        p.mode = Mode::Production;
        p.limit = 0;
        assert!(p.to_command().ends_with("--limit 0 --mode production"));
    }

    #[test]
    fn quotes_embedded_single_quotes() {
        let mut p = params();
        p.title = "Don't Panic".into();
        assert!(p.to_command().contains(r"--title 'Don'\''t Panic'"));
    }
}

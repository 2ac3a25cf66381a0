use inquire::{Confirm, Editor, InquireError};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PromptError {
    #[error("Operation was canceled by the user")]
    #[diagnostic(code(sprout::prompt::canceled))]
    Canceled,

    #[error("Prompt failed: {source}")]
    #[diagnostic(
        code(sprout::prompt::inquire),
        help("Run in an interactive terminal, or pass --yes and an input file")
    )]
    Inquire {
        #[source]
        source: InquireError,
    },
}
impl From<InquireError> for PromptError {
    fn from(source: InquireError) -> Self {
        match source {
            InquireError::OperationCanceled | InquireError::OperationInterrupted => {
                PromptError::Canceled
            }
            other => PromptError::Inquire { source: other },
        }
    }
}

/// Asks whether the previewed structure should be written.
pub fn confirm_apply() -> Result<bool, PromptError> {
    let answer = Confirm::new("Create this structure?")
        .with_default(true)
        .with_help_message("Existing files and folders are left untouched")
        .prompt()?;

    Ok(answer)
}

/// Opens `$EDITOR` so a tree can be pasted in.
pub fn read_from_editor() -> Result<String, PromptError> {
    let text = Editor::new("Paste the folder tree:")
        .with_predefined_text("├── src/\n│   └── main.rs\n└── README.md\n")
        .with_help_message("Save and close the editor when done")
        .prompt()?;

    Ok(text)
}

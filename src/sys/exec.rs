use crate::menu::ExecCommand;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("empty command")]
    Empty,
    #[error(transparent)]
    Parse(#[from] shell_words::ParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Spawns a leaf item's command, detached from the menu process.
pub fn spawn_detached(cmd: &ExecCommand) -> Result<(), ExecError> {
    let words = shell_words::split(cmd.as_ref())?;
    let (program, args) = words.split_first().ok_or(ExecError::Empty)?;

    Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

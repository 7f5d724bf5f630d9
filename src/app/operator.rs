use std::str::FromStr;

/// Commands an operator can send to a running application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    /// Flip between running and stopped.
    ToggleRunning,
    /// Write the most recent capture to disk.
    SaveFrame,
    Stop,
}

impl FromStr for OperatorCommand {
    type Err = String;

    /// Keyboard bindings: `s` toggles, `j` saves, `q`/`esc` quits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" => Ok(OperatorCommand::ToggleRunning),
            "j" => Ok(OperatorCommand::SaveFrame),
            "q" | "esc" | "quit" => Ok(OperatorCommand::Stop),
            other => Err(format!("unknown command `{other}` (s: toggle, j: save frame, q: quit)")),
        }
    }
}

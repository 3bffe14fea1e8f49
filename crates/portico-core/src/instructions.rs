//! Instruction-printing helper.
//!
//! Projects may ship an `AI_INSTRUCTIONS.md` (preferred) or
//! `INSTRUCTIONS.md`; "printing" copies it to a timestamped snapshot next
//! to the original so the caller can open it without touching the source.

use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const INSTRUCTION_SOURCES: [&str; 2] = ["AI_INSTRUCTIONS.md", "INSTRUCTIONS.md"];

/// Copy the project's instructions file to `PRINTED_INSTRUCTIONS_<ts>.md`
/// and return the new path. `None` when no instructions file exists or the
/// copy fails.
pub fn print_instructions(project_path: &Path) -> Option<PathBuf> {
    let source = INSTRUCTION_SOURCES
        .iter()
        .map(|name| project_path.join(name))
        .find(|path| path.exists())?;

    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let target = project_path.join(format!("PRINTED_INSTRUCTIONS_{stamp}.md"));

    match std::fs::copy(&source, &target) {
        Ok(_) => {
            info!(
                target: "portico::archive",
                "Instructions printed to {}",
                target.display()
            );
            Some(target)
        }
        Err(e) => {
            warn!(target: "portico::archive", "Error printing instructions: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn copies_preferred_source() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("AI_INSTRUCTIONS.md"), "ai").unwrap();
        std::fs::write(temp.path().join("INSTRUCTIONS.md"), "plain").unwrap();

        let printed = print_instructions(temp.path()).unwrap();
        assert!(
            printed
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("PRINTED_INSTRUCTIONS_")
        );
        assert_eq!(std::fs::read_to_string(printed).unwrap(), "ai");
    }

    #[test]
    fn falls_back_to_plain_instructions() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("INSTRUCTIONS.md"), "plain").unwrap();

        let printed = print_instructions(temp.path()).unwrap();
        assert_eq!(std::fs::read_to_string(printed).unwrap(), "plain");
    }

    #[test]
    fn missing_instructions_yield_none() {
        let temp = TempDir::new().unwrap();
        assert_eq!(print_instructions(temp.path()), None);
    }
}

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::progress::ProgressReporter;
use crate::core::models::reaction::EMPTY_REACTION;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Failed to launch mapper '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O error while communicating with the mapper: {0}")]
    Io(#[from] io::Error),
    #[error("Mapper exited with {status}: {stderr}")]
    ExitStatus { status: String, stderr: String },
    #[error("Mapper returned {actual} reaction(s) for a batch of {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Mapper rejected the batch: {0}")]
    Rejected(String),
}

/// An external atom-mapping model.
///
/// A call maps a whole batch or fails as a whole; on success the output has
/// the same length and order as the input.
pub trait AtomMapper {
    fn map_batch(&self, reactions: &[String]) -> Result<Vec<String>, MappingError>;
}

fn checked_batch<M: AtomMapper + ?Sized>(
    mapper: &M,
    reactions: &[String],
) -> Result<Vec<String>, MappingError> {
    let mapped = mapper.map_batch(reactions)?;
    if mapped.len() != reactions.len() {
        return Err(MappingError::LengthMismatch {
            expected: reactions.len(),
            actual: mapped.len(),
        });
    }
    Ok(mapped)
}

/// Maps a chunk in one call, falling back to one call per reaction if the
/// batch fails. Reactions that still fail become the empty reaction `>>`.
pub fn map_reactions_with_error_handling<M: AtomMapper + ?Sized>(
    mapper: &M,
    reactions: &[String],
) -> Vec<String> {
    match checked_batch(mapper, reactions) {
        Ok(mapped) => return mapped,
        Err(e) => {
            warn!(
                "Error while mapping chunk of {} reactions. Mapping them individually.",
                reactions.len()
            );
            debug!("Batch failure: {}", e);
        }
    }

    reactions
        .iter()
        .map(|reaction| {
            match checked_batch(mapper, std::slice::from_ref(reaction)) {
                Ok(mut mapped) => mapped.pop().unwrap_or_else(|| EMPTY_REACTION.to_string()),
                Err(e) => {
                    info!("Reaction causing the error: {}; {}", reaction, e);
                    EMPTY_REACTION.to_string()
                }
            }
        })
        .collect()
}

/// Splits `reactions` into chunks of `batch_size` and maps each chunk with
/// [`map_reactions_with_error_handling`], reporting one step per reaction.
pub fn map_in_chunks<M: AtomMapper + ?Sized>(
    mapper: &M,
    reactions: &[String],
    batch_size: usize,
    reporter: &ProgressReporter,
) -> Vec<String> {
    let mut mapped = Vec::with_capacity(reactions.len());
    for chunk in reactions.chunks(batch_size.max(1)) {
        mapped.extend(map_reactions_with_error_handling(mapper, chunk));
        reporter.advance(chunk.len() as u64);
    }
    mapped
}

/// Runs an external program per batch: one reaction per line on stdin, one
/// mapped reaction per line on stdout.
#[derive(Debug, Clone)]
pub struct CommandMapper {
    program: String,
    args: Vec<String>,
}

impl CommandMapper {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl AtomMapper for CommandMapper {
    fn map_batch(&self, reactions: &[String]) -> Result<Vec<String>, MappingError> {
        if reactions.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(bad) = reactions.iter().find(|r| r.contains('\n')) {
            return Err(MappingError::Rejected(format!(
                "reaction contains a line break: {:?}",
                bad
            )));
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| MappingError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut payload = reactions.join("\n");
        payload.push('\n');
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || -> io::Result<()> { stdin.write_all(payload.as_bytes()) })
        });

        let output = child.wait_with_output()?;
        let written = match writer.map(thread::JoinHandle::join) {
            Some(Ok(result)) => result,
            Some(Err(_)) => {
                return Err(MappingError::Rejected(
                    "stdin writer thread panicked".to_string(),
                ));
            }
            None => Ok(()),
        };

        if !output.status.success() {
            return Err(MappingError::ExitStatus {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        let mapped: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        if mapped.len() != reactions.len() {
            return Err(MappingError::LengthMismatch {
                expected: reactions.len(),
                actual: mapped.len(),
            });
        }
        Ok(mapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Prefixes reactions with `mapped:`; rejects any batch containing a
    /// reaction listed in `poison`.
    struct FakeMapper {
        poison: Vec<&'static str>,
        calls: Mutex<Vec<usize>>,
    }

    impl FakeMapper {
        fn new(poison: Vec<&'static str>) -> Self {
            Self {
                poison,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl AtomMapper for FakeMapper {
        fn map_batch(&self, reactions: &[String]) -> Result<Vec<String>, MappingError> {
            self.calls.lock().unwrap().push(reactions.len());
            if reactions.iter().any(|r| self.poison.contains(&r.as_str())) {
                return Err(MappingError::Rejected("too many tokens".to_string()));
            }
            Ok(reactions.iter().map(|r| format!("mapped:{}", r)).collect())
        }
    }

    struct ShortMapper;

    impl AtomMapper for ShortMapper {
        fn map_batch(&self, reactions: &[String]) -> Result<Vec<String>, MappingError> {
            Ok(reactions.iter().skip(1).cloned().collect())
        }
    }

    fn batch(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn successful_batch_is_mapped_in_one_call() {
        let mapper = FakeMapper::new(vec![]);
        let out = map_reactions_with_error_handling(&mapper, &batch(&["A>>B", "C>>D"]));
        assert_eq!(out, vec!["mapped:A>>B", "mapped:C>>D"]);
        assert_eq!(*mapper.calls.lock().unwrap(), vec![2]);
    }

    #[test]
    fn failing_batch_falls_back_to_single_items() {
        let mapper = FakeMapper::new(vec!["bad"]);
        let out = map_reactions_with_error_handling(&mapper, &batch(&["A>>B", "bad", "C>>D"]));
        assert_eq!(out, vec!["mapped:A>>B", ">>", "mapped:C>>D"]);
        assert_eq!(*mapper.calls.lock().unwrap(), vec![3, 1, 1, 1]);
    }

    #[test]
    fn length_mismatch_counts_as_failure() {
        let out = map_reactions_with_error_handling(&ShortMapper, &batch(&["A>>B", "C>>D"]));
        assert_eq!(out, vec![">>", ">>"]);
    }

    #[test]
    fn chunks_are_mapped_independently() {
        let mapper = FakeMapper::new(vec!["bad"]);
        let reactions = batch(&["a", "b", "bad", "c", "d"]);
        let out = map_in_chunks(&mapper, &reactions, 2, &ProgressReporter::new());
        assert_eq!(out, vec!["mapped:a", "mapped:b", ">>", "mapped:c", "mapped:d"]);
        assert_eq!(*mapper.calls.lock().unwrap(), vec![2, 2, 1, 1, 1]);
    }

    #[test]
    fn command_mapper_with_empty_batch_does_not_spawn() {
        let mapper = CommandMapper::new("definitely-not-a-real-mapper-binary", vec![]);
        assert!(mapper.map_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn command_mapper_reports_missing_program() {
        let mapper = CommandMapper::new("definitely-not-a-real-mapper-binary", vec![]);
        let err = mapper.map_batch(&batch(&["C>>C"])).unwrap_err();
        assert!(matches!(err, MappingError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn command_mapper_round_trips_lines_through_program() {
        let mapper = CommandMapper::new("cat", vec![]);
        let out = mapper.map_batch(&batch(&["CC>>C", "O>>O"])).unwrap();
        assert_eq!(out, vec!["CC>>C", "O>>O"]);
    }

    #[cfg(unix)]
    #[test]
    fn command_mapper_fails_on_non_zero_exit() {
        let mapper = CommandMapper::new("sh", vec!["-c".to_string(), "cat >/dev/null; exit 3".to_string()]);
        let err = mapper.map_batch(&batch(&["C>>C"])).unwrap_err();
        assert!(matches!(err, MappingError::ExitStatus { .. }));
    }

    #[test]
    fn command_mapper_rejects_multiline_reactions() {
        let mapper = CommandMapper::new("cat", vec![]);
        let err = mapper.map_batch(&batch(&["C>>C\nO>>O"])).unwrap_err();
        assert!(matches!(err, MappingError::Rejected(_)));
    }
}

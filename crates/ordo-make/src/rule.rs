//! One target of a makefile and its build state.

use ordo_graph::Vertex;

use crate::error::MakeError;

/// A build time. Ages and the current time are plain integers.
pub type Time = i64;

/// The rule for one target: its commands, its age and whether the current
/// build invocation has brought it up to date.
///
/// Dependencies are not stored here; they are the successors of
/// [`Rule::vertex`] in the maker's dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    target: String,
    vertex: Vertex,
    commands: Vec<String>,
    time: Option<Time>,
    finished: bool,
}

impl Rule {
    /// A rule for `target` at `vertex` whose target currently has age
    /// `initial_time` (`None` when it does not exist).
    #[must_use]
    pub fn new(target: impl Into<String>, vertex: Vertex, initial_time: Option<Time>) -> Self {
        Self {
            target: target.into(),
            vertex,
            commands: Vec::new(),
            time: initial_time,
            finished: false,
        }
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub const fn vertex(&self) -> Vertex {
        self.vertex
    }

    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Age of the target, or `None` if it does not exist (yet).
    #[must_use]
    pub const fn time(&self) -> Option<Time> {
        self.time
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Append `commands`. An empty list is always accepted.
    ///
    /// # Errors
    ///
    /// [`MakeError::DuplicateCommands`] if both `commands` and the existing
    /// command set are non-empty. The rule is left unchanged.
    pub fn add_commands<I, S>(&mut self, commands: I) -> Result<(), MakeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut commands = commands.into_iter().map(Into::into).peekable();
        if commands.peek().is_none() {
            return Ok(());
        }
        if !self.commands.is_empty() {
            return Err(MakeError::DuplicateCommands {
                target: self.target.clone(),
            });
        }
        self.commands.extend(commands);
        Ok(())
    }

    /// True when the target is missing or strictly older than `current_time`.
    #[must_use]
    pub fn is_out_of_date(&self, current_time: Time) -> bool {
        self.time.is_none_or(|t| t < current_time)
    }

    pub(crate) const fn finish(&mut self, time: Option<Time>) {
        self.time = time;
        self.finished = true;
    }

    pub(crate) const fn unfinish(&mut self) {
        self.finished = false;
    }
}

//! The incremental build engine.
//!
//! # Overview
//!
//! A [`Maker`] owns a directed dependency graph whose vertices are labeled
//! with [`Rule`]s. Edge `(a, b)` means target `a` depends on target `b`.
//! Rules come into existence lazily: naming a target anywhere (as a rule, a
//! dependency, or a build goal) creates its vertex, with the target's age
//! taken from the [`Ages`] the maker was created with.
//!
//! # Algorithm
//!
//! [`Maker::build`] runs a depth-first traversal from the goal and rebuilds
//! each rule in post-order, so every dependency is finished before the
//! rules that need it. Rebuilding a rule:
//!
//! 1. checks its dependencies really are finished (only a cycle breaks this),
//! 2. if the target is missing or older than the current time, writes its
//!    commands to the output and stamps it with the current time,
//! 3. marks the rule finished.
//!
//! The traversal is kept between calls, so targets finished by one `build`
//! are not revisited by the next. [`Maker::reset`] starts a fresh
//! invocation; targets stamped by earlier builds are then up to date.

use std::collections::HashMap;
use std::io::{self, Write};

use ordo_graph::{DepthFirst, Graph, LabeledGraph, Vertex, Visitor};
use tracing::{debug, info, instrument};

use crate::config::MakeConfig;
use crate::diagnostics::Diagnostic;
use crate::error::MakeError;
use crate::parse::{Ages, Makefile};
use crate::rule::{Rule, Time};

/// What one build invocation did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Targets stamped with the current time, in rebuild order.
    pub rebuilt: Vec<String>,
    /// Commands written to the output, in order.
    pub commands: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    /// True when nothing needed rebuilding.
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        self.rebuilt.is_empty()
    }

    /// Append `other` to this report.
    pub fn merge(&mut self, other: Self) {
        self.rebuilt.extend(other.rebuilt);
        self.commands.extend(other.commands);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Dependency graph of rules plus the state of the current invocation.
#[derive(Debug)]
pub struct Maker {
    depends: LabeledGraph<Rule>,
    vertices: HashMap<String, Vertex>,
    ages: HashMap<String, Time>,
    current_time: Time,
    first_target: Option<String>,
    config: MakeConfig,
    traversal: DepthFirst,
}

impl Maker {
    #[must_use]
    pub fn new(ages: Ages) -> Self {
        Self::with_config(ages, MakeConfig::default())
    }

    #[must_use]
    pub fn with_config(ages: Ages, config: MakeConfig) -> Self {
        Self {
            depends: LabeledGraph::default(),
            vertices: HashMap::new(),
            ages: ages.ages,
            current_time: ages.current_time,
            first_target: None,
            config,
            traversal: DepthFirst::new(),
        }
    }

    #[must_use]
    pub const fn current_time(&self) -> Time {
        self.current_time
    }

    #[must_use]
    pub const fn config(&self) -> &MakeConfig {
        &self.config
    }

    /// The dependency graph.
    #[must_use]
    pub const fn graph(&self) -> &Graph {
        self.depends.graph()
    }

    /// The rule for `target`, if the target has been named.
    #[must_use]
    pub fn rule(&self, target: &str) -> Option<&Rule> {
        self.vertices
            .get(target)
            .and_then(|&v| self.depends.label(v))
    }

    /// Every known target, in vertex order.
    pub fn targets(&self) -> impl Iterator<Item = &str> + '_ {
        self.depends.labels().map(|(_, rule)| rule.target())
    }

    /// Add `target: dependencies` with `commands`, merging into the existing
    /// rule if `target` is already known. Dependencies that are not yet
    /// known get a placeholder rule with no commands.
    ///
    /// # Errors
    ///
    /// [`MakeError::DuplicateCommands`] if `commands` is non-empty and the
    /// rule already has commands. Dependency edges are added before the
    /// commands are checked.
    pub fn add_rule<D, C>(
        &mut self,
        target: &str,
        dependencies: D,
        commands: C,
    ) -> Result<Vertex, MakeError>
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        if self.first_target.is_none() {
            self.first_target = Some(target.to_string());
        }
        let v = self.ensure_rule(target);
        for dep in dependencies {
            let d = self.ensure_rule(dep.as_ref());
            self.depends.add_edge(v, d)?;
        }
        self.depends
            .label_mut(v)
            .ok_or(ordo_graph::GraphError::InvalidVertex(v))?
            .add_commands(commands)?;
        Ok(v)
    }

    /// Add every declaration of `makefile`, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first [`MakeError::DuplicateCommands`].
    pub fn load(&mut self, makefile: &Makefile) -> Result<(), MakeError> {
        for decl in &makefile.rules {
            self.add_rule(&decl.target, &decl.dependencies, decl.commands.iter().cloned())?;
        }
        debug!(rules = makefile.rules.len(), targets = self.vertices.len(), "loaded makefile");
        Ok(())
    }

    /// Bring `goal` up to date, writing the commands that do so to `out`,
    /// one per line. An unknown goal is added as a rule with no commands.
    ///
    /// # Errors
    ///
    /// [`MakeError::Io`] if writing to `out` fails. The failing rule and
    /// every rule after it are left unfinished, and the next `build` visits
    /// them again.
    #[instrument(skip(self, out))]
    pub fn build<W>(&mut self, goal: &str, out: &mut W) -> Result<BuildReport, MakeError>
    where
        W: Write + ?Sized,
    {
        let root = self.ensure_rule(goal);
        let (graph, rules) = self.depends.parts_mut();
        let mut rebuild = Rebuild {
            graph,
            rules,
            current_time: self.current_time,
            config: &self.config,
            out,
            report: BuildReport::default(),
            failed: None,
        };
        self.traversal.traverse(graph, root, &mut rebuild);

        if let Some(err) = rebuild.failed {
            // Finished rules stay finished; they are not out of date on a revisit.
            self.traversal.clear();
            return Err(err.into());
        }
        let report = rebuild.report;
        info!(
            rebuilt = report.rebuilt.len(),
            commands = report.commands.len(),
            diagnostics = report.diagnostics.len(),
            "build finished"
        );
        Ok(report)
    }

    /// Build the configured default target, or else the first target that
    /// was given a rule.
    ///
    /// # Errors
    ///
    /// [`MakeError::NoTargets`] if there is neither, otherwise as
    /// [`Maker::build`].
    pub fn build_default<W>(&mut self, out: &mut W) -> Result<BuildReport, MakeError>
    where
        W: Write + ?Sized,
    {
        let target = self
            .config
            .default_target
            .clone()
            .or_else(|| self.first_target.clone())
            .ok_or(MakeError::NoTargets)?;
        self.build(&target, out)
    }

    /// Forget which rules are finished so the next build is a new
    /// invocation. Target times are kept.
    pub fn reset(&mut self) {
        self.traversal.clear();
        let (_, rules) = self.depends.parts_mut();
        for rule in rules.values_mut() {
            rule.unfinish();
        }
    }

    fn ensure_rule(&mut self, target: &str) -> Vertex {
        if let Some(&v) = self.vertices.get(target) {
            return v;
        }
        let age = self.ages.get(target).copied();
        let v = self.depends.add_with(|v| Rule::new(target, v, age));
        self.vertices.insert(target.to_string(), v);
        debug!(rule = %target, vertex = v, ?age, "new rule");
        v
    }
}

// ---------------------------------------------------------------------------
// Rebuild visitor
// ---------------------------------------------------------------------------

struct Rebuild<'a, W: ?Sized> {
    graph: &'a Graph,
    rules: &'a mut HashMap<Vertex, Rule>,
    current_time: Time,
    config: &'a MakeConfig,
    out: &'a mut W,
    report: BuildReport,
    failed: Option<io::Error>,
}

impl<W: Write + ?Sized> Rebuild<'_, W> {
    fn diagnose(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit();
        self.report.diagnostics.push(diagnostic);
    }

    fn check_dependencies(&mut self, v: Vertex, target: &str) {
        let unfinished: Vec<String> = self
            .graph
            .successors(v)
            .filter_map(|d| self.rules.get(&d))
            .filter(|dep| !dep.is_finished())
            .map(|dep| dep.target().to_string())
            .collect();
        for dependency in unfinished {
            self.diagnose(Diagnostic::UnfinishedDependency {
                target: target.to_string(),
                dependency,
            });
        }
    }

    fn rebuild(&mut self, v: Vertex) -> io::Result<()> {
        let Some(rule) = self.rules.get(&v) else {
            return Ok(());
        };
        let target = rule.target().to_string();

        if self.config.check_dependencies {
            self.check_dependencies(v, &target);
        }

        let Some(rule) = self.rules.get_mut(&v) else {
            return Ok(());
        };
        if !rule.is_out_of_date(self.current_time) {
            let time = rule.time();
            rule.finish(time);
            return Ok(());
        }

        debug!(rule = %target, "rebuilding");
        if rule.commands().is_empty() && self.config.warn_missing_commands {
            self.diagnose(Diagnostic::MissingCommands {
                target: target.clone(),
            });
        }

        let Some(rule) = self.rules.get_mut(&v) else {
            return Ok(());
        };
        for command in rule.commands() {
            let line = if self.config.strip_command_indent {
                command.trim_start()
            } else {
                command.as_str()
            };
            writeln!(self.out, "{line}")?;
            self.report.commands.push(line.to_string());
        }
        rule.finish(Some(self.current_time));
        self.report.rebuilt.push(target);
        Ok(())
    }
}

impl<W: Write + ?Sized> Visitor for Rebuild<'_, W> {
    fn should_post_visit(&self, _v: Vertex) -> bool {
        true
    }

    fn post_visit(&mut self, v: Vertex) {
        if self.failed.is_some() {
            return;
        }
        if let Err(err) = self.rebuild(v) {
            self.failed = Some(err);
        }
    }
}

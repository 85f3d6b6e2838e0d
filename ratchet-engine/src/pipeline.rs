//! Run orchestration.
//!
//! `run`: validate config, honor the pause flag, execute the four checks,
//! read coverage, classify output, update pattern state and the scorecard,
//! optionally verify, then persist. Nothing is written until every check and
//! gate has finished.
//!
//! `verify`: resolve the effective verify config and evaluate its gates.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use ratchet_core::config::{CliOverrides, CommandConfig, RatchetConfig};
use ratchet_core::constants::DEFAULT_WAIVERS_FILE;
use ratchet_core::errors::{RatchetErrorCode, RunError};
use ratchet_core::events::{
    CheckCompletedEvent, CoverageFloorChangedEvent, ErrorEvent, EventDispatcher,
    PatternPromotedEvent, RatchetEventHandler, RunSkippedEvent, RunStartedEvent,
    VerificationCompleteEvent,
};
use ratchet_core::traits::{
    BranchSource, CommandOutput, CommandRunner, CoverageReader, CoverageSummary, FsCoverageReader,
    GitBranchSource, ShellRunner,
};

use crate::patterns::{PatternTracker, Promotion};
use crate::policy::{resolve_verify_config, EffectiveVerifyConfig, TaskIdSource};
use crate::scorecard::{
    derive_action_items, next_scorecard, ActionContext, CheckRuns, CoverageQualification,
    Metrics, MetricsClassifier, RegexClassifier, Scorecard, Scorer,
};
use crate::store::StateStore;
use crate::verify::{
    load_waivers, GateEvaluator, InterpolationContext, TaskIdInputs, TaskIdMatcher,
    VerificationReport, Waiver,
};

/// Per-invocation options.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Task id supplied on the command line.
    pub task_id: Option<String>,
}

/// Everything a completed scoring run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub scorecard: Scorecard,
    pub metrics: Metrics,
    pub coverage: CoverageSummary,
    /// Exit code of each check, by command name.
    pub check_exit_codes: BTreeMap<String, i32>,
    pub pattern_matches: BTreeMap<String, u64>,
    pub promotions: Vec<Promotion>,
    /// Pattern rules that failed to compile and were skipped.
    pub skipped_patterns: Vec<String>,
    pub verification: Option<VerificationReport>,
}

impl RunReport {
    /// Non-zero only when verification ran and failed. Failing checks lower
    /// the score but do not fail the run.
    pub fn exit_code(&self) -> i32 {
        self.verification
            .as_ref()
            .map_or(0, VerificationReport::exit_code)
    }
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(Box<RunReport>),
    /// The pause flag was present; nothing ran and nothing was written.
    Skipped { reason: String },
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Completed(report) => report.exit_code(),
            Self::Skipped { .. } => 0,
        }
    }
}

/// Verify config, task id matcher, and waivers, all resolved before any
/// command runs.
struct VerifyPlan {
    effective: EffectiveVerifyConfig,
    matcher: TaskIdMatcher,
    waivers: Vec<Waiver>,
}

/// The scoring and verification engine for one project root.
pub struct Engine {
    root: PathBuf,
    config: RatchetConfig,
    runner: Arc<dyn CommandRunner>,
    coverage: Arc<dyn CoverageReader>,
    branches: Arc<dyn BranchSource>,
    classifier: Arc<dyn MetricsClassifier>,
    events: EventDispatcher,
    clock: Option<DateTime<Utc>>,
}

impl Engine {
    /// Engine with the production collaborators: shell runner, filesystem
    /// coverage reader, git branch source, regex classifier.
    pub fn new(root: impl Into<PathBuf>, config: RatchetConfig) -> Self {
        Self {
            root: root.into(),
            config,
            runner: Arc::new(ShellRunner),
            coverage: Arc::new(FsCoverageReader),
            branches: Arc::new(GitBranchSource),
            classifier: Arc::new(RegexClassifier::default()),
            events: EventDispatcher::new(),
            clock: None,
        }
    }

    /// Load `ratchet.toml` from `root` with env and CLI overrides applied.
    pub fn load(root: impl Into<PathBuf>, cli: Option<&CliOverrides>) -> Result<Self, RunError> {
        let root = root.into();
        let config = RatchetConfig::load(&root, cli)?;
        Ok(Self::new(root, config))
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_coverage_reader(mut self, reader: Arc<dyn CoverageReader>) -> Self {
        self.coverage = reader;
        self
    }

    pub fn with_branch_source(mut self, branches: Arc<dyn BranchSource>) -> Self {
        self.branches = branches;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn MetricsClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn RatchetEventHandler>) -> Self {
        self.events.register(handler);
        self
    }

    /// Pin the clock used for timestamps and waiver expiry.
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &RatchetConfig {
        &self.config
    }

    pub fn store(&self) -> StateStore {
        StateStore::new(self.config.quality_dir_path(&self.root))
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.unwrap_or_else(Utc::now)
    }

    /// Execute a full scoring run.
    pub fn run(&self, options: &RunOptions) -> Result<RunOutcome, RunError> {
        let _span = tracing::info_span!("ratchet::run", root = %self.root.display()).entered();
        self.run_inner(options).inspect_err(|e| self.report_error(e))
    }

    /// Evaluate the verify gates on their own and persist the artifact.
    ///
    /// Runs regardless of `verify.enabled`, which only controls whether
    /// `run` includes verification.
    pub fn verify(&self, options: &RunOptions) -> Result<VerificationReport, RunError> {
        let _span = tracing::info_span!("ratchet::verify", root = %self.root.display()).entered();
        self.verify_inner(options)
            .inspect_err(|e| self.report_error(e))
    }

    fn verify_inner(&self, options: &RunOptions) -> Result<VerificationReport, RunError> {
        RatchetConfig::validate(&self.config)?;
        let effective = resolve_verify_config(&self.root, &self.config)?;
        let plan = self.plan_verification(effective)?;
        let report = self.execute_verification(plan, options, self.now());
        self.store().save_verification(&report)?;
        Ok(report)
    }

    fn run_inner(&self, options: &RunOptions) -> Result<RunOutcome, RunError> {
        RatchetConfig::validate(&self.config)?;

        let store = self.store();
        if store.is_paused() {
            let reason = format!("pause flag present in {}", store.dir().display());
            tracing::info!(root = %self.root.display(), %reason, "run skipped");
            self.events.emit_run_skipped(&RunSkippedEvent {
                root: self.root.clone(),
                reason: reason.clone(),
            });
            return Ok(RunOutcome::Skipped { reason });
        }

        let effective = resolve_verify_config(&self.root, &self.config)?;
        let plan = if effective.config.enabled {
            Some(self.plan_verification(effective)?)
        } else {
            tracing::debug!("verification disabled");
            None
        };
        let previous_scorecard = store.load_scorecard()?;
        let previous_patterns = store.load_patterns()?;

        self.events.emit_run_started(&RunStartedEvent {
            root: self.root.clone(),
            check_count: CommandConfig::NAMES.len(),
        });
        tracing::info!(root = %self.root.display(), "run started");

        let runs = self.run_checks()?;
        let now = self.now();

        let coverage = self.coverage.read(
            &self.root,
            &self.config.package_dirs,
            self.config.effective_coverage_summary(),
        );
        let qualification = CoverageQualification {
            test_exit_code: runs.test.exit_code,
            packages_with_summary: coverage.packages_with_summary,
            expected_packages: self.config.effective_expected_packages(),
        };
        if !coverage.missing.is_empty() {
            tracing::warn!(missing = ?coverage.missing, "coverage summary missing for some packages");
        }

        let metrics = self
            .classifier
            .classify(&runs)
            .into_metrics(&runs, coverage.average);

        let tracker = PatternTracker::from_config(&self.config.patterns);
        let observation = tracker.observe(&previous_patterns, &runs.combined_output(), now);

        let scorer = Scorer::new(self.config.weights.resolve());
        let mut scorecard = next_scorecard(
            &previous_scorecard,
            &scorer,
            &metrics,
            qualification.is_qualified(),
            now,
        );
        scorecard.action_items = derive_action_items(&ActionContext {
            metrics: &metrics,
            previous: &previous_scorecard,
            qualification,
            promotions: &observation.promotions,
        });

        let verification = plan.map(|plan| self.execute_verification(plan, options, now));

        store.save_scorecard(&scorecard)?;
        store.save_patterns(&observation.state)?;
        if let Some(report) = &verification {
            store.save_verification(report)?;
        }

        for promotion in &observation.promotions {
            self.events.emit_pattern_promoted(&PatternPromotedEvent {
                pattern: promotion.pattern.clone(),
                count: promotion.count,
                from: promotion.from.to_string(),
                to: promotion.to.to_string(),
            });
        }
        if scorecard.coverage_floor != previous_scorecard.coverage_floor {
            self.events.emit_coverage_floor_changed(&CoverageFloorChangedEvent {
                previous: previous_scorecard.coverage_floor,
                current: scorecard.coverage_floor,
                coverage: scorecard.coverage,
            });
        }

        tracing::info!(
            overall = scorecard.overall,
            coverage = scorecard.coverage,
            coverage_floor = scorecard.coverage_floor,
            action_items = scorecard.action_items.len(),
            "run complete"
        );

        let check_exit_codes = [
            ("typecheck", &runs.typecheck),
            ("lint", &runs.lint),
            ("test", &runs.test),
            ("build", &runs.build),
        ]
        .into_iter()
        .map(|(name, out)| (name.to_string(), out.exit_code))
        .collect();

        Ok(RunOutcome::Completed(Box::new(RunReport {
            scorecard,
            metrics,
            coverage,
            check_exit_codes,
            pattern_matches: observation.matches,
            promotions: observation.promotions,
            skipped_patterns: observation.skipped,
            verification,
        })))
    }

    fn run_checks(&self) -> Result<CheckRuns, RunError> {
        Ok(CheckRuns {
            typecheck: self.run_check("typecheck")?,
            lint: self.run_check("lint")?,
            test: self.run_check("test")?,
            build: self.run_check("build")?,
        })
    }

    fn run_check(&self, name: &str) -> Result<CommandOutput, RunError> {
        let command = self.config.commands.require(name)?;
        let output = self
            .runner
            .run(&self.root, command)
            .map_err(|e| RunError::Command {
                command: command.to_string(),
                message: e.to_string(),
            })?;
        tracing::info!(
            check = name,
            exit_code = output.exit_code,
            duration_ms = output.duration_ms,
            "check completed"
        );
        self.events.emit_check_completed(&CheckCompletedEvent {
            name: name.to_string(),
            exit_code: output.exit_code,
            duration_ms: output.duration_ms,
        });
        Ok(output)
    }

    /// Compile the task id pattern and load the waivers that go with an
    /// effective verify config.
    fn plan_verification(&self, effective: EffectiveVerifyConfig) -> Result<VerifyPlan, RunError> {
        let matcher = TaskIdMatcher::new(&effective.config.task_id_pattern)?;
        let waivers_path = match &effective.config.waivers_file {
            Some(file) => self.root.join(file),
            None => self
                .config
                .quality_dir_path(&self.root)
                .join(DEFAULT_WAIVERS_FILE),
        };
        let waivers = load_waivers(&waivers_path)?;
        Ok(VerifyPlan {
            effective,
            matcher,
            waivers,
        })
    }

    fn execute_verification(
        &self,
        plan: VerifyPlan,
        options: &RunOptions,
        now: DateTime<Utc>,
    ) -> VerificationReport {
        let VerifyPlan {
            effective,
            matcher,
            waivers,
        } = plan;
        let config = &effective.config;

        let inputs = self.task_id_inputs(options, &config.task_id_sources, &config.task_id_env);
        let task_ids = matcher.discover(&config.task_id_sources, &inputs);
        tracing::info!(task_ids = ?task_ids, gates = config.gates.len(), "verification started");

        let context = InterpolationContext::new(
            &self.root.display().to_string(),
            self.config.effective_quality_dir(),
            &effective.commands,
            &task_ids,
        );
        let evaluator = GateEvaluator::new(
            &self.root,
            self.runner.as_ref(),
            context,
            &task_ids,
            &waivers,
            now,
        )
        .with_events(&self.events);
        let results = evaluator.evaluate_all(&config.gates);

        let report = VerificationReport::from_results(
            now,
            task_ids,
            effective.packs.clone(),
            results,
            config.require_task_id,
        );

        for problem in &report.problems {
            tracing::warn!(%problem, "verification problem");
        }
        tracing::info!(
            passed = report.passed,
            total = report.gate_counts.total,
            failed = report.gate_counts.failed,
            waived = report.gate_counts.waived,
            "verification complete"
        );
        self.events.emit_verification_complete(&VerificationCompleteEvent {
            passed: report.passed,
            total: report.gate_counts.total,
            failed: report.gate_counts.failed,
            waived: report.gate_counts.waived,
        });
        report
    }

    fn task_id_inputs(
        &self,
        options: &RunOptions,
        sources: &[TaskIdSource],
        env_var: &str,
    ) -> TaskIdInputs {
        let non_empty = |s: String| (!s.trim().is_empty()).then_some(s);
        TaskIdInputs {
            cli: options.task_id.clone().and_then(non_empty),
            env: std::env::var(env_var).ok().and_then(non_empty),
            branch: if sources.contains(&TaskIdSource::Branch) {
                self.branches.current_branch(&self.root)
            } else {
                None
            },
        }
    }

    fn report_error(&self, error: &RunError) {
        tracing::error!(error = %error, code = error.error_code(), "run failed");
        self.events.emit_error(&ErrorEvent {
            message: error.to_string(),
            error_code: error.error_code().to_string(),
        });
    }
}

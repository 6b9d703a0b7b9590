//! Week validation and repair escalation.
//!
//! Evaluates a finished week in one or two scenarios (with and without
//! an optional 6th-day recovery workout) against phase-aware tolerance
//! thresholds, and escalates to the auto-fix path when every scenario
//! fails. Terminal outcomes: an accepted plan with its validation
//! report, or a [`ValidationFailure`] carrying every scenario's numbers.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::autofix::{attempt_auto_fix, FixLog};
use super::types::{Phase, PlannedWorkout, TrainingDaySlot, WeekPlan, Workout, WorkoutType};
use crate::metrics::TssCalculator;

/// Non-rest slot count that makes a recovery workout optional.
pub const OPTIONAL_RECOVERY_SLOT_COUNT: usize = 6;

/// Warn/error tolerances for weekly time and TSS deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceThresholds {
    /// Time deviation fraction that produces a warning
    pub time_warn_pct: f64,
    /// Time deviation fraction that fails the scenario
    pub time_error_pct: f64,
    /// TSS deviation fraction that produces a warning
    pub tss_warn_pct: f64,
    /// TSS deviation fraction that fails the scenario
    pub tss_error_pct: f64,
}

impl ToleranceThresholds {
    /// Thresholds for a phase. Recovery and taper weeks are tighter:
    /// overshooting an unload week defeats its purpose.
    pub fn for_phase(phase: Phase) -> Self {
        if phase.is_low_load() {
            Self {
                time_warn_pct: 0.08,
                time_error_pct: 0.15,
                tss_warn_pct: 0.12,
                tss_error_pct: 0.20,
            }
        } else {
            Self {
                time_warn_pct: 0.10,
                time_error_pct: 0.20,
                tss_warn_pct: 0.15,
                tss_error_pct: 0.25,
            }
        }
    }
}

/// Totals for one way of counting the week.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeekMetrics {
    /// Sum of workout durations in hours
    pub total_hours: f64,
    /// TSS from the injected calculator
    pub actual_tss: f64,
}

/// Compute week totals, optionally excluding one workout by index.
pub fn calculate_week_metrics(
    workouts: &[PlannedWorkout],
    ftp: u16,
    tss: &dyn TssCalculator,
    exclude: Option<usize>,
) -> WeekMetrics {
    let included: Vec<Workout> = workouts
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != exclude)
        .map(|(_, p)| p.workout.clone())
        .collect();

    let total_minutes: f64 = included.iter().map(|w| w.base_duration_min).sum();

    WeekMetrics {
        total_hours: total_minutes / 60.0,
        actual_tss: tss.tss_for(&included, ftp),
    }
}

/// Find the workout a second scenario may exclude.
///
/// Returns the index and weekday of the first recovery-typed workout,
/// but only when the week has exactly six non-rest slots and at least
/// one of them is a recovery slot. Any other shape returns `None`.
pub fn detect_optional_recovery(
    workouts: &[PlannedWorkout],
    slots: &[TrainingDaySlot],
) -> Option<(usize, Weekday)> {
    let non_rest = slots.iter().filter(|s| !s.workout_type.is_rest()).count();
    if non_rest != OPTIONAL_RECOVERY_SLOT_COUNT {
        return None;
    }
    if !slots
        .iter()
        .any(|s| s.workout_type == WorkoutType::Recovery)
    {
        return None;
    }

    workouts
        .iter()
        .position(|p| p.workout.workout_type == WorkoutType::Recovery)
        .map(|i| (i, workouts[i].weekday))
}

/// One way of computing the week's totals for validation. Ephemeral.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationScenario {
    /// Scenario label
    pub name: String,
    /// Total hours counted in this scenario
    pub total_hours: f64,
    /// TSS counted in this scenario
    pub actual_tss: f64,
    /// Deviations above the warn threshold
    pub warnings: Vec<String>,
    /// Deviations above the error threshold
    pub errors: Vec<String>,
}

/// Which scenario the accepted week was validated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioUsed {
    /// Every workout counted
    FullWeek,
    /// The optional recovery workout excluded
    WithoutRecovery,
    /// The week passed only after auto-fix
    AutoFixed,
}

impl ScenarioUsed {
    /// Get the scenario label.
    pub fn label(&self) -> &'static str {
        match self {
            ScenarioUsed::FullWeek => "full_week",
            ScenarioUsed::WithoutRecovery => "without_recovery",
            ScenarioUsed::AutoFixed => "auto_fixed",
        }
    }
}

impl std::fmt::Display for ScenarioUsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Numeric diagnostics of one failed scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDiagnostics {
    /// Scenario label
    pub name: String,
    /// Prescribed hours
    pub target_hours: f64,
    /// Counted hours
    pub actual_hours: f64,
    /// Signed hour deviation as a percentage of the target
    pub hours_deviation_pct: f64,
    /// Time error threshold that applied, as a percentage
    pub time_error_limit_pct: f64,
    /// Prescribed TSS, if one was given
    pub target_tss: Option<f64>,
    /// Counted TSS
    pub actual_tss: f64,
    /// Signed TSS deviation as a percentage of the target
    pub tss_deviation_pct: Option<f64>,
    /// TSS error threshold that applied, as a percentage
    pub tss_error_limit_pct: f64,
    /// Deviations above the error threshold
    pub errors: Vec<String>,
    /// Deviations above the warn threshold
    pub warnings: Vec<String>,
}

impl std::fmt::Display for ScenarioDiagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.errors.is_empty() {
            write!(f, "{}: within tolerance", self.name)
        } else {
            write!(f, "{}: {}", self.name, self.errors.join(", "))
        }
    }
}

fn render_failure(
    scenarios: &[ScenarioDiagnostics],
    hints: &[String],
    auto_fix_note: &Option<String>,
) -> String {
    let mut parts: Vec<String> = scenarios.iter().map(ToString::to_string).collect();
    if let Some(note) = auto_fix_note {
        parts.push(note.clone());
    }
    if !hints.is_empty() {
        parts.push(format!("hints: {}", hints.join("; ")));
    }
    parts.join("; ")
}

/// No scenario, including any auto-fixed one, met tolerance.
///
/// Fatal for the week. Carries every scenario's numbers so the caller
/// can decide how to regenerate the week; the engine never retries.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("week failed validation: {}", render_failure(.scenarios, .hints, .auto_fix_note))]
pub struct ValidationFailure {
    /// Diagnostics for every scenario that was evaluated
    pub scenarios: Vec<ScenarioDiagnostics>,
    /// Actionable suggestions derived from the deviation direction
    pub hints: Vec<String>,
    /// Outcome of the auto-fix attempt, when one ran
    pub auto_fix_note: Option<String>,
}

/// Validation outcome attached to an accepted week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Scenario the week passed under
    pub scenario_used: ScenarioUsed,
    /// Whether the auto-fix path modified the week
    pub auto_fixed: bool,
    /// Hours counted by the chosen scenario
    pub actual_hours: f64,
    /// TSS counted by the chosen scenario
    pub actual_tss: f64,
    /// Warnings from the chosen scenario
    pub warnings: Vec<String>,
    /// What auto-fix changed, when it ran
    pub fix_log: Option<FixLog>,
}

/// Validates a finished week, escalating to auto-fix when configured.
pub struct WeekValidator {
    auto_fix: bool,
}

impl WeekValidator {
    /// Create a validator with auto-fix enabled.
    pub fn new() -> Self {
        Self { auto_fix: true }
    }

    /// Create a validator with auto-fix explicitly on or off.
    pub fn with_auto_fix(auto_fix: bool) -> Self {
        Self { auto_fix }
    }

    /// Validate the week.
    ///
    /// The input plan is never modified; acceptance returns an adjusted
    /// copy (optional flag set, or auto-fixed workouts substituted).
    pub fn validate(
        &self,
        plan: &WeekPlan,
        slots: &[TrainingDaySlot],
        ftp: u16,
        tss: &dyn TssCalculator,
    ) -> Result<(WeekPlan, ValidationReport), ValidationFailure> {
        let thresholds = ToleranceThresholds::for_phase(plan.phase);

        let scenario_a = self.evaluate(
            ScenarioUsed::FullWeek,
            &plan.workouts,
            None,
            plan,
            &thresholds,
            ftp,
            tss,
        );
        tracing::debug!(
            "scenario {}: {:.2}h, {:.0} TSS, {} error(s)",
            scenario_a.name,
            scenario_a.total_hours,
            scenario_a.actual_tss,
            scenario_a.errors.len()
        );

        if scenario_a.errors.is_empty() {
            let report = ValidationReport {
                scenario_used: ScenarioUsed::FullWeek,
                auto_fixed: false,
                actual_hours: scenario_a.total_hours,
                actual_tss: scenario_a.actual_tss,
                warnings: scenario_a.warnings,
                fix_log: None,
            };
            return Ok((plan.clone(), report));
        }

        let optional = detect_optional_recovery(&plan.workouts, slots);
        let scenario_b = optional.map(|(index, _)| {
            self.evaluate(
                ScenarioUsed::WithoutRecovery,
                &plan.workouts,
                Some(index),
                plan,
                &thresholds,
                ftp,
                tss,
            )
        });

        if let (Some((index, weekday)), Some(scenario)) = (optional, scenario_b.as_ref()) {
            if scenario.errors.is_empty() {
                tracing::info!(
                    "week {} accepted without the optional recovery workout on {}",
                    plan.week_number,
                    weekday
                );
                let mut accepted = plan.clone();
                accepted.workouts[index].optional = true;

                let report = ValidationReport {
                    scenario_used: ScenarioUsed::WithoutRecovery,
                    auto_fixed: false,
                    actual_hours: scenario.total_hours,
                    actual_tss: scenario.actual_tss,
                    warnings: scenario.warnings.clone(),
                    fix_log: None,
                };
                return Ok((accepted, report));
            }
        }

        // Every scenario failed; try the repair path.
        let mut diagnostics = vec![self.diagnostics(&scenario_a, plan, &thresholds)];
        if let Some(scenario) = &scenario_b {
            diagnostics.push(self.diagnostics(scenario, plan, &thresholds));
        }

        let mut auto_fix_note = None;
        if self.auto_fix {
            match attempt_auto_fix(&plan.workouts, Some(plan.target_hours)) {
                Ok(fix) => {
                    let scenario_fixed = self.evaluate(
                        ScenarioUsed::AutoFixed,
                        &fix.workouts,
                        None,
                        plan,
                        &thresholds,
                        ftp,
                        tss,
                    );

                    if scenario_fixed.errors.is_empty() {
                        let mut accepted = plan.clone();
                        accepted.workouts = fix.workouts;

                        let mut warnings = scenario_fixed.warnings;
                        warnings.push(fix.log.summary());

                        let report = ValidationReport {
                            scenario_used: ScenarioUsed::AutoFixed,
                            auto_fixed: true,
                            actual_hours: scenario_fixed.total_hours,
                            actual_tss: scenario_fixed.actual_tss,
                            warnings,
                            fix_log: Some(fix.log),
                        };
                        return Ok((accepted, report));
                    }

                    diagnostics.push(self.diagnostics(&scenario_fixed, plan, &thresholds));
                    auto_fix_note = Some(format!(
                        "auto-fix ran ({}) but the week still failed validation",
                        fix.log.summary()
                    ));
                }
                Err(err) => {
                    auto_fix_note = Some(err.to_string());
                }
            }
        }

        Err(ValidationFailure {
            hints: self.hints(&scenario_a, plan),
            scenarios: diagnostics,
            auto_fix_note,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn evaluate(
        &self,
        name: ScenarioUsed,
        workouts: &[PlannedWorkout],
        exclude: Option<usize>,
        plan: &WeekPlan,
        thresholds: &ToleranceThresholds,
        ftp: u16,
        tss: &dyn TssCalculator,
    ) -> ValidationScenario {
        let metrics = calculate_week_metrics(workouts, ftp, tss, exclude);
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        if plan.target_hours > 0.0 {
            let deviation = (metrics.total_hours - plan.target_hours) / plan.target_hours;
            let direction = if deviation >= 0.0 { "over" } else { "under" };
            if deviation.abs() > thresholds.time_error_pct {
                errors.push(format!(
                    "time {:.2}h vs {:.2}h target ({:.1}% {direction}, limit {:.0}%)",
                    metrics.total_hours,
                    plan.target_hours,
                    deviation.abs() * 100.0,
                    thresholds.time_error_pct * 100.0
                ));
            } else if deviation.abs() > thresholds.time_warn_pct {
                warnings.push(format!(
                    "time {:.2}h vs {:.2}h target ({:.1}% {direction})",
                    metrics.total_hours,
                    plan.target_hours,
                    deviation.abs() * 100.0
                ));
            }
        }

        if let Some(target_tss) = plan.target_tss.filter(|t| *t > 0.0) {
            let deviation = (metrics.actual_tss - target_tss) / target_tss;
            let direction = if deviation >= 0.0 { "over" } else { "under" };
            if deviation.abs() > thresholds.tss_error_pct {
                errors.push(format!(
                    "TSS {:.0} vs {:.0} target ({:.1}% {direction}, limit {:.0}%)",
                    metrics.actual_tss,
                    target_tss,
                    deviation.abs() * 100.0,
                    thresholds.tss_error_pct * 100.0
                ));
            } else if deviation.abs() > thresholds.tss_warn_pct {
                warnings.push(format!(
                    "TSS {:.0} vs {:.0} target ({:.1}% {direction})",
                    metrics.actual_tss,
                    target_tss,
                    deviation.abs() * 100.0
                ));
            }
        }

        ValidationScenario {
            name: name.label().to_string(),
            total_hours: metrics.total_hours,
            actual_tss: metrics.actual_tss,
            warnings,
            errors,
        }
    }

    fn diagnostics(
        &self,
        scenario: &ValidationScenario,
        plan: &WeekPlan,
        thresholds: &ToleranceThresholds,
    ) -> ScenarioDiagnostics {
        let hours_deviation_pct = if plan.target_hours > 0.0 {
            (scenario.total_hours - plan.target_hours) / plan.target_hours * 100.0
        } else {
            0.0
        };
        let tss_deviation_pct = plan
            .target_tss
            .filter(|t| *t > 0.0)
            .map(|t| (scenario.actual_tss - t) / t * 100.0);

        ScenarioDiagnostics {
            name: scenario.name.clone(),
            target_hours: plan.target_hours,
            actual_hours: scenario.total_hours,
            hours_deviation_pct,
            time_error_limit_pct: thresholds.time_error_pct * 100.0,
            target_tss: plan.target_tss,
            actual_tss: scenario.actual_tss,
            tss_deviation_pct,
            tss_error_limit_pct: thresholds.tss_error_pct * 100.0,
            errors: scenario.errors.clone(),
            warnings: scenario.warnings.clone(),
        }
    }

    fn hints(&self, scenario_a: &ValidationScenario, plan: &WeekPlan) -> Vec<String> {
        let mut hints = Vec::new();
        if plan.target_hours > 0.0 {
            if scenario_a.total_hours > plan.target_hours {
                hints.push("shorten the main endurance segment or drop a session".to_string());
            } else {
                hints.push(
                    "extend an endurance ride or add warmup/cooldown time".to_string(),
                );
            }
        }
        if plan.target_tss.is_some() {
            hints.push(
                "adjust workout intensity to move TSS independently of hours".to_string(),
            );
        }
        hints
    }
}

impl Default for WeekValidator {
    fn default() -> Self {
        Self::new()
    }
}

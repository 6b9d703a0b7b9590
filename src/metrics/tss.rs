//! Training Stress Score estimation.
//!
//! The engine treats TSS computation as an injected collaborator; the
//! validator only sees the [`TssCalculator`] trait. The bundled
//! implementation estimates average-power TSS from each workout's
//! segment power bands: `TSS = duration_hours × IF² × 100`.

use crate::planner::types::{Segment, Workout};

/// Computes the Training Stress Score of a set of workouts.
pub trait TssCalculator {
    /// Total TSS for `workouts` at the given FTP.
    fn tss_for(&self, workouts: &[Workout], ftp: u16) -> f64;
}

/// Average-power TSS estimator over segment power bands.
pub struct SegmentTssCalculator;

impl SegmentTssCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate TSS for a single workout.
    pub fn workout_tss(&self, workout: &Workout, ftp: u16) -> f64 {
        if ftp == 0 {
            return 0.0;
        }

        let mut weighted_power = 0.0f64;
        let mut total_minutes = 0.0f64;

        for segment in &workout.segments {
            match segment {
                Segment::Interval {
                    sets,
                    work,
                    recovery,
                } => {
                    let sets = f64::from(*sets);
                    weighted_power += watts(ftp, work.mid_power_pct()) * work.duration_min * sets;
                    weighted_power +=
                        watts(ftp, recovery.mid_power_pct()) * recovery.duration_min * sets;
                    total_minutes += sets * (work.duration_min + recovery.duration_min);
                }
                flat => {
                    if let Some(effort) = flat.effort() {
                        weighted_power += watts(ftp, effort.mid_power_pct()) * effort.duration_min;
                        total_minutes += effort.duration_min;
                    }
                }
            }
        }

        if total_minutes <= 0.0 {
            return 0.0;
        }

        let avg_power = weighted_power / total_minutes;
        let intensity_factor = avg_power / f64::from(ftp);
        let duration_hours = total_minutes / 60.0;
        duration_hours * intensity_factor * intensity_factor * 100.0
    }
}

impl TssCalculator for SegmentTssCalculator {
    fn tss_for(&self, workouts: &[Workout], ftp: u16) -> f64 {
        workouts.iter().map(|w| self.workout_tss(w, ftp)).sum()
    }
}

impl Default for SegmentTssCalculator {
    fn default() -> Self {
        Self::new()
    }
}

fn watts(ftp: u16, pct: f64) -> f64 {
    f64::from(ftp) * pct / 100.0
}

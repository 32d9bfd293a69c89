//! Built-in metric limits and their overrides.
//!
//! Every limit is a warn/error pair. The direction is the evaluator's
//! business: most metrics are maxima, the comment ratio and the
//! maintainability index are minima, and the same `Bound` shape serves
//! both. Defaults live here; `phlint.toml` overrides them per metric
//! under `[thresholds.classes]`, `[thresholds.routines]` and
//! `[thresholds.files]`, leaving everything unnamed at its default.

use serde::Deserialize;

use crate::issue::Severity;

/// Warn/error pair for one metric.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Bound {
    pub warn: f64,
    pub error: f64,
}

impl Bound {
    pub const fn new(warn: f64, error: f64) -> Self {
        Self { warn, error }
    }
}

/// Grades a value against a maximum bound. Equal to the bound is fine;
/// past the error bound outranks past the warn bound.
pub fn evaluate_max(value: f64, bound: Bound) -> Option<Severity> {
    if value > bound.error {
        Some(Severity::Error)
    } else if value > bound.warn {
        Some(Severity::Warning)
    } else {
        None
    }
}

/// Grades a value against a minimum bound; falling below warns and
/// falling further errors.
pub fn evaluate_min(value: f64, bound: Bound) -> Option<Severity> {
    if value < bound.error {
        Some(Severity::Error)
    } else if value < bound.warn {
        Some(Severity::Warning)
    } else {
        None
    }
}

/// Limits applied to class-level records.
///
/// The optional bounds are off until a project opts in; inheritance
/// depth, child count, and object coupling vary too much across
/// codebases to carry a universal default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassThresholds {
    pub class_size: Bound,
    pub code_rank: Bound,
    pub lines_of_code: Bound,
    pub non_private_properties: Bound,
    pub properties: Bound,
    pub public_methods: Bound,
    pub afferent_coupling: Bound,
    pub efferent_coupling: Bound,
    /// Minimum bound: dropping below warn is the finding.
    pub comment_ratio: Bound,
    pub inheritance_depth: Option<Bound>,
    pub child_classes: Option<Bound>,
    pub object_coupling: Option<Bound>,
}

impl Default for ClassThresholds {
    fn default() -> Self {
        Self {
            class_size: Bound::new(24.0, 56.0),
            code_rank: Bound::new(0.55, 0.75),
            lines_of_code: Bound::new(420.0, 1140.0),
            non_private_properties: Bound::new(1.0, 5.0),
            properties: Bound::new(7.0, 17.0),
            public_methods: Bound::new(14.0, 35.0),
            afferent_coupling: Bound::new(7.0, 24.0),
            efferent_coupling: Bound::new(10.0, 19.0),
            comment_ratio: Bound::new(0.1, 0.05),
            inheritance_depth: None,
            child_classes: None,
            object_coupling: None,
        }
    }
}

/// Limits applied to function and method records.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutineThresholds {
    pub cyclomatic_complexity: Bound,
    pub lines_of_code: Bound,
    pub npath_complexity: Bound,
    pub halstead_effort: Bound,
    /// Minimum bound.
    pub maintainability_index: Bound,
}

impl Default for RoutineThresholds {
    fn default() -> Self {
        Self {
            cyclomatic_complexity: Bound::new(9.0, 25.0),
            lines_of_code: Bound::new(50.0, 130.0),
            npath_complexity: Bound::new(50.0, 10000.0),
            halstead_effort: Bound::new(25000.0, 135000.0),
            maintainability_index: Bound::new(40.0, 25.0),
        }
    }
}

/// Limits applied to whole-file records.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileThresholds {
    pub lines_of_code: Bound,
}

impl Default for FileThresholds {
    fn default() -> Self {
        Self {
            lines_of_code: Bound::new(100.0, 200.0),
        }
    }
}

/// All limits, grouped the way records are shaped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThresholdTable {
    pub classes: ClassThresholds,
    pub routines: RoutineThresholds,
    pub files: FileThresholds,
}

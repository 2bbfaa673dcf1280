//! Precision-dispensing RPM optimizer.
//!
//! Maps a `(vibration, rpm)` reading to an optimal dispensing speed with a
//! fixed Mamdani-style rule table and weighted-average defuzzification, then
//! scores the current and the proposed speed with a simple accuracy model.
//!
//! ## Pipeline
//!
//! 1. Fuzzify medicine weight, vibration and current RPM over three-term
//!    partitions (`WEIGHT`, `VIBRATION`, `RPM`).
//! 2. Fire the seven rules of `RULES` (AND = minimum).
//! 3. Defuzzify: `Σ(strength·anchor) / Σ(strength)` over rules with positive
//!    strength, rounded to an integer RPM. No firing rule falls back to 45.
//! 4. Score both speeds with `predict_accuracy` (lower is better).
//!
//! RPM memberships are computed and reported but no rule reads them.

use crate::fuzzy::{self, Degrees, Partition};
use crate::rounding::{round_half_up_places, round_half_up_to_i64, round_places, round_to_i64};
use std::fmt;

pub const DEFAULT_MEDICINE_WEIGHT: f64 = 0.25;
pub const DEFAULT_TARGET_ACCURACY: f64 = 0.10;
/// Optimal RPM reported when no rule fires.
pub const FALLBACK_RPM: i64 = 45;

/// Medicine weight partition: light / medium / heavy.
pub const WEIGHT: Partition = Partition::new(0.1, 0.3, 0.5, 0.2);
/// Vibration partition: minimal / moderate / significant.
pub const VIBRATION: Partition = Partition::new(5.0, 15.0, 25.0, 10.0);
/// Current RPM partition: slow / medium / fast.
pub const RPM: Partition = Partition::new(20.0, 40.0, 60.0, 20.0);

/// Fixed inputs that are not part of the telemetry sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerParams {
    pub medicine_weight: f64,
    pub target_accuracy: f64,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        Self {
            medicine_weight: DEFAULT_MEDICINE_WEIGHT,
            target_accuracy: DEFAULT_TARGET_ACCURACY,
        }
    }
}

/// Output anchors of the rule table (RPM).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    VeryLow,
    Low,
    MediumLow,
    Medium,
    MediumHigh,
    High,
    VeryHigh,
}

impl Anchor {
    pub const ALL: [Anchor; 7] = [
        Anchor::VeryLow,
        Anchor::Low,
        Anchor::MediumLow,
        Anchor::Medium,
        Anchor::MediumHigh,
        Anchor::High,
        Anchor::VeryHigh,
    ];

    pub const fn rpm(self) -> f64 {
        match self {
            Anchor::VeryLow => 10.0,
            Anchor::Low => 25.0,
            Anchor::MediumLow => 35.0,
            Anchor::Medium => 45.0,
            Anchor::MediumHigh => 55.0,
            Anchor::High => 65.0,
            Anchor::VeryHigh => 80.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Anchor::VeryLow => "very low",
            Anchor::Low => "low",
            Anchor::MediumLow => "medium-low",
            Anchor::Medium => "medium",
            Anchor::MediumHigh => "medium-high",
            Anchor::High => "high",
            Anchor::VeryHigh => "very high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    Weight,
    Vibration,
    Rpm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    Mid,
    High,
}

impl Variable {
    pub const fn name(self) -> &'static str {
        match self {
            Variable::Weight => "weight",
            Variable::Vibration => "vibration",
            Variable::Rpm => "rpm",
        }
    }

    /// Linguistic name of `level` for this variable.
    pub const fn term(self, level: Level) -> &'static str {
        match (self, level) {
            (Variable::Weight, Level::Low) => "light",
            (Variable::Weight, Level::Mid) => "medium",
            (Variable::Weight, Level::High) => "heavy",
            (Variable::Vibration, Level::Low) => "minimal",
            (Variable::Vibration, Level::Mid) => "moderate",
            (Variable::Vibration, Level::High) => "significant",
            (Variable::Rpm, Level::Low) => "slow",
            (Variable::Rpm, Level::Mid) => "medium",
            (Variable::Rpm, Level::High) => "fast",
        }
    }
}

/// Membership degrees of all three inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Memberships {
    pub weight: Degrees,
    pub vibration: Degrees,
    pub rpm: Degrees,
}

impl Memberships {
    pub fn evaluate(medicine_weight: f64, vibration: f64, rpm: f64) -> Self {
        Self {
            weight: WEIGHT.degrees(medicine_weight),
            vibration: VIBRATION.degrees(vibration),
            rpm: RPM.degrees(rpm),
        }
    }

    pub fn degree(&self, term: Term) -> f64 {
        let d = match term.0 {
            Variable::Weight => &self.weight,
            Variable::Vibration => &self.vibration,
            Variable::Rpm => &self.rpm,
        };
        match term.1 {
            Level::Low => d.low,
            Level::Mid => d.mid,
            Level::High => d.high,
        }
    }
}

/// `variable is level`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term(pub Variable, pub Level);

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is {}", self.0.name(), self.0.term(self.1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Is(Term),
    And(Term, Term),
}

impl Condition {
    pub fn strength(&self, m: &Memberships) -> f64 {
        match *self {
            Condition::Is(t) => m.degree(t),
            Condition::And(a, b) => fuzzy::and(m.degree(a), m.degree(b)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub condition: Condition,
    pub output: Anchor,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.condition {
            Condition::Is(t) => write!(f, "IF {t}")?,
            Condition::And(a, b) => write!(f, "IF {a} AND {b}")?,
        }
        write!(f, " THEN rpm is {}", self.output.name())
    }
}

const fn is(v: Variable, l: Level) -> Condition {
    Condition::Is(Term(v, l))
}

const fn both(v1: Variable, l1: Level, v2: Variable, l2: Level) -> Condition {
    Condition::And(Term(v1, l1), Term(v2, l2))
}

use Level::{High as HI, Low as LO, Mid as MID};
use Variable::{Vibration as VIB, Weight as W};

/// The active rule table, in evaluation order.
pub const RULES: [Rule; 7] = [
    Rule { condition: both(W, LO, VIB, LO), output: Anchor::High },
    Rule { condition: is(W, HI), output: Anchor::Low },
    Rule { condition: is(VIB, HI), output: Anchor::VeryLow },
    Rule { condition: both(W, MID, VIB, LO), output: Anchor::MediumHigh },
    Rule { condition: both(W, MID, VIB, MID), output: Anchor::Medium },
    Rule { condition: both(W, LO, VIB, MID), output: Anchor::MediumHigh },
    Rule { condition: both(W, HI, VIB, LO), output: Anchor::MediumLow },
];

/// Firing strength of one rule for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleFiring {
    /// 1-based position in `RULES`.
    pub rule: usize,
    pub strength: f64,
    pub output: Anchor,
}

/// Weighted average of the anchors of all rules with positive strength.
/// `None` when nothing fires.
pub fn defuzzify(firings: &[RuleFiring]) -> Option<f64> {
    let (num, den) = firings
        .iter()
        .filter(|f| f.strength > 0.0)
        .fold((0.0_f64, 0.0_f64), |(n, d), f| {
            (n + f.strength * f.output.rpm(), d + f.strength)
        });
    if den == 0.0 { None } else { Some(num / den) }
}

/// Predicted dispensing error (mm) at `rpm` under `vibration`. Lower is better;
/// the penalty is centred on 45 RPM.
#[inline]
pub fn predict_accuracy(rpm: f64, vibration: f64) -> f64 {
    0.05 + vibration / 500.0 + (rpm - 45.0).abs() / 200.0
}

/// Full trace of one optimizer evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub params: OptimizerParams,
    pub vibration: f64,
    pub rpm: f64,
    pub memberships: Memberships,
    pub firings: [RuleFiring; 7],
    /// Defuzzified RPM before rounding; `None` when the fallback applied.
    pub crisp_rpm: Option<f64>,
    pub optimal_rpm: i64,
    pub current_accuracy: f64,
    pub predicted_accuracy: f64,
    /// `target_accuracy - current_accuracy`; positive means already within target.
    pub accuracy_margin: f64,
}

impl Inference {
    pub fn fell_back(&self) -> bool {
        self.crisp_rpm.is_none()
    }

    /// Rounded, display-ready figures. `reference_vibration` defaults to the
    /// evaluated vibration (delta 0).
    pub fn to_result(&self, reference_vibration: Option<f64>) -> OptimizationResult {
        let reference = reference_vibration.unwrap_or(self.vibration);
        OptimizationResult {
            optimal_rpm: self.optimal_rpm,
            current_accuracy: round_places(self.current_accuracy, 3),
            predicted_accuracy: round_places(self.predicted_accuracy, 3),
            improvement_percent: improvement_percent(
                self.current_accuracy,
                self.predicted_accuracy,
            ),
            vibration_delta: round_half_up_places(reference - self.vibration, 2),
        }
    }
}

/// `round((1 - predicted/current) * 100)` with ties toward +∞, `None` when
/// not computable.
pub fn improvement_percent(current: f64, predicted: f64) -> Option<i64> {
    if current == 0.0 {
        return None;
    }
    round_half_up_to_i64((1.0 - predicted / current) * 100.0)
}

/// Result record handed to the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationResult {
    pub optimal_rpm: i64,
    /// Predicted error at the current RPM, 3 decimals.
    pub current_accuracy: f64,
    /// Predicted error at `optimal_rpm`, 3 decimals.
    pub predicted_accuracy: f64,
    /// Negative when the proposed speed is predicted to be worse; `None` when
    /// the current accuracy is zero.
    pub improvement_percent: Option<i64>,
    /// Reference vibration minus evaluated vibration, 2 decimals.
    pub vibration_delta: f64,
}

/// Run the rule table and keep every intermediate value.
pub fn infer(params: &OptimizerParams, vibration: f64, rpm: f64) -> Inference {
    let memberships = Memberships::evaluate(params.medicine_weight, vibration, rpm);

    let mut firings = [RuleFiring {
        rule: 0,
        strength: 0.0,
        output: Anchor::Medium,
    }; 7];
    for (i, (slot, rule)) in firings.iter_mut().zip(RULES.iter()).enumerate() {
        *slot = RuleFiring {
            rule: i + 1,
            strength: rule.condition.strength(&memberships),
            output: rule.output,
        };
    }

    let crisp_rpm = defuzzify(&firings);
    let optimal_rpm = crisp_rpm.and_then(round_to_i64).unwrap_or(FALLBACK_RPM);
    let current_accuracy = predict_accuracy(rpm, vibration);
    let predicted_accuracy = predict_accuracy(optimal_rpm as f64, vibration);

    tracing::trace!(
        vibration,
        rpm,
        ?crisp_rpm,
        optimal_rpm,
        "precision dispensing inference"
    );

    Inference {
        params: *params,
        vibration,
        rpm,
        memberships,
        firings,
        crisp_rpm,
        optimal_rpm,
        current_accuracy,
        predicted_accuracy,
        accuracy_margin: params.target_accuracy - current_accuracy,
    }
}

/// Optimize with explicit parameters.
pub fn optimize_with(
    params: &OptimizerParams,
    vibration: f64,
    rpm: f64,
    reference_vibration: Option<f64>,
) -> OptimizationResult {
    infer(params, vibration, rpm).to_result(reference_vibration)
}

/// Optimize with the default medicine weight (0.25) and target accuracy (0.10).
pub fn optimize(vibration: f64, rpm: f64, reference_vibration: Option<f64>) -> OptimizationResult {
    optimize_with(&OptimizerParams::default(), vibration, rpm, reference_vibration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weight_is_mostly_medium() {
        let m = Memberships::evaluate(DEFAULT_MEDICINE_WEIGHT, 5.0, 40.0);
        assert!((m.weight.low - 0.25).abs() < 1e-12);
        assert!((m.weight.mid - 0.75).abs() < 1e-12);
        assert_eq!(m.weight.high, 0.0);
        assert_eq!(m.rpm, Degrees { low: 0.0, mid: 1.0, high: 0.0 });
    }

    #[test]
    fn rules_render_as_sentences() {
        assert_eq!(
            RULES[0].to_string(),
            "IF weight is light AND vibration is minimal THEN rpm is high"
        );
        assert_eq!(RULES[2].to_string(), "IF vibration is significant THEN rpm is very low");
    }

    #[test]
    fn no_rule_reads_rpm() {
        let reads_rpm = |t: &Term| t.0 == Variable::Rpm;
        for rule in RULES {
            match rule.condition {
                Condition::Is(t) => assert!(!reads_rpm(&t)),
                Condition::And(a, b) => assert!(!reads_rpm(&a) && !reads_rpm(&b)),
            }
        }
    }

    #[test]
    fn defuzzify_skips_zero_strength_and_detects_empty() {
        let f = |rule, strength, output| RuleFiring { rule, strength, output };
        assert_eq!(defuzzify(&[f(1, 0.0, Anchor::High), f(2, 0.0, Anchor::Low)]), None);
        assert_eq!(
            defuzzify(&[f(1, 0.5, Anchor::High), f(2, 0.5, Anchor::MediumHigh)]),
            Some(60.0)
        );
    }

    #[test]
    fn heavy_medicine_fires_the_low_rule_alone() {
        let params = OptimizerParams {
            medicine_weight: 0.5,
            target_accuracy: DEFAULT_TARGET_ACCURACY,
        };
        let inf = infer(&params, 15.0, 45.0);
        assert_eq!(inf.firings[1].strength, 1.0);
        assert_eq!(inf.crisp_rpm, Some(25.0));
        assert_eq!(inf.optimal_rpm, 25);
        assert!(!inf.fell_back());
    }

    #[test]
    fn origin_reading_uses_weighted_average_not_fallback() {
        let inf = infer(&OptimizerParams::default(), 0.0, 0.0);
        assert!(!inf.fell_back());
        assert_eq!(inf.optimal_rpm, 58);
    }

    #[test]
    fn accuracy_margin_tracks_target() {
        let inf = infer(&OptimizerParams::default(), 30.0, 45.0);
        assert!((inf.accuracy_margin - (0.10 - 0.11)).abs() < 1e-12);
    }

    #[test]
    fn improvement_is_not_computable_for_zero_current_accuracy() {
        assert_eq!(improvement_percent(0.0, 0.1), None);
        assert_eq!(improvement_percent(0.1, 0.05), Some(50));
    }

    #[test]
    fn zero_current_accuracy_yields_none_from_optimize() {
        // Only reachable with negative vibration: 0.05 - 25/500 + 0 == 0.
        let r = optimize(-25.0, 45.0, None);
        assert_eq!(r.current_accuracy, 0.0);
        assert_eq!(r.improvement_percent, None);
    }
}

//! Numeric audits
//!
//! Plain numbers (`5.5`) and ranges (`1..5`, `..5`, `1..`).

use std::fmt;

use super::{Audit, AuditContext, Outcome};
use crate::structure::Node;
use crate::validation::diagnostics::DiagnosticKind;

const RANGE_TOKEN: &str = "..";

/// Optional lower and upper limits; `None` leaves that side open
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn within(&self, value: f64, inclusive: bool) -> bool {
        let above = self
            .min
            .is_none_or(|min| if inclusive { value >= min } else { value > min });
        let below = self
            .max
            .is_none_or(|max| if inclusive { value <= max } else { value < max });
        above && below
    }
}

fn fmt_bound(bound: Option<f64>) -> String {
    bound.map(|b| b.to_string()).unwrap_or_default()
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "min={},max={}", fmt_bound(self.min), fmt_bound(self.max))
    }
}

/// Parse a finite real number
pub fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse `min..max`, `..max`, `min..` or a bare number
pub fn parse_range(text: &str) -> Result<Bounds, String> {
    let Some(split) = text.find(RANGE_TOKEN) else {
        return parse_number(text)
            .map(|n| Bounds::new(Some(n), Some(n)))
            .ok_or_else(|| format!("'{}' is not a number", text));
    };
    let (left, right) = (&text[..split], &text[split + RANGE_TOKEN.len()..]);
    if left.is_empty() && right.is_empty() {
        return Err("range has neither a minimum nor a maximum".to_string());
    }
    let bound = |part: &str| -> Result<Option<f64>, String> {
        if part.is_empty() {
            return Ok(None);
        }
        parse_number(part)
            .map(Some)
            .ok_or_else(|| format!("'{}' is not a number", part))
    };
    let range = Bounds::new(bound(left)?, bound(right)?);
    if let (Some(min), Some(max)) = (range.min, range.max) {
        if min > max {
            return Err(format!("minimum {} exceeds maximum {}", min, max));
        }
    }
    Ok(range)
}

/// Input must be a number within bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Numeric {
    bounds: Bounds,
    inclusive: bool,
}

impl Numeric {
    pub fn new(min: Option<f64>, max: Option<f64>, inclusive: bool) -> Self {
        Self {
            bounds: Bounds::new(min, max),
            inclusive,
        }
    }

    /// Any finite number
    pub fn unbounded() -> Self {
        Self::new(None, None, true)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    pub fn accepts(&self, value: f64) -> bool {
        self.bounds.within(value, self.inclusive)
    }
}

impl Audit for Numeric {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn describe(&self) -> String {
        format!("numeric{{{},inclusive={}}}", self.bounds, self.inclusive)
    }

    fn emits(&self) -> &'static [DiagnosticKind] {
        &[DiagnosticKind::Incompatible, DiagnosticKind::OutOfRange]
    }

    fn audit(&self, ctx: &mut AuditContext<'_>, input: Node<'_>, expected: Node<'_>) -> Outcome {
        let Some(text) = input.as_value().and_then(|v| v.as_str()) else {
            return ctx.fail(self, DiagnosticKind::Incompatible, input, expected);
        };
        match parse_number(text) {
            None => ctx.fail_with(
                self,
                DiagnosticKind::Incompatible,
                input,
                expected,
                "not a number",
            ),
            Some(n) if !self.accepts(n) => {
                ctx.fail(self, DiagnosticKind::OutOfRange, input, expected)
            }
            Some(_) => Outcome::Pass,
        }
    }
}

/// Input must be a range whose present ends each satisfy the bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    limits: Numeric,
}

impl NumericRange {
    pub fn new(min: Option<f64>, max: Option<f64>, inclusive: bool) -> Self {
        Self {
            limits: Numeric::new(min, max, inclusive),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            limits: Numeric::unbounded(),
        }
    }
}

impl Audit for NumericRange {
    fn name(&self) -> &'static str {
        "numeric_range"
    }

    fn describe(&self) -> String {
        format!(
            "numeric_range{{{},inclusive={}}}",
            self.limits.bounds, self.limits.inclusive
        )
    }

    fn emits(&self) -> &'static [DiagnosticKind] {
        &[
            DiagnosticKind::Incompatible,
            DiagnosticKind::InvalidRangeSyntax,
            DiagnosticKind::OutOfRange,
        ]
    }

    fn audit(&self, ctx: &mut AuditContext<'_>, input: Node<'_>, expected: Node<'_>) -> Outcome {
        let Some(text) = input.as_value().and_then(|v| v.as_str()) else {
            return ctx.fail(self, DiagnosticKind::Incompatible, input, expected);
        };
        let range = match parse_range(text) {
            Ok(range) => range,
            Err(reason) => {
                return ctx.fail_with(
                    self,
                    DiagnosticKind::InvalidRangeSyntax,
                    input,
                    expected,
                    reason,
                );
            }
        };
        let in_bounds = [range.min, range.max]
            .into_iter()
            .flatten()
            .all(|end| self.limits.accepts(end));
        if !in_bounds {
            return ctx.fail_with(
                self,
                DiagnosticKind::OutOfRange,
                input,
                expected,
                range.to_string(),
            );
        }
        Outcome::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::Value;
    use crate::validation::diagnostics::DiagnosticCollector;

    fn run(audit: &dyn Audit, text: &str) -> (Outcome, Vec<DiagnosticKind>) {
        let mut collector = DiagnosticCollector::new();
        let input = Value::string(text);
        let expected = Value::any_string();
        let outcome = audit.audit(
            &mut AuditContext::new(&mut collector),
            Node::Value(&input),
            Node::Value(&expected),
        );
        (outcome, collector.kinds())
    }

    #[test]
    fn test_bounds_inclusive_and_exclusive() {
        let bounds = Bounds::new(Some(0.0), Some(10.0));
        assert!(bounds.within(0.0, true));
        assert!(!bounds.within(0.0, false));
        assert!(bounds.within(5.0, false));
        assert!(Bounds::default().within(-1e9, true));
    }

    #[test]
    fn test_exclusive_numeric() {
        let audit = Numeric::new(Some(0.0), Some(10.0), false);
        assert_eq!(run(&audit, "10").0, Outcome::Fail);
        assert_eq!(run(&audit, "9.99").0, Outcome::Pass);
    }

    #[test]
    fn test_rejects_non_finite() {
        let (outcome, kinds) = run(&Numeric::unbounded(), "inf");
        assert_eq!(outcome, Outcome::Fail);
        assert_eq!(kinds, vec![DiagnosticKind::Incompatible]);
    }

    #[test]
    fn test_parse_range_forms() {
        assert_eq!(parse_range("2..5").unwrap(), Bounds::new(Some(2.0), Some(5.0)));
        assert_eq!(parse_range("..9").unwrap(), Bounds::new(None, Some(9.0)));
        assert_eq!(parse_range("1..").unwrap(), Bounds::new(Some(1.0), None));
        assert_eq!(parse_range("3").unwrap(), Bounds::new(Some(3.0), Some(3.0)));
        assert_eq!(parse_range("1.5..2.5").unwrap(), Bounds::new(Some(1.5), Some(2.5)));
        assert!(parse_range("..").is_err());
        assert!(parse_range("5..1").is_err());
        assert!(parse_range("a..1").is_err());
    }

    #[test]
    fn test_range_out_of_bounds_detail() {
        let audit = NumericRange::new(Some(1.0), Some(9.0), true);
        let mut collector = DiagnosticCollector::new();
        let input = Value::string("0..5");
        let expected = Value::any_string();
        audit.audit(
            &mut AuditContext::new(&mut collector),
            Node::Value(&input),
            Node::Value(&expected),
        );
        assert_eq!(collector.diagnostics[0].kind, DiagnosticKind::OutOfRange);
        assert_eq!(collector.diagnostics[0].detail.as_deref(), Some("min=0,max=5"));
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            Numeric::new(Some(0.0), None, true).describe(),
            "numeric{min=0,max=,inclusive=true}"
        );
    }
}

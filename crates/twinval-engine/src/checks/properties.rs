//! Property cross-check.
//!
//! Evaluates every constraint a column declares against each object's
//! value for that column, null values included. A property's `type` is
//! either a constraint tag (`regex-prop`, ...) or a uuid into
//! `property_types` whose entry names the constraint.

use twinval_core::value::{self, Rendered};
use twinval_core::{FindingCollector, Severity};

use super::CheckContext;
use crate::constraint::{Constraint, ConstraintEvaluator};

/// Record failed, invalid and unknown constraints.
pub fn check(ctx: &CheckContext<'_>, findings: &mut FindingCollector) {
    let mut evaluator = ConstraintEvaluator::new();

    for (class, table) in ctx.known_classes() {
        for object in &class.objects {
            for (attribute, value) in object {
                let Some(column) = table.column(attribute) else {
                    continue;
                };

                for property in column.constraints() {
                    let resolved = Constraint::from_tag(&property.tag).or_else(|| {
                        ctx.catalog
                            .property_type_name(&property.tag)
                            .and_then(Constraint::from_tag)
                    });
                    let Some(constraint) = resolved else {
                        findings.record(
                            Severity::Error,
                            format!(
                                "Unknown property type {} on {}.{attribute}",
                                property.tag, class.name
                            ),
                        );
                        continue;
                    };

                    match evaluator.evaluate(constraint, value, &property.value) {
                        Ok(true) => {}
                        Ok(false) => {
                            let mut message = format!(
                                "Validation failed for {attribute} with value {} against property {}",
                                Rendered(value),
                                constraint.label()
                            );
                            if constraint.shows_condition() {
                                message.push_str(" with condition ");
                                message.push_str(&value::render(&property.value).to_lowercase());
                            }
                            findings.record(Severity::Error, message);
                        }
                        Err(e) => findings.record(
                            Severity::Error,
                            format!(
                                "Invalid property {} on {}.{attribute}: {e}",
                                constraint.label(),
                                class.name
                            ),
                        ),
                    }
                }
            }
        }
    }
}

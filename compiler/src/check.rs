//! Consistency report: runtime verification of the model's structural
//! invariants.
//!
//! Each check contributes one [`TestResult`] to a [`ConsistencyReport`]:
//! - `tree/paths`: every concept has one path to its hierarchy root and
//!   parent and child links agree
//! - `tree/index`: every concept is indexed under its identity, in exactly
//!   one hierarchy
//! - `constraints/validity`: every constraint is in scope, non-empty and
//!   free of redundant targets
//! - `constraints/links`: outward and inward constraint links agree
//! - `constraints/roots`: every root carries exactly its default
//!   constraint per type
//! - `constraints/refinement`: constraints that do not narrow the rule they
//!   inherit (a warning, not a failure)

use std::collections::HashSet;

use taxo_model::{ConceptId, Model};

/// Severity level of a check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The check passed.
    Pass,
    /// The check found something worth reviewing.
    Warning,
    /// The check found a broken invariant.
    Failure,
}

/// A single check result.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Identifier of the check that produced this result.
    pub check: String,
    /// Human-readable outcome.
    pub message: String,
    /// Severity of the result.
    pub severity: Severity,
    /// Offending items, one per line.
    pub details: Vec<String>,
}

impl TestResult {
    /// Creates a passing result.
    pub fn pass(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
            severity: Severity::Pass,
            details: Vec::new(),
        }
    }

    /// Creates a failure result.
    pub fn fail(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
            severity: Severity::Failure,
            details: Vec::new(),
        }
    }

    /// Creates a failure result with detail lines.
    pub fn fail_with_details(
        check: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
            severity: Severity::Failure,
            details,
        }
    }

    /// Creates a warning result with detail lines.
    pub fn warn_with_details(
        check: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
            severity: Severity::Warning,
            details,
        }
    }

    /// Returns true if this result is a failure.
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Results of all checks.
#[derive(Debug, Default)]
pub struct ConsistencyReport {
    /// Individual results in check order.
    pub results: Vec<TestResult>,
}

impl ConsistencyReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result.
    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Number of failed checks.
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity == Severity::Warning)
            .count()
    }

    /// Returns true if no check failed.
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }

    fn record(&mut self, check: &str, ok: &str, broken: &str, details: Vec<String>) {
        if details.is_empty() {
            self.push(TestResult::pass(check, ok));
        } else {
            self.push(TestResult::fail_with_details(check, broken, details));
        }
    }
}

/// Runs every check against `model`.
pub fn check_model(model: &Model) -> ConsistencyReport {
    let mut report = ConsistencyReport::new();
    check_paths(model, &mut report);
    check_index(model, &mut report);
    check_validity(model, &mut report);
    check_links(model, &mut report);
    check_roots(model, &mut report);
    check_refinement(model, &mut report);
    report
}

fn label(model: &Model, id: ConceptId) -> String {
    model
        .concept(id)
        .map(|c| c.identity().label().to_owned())
        .unwrap_or_else(|_| format!("#{}", id.index()))
}

fn check_paths(model: &Model, report: &mut ConsistencyReport) {
    let mut violations = Vec::new();
    let limit = model.concepts().len();
    for (id, concept) in model.concepts().iter() {
        let Ok(hierarchy) = model.hierarchy(concept.hierarchy()) else {
            violations.push(format!("{} belongs to an unknown hierarchy", label(model, id)));
            continue;
        };
        let mut steps = 0;
        let mut current = id;
        while let Some(parent) = model.concepts().parent(current) {
            steps += 1;
            if steps > limit {
                break;
            }
            current = parent;
        }
        if steps > limit {
            violations.push(format!("{} lies on a parent cycle", label(model, id)));
        } else if current != hierarchy.root() {
            violations.push(format!(
                "{} does not reach the root of its hierarchy",
                label(model, id)
            ));
        }

        if let Some(parent) = concept.parent() {
            let listed = model
                .concept(parent)
                .map(|p| p.children().iter().filter(|&&c| c == id).count())
                .unwrap_or(0);
            if listed != 1 {
                violations.push(format!(
                    "{} is listed {} times among the children of {}",
                    label(model, id),
                    listed,
                    label(model, parent)
                ));
            }
        }
        for &child in concept.children() {
            if model.concepts().parent(child) != Some(id) {
                violations.push(format!(
                    "{} lists {} as a child but is not its parent",
                    label(model, id),
                    label(model, child)
                ));
            }
        }
    }
    report.record(
        "tree/paths",
        "Every concept has a single path to its root",
        "Broken parent links",
        violations,
    );
}

fn check_index(model: &Model, report: &mut ConsistencyReport) {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();
    for (id, concept) in model.concepts().iter() {
        let uri = concept.identity().uri();
        if !seen.insert(uri.to_owned()) {
            violations.push(format!("identifier <{uri}> is used twice"));
        }
        let indexed: Vec<_> = model
            .hierarchies()
            .iter()
            .filter_map(|h| h.lookup(uri).map(|c| (h.id(), c)))
            .collect();
        if indexed != [(concept.hierarchy(), id)] {
            violations.push(format!(
                "{} is indexed {} times or under the wrong hierarchy",
                label(model, id),
                indexed.len()
            ));
        }
    }
    let indexed_total: usize = model.hierarchies().iter().map(|h| h.len()).sum();
    if indexed_total != model.concepts().len() {
        violations.push(format!(
            "index holds {} entries for {} concepts",
            indexed_total,
            model.concepts().len()
        ));
    }
    report.record(
        "tree/index",
        "Identifier index agrees with the concept tree",
        "Identifier index is out of step",
        violations,
    );
}

fn check_validity(model: &Model, report: &mut ConsistencyReport) {
    let mut violations = Vec::new();
    for (id, constraint) in model.constraints() {
        let Ok(ty) = model.constraint_type(constraint.constraint_type()) else {
            violations.push(format!("constraint #{} has an unknown type", id.index()));
            continue;
        };
        let rebuilt = ty.create_constraint(
            model.concepts(),
            constraint.source(),
            constraint.targets().iter().copied(),
        );
        if let Err(e) = rebuilt {
            violations.push(format!(
                "{} on {}: {}",
                ty.focus().label(),
                label(model, constraint.source()),
                e
            ));
        }
    }
    report.record(
        "constraints/validity",
        "Every constraint is in scope and free of redundant targets",
        "Invalid constraints",
        violations,
    );
}

fn check_links(model: &Model, report: &mut ConsistencyReport) {
    let mut violations = Vec::new();
    for (id, constraint) in model.constraints() {
        let outward_ok = model
            .concept(constraint.source())
            .is_ok_and(|c| c.outward_constraints().contains(&id));
        if !outward_ok {
            violations.push(format!(
                "constraint #{} is missing from the outward list of {}",
                id.index(),
                label(model, constraint.source())
            ));
        }
        for &target in constraint.targets() {
            let inward_ok = model
                .concept(target)
                .is_ok_and(|c| c.inward_constraints().contains(&id));
            if !inward_ok {
                violations.push(format!(
                    "constraint #{} is missing from the inward set of {}",
                    id.index(),
                    label(model, target)
                ));
            }
        }
    }
    for (id, concept) in model.concepts().iter() {
        for &k in concept.outward_constraints() {
            if model.constraint(k).map(|c| c.source()) != Ok(id) {
                violations.push(format!(
                    "{} lists constraint #{} it does not own",
                    label(model, id),
                    k.index()
                ));
            }
        }
        for &k in concept.inward_constraints() {
            if !model.constraint(k).is_ok_and(|c| c.targets().contains(&id)) {
                violations.push(format!(
                    "{} lists constraint #{} that does not target it",
                    label(model, id),
                    k.index()
                ));
            }
        }
    }
    report.record(
        "constraints/links",
        "Outward and inward constraint links agree",
        "Constraint links disagree",
        violations,
    );
}

fn check_roots(model: &Model, report: &mut ConsistencyReport) {
    let mut violations = Vec::new();
    for ty in model.constraint_types() {
        let (Ok(source), Ok(target)) = (
            model.hierarchy(ty.hierarchy()),
            model.hierarchy(ty.target_hierarchy()),
        ) else {
            violations.push(format!("{} refers to an unknown hierarchy", ty.focus().label()));
            continue;
        };
        let root = source.root();
        let own: Vec<_> = model
            .constraints()
            .filter(|(_, k)| k.source() == root && k.constraint_type() == ty.id())
            .collect();
        match own.as_slice() {
            [(_, k)] if k.targets().len() == 1 && k.targets().contains(&target.root()) => {}
            [_] => violations.push(format!(
                "the {} default on {} does not point at the target root",
                ty.focus().label(),
                label(model, root)
            )),
            other => violations.push(format!(
                "{} carries {} {} constraints",
                label(model, root),
                other.len(),
                ty.focus().label()
            )),
        }
    }
    report.record(
        "constraints/roots",
        "Every root carries its default constraints",
        "Root default constraints are missing or altered",
        violations,
    );
}

fn check_refinement(model: &Model, report: &mut ConsistencyReport) {
    let mut loose = Vec::new();
    for (_, constraint) in model.constraints() {
        let source = constraint.source();
        let Some(parent) = model.concepts().parent(source) else {
            continue;
        };
        let Ok(inherited) = model
            .closest_constraint(parent, constraint.constraint_type())
            .and_then(|k| model.constraint(k))
        else {
            continue;
        };
        if !constraint.refines(inherited, model.concepts()) {
            let focus = model
                .constraint_type(constraint.constraint_type())
                .map(|t| t.focus().label().to_owned())
                .unwrap_or_default();
            loose.push(format!(
                "{} on {} allows values its ancestor {} excludes",
                focus,
                label(model, source),
                label(model, inherited.source())
            ));
        }
    }
    if loose.is_empty() {
        report.push(TestResult::pass(
            "constraints/refinement",
            "Every constraint narrows the rule it inherits",
        ));
    } else {
        report.push(TestResult::warn_with_details(
            "constraints/refinement",
            "Constraints widen their inherited rule",
            loose,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxo_model::{AcceptAll, SchemaConfig};

    const MENU: &str = r#"
[namespaces]
schema = "http://example.org/menu/schema#"
content = "http://example.org/menu/content#"

[[hierarchy]]
root = "Dish"

[[hierarchy.constraint_type]]
focus = "DishConstraint"
source_property = "hasDish"
target_property = "hasIngredient"
target_hierarchy = "Ingredient"

[[hierarchy]]
root = "Ingredient"
"#;

    fn model() -> Model {
        let config = SchemaConfig::from_toml_str(MENU).unwrap();
        Model::from_config(&config, Box::new(AcceptAll)).unwrap()
    }

    #[test]
    fn fresh_model_passes_every_check() {
        let report = check_model(&model());
        assert_eq!(report.results.len(), 6);
        assert!(report.all_passed());
        assert_eq!(report.warning_count(), 0);
    }

    #[test]
    fn edited_model_stays_consistent() {
        let mut m = model();
        let dish = m.hierarchies()[0].root();
        let ingredient = m.hierarchies()[1].root();
        let ty = m.constraint_types()[0].id();
        let pasta = m.add_child(dish, "Pasta").unwrap();
        let lasagne = m.add_child(pasta, "Lasagne").unwrap();
        let wheat = m.add_child(ingredient, "Wheat").unwrap();
        let egg = m.add_child(ingredient, "Egg").unwrap();
        m.add_constraint(pasta, ty, [wheat, egg]).unwrap();
        m.add_constraint(lasagne, ty, [wheat]).unwrap();
        m.remove(egg).unwrap();

        let report = check_model(&m);
        assert!(report.all_passed(), "{:?}", report.results);
        assert_eq!(report.warning_count(), 0);
    }

    #[test]
    fn widening_constraint_is_a_warning() {
        let mut m = model();
        let dish = m.hierarchies()[0].root();
        let ingredient = m.hierarchies()[1].root();
        let ty = m.constraint_types()[0].id();
        let pasta = m.add_child(dish, "Pasta").unwrap();
        let lasagne = m.add_child(pasta, "Lasagne").unwrap();
        let wheat = m.add_child(ingredient, "Wheat").unwrap();
        let egg = m.add_child(ingredient, "Egg").unwrap();
        m.add_constraint(pasta, ty, [wheat]).unwrap();
        m.add_constraint(lasagne, ty, [egg]).unwrap();

        let report = check_model(&m);
        assert!(report.all_passed());
        assert_eq!(report.warning_count(), 1);
        let warning = report
            .results
            .iter()
            .find(|r| r.severity == Severity::Warning)
            .unwrap();
        assert_eq!(warning.check, "constraints/refinement");
        assert!(warning.details[0].contains("Lasagne"));
    }
}

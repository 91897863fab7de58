//! Schema comparison scenarios end to end
use std::sync::Arc;

use selector_schema::audits::{
    HasValue, Negatable, Numeric, RestrictedNegation, StringLength, StructureIsValue,
};
use selector_schema::validation::LogSink;
use selector_schema::{
    AuditExt, Comparator, DiagnosticCollector, DiagnosticKind, DynamicSelector,
    ParametersContainer, Parser, PlayerSelector, Selector, SimpleRegistry, Validator, Value,
};

fn targets() -> Arc<SimpleRegistry> {
    Arc::new(SimpleRegistry::new("targets", ["a", "e", "p", "r", "s"]))
}

fn validator() -> Validator {
    Validator::new(
        Parser::new(),
        Comparator::new().with_global_audit(Negatable.when(StructureIsValue)),
    )
}

fn entity_type_schema() -> Selector {
    let types = ParametersContainer::new()
        .with_value(
            "type",
            Value::any_string()
                .negatable()
                .multiple()
                .with_audit(HasValue::new(["pig", "cow"], false)),
        )
        .with_parameter_audit("type", RestrictedNegation);
    Selector::single(DynamicSelector::new(targets(), types))
}

fn placeholder_schema() -> Selector {
    Selector::single(
        DynamicSelector::new(targets(), ParametersContainer::new())
            .with_placeholder(Value::any_string()),
    )
}

#[test]
fn test_restricted_negation_on_repeated_type() {
    let validator = validator();
    let schema = entity_type_schema();

    let mixed = validator.collect("@e[type=pig,type=!cow]", &schema).unwrap();
    assert!(!mixed.is_valid());
    assert_eq!(mixed.count(DiagnosticKind::MixedNegation), 1);

    let all_negated = validator.collect("@e[type=!pig,type=!cow]", &schema).unwrap();
    assert!(all_negated.is_empty(), "Unexpected: {:?}", all_negated.kinds());

    let two_plain = validator.collect("@e[type=pig,type=cow]", &schema).unwrap();
    assert!(!two_plain.is_valid());
    assert_eq!(two_plain.count(DiagnosticKind::TooManyNonNegated), 1);
}

#[test]
fn test_placeholder_absorbs_unknown_keys() {
    let validator = validator();
    let schema = placeholder_schema();

    assert!(validator.validate("@a[custom=5]", &schema, &mut DiagnosticCollector::new()).unwrap());
    assert!(validator
        .validate("@a[custom=5,custom2=6]", &schema, &mut DiagnosticCollector::new())
        .unwrap());
}

#[test]
fn test_placeholder_failure_reports_unexpected_parameter() {
    let validator = validator();
    let schema = placeholder_schema();

    let collector = validator.collect("@a[custom=5,custom=6]", &schema).unwrap();
    assert!(!collector.is_valid());
    assert_eq!(collector.count(DiagnosticKind::OnlyOneAllowed), 1);
    assert_eq!(collector.count(DiagnosticKind::UnexpectedParameter), 1);
}

#[test]
fn test_lenient_registry_accepts_with_warning() {
    let entities = Arc::new(SimpleRegistry::new("entities", ["pig", "cow"]));
    let lenient = Selector::single(
        DynamicSelector::new(targets(), ParametersContainer::new()).with_value(
            "type",
            Value::any_string().with_audit(HasValue::from_registry(entities.clone(), true)),
        ),
    );
    let strict = Selector::single(
        DynamicSelector::new(targets(), ParametersContainer::new()).with_value(
            "type",
            Value::any_string().with_audit(HasValue::from_registry(entities, false)),
        ),
    );
    let validator = validator();

    let mut collector = DiagnosticCollector::new();
    assert!(validator.validate("@e[type=horse]", &lenient, &mut collector).unwrap());
    assert_eq!(collector.kinds(), vec![DiagnosticKind::InvalidValueLenient]);
    assert_eq!(collector.warnings().count(), 1);

    let mut collector = DiagnosticCollector::new();
    assert!(!validator.validate("@e[type=horse]", &strict, &mut collector).unwrap());
    assert_eq!(collector.count(DiagnosticKind::InvalidValue), 1);
    assert_eq!(collector.count(DiagnosticKind::InvalidValueLenient), 0);
}

#[test]
fn test_unterminated_input_is_parse_error() {
    let mut collector = DiagnosticCollector::new();
    assert!(validator().validate("@a[x=1", &placeholder_schema(), &mut collector).is_err());
    assert!(collector.is_empty());
}

#[test]
fn test_tree_compared_with_itself() {
    let parser = Parser::new();
    let comparator = Comparator::new();
    let inputs = [
        "@e[type=pig,limit=1]",
        "@a[scores={kills=1..5},nbt={Tags:[\"x\"]}]",
        "Steve",
        "1-1-1-1-1",
        "@",
    ];
    for input in inputs {
        let tree = parser.parse(input).unwrap();
        let mut collector = DiagnosticCollector::new();
        assert!(comparator.compare(&tree, &tree, &mut collector), "Failed for {}", input);
        assert!(collector.is_empty(), "Diagnostics for {}: {:?}", input, collector.kinds());
    }
}

#[test]
fn test_nested_parameters_compared_recursively() {
    let scores = ParametersContainer::new().with_placeholder(
        Value::any_string().with_audit(selector_schema::audits::NumericRange::unbounded()),
    );
    let schema = Selector::single(
        DynamicSelector::new(targets(), ParametersContainer::new())
            .with_value("scores", Value::nested(scores)),
    );
    let validator = validator();

    assert!(
        validator
            .collect("@a[scores={kills=1..,deaths=..3}]", &schema)
            .unwrap()
            .is_valid()
    );

    let collector = validator.collect("@a[scores={kills=lots}]", &schema).unwrap();
    assert_eq!(collector.count(DiagnosticKind::InvalidRangeSyntax), 1);
    assert_eq!(collector.count(DiagnosticKind::UnexpectedParameter), 1);

    let collector = validator.collect("@a[scores=5]", &schema).unwrap();
    assert_eq!(collector.count(DiagnosticKind::IncompatibleStructure), 1);
}

#[test]
fn test_multiple_accepted_variants() {
    let schema = Selector::new(vec![])
        .accept(PlayerSelector::any().with_audit(StringLength::new(Some(3), Some(16), true)))
        .accept(DynamicSelector::new(targets(), ParametersContainer::new()));
    let validator = validator();

    assert!(validator.collect("Steve", &schema).unwrap().is_valid());
    assert!(validator.collect("@p", &schema).unwrap().is_valid());
    let collector = validator.collect("Al", &schema).unwrap();
    assert_eq!(
        collector.kinds(),
        vec![DiagnosticKind::OutOfRange, DiagnosticKind::InvalidSelectorType]
    );
    assert_eq!(schema.to_string(), "mixed_selector");
}

#[test]
fn test_diagnostics_export_as_json() {
    let collector = validator().collect("@e[type=horse]", &entity_type_schema()).unwrap();
    let json = collector.to_json().unwrap();
    assert!(json.contains("\"invalid_value\""));
    assert!(json.contains("has_value{values=[pig,cow],lenient=false}"));
}

#[test]
fn test_log_sink_receives_diagnostics() {
    let _ = env_logger::builder().is_test(true).try_init();
    let passed = validator()
        .validate("@e[type=horse]", &entity_type_schema(), &mut LogSink)
        .unwrap();
    assert!(!passed);
}

#[test]
fn test_shared_schema_across_threads() {
    let schema = entity_type_schema();
    let validator = validator();
    let inputs = [
        "@e[type=pig]",
        "@e[type=!pig,type=!cow]",
        "@e[type=horse]",
        "@e[type=pig,type=cow]",
    ];

    let results: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let (schema, validator) = (&schema, &validator);
                scope.spawn(move || {
                    let mut collector = DiagnosticCollector::new();
                    validator.validate(input, schema, &mut collector).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results, vec![true, true, false, false]);
}

#[test]
fn test_mixed_without_matching_alternative_runs_own_audits() {
    let schema = Selector::single(
        DynamicSelector::new(targets(), ParametersContainer::new()).with_value(
            "data",
            Value::mixed(vec![Value::any_tag()]).with_audit(Numeric::unbounded()),
        ),
    );
    let collector = validator().collect("@e[data=abc]", &schema).unwrap();
    assert_eq!(collector.count(DiagnosticKind::IncompatibleStructure), 1);
    assert_eq!(collector.count(DiagnosticKind::Incompatible), 1);
}

#[test]
fn test_matching_alternative_hides_earlier_failures() {
    let entities = Arc::new(SimpleRegistry::new("entities", ["pig"]));
    let schema = Selector::single(DynamicSelector::with_type("a", ParametersContainer::new()))
        .accept(
            DynamicSelector::with_type("e", ParametersContainer::new()).with_value(
                "type",
                Value::any_string().with_audit(HasValue::from_registry(entities, true)),
            ),
        );
    let validator = validator();

    let mut sink = DiagnosticCollector::new();
    assert!(validator.validate("@e", &schema, &mut sink).unwrap());
    let collector = validator.collect("@e", &schema).unwrap();
    assert!(collector.is_valid());
    assert!(collector.is_empty());

    // the matching alternative still reports its own warnings
    let collector = validator.collect("@e[type=horse]", &schema).unwrap();
    assert!(collector.is_valid());
    assert_eq!(collector.kinds(), vec![DiagnosticKind::InvalidValueLenient]);
}

//! Unit tests for the data model: value semantics, rule operators, errors.
use renkei::prelude::*;

#[test]
fn test_value_display() {
    assert_eq!(format!("{}", AnswerValue::Integer(42)), "42");
    assert_eq!(format!("{}", AnswerValue::Decimal(42.0)), "42");
    assert_eq!(format!("{}", AnswerValue::Decimal(3.5)), "3.5");
    assert_eq!(format!("{}", AnswerValue::Boolean(true)), "true");
    assert_eq!(
        format!("{}", AnswerValue::String("Acme".to_string())),
        "Acme"
    );
    assert_eq!(
        format!(
            "{}",
            AnswerValue::Quantity(Quantity {
                value: 70.0,
                unit: Some("kg".to_string()),
                system: None,
                code: None,
            })
        ),
        "70 kg"
    );
}

#[test]
fn test_numeric_values_compare_across_kinds() {
    let integer = AnswerValue::Integer(5);
    let decimal = AnswerValue::Decimal(5.0);
    let quantity = AnswerValue::Quantity(Quantity {
        value: 5.0,
        unit: None,
        system: None,
        code: None,
    });

    assert!(integer.matches(&decimal));
    assert!(integer.matches(&quantity));
    assert!(ComparisonOp::GreaterThan.holds(&AnswerValue::Decimal(5.5), &integer));
}

#[test]
fn test_coding_matches_by_system_and_code() {
    let loinc_height = AnswerValue::Coding(Coding {
        system: Some("http://loinc.org".to_string()),
        code: "8302-2".to_string(),
        display: Some("Body height".to_string()),
    });
    let same_code_other_display = AnswerValue::Coding(Coding {
        system: Some("http://loinc.org".to_string()),
        code: "8302-2".to_string(),
        display: None,
    });
    let other_system = AnswerValue::Coding(Coding {
        system: Some("http://snomed.info/sct".to_string()),
        code: "8302-2".to_string(),
        display: None,
    });

    assert!(loinc_height.matches(&same_code_other_display));
    assert!(!loinc_height.matches(&other_system));
    // Codings have no ordering.
    assert!(loinc_height.compare(&same_code_other_display).is_none());
}

#[test]
fn test_dates_compare_lexicographically() {
    let earlier = AnswerValue::Date("2023-01-15".to_string());
    let later = AnswerValue::Date("2024-06-01".to_string());
    assert!(ComparisonOp::LessThan.holds(&earlier, &later));
    assert!(ComparisonOp::GreaterOrEqual.holds(&later, &earlier));
}

#[test]
fn test_type_mismatch_never_satisfies_not_equal() {
    let number = AnswerValue::Integer(3);
    let text = AnswerValue::String("3".to_string());
    assert!(!ComparisonOp::Equal.holds(&number, &text));
    assert!(!ComparisonOp::NotEqual.holds(&number, &text));
}

#[test]
fn test_exists_rule_against_presence() {
    let must_exist = EnableWhenRule {
        source: "consent".to_string(),
        operator: ComparisonOp::Exists,
        expected: AnswerValue::Boolean(true),
    };
    let must_not_exist = EnableWhenRule {
        source: "consent".to_string(),
        operator: ComparisonOp::Exists,
        expected: AnswerValue::Boolean(false),
    };

    assert!(!must_exist.is_satisfied_by(&[]));
    assert!(must_exist.is_satisfied_by(&[AnswerValue::Boolean(false)]));
    assert!(must_not_exist.is_satisfied_by(&[]));
    assert!(!must_not_exist.is_satisfied_by(&[AnswerValue::Boolean(false)]));
    // A lone empty string does not count as presence.
    assert!(must_not_exist.is_satisfied_by(&[AnswerValue::String(String::new())]));
}

#[test]
fn test_exists_rule_with_non_boolean_expected_never_fires() {
    let malformed = EnableWhenRule {
        source: "consent".to_string(),
        operator: ComparisonOp::Exists,
        expected: AnswerValue::Integer(1),
    };
    assert!(!malformed.is_satisfied_by(&[]));
    assert!(!malformed.is_satisfied_by(&[AnswerValue::Boolean(true)]));
}

#[test]
fn test_multi_valued_source_satisfies_existentially() {
    let rule = EnableWhenRule {
        source: "score".to_string(),
        operator: ComparisonOp::GreaterThan,
        expected: AnswerValue::Integer(10),
    };
    let answers = vec![
        AnswerValue::Integer(3),
        AnswerValue::Integer(12),
        AnswerValue::Integer(7),
    ];
    assert!(rule.is_satisfied_by(&answers));
}

#[test]
fn test_comparison_op_serde_uses_operator_symbols() {
    assert_eq!(
        serde_json::to_string(&ComparisonOp::GreaterOrEqual).unwrap(),
        "\">=\""
    );
    assert_eq!(
        serde_json::from_str::<ComparisonOp>("\"exists\"").unwrap(),
        ComparisonOp::Exists
    );
}

#[test]
fn test_rule_display() {
    let rule = EnableWhenRule {
        source: "age".to_string(),
        operator: ComparisonOp::GreaterOrEqual,
        expected: AnswerValue::Integer(18),
    };
    assert_eq!(rule.to_string(), "age >= 18");

    let expr = RuleExpression::And(
        Box::new(RuleExpression::GreaterOrEqual(
            Box::new(RuleExpression::Source("age".to_string())),
            Box::new(RuleExpression::Literal(AnswerValue::Integer(18))),
        )),
        Box::new(RuleExpression::Exists("consent".to_string())),
    );
    assert_eq!(expr.to_string(), "(($age >= 18) AND exists($consent))");
}

#[test]
fn test_error_display() {
    let assemble_err = AssembleError::EmptyDefinition;
    assert!(assemble_err.to_string().contains("no items"));

    let expr_err = ExpressionError::TypeMismatch {
        operation: "AND".to_string(),
        expected: "Boolean".to_string(),
        found: AnswerValue::Integer(7),
    };
    assert!(expr_err.to_string().contains("AND"));
    assert!(expr_err.to_string().contains("Boolean"));
    assert!(expr_err.to_string().contains('7'));
}

#[test]
fn test_definition_serde_round_trip() {
    let definition = FormDefinition {
        id: Some("f1".to_string()),
        title: Some("Round trip".to_string()),
        items: vec![
            FormNode::new("q1", ItemType::Boolean),
            FormNode::new("grp", ItemType::Group)
                .with_children(vec![FormNode::new("q2", ItemType::String)])
                .with_rules(
                    vec![VisibilityRule::Simple(EnableWhenRule {
                        source: "q1".to_string(),
                        operator: ComparisonOp::Equal,
                        expected: AnswerValue::Boolean(true),
                    })],
                    CombineBehavior::Any,
                ),
        ],
        ..FormDefinition::default()
    };

    let json = serde_json::to_string(&definition).unwrap();
    let parsed: FormDefinition = serde_json::from_str(&json).unwrap();
    assert_eq!(definition, parsed);
}

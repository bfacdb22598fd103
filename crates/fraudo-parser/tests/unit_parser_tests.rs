//! Unit tests for the rule template parser

use fraudo_core::{Action, CompareOp, Expression, Position};
use fraudo_parser::*;

#[test]
fn test_parse_multi_rule_template() {
    let template = TemplateParser::parse(
        r#"
        rule: black: inBlackList("email", "card_token") -> decline;
        rule: count("card_token", 1440, "party_id") > 1 -> notify;
        rule: big: amount() >= 100000 -> accept;
        "#,
    )
    .unwrap();

    assert_eq!(template.rules.len(), 3);
    assert_eq!(template.rules[0].name.as_deref(), Some("black"));
    assert_eq!(template.rules[1].name, None);
    assert_eq!(template.rules[1].id(1), "2");
    assert_eq!(template.rules[2].action, Action::Accept);
}

#[test]
fn test_parse_empty_template() {
    let template = TemplateParser::parse("  \n ").unwrap();
    assert!(template.is_empty());
}

#[test]
fn test_keywords_are_case_insensitive() {
    let template =
        TemplateParser::parse(r#"rule: amount() > 1 AnD NOT equals("currency", "USD") -> DECLINE;"#)
            .unwrap();

    assert_eq!(template.rules[0].action, Action::Decline);
    assert!(matches!(template.rules[0].condition, Expression::And(_, _)));
}

#[test]
fn test_parenthesised_condition() {
    let template = TemplateParser::parse(
        r#"rule: (amount() > 1 or amount() < 0) and amount() != 5 -> notify;"#,
    )
    .unwrap();

    match &template.rules[0].condition {
        Expression::And(left, right) => {
            assert!(matches!(**left, Expression::Or(_, _)));
            assert!(matches!(**right, Expression::Compare { op: CompareOp::Ne, .. }));
        }
        other => panic!("Expected And, got {:?}", other),
    }
}

#[test]
fn test_call_arguments() {
    let template =
        TemplateParser::parse(r#"rule: unique("email", "card_token", 60) > 2 -> decline;"#)
            .unwrap();

    match &template.rules[0].condition {
        Expression::Compare { left, .. } => match &**left {
            Expression::Call { name, args, .. } => {
                assert_eq!(name, "unique");
                assert_eq!(args.len(), 3);
                assert_eq!(args[1].as_str(), Some("card_token"));
                assert_eq!(args[2], Expression::Number(60.0));
            }
            other => panic!("Expected Call, got {:?}", other),
        },
        other => panic!("Expected Compare, got {:?}", other),
    }
}

#[test]
fn test_unknown_action_on_later_line() {
    let err = TemplateParser::parse("rule: amount() > 1 -> accept;\nrule: amount() > 2 -> block;")
        .unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownAction {
            action: "block".to_string(),
            position: Position::new(2, 23),
        }
    );
}

#[test]
fn test_negative_numbers() {
    let template = TemplateParser::parse("rule: amount() > -5 -> notify;").unwrap();
    match &template.rules[0].condition {
        Expression::Compare { right, .. } => assert_eq!(**right, Expression::Number(-5.0)),
        other => panic!("Expected Compare, got {:?}", other),
    }
}

#[test]
fn test_missing_comma_between_arguments() {
    let err = TemplateParser::parse(r#"rule: count("email" 10) > 1 -> accept;"#).unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn test_unterminated_string() {
    let err = TemplateParser::parse(r#"rule: equals("email, "x") -> accept;"#).unwrap_err();
    assert!(matches!(err, ParseError::UnterminatedString { .. }));
}

#[test]
fn test_deep_parentheses_are_rejected_without_overflow() {
    for depth in [2_000, 20_000, 200_000] {
        let source = format!(
            "rule: {}1 > 0{} -> accept;",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        let err = TemplateParser::parse(&source).unwrap_err();
        assert!(
            matches!(err, ParseError::NestingTooDeep { limit: MAX_NESTING, .. }),
            "depth {}: {:?}",
            depth,
            err
        );
    }
}

#[test]
fn test_long_not_run_is_rejected() {
    let source = format!("rule: {}amount() > 1 -> accept;", "not ".repeat(50_000));
    let err = TemplateParser::parse(&source).unwrap_err();
    assert!(matches!(err, ParseError::NestingTooDeep { .. }));
}

#[test]
fn test_short_not_run_still_parses() {
    let template = TemplateParser::parse("rule: not not amount() > 1 -> accept;").unwrap();
    match &template.rules[0].condition {
        Expression::Not(inner) => assert!(matches!(**inner, Expression::Not(_))),
        other => panic!("Expected Not, got {:?}", other),
    }
}

#[test]
fn test_long_and_chain_is_rejected() {
    let chain = vec!["amount() > 1"; 10_000].join(" and ");
    let source = format!("rule: {} -> accept;", chain);
    let err = TemplateParser::parse(&source).unwrap_err();
    assert!(matches!(err, ParseError::NestingTooDeep { .. }));
}

#[test]
fn test_deeply_nested_calls_are_rejected() {
    let depth = 5_000;
    let source = format!(
        "rule: {}\"email\"{} > 1 -> accept;",
        "count(".repeat(depth),
        ")".repeat(depth)
    );
    let err = TemplateParser::parse(&source).unwrap_err();
    assert!(matches!(err, ParseError::NestingTooDeep { .. }));
}

//! End-to-end scoring tests through the SDK facade

mod common;

use common::*;
use fraudo_runtime::{
    ErrorKind, EventKind, EventRepository, EventStatus, HistoricalEvent, InMemoryEventRepository,
};
use fraudo_sdk::{Action, EngineConfig, FraudEngineBuilder, GeoFailurePolicy, Outcome};
use std::sync::Arc;
use std::time::Duration;

fn matched(rule_id: &str, action: Action) -> Outcome {
    Outcome::Matched {
        rule_id: rule_id.to_string(),
        action,
    }
}

#[tokio::test]
async fn test_results_follow_template_order() {
    let test = TestEngine::new().await;
    test.lists.add("black", "bad@x.com").await;

    let templates = test.compile(&[
        template("lists", r#"rule:black:inBlackList("email")->decline;"#),
        template("amounts", r#"rule:big:amount() > 100000 -> notify;"#),
        template("geo", r#"rule:geo:in(countryBy("country_ip"), "RUS") -> accept;"#),
    ]);

    let results = test
        .engine
        .evaluate(&templates, &payment("bad@x.com", "T1", "P1"))
        .await;

    let ids: Vec<&str> = results.iter().map(|r| r.template_id.as_str()).collect();
    assert_eq!(ids, vec!["lists", "amounts", "geo"]);
    assert_eq!(results[0].outcome, matched("black", Action::Decline));
    assert_eq!(results[1].outcome, Outcome::NoMatch);
    assert_eq!(results[2].outcome, matched("geo", Action::Accept));
}

#[tokio::test]
async fn test_velocity_with_group_by_and_outcome_filters() {
    let test = TestEngine::new().await;
    test.seed(vec![
        past_payment(EventStatus::Accept, 1000, "a@x.com", "T1", "P1", 5),
        past_payment(EventStatus::Error, 2000, "a@x.com", "T2", "P1", 10),
        past_payment(EventStatus::Accept, 4000, "a@x.com", "T3", "P2", 20),
        past_payment(EventStatus::Accept, 8000, "a@x.com", "T4", "P1", 120),
    ])
    .await;

    let templates = test.compile(&[
        template("all", r#"rule:all:count("email", 60) = 3 -> notify;"#),
        template("party", r#"rule:party:count("email", 60, "party_id") = 2 -> notify;"#),
        template("ok", r#"rule:ok:countSuccess("email", 60) = 2 -> accept;"#),
        template("failed", r#"rule:failed:sumError("email", 60) = 2000 -> decline;"#),
        template("cards", r#"rule:cards:unique("email", "card_token", 60) > 2 -> decline;"#),
    ]);

    let results = test
        .engine
        .evaluate(&templates, &payment("a@x.com", "T9", "P1"))
        .await;

    assert_eq!(results[0].outcome, matched("all", Action::Notify));
    assert_eq!(results[1].outcome, matched("party", Action::Notify));
    assert_eq!(results[2].outcome, matched("ok", Action::Accept));
    assert_eq!(results[3].outcome, matched("failed", Action::Decline));
    assert_eq!(results[4].outcome, matched("cards", Action::Decline));
}

#[tokio::test]
async fn test_recorded_decision_feeds_later_counts() {
    let test = TestEngine::new().await;
    let templates = test.compile(&[template(
        "velocity",
        r#"rule:repeat:count("email", 60) > 0 -> decline;"#,
    )]);
    let model = payment("new@x.com", "T1", "P1");

    let first = test.engine.evaluate(&templates, &model).await;
    assert_eq!(first[0].outcome, Outcome::NoMatch);
    test.engine.record_decision(&model, &first[0]).await.unwrap();

    let events = test.repository.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].status, EventStatus::Normal);
    assert_eq!(events[0].attribute("email"), Some("new@x.com"));

    let second = test.engine.evaluate(&templates, &model).await;
    assert_eq!(second[0].outcome, matched("repeat", Action::Decline));
}

#[tokio::test]
async fn test_record_decisions_writes_one_event_per_result() {
    let test = TestEngine::new().await;
    test.lists.add("white", "vip@x.com").await;
    let templates = test.compile(&[
        template("white", r#"rule:vip:inWhiteList("email") -> accept;"#),
        template("none", r#"rule:never:amount() < 0 -> decline;"#),
    ]);
    let model = payment("vip@x.com", "T1", "P1");

    let results = test.engine.evaluate(&templates, &model).await;
    test.engine.record_decisions(&model, &results).await.unwrap();

    let events = test.repository.events().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].status, EventStatus::Accept);
    assert_eq!(events[0].rule_id.as_deref(), Some("vip"));
    assert_eq!(events[1].status, EventStatus::Normal);
    assert_eq!(events[1].rule_id, None);
}

#[tokio::test]
async fn test_score_batch_keeps_model_order() {
    let test = TestEngine::new().await;
    test.lists.add("black", "T2").await;
    let templates = test.compile(&[template(
        "cards",
        r#"rule:black:inBlackList("card_token") -> decline;"#,
    )]);

    let models = vec![
        payment("a@x.com", "T1", "P1"),
        payment("b@x.com", "T2", "P1"),
        payment("c@x.com", "T3", "P1"),
    ];
    let results = test.engine.score_batch(&templates, &models).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0][0].outcome, Outcome::NoMatch);
    assert_eq!(results[1][0].outcome, matched("black", Action::Decline));
    assert_eq!(results[2][0].outcome, Outcome::NoMatch);
}

#[tokio::test(start_paused = true)]
async fn test_request_deadline_times_out_slow_templates() {
    let config = EngineConfig {
        io_timeout_ms: 60_000,
        request_deadline_ms: 50,
        ..Default::default()
    };
    let engine = FraudEngineBuilder::payment()
        .with_config(config)
        .with_list_service(Arc::new(SlowListService {
            delay: Duration::from_secs(10),
        }))
        .build()
        .await
        .unwrap();

    let batch = engine.compile_templates(&[
        template("slow", r#"rule:grey:inGreyList("email") -> notify;"#),
        template("fast", r#"rule:big:amount() > 100 -> accept;"#),
    ]);
    assert!(batch.errors.is_empty());

    let results = engine
        .evaluate(&batch.templates, &payment("a@x.com", "T1", "P1"))
        .await;

    assert_eq!(results[0].template_id, "slow");
    assert_eq!(results[0].outcome, Outcome::Timeout);
    assert_eq!(results[0].status(), EventStatus::Error);
    assert_eq!(results[1].outcome, matched("big", Action::Accept));
}

#[tokio::test(start_paused = true)]
async fn test_io_timeout_surfaces_as_rule_error() {
    let config = EngineConfig {
        io_timeout_ms: 20,
        request_deadline_ms: 60_000,
        ..Default::default()
    };
    let engine = FraudEngineBuilder::payment()
        .with_config(config)
        .with_list_service(Arc::new(SlowListService {
            delay: Duration::from_secs(10),
        }))
        .build()
        .await
        .unwrap();

    let batch = engine.compile_templates(&[template(
        "slow",
        r#"rule:grey:inGreyList("email") -> notify;"#,
    )]);
    let results = engine
        .evaluate(&batch.templates, &payment("a@x.com", "T1", "P1"))
        .await;

    assert!(results[0].is_error());
    assert_eq!(results[0].rule_id(), Some("grey"));
    assert_eq!(results[0].error_kind(), Some(ErrorKind::Timeout));
}

#[tokio::test]
async fn test_repository_failure_errors_only_the_affected_template() {
    let engine = FraudEngineBuilder::payment()
        .with_repository(Arc::new(FailingRepository))
        .build()
        .await
        .unwrap();

    let batch = engine.compile_templates(&[
        template(
            "velocity",
            r#"rule:big:amount() > 100000 -> decline;
               rule:repeat:count("email", 60) > 3 -> decline;"#,
        ),
        template("amounts", r#"rule:mid:amount() > 100 -> notify;"#),
    ]);
    assert!(batch.errors.is_empty());

    let results = engine
        .evaluate(&batch.templates, &payment("a@x.com", "T1", "P1"))
        .await;

    match &results[0].outcome {
        Outcome::Error {
            rule_id,
            kind,
            message,
        } => {
            assert_eq!(rule_id.as_deref(), Some("repeat"));
            assert_eq!(*kind, ErrorKind::AggregateQuery);
            assert!(message.contains("connection refused"));
        }
        other => panic!("Expected error outcome, got {:?}", other),
    }
    assert_eq!(results[0].trace.len(), 1);
    assert_eq!(results[1].outcome, matched("mid", Action::Notify));
}

#[tokio::test]
async fn test_geo_failure_propagates_when_configured() {
    let config = EngineConfig {
        geo_failure_policy: GeoFailurePolicy::Propagate,
        ..Default::default()
    };
    let engine = FraudEngineBuilder::payment()
        .with_config(config)
        .with_geo_service(Arc::new(UnreachableGeoService))
        .build()
        .await
        .unwrap();

    let batch = engine.compile_templates(&[
        template("geo", r#"rule:ru:in(countryBy("country_ip"), "RUS") -> decline;"#),
        template("bank", r#"rule:arm:in(countryBy("country_bank"), "ARM") -> notify;"#),
    ]);
    let results = engine
        .evaluate(&batch.templates, &payment("a@x.com", "T1", "P1"))
        .await;

    assert_eq!(results[0].rule_id(), Some("ru"));
    assert_eq!(results[0].error_kind(), Some(ErrorKind::GeoServiceUnavailable));
    assert_eq!(results[0].status(), EventStatus::Error);
    assert_eq!(results[1].outcome, matched("arm", Action::Notify));
}

#[tokio::test]
async fn test_geo_failure_reads_as_unknown_country_by_default() {
    let engine = FraudEngineBuilder::payment()
        .with_geo_service(Arc::new(UnreachableGeoService))
        .build()
        .await
        .unwrap();

    let batch = engine.compile_templates(&[template(
        "geo",
        r#"rule:ru:in(countryBy("country_ip"), "RUS") -> decline;
           rule:unknown:in(countryBy("country_ip"), "unknown") -> notify;"#,
    )]);
    let results = engine
        .evaluate(&batch.templates, &payment("a@x.com", "T1", "P1"))
        .await;

    assert_eq!(results[0].outcome, matched("unknown", Action::Notify));
}

#[tokio::test]
async fn test_count_error_by_code_and_refund_history() {
    let test = TestEngine::new().await;
    test.seed(vec![
        past_payment(EventStatus::Error, 100, "a@x.com", "T1", "P1", 5)
            .with_error_code("card_expired"),
        past_payment(EventStatus::Error, 100, "a@x.com", "T1", "P1", 6)
            .with_error_code("insufficient_funds"),
    ])
    .await;
    test.engine
        .record_event(
            past_payment(EventStatus::Accept, 900, "a@x.com", "T1", "P1", 7)
                .with_kind(EventKind::Refund),
        )
        .await
        .unwrap();

    let templates = test.compile(&[
        template(
            "expired",
            r#"rule:expired:countError("email", 1440, "card_expired") = 1 -> decline;"#,
        ),
        template(
            "refunds",
            r#"rule:refunded:sumRefund("card_token", 1440, "party_id") = 900 -> notify;"#,
        ),
        template("ops", r#"rule:ops:count("email", 1440) = 2 -> accept;"#),
    ]);
    let results = test
        .engine
        .evaluate(&templates, &payment("a@x.com", "T1", "P1"))
        .await;

    assert_eq!(results[0].outcome, matched("expired", Action::Decline));
    assert_eq!(results[1].outcome, matched("refunded", Action::Notify));
    assert_eq!(results[2].outcome, matched("ops", Action::Accept));
}

#[tokio::test]
async fn test_errored_decision_is_countable_by_its_kind() {
    let engine = FraudEngineBuilder::payment()
        .with_config(EngineConfig {
            geo_failure_policy: GeoFailurePolicy::Propagate,
            ..Default::default()
        })
        .with_geo_service(Arc::new(UnreachableGeoService))
        .build()
        .await
        .unwrap();
    let batch = engine.compile_templates(&[
        template("geo", r#"rule:ru:in(countryBy("country_ip"), "RUS") -> decline;"#),
        template(
            "geo_errors",
            r#"rule:flaky:countError("email", 60, "geo_service_unavailable") > 0 -> notify;"#,
        ),
    ]);
    let model = payment("a@x.com", "T1", "P1");

    let first = engine.evaluate(&batch.templates, &model).await;
    assert_eq!(first[1].outcome, Outcome::NoMatch);
    engine.record_decision(&model, &first[0]).await.unwrap();

    let second = engine.evaluate(&batch.templates, &model).await;
    assert_eq!(second[1].outcome, matched("flaky", Action::Notify));
}

#[tokio::test]
async fn test_p2p_engine_counts_transfers() {
    let repository = Arc::new(InMemoryEventRepository::new());
    repository
        .insert_batch(vec![
            HistoricalEvent::new("history", EventStatus::Accept, 100)
                .with_attribute("card_token_from", "F1")
                .with_attribute("identity_id", "I1"),
            HistoricalEvent::new("history", EventStatus::Accept, 100)
                .with_attribute("card_token_from", "F1")
                .with_attribute("identity_id", "I2"),
        ])
        .await
        .unwrap();

    let engine = p2p_engine(repository).await;
    let batch = engine.compile_templates(&[
        template(
            "p2p",
            r#"rule:same_identity:count("card_token_from", 60, "identity_id") > 1 -> decline;
               rule:any:count("card_token_from", 60) > 1 -> notify;"#,
        ),
        template("outcome", r#"rule:dfs:countSuccess("email", 60) > 5 -> accept;"#),
    ]);

    assert_eq!(batch.templates.len(), 1);
    assert_eq!(batch.errors.len(), 1);
    assert_eq!(batch.errors[0].id, "outcome");

    let results = engine
        .evaluate(&batch.templates, &transfer("I1", "F1", "T1"))
        .await;
    assert_eq!(results[0].outcome, matched("any", Action::Notify));
}

//! End-to-end negotiation scenarios against mock transport and builder.

use portals_test_utils::{
    body_challenge, header_challenge, ok_response, sample_record, test_negotiator,
    MockPaymentBuilder, MockTransport, API_URL, FOREIGN_TOKEN_ACCOUNT, VAULT_OWNER,
    VAULT_TOKEN_ACCOUNT,
};
use portals_valid::ValidationError;
use portals_x402::{CallStage, NegotiationState, PaymentProof, X402Error};
use serde_json::{json, Value};

use NegotiationState::*;

fn fixed_price_schema(price: f64) -> Value {
    json!({
        "openapi": "3.0.0",
        "paths": {
            "/forecast": {
                "post": {
                    "operationId": "getForecast",
                    "x-portals-pricing": { "type": "fixed", "price": price }
                }
            }
        }
    })
}

// =============================================================================
// Scenario A: no payment needed
// =============================================================================

#[tokio::test]
async fn test_scenario_a_free_call() {
    let transport = MockTransport::new()
        .with_schema(fixed_price_schema(1.50))
        .with_response(ok_response(json!({ "temp": 21 })));
    let builder = MockPaymentBuilder::new();
    let negotiator = test_negotiator(&transport, &builder);

    let outcome = negotiator
        .negotiate(&sample_record(), &json!({ "city": "Lisbon" }), Some("getForecast"))
        .await
        .unwrap();

    assert_eq!(outcome.body, json!({ "temp": 21 }));
    assert!(!outcome.was_paid());
    assert_eq!(outcome.trace, vec![Idle, SchemaLoaded, Done]);
    assert!(!outcome.trace.contains(&ChallengeReceived));
    assert_eq!(builder.build_count(), 0);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].url, "https://weather.example.com/api/forecast");
    assert_eq!(calls[0].params, json!({ "city": "Lisbon" }));
    assert_eq!(calls[0].payment, None);
    assert_eq!(
        transport.schema_requests(),
        vec!["https://weather.example.com/api/openapi.json".to_string()]
    );
}

// =============================================================================
// Scenario B: header challenge, verified, paid, retried
// =============================================================================

#[tokio::test]
async fn test_scenario_b_paid_call() {
    let transport = MockTransport::new()
        .with_schema(fixed_price_schema(1.50))
        .with_response(header_challenge("1.50", VAULT_TOKEN_ACCOUNT))
        .with_response(ok_response(json!({ "forecast": "sunny" })));
    let builder = MockPaymentBuilder::new();
    let negotiator = test_negotiator(&transport, &builder);

    let params = json!({ "city": "Porto" });
    let outcome = negotiator
        .negotiate(&sample_record(), &params, Some("getForecast"))
        .await
        .unwrap();

    assert_eq!(outcome.body, json!({ "forecast": "sunny" }));
    assert_eq!(
        outcome.trace,
        vec![Idle, SchemaLoaded, ChallengeReceived, Parsed, Validated, Paid, Done]
    );

    let receipt = outcome.receipt.unwrap();
    assert_eq!(receipt.amount, 1.5);
    assert_eq!(receipt.currency, "USDC");
    assert_eq!(receipt.chain, "solana");
    assert_eq!(receipt.destination.to_string(), VAULT_TOKEN_ACCOUNT);

    assert_eq!(builder.build_count(), 1);
    let request = &builder.requests()[0];
    assert_eq!(request.destination.to_string(), VAULT_TOKEN_ACCOUNT);
    assert_eq!(request.amount_minor(), 1_500_000);
    assert_eq!(request.fee_payer, None);

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].url, calls[1].url);
    assert_eq!(calls[0].params, calls[1].params);
    assert_eq!(calls[0].payment, None);

    let proof = PaymentProof::from_header(calls[1].payment.as_deref().unwrap()).unwrap();
    assert_eq!(proof.x402_version, 1);
    assert_eq!(proof.scheme, "exact");
    assert_eq!(proof.network, "solana");
    assert_eq!(proof.payload.transaction, "mock-signed-tx-1");
}

#[tokio::test]
async fn test_owner_form_destination_pays_vault() {
    // Registry records the token account; the server names its owner.
    let mut record = sample_record();
    record.payment_vault = VAULT_TOKEN_ACCOUNT.parse().unwrap();

    let transport = MockTransport::new()
        .with_schema(fixed_price_schema(1.50))
        .with_response(header_challenge("1.50", VAULT_OWNER))
        .with_response(ok_response(json!("ok")));
    let builder = MockPaymentBuilder::new();

    let outcome = test_negotiator(&transport, &builder)
        .negotiate(&record, &json!({}), None)
        .await
        .unwrap();

    assert_eq!(
        outcome.receipt.unwrap().destination.to_string(),
        VAULT_TOKEN_ACCOUNT
    );
    assert_eq!(builder.requests()[0].destination.to_string(), VAULT_TOKEN_ACCOUNT);
}

// =============================================================================
// Scenario C: requested price not declared
// =============================================================================

#[tokio::test]
async fn test_scenario_c_pricing_mismatch() {
    let transport = MockTransport::new()
        .with_schema(fixed_price_schema(2.00))
        .with_response(header_challenge("1.50", VAULT_TOKEN_ACCOUNT));
    let builder = MockPaymentBuilder::new();

    let negotiation = test_negotiator(&transport, &builder)
        .negotiate_traced(&sample_record(), &json!({}), Some("getForecast"))
        .await;

    match negotiation.result {
        Err(X402Error::Validation(ValidationError::PricingMismatch { declared, requested })) => {
            assert_eq!(declared, vec![2.0]);
            assert_eq!(requested, 1.5);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        negotiation.trace,
        vec![Idle, SchemaLoaded, ChallengeReceived, Parsed, Done]
    );
    assert_eq!(builder.build_count(), 0);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_price_within_tolerance_is_paid() {
    for requested in ["2.5001", "2.4999"] {
        let transport = MockTransport::new()
            .with_schema(fixed_price_schema(2.50))
            .with_response(header_challenge(requested, VAULT_TOKEN_ACCOUNT))
            .with_response(ok_response(json!({ "ok": true })));
        let builder = MockPaymentBuilder::new();

        let outcome = test_negotiator(&transport, &builder)
            .negotiate(&sample_record(), &json!({}), Some("getForecast"))
            .await
            .unwrap();

        assert!(outcome.was_paid(), "{} should be paid", requested);
        assert_eq!(
            outcome.receipt.unwrap().amount,
            requested.parse::<f64>().unwrap()
        );
        assert_eq!(builder.build_count(), 1);
        assert_eq!(transport.call_count(), 2);
    }
}

#[tokio::test]
async fn test_price_past_tolerance_is_refused() {
    let transport = MockTransport::new()
        .with_schema(fixed_price_schema(2.50))
        .with_response(header_challenge("2.5002", VAULT_TOKEN_ACCOUNT));
    let builder = MockPaymentBuilder::new();

    let err = test_negotiator(&transport, &builder)
        .negotiate(&sample_record(), &json!({}), Some("getForecast"))
        .await
        .unwrap_err();

    assert!(!err.moves_funds());
    match err {
        X402Error::Validation(ValidationError::PricingMismatch { declared, requested }) => {
            assert_eq!(declared, vec![2.5]);
            assert_eq!(requested, 2.5002);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(builder.build_count(), 0);
    assert_eq!(transport.call_count(), 1);
}

// =============================================================================
// Scenario D: body challenge without payTo
// =============================================================================

#[tokio::test]
async fn test_scenario_d_malformed_body_challenge() {
    let transport = MockTransport::new().with_response(portals_x402::ApiResponse::new(
        402,
        json!({ "x402Version": 1, "accepts": [{ "maxAmountRequired": "500000" }] }).to_string(),
    ));
    let builder = MockPaymentBuilder::new();

    let err = test_negotiator(&transport, &builder)
        .negotiate(&sample_record(), &json!({}), None)
        .await
        .unwrap_err();

    assert!(matches!(err, X402Error::MalformedChallenge { .. }));
    assert!(!err.moves_funds());
    assert_eq!(builder.build_count(), 0);
}

// =============================================================================
// Scenario E: second challenge after payment
// =============================================================================

#[tokio::test]
async fn test_scenario_e_second_challenge_is_terminal() {
    let transport = MockTransport::new()
        .with_schema(fixed_price_schema(1.50))
        .with_response(header_challenge("1.50", VAULT_TOKEN_ACCOUNT))
        .with_response(header_challenge("1.50", VAULT_TOKEN_ACCOUNT))
        .with_response(ok_response(json!("never served")));
    let builder = MockPaymentBuilder::new();

    let negotiation = test_negotiator(&transport, &builder)
        .negotiate_traced(&sample_record(), &json!({}), None)
        .await;

    let err = negotiation.result.unwrap_err();
    assert!(matches!(
        err,
        X402Error::UnexpectedStatus {
            status: 402,
            stage: CallStage::AfterPayment
        }
    ));
    assert!(err.to_string().contains("failed after payment"));
    assert!(err.moves_funds());

    assert_eq!(builder.build_count(), 1);
    assert_eq!(transport.call_count(), 2);
    assert_eq!(transport.remaining_responses(), 1);
    assert_eq!(
        negotiation.trace,
        vec![Idle, SchemaLoaded, ChallengeReceived, Parsed, Validated, Paid, Done]
    );
}

// =============================================================================
// Other failure paths
// =============================================================================

#[tokio::test]
async fn test_destination_mismatch_blocks_payment() {
    let transport = MockTransport::new()
        .with_schema(fixed_price_schema(1.50))
        .with_response(header_challenge("1.50", FOREIGN_TOKEN_ACCOUNT));
    let builder = MockPaymentBuilder::new();

    let err = test_negotiator(&transport, &builder)
        .negotiate(&sample_record(), &json!({}), None)
        .await
        .unwrap_err();

    match err {
        X402Error::Validation(ValidationError::PaymentAddressMismatch { expected, received }) => {
            assert_eq!(expected, VAULT_TOKEN_ACCOUNT);
            assert_eq!(received, FOREIGN_TOKEN_ACCOUNT);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(builder.build_count(), 0);
}

#[tokio::test]
async fn test_amount_bounds_checked_before_prices() {
    let transport = MockTransport::new()
        .with_schema(fixed_price_schema(25.0))
        .with_response(header_challenge("25", VAULT_TOKEN_ACCOUNT));
    let builder = MockPaymentBuilder::new();

    let err = test_negotiator(&transport, &builder)
        .negotiate(&sample_record(), &json!({}), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        X402Error::Validation(ValidationError::AmountTooHigh { .. })
    ));
    assert_eq!(builder.build_count(), 0);
}

#[tokio::test]
async fn test_unparsable_header_amount_is_invalid() {
    let transport = MockTransport::new()
        .with_response(header_challenge("one dollar", VAULT_TOKEN_ACCOUNT));
    let builder = MockPaymentBuilder::new();

    let err = test_negotiator(&transport, &builder)
        .negotiate(&sample_record(), &json!({}), None)
        .await
        .unwrap_err();

    match err {
        X402Error::Validation(ValidationError::InvalidAmount { amount }) => assert!(amount.is_nan()),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_body_challenge_with_fee_payer() {
    let fee_payer = "3JF3sEqM796hk5WFqA6EtmEwJQ9quALszsfJyvXNQKy3";
    let transport = MockTransport::new()
        .with_response(body_challenge("50000", VAULT_TOKEN_ACCOUNT, Some(fee_payer)))
        .with_response(ok_response(json!({ "ok": true })));
    let builder = MockPaymentBuilder::new();

    let outcome = test_negotiator(&transport, &builder)
        .negotiate(&sample_record(), &json!({}), None)
        .await
        .unwrap();

    // No declared prices: any in-bounds amount is accepted.
    let receipt = outcome.receipt.unwrap();
    assert_eq!(receipt.amount, 0.05);
    assert_eq!(receipt.fee_payer.map(|a| a.to_string()).as_deref(), Some(fee_payer));
    assert_eq!(
        builder.requests()[0].fee_payer.map(|a| a.to_string()).as_deref(),
        Some(fee_payer)
    );
}

#[tokio::test]
async fn test_insufficient_funds_surfaced_unchanged() {
    let transport = MockTransport::new()
        .with_schema(fixed_price_schema(1.50))
        .with_response(header_challenge("1.50", VAULT_TOKEN_ACCOUNT));
    let builder = MockPaymentBuilder::new().with_balance(1.0);

    let err = test_negotiator(&transport, &builder)
        .negotiate(&sample_record(), &json!({}), None)
        .await
        .unwrap_err();

    match err {
        X402Error::InsufficientFunds { required, available } => {
            assert_eq!(required, 1.5);
            assert_eq!(available, 1.0);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_builder_failure_stops_before_retry() {
    let transport = MockTransport::new()
        .with_schema(fixed_price_schema(1.50))
        .with_response(header_challenge("1.50", VAULT_TOKEN_ACCOUNT));
    let builder = MockPaymentBuilder::new().with_failure();

    let err = test_negotiator(&transport, &builder)
        .negotiate(&sample_record(), &json!({}), None)
        .await
        .unwrap_err();

    assert!(matches!(err, X402Error::PaymentBuild { .. }));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_unexpected_initial_status() {
    let transport = MockTransport::new().with_response(portals_x402::ApiResponse::new(500, "boom"));
    let builder = MockPaymentBuilder::new();

    let err = test_negotiator(&transport, &builder)
        .negotiate(&sample_record(), &json!({}), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        X402Error::UnexpectedStatus {
            status: 500,
            stage: CallStage::Initial
        }
    ));
    assert!(!err.moves_funds());
}

#[tokio::test]
async fn test_schema_failure_stops_before_call() {
    let transport = MockTransport::new().with_schema_failure("status 404");
    let builder = MockPaymentBuilder::new();

    let err = test_negotiator(&transport, &builder)
        .negotiate(&sample_record(), &json!({}), None)
        .await
        .unwrap_err();

    match err {
        X402Error::SchemaUnavailable { url, reason } => {
            assert_eq!(url, format!("{}/openapi.json", API_URL));
            assert!(reason.contains("404"));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_tool_calls_base_url() {
    let transport = MockTransport::new()
        .with_schema(fixed_price_schema(1.50))
        .with_response(ok_response(json!(1)));
    let builder = MockPaymentBuilder::new();

    test_negotiator(&transport, &builder)
        .negotiate(&sample_record(), &json!({}), Some("noSuchTool"))
        .await
        .unwrap();

    assert_eq!(transport.calls()[0].url, API_URL);
}

#[tokio::test]
async fn test_suspended_record_still_called() {
    let mut record = sample_record();
    record.suspended = true;

    let transport = MockTransport::new().with_response(ok_response(json!("ok")));
    let builder = MockPaymentBuilder::new();

    let outcome = test_negotiator(&transport, &builder)
        .negotiate(&record, &json!({}), None)
        .await
        .unwrap();
    assert_eq!(outcome.body, json!("ok"));
}

#[tokio::test]
async fn test_text_body_returned_as_string() {
    let transport = MockTransport::new().with_response(portals_x402::ApiResponse::new(200, "plain"));
    let builder = MockPaymentBuilder::new();

    let outcome = test_negotiator(&transport, &builder)
        .negotiate(&sample_record(), &json!({}), None)
        .await
        .unwrap();
    assert_eq!(outcome.body, Value::String("plain".into()));
}

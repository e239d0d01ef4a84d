//! Workflow lifecycle tests
//!
//! Drives the full asset lifecycle through the engine the way the three
//! organizations would: registration, a ride with an issue and refund, and
//! a complete repair round-trip.

use serde_json::Value;

use bsn_gateway::network::Org;
use bsn_gateway::workflow::{Caller, WorkflowEngine, WorkflowError};

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn query(engine: &WorkflowEngine, caller: &Caller, function: &str, arguments: &[&str]) -> Value {
    let text = engine.invoke(caller, function, &args(arguments)).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn full_ride_issue_and_refund_flow() {
    let engine = WorkflowEngine::in_memory(false);
    let user = Caller::member_of(Org::User);
    let provider = Caller::member_of(Org::Provider);

    engine
        .invoke(&user, "registerUser", &args(&["alice", "10000"]))
        .unwrap();
    engine
        .invoke(&provider, "registerBike", &args(&["b1"]))
        .unwrap();

    // Ride starts at a location; the bike follows the rider
    engine
        .invoke(&user, "startRide", &args(&["alice", "b1", "13.40", "52.52"]))
        .unwrap();

    let bikes = query(&engine, &provider, "getBikesByStatus", &["inUse"]);
    assert_eq!(bikes.as_array().unwrap().len(), 1);
    assert_eq!(bikes[0]["Value"]["id"], "b1");
    assert_eq!(bikes[0]["Value"]["location"][0].as_f64().unwrap() as f32, 13.40);

    engine
        .invoke(&user, "endRide", &args(&["alice", "b1", "13.41", "52.53"]))
        .unwrap();

    let rides = query(&engine, &provider, "getRidesByUser", &["alice"]);
    let ride = &rides[0]["Value"];
    let ride_id = ride["id"].as_str().unwrap().to_string();
    assert_eq!(ride["status"], "completed");
    assert_eq!(ride["bikeId"], "b1");
    assert!(!ride["endTime"].as_str().unwrap().is_empty());

    // The rider disputes the ride; accepting the issue refunds the cost
    engine
        .invoke(&user, "reportIssue", &args(&["alice", &ride_id]))
        .unwrap();

    let issues = query(&engine, &provider, "getIssueByRide", &[&ride_id]);
    let issue_id = issues[0]["Value"]["id"].as_str().unwrap().to_string();
    assert_eq!(issues[0]["Value"]["status"], "open");

    engine
        .invoke(&provider, "acceptIssue", &args(&[&issue_id]))
        .unwrap();

    let users = query(&engine, &provider, "getUsers", &[]);
    let balance = users[0]["Value"]["balance"].as_f64().unwrap();
    assert!((balance - 10000.0).abs() < 0.01);

    let rides = query(&engine, &provider, "getRidesByStatus", &["issueClosed"]);
    assert_eq!(rides[0]["Value"]["cost"].as_f64().unwrap(), 0.0);

    // A closed issue cannot be accepted again
    let err = engine
        .invoke(&provider, "acceptIssue", &args(&[&issue_id]))
        .unwrap_err();
    assert_eq!(err.to_string(), format!("Issue {} not open.", issue_id));
}

#[test]
fn full_repair_round_trip() {
    let engine = WorkflowEngine::in_memory(false);
    let provider = Caller::member_of(Org::Provider);
    let repairer = Caller::member_of(Org::Repairer);

    engine
        .invoke(&provider, "registerBike", &args(&["b7"]))
        .unwrap();
    engine
        .invoke(&repairer, "registerRepairer", &args(&["bob"]))
        .unwrap();

    let message = engine
        .invoke(&provider, "requestRepair", &args(&["b7", "bob"]))
        .unwrap();
    let repair_id = message
        .strip_prefix("Repair ")
        .unwrap()
        .strip_suffix(" requested.")
        .unwrap()
        .to_string();

    // Queued bikes cannot be rented or discarded
    let err = engine
        .invoke(&provider, "discardBike", &args(&["b7"]))
        .unwrap_err();
    assert_eq!(err.to_string(), "Bike b7 not available.");

    engine
        .invoke(&repairer, "acceptRepair", &args(&["bob", &repair_id]))
        .unwrap();

    let repairs = query(&engine, &repairer, "getRepairsByRepairer", &["bob"]);
    assert_eq!(repairs[0]["Value"]["status"], "accepted");

    engine
        .invoke(&repairer, "completeRepair", &args(&["bob", &repair_id]))
        .unwrap();

    // Completed repairs cannot complete twice
    let err = engine
        .invoke(&repairer, "completeRepair", &args(&["bob", &repair_id]))
        .unwrap_err();
    assert_eq!(err.to_string(), format!("Repair {} not accepted.", repair_id));

    engine
        .invoke(&provider, "reactivateBike", &args(&["b7"]))
        .unwrap();

    let bikes = query(&engine, &provider, "getBikesByStatus", &["available"]);
    assert_eq!(bikes[0]["Value"]["id"], "b7");
}

#[test]
fn org_gates_hold_across_roles() {
    let engine = WorkflowEngine::in_memory(false);
    let user = Caller::member_of(Org::User);
    let provider = Caller::member_of(Org::Provider);
    let repairer = Caller::member_of(Org::Repairer);

    // Registration operations are bound to their own org
    assert!(matches!(
        engine
            .invoke(&provider, "registerUser", &args(&["alice", "10000"]))
            .unwrap_err(),
        WorkflowError::AccessDenied(_)
    ));
    assert!(matches!(
        engine
            .invoke(&user, "registerRepairer", &args(&["bob"]))
            .unwrap_err(),
        WorkflowError::AccessDenied(_)
    ));
    assert!(matches!(
        engine
            .invoke(&repairer, "registerBike", &args(&["b1"]))
            .unwrap_err(),
        WorkflowError::AccessDenied(_)
    ));

    // Location updates stay provider-only even though every menu offers them
    engine
        .invoke(&provider, "registerBike", &args(&["b1"]))
        .unwrap();
    let err = engine
        .invoke(&user, "updateBikeLocation", &args(&["b1", "1", "2"]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Caller not a member of Provider Org. Access denied."
    );

    // Status queries are open to the orgs that need them
    assert!(engine
        .invoke(&user, "getBikesByStatus", &args(&["available"]))
        .is_ok());
    assert!(engine
        .invoke(&repairer, "getBikesByStatus", &args(&["available"]))
        .is_ok());
    assert!(engine
        .invoke(&repairer, "getRidesByStatus", &args(&["ongoing"]))
        .is_err());
}

#[test]
fn query_envelope_matches_ledger_shape() {
    let engine = WorkflowEngine::in_memory(false);
    let provider = Caller::member_of(Org::Provider);

    engine
        .invoke(&provider, "registerBike", &args(&["b1"]))
        .unwrap();
    engine
        .invoke(&provider, "registerBike", &args(&["b2"]))
        .unwrap();

    let bikes = query(&engine, &provider, "getBikes", &[]);
    let rows = bikes.as_array().unwrap();
    assert_eq!(rows.len(), 2);

    // Each row is a {Key, Value} record keyed by the composite key
    for row in rows {
        assert!(row["Key"].as_str().unwrap().starts_with("bike\u{0}"));
        assert_eq!(row["Value"]["docType"], "bike");
    }

    // Unknown status values match nothing rather than failing
    let empty = query(&engine, &provider, "getBikesByStatus", &["melted"]);
    assert!(empty.as_array().unwrap().is_empty());
}

#[test]
fn ride_rejects_broke_and_busy_riders() {
    let engine = WorkflowEngine::in_memory(false);
    let user = Caller::member_of(Org::User);
    let provider = Caller::member_of(Org::Provider);

    engine
        .invoke(&user, "registerUser", &args(&["poor", "0"]))
        .unwrap();
    engine
        .invoke(&provider, "registerBike", &args(&["b1"]))
        .unwrap();

    let err = engine
        .invoke(&user, "startRide", &args(&["poor", "b1", "0", "0"]))
        .unwrap_err();
    assert_eq!(err.to_string(), "User poor has negative balance.");

    let err = engine
        .invoke(&user, "startRide", &args(&["ghost", "b1", "0", "0"]))
        .unwrap_err();
    assert_eq!(err.to_string(), "User ghost not found.");
}

//! Console dispatch tests
//!
//! Checks the role menu tables and the dispatch rule against the operations
//! the workflow engine actually serves.

use bsn_gateway::console::{find, menu, method_for, HttpMethod};
use bsn_gateway::network::Org;
use bsn_gateway::workflow::{Caller, WorkflowEngine, WorkflowError};

#[test]
fn every_menu_operation_exists_in_the_workflow() {
    // Dev mode bypasses the org gates so the dispatch itself is what fails
    let engine = WorkflowEngine::in_memory(true);
    let caller = Caller::member_of(Org::Provider);

    for org in [Org::User, Org::Provider, Org::Repairer] {
        for op in menu(org) {
            let placeholder_args: Vec<String> = op
                .hint
                .split_whitespace()
                .map(|s| s.to_string())
                .collect();

            let result = engine.invoke(&caller, op.name, &placeholder_args);
            assert!(
                !matches!(result, Err(WorkflowError::UnknownFunction(_))),
                "menu operation {} is not served by the workflow",
                op.name
            );
            assert!(
                !matches!(result, Err(WorkflowError::Arity { .. })),
                "menu hint for {} does not match the operation arity",
                op.name
            );
        }
    }
}

#[test]
fn queries_dispatch_as_get_and_mutations_as_post() {
    for org in [Org::User, Org::Provider, Org::Repairer] {
        for op in menu(org) {
            let expected = if op.name.starts_with("get") {
                HttpMethod::Get
            } else {
                HttpMethod::Post
            };
            assert_eq!(method_for(op.name), expected);
        }
    }
}

#[test]
fn get_operations_carry_at_most_one_argument() {
    // GET requests put a single argument in the query string, so every
    // query on a menu must need no more than one
    for org in [Org::User, Org::Provider, Org::Repairer] {
        for op in menu(org) {
            if method_for(op.name) == HttpMethod::Get {
                assert!(
                    op.hint.split_whitespace().count() <= 1,
                    "query {} would need more than one argument",
                    op.name
                );
            }
        }
    }
}

#[test]
fn role_menus_match_role_duties() {
    // Riders manage rides and issues
    assert!(find(Org::User, "startRide").is_some());
    assert!(find(Org::User, "reportIssue").is_some());
    assert!(find(Org::User, "acceptIssue").is_none());

    // Providers manage the fleet and arbitrate issues
    assert!(find(Org::Provider, "registerBike").is_some());
    assert!(find(Org::Provider, "acceptIssue").is_some());
    assert!(find(Org::Provider, "requestRepair").is_some());
    assert!(find(Org::Provider, "acceptRepair").is_none());

    // Repairers answer repair requests
    assert!(find(Org::Repairer, "acceptRepair").is_some());
    assert!(find(Org::Repairer, "completeRepair").is_some());
    assert!(find(Org::Repairer, "registerBike").is_none());
}

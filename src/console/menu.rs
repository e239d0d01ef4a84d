//! Role console operation menus
//!
//! The (role, operation) table the console offers, with positional-argument
//! hints, plus the dispatch rule mapping an operation onto an HTTP method.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::network::Org;

/// One console operation with its argument hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Chaincode function name
    pub name: &'static str,

    /// Space-separated positional argument placeholders, empty when none
    pub hint: &'static str,
}

/// Operations offered to user-org operators
pub const USER_MENU: &[Operation] = &[
    Operation { name: "getUsers", hint: "" },
    Operation { name: "getBikes", hint: "" },
    Operation { name: "updateBikeLocation", hint: "BIKE_ID LONGITUDE LATITUDE" },
    Operation { name: "startRide", hint: "USER_ID BIKE_ID LONGITUDE LATITUDE" },
    Operation { name: "endRide", hint: "USER_ID BIKE_ID LONGITUDE LATITUDE" },
    Operation { name: "reportIssue", hint: "USER_ID RIDE_ID" },
];

/// Operations offered to provider-org operators
pub const PROVIDER_MENU: &[Operation] = &[
    Operation { name: "getUsers", hint: "" },
    Operation { name: "getRepairers", hint: "" },
    Operation { name: "getBikes", hint: "" },
    Operation { name: "getBikeById", hint: "BIKE_ID" },
    Operation { name: "getBikesByStatus", hint: "BIKE_STATUS" },
    Operation { name: "getRides", hint: "" },
    Operation { name: "getRideById", hint: "RIDE_ID" },
    Operation { name: "getRidesByUser", hint: "USER_ID" },
    Operation { name: "getRidesByBike", hint: "BIKE_ID" },
    Operation { name: "getRidesByStatus", hint: "RIDE_STATUS" },
    Operation { name: "getIssues", hint: "" },
    Operation { name: "getIssueById", hint: "ISSUE_ID" },
    Operation { name: "getIssuesByUser", hint: "USER_ID" },
    Operation { name: "getIssuesByBike", hint: "BIKE_ID" },
    Operation { name: "getIssueByRide", hint: "RIDE_ID" },
    Operation { name: "getIssuesByStatus", hint: "ISSUE_STATUS" },
    Operation { name: "getRepairs", hint: "" },
    Operation { name: "getRepairById", hint: "REPAIR_ID" },
    Operation { name: "getRepairsByBike", hint: "BIKE_ID" },
    Operation { name: "getRepairsByRepairer", hint: "REPAIRER_ID" },
    Operation { name: "getRepairsByStatus", hint: "REPAIR_STATUS" },
    Operation { name: "registerBike", hint: "BIKE_ID" },
    Operation { name: "reactivateBike", hint: "BIKE_ID" },
    Operation { name: "discardBike", hint: "BIKE_ID" },
    Operation { name: "updateBikeLocation", hint: "BIKE_ID LONGITUDE LATITUDE" },
    Operation { name: "acceptIssue", hint: "ISSUE_ID" },
    Operation { name: "rejectIssue", hint: "ISSUE_ID" },
    Operation { name: "requestRepair", hint: "BIKE_ID REPAIRER_ID" },
];

/// Operations offered to repairer-org operators
pub const REPAIRER_MENU: &[Operation] = &[
    Operation { name: "getRepairers", hint: "" },
    Operation { name: "getIssues", hint: "" },
    Operation { name: "getIssueById", hint: "ISSUE_ID" },
    Operation { name: "getIssuesByUser", hint: "USER_ID" },
    Operation { name: "getIssuesByBike", hint: "BIKE_ID" },
    Operation { name: "getIssueByRide", hint: "RIDE_ID" },
    Operation { name: "getIssuesByStatus", hint: "ISSUE_STATUS" },
    Operation { name: "getRepairs", hint: "" },
    Operation { name: "getRepairById", hint: "REPAIR_ID" },
    Operation { name: "getRepairsByBike", hint: "BIKE_ID" },
    Operation { name: "getRepairsByRepairer", hint: "REPAIRER_ID" },
    Operation { name: "getRepairsByStatus", hint: "REPAIR_STATUS" },
    Operation { name: "updateBikeLocation", hint: "BIKE_ID LONGITUDE LATITUDE" },
    Operation { name: "acceptRepair", hint: "REPAIRER_ID REPAIR_ID" },
    Operation { name: "rejectRepair", hint: "REPAIRER_ID REPAIR_ID" },
    Operation { name: "completeRepair", hint: "REPAIRER_ID REPAIR_ID" },
];

static OPERATIONS: Lazy<HashMap<(Org, &'static str), &'static Operation>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for (org, menu) in [
        (Org::User, USER_MENU),
        (Org::Provider, PROVIDER_MENU),
        (Org::Repairer, REPAIRER_MENU),
    ] {
        for op in menu {
            table.insert((org, op.name), op);
        }
    }
    table
});

/// Menu for one role
pub fn menu(org: Org) -> &'static [Operation] {
    match org {
        Org::User => USER_MENU,
        Org::Provider => PROVIDER_MENU,
        Org::Repairer => REPAIRER_MENU,
    }
}

/// Look up an operation on a role's menu
pub fn find(org: Org, name: &str) -> Option<&'static Operation> {
    OPERATIONS.get(&(org, name)).copied()
}

/// HTTP method an operation dispatches with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Dispatch rule: `get*` operations are queries and go out as GET
pub fn method_for(name: &str) -> HttpMethod {
    if name.starts_with("get") {
        HttpMethod::Get
    } else {
        HttpMethod::Post
    }
}

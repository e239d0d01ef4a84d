//! Workflow engine
//!
//! Executes the bike-share business logic against a [`StateStore`]: identity
//! registration, the ride lifecycle, the issue/refund flow, the repair flow,
//! and the read-only queries the role console offers. Every operation takes
//! positional string arguments and is gated on the caller's organization,
//! checked against the MSP id and CA issuer the organization enrolls under.

use std::sync::RwLock;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::network::Org;

use super::assets::{
    Bike, BikeStatus, DocType, Issue, IssueStatus, Repair, RepairStatus, Repairer, Ride,
    RideStatus, User, UserStatus,
};
use super::error::{AssetKind, WorkflowError, WorkflowResult};
use super::state::{composite_key, doc_type_prefix, MemoryStateStore, StateStore};

/// Per-ride price in balance units per elapsed minute
const COST_PER_MINUTE: f32 = 0.1;

/// Transaction creator identity as the ledger would report it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// MSP identifier of the creator's organization
    pub msp_id: String,

    /// Common name of the CA that issued the creator's certificate
    pub ca_issuer: String,
}

impl Caller {
    /// Caller enrolled as a member of `org`
    pub fn member_of(org: Org) -> Self {
        Self {
            msp_id: org.msp_id().to_string(),
            ca_issuer: org.ca_issuer().to_string(),
        }
    }

    fn is_member_of(&self, org: Org) -> bool {
        self.msp_id == org.msp_id() && self.ca_issuer == org.ca_issuer()
    }
}

/// Workflow engine over a pluggable state store
pub struct WorkflowEngine {
    store: RwLock<Box<dyn StateStore>>,
    dev_mode: bool,
}

impl WorkflowEngine {
    /// Create an engine over an existing store
    ///
    /// With `dev_mode` set, organization gates are skipped entirely.
    pub fn new(store: Box<dyn StateStore>, dev_mode: bool) -> Self {
        Self {
            store: RwLock::new(store),
            dev_mode,
        }
    }

    /// Engine backed by a fresh in-memory store
    pub fn in_memory(dev_mode: bool) -> Self {
        Self::new(Box::new(MemoryStateStore::new()), dev_mode)
    }

    /// Whether a function name refers to a read-only query
    pub fn is_query(function: &str) -> bool {
        function.starts_with("get")
    }

    /// Execute one workflow operation
    ///
    /// Mutations return a confirmation message; queries return the JSON
    /// array of `{"Key", "Value"}` records as text.
    pub fn invoke(&self, caller: &Caller, function: &str, args: &[String]) -> WorkflowResult<String> {
        log::debug!("Workflow invoke: {} ({} args)", function, args.len());

        match function {
            "registerUser" => self.register_user(caller, args),
            "registerRepairer" => self.register_repairer(caller, args),
            "registerBike" => self.register_bike(caller, args),
            "reactivateBike" => self.reactivate_bike(caller, args),
            "discardBike" => self.discard_bike(caller, args),
            "updateBikeLocation" => self.update_bike_location(caller, args),
            "startRide" => self.start_ride(caller, args),
            "endRide" => self.end_ride(caller, args),
            "reportIssue" => self.report_issue(caller, args),
            "acceptIssue" => self.accept_issue(caller, args),
            "rejectIssue" => self.reject_issue(caller, args),
            "requestRepair" => self.request_repair(caller, args),
            "acceptRepair" => self.accept_repair(caller, args),
            "rejectRepair" => self.reject_repair(caller, args),
            "completeRepair" => self.complete_repair(caller, args),
            "getUsers" => {
                self.require_member(caller, &[Org::User, Org::Provider])?;
                self.expect_args(args, 0, "")?;
                self.query(DocType::User, |_| true)
            }
            "getRepairers" => {
                self.require_member(caller, &[Org::Provider, Org::Repairer])?;
                self.expect_args(args, 0, "")?;
                self.query(DocType::Repairer, |_| true)
            }
            "getBikes" => {
                self.require_member(caller, &[Org::User, Org::Provider])?;
                self.expect_args(args, 0, "")?;
                self.query(DocType::Bike, |_| true)
            }
            "getBikeById" => {
                self.require_member(caller, &[Org::Provider])?;
                let id = self.expect_one(args, "Bike ID")?;
                self.query(DocType::Bike, |doc| doc["id"] == *id)
            }
            "getBikesByStatus" => {
                self.require_member(caller, &[Org::User, Org::Repairer, Org::Provider])?;
                let status = self.expect_one(args, "Status")?;
                self.query(DocType::Bike, |doc| doc["status"] == *status)
            }
            "getRides" => {
                self.require_member(caller, &[Org::Provider])?;
                self.expect_args(args, 0, "")?;
                self.query(DocType::Ride, |_| true)
            }
            "getRideById" => {
                self.require_member(caller, &[Org::Provider])?;
                let id = self.expect_one(args, "Ride ID")?;
                self.query(DocType::Ride, |doc| doc["id"] == *id)
            }
            "getRidesByUser" => {
                self.require_member(caller, &[Org::Provider])?;
                let user_id = self.expect_one(args, "User ID")?;
                self.query(DocType::Ride, |doc| doc["userId"] == *user_id)
            }
            "getRidesByBike" => {
                self.require_member(caller, &[Org::Provider])?;
                let bike_id = self.expect_one(args, "Bike ID")?;
                self.query(DocType::Ride, |doc| doc["bikeId"] == *bike_id)
            }
            "getRidesByStatus" => {
                self.require_member(caller, &[Org::User, Org::Provider])?;
                let status = self.expect_one(args, "Status")?;
                self.query(DocType::Ride, |doc| doc["status"] == *status)
            }
            "getIssues" => {
                self.require_member(caller, &[Org::Provider, Org::Repairer])?;
                self.expect_args(args, 0, "")?;
                self.query(DocType::Issue, |_| true)
            }
            "getIssueById" => {
                self.require_member(caller, &[Org::Provider, Org::Repairer])?;
                let id = self.expect_one(args, "Issue ID")?;
                self.query(DocType::Issue, |doc| doc["id"] == *id)
            }
            "getIssuesByUser" => {
                self.require_member(caller, &[Org::Provider, Org::Repairer])?;
                let user_id = self.expect_one(args, "User ID")?;
                self.query(DocType::Issue, |doc| doc["userId"] == *user_id)
            }
            "getIssuesByBike" => {
                self.require_member(caller, &[Org::Provider, Org::Repairer])?;
                let bike_id = self.expect_one(args, "Bike ID")?;
                self.query(DocType::Issue, |doc| doc["bikeId"] == *bike_id)
            }
            "getIssueByRide" => {
                self.require_member(caller, &[Org::Provider, Org::Repairer])?;
                let ride_id = self.expect_one(args, "Ride ID")?;
                self.query(DocType::Issue, |doc| doc["rideId"] == *ride_id)
            }
            "getIssuesByStatus" => {
                self.require_member(caller, &[Org::User, Org::Provider, Org::Repairer])?;
                let status = self.expect_one(args, "Status")?;
                self.query(DocType::Issue, |doc| doc["status"] == *status)
            }
            "getRepairs" => {
                self.require_member(caller, &[Org::Provider, Org::Repairer])?;
                self.expect_args(args, 0, "")?;
                self.query(DocType::Repair, |_| true)
            }
            "getRepairById" => {
                self.require_member(caller, &[Org::Provider, Org::Repairer])?;
                let id = self.expect_one(args, "Repair ID")?;
                self.query(DocType::Repair, |doc| doc["id"] == *id)
            }
            "getRepairsByBike" => {
                self.require_member(caller, &[Org::Provider, Org::Repairer])?;
                let bike_id = self.expect_one(args, "Bike ID")?;
                self.query(DocType::Repair, |doc| doc["bikeId"] == *bike_id)
            }
            "getRepairsByRepairer" => {
                self.require_member(caller, &[Org::Provider, Org::Repairer])?;
                let repairer_id = self.expect_one(args, "Repairer ID")?;
                self.query(DocType::Repair, |doc| doc["repairerId"] == *repairer_id)
            }
            "getRepairsByStatus" => {
                self.require_member(caller, &[Org::Provider, Org::Repairer])?;
                let status = self.expect_one(args, "Status")?;
                self.query(DocType::Repair, |doc| doc["status"] == *status)
            }
            _ => Err(WorkflowError::UnknownFunction(function.to_string())),
        }
    }

    // Register a user
    fn register_user(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::User])?;
        self.expect_args(args, 2, "User ID, Balance")?;

        let balance: f32 = args[1]
            .parse()
            .map_err(|e| WorkflowError::InvalidArgument(format!("Invalid balance: {}", e)))?;

        let mut store = self.write_store()?;
        if read_doc::<User>(&**store, DocType::User, &args[0])?.is_some() {
            return Err(WorkflowError::Duplicate {
                kind: AssetKind::User,
                id: args[0].clone(),
                verb: "registered",
            });
        }

        let user = User::new(&args[0], balance);
        write_doc(&mut **store, DocType::User, &user.id, &user)?;
        log::info!("User {} registered.", user.id);

        Ok(format!("User {} registered.", user.id))
    }

    // Register a repairer
    fn register_repairer(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::Repairer])?;
        self.expect_args(args, 1, "Repairer ID")?;

        let mut store = self.write_store()?;
        if read_doc::<Repairer>(&**store, DocType::Repairer, &args[0])?.is_some() {
            return Err(WorkflowError::Duplicate {
                kind: AssetKind::Repairer,
                id: args[0].clone(),
                verb: "registered",
            });
        }

        let repairer = Repairer::new(&args[0]);
        write_doc(&mut **store, DocType::Repairer, &repairer.id, &repairer)?;
        log::info!("Repairer {} registered.", repairer.id);

        Ok(format!("Repairer {} registered.", repairer.id))
    }

    // Register a bike
    fn register_bike(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::Provider])?;
        self.expect_args(args, 1, "Bike ID")?;

        let mut store = self.write_store()?;
        if read_doc::<Bike>(&**store, DocType::Bike, &args[0])?.is_some() {
            return Err(WorkflowError::Duplicate {
                kind: AssetKind::Bike,
                id: args[0].clone(),
                verb: "registered",
            });
        }

        let bike = Bike::new(&args[0]);
        write_doc(&mut **store, DocType::Bike, &bike.id, &bike)?;
        log::info!("Bike {} registered.", bike.id);

        Ok(format!("Bike {} registered.", bike.id))
    }

    // Reactivate a bike after a repair round-trip
    fn reactivate_bike(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::Provider])?;
        self.expect_args(args, 1, "Bike ID")?;

        let mut store = self.write_store()?;
        let mut bike = require_doc::<Bike>(&**store, DocType::Bike, AssetKind::Bike, &args[0])?;

        match bike.status {
            BikeStatus::Discarded => {
                return Err(WorkflowError::Conflict(format!("Bike {} discarded.", bike.id)))
            }
            BikeStatus::Repairing => {
                return Err(WorkflowError::Conflict(format!("Bike {} repairing.", bike.id)))
            }
            BikeStatus::ToRepair | BikeStatus::Repaired => {}
            _ => return Err(WorkflowError::Conflict(format!("Bike {} active.", bike.id))),
        }

        bike.status = BikeStatus::Available;
        write_doc(&mut **store, DocType::Bike, &bike.id, &bike)?;
        log::info!("Bike {} reactivated.", bike.id);

        Ok(format!("Bike {} reactivated.", bike.id))
    }

    // Discard a bike
    fn discard_bike(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::Provider])?;
        self.expect_args(args, 1, "Bike ID")?;

        let mut store = self.write_store()?;
        let mut bike = require_doc::<Bike>(&**store, DocType::Bike, AssetKind::Bike, &args[0])?;

        if bike.status != BikeStatus::Available {
            return Err(WorkflowError::Conflict(format!("Bike {} not available.", bike.id)));
        }

        bike.status = BikeStatus::Discarded;
        write_doc(&mut **store, DocType::Bike, &bike.id, &bike)?;
        log::info!("Bike {} discarded.", bike.id);

        Ok(format!("Bike {} discarded.", bike.id))
    }

    // Update the location of a bike
    fn update_bike_location(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::Provider])?;
        self.expect_args(args, 3, "Bike ID, Longitude, Latitude")?;

        let location = parse_location(&args[1], &args[2])?;

        let mut store = self.write_store()?;
        let mut bike = require_doc::<Bike>(&**store, DocType::Bike, AssetKind::Bike, &args[0])?;

        if bike.status == BikeStatus::Discarded {
            return Err(WorkflowError::Conflict(format!(
                "Bike {} already discarded.",
                bike.id
            )));
        }

        bike.location = location.to_vec();
        write_doc(&mut **store, DocType::Bike, &bike.id, &bike)?;
        log::info!("The location of bike {} updated.", bike.id);

        Ok(format!("The location of bike {} updated.", bike.id))
    }

    // Start a ride: user goes in-ride, bike goes in-use
    fn start_ride(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::User])?;
        self.expect_args(args, 4, "User ID, Bike ID, Longitude, Latitude")?;

        let location = parse_location(&args[2], &args[3])?;

        let mut store = self.write_store()?;
        let mut user = require_doc::<User>(&**store, DocType::User, AssetKind::User, &args[0])?;

        if user.status != UserStatus::Free {
            return Err(WorkflowError::Conflict(format!(
                "User {} has another ongoing ride.",
                user.id
            )));
        }
        if user.balance <= 0.0 {
            return Err(WorkflowError::Conflict(format!(
                "User {} has negative balance.",
                user.id
            )));
        }

        let mut bike = require_doc::<Bike>(&**store, DocType::Bike, AssetKind::Bike, &args[1])?;
        if bike.status != BikeStatus::Available {
            return Err(WorkflowError::Conflict(format!("Bike {} not available.", bike.id)));
        }

        let start_time = Utc::now().timestamp();
        let ride_id = format!("{}-{}-{}", user.id, bike.id, start_time);

        if read_doc::<Ride>(&**store, DocType::Ride, &ride_id)?.is_some() {
            return Err(WorkflowError::Duplicate {
                kind: AssetKind::Ride,
                id: ride_id,
                verb: "started",
            });
        }

        let ride = Ride::start(&ride_id, &user.id, &bike.id, start_time, location);

        user.ride_id = ride_id.clone();
        user.status = UserStatus::InRide;

        bike.location = location.to_vec();
        bike.status = BikeStatus::InUse;

        write_doc(&mut **store, DocType::Ride, &ride.id, &ride)?;
        write_doc(&mut **store, DocType::User, &user.id, &user)?;
        write_doc(&mut **store, DocType::Bike, &bike.id, &bike)?;
        log::info!("Ride {} started.", ride_id);

        Ok(format!("Ride {} started.", ride_id))
    }

    // End a ride: cost is debited, bike becomes available again
    fn end_ride(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::User])?;
        self.expect_args(args, 4, "User ID, Bike ID, Longitude, Latitude")?;

        let location = parse_location(&args[2], &args[3])?;

        let mut store = self.write_store()?;
        let mut user = require_doc::<User>(&**store, DocType::User, AssetKind::User, &args[0])?;

        if user.status != UserStatus::InRide {
            return Err(WorkflowError::Conflict(format!(
                "User {} doesn't have an ongoing ride.",
                user.id
            )));
        }

        let mut bike = require_doc::<Bike>(&**store, DocType::Bike, AssetKind::Bike, &args[1])?;
        if bike.status != BikeStatus::InUse {
            return Err(WorkflowError::Conflict(format!("Bike {} not in use.", bike.id)));
        }

        let mut ride =
            require_doc::<Ride>(&**store, DocType::Ride, AssetKind::Ride, &user.ride_id)?;

        if ride.bike_id != args[1] {
            return Err(WorkflowError::Conflict(format!(
                "Actual bike {} and requested bike {} not match.",
                ride.bike_id, args[1]
            )));
        }
        if ride.status != RideStatus::Ongoing {
            return Err(WorkflowError::Conflict(format!("Ride {} not ongoing.", ride.id)));
        }

        let start_time: i64 = ride.start_time.parse().map_err(|e| {
            WorkflowError::InvalidArgument(format!("Invalid ride start time: {}", e))
        })?;
        let end_time = Utc::now().timestamp();
        let minutes = (end_time - start_time) as f32 / 60.0;
        let cost = minutes * COST_PER_MINUTE;

        ride.end_time = end_time.to_string();
        ride.end_location = location.to_vec();
        ride.cost = cost;
        ride.status = RideStatus::Completed;

        bike.location = location.to_vec();
        bike.status = BikeStatus::Available;

        user.balance -= cost;
        user.status = UserStatus::Free;

        write_doc(&mut **store, DocType::Ride, &ride.id, &ride)?;
        write_doc(&mut **store, DocType::User, &user.id, &user)?;
        write_doc(&mut **store, DocType::Bike, &bike.id, &bike)?;
        log::info!("Ride {} ended.", ride.id);

        Ok(format!("Ride {} ended.", ride.id))
    }

    // Report an issue against a completed ride
    fn report_issue(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::User])?;
        self.expect_args(args, 2, "User ID, Ride ID")?;

        let mut store = self.write_store()?;
        let mut ride = require_doc::<Ride>(&**store, DocType::Ride, AssetKind::Ride, &args[1])?;

        if ride.user_id != args[0] {
            return Err(WorkflowError::Conflict(format!(
                "Actual user {} and requested user {} not match.",
                ride.user_id, args[0]
            )));
        }
        if ride.status != RideStatus::Completed {
            return Err(WorkflowError::Conflict(format!("Ride {} not completed.", ride.id)));
        }

        let issue_id = format!("{}-{}", ride.id, Utc::now().timestamp());
        if read_doc::<Issue>(&**store, DocType::Issue, &issue_id)?.is_some() {
            return Err(WorkflowError::Duplicate {
                kind: AssetKind::Issue,
                id: issue_id,
                verb: "opened",
            });
        }

        let issue = Issue::open(&issue_id, &args[0], &ride.bike_id, &ride.id);
        ride.status = RideStatus::IssueOpen;

        write_doc(&mut **store, DocType::Issue, &issue.id, &issue)?;
        write_doc(&mut **store, DocType::Ride, &ride.id, &ride)?;
        log::info!("Issue {} opened.", issue_id);

        Ok(format!("Issue {} opened.", issue_id))
    }

    // Accept an issue: the ride cost is refunded
    fn accept_issue(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::Provider])?;
        self.expect_args(args, 1, "Issue ID")?;

        let mut store = self.write_store()?;
        let mut issue =
            require_doc::<Issue>(&**store, DocType::Issue, AssetKind::Issue, &args[0])?;

        if issue.status != IssueStatus::Open {
            return Err(WorkflowError::Conflict(format!("Issue {} not open.", issue.id)));
        }

        let mut user =
            require_doc::<User>(&**store, DocType::User, AssetKind::User, &issue.user_id)?;
        let mut ride =
            require_doc::<Ride>(&**store, DocType::Ride, AssetKind::Ride, &issue.ride_id)?;

        if ride.status != RideStatus::IssueOpen {
            return Err(WorkflowError::Conflict(format!(
                "Ride {} not associated with an issue.",
                ride.id
            )));
        }

        issue.status = IssueStatus::Closed;
        user.balance += ride.cost;
        ride.cost = 0.0;
        ride.status = RideStatus::IssueClosed;

        write_doc(&mut **store, DocType::Issue, &issue.id, &issue)?;
        write_doc(&mut **store, DocType::User, &user.id, &user)?;
        write_doc(&mut **store, DocType::Ride, &ride.id, &ride)?;
        log::info!("Issue {} accepted.", issue.id);

        Ok(format!("Issue {} accepted.", issue.id))
    }

    // Reject an issue: closed without a refund
    fn reject_issue(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::Provider])?;
        self.expect_args(args, 1, "Issue ID")?;

        let mut store = self.write_store()?;
        let mut issue =
            require_doc::<Issue>(&**store, DocType::Issue, AssetKind::Issue, &args[0])?;

        if issue.status != IssueStatus::Open {
            return Err(WorkflowError::Conflict(format!("Issue {} not open.", issue.id)));
        }

        let mut ride =
            require_doc::<Ride>(&**store, DocType::Ride, AssetKind::Ride, &issue.ride_id)?;

        if ride.status != RideStatus::IssueOpen {
            return Err(WorkflowError::Conflict(format!(
                "Ride {} not associated with an issue.",
                ride.id
            )));
        }

        issue.status = IssueStatus::Closed;
        ride.status = RideStatus::IssueClosed;

        write_doc(&mut **store, DocType::Issue, &issue.id, &issue)?;
        write_doc(&mut **store, DocType::Ride, &ride.id, &ride)?;
        log::info!("Issue {} rejected.", issue.id);

        Ok(format!("Issue {} rejected.", issue.id))
    }

    // Request a repair for an available bike
    fn request_repair(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::Provider])?;
        self.expect_args(args, 2, "Bike ID, Repairer ID")?;

        let mut store = self.write_store()?;
        let mut bike = require_doc::<Bike>(&**store, DocType::Bike, AssetKind::Bike, &args[0])?;

        if bike.status != BikeStatus::Available {
            return Err(WorkflowError::Conflict(format!("Bike {} not available.", bike.id)));
        }

        require_doc::<Repairer>(&**store, DocType::Repairer, AssetKind::Repairer, &args[1])?;

        let repair_id = format!("{}-{}-{}", args[0], args[1], Utc::now().timestamp());
        if read_doc::<Repair>(&**store, DocType::Repair, &repair_id)?.is_some() {
            return Err(WorkflowError::Duplicate {
                kind: AssetKind::Repair,
                id: repair_id,
                verb: "requested",
            });
        }

        let repair = Repair::requested(&repair_id, &args[0], &args[1]);
        bike.status = BikeStatus::ToRepair;

        write_doc(&mut **store, DocType::Repair, &repair.id, &repair)?;
        write_doc(&mut **store, DocType::Bike, &bike.id, &bike)?;
        log::info!("Repair {} requested.", repair_id);

        Ok(format!("Repair {} requested.", repair_id))
    }

    // Accept a repair request
    fn accept_repair(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::Repairer])?;
        self.expect_args(args, 2, "Repairer ID, Repair ID")?;

        let mut store = self.write_store()?;
        require_doc::<Repairer>(&**store, DocType::Repairer, AssetKind::Repairer, &args[0])?;

        let mut repair =
            require_doc::<Repair>(&**store, DocType::Repair, AssetKind::Repair, &args[1])?;

        if repair.repairer_id != args[0] {
            return Err(WorkflowError::Conflict(format!(
                "Actual repairer {} and requested repairer {} not match.",
                repair.repairer_id, args[0]
            )));
        }
        if repair.status != RepairStatus::Requested {
            return Err(WorkflowError::Conflict(format!(
                "Repair {} already processed.",
                repair.id
            )));
        }

        let mut bike =
            require_doc::<Bike>(&**store, DocType::Bike, AssetKind::Bike, &repair.bike_id)?;
        if bike.status != BikeStatus::ToRepair {
            return Err(WorkflowError::Conflict(format!(
                "Bike {} not ready to repair.",
                bike.id
            )));
        }

        repair.status = RepairStatus::Accepted;
        bike.status = BikeStatus::Repairing;

        write_doc(&mut **store, DocType::Repair, &repair.id, &repair)?;
        write_doc(&mut **store, DocType::Bike, &bike.id, &bike)?;
        log::info!("Repair {} accepted.", repair.id);

        Ok(format!("Repair {} accepted.", repair.id))
    }

    // Reject a repair request; the bike stays queued for repair
    fn reject_repair(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::Repairer])?;
        self.expect_args(args, 2, "Repairer ID, Repair ID")?;

        let mut store = self.write_store()?;
        require_doc::<Repairer>(&**store, DocType::Repairer, AssetKind::Repairer, &args[0])?;

        let mut repair =
            require_doc::<Repair>(&**store, DocType::Repair, AssetKind::Repair, &args[1])?;

        if repair.repairer_id != args[0] {
            return Err(WorkflowError::Conflict(format!(
                "Actual repairer {} and requested repairer {} not match.",
                repair.repairer_id, args[0]
            )));
        }
        if repair.status != RepairStatus::Requested {
            return Err(WorkflowError::Conflict(format!(
                "Repair {} already processed.",
                repair.id
            )));
        }

        let bike =
            require_doc::<Bike>(&**store, DocType::Bike, AssetKind::Bike, &repair.bike_id)?;
        if bike.status != BikeStatus::ToRepair {
            return Err(WorkflowError::Conflict(format!(
                "Bike {} not ready to repair.",
                bike.id
            )));
        }

        repair.status = RepairStatus::Rejected;

        write_doc(&mut **store, DocType::Repair, &repair.id, &repair)?;
        log::info!("Repair {} rejected.", repair.id);

        Ok(format!("Repair {} rejected.", repair.id))
    }

    // Complete an accepted repair
    fn complete_repair(&self, caller: &Caller, args: &[String]) -> WorkflowResult<String> {
        self.require_member(caller, &[Org::Repairer])?;
        self.expect_args(args, 2, "Repairer ID, Repair ID")?;

        let mut store = self.write_store()?;
        require_doc::<Repairer>(&**store, DocType::Repairer, AssetKind::Repairer, &args[0])?;

        let mut repair =
            require_doc::<Repair>(&**store, DocType::Repair, AssetKind::Repair, &args[1])?;

        if repair.repairer_id != args[0] {
            return Err(WorkflowError::Conflict(format!(
                "Actual repairer {} and requested repairer {} not match.",
                repair.repairer_id, args[0]
            )));
        }
        if repair.status != RepairStatus::Accepted {
            return Err(WorkflowError::Conflict(format!("Repair {} not accepted.", repair.id)));
        }

        let mut bike =
            require_doc::<Bike>(&**store, DocType::Bike, AssetKind::Bike, &repair.bike_id)?;
        if bike.status != BikeStatus::Repairing {
            return Err(WorkflowError::Conflict(format!("Bike {} not repairing.", bike.id)));
        }

        repair.status = RepairStatus::Completed;
        bike.status = BikeStatus::Repaired;

        write_doc(&mut **store, DocType::Repair, &repair.id, &repair)?;
        write_doc(&mut **store, DocType::Bike, &bike.id, &bike)?;
        log::info!("Repair {} completed.", repair.id);

        Ok(format!("Repair {} completed.", repair.id))
    }

    /// Organization gate; a no-op in dev mode
    fn require_member(&self, caller: &Caller, allowed: &[Org]) -> WorkflowResult<()> {
        if self.dev_mode {
            return Ok(());
        }
        if allowed.iter().any(|org| caller.is_member_of(*org)) {
            return Ok(());
        }

        let names: Vec<&str> = allowed.iter().map(|org| org.display_name()).collect();
        log::warn!(
            "Access denied for caller {} (requires {} Org)",
            caller.msp_id,
            names.join("/")
        );
        Err(WorkflowError::AccessDenied(names.join("/")))
    }

    fn expect_args(&self, args: &[String], expected: usize, hint: &'static str) -> WorkflowResult<()> {
        if args.len() != expected {
            return Err(WorkflowError::Arity {
                expected,
                hint,
                found: args.len(),
            });
        }
        Ok(())
    }

    fn expect_one<'a>(&self, args: &'a [String], hint: &'static str) -> WorkflowResult<&'a String> {
        self.expect_args(args, 1, hint)?;
        Ok(&args[0])
    }

    /// Run a filtered scan over one document type
    ///
    /// Returns the `[{"Key": .., "Value": ..}]` array as text, matching the
    /// response shape the browser console renders.
    fn query<F>(&self, doc_type: DocType, pred: F) -> WorkflowResult<String>
    where
        F: Fn(&Value) -> bool,
    {
        let store = self
            .store
            .read()
            .map_err(|_| WorkflowError::Store("state lock poisoned".to_string()))?;

        let mut rows = Vec::new();
        for (key, bytes) in store.scan(&doc_type_prefix(doc_type)) {
            let value: Value = serde_json::from_slice(&bytes)?;
            if pred(&value) {
                rows.push(serde_json::json!({ "Key": key, "Value": value }));
            }
        }

        Ok(Value::Array(rows).to_string())
    }

    fn write_store(&self) -> WorkflowResult<std::sync::RwLockWriteGuard<'_, Box<dyn StateStore>>> {
        self.store
            .write()
            .map_err(|_| WorkflowError::Store("state lock poisoned".to_string()))
    }
}

fn parse_location(longitude: &str, latitude: &str) -> WorkflowResult<[f32; 2]> {
    let longitude: f32 = longitude
        .parse()
        .map_err(|e| WorkflowError::InvalidArgument(format!("Invalid longitude: {}", e)))?;
    let latitude: f32 = latitude
        .parse()
        .map_err(|e| WorkflowError::InvalidArgument(format!("Invalid latitude: {}", e)))?;
    Ok([longitude, latitude])
}

fn read_doc<T: DeserializeOwned>(
    store: &dyn StateStore,
    doc_type: DocType,
    id: &str,
) -> WorkflowResult<Option<T>> {
    match store.get(&composite_key(doc_type, id)) {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

fn require_doc<T: DeserializeOwned>(
    store: &dyn StateStore,
    doc_type: DocType,
    kind: AssetKind,
    id: &str,
) -> WorkflowResult<T> {
    read_doc(store, doc_type, id)?.ok_or_else(|| WorkflowError::NotFound {
        kind,
        id: id.to_string(),
    })
}

fn write_doc<T: Serialize>(
    store: &mut dyn StateStore,
    doc_type: DocType,
    id: &str,
    doc: &T,
) -> WorkflowResult<()> {
    let bytes = serde_json::to_vec(doc)?;
    store.put(&composite_key(doc_type, id), bytes);
    Ok(())
}

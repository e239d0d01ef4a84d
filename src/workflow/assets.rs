//! Workflow asset types
//!
//! This module defines the ledger-resident asset records and their status
//! values. Field names match the stored JSON documents, including the
//! `docType` discriminator the queries select on.

use serde::{Deserialize, Serialize};

/// Document type discriminator stored with every asset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    User,
    Repairer,
    Bike,
    Ride,
    Issue,
    Repair,
}

impl DocType {
    /// Stored string form, used for key prefixes and query selectors
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::User => "user",
            DocType::Repairer => "repairer",
            DocType::Bike => "bike",
            DocType::Ride => "ride",
            DocType::Issue => "issue",
            DocType::Repair => "repair",
        }
    }
}

/// User availability
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum UserStatus {
    /// Not riding; may start a ride
    Free,
    /// Has an ongoing ride
    InRide,
}

/// Bike lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BikeStatus {
    /// Parked and rentable
    Available,
    /// Currently rented
    InUse,
    /// Repair requested, waiting for a repairer decision
    ToRepair,
    /// A repairer is working on it
    Repairing,
    /// Repair finished, waiting for provider reactivation
    Repaired,
    /// Permanently withdrawn from the fleet
    Discarded,
}

/// Ride lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RideStatus {
    Ongoing,
    Completed,
    /// Rider opened an issue against the completed ride
    IssueOpen,
    IssueClosed,
}

/// Issue lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum IssueStatus {
    Open,
    Closed,
}

/// Repair lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RepairStatus {
    Requested,
    Accepted,
    Rejected,
    Completed,
}

/// Registered rider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "docType")]
    pub doc_type: DocType,
    pub id: String,
    /// Prepaid balance; rides debit it, accepted issues refund it
    pub balance: f32,
    /// Id of the ongoing ride, empty while free
    #[serde(rename = "rideId")]
    pub ride_id: String,
    pub status: UserStatus,
}

impl User {
    pub fn new(id: &str, balance: f32) -> Self {
        Self {
            doc_type: DocType::User,
            id: id.to_string(),
            balance,
            ride_id: String::new(),
            status: UserStatus::Free,
        }
    }
}

/// Registered repair shop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repairer {
    #[serde(rename = "docType")]
    pub doc_type: DocType,
    pub id: String,
}

impl Repairer {
    pub fn new(id: &str) -> Self {
        Self {
            doc_type: DocType::Repairer,
            id: id.to_string(),
        }
    }
}

/// Fleet bike
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bike {
    #[serde(rename = "docType")]
    pub doc_type: DocType,
    pub id: String,
    /// Last reported `[longitude, latitude]`, empty until first report
    pub location: Vec<f32>,
    pub status: BikeStatus,
}

impl Bike {
    pub fn new(id: &str) -> Self {
        Self {
            doc_type: DocType::Bike,
            id: id.to_string(),
            location: Vec::new(),
            status: BikeStatus::Available,
        }
    }
}

/// Ride taken by a user on a bike
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ride {
    #[serde(rename = "docType")]
    pub doc_type: DocType,
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "bikeId")]
    pub bike_id: String,
    /// Unix seconds, stored as a string
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "startLocation")]
    pub start_location: Vec<f32>,
    /// Empty until the ride ends
    #[serde(rename = "endTime")]
    pub end_time: String,
    #[serde(rename = "endLocation")]
    pub end_location: Vec<f32>,
    /// Debited on completion; zeroed again if an issue is accepted
    pub cost: f32,
    pub status: RideStatus,
}

impl Ride {
    pub fn start(id: &str, user_id: &str, bike_id: &str, start_time: i64, location: [f32; 2]) -> Self {
        Self {
            doc_type: DocType::Ride,
            id: id.to_string(),
            user_id: user_id.to_string(),
            bike_id: bike_id.to_string(),
            start_time: start_time.to_string(),
            start_location: location.to_vec(),
            end_time: String::new(),
            end_location: Vec::new(),
            cost: 0.0,
            status: RideStatus::Ongoing,
        }
    }
}

/// Issue a user opened against a completed ride
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    #[serde(rename = "docType")]
    pub doc_type: DocType,
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "bikeId")]
    pub bike_id: String,
    #[serde(rename = "rideId")]
    pub ride_id: String,
    pub status: IssueStatus,
}

impl Issue {
    pub fn open(id: &str, user_id: &str, bike_id: &str, ride_id: &str) -> Self {
        Self {
            doc_type: DocType::Issue,
            id: id.to_string(),
            user_id: user_id.to_string(),
            bike_id: bike_id.to_string(),
            ride_id: ride_id.to_string(),
            status: IssueStatus::Open,
        }
    }
}

/// Repair requested by the provider and handled by a repairer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repair {
    #[serde(rename = "docType")]
    pub doc_type: DocType,
    pub id: String,
    #[serde(rename = "bikeId")]
    pub bike_id: String,
    #[serde(rename = "repairerId")]
    pub repairer_id: String,
    pub status: RepairStatus,
}

impl Repair {
    pub fn requested(id: &str, bike_id: &str, repairer_id: &str) -> Self {
        Self {
            doc_type: DocType::Repair,
            id: id.to_string(),
            bike_id: bike_id.to_string(),
            repairer_id: repairer_id.to_string(),
            status: RepairStatus::Requested,
        }
    }
}

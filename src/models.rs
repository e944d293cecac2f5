//! Data types and associated functions and methods

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use validator::Validate;

/// The closed set of water quality parameters recorded at each monitoring
/// station.
///
/// Serialised names match the column identifiers of the source CSV, so the
/// same identifiers appear in API requests, API responses and the dataset
/// file.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum Parameter {
    /// Water temperature (degrees Celsius)
    #[serde(rename = "TEMP")]
    #[strum(serialize = "TEMP")]
    Temperature,
    /// Dissolved oxygen (mg/l)
    #[serde(rename = "DO")]
    #[strum(serialize = "DO")]
    DissolvedOxygen,
    /// Acidity / alkalinity
    #[serde(rename = "pH")]
    #[strum(serialize = "pH")]
    Ph,
    /// Electrical conductivity (µmhos/cm)
    #[serde(rename = "CONDUCTIVITY")]
    #[strum(serialize = "CONDUCTIVITY")]
    Conductivity,
    /// Biochemical oxygen demand (mg/l)
    #[serde(rename = "BOD")]
    #[strum(serialize = "BOD")]
    BiochemicalOxygenDemand,
    /// Nitrate and nitrite nitrogen (mg/l)
    #[serde(rename = "NITRATE_N_NITRITE_N")]
    #[strum(serialize = "NITRATE_N_NITRITE_N")]
    NitrateNitrite,
    /// Fecal coliform count (MPN/100ml)
    #[serde(rename = "FECAL_COLIFORM")]
    #[strum(serialize = "FECAL_COLIFORM")]
    FecalColiform,
    /// Total coliform count (MPN/100ml)
    #[serde(rename = "TOTAL_COLIFORM")]
    #[strum(serialize = "TOTAL_COLIFORM")]
    TotalColiform,
}

impl Parameter {
    /// All parameters, in source-CSV column order.
    pub const ALL: [Parameter; 8] = [
        Parameter::Temperature,
        Parameter::DissolvedOxygen,
        Parameter::Ph,
        Parameter::Conductivity,
        Parameter::BiochemicalOxygenDemand,
        Parameter::NitrateNitrite,
        Parameter::FecalColiform,
        Parameter::TotalColiform,
    ];

    /// Returns the CSV column identifier for this parameter.
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Temperature => "TEMP",
            Self::DissolvedOxygen => "DO",
            Self::Ph => "pH",
            Self::Conductivity => "CONDUCTIVITY",
            Self::BiochemicalOxygenDemand => "BOD",
            Self::NitrateNitrite => "NITRATE_N_NITRITE_N",
            Self::FecalColiform => "FECAL_COLIFORM",
            Self::TotalColiform => "TOTAL_COLIFORM",
        }
    }
}

/// A single monitoring observation.
///
/// Any field may be absent in the source data. Missing measurements are
/// `None` rather than a sentinel value, so "zero" and "missing" are never
/// conflated, and serialise as JSON null.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Record {
    /// Monitoring station code
    #[serde(rename = "STATION_CODE", default)]
    pub station_code: Option<String>,
    /// Monitoring site name
    #[serde(rename = "LOCATIONS", default)]
    pub location: Option<String>,
    /// State the site belongs to
    #[serde(rename = "STATE", default)]
    pub state: Option<String>,
    #[serde(rename = "TEMP", default)]
    pub temperature: Option<f64>,
    #[serde(rename = "DO", default)]
    pub dissolved_oxygen: Option<f64>,
    #[serde(rename = "pH", default)]
    pub ph: Option<f64>,
    #[serde(rename = "CONDUCTIVITY", default)]
    pub conductivity: Option<f64>,
    #[serde(rename = "BOD", default)]
    pub biochemical_oxygen_demand: Option<f64>,
    #[serde(rename = "NITRATE_N_NITRITE_N", default)]
    pub nitrate_nitrite: Option<f64>,
    #[serde(rename = "FECAL_COLIFORM", default)]
    pub fecal_coliform: Option<f64>,
    #[serde(rename = "TOTAL_COLIFORM", default)]
    pub total_coliform: Option<f64>,
}

impl Record {
    /// Returns the measured value of `parameter`, or `None` if it was not
    /// recorded for this observation.
    pub fn value(&self, parameter: Parameter) -> Option<f64> {
        match parameter {
            Parameter::Temperature => self.temperature,
            Parameter::DissolvedOxygen => self.dissolved_oxygen,
            Parameter::Ph => self.ph,
            Parameter::Conductivity => self.conductivity,
            Parameter::BiochemicalOxygenDemand => self.biochemical_oxygen_demand,
            Parameter::NitrateNitrite => self.nitrate_nitrite,
            Parameter::FecalColiform => self.fecal_coliform,
            Parameter::TotalColiform => self.total_coliform,
        }
    }
}

/// Request data for the location listing endpoint
#[derive(Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct LocationsRequest {
    /// State to list monitoring sites for
    #[validate(length(min = 1, message = "state must not be empty"))]
    pub state: String,
}

/// Request data for the location comparison endpoint
#[derive(Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct CompareRequest {
    /// First monitoring site
    #[validate(length(min = 1, message = "location1 must not be empty"))]
    pub location1: String,
    /// Second monitoring site
    #[validate(length(min = 1, message = "location2 must not be empty"))]
    pub location2: String,
    /// Parameter to compare on
    pub parameter: Parameter,
    /// Parameter used only to break ties on `parameter`
    #[serde(default)]
    pub secondary_parameter: Option<Parameter>,
}

/// The result of comparing two monitoring sites.
///
/// Mean values are `None` when a site had no usable measurements, which
/// serialises as JSON null rather than NaN.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct Comparison {
    /// Rows for the first site with the compared parameters present
    pub location1_data: Vec<Record>,
    /// Rows for the second site with the compared parameters present
    pub location2_data: Vec<Record>,
    /// Mean of the primary parameter over `location1_data`
    pub location1_mean: Option<f64>,
    /// Mean of the primary parameter over `location2_data`
    pub location2_mean: Option<f64>,
    /// The site judged more polluted
    pub more_polluted: String,
    /// Human readable justification for the verdict
    pub reason: String,
    /// Remediation text for the compared parameter
    pub solution: String,
    /// Cause text for the compared parameter
    pub cause: String,
    /// Consequence text for the compared parameter
    pub consequence: String,
}

/// Request data for the free-text narrative proxy endpoint
#[derive(Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct AiQueryRequest {
    /// Prompt to forward to the narrative service
    #[validate(length(min = 1, message = "query must not be empty"))]
    pub query: String,
}

/// Request data for the report generation endpoint
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ReportRequest {
    /// Records to produce one report section each for
    #[validate(length(min = 1, message = "data must not be empty"))]
    pub data: Vec<Record>,
}

//! Catalogue of recordable operational data.
//!
//! Every kind declares its natural key, payload fields and write strategy in
//! one static [`RecordSpec`]. Request bodies are parsed against that
//! declaration into a [`RecordSubmission`] whose arguments line up with the
//! procedure parameters: key fields, then payload fields, then `userId`.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::procedures::{
    ParamType::{self, Date, Integer, Numeric, Text},
    ProcedureSignature,
};
use super::rows::parse_calendar_date;
use super::upsert::{UpsertOutcome, WriteStrategy};
use super::Row;

/// Body field carrying the submitting user on every write.
pub const USER_ID_FIELD: &str = "userId";

/// A body field and the type its value must parse as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    name: &'static str,
    ty: ParamType,
    optional: bool,
}

impl FieldSpec {
    /// A field that must be present and non-null.
    pub const fn required(name: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            ty,
            optional: false,
        }
    }

    /// A field that may be absent or null.
    pub const fn optional(name: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            ty,
            optional: true,
        }
    }

    /// Wire name of the field.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type.
    pub const fn ty(&self) -> ParamType {
        self.ty
    }

    /// Whether the field may be omitted.
    pub const fn is_optional(&self) -> bool {
        self.optional
    }
}

/// Validation failures for record submissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordValidationError {
    /// A required field was absent, null or blank.
    #[error("missing required field: {field}")]
    MissingField {
        /// Wire name of the field.
        field: &'static str,
    },
    /// A field was present but could not be read as its declared type.
    #[error("field {field} must be {expected}")]
    InvalidField {
        /// Wire name of the field.
        field: &'static str,
        /// Human readable description of the expected type.
        expected: &'static str,
    },
}

impl RecordValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::InvalidField { field, .. } => field,
        }
    }
}

/// One field value in canonical text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundField {
    name: &'static str,
    value: Option<String>,
}

impl BoundField {
    /// Wire name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Canonical value, `None` for an omitted optional field.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Fields presumed to identify at most one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalKey {
    fields: Vec<BoundField>,
}

impl NaturalKey {
    /// Bound key fields in declaration order.
    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    /// Key values as positional procedure arguments.
    pub fn args(&self) -> Vec<Option<String>> {
        self.fields.iter().map(|field| field.value.clone()).collect()
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, field) in self.fields.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", field.name, field.value.as_deref().unwrap_or("null"))?;
        }
        Ok(())
    }
}

/// Non-key fields of a submission plus the submitting user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPayload {
    fields: Vec<BoundField>,
    user_id: String,
}

impl RecordPayload {
    /// Bound payload fields in declaration order.
    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    /// Submitting user as given in the body.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Read-only listings exposed through `GET /show*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listing {
    /// Mine locations.
    Locations,
    /// Daily excavation plans.
    Excavation,
    /// Geological samples.
    Geology,
    /// Production dispatches.
    Dispatch,
    /// Equipment engagement.
    Equipment,
    /// Fuel issues.
    Fuel,
}

const SHOW_LOCATIONS: ProcedureSignature = ProcedureSignature::document("SP_MINES_LOCATION_SHOW", &[]);

impl Listing {
    /// Every listing.
    pub const ALL: [Listing; 6] = [
        Self::Locations,
        Self::Excavation,
        Self::Geology,
        Self::Dispatch,
        Self::Equipment,
        Self::Fuel,
    ];

    /// Route segment following `show`.
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Locations => "Location",
            Self::Excavation => "Excavation",
            Self::Geology => "Geology",
            Self::Dispatch => "Dispatch",
            Self::Equipment => "Equipment",
            Self::Fuel => "Fuel",
        }
    }

    /// Resolve the segment of a `show*` route.
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|listing| listing.segment() == segment)
    }

    /// Procedure backing the listing.
    pub fn procedure(self) -> ProcedureSignature {
        match self.record_kind() {
            Some(kind) => kind.spec().show,
            None => SHOW_LOCATIONS,
        }
    }

    /// Fields to reformat as calendar dates.
    pub fn date_fields(self) -> &'static [&'static str] {
        self.record_kind().map_or(&[], |kind| kind.spec().date_fields)
    }

    fn record_kind(self) -> Option<RecordKind> {
        match self {
            Self::Locations => None,
            Self::Excavation => Some(RecordKind::DailyExcavation),
            Self::Geology => Some(RecordKind::GeologicalSampling),
            Self::Dispatch => Some(RecordKind::ProductionDispatch),
            Self::Equipment => Some(RecordKind::EquipmentEngagement),
            Self::Fuel => Some(RecordKind::FuelIssue),
        }
    }
}

/// KPI dashboards sharing the daily-actual procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KpiDashboard {
    /// Human resources.
    Hr,
    /// Finance.
    Finance,
    /// Environment.
    Environment,
}

/// Procedure listing KPI actuals for one user.
pub const SHOW_KPI_ACTUALS: ProcedureSignature =
    ProcedureSignature::document("SP_KPI_DAILY_ACTUAL_SHOW", &[ParamType::Text]);

impl KpiDashboard {
    /// Every dashboard.
    pub const ALL: [KpiDashboard; 3] = [Self::Hr, Self::Finance, Self::Environment];

    /// Route of the read endpoint.
    pub const fn query_path(self) -> &'static str {
        match self {
            Self::Hr => "get-kpi",
            Self::Finance => "get-kpiFinance",
            Self::Environment => "get-kpiEnvironment",
        }
    }

    /// Resolve the path of a read endpoint.
    pub fn from_query_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dashboard| dashboard.query_path() == path)
    }

    /// Record kind written by the dashboard's form.
    pub const fn record_kind(self) -> RecordKind {
        match self {
            Self::Hr => RecordKind::HrKpi,
            Self::Finance => RecordKind::FinanceKpi,
            Self::Environment => RecordKind::EnvironmentKpi,
        }
    }
}

/// Static declaration of one record kind.
#[derive(Debug, Clone, Copy)]
pub struct RecordSpec {
    label: &'static str,
    key: &'static [FieldSpec],
    payload: &'static [FieldSpec],
    date_fields: &'static [&'static str],
    strategy: WriteStrategy,
    show: ProcedureSignature,
}

impl RecordSpec {
    /// Human readable name used in success messages.
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Natural key fields.
    pub const fn key(&self) -> &'static [FieldSpec] {
        self.key
    }

    /// Payload fields, excluding `userId`.
    pub const fn payload(&self) -> &'static [FieldSpec] {
        self.payload
    }

    /// Fields holding calendar dates.
    pub const fn date_fields(&self) -> &'static [&'static str] {
        self.date_fields
    }

    /// How writes reach the store.
    pub const fn strategy(&self) -> &WriteStrategy {
        &self.strategy
    }

    /// Read-only listing of the kind.
    pub const fn show(&self) -> ProcedureSignature {
        self.show
    }

    /// Parameter count of a write: key, payload and `userId`.
    pub const fn write_arity(&self) -> usize {
        self.key.len() + self.payload.len() + 1
    }
}

/// Kinds of record accepted by `POST /<kind>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Daily excavation plan per location and shift.
    DailyExcavation,
    /// Geological sample assay.
    GeologicalSampling,
    /// Material dispatched from a location.
    ProductionDispatch,
    /// Equipment hours per shift.
    EquipmentEngagement,
    /// Fuel issued to equipment.
    FuelIssue,
    /// HR dashboard KPI actual.
    HrKpi,
    /// Finance dashboard KPI actual.
    FinanceKpi,
    /// Environment dashboard KPI actual.
    EnvironmentKpi,
}

const EXCAVATION_KEY: &[FieldSpec] = &[
    FieldSpec::required("Prod_date", Date),
    FieldSpec::required("Shift", Text),
    FieldSpec::required("Loc_id", Integer),
];
const EXCAVATION_PAYLOAD: &[FieldSpec] = &[
    FieldSpec::required("Face_Desc", Text),
    FieldSpec::required("OB_QTY_Cum", Numeric),
    FieldSpec::required("ORE_QTY", Numeric),
    FieldSpec::required("HG_QTY", Numeric),
    FieldSpec::required("MG_QTY", Numeric),
    FieldSpec::required("LG_QTY", Numeric),
];
const EXCAVATION_WRITE: &[ParamType] = &[
    Date, Text, Integer, Text, Numeric, Numeric, Numeric, Numeric, Numeric, Text,
];

const SAMPLE_KEY: &[FieldSpec] = &[
    FieldSpec::required("Sample_date", Date),
    FieldSpec::required("Loc_id", Integer),
    FieldSpec::required("Sample_id", Text),
];
const SAMPLE_PAYLOAD: &[FieldSpec] = &[
    FieldSpec::required("Bench", Text),
    FieldSpec::required("Depth_m", Numeric),
    FieldSpec::required("Fe_pct", Numeric),
    FieldSpec::required("SiO2_pct", Numeric),
    FieldSpec::required("Al2O3_pct", Numeric),
];
const SAMPLE_WRITE: &[ParamType] = &[Date, Integer, Text, Text, Numeric, Numeric, Numeric, Numeric, Text];

const DISPATCH_KEY: &[FieldSpec] = &[
    FieldSpec::required("Prod_date", Date),
    FieldSpec::required("Shift", Text),
    FieldSpec::required("Loc_id", Integer),
    FieldSpec::required("Material", Text),
];
const DISPATCH_PAYLOAD: &[FieldSpec] = &[
    FieldSpec::required("Trips", Integer),
    FieldSpec::required("Qty", Numeric),
    FieldSpec::required("Destination", Text),
];
const DISPATCH_WRITE: &[ParamType] = &[Date, Text, Integer, Text, Integer, Numeric, Text, Text];

const ENGAGEMENT_KEY: &[FieldSpec] = &[
    FieldSpec::required("Eng_date", Date),
    FieldSpec::required("Shift", Text),
    FieldSpec::required("Equip_id", Text),
];
const ENGAGEMENT_PAYLOAD: &[FieldSpec] = &[
    FieldSpec::required("Status", Text),
    FieldSpec::required("Working_hrs", Numeric),
    FieldSpec::required("Breakdown_hrs", Numeric),
    FieldSpec::required("Idle_hrs", Numeric),
    FieldSpec::optional("Remarks", Text),
];
const ENGAGEMENT_WRITE: &[ParamType] = &[Date, Text, Text, Text, Numeric, Numeric, Numeric, Text, Text];

const FUEL_KEY: &[FieldSpec] = &[
    FieldSpec::required("Issue_date", Date),
    FieldSpec::required("Shift", Text),
    FieldSpec::required("Equip_id", Text),
];
const FUEL_PAYLOAD: &[FieldSpec] = &[
    FieldSpec::required("Fuel_qty", Numeric),
    FieldSpec::required("Hmr_reading", Numeric),
    FieldSpec::required("Issued_by", Text),
];
const FUEL_WRITE: &[ParamType] = &[Date, Text, Text, Numeric, Numeric, Text, Text];

const KPI_KEY: &[FieldSpec] = &[
    FieldSpec::required("date", Date),
    FieldSpec::required("plant_id", Integer),
    FieldSpec::required("func_id", Integer),
    FieldSpec::required("kpi_code", Text),
];
const KPI_PAYLOAD: &[FieldSpec] = &[
    FieldSpec::required("uom", Text),
    FieldSpec::required("hr_target", Numeric),
    FieldSpec::required("actual_data", Numeric),
];
const KPI_WRITE: &[ParamType] = &[Date, Integer, Integer, Text, Text, Numeric, Numeric, Text];

const EXCAVATION: RecordSpec = RecordSpec {
    label: "Daily excavation plan",
    key: EXCAVATION_KEY,
    payload: EXCAVATION_PAYLOAD,
    date_fields: &["Prod_date"],
    strategy: WriteStrategy::Gated {
        lookup: ProcedureSignature::rows(
            "SP_MINES_DAILY_EXCAVATION_PLAN_FIND",
            &[Date, Text, Integer],
        ),
        insert: ProcedureSignature::rows("SP_MINES_DAILY_EXCAVATION_PLAN_INSERT", EXCAVATION_WRITE),
        update: ProcedureSignature::rows("SP_MINES_DAILY_EXCAVATION_PLAN_UPDATE", EXCAVATION_WRITE),
    },
    show: ProcedureSignature::rows("SP_MINES_DAILY_EXCAVATION_PLAN_SHOW", &[]),
};

const SAMPLING: RecordSpec = RecordSpec {
    label: "Geological sample",
    key: SAMPLE_KEY,
    payload: SAMPLE_PAYLOAD,
    date_fields: &["Sample_date"],
    strategy: WriteStrategy::Gated {
        lookup: ProcedureSignature::rows("SP_MINES_GEOLOGICAL_SAMPLE_FIND", &[Date, Integer, Text]),
        insert: ProcedureSignature::rows("SP_MINES_GEOLOGICAL_SAMPLE_INSERT", SAMPLE_WRITE),
        update: ProcedureSignature::rows("SP_MINES_GEOLOGICAL_SAMPLE_UPDATE", SAMPLE_WRITE),
    },
    show: ProcedureSignature::rows("SP_MINES_GEOLOGICAL_SAMPLE_SHOW", &[]),
};

const DISPATCH: RecordSpec = RecordSpec {
    label: "Production dispatch",
    key: DISPATCH_KEY,
    payload: DISPATCH_PAYLOAD,
    date_fields: &["Prod_date"],
    strategy: WriteStrategy::GatedCombined {
        lookup: ProcedureSignature::rows(
            "SP_MINES_PRODUCTION_DISPATCH_FIND",
            &[Date, Text, Integer, Text],
        ),
        upsert: ProcedureSignature::rows("SP_MINES_PRODUCTION_DISPATCH_SAVE", DISPATCH_WRITE),
    },
    show: ProcedureSignature::rows("SP_MINES_PRODUCTION_DISPATCH_SHOW", &[]),
};

const ENGAGEMENT: RecordSpec = RecordSpec {
    label: "Equipment engagement",
    key: ENGAGEMENT_KEY,
    payload: ENGAGEMENT_PAYLOAD,
    date_fields: &["Eng_date"],
    strategy: WriteStrategy::Gated {
        lookup: ProcedureSignature::rows("SP_MINES_EQUIPMENT_ENGAGEMENT_FIND", &[Date, Text, Text]),
        insert: ProcedureSignature::rows("SP_MINES_EQUIPMENT_ENGAGEMENT_INSERT", ENGAGEMENT_WRITE),
        update: ProcedureSignature::rows("SP_MINES_EQUIPMENT_ENGAGEMENT_UPDATE", ENGAGEMENT_WRITE),
    },
    show: ProcedureSignature::rows("SP_MINES_EQUIPMENT_ENGAGEMENT_SHOW", &[]),
};

const FUEL: RecordSpec = RecordSpec {
    label: "Fuel issue",
    key: FUEL_KEY,
    payload: FUEL_PAYLOAD,
    date_fields: &["Issue_date"],
    strategy: WriteStrategy::Atomic {
        upsert: ProcedureSignature::rows("SP_MINES_FUEL_ISSUE_UPSERT", FUEL_WRITE),
    },
    show: ProcedureSignature::rows("SP_MINES_FUEL_ISSUE_SHOW", &[]),
};

const KPI_STRATEGY: WriteStrategy = WriteStrategy::Gated {
    lookup: ProcedureSignature::rows("SP_KPI_DAILY_ACTUAL_FIND", &[Date, Integer, Integer, Text]),
    insert: ProcedureSignature::rows("SP_KPI_DAILY_ACTUAL_INSERT", KPI_WRITE),
    update: ProcedureSignature::rows("SP_KPI_DAILY_ACTUAL_UPDATE", KPI_WRITE),
};

const fn kpi_spec(label: &'static str) -> RecordSpec {
    RecordSpec {
        label,
        key: KPI_KEY,
        payload: KPI_PAYLOAD,
        date_fields: &["date"],
        strategy: KPI_STRATEGY,
        show: SHOW_KPI_ACTUALS,
    }
}

const HR_KPI: RecordSpec = kpi_spec("HR KPI");
const FINANCE_KPI: RecordSpec = kpi_spec("Finance KPI");
const ENVIRONMENT_KPI: RecordSpec = kpi_spec("Environment KPI");

impl RecordKind {
    /// Every record kind.
    pub const ALL: [RecordKind; 8] = [
        Self::DailyExcavation,
        Self::GeologicalSampling,
        Self::ProductionDispatch,
        Self::EquipmentEngagement,
        Self::FuelIssue,
        Self::HrKpi,
        Self::FinanceKpi,
        Self::EnvironmentKpi,
    ];

    /// Route path of the submission endpoint.
    pub const fn path(self) -> &'static str {
        match self {
            Self::DailyExcavation => "daily-excavation",
            Self::GeologicalSampling => "geological-sampling",
            Self::ProductionDispatch => "production-dispatch",
            Self::EquipmentEngagement => "equipment-engagement",
            Self::FuelIssue => "fuel-issue",
            Self::HrKpi => "hr-dashboard",
            Self::FinanceKpi => "finance-dashboard",
            Self::EnvironmentKpi => "environment-dashboard",
        }
    }

    /// Resolve a submission path.
    ///
    /// # Examples
    /// ```
    /// use mineops::domain::RecordKind;
    ///
    /// assert_eq!(RecordKind::from_path("fuel-issue"), Some(RecordKind::FuelIssue));
    /// assert_eq!(RecordKind::from_path("adminlogin"), None);
    /// ```
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.path() == path)
    }

    /// Static declaration of the kind.
    pub const fn spec(self) -> &'static RecordSpec {
        match self {
            Self::DailyExcavation => &EXCAVATION,
            Self::GeologicalSampling => &SAMPLING,
            Self::ProductionDispatch => &DISPATCH,
            Self::EquipmentEngagement => &ENGAGEMENT,
            Self::FuelIssue => &FUEL,
            Self::HrKpi => &HR_KPI,
            Self::FinanceKpi => &FINANCE_KPI,
            Self::EnvironmentKpi => &ENVIRONMENT_KPI,
        }
    }
}

/// A validated submission ready for the upsert coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSubmission {
    kind: RecordKind,
    key: NaturalKey,
    payload: RecordPayload,
}

impl RecordSubmission {
    /// Parse a request body against the kind's declaration.
    ///
    /// Values may arrive as JSON scalars or, from form bodies, as text. Dates
    /// are accepted as calendar dates or timestamps and canonicalised to
    /// `YYYY-MM-DD`. Unknown body fields are ignored.
    ///
    /// # Examples
    /// ```
    /// use mineops::domain::{RecordKind, RecordSubmission};
    /// use serde_json::json;
    ///
    /// let body = json!({
    ///     "Issue_date": "2024-03-05T10:00:00Z", "Shift": "A", "Equip_id": "DMP-07",
    ///     "Fuel_qty": 120.5, "Hmr_reading": "8812", "Issued_by": "Store 2",
    ///     "userId": 10452
    /// });
    /// let submission = RecordSubmission::from_body(RecordKind::FuelIssue, body.as_object().unwrap())
    ///     .expect("valid body");
    /// assert_eq!(submission.key().to_string(), "Issue_date=2024-03-05, Shift=A, Equip_id=DMP-07");
    /// assert_eq!(submission.write_args().len(), 7);
    /// ```
    pub fn from_body(kind: RecordKind, body: &Map<String, Value>) -> Result<Self, RecordValidationError> {
        let spec = kind.spec();
        let key = bind_fields(spec.key, body)?;
        let fields = bind_fields(spec.payload, body)?;
        let user_id = bind_field(&FieldSpec::required(USER_ID_FIELD, Text), body)?
            .value
            .ok_or(RecordValidationError::MissingField {
                field: USER_ID_FIELD,
            })?;
        Ok(Self {
            kind,
            key: NaturalKey { fields: key },
            payload: RecordPayload { fields, user_id },
        })
    }

    /// Kind submitted.
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Natural key.
    pub fn key(&self) -> &NaturalKey {
        &self.key
    }

    /// Payload and submitting user.
    pub fn payload(&self) -> &RecordPayload {
        &self.payload
    }

    /// Positional arguments of the write: key, payload, then `userId`.
    pub fn write_args(&self) -> Vec<Option<String>> {
        let mut args = self.key.args();
        args.extend(self.payload.fields.iter().map(|field| field.value.clone()));
        args.push(Some(self.payload.user_id.clone()));
        args
    }
}

/// Response body of a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SubmissionReceipt {
    /// Always `success`.
    pub status: String,
    /// Human readable confirmation.
    pub message: String,
    /// Branch taken by the upsert.
    pub outcome: UpsertOutcome,
    /// Rows returned by the write procedure.
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Row>,
}

impl SubmissionReceipt {
    /// Build the receipt for a completed write.
    pub fn new(kind: RecordKind, outcome: UpsertOutcome, data: Vec<Row>) -> Self {
        let verb = match outcome {
            UpsertOutcome::Created => "submitted",
            UpsertOutcome::Updated => "updated",
        };
        Self {
            status: "success".to_owned(),
            message: format!("{} data {verb} successfully!", kind.spec().label()),
            outcome,
            data,
        }
    }
}

fn bind_fields(
    specs: &'static [FieldSpec],
    body: &Map<String, Value>,
) -> Result<Vec<BoundField>, RecordValidationError> {
    specs
        .iter()
        .map(|spec| bind_field(spec, body))
        .collect()
}

fn bind_field(
    spec: &FieldSpec,
    body: &Map<String, Value>,
) -> Result<BoundField, RecordValidationError> {
    let missing = RecordValidationError::MissingField { field: spec.name };
    // Blank form inputs count as absent.
    let raw = match body.get(spec.name) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if text.trim().is_empty() => None,
        Some(value) => Some(value),
    };
    let Some(raw) = raw else {
        if spec.optional {
            return Ok(BoundField {
                name: spec.name,
                value: None,
            });
        }
        return Err(missing);
    };
    let value = canonicalise(spec, raw)?;
    Ok(BoundField {
        name: spec.name,
        value: Some(value),
    })
}

fn canonicalise(spec: &FieldSpec, raw: &Value) -> Result<String, RecordValidationError> {
    let invalid = |expected| RecordValidationError::InvalidField {
        field: spec.name,
        expected,
    };
    match spec.ty {
        Text => match raw {
            Value::String(text) => Ok(text.trim().to_owned()),
            Value::Number(number) => Ok(number.to_string()),
            _ => Err(invalid("text")),
        },
        Integer => match raw {
            Value::Number(number) => number
                .as_i64()
                .map(|value| value.to_string())
                .ok_or_else(|| invalid("a whole number")),
            Value::String(text) => text
                .trim()
                .parse::<i64>()
                .map(|value| value.to_string())
                .map_err(|_| invalid("a whole number")),
            _ => Err(invalid("a whole number")),
        },
        Numeric => match raw {
            Value::Number(number) => Ok(number.to_string()),
            Value::String(text) => {
                let trimmed = text.trim();
                match trimmed.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(trimmed.to_owned()),
                    _ => Err(invalid("a number")),
                }
            }
            _ => Err(invalid("a number")),
        },
        Date => match raw {
            Value::String(text) => parse_calendar_date(text)
                .map(|date| date.format("%Y-%m-%d").to_string())
                .ok_or_else(|| invalid("a date (YYYY-MM-DD)")),
            _ => Err(invalid("a date (YYYY-MM-DD)")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn excavation_body() -> Map<String, Value> {
        match json!({
            "Prod_date": "2024-03-05",
            "Shift": "A",
            "Loc_id": "7",
            "Face_Desc": "North face",
            "OB_QTY_Cum": "1200.5",
            "ORE_QTY": 800,
            "HG_QTY": "300",
            "MG_QTY": "250",
            "LG_QTY": "250",
            "userId": "10452"
        }) {
            Value::Object(map) => map,
            _ => unreachable!("literal is an object"),
        }
    }

    #[rstest]
    fn every_write_signature_matches_the_declared_fields() {
        for kind in RecordKind::ALL {
            let spec = kind.spec();
            let (lookup, writes) = match spec.strategy() {
                WriteStrategy::Gated {
                    lookup,
                    insert,
                    update,
                } => (Some(lookup), vec![insert, update]),
                WriteStrategy::GatedCombined { lookup, upsert } => (Some(lookup), vec![upsert]),
                WriteStrategy::Atomic { upsert } => (None, vec![upsert]),
            };
            if let Some(lookup) = lookup {
                assert_eq!(lookup.arity(), spec.key().len(), "{kind:?} lookup");
            }
            for write in writes {
                assert_eq!(write.arity(), spec.write_arity(), "{kind:?} {}", write.name());
            }
        }
    }

    #[rstest]
    fn paths_round_trip_and_are_unique() {
        for kind in RecordKind::ALL {
            assert_eq!(RecordKind::from_path(kind.path()), Some(kind));
        }
        for listing in Listing::ALL {
            assert_eq!(Listing::from_segment(listing.segment()), Some(listing));
        }
    }

    #[rstest]
    fn excavation_arguments_follow_key_payload_user_order(excavation_body: Map<String, Value>) {
        let submission =
            RecordSubmission::from_body(RecordKind::DailyExcavation, &excavation_body).expect("valid");
        let owned = submission.write_args();
        let args: Vec<Option<&str>> = owned.iter().map(Option::as_deref).collect();
        assert_eq!(args.len(), 10);
        assert_eq!(args[0], Some("2024-03-05"));
        assert_eq!(args[2], Some("7"));
        assert_eq!(args[5], Some("800"));
        assert_eq!(args[9], Some("10452"));
    }

    #[rstest]
    #[case("Prod_date")]
    #[case("Shift")]
    #[case("LG_QTY")]
    #[case("userId")]
    fn missing_required_fields_are_named(
        mut excavation_body: Map<String, Value>,
        #[case] field: &'static str,
    ) {
        excavation_body.remove(field);
        let err = RecordSubmission::from_body(RecordKind::DailyExcavation, &excavation_body)
            .expect_err("missing field");
        assert_eq!(err, RecordValidationError::MissingField { field });
    }

    #[rstest]
    #[case("Shift")]
    #[case("Face_Desc")]
    #[case("ORE_QTY")]
    fn blank_required_fields_count_as_missing(
        mut excavation_body: Map<String, Value>,
        #[case] field: &'static str,
    ) {
        excavation_body.insert(field.into(), json!("  "));
        let err = RecordSubmission::from_body(RecordKind::DailyExcavation, &excavation_body)
            .expect_err("blank field");
        assert_eq!(err, RecordValidationError::MissingField { field });
    }

    #[rstest]
    fn blank_issuer_is_rejected_for_fuel() {
        let body = json!({
            "Issue_date": "2024-03-05", "Shift": "A", "Equip_id": "DMP-07",
            "Fuel_qty": "120.5", "Hmr_reading": "8812", "Issued_by": "   ", "userId": "1"
        });
        let err = RecordSubmission::from_body(RecordKind::FuelIssue, body.as_object().expect("object"))
            .expect_err("blank issuer");
        assert_eq!(err.field(), "Issued_by");
    }

    #[rstest]
    #[case("Loc_id", json!("seven"), "a whole number")]
    #[case("Loc_id", json!(7.5), "a whole number")]
    #[case("ORE_QTY", json!("lots"), "a number")]
    #[case("Prod_date", json!("05/03/2024"), "a date (YYYY-MM-DD)")]
    #[case("Face_Desc", json!(["x"]), "text")]
    fn mistyped_fields_are_rejected(
        mut excavation_body: Map<String, Value>,
        #[case] field: &'static str,
        #[case] value: Value,
        #[case] expected: &'static str,
    ) {
        excavation_body.insert(field.into(), value);
        let err = RecordSubmission::from_body(RecordKind::DailyExcavation, &excavation_body)
            .expect_err("mistyped field");
        assert_eq!(err, RecordValidationError::InvalidField { field, expected });
    }

    #[rstest]
    fn optional_fields_bind_as_null() {
        let body = json!({
            "Eng_date": "2024-03-05", "Shift": "B", "Equip_id": "SHV-2",
            "Status": "Working", "Working_hrs": 7, "Breakdown_hrs": 1, "Idle_hrs": 0,
            "userId": 10452
        });
        let submission = RecordSubmission::from_body(
            RecordKind::EquipmentEngagement,
            body.as_object().expect("object"),
        )
        .expect("valid");
        let args = submission.write_args();
        assert_eq!(args.len(), RecordKind::EquipmentEngagement.spec().write_arity());
        assert_eq!(args[7], None);
        assert_eq!(args[8].as_deref(), Some("10452"));
    }

    #[rstest]
    fn kpi_dashboards_share_one_record_shape() {
        for dashboard in KpiDashboard::ALL {
            let spec = dashboard.record_kind().spec();
            assert_eq!(spec.write_arity(), 8);
            assert_eq!(KpiDashboard::from_query_path(dashboard.query_path()), Some(dashboard));
        }
    }

    #[rstest]
    #[case(UpsertOutcome::Created, "Fuel issue data submitted successfully!")]
    #[case(UpsertOutcome::Updated, "Fuel issue data updated successfully!")]
    fn receipts_describe_the_branch(#[case] outcome: UpsertOutcome, #[case] message: &str) {
        let receipt = SubmissionReceipt::new(RecordKind::FuelIssue, outcome, Vec::new());
        assert_eq!(receipt.status, "success");
        assert_eq!(receipt.message, message);
    }
}

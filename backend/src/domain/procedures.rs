//! Stored procedure signatures and calls.
//!
//! A procedure is addressed by name and takes a fixed list of positional
//! parameters. [`ProcedureCall::new`] refuses to build a call whose argument
//! count differs from the signature, so arity mistakes surface as backend
//! errors before anything reaches the store.

use super::ports::StoreError;

/// Declared type of a positional parameter.
///
/// Arguments always travel as nullable text; the adapter casts them to this
/// type on the server side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Free text.
    Text,
    /// Whole number.
    Integer,
    /// Decimal quantity.
    Numeric,
    /// Calendar date in `YYYY-MM-DD` form.
    Date,
}

impl ParamType {
    /// SQL type name used in server-side casts.
    pub const fn sql_cast(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "bigint",
            Self::Numeric => "numeric",
            Self::Date => "date",
        }
    }
}

/// How a procedure hands back its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// A set-returning procedure; every returned row is one result row.
    RowSet,
    /// A procedure returning a single JSON document holding a row set or a
    /// sequence of row sets.
    Document,
}

/// Name, parameter list and result shape of a stored procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcedureSignature {
    name: &'static str,
    params: &'static [ParamType],
    shape: ResultShape,
}

impl ProcedureSignature {
    /// Declare a set-returning procedure.
    pub const fn rows(name: &'static str, params: &'static [ParamType]) -> Self {
        Self {
            name,
            params,
            shape: ResultShape::RowSet,
        }
    }

    /// Declare a procedure returning a JSON document.
    pub const fn document(name: &'static str, params: &'static [ParamType]) -> Self {
        Self {
            name,
            params,
            shape: ResultShape::Document,
        }
    }

    /// Procedure name without schema qualification.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared parameter types in positional order.
    pub const fn params(&self) -> &'static [ParamType] {
        self.params
    }

    /// Number of positional parameters.
    pub const fn arity(&self) -> usize {
        self.params.len()
    }

    /// Result shape.
    pub const fn shape(&self) -> ResultShape {
        self.shape
    }
}

/// A ready-to-execute procedure invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureCall {
    signature: ProcedureSignature,
    args: Vec<Option<String>>,
}

impl ProcedureCall {
    /// Bind arguments to a signature.
    ///
    /// # Errors
    /// Returns [`StoreError::Arity`] when `args` does not match the declared
    /// parameter count.
    ///
    /// # Examples
    /// ```
    /// use mineops::domain::{ParamType, ProcedureCall, ProcedureSignature};
    ///
    /// const SHOW_KPI: ProcedureSignature =
    ///     ProcedureSignature::rows("SP_KPI_DAILY_ACTUAL_SHOW", &[ParamType::Text]);
    ///
    /// assert!(ProcedureCall::new(SHOW_KPI, vec![Some("10452".into())]).is_ok());
    /// assert!(ProcedureCall::new(SHOW_KPI, vec![]).is_err());
    /// ```
    pub fn new(signature: ProcedureSignature, args: Vec<Option<String>>) -> Result<Self, StoreError> {
        if args.len() != signature.arity() {
            return Err(StoreError::arity(
                signature.name(),
                signature.arity(),
                args.len(),
            ));
        }
        Ok(Self { signature, args })
    }

    /// Build a call for a procedure without parameters.
    pub fn without_args(signature: ProcedureSignature) -> Result<Self, StoreError> {
        Self::new(signature, Vec::new())
    }

    /// Signature being invoked.
    pub fn signature(&self) -> &ProcedureSignature {
        &self.signature
    }

    /// Procedure name.
    pub fn name(&self) -> &'static str {
        self.signature.name()
    }

    /// Positional arguments.
    pub fn args(&self) -> &[Option<String>] {
        &self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PLAN_LOOKUP: ProcedureSignature = ProcedureSignature::rows(
        "SP_MINES_DAILY_EXCAVATION_PLAN_FIND",
        &[ParamType::Date, ParamType::Text, ParamType::Integer],
    );

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(4)]
    fn mismatched_arity_is_rejected(#[case] supplied: usize) {
        let args = vec![Some("x".to_owned()); supplied];
        let err = ProcedureCall::new(PLAN_LOOKUP, args).expect_err("arity mismatch");
        assert_eq!(
            err,
            StoreError::arity("SP_MINES_DAILY_EXCAVATION_PLAN_FIND", 3_usize, supplied)
        );
    }

    #[test]
    fn matching_arity_keeps_arguments_in_order() {
        let call = ProcedureCall::new(
            PLAN_LOOKUP,
            vec![Some("2024-03-05".into()), Some("A".into()), None],
        )
        .expect("valid call");
        assert_eq!(call.name(), "SP_MINES_DAILY_EXCAVATION_PLAN_FIND");
        assert_eq!(call.args()[0].as_deref(), Some("2024-03-05"));
        assert_eq!(call.args()[2], None);
    }

    #[rstest]
    #[case(ParamType::Text, "text")]
    #[case(ParamType::Integer, "bigint")]
    #[case(ParamType::Numeric, "numeric")]
    #[case(ParamType::Date, "date")]
    fn casts_are_postgres_type_names(#[case] ty: ParamType, #[case] expected: &str) {
        assert_eq!(ty.sql_cast(), expected);
    }
}

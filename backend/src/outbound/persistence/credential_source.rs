//! Credential table descriptions.
//!
//! The login tables differ only in their names, so one adapter serves them
//! all, parameterised by a [`CredentialSource`].

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::identifier::{IdentifierError, SqlIdentifier};

/// The credential tables the service knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSourceKind {
    /// Mine operations users.
    #[default]
    Primary,
    /// Intranet logins.
    Intranet,
    /// Access-control accounts.
    Access,
}

/// Error returned when parsing an unknown [`CredentialSourceKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown credential source {0:?}; expected primary, intranet or access")]
pub struct UnknownCredentialSource(pub String);

impl FromStr for CredentialSourceKind {
    type Err = UnknownCredentialSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(Self::Primary),
            "intranet" => Ok(Self::Intranet),
            "access" => Ok(Self::Access),
            other => Err(UnknownCredentialSource(other.to_owned())),
        }
    }
}

impl fmt::Display for CredentialSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Primary => "primary",
            Self::Intranet => "intranet",
            Self::Access => "access",
        })
    }
}

/// Table and columns holding one identity space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSource {
    table: SqlIdentifier,
    identity_column: SqlIdentifier,
    digest_column: SqlIdentifier,
    digest_aliases: Vec<String>,
}

impl CredentialSource {
    /// Describe a credential table.
    ///
    /// `digest_aliases` lists any further column names that hold digests in
    /// this table; listings strip them along with `digest_column`.
    ///
    /// # Errors
    /// Returns [`IdentifierError`] when a table or column name is not a plain
    /// SQL identifier.
    pub fn new(
        table: &str,
        identity_column: &str,
        digest_column: &str,
        digest_aliases: &[&str],
    ) -> Result<Self, IdentifierError> {
        Ok(Self {
            table: SqlIdentifier::new(table)?,
            identity_column: SqlIdentifier::new(identity_column)?,
            digest_column: SqlIdentifier::new(digest_column)?,
            digest_aliases: digest_aliases.iter().map(|alias| (*alias).to_owned()).collect(),
        })
    }

    /// Description of a known table inside `schema`.
    ///
    /// # Examples
    /// ```
    /// use mineops::outbound::persistence::{CredentialSource, CredentialSourceKind};
    ///
    /// let source = CredentialSource::preset(CredentialSourceKind::Intranet, "balcorpdb")
    ///     .expect("valid preset");
    /// assert_eq!(source.table().as_str(), "balcorpdb.intranet_login");
    /// ```
    pub fn preset(kind: CredentialSourceKind, schema: &str) -> Result<Self, IdentifierError> {
        let schema = SqlIdentifier::new(schema)?;
        let (table, identity, digest, aliases): (&str, &str, &str, &[&str]) = match kind {
            CredentialSourceKind::Primary => ("mines_users", "userid", "password", &[]),
            CredentialSourceKind::Intranet => ("intranet_login", "login_id", "user_pwd", &["USER_PWD"]),
            CredentialSourceKind::Access => ("user_access", "access_id", "pwd", &[]),
        };
        Self::new(schema.qualify(table)?.as_str(), identity, digest, aliases)
    }

    /// Qualified table name.
    pub fn table(&self) -> &SqlIdentifier {
        &self.table
    }

    /// Column holding the identity.
    pub fn identity_column(&self) -> &SqlIdentifier {
        &self.identity_column
    }

    /// Column holding the digest.
    pub fn digest_column(&self) -> &SqlIdentifier {
        &self.digest_column
    }

    /// Every column name that may hold a digest in this table.
    pub fn sensitive_columns(&self) -> Vec<String> {
        std::iter::once(self.digest_column.as_str().to_owned())
            .chain(self.digest_aliases.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("primary", CredentialSourceKind::Primary)]
    #[case(" Intranet ", CredentialSourceKind::Intranet)]
    #[case("ACCESS", CredentialSourceKind::Access)]
    fn parses_kinds_case_insensitively(#[case] raw: &str, #[case] expected: CredentialSourceKind) {
        assert_eq!(raw.parse::<CredentialSourceKind>(), Ok(expected));
    }

    #[rstest]
    fn unknown_kind_is_rejected() {
        assert!("ldap".parse::<CredentialSourceKind>().is_err());
    }

    #[rstest]
    #[case(CredentialSourceKind::Primary, "balcorpdb.mines_users", "userid", "password")]
    #[case(CredentialSourceKind::Intranet, "balcorpdb.intranet_login", "login_id", "user_pwd")]
    #[case(CredentialSourceKind::Access, "balcorpdb.user_access", "access_id", "pwd")]
    fn presets_name_one_table_each(
        #[case] kind: CredentialSourceKind,
        #[case] table: &str,
        #[case] identity: &str,
        #[case] digest: &str,
    ) {
        let source = CredentialSource::preset(kind, "balcorpdb").expect("preset");
        assert_eq!(source.table().as_str(), table);
        assert_eq!(source.identity_column().as_str(), identity);
        assert_eq!(source.digest_column().as_str(), digest);
    }

    #[rstest]
    fn schema_is_validated() {
        assert!(CredentialSource::preset(CredentialSourceKind::Primary, "bal corp").is_err());
    }

    #[rstest]
    fn sensitive_columns_include_aliases() {
        let source = CredentialSource::preset(CredentialSourceKind::Intranet, "balcorpdb").expect("preset");
        assert_eq!(source.sensitive_columns(), vec!["user_pwd".to_owned(), "USER_PWD".to_owned()]);
    }
}

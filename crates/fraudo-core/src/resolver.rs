//! Field resolver contract

use crate::domain::Domain;
use crate::error::Result;
use crate::model::FieldModel;

/// Maps checked fields to model values and to storage attribute names
///
/// Implementations are pure lookups with no I/O; one instance is shared by
/// every concurrent evaluation.
pub trait FieldResolver<D: Domain>: Send + Sync {
    /// Read `field` from `model`, named by its storage attribute
    fn resolve(&self, field: D::Field, model: &D::Model) -> Result<FieldModel>;

    /// Storage attribute name of `field`
    fn storage_name(&self, field: D::Field) -> Result<&'static str>;

    /// Resolve several fields in order, failing on the first unsupported one
    fn resolve_all(&self, fields: &[D::Field], model: &D::Model) -> Result<Vec<FieldModel>> {
        fields.iter().map(|f| self.resolve(*f, model)).collect()
    }
}

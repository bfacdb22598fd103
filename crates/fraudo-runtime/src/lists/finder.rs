//! List membership predicates

use super::service::ListService;
use crate::error::Result;
use crate::limiter::IoLimiter;
use fraudo_compiler::ListKind;
use fraudo_core::{Domain, FieldModel, FieldResolver};
use std::sync::Arc;

/// Key of a composite-key list entry: values trimmed, lower-cased and
/// joined with `|`
pub fn composite_key<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values
        .into_iter()
        .map(|v| v.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join("|")
}

fn is_blank(value: &FieldModel) -> bool {
    value.value.trim().is_empty()
}

/// Resolves model fields and checks them against the list service
pub struct InListFinder<D: Domain> {
    resolver: Arc<dyn FieldResolver<D>>,
    lists: Arc<dyn ListService>,
    limiter: IoLimiter,
}

impl<D: Domain> InListFinder<D> {
    pub fn new(
        resolver: Arc<dyn FieldResolver<D>>,
        lists: Arc<dyn ListService>,
        limiter: IoLimiter,
    ) -> Self {
        Self {
            resolver,
            lists,
            limiter,
        }
    }

    /// Membership check for one list predicate
    ///
    /// White, black and grey lists succeed when any single field value is
    /// listed. Named lists look up the composite key of all fields. Keys are
    /// normalized with [`composite_key`] either way, and values that are
    /// empty after trimming are never members.
    pub async fn is_in_list(
        &self,
        list: &ListKind,
        fields: &[D::Field],
        model: &D::Model,
    ) -> Result<bool> {
        let values = self.resolver.resolve_all(fields, model)?;
        let list_id = list.list_id();

        match list {
            ListKind::Named(_) => {
                if values.is_empty() || values.iter().any(is_blank) {
                    return Ok(false);
                }
                let key = composite_key(values.iter().map(|v| v.value.as_str()));
                self.lookup(list_id, &key).await
            }
            ListKind::White | ListKind::Black | ListKind::Grey => {
                for value in values.iter().filter(|v| !is_blank(v)) {
                    let key = composite_key([value.value.as_str()]);
                    if self.lookup(list_id, &key).await? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    async fn lookup(&self, list_id: &str, key: &str) -> Result<bool> {
        let found = self
            .limiter
            .run("list lookup", self.lists.is_member(list_id, key))
            .await?;
        tracing::debug!("{} in '{}': {}", key, list_id, found);
        Ok(found)
    }
}

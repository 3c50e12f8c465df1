use crate::{Entity, EntityDescriptor, OrmError, Result};
use std::{any, collections::HashMap, ptr};

/// Immutable set of the entities known to a session.
///
/// Built once at startup with [`Catalog::builder`], then handed to the
/// [`crate::Session`]. Iteration follows registration order.
#[derive(Default, Debug, Clone)]
pub struct Catalog {
    descriptors: Vec<&'static EntityDescriptor>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The registered descriptors, in registration order.
    pub fn scan(&self) -> impl ExactSizeIterator<Item = &'static EntityDescriptor> + '_ {
        self.descriptors.iter().copied()
    }

    pub fn descriptors(&self) -> &[&'static EntityDescriptor] {
        &self.descriptors
    }

    pub fn contains(&self, table: &str) -> bool {
        self.descriptors.iter().any(|v| v.table_name() == table)
    }

    /// Whether this very descriptor was registered, another entity mapped to the same table does not count.
    pub fn contains_descriptor(&self, descriptor: &EntityDescriptor) -> bool {
        self.descriptors.iter().any(|v| ptr::eq(*v, descriptor))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Collects entity declarations, validation happens in [`CatalogBuilder::build`].
#[derive(Default, Debug)]
pub struct CatalogBuilder {
    entries: Vec<(String, &'static EntityDescriptor)>,
}

impl CatalogBuilder {
    pub fn register<E: Entity>(self) -> Self {
        let name = any::type_name::<E>();
        let name = name.rsplit("::").next().unwrap_or(name);
        self.descriptor(name, E::descriptor())
    }

    /// Register a descriptor declared without a Rust type, `entity` names it in errors.
    pub fn descriptor(mut self, entity: impl Into<String>, descriptor: &'static EntityDescriptor) -> Self {
        self.entries.push((entity.into(), descriptor));
        self
    }

    pub fn build(self) -> Result<Catalog> {
        let mut tables = HashMap::<&str, &str>::with_capacity(self.entries.len());
        for (entity, descriptor) in &self.entries {
            descriptor.validate(entity)?;
            if let Some(other) = tables.insert(descriptor.table_name(), entity) {
                return Err(OrmError::catalog(
                    entity.as_str(),
                    format!(
                        "table `{}` is already mapped by `{}`",
                        descriptor.table_name(),
                        other
                    ),
                )
                .into());
            }
        }
        log::debug!("Catalog built with {} entities", self.entries.len());
        Ok(Catalog {
            descriptors: self.entries.into_iter().map(|(_, v)| v).collect(),
        })
    }
}

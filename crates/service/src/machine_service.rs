//! Catalog orchestration over a store and an interventions gateway.
//!
//! The composing layer picks the implementations; nothing here is wired
//! implicitly.

use std::sync::Arc;

use tracing::{info, instrument};

use models::machine;

use crate::errors::ServiceError;
use crate::interventions::{InterventionGateway, InterventionHistory};
use crate::machine_store::{MachineFilter, MachineInput, MachineStore, Sort};
use crate::pagination::{Page, PageRequest};

pub struct MachineService<S: MachineStore, G: InterventionGateway> {
    store: Arc<S>,
    interventions: Arc<G>,
}

impl<S: MachineStore, G: InterventionGateway> MachineService<S, G> {
    pub fn new(store: Arc<S>, interventions: Arc<G>) -> Self {
        Self { store, interventions }
    }

    /// Unfiltered, unpaginated retrieval for administrative use.
    pub async fn list_all(&self) -> Result<Vec<machine::Model>, ServiceError> {
        self.store.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Option<machine::Model>, ServiceError> {
        self.store.get(id).await
    }

    #[instrument(skip(self, input), fields(name = %input.name, site = %input.site))]
    pub async fn create(&self, input: MachineInput) -> Result<machine::Model, ServiceError> {
        validate_required(&input)?;
        let created = self.store.create(input).await?;
        info!(id = created.id, "machine created");
        Ok(created)
    }

    /// Full-replace update; partial patches are not supported.
    pub async fn update(
        &self,
        id: i64,
        input: MachineInput,
    ) -> Result<Option<machine::Model>, ServiceError> {
        validate_required(&input)?;
        let updated = self.store.update(id, input).await?;
        if updated.is_some() {
            info!(id, "machine updated");
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let removed = self.store.delete(id).await?;
        if removed {
            info!(id, "machine deleted");
        }
        Ok(removed)
    }

    pub async fn search(
        &self,
        filter: &MachineFilter,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Page<machine::Model>, ServiceError> {
        self.store.search(filter, sort, page).await
    }

    /// Existence in the store gates the remote lookup: a missing machine is
    /// answered locally without touching the gateway.
    pub async fn intervention_history(
        &self,
        id: i64,
    ) -> Result<Option<InterventionHistory>, ServiceError> {
        if self.store.get(id).await?.is_none() {
            return Ok(None);
        }
        Ok(Some(self.interventions.history_for_machine(id).await))
    }
}

fn validate_required(input: &MachineInput) -> Result<(), ServiceError> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::Validation("name must not be blank".into()));
    }
    if input.site.trim().is_empty() {
        return Err(ServiceError::Validation("site must not be blank".into()));
    }
    Ok(())
}

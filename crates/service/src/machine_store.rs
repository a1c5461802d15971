//! Persistent store for machine records.
//!
//! The trait is the seam the catalog service is composed against; the SeaORM
//! implementation is the production backend. Absence is always `Ok(None)` or
//! `Ok(false)`, never an error.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use models::machine::{self, MachineState};

use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};

/// Full-replace payload for create and update. Every mutable column is
/// present; an omitted `state` falls back to the default variant.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MachineInput {
    pub name: String,
    pub site: String,
    pub installed_at: sea_orm::prelude::DateTimeWithTimeZone,
    #[serde(default)]
    pub state: MachineState,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
}

/// Optional search predicates, combined with AND. An omitted predicate
/// matches every record.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MachineFilter {
    /// exact match
    pub site: Option<String>,
    /// exact match
    pub state: Option<MachineState>,
    /// case-insensitive substring match
    pub name: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Id,
    Name,
    Site,
    InstalledAt,
    State,
    CreatedAt,
    UpdatedAt,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ASC")]
    Asc,
    #[serde(alias = "DESC")]
    Desc,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

#[async_trait]
pub trait MachineStore: Send + Sync {
    /// Assigns the id and both timestamps, persists, returns the stored form.
    async fn create(&self, input: MachineInput) -> Result<machine::Model, ServiceError>;
    async fn get(&self, id: i64) -> Result<Option<machine::Model>, ServiceError>;
    /// Full replace of every mutable field; `None` without side effects when
    /// the id is absent.
    async fn update(&self, id: i64, input: MachineInput) -> Result<Option<machine::Model>, ServiceError>;
    /// True iff a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;
    async fn list(&self) -> Result<Vec<machine::Model>, ServiceError>;
    async fn count(&self) -> Result<u64, ServiceError>;
    async fn search(
        &self,
        filter: &MachineFilter,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Page<machine::Model>, ServiceError>;
}

/// SeaORM-backed store implementation.
pub struct SeaOrmMachineStore {
    db: DatabaseConnection,
}

impl SeaOrmMachineStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn order_column(field: SortField) -> machine::Column {
    match field {
        SortField::Id => machine::Column::Id,
        SortField::Name => machine::Column::Name,
        SortField::Site => machine::Column::Site,
        SortField::InstalledAt => machine::Column::InstalledAt,
        SortField::State => machine::Column::State,
        SortField::CreatedAt => machine::Column::CreatedAt,
        SortField::UpdatedAt => machine::Column::UpdatedAt,
    }
}

#[async_trait]
impl MachineStore for SeaOrmMachineStore {
    async fn create(&self, input: MachineInput) -> Result<machine::Model, ServiceError> {
        let now = Utc::now().into();
        let am = machine::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            site: Set(input.site),
            installed_at: Set(input.installed_at),
            state: Set(input.state),
            description: Set(input.description),
            model: Set(input.model),
            manufacturer: Set(input.manufacturer),
            serial_number: Set(input.serial_number),
            created_at: Set(now),
            updated_at: Set(now),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn get(&self, id: i64) -> Result<Option<machine::Model>, ServiceError> {
        machine::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn update(&self, id: i64, input: MachineInput) -> Result<Option<machine::Model>, ServiceError> {
        let existing = machine::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        // Wholesale overwrite of the mutable columns; created_at stays as is.
        let mut am: machine::ActiveModel = existing.into();
        am.name = Set(input.name);
        am.site = Set(input.site);
        am.installed_at = Set(input.installed_at);
        am.state = Set(input.state);
        am.description = Set(input.description);
        am.model = Set(input.model);
        am.manufacturer = Set(input.manufacturer);
        am.serial_number = Set(input.serial_number);
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let res = machine::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected > 0)
    }

    async fn list(&self) -> Result<Vec<machine::Model>, ServiceError> {
        machine::Entity::find()
            .order_by_asc(machine::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        machine::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn search(
        &self,
        filter: &MachineFilter,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Page<machine::Model>, ServiceError> {
        let (page_idx, per_page) = page.normalize();

        let mut select = machine::Entity::find();
        if let Some(site) = &filter.site {
            select = select.filter(machine::Column::Site.eq(site.as_str()));
        }
        if let Some(state) = filter.state {
            select = select.filter(machine::Column::State.eq(state));
        }
        if let Some(name) = &filter.name {
            let pattern = format!("%{}%", name.to_lowercase());
            select = select.filter(
                Expr::expr(Func::lower(Expr::col((machine::Entity, machine::Column::Name))))
                    .like(pattern),
            );
        }

        let column = order_column(sort.field);
        select = match sort.direction {
            SortDirection::Asc => select.order_by_asc(column),
            SortDirection::Desc => select.order_by_desc(column),
        };
        // Id as the final tiebreaker keeps pages a deterministic partition.
        if sort.field != SortField::Id {
            select = select.order_by_asc(machine::Column::Id);
        }

        let paginator = select.paginate(&self.db, per_page);
        let totals = paginator
            .num_items_and_pages()
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        let items = paginator
            .fetch_page(page_idx)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;

        Ok(Page {
            items,
            page: page_idx,
            size: per_page,
            total_items: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::test_support::get_db;

    fn input(name: &str, site: &str) -> MachineInput {
        MachineInput {
            name: name.to_string(),
            site: site.to_string(),
            installed_at: Utc::now().into(),
            state: MachineState::default(),
            description: None,
            model: None,
            manufacturer: None,
            serial_number: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = SeaOrmMachineStore::new(db);

        let mut payload = input("Press-7", "Lyon");
        payload.description = Some("hydraulic press".into());
        payload.serial_number = Some("SN-0042".into());
        let created = store.create(payload.clone()).await?;

        assert!(created.id > 0);
        assert_eq!(created.state, MachineState::Operational);
        assert_eq!(created.created_at, created.updated_at);

        let found = store.get(created.id).await?.expect("created machine must exist");
        assert_eq!(found.name, payload.name);
        assert_eq!(found.site, payload.site);
        assert_eq!(found.description.as_deref(), Some("hydraulic press"));
        assert_eq!(found.serial_number.as_deref(), Some("SN-0042"));
        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_every_mutable_field() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = SeaOrmMachineStore::new(db);

        let created = store.create(input("Lathe-1", "Grenoble")).await?;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let replacement = MachineInput {
            name: "Lathe-1b".into(),
            site: "Lille".into(),
            installed_at: Utc::now().into(),
            state: MachineState::UnderMaintenance,
            description: Some("relocated".into()),
            model: Some("L-200".into()),
            manufacturer: Some("Acme".into()),
            serial_number: Some("SN-9".into()),
        };
        let updated = store
            .update(created.id, replacement.clone())
            .await?
            .expect("machine exists");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Lathe-1b");
        assert_eq!(updated.site, "Lille");
        assert_eq!(updated.state, MachineState::UnderMaintenance);
        assert_eq!(updated.model.as_deref(), Some("L-200"));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_id_has_no_side_effects() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = SeaOrmMachineStore::new(db);

        store.create(input("Press-1", "Lyon")).await?;
        let before = store.count().await?;

        let outcome = store.update(9999, input("Ghost", "Nowhere")).await?;
        assert!(outcome.is_none());
        assert_eq!(store.count().await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_true_once_then_false() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = SeaOrmMachineStore::new(db);

        let created = store.create(input("Mill-3", "Nantes")).await?;
        assert!(store.delete(created.id).await?);
        assert!(store.get(created.id).await?.is_none());
        assert!(!store.delete(created.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn search_filters_combine_with_and() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = SeaOrmMachineStore::new(db);

        store.create(input("Press-1", "Lyon")).await?;
        store.create(input("Press-2", "Lille")).await?;
        let mut broken = input("Press-3", "Lyon");
        broken.state = MachineState::BrokenDown;
        store.create(broken).await?;
        store.create(input("Lathe-1", "Lyon")).await?;

        // site alone
        let by_site = store
            .search(
                &MachineFilter { site: Some("Lyon".into()), ..Default::default() },
                Sort::default(),
                PageRequest::default(),
            )
            .await?;
        assert_eq!(by_site.total_items, 3);
        assert!(by_site.items.iter().all(|m| m.site == "Lyon"));

        // case-insensitive name substring
        let by_name = store
            .search(
                &MachineFilter { name: Some("PRESS".into()), ..Default::default() },
                Sort::default(),
                PageRequest::default(),
            )
            .await?;
        assert_eq!(by_name.total_items, 3);
        assert!(by_name.items.iter().all(|m| m.name.to_lowercase().contains("press")));

        // site AND state AND name
        let combined = store
            .search(
                &MachineFilter {
                    site: Some("Lyon".into()),
                    state: Some(MachineState::BrokenDown),
                    name: Some("press".into()),
                },
                Sort::default(),
                PageRequest::default(),
            )
            .await?;
        assert_eq!(combined.total_items, 1);
        assert_eq!(combined.items[0].name, "Press-3");
        Ok(())
    }

    #[tokio::test]
    async fn search_pages_partition_the_result_set() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = SeaOrmMachineStore::new(db);

        let mut expected = BTreeSet::new();
        for i in 0..7 {
            let created = store.create(input(&format!("M-{}", i), "Lyon")).await?;
            expected.insert(created.id);
        }

        let mut seen = BTreeSet::new();
        let mut total_pages = 0;
        for page in 0..3 {
            let result = store
                .search(
                    &MachineFilter::default(),
                    Sort::default(),
                    PageRequest { page, size: 3 },
                )
                .await?;
            assert!(result.items.len() <= 3);
            assert_eq!(result.total_items, 7);
            total_pages = result.total_pages;
            for m in result.items {
                // no duplicates across pages
                assert!(seen.insert(m.id));
            }
        }
        assert_eq!(total_pages, 3);
        assert_eq!(seen, expected);
        Ok(())
    }

    #[tokio::test]
    async fn search_orders_by_requested_field() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let store = SeaOrmMachineStore::new(db);

        store.create(input("bravo", "Lyon")).await?;
        store.create(input("alpha", "Lyon")).await?;
        store.create(input("charlie", "Lyon")).await?;

        let by_name_desc = store
            .search(
                &MachineFilter::default(),
                Sort { field: SortField::Name, direction: SortDirection::Desc },
                PageRequest::default(),
            )
            .await?;
        let names: Vec<_> = by_name_desc.items.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["charlie", "bravo", "alpha"]);

        // default ordering is id ascending
        let default_order = store
            .search(&MachineFilter::default(), Sort::default(), PageRequest::default())
            .await?;
        let ids: Vec<_> = default_order.items.iter().map(|m| m.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        Ok(())
    }
}

//! SurrealDB implementation of [`LeadRepository`].
//!
//! All queries are scoped by `tenant_id` so one tenant can never read
//! or touch another tenant's leads, regardless of the record id it
//! supplies.

use chrono::Utc;
use estateflow_core::error::CrmResult;
use estateflow_core::models::lead::{
    CreateLead, Lead, LeadSource, LeadStatus, Purpose, Recurrence, UpdateLead,
};
use estateflow_core::repository::LeadRepository;
use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::{format_ts, parse_ts, parse_uuid};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, Deserialize)]
struct LeadRow {
    tenant_id: String,
    full_name: String,
    phone: String,
    budget: String,
    area: String,
    purpose: String,
    source: String,
    status: String,
    notes: String,
    next_follow_up: Option<String>,
    recurrence: String,
    recurrence_interval: u32,
    created_at: String,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, Deserialize)]
struct LeadRowWithId {
    record_id: String,
    tenant_id: String,
    full_name: String,
    phone: String,
    budget: String,
    area: String,
    purpose: String,
    source: String,
    status: String,
    notes: String,
    next_follow_up: Option<String>,
    recurrence: String,
    recurrence_interval: u32,
    created_at: String,
}

fn parse_enum<T: std::str::FromStr<Err = String>>(s: &str) -> Result<T, DbError> {
    s.parse().map_err(DbError::Corrupt)
}

impl LeadRow {
    fn into_lead(self, id: Uuid) -> Result<Lead, DbError> {
        Ok(Lead {
            id,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            full_name: self.full_name,
            phone: self.phone,
            budget: self.budget,
            area: self.area,
            purpose: parse_enum::<Purpose>(&self.purpose)?,
            source: parse_enum::<LeadSource>(&self.source)?,
            status: parse_enum::<LeadStatus>(&self.status)?,
            notes: self.notes,
            next_follow_up: self
                .next_follow_up
                .as_deref()
                .map(parse_ts)
                .transpose()?,
            recurrence: parse_enum::<Recurrence>(&self.recurrence)?,
            recurrence_interval: self.recurrence_interval.max(1),
            created_at: parse_ts(&self.created_at)?,
        })
    }
}

impl LeadRowWithId {
    fn try_into_lead(self) -> Result<Lead, DbError> {
        let id = parse_uuid(&self.record_id, "lead")?;
        Ok(Lead {
            id,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            full_name: self.full_name,
            phone: self.phone,
            budget: self.budget,
            area: self.area,
            purpose: parse_enum::<Purpose>(&self.purpose)?,
            source: parse_enum::<LeadSource>(&self.source)?,
            status: parse_enum::<LeadStatus>(&self.status)?,
            notes: self.notes,
            next_follow_up: self
                .next_follow_up
                .as_deref()
                .map(parse_ts)
                .transpose()?,
            recurrence: parse_enum::<Recurrence>(&self.recurrence)?,
            recurrence_interval: self.recurrence_interval.max(1),
            created_at: parse_ts(&self.created_at)?,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of a tenant's lead collection.
#[derive(Clone)]
pub struct SurrealLeadRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealLeadRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> LeadRepository for SurrealLeadRepository<C> {
    async fn create(&self, input: CreateLead) -> CrmResult<Lead> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let interval = input.recurrence_interval.unwrap_or(1).max(1);

        let result = self
            .db
            .query(
                "CREATE type::thing('lead', $id) SET \
                 tenant_id = $tenant_id, \
                 full_name = $full_name, \
                 phone = $phone, \
                 budget = $budget, \
                 area = $area, \
                 purpose = $purpose, \
                 source = $source, \
                 status = $status, \
                 notes = $notes, \
                 next_follow_up = $next_follow_up, \
                 recurrence = $recurrence, \
                 recurrence_interval = $recurrence_interval, \
                 created_at = $created_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("full_name", input.full_name))
            .bind(("phone", input.phone))
            .bind(("budget", input.budget))
            .bind(("area", input.area))
            .bind(("purpose", input.purpose.as_str().to_string()))
            .bind(("source", input.source.as_str().to_string()))
            .bind(("status", input.status.as_str().to_string()))
            .bind(("notes", input.notes))
            .bind(("next_follow_up", input.next_follow_up.map(format_ts)))
            .bind(("recurrence", input.recurrence.as_str().to_string()))
            .bind(("recurrence_interval", interval))
            .bind(("created_at", format_ts(Utc::now())))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<LeadRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "lead".into(),
            id: id_str,
        })?;

        Ok(row.into_lead(id)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> CrmResult<Lead> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::thing('lead', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LeadRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "lead".into(),
            id: id_str,
        })?;

        Ok(row.into_lead(id)?)
    }

    async fn update(&self, tenant_id: Uuid, id: Uuid, input: UpdateLead) -> CrmResult<Lead> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.full_name.is_some() {
            sets.push("full_name = $full_name");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.budget.is_some() {
            sets.push("budget = $budget");
        }
        if input.area.is_some() {
            sets.push("area = $area");
        }
        if input.purpose.is_some() {
            sets.push("purpose = $purpose");
        }
        if input.source.is_some() {
            sets.push("source = $source");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.notes.is_some() {
            sets.push("notes = $notes");
        }
        if input.next_follow_up.is_some() {
            sets.push("next_follow_up = $next_follow_up");
        }
        if input.recurrence.is_some() {
            sets.push("recurrence = $recurrence");
        }
        if input.recurrence_interval.is_some() {
            sets.push("recurrence_interval = $recurrence_interval");
        }

        if sets.is_empty() {
            // Nothing to merge; still a NotFound if the id is bogus.
            return self.get_by_id(tenant_id, id).await;
        }

        let query = format!(
            "UPDATE type::thing('lead', $id) SET {} \
             WHERE tenant_id = $tenant_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()));

        if let Some(full_name) = input.full_name {
            builder = builder.bind(("full_name", full_name));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(budget) = input.budget {
            builder = builder.bind(("budget", budget));
        }
        if let Some(area) = input.area {
            builder = builder.bind(("area", area));
        }
        if let Some(purpose) = input.purpose {
            builder = builder.bind(("purpose", purpose.as_str().to_string()));
        }
        if let Some(source) = input.source {
            builder = builder.bind(("source", source.as_str().to_string()));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }
        if let Some(notes) = input.notes {
            builder = builder.bind(("notes", notes));
        }
        if let Some(next_follow_up) = input.next_follow_up {
            // Option<Option<_>>: Some(Some(ts)) = set, Some(None) = clear.
            builder = builder.bind(("next_follow_up", next_follow_up.map(format_ts)));
        }
        if let Some(recurrence) = input.recurrence {
            builder = builder.bind(("recurrence", recurrence.as_str().to_string()));
        }
        if let Some(interval) = input.recurrence_interval {
            builder = builder.bind(("recurrence_interval", interval.max(1)));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<LeadRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "lead".into(),
            id: id_str,
        })?;

        Ok(row.into_lead(id)?)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> CrmResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "DELETE type::thing('lead', $id) \
                 WHERE tenant_id = $tenant_id \
                 RETURN BEFORE",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LeadRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "lead".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn list(&self, tenant_id: Uuid) -> CrmResult<Vec<Lead>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM lead \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LeadRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_lead())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn count(&self, tenant_id: Uuid) -> CrmResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM lead \
                 WHERE tenant_id = $tenant_id GROUP ALL",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}

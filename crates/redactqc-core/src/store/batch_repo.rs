//! Batch repository: `CreateBatch`, `GetBatch`, `ListBatches`, status/progress
//! updates, and cascade `DeleteBatch`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::error::StoreError;
use crate::models::{Batch, BatchStatus};
use crate::schema::batches;
use crate::with_conn;

use super::pool::DbPool;
use super::records::BatchRecord;

#[derive(Clone)]
pub struct BatchRepository {
    pool: DbPool,
}

impl BatchRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, batch: &Batch) -> Result<(), StoreError> {
        let record = BatchRecord::from(batch);
        with_conn!(self.pool, conn, {
            diesel::insert_into(batches::table)
                .values(&record)
                .execute(&mut conn)
                .await
        })?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Batch>, StoreError> {
        let record: Option<BatchRecord> = with_conn!(self.pool, conn, {
            batches::table
                .find(id)
                .first::<BatchRecord>(&mut conn)
                .await
                .optional()
        })?;
        record.map(Batch::try_from).transpose()
    }

    pub async fn list(&self) -> Result<Vec<Batch>, StoreError> {
        let records: Vec<BatchRecord> = with_conn!(self.pool, conn, {
            batches::table
                .order(batches::created_at.desc())
                .load::<BatchRecord>(&mut conn)
                .await
        })?;
        records.into_iter().map(Batch::try_from).collect()
    }

    pub async fn set_status(&self, id: &str, status: BatchStatus) -> Result<(), StoreError> {
        with_conn!(self.pool, conn, {
            diesel::update(batches::table.find(id))
                .set(batches::status.eq(status.as_str()))
                .execute(&mut conn)
                .await
        })?;
        Ok(())
    }

    pub async fn set_total_docs(&self, id: &str, total: i32) -> Result<(), StoreError> {
        with_conn!(self.pool, conn, {
            diesel::update(batches::table.find(id))
                .set(batches::total_docs.eq(total))
                .execute(&mut conn)
                .await
        })?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        with_conn!(self.pool, conn, {
            diesel::delete(batches::table.find(id))
                .execute(&mut conn)
                .await
        })?;
        Ok(())
    }
}

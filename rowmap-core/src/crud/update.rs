use super::{Input, prepared, returned, slot};
use crate::{
    Column, Db, Empty, Executor, Pairs, Reflect, Result, Returning, Statement, Table, Version,
    expr, q, update, where_,
};
use time::OffsetDateTime;

impl<E: Executor> Db<E> {
    /// Writes the records back by primary key, `columns` selects the written fields (see
    /// [`Table::update_filter`]).
    ///
    /// The version column is incremented by the database and, when the record carries a
    /// positive version, the statement only matches that version: a stale record is
    /// reported as not matched. Auto now columns take the current time.
    pub fn update<I: Input + ?Sized>(
        &self,
        records: &mut I,
        columns: &[&str],
    ) -> Result<I::Matched> {
        let table = self.table::<I::Record>()?;
        let key = table.expect_primary_key();
        let written = table.update_filter(columns);
        if written.is_empty() {
            return Err(table.error_no_columns());
        }
        let returns = table
            .version()
            .is_some_and(|c| self.dialect().returning(Returning::Update, &c.name).is_some());
        let mut statements: [Option<Statement<E::Prepared<'_>>>; 2] = [None, None];
        let now = OffsetDateTime::now_utc();
        records.matched(|record| {
            let (keys, version) = table.get_primary_key_version(&*record)?;
            let pinned = matches!(version, Version::Pinned(..));
            let mut args = Vec::with_capacity(written.len() + keys.len());
            for column in written.iter().filter(|c| !c.is_version()) {
                args.push(if column.is_auto_now() {
                    column.convert_time(self.time_precision(), now)?
                } else {
                    column.get(&*record)?
                });
            }
            args.extend(keys);
            let statement = prepared(&mut statements[pinned as usize], || {
                self.prepare_update(&table, key, &written, pinned)
            })?;
            if returns {
                let Some(value) = returned(statement.fetch_one(&args)?) else {
                    return Ok(false);
                };
                if let Some(column) = table.version() {
                    column.scan(record, value)?;
                }
            } else {
                match statement.execute(&args)?.rows_affected {
                    0 => return Ok(false),
                    1 => {
                        if let (Version::Pinned(n, _), Some(column)) = (&version, table.version()) {
                            column.set_integer(record, n + 1)?;
                        }
                    }
                    n => panic!("rows affected expected 0 or 1 but was {n}"),
                }
            }
            self.write_back_updated(&table, record, now)?;
            Ok(true)
        })
    }

    fn prepare_update(
        &self,
        table: &Table,
        key: &Column,
        written: &[&Column],
        pinned: bool,
    ) -> Result<Statement<E::Prepared<'_>>> {
        let mut k = 0;
        let mut pairs = Pairs::set();
        for column in written {
            if column.is_version() {
                pairs.push(column.name.clone(), column.operand().inc());
            } else {
                pairs.push(column.name.clone(), slot(k));
                k += 1;
            }
        }
        let mut conditions = vec![key.operand().eq(slot(k))];
        if pinned && let Some(version) = table.version() {
            conditions.push(version.operand().eq(slot(k + 1)));
        }
        let returning = table
            .version()
            .and_then(|c| self.dialect().returning(Returning::Update, &c.name));
        let (statement, _) = self.prepare(&q([
            expr(update(table.name.clone())),
            expr(pairs),
            expr(where_(conditions)),
            returning.unwrap_or_else(|| expr(Empty)),
        ]))?;
        Ok(statement)
    }

    pub(super) fn write_back_updated(
        &self,
        table: &Table,
        record: &mut dyn Reflect,
        now: OffsetDateTime,
    ) -> Result<()> {
        if let Some(column) = table.auto_now() {
            column.set_time(record, self.time_precision(), now)?;
        }
        Ok(())
    }
}

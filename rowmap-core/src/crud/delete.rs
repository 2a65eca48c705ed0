use super::{Input, prepared, slot};
use crate::{Db, Executor, Result, Statement, Table, Version, delete, expr, q, where_};

impl<E: Executor> Db<E> {
    /// Deletes the records by primary key, pinned to their version when positive.
    pub fn delete<I: Input + ?Sized>(&self, records: &mut I) -> Result<I::Matched> {
        let table = self.table::<I::Record>()?;
        table.expect_primary_key();
        let mut statements: [Option<Statement<E::Prepared<'_>>>; 2] = [None, None];
        records.matched(|record| {
            let (args, version) = table.get_primary_key_version(&*record)?;
            let pinned = matches!(version, Version::Pinned(..));
            let statement = prepared(&mut statements[pinned as usize], || {
                self.prepare_delete(&table, pinned)
            })?;
            match statement.execute(&args)?.rows_affected {
                0 => Ok(false),
                1 => Ok(true),
                n => panic!("rows affected expected 0 or 1 but was {n}"),
            }
        })
    }

    fn prepare_delete(&self, table: &Table, pinned: bool) -> Result<Statement<E::Prepared<'_>>> {
        let mut conditions = vec![table.expect_primary_key().operand().eq(slot(0))];
        if pinned && let Some(version) = table.version() {
            conditions.push(version.operand().eq(slot(1)));
        }
        let (statement, _) = self.prepare(&q([
            expr(delete(table.name.clone())),
            expr(where_(conditions)),
        ]))?;
        Ok(statement)
    }
}

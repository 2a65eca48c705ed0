use super::{Input, prepared, slot};
use crate::{
    Column, Db, Executor, Result, Statement, Table, Version, column_names, expr, from, q, select,
    where_,
};

impl<E: Executor> Db<E> {
    /// Reloads the records by primary key, `columns` selects the refreshed fields (see
    /// [`Table::filter`]).
    ///
    /// Records carrying a positive version only match that version. A record not found is
    /// left untouched and reported as not matched.
    pub fn read<I: Input + ?Sized>(&self, records: &mut I, columns: &[&str]) -> Result<I::Matched> {
        let table = self.table::<I::Record>()?;
        let key = table.expect_primary_key();
        let selected = table.filter(columns);
        if selected.is_empty() {
            return Err(table.error_no_columns());
        }
        let mut statements: [Option<Statement<E::Prepared<'_>>>; 2] = [None, None];
        records.matched(|record| {
            let (args, version) = table.get_primary_key_version(&*record)?;
            let pinned = matches!(version, Version::Pinned(..));
            let statement = prepared(&mut statements[pinned as usize], || {
                self.prepare_read(&table, key, &selected, pinned)
            })?;
            let Some(row) = statement.fetch_one(&args)? else {
                return Ok(false);
            };
            for (column, value) in selected.iter().zip(row.values.into_vec()) {
                column.scan(record, value)?;
            }
            Ok(true)
        })
    }

    fn prepare_read(
        &self,
        table: &Table,
        key: &Column,
        selected: &[&Column],
        pinned: bool,
    ) -> Result<Statement<E::Prepared<'_>>> {
        let mut conditions = vec![key.operand().eq(slot(0))];
        if pinned && let Some(version) = table.version() {
            conditions.push(version.operand().eq(slot(1)));
        }
        let (statement, _) = self.prepare(&q([
            expr(select(column_names(selected))),
            expr(from([table.name.as_str()])),
            expr(where_(conditions)),
        ]))?;
        Ok(statement)
    }
}

use super::{Input, returned, slot};
use crate::{
    Column, Db, Empty, Executor, Pairs, Reflect, Result, Returning, Table, Value, expr, insert,
    q,
};
use time::OffsetDateTime;

impl<E: Executor> Db<E> {
    /// Inserts the records.
    ///
    /// Auto increment and many relation columns are left out. The generated key is read
    /// back through `RETURNING` when the dialect has it, from the driver otherwise. Version
    /// columns start at 1 and auto now columns take the current time, both written back
    /// into the records.
    pub fn create<I: Input + ?Sized>(&self, records: &mut I) -> Result<I::Inserted> {
        let table = self.table::<I::Record>()?;
        let columns: Vec<&Column> = table
            .columns
            .iter()
            .filter(|c| !c.is_many() && !c.is_auto_increment())
            .collect();
        if columns.is_empty() {
            return Err(table.error_no_columns());
        }
        let mut pairs = Pairs::values();
        for (k, column) in columns.iter().enumerate() {
            pairs.push(column.name.clone(), slot(k));
        }
        let auto_increment = table.auto_increment();
        let returning =
            auto_increment.and_then(|c| self.dialect().returning(Returning::Create, &c.name));
        let returns = returning.is_some();
        let (mut statement, _) = self.prepare(&q([
            expr(insert(table.name.clone())),
            expr(pairs),
            returning.unwrap_or_else(|| expr(Empty)),
        ]))?;
        let now = OffsetDateTime::now_utc();
        records.inserted(|record| {
            let args = columns
                .iter()
                .map(|column| self.insert_value(column, &*record, now))
                .collect::<Result<Vec<_>>>()?;
            match auto_increment {
                Some(column) if returns => {
                    let Some(id) = returned(statement.fetch_one(&args)?) else {
                        return Err(table.error("insert returned no row"));
                    };
                    column.scan(record, id)?;
                }
                _ => {
                    let result = statement.execute(&args)?;
                    if result.rows_affected != 1 {
                        panic!("rows affected expected 1 but was {}", result.rows_affected);
                    }
                    if let Some(column) = auto_increment {
                        let Some(id) = result.last_affected_id else {
                            return Err(column.error("no generated key"));
                        };
                        column.set_integer(record, id)?;
                    }
                }
            }
            self.write_back_created(&table, record, now)
        })
    }

    /// Value stored by an insert: the initial version, the current time or the field.
    fn insert_value(
        &self,
        column: &Column,
        record: &dyn Reflect,
        now: OffsetDateTime,
    ) -> Result<Value> {
        if column.is_version() {
            column.prototype().with_integer(1)
        } else if column.is_auto_now() || column.is_auto_now_add() {
            column.convert_time(self.time_precision(), now)
        } else {
            column.get(record)
        }
    }

    pub(super) fn write_back_created(
        &self,
        table: &Table,
        record: &mut dyn Reflect,
        now: OffsetDateTime,
    ) -> Result<()> {
        if let Some(column) = table.version() {
            column.set_integer(record, 1)?;
        }
        for column in [table.auto_now(), table.auto_now_add()].into_iter().flatten() {
            column.set_time(record, self.time_precision(), now)?;
        }
        Ok(())
    }
}

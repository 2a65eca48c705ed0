use super::{Input, slot};
use crate::{Column, Db, Executor, Pairs, Result, expr, insert, q};

impl<E: Executor> Db<E> {
    /// Inserts the records as they are, generated and automatic columns included.
    ///
    /// Meant for restoring rows, nothing is written back into the records.
    pub fn load<I: Input + ?Sized>(&self, records: &mut I) -> Result<I::Inserted> {
        let table = self.table::<I::Record>()?;
        let columns: Vec<&Column> = table.columns.iter().filter(|c| !c.is_many()).collect();
        if columns.is_empty() {
            return Err(table.error_no_columns());
        }
        let mut pairs = Pairs::values();
        for (k, column) in columns.iter().enumerate() {
            pairs.push(column.name.clone(), slot(k));
        }
        let (mut statement, _) =
            self.prepare(&q([expr(insert(table.name.clone())), expr(pairs)]))?;
        records.inserted(|record| {
            let args = columns
                .iter()
                .map(|column| column.get(&*record))
                .collect::<Result<Vec<_>>>()?;
            let result = statement.execute(&args)?;
            if result.rows_affected != 1 {
                panic!("rows affected expected 1 but was {}", result.rows_affected);
            }
            Ok(())
        })
    }
}

use crate::{
    Column, ColumnType, Dialect, Error, Identifier, Modifier, Operand, Options, Qualifier,
    RecordType, Reflect, Result, TableId, Value,
};
use std::collections::HashMap;

/// Columns holding a table wide role.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Roles {
    pub primary_key: Option<usize>,
    pub version: Option<usize>,
    pub auto_increment: Option<usize>,
    pub auto_now: Option<usize>,
    pub auto_now_add: Option<usize>,
}

impl Roles {
    pub(crate) const ALL: [Options; 5] = [
        Options::AUTO_INCREMENT,
        Options::AUTO_NOW,
        Options::AUTO_NOW_ADD,
        Options::PRIMARY_KEY,
        Options::VERSION,
    ];

    pub(crate) fn slot(&mut self, role: Options) -> &mut Option<usize> {
        match role {
            Options::AUTO_INCREMENT => &mut self.auto_increment,
            Options::AUTO_NOW => &mut self.auto_now,
            Options::AUTO_NOW_ADD => &mut self.auto_now_add,
            Options::PRIMARY_KEY => &mut self.primary_key,
            _ => &mut self.version,
        }
    }

    pub(crate) fn get(&self, role: Options) -> Option<usize> {
        match role {
            Options::AUTO_INCREMENT => self.auto_increment,
            Options::AUTO_NOW => self.auto_now,
            Options::AUTO_NOW_ADD => self.auto_now_add,
            Options::PRIMARY_KEY => self.primary_key,
            _ => self.version,
        }
    }
}

/// Version pin read from a record.
#[derive(Clone, Debug, PartialEq)]
pub enum Version {
    /// The table has no version column or the record carries a negative version.
    Unpinned,
    /// Positive version, compared by updates and deletes.
    Pinned(i64, Value),
}

/// Column layout of a record type.
#[derive(Debug)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub record_type: &'static RecordType,
    pub columns: Vec<Column>,
    pub(crate) names: HashMap<String, usize>,
    pub roles: Roles,
}

/// Empty first entry of a column list: the remaining names are excluded instead of
/// selected.
pub const EXCLUDE: &str = "";

impl Table {
    fn role(&self, role: Option<usize>) -> Option<&Column> {
        role.map(|i| &self.columns[i])
    }

    pub fn primary_key(&self) -> Option<&Column> {
        self.role(self.roles.primary_key)
    }

    pub fn version(&self) -> Option<&Column> {
        self.role(self.roles.version)
    }

    pub fn auto_increment(&self) -> Option<&Column> {
        self.role(self.roles.auto_increment)
    }

    pub fn auto_now(&self) -> Option<&Column> {
        self.role(self.roles.auto_now)
    }

    pub fn auto_now_add(&self) -> Option<&Column> {
        self.role(self.roles.auto_now_add)
    }

    /// Primary key column, panics when the table has none.
    pub fn expect_primary_key(&self) -> &Column {
        self.primary_key()
            .unwrap_or_else(|| panic!("{}", self.error_no_primary_key()))
    }

    /// Case insensitive lookup of a physical column.
    pub fn find(&self, name: &str) -> Option<&Column> {
        self.names
            .get(&name.to_lowercase())
            .map(|i| &self.columns[*i])
    }

    pub fn operand(&self) -> Operand {
        Operand::new(Identifier::new(self.name.clone()))
    }

    pub fn qualifier(&self, prefix: &[&str]) -> Operand {
        let parts = prefix
            .iter()
            .map(|v| v.to_string())
            .chain([self.name.clone()]);
        Operand::new(Qualifier::new(parts))
    }

    fn index_of(&self, name: &str) -> usize {
        match self.names.get(&name.to_lowercase()) {
            Some(i) => *i,
            None => panic!("column not found: {name}"),
        }
    }

    /// Columns selected by a name list, all physical columns when empty.
    ///
    /// A first entry equal to [`EXCLUDE`] selects every physical column except the
    /// listed ones. Unknown names panic.
    pub fn filter(&self, columns: &[&str]) -> Vec<&Column> {
        let (exclude, columns) = match columns.split_first() {
            Some((&EXCLUDE, rest)) => (true, rest),
            _ => (false, columns),
        };
        if columns.is_empty() {
            return self.columns.iter().filter(|c| !c.is_many()).collect();
        }
        let mut listed = vec![false; self.columns.len()];
        for name in columns {
            listed[self.index_of(name)] = true;
        }
        self.columns
            .iter()
            .zip(listed)
            .filter(|(c, listed)| {
                if exclude {
                    !listed && !c.is_many()
                } else {
                    *listed
                }
            })
            .map(|(c, _)| c)
            .collect()
    }

    /// Columns written by an update.
    ///
    /// Without names: every physical column except the primary key, auto increment and
    /// auto now add ones. With names: the selected (or not excluded) ones. Auto now and
    /// version columns are always included. Unknown names are ignored.
    pub fn update_filter(&self, columns: &[&str]) -> Vec<&Column> {
        let (exclude, columns) = match columns.split_first() {
            Some((&EXCLUDE, rest)) => (true, rest),
            _ => (false, columns),
        };
        if columns.is_empty() {
            return self
                .columns
                .iter()
                .filter(|c| {
                    !(c.is_many() || c.is_auto_increment() || c.is_auto_now_add() || c.is_primary_key())
                })
                .collect();
        }
        let listed: Vec<usize> = columns
            .iter()
            .filter_map(|v| self.names.get(&v.to_lowercase()).copied())
            .collect();
        self.columns
            .iter()
            .filter(|c| {
                !c.is_many()
                    && (c.is_auto_now()
                        || c.is_version()
                        || listed.contains(&c.index) != exclude)
            })
            .collect()
    }

    /// Version pin of a record: positive versions are pinned, negative ones are not,
    /// zero is an error.
    pub fn get_version(&self, record: &dyn Reflect) -> Result<Version> {
        let Some(column) = self.version() else {
            return Ok(Version::Unpinned);
        };
        match column.get_integer(record) {
            None => Err(column.error_get()),
            Some(0) => Err(column.error_zero()),
            Some(n) if n > 0 => Ok(Version::Pinned(n, column.get(record)?)),
            Some(..) => Ok(Version::Unpinned),
        }
    }

    /// Key arguments of a record: the primary key, followed by the version when pinned.
    pub fn get_primary_key_version(&self, record: &dyn Reflect) -> Result<(Vec<Value>, Version)> {
        let mut args = vec![self.expect_primary_key().get(record)?];
        let version = self.get_version(record)?;
        if let Version::Pinned(_, value) = &version {
            args.push(value.clone());
        }
        Ok((args, version))
    }

    pub(crate) fn error(&self, message: &str) -> Error {
        Error::msg(format!("table {}: {message}", self.name))
    }

    pub(crate) fn error_no_columns(&self) -> Error {
        self.error("no columns")
    }

    pub(crate) fn error_no_primary_key(&self) -> Error {
        self.error("no primary key")
    }

    /// `CREATE TABLE` statement for the physical columns.
    pub fn create_table(
        &self,
        dialect: &dyn Dialect,
        temporary: bool,
        if_not_exists: bool,
    ) -> Result<String> {
        let mut table = String::new();
        if !dialect.write_identifier(&mut table, &self.name) {
            return Err(self.error("unsupported name"));
        }
        let mut columns = Vec::with_capacity(self.columns.len());
        for column in self.columns.iter().filter(|c| !c.is_many()) {
            let mut parts = Vec::with_capacity(6);
            let mut name = String::new();
            if !dialect.write_identifier(&mut name, &column.name) {
                return Err(column.error("unsupported name"));
            }
            parts.push(name);
            let modifier = if column.is_auto_increment() {
                Modifier::AutoIncrement
            } else if column.is_auto_now() {
                Modifier::AutoNow
            } else if column.is_auto_now_add() {
                Modifier::AutoNowAdd
            } else if column.is_version() {
                Modifier::Version
            } else {
                Modifier::ZeroValue
            };
            let prototype = column.prototype();
            let Some((sql_type, option)) = dialect.column_type(&ColumnType {
                name: &column.name,
                value: &prototype,
                encoding: column.encoding(),
                size: column.size(),
                modifier,
            }) else {
                return Err(column.error(&format!(
                    "unsupported type: {}",
                    prototype.type_name()
                )));
            };
            parts.push(sql_type);
            if column.is_primary_key() {
                parts.push("PRIMARY KEY".into());
            } else {
                if !column.is_nullable() && !column.is_collapse() {
                    parts.push("NOT NULL".into());
                }
                if column.is_unique() {
                    parts.push("UNIQUE".into());
                }
            }
            if !option.is_empty() {
                if modifier == Modifier::ZeroValue {
                    parts.push("DEFAULT".into());
                }
                parts.push(option);
            }
            columns.push(parts.join(" "));
        }
        if columns.is_empty() {
            return Err(self.error_no_columns());
        }
        let mut out = String::with_capacity(256);
        dialect.write_create_table(&mut out, &table, &columns, temporary, if_not_exists);
        Ok(out)
    }
}
